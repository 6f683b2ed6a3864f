//! Blob-level data-plane operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::{BaseClient, RequestConfig, API_VERSION};
use crate::context::Context;
use crate::error::StorageError;
use crate::executor::Execute;
use crate::http::{Headers, HttpMethod, HttpResponse, QueryParams};
use crate::metadata;
use crate::options::RequestOptions;

/// Client for blob operations, addressed as `/{container}/{blob}`.
#[derive(Clone)]
pub struct BlobsClient {
    client: BaseClient,
}

impl BlobsClient {
    pub fn new(base_uri: &str, executor: Arc<dyn Execute>) -> Result<Self, StorageError> {
        Ok(Self {
            client: BaseClient::new(base_uri, API_VERSION, executor)?,
        })
    }
}

#[derive(Debug)]
pub struct AbortCopyInput {
    /// The copy which should be aborted.
    pub copy_id: String,

    /// Must be set if a lease is present on the blob, else the platform
    /// rejects the call with a 403.
    pub lease_id: Option<String>,
}

#[derive(Debug)]
pub struct AbortCopyResponse {
    pub http_response: HttpResponse,
}

#[derive(Debug)]
pub struct SetMetaDataInput {
    pub metadata: BTreeMap<String, String>,
    pub lease_id: Option<String>,
}

#[derive(Debug)]
pub struct SetMetaDataResponse {
    pub http_response: HttpResponse,
}

#[derive(Debug)]
pub struct DeleteInput {
    /// Also delete the blob's snapshots.
    pub delete_snapshots: bool,
    pub lease_id: Option<String>,
}

#[derive(Debug)]
pub struct DeleteResponse {
    pub http_response: HttpResponse,
}

impl BlobsClient {
    /// Aborts a pending copy, leaving a destination blob with zero length and
    /// full metadata.
    pub fn abort_copy(
        &self,
        ctx: &Context,
        container_name: &str,
        blob_name: &str,
        input: AbortCopyInput,
    ) -> Result<AbortCopyResponse, StorageError> {
        if container_name.is_empty() {
            return Err(StorageError::Validation(
                "`container_name` cannot be an empty string".to_string(),
            ));
        }
        if container_name.to_lowercase() != container_name {
            return Err(StorageError::Validation(
                "`container_name` must be a lower-cased string".to_string(),
            ));
        }
        if blob_name.is_empty() {
            return Err(StorageError::Validation(
                "`blob_name` cannot be an empty string".to_string(),
            ));
        }
        if input.copy_id.is_empty() {
            return Err(StorageError::Validation(
                "`input.copy_id` cannot be an empty string".to_string(),
            ));
        }

        let config = RequestConfig {
            method: HttpMethod::Put,
            path: format!("/{container_name}/{blob_name}"),
            content_type: None,
            expected_status_codes: vec![204],
            options: &AbortCopyOptions { input: &input },
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(AbortCopyResponse { http_response })
    }

    /// Replaces the blob's user-defined metadata.
    pub fn set_metadata(
        &self,
        ctx: &Context,
        container_name: &str,
        blob_name: &str,
        input: SetMetaDataInput,
    ) -> Result<SetMetaDataResponse, StorageError> {
        if container_name.is_empty() {
            return Err(StorageError::Validation(
                "`container_name` cannot be an empty string".to_string(),
            ));
        }
        if container_name.to_lowercase() != container_name {
            return Err(StorageError::Validation(
                "`container_name` must be a lower-cased string".to_string(),
            ));
        }
        if blob_name.is_empty() {
            return Err(StorageError::Validation(
                "`blob_name` cannot be an empty string".to_string(),
            ));
        }
        if let Err(msg) = metadata::validate(&input.metadata) {
            return Err(StorageError::Validation(format!(
                "`input.metadata` is not valid: {msg}"
            )));
        }

        let config = RequestConfig {
            method: HttpMethod::Put,
            path: format!("/{container_name}/{blob_name}"),
            content_type: None,
            expected_status_codes: vec![200],
            options: &SetMetaDataOptions { input: &input },
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(SetMetaDataResponse { http_response })
    }

    /// Marks the blob for deletion.
    pub fn delete(
        &self,
        ctx: &Context,
        container_name: &str,
        blob_name: &str,
        input: DeleteInput,
    ) -> Result<DeleteResponse, StorageError> {
        if container_name.is_empty() {
            return Err(StorageError::Validation(
                "`container_name` cannot be an empty string".to_string(),
            ));
        }
        if container_name.to_lowercase() != container_name {
            return Err(StorageError::Validation(
                "`container_name` must be a lower-cased string".to_string(),
            ));
        }
        if blob_name.is_empty() {
            return Err(StorageError::Validation(
                "`blob_name` cannot be an empty string".to_string(),
            ));
        }

        let config = RequestConfig {
            method: HttpMethod::Delete,
            path: format!("/{container_name}/{blob_name}"),
            content_type: None,
            expected_status_codes: vec![202],
            options: &DeleteOptions { input: &input },
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(DeleteResponse { http_response })
    }
}

struct AbortCopyOptions<'a> {
    input: &'a AbortCopyInput,
}

impl RequestOptions for AbortCopyOptions<'_> {
    fn to_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.append("x-ms-copy-action", "abort");
        if let Some(lease_id) = &self.input.lease_id {
            headers.append("x-ms-lease-id", lease_id.clone());
        }
        headers
    }

    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.append("comp", "copy");
        query.append("copyid", self.input.copy_id.clone());
        query
    }
}

struct SetMetaDataOptions<'a> {
    input: &'a SetMetaDataInput,
}

impl RequestOptions for SetMetaDataOptions<'_> {
    fn to_headers(&self) -> Headers {
        let mut headers = Headers::new();
        if let Some(lease_id) = &self.input.lease_id {
            headers.append("x-ms-lease-id", lease_id.clone());
        }
        headers.merge(metadata::to_headers(&self.input.metadata));
        headers
    }

    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.append("comp", "metadata");
        query
    }
}

struct DeleteOptions<'a> {
    input: &'a DeleteInput,
}

impl RequestOptions for DeleteOptions<'_> {
    fn to_headers(&self) -> Headers {
        let mut headers = Headers::new();
        if self.input.delete_snapshots {
            headers.append("x-ms-delete-snapshots", "include");
        }
        if let Some(lease_id) = &self.input.lease_id {
            headers.append("x-ms-lease-id", lease_id.clone());
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::API_VERSION;
    use crate::testutil::RecordingExecutor;

    const BASE_URI: &str = "https://account.blob.example.net";

    fn abort_input(copy_id: &str) -> AbortCopyInput {
        AbortCopyInput {
            copy_id: copy_id.to_string(),
            lease_id: None,
        }
    }

    #[test]
    fn abort_copy_builds_exact_request() {
        let executor = RecordingExecutor::respond_with(204);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        client
            .abort_copy(
                &Context::background(),
                "mycontainer",
                "myblob.txt",
                abort_input("abc123"),
            )
            .unwrap();

        let request = executor.last_request();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(
            request.url,
            format!("{BASE_URI}/mycontainer/myblob.txt?comp=copy&copyid=abc123")
        );
        assert_eq!(request.headers.get("x-ms-copy-action"), Some("abort"));
        assert_eq!(request.headers.get("x-ms-lease-id"), None);
        assert_eq!(request.headers.get("x-ms-version"), Some(API_VERSION));
        assert_eq!(request.expected_status_codes, vec![204]);
    }

    #[test]
    fn abort_copy_includes_lease_header_when_supplied() {
        let executor = RecordingExecutor::respond_with(204);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        client
            .abort_copy(
                &Context::background(),
                "mycontainer",
                "myblob.txt",
                AbortCopyInput {
                    copy_id: "abc123".to_string(),
                    lease_id: Some("lease-7".to_string()),
                },
            )
            .unwrap();

        let request = executor.last_request();
        assert_eq!(request.headers.get("x-ms-lease-id"), Some("lease-7"));
    }

    #[test]
    fn abort_copy_rejects_empty_container_without_network() {
        let executor = RecordingExecutor::respond_with(204);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        let err = client
            .abort_copy(&Context::background(), "", "myblob.txt", abort_input("abc"))
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn abort_copy_rejects_upper_cased_container() {
        let executor = RecordingExecutor::respond_with(204);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        let err = client
            .abort_copy(
                &Context::background(),
                "MyContainer",
                "myblob.txt",
                abort_input("abc"),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "`container_name` must be a lower-cased string");
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn abort_copy_rejects_missing_copy_id() {
        let executor = RecordingExecutor::respond_with(204);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        let err = client
            .abort_copy(
                &Context::background(),
                "mycontainer",
                "myblob.txt",
                abort_input(""),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "`input.copy_id` cannot be an empty string");
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn abort_copy_surfaces_conflict_with_response_attached() {
        let executor = RecordingExecutor::respond_with(409);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        let err = client
            .abort_copy(
                &Context::background(),
                "mycontainer",
                "myblob.txt",
                abort_input("abc123"),
            )
            .unwrap_err();
        match err {
            StorageError::UnexpectedStatus {
                status, response, ..
            } => {
                assert_eq!(status, 409);
                assert_eq!(response.status, 409);
            }
            other => panic!("expected UnexpectedStatus, got {other}"),
        }
        assert_eq!(executor.call_count(), 1);
    }

    #[test]
    fn set_metadata_builds_exact_request() {
        let executor = RecordingExecutor::respond_with(200);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        let mut meta = BTreeMap::new();
        meta.insert("owner".to_string(), "alice".to_string());
        client
            .set_metadata(
                &Context::background(),
                "mycontainer",
                "myblob.txt",
                SetMetaDataInput {
                    metadata: meta,
                    lease_id: None,
                },
            )
            .unwrap();

        let request = executor.last_request();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(
            request.url,
            format!("{BASE_URI}/mycontainer/myblob.txt?comp=metadata")
        );
        assert_eq!(request.headers.get("x-ms-meta-owner"), Some("alice"));
        assert_eq!(request.expected_status_codes, vec![200]);
    }

    #[test]
    fn set_metadata_rejects_invalid_metadata_key() {
        let executor = RecordingExecutor::respond_with(200);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        let mut meta = BTreeMap::new();
        meta.insert("bad-key".to_string(), "v".to_string());
        let err = client
            .set_metadata(
                &Context::background(),
                "mycontainer",
                "myblob.txt",
                SetMetaDataInput {
                    metadata: meta,
                    lease_id: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        assert!(err.to_string().starts_with("`input.metadata` is not valid:"));
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn delete_requests_snapshot_removal_when_asked() {
        let executor = RecordingExecutor::respond_with(202);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        client
            .delete(
                &Context::background(),
                "mycontainer",
                "myblob.txt",
                DeleteInput {
                    delete_snapshots: true,
                    lease_id: None,
                },
            )
            .unwrap();

        let request = executor.last_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, format!("{BASE_URI}/mycontainer/myblob.txt"));
        assert_eq!(
            request.headers.get("x-ms-delete-snapshots"),
            Some("include")
        );
    }

    #[test]
    fn delete_omits_snapshot_header_by_default() {
        let executor = RecordingExecutor::respond_with(202);
        let client = BlobsClient::new(BASE_URI, executor.clone()).unwrap();

        client
            .delete(
                &Context::background(),
                "mycontainer",
                "myblob.txt",
                DeleteInput {
                    delete_snapshots: false,
                    lease_id: None,
                },
            )
            .unwrap();

        assert!(!executor.last_request().headers.contains("x-ms-delete-snapshots"));
    }
}
