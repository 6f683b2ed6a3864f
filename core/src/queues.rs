//! Queue-level data-plane operations.
//!
//! Queue requests carry an XML content type even when the body is empty; the
//! platform requires it on queue-scoped PUTs.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::{BaseClient, RequestConfig, API_VERSION};
use crate::context::Context;
use crate::error::StorageError;
use crate::executor::Execute;
use crate::http::{Headers, HttpMethod, HttpResponse, QueryParams};
use crate::metadata;
use crate::options::{NoOptions, RequestOptions};

const CONTENT_TYPE_XML: &str = "application/xml; charset=utf-8";

/// Client for queue operations, addressed as `/{queue}`.
#[derive(Clone)]
pub struct QueuesClient {
    client: BaseClient,
}

#[derive(Debug)]
pub struct CreateInput {
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct CreateResponse {
    pub http_response: HttpResponse,
}

#[derive(Debug)]
pub struct DeleteResponse {
    pub http_response: HttpResponse,
}

#[derive(Debug)]
pub struct SetMetaDataInput {
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct SetMetaDataResponse {
    pub http_response: HttpResponse,
}

#[derive(Debug)]
pub struct GetMetaDataResponse {
    pub http_response: HttpResponse,

    /// Metadata parsed from the `x-ms-meta-*` response headers.
    pub metadata: BTreeMap<String, String>,
}

impl QueuesClient {
    pub fn new(base_uri: &str, executor: Arc<dyn Execute>) -> Result<Self, StorageError> {
        Ok(Self {
            client: BaseClient::new(base_uri, API_VERSION, executor)?,
        })
    }

    /// Creates the queue, attaching any supplied metadata.
    pub fn create(
        &self,
        ctx: &Context,
        queue_name: &str,
        input: CreateInput,
    ) -> Result<CreateResponse, StorageError> {
        validate_queue_name(queue_name)?;
        if let Err(msg) = metadata::validate(&input.metadata) {
            return Err(StorageError::Validation(format!(
                "`input.metadata` is not valid: {msg}"
            )));
        }

        let config = RequestConfig {
            method: HttpMethod::Put,
            path: format!("/{queue_name}"),
            content_type: Some(CONTENT_TYPE_XML),
            expected_status_codes: vec![201],
            options: &CreateOptions { input: &input },
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(CreateResponse { http_response })
    }

    /// Deletes the queue and every message in it.
    pub fn delete(&self, ctx: &Context, queue_name: &str) -> Result<DeleteResponse, StorageError> {
        validate_queue_name(queue_name)?;

        let config = RequestConfig {
            method: HttpMethod::Delete,
            path: format!("/{queue_name}"),
            content_type: Some(CONTENT_TYPE_XML),
            expected_status_codes: vec![204],
            options: &NoOptions,
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(DeleteResponse { http_response })
    }

    /// Replaces the metadata for this queue.
    pub fn set_metadata(
        &self,
        ctx: &Context,
        queue_name: &str,
        input: SetMetaDataInput,
    ) -> Result<SetMetaDataResponse, StorageError> {
        validate_queue_name(queue_name)?;
        if let Err(msg) = metadata::validate(&input.metadata) {
            return Err(StorageError::Validation(format!(
                "`input.metadata` is not valid: {msg}"
            )));
        }

        let config = RequestConfig {
            method: HttpMethod::Put,
            path: format!("/{queue_name}"),
            content_type: Some(CONTENT_TYPE_XML),
            expected_status_codes: vec![204],
            options: &SetMetaDataOptions { input: &input },
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(SetMetaDataResponse { http_response })
    }

    /// Returns the metadata for this queue, parsed from the response headers.
    pub fn get_metadata(
        &self,
        ctx: &Context,
        queue_name: &str,
    ) -> Result<GetMetaDataResponse, StorageError> {
        validate_queue_name(queue_name)?;

        let config = RequestConfig {
            method: HttpMethod::Get,
            path: format!("/{queue_name}"),
            content_type: Some(CONTENT_TYPE_XML),
            expected_status_codes: vec![200],
            options: &GetMetaDataOptions,
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        let metadata = metadata::from_headers(&http_response.headers);
        Ok(GetMetaDataResponse {
            http_response,
            metadata,
        })
    }
}

fn validate_queue_name(queue_name: &str) -> Result<(), StorageError> {
    if queue_name.is_empty() {
        return Err(StorageError::Validation(
            "`queue_name` cannot be an empty string".to_string(),
        ));
    }
    if queue_name.to_lowercase() != queue_name {
        return Err(StorageError::Validation(
            "`queue_name` must be a lower-cased string".to_string(),
        ));
    }
    Ok(())
}

struct CreateOptions<'a> {
    input: &'a CreateInput,
}

impl RequestOptions for CreateOptions<'_> {
    fn to_headers(&self) -> Headers {
        metadata::to_headers(&self.input.metadata)
    }
}

struct SetMetaDataOptions<'a> {
    input: &'a SetMetaDataInput,
}

impl RequestOptions for SetMetaDataOptions<'_> {
    fn to_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.merge(metadata::to_headers(&self.input.metadata));
        headers
    }

    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.append("comp", "metadata");
        query
    }
}

struct GetMetaDataOptions;

impl RequestOptions for GetMetaDataOptions {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.append("comp", "metadata");
        query
    }
}
