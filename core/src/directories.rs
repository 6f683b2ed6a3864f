//! Directory operations on file shares, addressed as `/{share}/{path}` with
//! `restype=directory`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::{BaseClient, RequestConfig, API_VERSION};
use crate::context::Context;
use crate::error::StorageError;
use crate::executor::Execute;
use crate::http::{Headers, HttpMethod, HttpResponse, QueryParams};
use crate::metadata;
use crate::options::RequestOptions;

/// Client for file-share directory operations.
#[derive(Clone)]
pub struct DirectoriesClient {
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

impl DirectoriesClient {
    pub fn new(base_uri: &str, executor: Arc<dyn Execute>) -> Result<Self, StorageError> {
        Ok(Self {
            client: BaseClient::new(base_uri, API_VERSION, executor)?,
        })
    }

    /// Creates the directory within the share. Parent directories must exist.
    pub fn create(
        &self,
        ctx: &Context,
        share_name: &str,
        directory_path: &str,
        input: CreateInput,
    ) -> Result<CreateResponse, StorageError> {
        validate_names(share_name, directory_path)?;
        if let Err(msg) = metadata::validate(&input.metadata) {
            return Err(StorageError::Validation(format!(
                "`input.metadata` is not valid: {msg}"
            )));
        }

        let config = RequestConfig {
            method: HttpMethod::Put,
            path: format!("/{share_name}/{directory_path}"),
            content_type: None,
            expected_status_codes: vec![201],
            options: &CreateOptions { input: &input },
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(CreateResponse { http_response })
    }

    /// Deletes the directory, which must be empty.
    pub fn delete(
        &self,
        ctx: &Context,
        share_name: &str,
        directory_path: &str,
    ) -> Result<DeleteResponse, StorageError> {
        validate_names(share_name, directory_path)?;

        let config = RequestConfig {
            method: HttpMethod::Delete,
            path: format!("/{share_name}/{directory_path}"),
            content_type: None,
            expected_status_codes: vec![202],
            options: &DirectoryOptions,
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(DeleteResponse { http_response })
    }
}

fn validate_names(share_name: &str, directory_path: &str) -> Result<(), StorageError> {
    if share_name.is_empty() {
        return Err(StorageError::Validation(
            "`share_name` cannot be an empty string".to_string(),
        ));
    }
    if share_name.to_lowercase() != share_name {
        return Err(StorageError::Validation(
            "`share_name` must be a lower-cased string".to_string(),
        ));
    }
    if directory_path.is_empty() {
        return Err(StorageError::Validation(
            "`directory_path` cannot be an empty string".to_string(),
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

    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.append("restype", "directory");
        query
    }
}

struct DirectoryOptions;

impl RequestOptions for DirectoryOptions {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.append("restype", "directory");
        query
    }
}
