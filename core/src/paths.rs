//! Path operations for hierarchical-namespace (data lake) filesystems,
//! addressed as `/{filesystem}/{path}`.

use std::sync::Arc;

use crate::client::{BaseClient, RequestConfig, API_VERSION};
use crate::context::Context;
use crate::error::StorageError;
use crate::executor::Execute;
use crate::http::{HttpMethod, HttpResponse, QueryParams};
use crate::options::{NoOptions, RequestOptions};

/// Client for data lake path operations.
#[derive(Clone)]
pub struct PathsClient {
    client: BaseClient,
}

/// What kind of path to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathResource {
    Directory,
    File,
}

impl PathResource {
    fn as_str(&self) -> &'static str {
        match self {
            PathResource::Directory => "directory",
            PathResource::File => "file",
        }
    }
}

#[derive(Debug)]
pub struct CreateInput {
    pub resource: PathResource,
}

#[derive(Debug)]
pub struct CreateResponse {
    pub http_response: HttpResponse,
}

#[derive(Debug)]
pub struct DeleteResponse {
    pub http_response: HttpResponse,
}

impl PathsClient {
    pub fn new(base_uri: &str, executor: Arc<dyn Execute>) -> Result<Self, StorageError> {
        Ok(Self {
            client: BaseClient::new(base_uri, API_VERSION, executor)?,
        })
    }

    /// Creates a file or directory path within the filesystem.
    pub fn create(
        &self,
        ctx: &Context,
        filesystem_name: &str,
        path: &str,
        input: CreateInput,
    ) -> Result<CreateResponse, StorageError> {
        validate_names(filesystem_name, path)?;

        let config = RequestConfig {
            method: HttpMethod::Put,
            path: format!("/{filesystem_name}/{path}"),
            content_type: None,
            expected_status_codes: vec![201],
            options: &CreateOptions { input: &input },
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(CreateResponse { http_response })
    }

    /// Deletes the path.
    pub fn delete(
        &self,
        ctx: &Context,
        filesystem_name: &str,
        path: &str,
    ) -> Result<DeleteResponse, StorageError> {
        validate_names(filesystem_name, path)?;

        let config = RequestConfig {
            method: HttpMethod::Delete,
            path: format!("/{filesystem_name}/{path}"),
            content_type: None,
            expected_status_codes: vec![200],
            options: &NoOptions,
        };
        let request = self.client.build_request(&config)?;
        let http_response = self.client.execute(ctx, &request)?;
        Ok(DeleteResponse { http_response })
    }
}

fn validate_names(filesystem_name: &str, path: &str) -> Result<(), StorageError> {
    if filesystem_name.is_empty() {
        return Err(StorageError::Validation(
            "`filesystem_name` cannot be an empty string".to_string(),
        ));
    }
    if filesystem_name.to_lowercase() != filesystem_name {
        return Err(StorageError::Validation(
            "`filesystem_name` must be a lower-cased string".to_string(),
        ));
    }
    if path.is_empty() {
        return Err(StorageError::Validation(
            "`path` cannot be an empty string".to_string(),
        ));
    }
    Ok(())
}

struct CreateOptions<'a> {
    input: &'a CreateInput,
}

impl RequestOptions for CreateOptions<'_> {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.append("resource", self.input.resource.as_str());
        query
    }
}
