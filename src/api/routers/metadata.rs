use std::marker::PhantomData;

use crate::api::{ApiClient, ApiError, ApiResponse, EntryPoint, Params};

pub const ENTRY_POINT: EntryPoint = EntryPoint::Api;

/// Categories, skills, regions and other reference data.
///
/// Every one of these endpoints was retired upstream; the same data is
/// served by GraphQL now. The methods remain so that callers get a clear
/// [`ApiError::EndpointRetired`] instead of an opaque 404.
pub struct Metadata<'a> {
    client: PhantomData<&'a ApiClient>,
}

fn retired(endpoint: &'static str) -> Result<ApiResponse, ApiError> {
    tracing::debug!(endpoint, "call to a retired endpoint");
    Err(ApiError::EndpointRetired { endpoint })
}

impl<'a> Metadata<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        client.set_entry_point(ENTRY_POINT);
        Self {
            client: PhantomData,
        }
    }

    pub async fn categories_v2(&self) -> Result<ApiResponse, ApiError> {
        retired("metadata categories (v2)")
    }

    pub async fn skills(&self) -> Result<ApiResponse, ApiError> {
        retired("metadata skills")
    }

    pub async fn skills_v2(&self) -> Result<ApiResponse, ApiError> {
        retired("metadata skills (v2)")
    }

    pub async fn specialties(&self) -> Result<ApiResponse, ApiError> {
        retired("metadata specialties")
    }

    pub async fn regions(&self) -> Result<ApiResponse, ApiError> {
        retired("metadata regions")
    }

    pub async fn tests(&self) -> Result<ApiResponse, ApiError> {
        retired("metadata tests")
    }

    pub async fn reasons(&self, _params: &Params) -> Result<ApiResponse, ApiError> {
        retired("metadata reasons")
    }
}
