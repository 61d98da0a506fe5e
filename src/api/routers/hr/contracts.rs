use crate::api::{ApiClient, ApiError, ApiResponse, EntryPoint, Params};

pub const ENTRY_POINT: EntryPoint = EntryPoint::Api;

/// Contract lifecycle: suspending, restarting and ending contracts.
pub struct Contracts<'a> {
    client: &'a ApiClient,
}

impl<'a> Contracts<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        client.set_entry_point(ENTRY_POINT);
        Self { client }
    }

    /// Expects a `message` parameter explaining the suspension.
    pub async fn suspend_contract(
        &self,
        reference: &str,
        params: &Params,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .put(&format!("/hr/v2/contracts/{reference}/suspend"), params)
            .await
    }

    pub async fn restart_contract(
        &self,
        reference: &str,
        params: &Params,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .put(&format!("/hr/v2/contracts/{reference}/restart"), params)
            .await
    }

    /// Expects `reason` and `would_hire_again` parameters.
    pub async fn end_contract(
        &self,
        reference: &str,
        params: &Params,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .delete(&format!("/hr/v2/contracts/{reference}"), params)
            .await
    }
}
