use crate::api::{ApiClient, ApiError, ApiResponse, EntryPoint, Params};

pub const ENTRY_POINT: EntryPoint = EntryPoint::Api;

/// User roles within companies and teams.
pub struct Roles<'a> {
    client: &'a ApiClient,
}

impl<'a> Roles<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        client.set_entry_point(ENTRY_POINT);
        Self { client }
    }

    /// Roles of the authorized user.
    pub async fn get_all(&self) -> Result<ApiResponse, ApiError> {
        self.client.get("/hr/v2/userroles", &Params::new()).await
    }

    /// Roles of a specific user, by user reference.
    pub async fn get_by_specific_user(&self, reference: &str) -> Result<ApiResponse, ApiError> {
        self.client
            .get(&format!("/hr/v2/userroles/{reference}"), &Params::new())
            .await
    }
}
