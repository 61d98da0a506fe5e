use crate::api::{ApiClient, ApiError, ApiResponse, EntryPoint, Params};

pub const ENTRY_POINT: EntryPoint = EntryPoint::Api;

/// Days with logged work, per company or per contract.
///
/// Dates are given as `yyyymmdd`.
pub struct Workdays<'a> {
    client: &'a ApiClient,
}

impl<'a> Workdays<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        client.set_entry_point(ENTRY_POINT);
        Self { client }
    }

    pub async fn get_by_company(
        &self,
        company: &str,
        from_date: &str,
        till_date: &str,
        params: &Params,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .get(
                &format!("/team/v3/workdays/companies/{company}/{from_date},{till_date}"),
                params,
            )
            .await
    }

    pub async fn get_by_contract(
        &self,
        contract: &str,
        from_date: &str,
        till_date: &str,
        params: &Params,
    ) -> Result<ApiResponse, ApiError> {
        self.client
            .get(
                &format!("/team/v3/workdays/contracts/{contract}/{from_date},{till_date}"),
                params,
            )
            .await
    }
}
