use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiClient, ApiError, ApiResponse, EntryPoint, Params};

pub const ENTRY_POINT: EntryPoint = EntryPoint::Graphql;

/// A GraphQL request document.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }
}

/// Executes GraphQL requests.
///
/// Calls addressed to an organization need the tenant header, see
/// [`ApiClient::set_org_uid_header`].
pub struct Graphql<'a> {
    client: &'a ApiClient,
}

impl<'a> Graphql<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        client.set_entry_point(ENTRY_POINT);
        Self { client }
    }

    /// Sends the parameters as the request document, e.g. a lone `query`.
    pub async fn execute(&self, params: &Params) -> Result<ApiResponse, ApiError> {
        self.client.post("", params).await
    }

    /// Sends a request document, variables included.
    pub async fn execute_query(&self, request: &GraphqlRequest) -> Result<ApiResponse, ApiError> {
        self.client.post_json("", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_document_shape() {
        let request = GraphqlRequest::new("query Org($id: ID!) { organization(id: $id) { id } }")
            .with_variables(json!({"id": "42"}))
            .with_operation_name("Org");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "query": "query Org($id: ID!) { organization(id: $id) { id } }",
                "variables": {"id": "42"},
                "operationName": "Org"
            })
        );
        assert_eq!(
            serde_json::to_value(GraphqlRequest::new("{ user { id } }")).unwrap(),
            json!({"query": "{ user { id } }"})
        );
    }
}
