use super::*;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// Answers every call with a fixed payload and records what it was asked.
struct FixedClient {
    data: Value,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FixedClient {
    fn new(data: Value) -> Self {
        Self {
            data,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GraphQlClient for FixedClient {
    async fn query(&self, document: &str, variables: &Variables) -> Result<Value, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((document.to_string(), serde_json::to_value(variables)?));
        Ok(self.data.clone())
    }

    async fn mutate(&self, document: &str, input: Value) -> Result<Value, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((document.to_string(), input));
        Ok(self.data.clone())
    }
}

#[test]
fn test_variables_serialize_as_plain_scalars() {
    let mut variables = Variables::new();
    variables.insert("owner".to_string(), Variable::string("octo-org"));
    variables.insert("first".to_string(), Variable::Int(100));
    variables.insert("cursor".to_string(), Variable::Cursor(None));
    variables.insert("id".to_string(), Variable::id("BPR_1"));

    let value = serde_json::to_value(&variables).unwrap();

    assert_eq!(
        value,
        json!({
            "cursor": null,
            "first": 100,
            "id": "BPR_1",
            "owner": "octo-org",
        })
    );
}

#[test]
fn test_cursor_with_value_serializes_as_string() {
    let value = serde_json::to_value(Variable::Cursor(Some("Y3Vyc29y".to_string()))).unwrap();
    assert_eq!(value, json!("Y3Vyc29y"));
}

#[test]
fn test_into_data_returns_payload() {
    let response: GraphQlResponse =
        serde_json::from_value(json!({ "data": { "viewer": { "login": "octocat" } } })).unwrap();

    let data = response.into_data().unwrap();
    assert_eq!(data["viewer"]["login"], "octocat");
}

#[test]
fn test_into_data_prefers_errors_over_partial_data() {
    let response: GraphQlResponse = serde_json::from_value(json!({
        "data": { "node": null },
        "errors": [{
            "type": "NOT_FOUND",
            "path": ["node"],
            "message": "Could not resolve to a node with the global id of 'BPR_gone'"
        }]
    }))
    .unwrap();

    let err = response.into_data().unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::GraphQl(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].error_type.as_deref(), Some("NOT_FOUND"));
            assert_eq!(errors[0].path, vec![json!("node")]);
        }
        other => panic!("Expected GraphQl error, got {other:?}"),
    }
}

#[test]
fn test_into_data_without_data_or_errors_is_invalid() {
    let response: GraphQlResponse = serde_json::from_value(json!({})).unwrap();

    assert!(matches!(response.into_data(), Err(Error::InvalidResponse)));
}

#[test]
fn test_request_body_shape() {
    let body = request_body("query { viewer { login } }", json!({}));

    assert_eq!(body["query"], "query { viewer { login } }");
    assert_eq!(body["variables"], json!({}));
}

#[derive(Debug, Deserialize)]
struct Viewer {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: Viewer,
}

#[tokio::test]
async fn test_query_as_decodes_data() {
    let client = FixedClient::new(json!({ "viewer": { "login": "octocat" } }));

    let data: ViewerData = query_as(&client, "query { viewer { login } }", &Variables::new())
        .await
        .unwrap();

    assert_eq!(data.viewer.login, "octocat");
    assert_eq!(client.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_query_as_reports_shape_mismatch() {
    let client = FixedClient::new(json!({ "somethingElse": true }));

    let result: Result<ViewerData, Error> =
        query_as(&client, "query { viewer { login } }", &Variables::new()).await;

    assert!(matches!(result, Err(Error::Deserialization(_))));
}

#[tokio::test]
async fn test_mutate_as_serializes_input() {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        branch_protection_rule_id: String,
    }

    let client = FixedClient::new(json!({ "deleteBranchProtectionRule": {} }));
    let input = Input {
        branch_protection_rule_id: "BPR_1".to_string(),
    };

    let _: Value = mutate_as(&client, "mutation", &input).await.unwrap();

    let calls = client.calls.lock().unwrap();
    assert_eq!(calls[0].1, json!({ "branchProtectionRuleId": "BPR_1" }));
}
