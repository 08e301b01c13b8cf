use super::*;
use serde_json::json;

#[test]
fn test_page_info_deserialization() {
    let info: PageInfo = serde_json::from_value(json!({
        "endCursor": "Y3Vyc29yOnYyOpHOAAAAZA==",
        "hasNextPage": true
    }))
    .expect("Failed to deserialize PageInfo");

    assert_eq!(info.end_cursor.as_deref(), Some("Y3Vyc29yOnYyOpHOAAAAZA=="));
    assert!(info.has_next_page);
}

#[test]
fn test_page_info_with_null_cursor() {
    let info: PageInfo =
        serde_json::from_value(json!({ "endCursor": null, "hasNextPage": false }))
            .expect("Failed to deserialize PageInfo");

    assert_eq!(info.end_cursor, None);
    assert!(!info.has_next_page);
}

#[test]
fn test_connection_with_null_nodes_is_empty() {
    let connection: Connection<RepositoryRef> =
        serde_json::from_value(json!({ "nodes": null })).expect("Failed to deserialize");

    assert!(connection.nodes.is_empty());
    assert!(connection.page_info.is_none());
}

#[test]
fn test_connection_with_missing_nodes_is_empty() {
    let connection: Connection<RepositoryRef> =
        serde_json::from_value(json!({})).expect("Failed to deserialize");

    assert!(connection.nodes.is_empty());
}

#[test]
fn test_connection_with_page_info() {
    let connection: Connection<RepositoryRef> = serde_json::from_value(json!({
        "nodes": [{ "id": "R_1", "name": "widgets" }],
        "pageInfo": { "endCursor": "abc", "hasNextPage": false }
    }))
    .expect("Failed to deserialize");

    assert_eq!(
        connection.nodes,
        vec![RepositoryRef {
            id: "R_1".to_string(),
            name: "widgets".to_string()
        }]
    );
    assert_eq!(
        connection.page_info,
        Some(PageInfo {
            end_cursor: Some("abc".to_string()),
            has_next_page: false
        })
    );
}
