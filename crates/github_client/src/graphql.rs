//! GraphQL request and response plumbing.
//!
//! GitHub's v4 API is a single endpoint that accepts a document plus a map of
//! variables and answers with an envelope holding `data` and/or `errors`. This
//! module models the variables with typed scalars, unwraps the envelope, and
//! offers typed helpers on top of the untyped [`GraphQlClient`](crate::GraphQlClient)
//! transport.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, GraphQlClient};

#[cfg(test)]
#[path = "graphql_tests.rs"]
mod tests;

/// A typed GraphQL variable value.
///
/// The GitHub schema distinguishes `String`, `Int` and `ID` scalars, and
/// pagination cursors are nullable strings. All of them serialize to plain JSON
/// values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Variable {
    /// A `String!` argument
    String(String),
    /// An `Int!` argument
    Int(i32),
    /// An `ID!` argument
    Id(String),
    /// A nullable `String` cursor, `None` requests the first page
    Cursor(Option<String>),
}

impl Variable {
    pub fn string(value: impl Into<String>) -> Self {
        Variable::String(value.into())
    }

    pub fn id(value: impl Into<String>) -> Self {
        Variable::Id(value.into())
    }
}

/// Named variables for a GraphQL document.
pub type Variables = BTreeMap<String, Variable>;

/// A single error entry from a GraphQL response envelope.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphQlError {
    /// Human readable description of the problem
    pub message: String,

    /// GitHub specific error classification, e.g. `NOT_FOUND`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    /// Path to the field that failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Value>,
}

/// The `{data, errors}` envelope every GraphQL response is wrapped in.
#[derive(Debug, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,

    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// Unwraps the payload, turning reported errors into [`Error::GraphQl`].
    ///
    /// GitHub may return partial data next to errors (a `null` node plus a
    /// `NOT_FOUND` entry for instance). Errors always win so that nothing is
    /// silently dropped.
    pub fn into_data(self) -> Result<Value, Error> {
        if !self.errors.is_empty() {
            return Err(Error::GraphQl(self.errors));
        }

        self.data.ok_or(Error::InvalidResponse)
    }
}

/// Builds the request body posted to the GraphQL endpoint.
pub fn request_body(document: &str, variables: Value) -> Value {
    serde_json::json!({
        "query": document,
        "variables": variables,
    })
}

/// Runs a query and decodes its `data` into `T`.
pub async fn query_as<T>(
    client: &dyn GraphQlClient,
    document: &str,
    variables: &Variables,
) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let data = client.query(document, variables).await?;
    Ok(serde_json::from_value(data)?)
}

/// Runs a mutation with `input` bound to `$input` and decodes its `data` into `T`.
pub async fn mutate_as<I, T>(
    client: &dyn GraphQlClient,
    document: &str,
    input: &I,
) -> Result<T, Error>
where
    I: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let input = serde_json::to_value(input)?;
    let data = client.mutate(document, input).await?;
    Ok(serde_json::from_value(data)?)
}
