//! Scripted in-memory GraphQL client for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use github_client::{Error, GraphQlClient, Variables};
use serde_json::Value;

/// A request the client received.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Query { document: String, variables: Value },
    Mutate { document: String, input: Value },
}

impl Call {
    pub(crate) fn document(&self) -> &str {
        match self {
            Call::Query { document, .. } | Call::Mutate { document, .. } => document,
        }
    }

    pub(crate) fn variables(&self) -> &Value {
        match self {
            Call::Query { variables, .. } => variables,
            Call::Mutate { .. } => panic!("Expected a query, got a mutation"),
        }
    }

    pub(crate) fn input(&self) -> &Value {
        match self {
            Call::Mutate { input, .. } => input,
            Call::Query { .. } => panic!("Expected a mutation, got a query"),
        }
    }
}

/// Answers requests in order from a script and records every call.
#[derive(Clone, Default)]
pub(crate) struct ScriptedClient {
    responses: Arc<Mutex<VecDeque<Result<Value, Error>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a successful `data` payload.
    pub(crate) fn respond(self, data: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(data));
        self
    }

    /// Queues a failure.
    pub(crate) fn fail(self, error: Error) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self, call: Call) -> Result<Value, Error> {
        self.calls.lock().unwrap().push(call.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("No scripted response left for {:?}", call.document()))
    }
}

#[async_trait]
impl GraphQlClient for ScriptedClient {
    async fn query(&self, document: &str, variables: &Variables) -> Result<Value, Error> {
        self.next_response(Call::Query {
            document: document.to_string(),
            variables: serde_json::to_value(variables).unwrap(),
        })
    }

    async fn mutate(&self, document: &str, input: Value) -> Result<Value, Error> {
        self.next_response(Call::Mutate {
            document: document.to_string(),
            input,
        })
    }
}
