#![allow(dead_code)]

use cas_biomed::{CasError, Result, Session};
use serde_json::{json, Value};

/// Columns of a table holding decoded images.
pub const DECODED_COLUMNS: [&str; 6] = [
    "_path_",
    "image",
    "dimension",
    "resolution",
    "imageFormat",
    "_id_",
];

/// Columns of a table holding encoded images.
pub const ENCODED_COLUMNS: [&str; 4] = ["_path_", "image", "_size_", "_id_"];

#[derive(Debug, Clone)]
pub struct Call {
    pub action: String,
    pub params: Value,
}

/// Session stub that records every action and answers from a script.
///
/// `table.columnInfo` is answered with the configured columns; actions named
/// in `failing` return a remote error, as does the n-th call to an action
/// registered with `failing_call`; actions given a reply with `responding`
/// return it; everything else succeeds with `{}`.
#[derive(Debug, Default)]
pub struct RecordingSession {
    pub calls: Vec<Call>,
    columns: Vec<String>,
    failing: Vec<String>,
    failing_calls: Vec<(String, usize)>,
    replies: Vec<(String, Value)>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn failing(mut self, action: &str) -> Self {
        self.failing.push(action.to_string());
        self
    }

    /// Fail only the `nth` call (1-based) to `action`.
    pub fn failing_call(mut self, action: &str, nth: usize) -> Self {
        self.failing_calls.push((action.to_string(), nth));
        self
    }

    /// Answer every call to `action` with `reply`.
    pub fn responding(mut self, action: &str, reply: Value) -> Self {
        self.replies.push((action.to_string(), reply));
        self
    }

    pub fn actions(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.action.as_str()).collect()
    }

    pub fn calls_to(&self, action: &str) -> Vec<&Call> {
        self.calls.iter().filter(|c| c.action == action).collect()
    }

    /// The single call to `action`.
    pub fn only(&self, action: &str) -> &Call {
        let calls = self.calls_to(action);
        assert_eq!(calls.len(), 1, "expected one call to {}", action);
        calls[0]
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Session for RecordingSession {
    async fn invoke(&mut self, action: &str, params: Value) -> Result<Value> {
        self.calls.push(Call {
            action: action.to_string(),
            params,
        });

        let nth = self.calls.iter().filter(|c| c.action == action).count();
        let fails_now = self
            .failing_calls
            .iter()
            .any(|(a, n)| a == action && *n == nth);

        if fails_now || self.failing.iter().any(|f| f == action) {
            return Err(CasError::Remote {
                action: action.to_string(),
                status: 1,
                message: format!("{} rejected by stub", action),
            });
        }

        if let Some((_, reply)) = self.replies.iter().find(|(a, _)| a == action) {
            return Ok(reply.clone());
        }

        if action == "table.columnInfo" {
            let rows: Vec<Value> = self
                .columns
                .iter()
                .map(|c| json!({ "Column": c }))
                .collect();
            return Ok(json!({ "ColumnInfo": rows }));
        }

        Ok(json!({}))
    }
}
