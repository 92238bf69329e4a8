//! # Message Protocol
//!
//! Defines the frames exchanged between the client and the remote compute
//! server:
//! - Action invocation (action name plus parameter dictionary)
//! - Action results (status, result payload, error text)
//! - Orderly session shutdown
//!
//! Messages are serialized to JSON and sent over TCP with a 4-byte length prefix.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Status code the server reports for a successful action.
pub const STATUS_OK: i64 = 0;

/// Core message enum for all communication with the compute server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// **Action Invocation**
    ///
    /// Sent by the client to run one action inside the server.
    ///
    /// # Fields
    /// - `request_id`: Per-session sequence number, echoed back in the result
    /// - `action`: Qualified action name (e.g. `"table.dropTable"`)
    /// - `params`: Parameter dictionary for the action
    Action {
        request_id: u64,
        action: String,
        params: Value,
    },

    /// **Action Result**
    ///
    /// Server reply to an [`Message::Action`].
    ///
    /// # Fields
    /// - `request_id`: ID of the invocation this answers
    /// - `status`: [`STATUS_OK`] on success, any other value is a failure
    /// - `result`: Result dictionary produced by the action
    /// - `error`: Server-side error text when `status` is non-zero
    ActionResult {
        request_id: u64,
        status: i64,
        #[serde(default)]
        result: Value,
        #[serde(default)]
        error: Option<String>,
    },

    /// **Disconnect**
    ///
    /// Sent by the client before closing the socket. The server releases the
    /// session; its tables follow the server's own lifecycle rules.
    Disconnect,
}

impl Message {
    /// Serialize a message to JSON bytes for transmission over the network.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize a message from JSON bytes received from the network.
    ///
    /// # Example
    /// ```ignore
    /// match Message::from_bytes(&received_bytes)? {
    ///     Message::ActionResult { status, .. } if status == STATUS_OK => {}
    ///     other => println!("Unexpected frame: {:?}", other),
    /// }
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_result_defaults() {
        let bytes = br#"{"ActionResult":{"request_id":4,"status":0}}"#;
        let msg = Message::from_bytes(bytes).unwrap();

        assert_eq!(
            msg,
            Message::ActionResult {
                request_id: 4,
                status: STATUS_OK,
                result: Value::Null,
                error: None,
            }
        );
    }

    #[test]
    fn test_action_frame_layout() {
        let msg = Message::Action {
            request_id: 1,
            action: "table.dropTable".to_string(),
            params: json!({"name": "quantify"}),
        };
        let value: Value = serde_json::from_slice(&msg.to_bytes().unwrap()).unwrap();

        assert_eq!(value["Action"]["action"], "table.dropTable");
        assert_eq!(value["Action"]["params"]["name"], "quantify");
    }
}
