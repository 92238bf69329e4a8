//! # Sessions
//!
//! A [`Session`] is anything that can run a named action on the compute server
//! and hand back its result dictionary. Every operation in this crate is
//! written against the trait, so the same request sequences run over a live
//! [`RemoteSession`] or over a recording stub in tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cas_biomed::client::{RemoteSession, Session};
//!
//! let mut session = RemoteSession::connect("127.0.0.1:5570").await?;
//! session.load_action_set("table").await?;
//! session.invoke("table.dropTable", json!({"name": "scratch", "quiet": true})).await?;
//! session.close().await?;
//! ```

use log::{debug, error};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::metrics::ActionMetrics;
use crate::common::connection::Connection;
use crate::common::messages::{Message, STATUS_OK};
use crate::error::{CasError, Result};

/// A handle to a remote compute context.
///
/// Calls are strictly sequential: each `invoke` is one blocking round trip,
/// and `&mut self` keeps a session from being shared across concurrent callers.
#[allow(async_fn_in_trait)]
pub trait Session {
    /// Run `action` with `params` and return the action's result dictionary.
    async fn invoke(&mut self, action: &str, params: Value) -> Result<Value>;

    /// Enable an action set so its actions can be invoked.
    async fn load_action_set(&mut self, name: &str) -> Result<()> {
        self.invoke("builtins.loadActionSet", json!({ "actionSet": name }))
            .await
            .map(|_| ())
    }
}

/// Session over a framed JSON connection to the compute server.
///
/// A reply that cannot be matched to its request, or a transport failure,
/// leaves the stream out of step with the server. The session is then marked
/// broken and every later `invoke` fails with [`CasError::SessionBroken`].
pub struct RemoteSession<T = TcpStream> {
    conn: Connection<T>,
    next_request_id: u64,
    metrics: Option<Arc<Mutex<ActionMetrics>>>,
    broken: Option<String>,
}

impl RemoteSession<TcpStream> {
    /// Connect to the server at `address` (e.g. "127.0.0.1:5570").
    pub async fn connect(address: &str) -> Result<Self> {
        let stream = TcpStream::connect(address).await?;
        debug!("Connected to compute server at {}", address);
        Ok(Self::new(stream))
    }
}

impl<T> RemoteSession<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: T) -> Self {
        Self {
            conn: Connection::new(stream),
            next_request_id: 1,
            metrics: None,
            broken: None,
        }
    }

    /// Record latency and outcome of every action into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<Mutex<ActionMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Tell the server the session is done and drop the connection.
    pub async fn close(mut self) -> Result<()> {
        self.conn.write_message(&Message::Disconnect).await
    }

    async fn round_trip(&mut self, request_id: u64, action: &str, params: Value) -> Result<Value> {
        self.conn
            .write_message(&Message::Action {
                request_id,
                action: action.to_string(),
                params,
            })
            .await?;

        match self.conn.read_message().await? {
            Some(Message::ActionResult {
                request_id: answered,
                status,
                result,
                error,
            }) if answered == request_id => {
                if status == STATUS_OK {
                    Ok(result)
                } else {
                    Err(CasError::Remote {
                        action: action.to_string(),
                        status,
                        message: error.unwrap_or_else(|| "Unknown error".to_string()),
                    })
                }
            }
            Some(other) => Err(CasError::UnexpectedResponse {
                action: action.to_string(),
                detail: format!("{:?}", other),
            }),
            None => Err(CasError::ConnectionClosed),
        }
    }
}

impl<T> Session for RemoteSession<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    async fn invoke(&mut self, action: &str, params: Value) -> Result<Value> {
        if let Some(reason) = &self.broken {
            return Err(CasError::SessionBroken(reason.clone()));
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;

        debug!("-> #{} {} {}", request_id, action, params);
        let started = Instant::now();
        let outcome = self.round_trip(request_id, action, params).await;

        if let Err(e) = &outcome {
            error!("Action {} (#{}) failed: {}", action, request_id, e);
            if !matches!(e, CasError::Remote { .. }) {
                self.broken = Some(e.to_string());
            }
        }
        if let Some(metrics) = &self.metrics {
            if let Ok(mut metrics) = metrics.lock() {
                metrics.record_action(
                    action,
                    started.elapsed(),
                    outcome.as_ref().err().map(|e| e.to_string()),
                );
            }
        }

        outcome
    }
}
