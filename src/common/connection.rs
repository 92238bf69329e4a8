//! # TCP Connection Abstraction
//!
//! Wraps a TCP stream with message framing for the action protocol.
//!
//! ## Wire Protocol
//!
//! Messages are sent with a 4-byte length prefix (big-endian) followed by JSON data:
//! ```text
//! [4 bytes: message length] [N bytes: JSON message data]
//! ```

use log::error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use super::messages::Message;
use crate::error::{CasError, Result};

/// Maximum allowed frame size (100MB). Result tables can be large.
pub const MAX_MESSAGE_SIZE: usize = 100 * 1024 * 1024;

/// Framed connection over any async byte stream (a `TcpStream` in production).
pub struct Connection<T = TcpStream> {
    stream: T,
}

impl<T> Connection<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a new Connection from an established stream.
    ///
    /// # Example
    /// ```ignore
    /// let stream = TcpStream::connect("127.0.0.1:5570").await?;
    /// let mut conn = Connection::new(stream);
    /// ```
    pub fn new(stream: T) -> Self {
        Self { stream }
    }

    /// Read one message from the connection.
    ///
    /// # Returns
    /// - `Ok(Some(Message))`: A frame was read and decoded
    /// - `Ok(None)`: The peer closed the connection before a new frame started
    /// - `Err`: I/O failure, oversized frame, or undecodable payload
    pub async fn read_message(&mut self) -> Result<Option<Message>> {
        let mut length_buf = [0u8; 4];

        match self.stream.read_exact(&mut length_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let length = u32::from_be_bytes(length_buf) as usize;
        if length > MAX_MESSAGE_SIZE {
            error!(
                "Frame too large: {} bytes (max: {} bytes)",
                length, MAX_MESSAGE_SIZE
            );
            return Err(CasError::FrameTooLarge(length));
        }

        let mut data = vec![0u8; length];
        self.stream.read_exact(&mut data).await?;

        Message::from_bytes(&data).map(Some)
    }

    /// Write one message: length prefix, JSON body, flush.
    ///
    /// Payloads over [`MAX_MESSAGE_SIZE`] are rejected before anything is written.
    pub async fn write_message(&mut self, message: &Message) -> Result<()> {
        let data = message.to_bytes()?;
        if data.len() > MAX_MESSAGE_SIZE {
            error!(
                "Refusing to send frame of {} bytes (max: {} bytes)",
                data.len(),
                MAX_MESSAGE_SIZE
            );
            return Err(CasError::FrameTooLarge(data.len()));
        }
        let length = data.len() as u32;

        self.stream.write_all(&length.to_be_bytes()).await?;
        self.stream.write_all(&data).await?;
        self.stream.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_frames_cross_a_duplex_pipe() {
        let (client, server) = tokio::io::duplex(4096);
        let mut client = Connection::new(client);
        let mut server = Connection::new(server);

        let sent = Message::Action {
            request_id: 7,
            action: "builtins.loadActionSet".to_string(),
            params: json!({"actionSet": "fedsql"}),
        };
        client.write_message(&sent).await.unwrap();

        let received = server.read_message().await.unwrap();
        assert_eq!(received, Some(sent));
    }

    #[tokio::test]
    async fn test_closed_peer_reads_none() {
        let (client, server) = tokio::io::duplex(64);
        drop(client);
        let mut server = Connection::new(server);

        assert!(server.read_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oversized_frame_rejected() {
        let (mut raw, server) = tokio::io::duplex(64);
        let mut server = Connection::new(server);

        let length = (MAX_MESSAGE_SIZE as u32) + 1;
        raw.write_all(&length.to_be_bytes()).await.unwrap();

        assert!(matches!(
            server.read_message().await,
            Err(CasError::FrameTooLarge(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_frame_not_written() {
        let (client, mut raw) = tokio::io::duplex(64);
        let mut client = Connection::new(client);

        let huge = Message::Action {
            request_id: 1,
            action: "fedSql.execDirect".to_string(),
            params: json!({ "query": "x".repeat(MAX_MESSAGE_SIZE) }),
        };
        assert!(matches!(
            client.write_message(&huge).await,
            Err(CasError::FrameTooLarge(len)) if len > MAX_MESSAGE_SIZE
        ));

        drop(client);
        let mut rest = Vec::new();
        raw.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }
}
