//! Transport layer for browser ↔ host communication.
//!
//! Implements the native messaging framing: `[4-byte little-endian
//! length][JSON payload]` on both directions of the stdio pipe.
//! Length-prefixing avoids scanning for delimiters inside JSON payloads
//! and matches what the browser runtime expects.

pub mod protocol;

pub use protocol::{Display, Response};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum message size (1 MB). Browsers cap native messages sent by the
/// host at this size, so anything larger means a corrupt frame.
const MAX_MESSAGE_SIZE: u32 = 1024 * 1024;

/// A violation of the framing protocol.
///
/// Always fatal to the session: a length-prefixed stream offers no way
/// to resynchronize after a malformed frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("stream closed inside a length prefix ({got} of 4 bytes)")]
    TruncatedLength { got: usize },

    #[error("stream closed inside a payload ({declared} bytes declared)")]
    TruncatedPayload { declared: u32 },

    #[error("frame length {len} exceeds maximum message size")]
    Oversized { len: u64 },

    #[error("invalid frame payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read one length-prefixed JSON message from a reader.
///
/// Returns `Ok(None)` if the stream closes before any length byte
/// arrives — the normal shutdown signal. A stream that closes anywhere
/// past that point is a framing error. Short reads are tolerated: the
/// length and payload are each accumulated across as many underlying
/// reads as it takes.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Value>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        let n = reader.read(&mut len_buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(FrameError::TruncatedLength { got: filled });
        }
        filled += n;
    }

    let len = u32::from_le_bytes(len_buf);
    if len > MAX_MESSAGE_SIZE {
        return Err(FrameError::Oversized {
            len: u64::from(len),
        });
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            FrameError::TruncatedPayload { declared: len }
        } else {
            FrameError::Io(e)
        }
    })?;

    Ok(Some(serde_json::from_slice(&payload)?))
}

/// Write one length-prefixed JSON message to a writer.
///
/// The prefix and payload are assembled into a single buffer before any
/// byte reaches the writer, so a partial frame is never observable
/// without its length prefix.
pub async fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_vec(message)?;
    if payload.len() > MAX_MESSAGE_SIZE as usize {
        return Err(FrameError::Oversized {
            len: payload.len() as u64,
        });
    }
    let len = payload.len() as u32;

    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&payload);

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}
