//! Length-prefixed string framing.
//!
//! Every string on the wire is one length byte followed by that many bytes.
//! Frames carry no escaping or checksum; peers are trusted.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::warn;

use crate::utils::error::FrameError;

/// Longest string a single frame can carry.
pub const MAX_FRAME_LEN: usize = u8::MAX as usize;

/// Cuts `s` down to what fits in one frame. The cut is byte-exact and may
/// split a multi-byte character.
pub fn truncate(s: &str) -> &[u8] {
    let bytes = s.as_bytes();
    &bytes[..bytes.len().min(MAX_FRAME_LEN)]
}

/// Appends the frame for `s` to `dst`.
pub fn encode_frame(s: &str, dst: &mut Vec<u8>) {
    let bytes = truncate(s);
    dst.reserve(bytes.len() + 1);
    dst.push(bytes.len() as u8);
    dst.extend_from_slice(bytes);
}

/// Buffered reading half of a framed connection.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    /// Reads one raw byte.
    pub async fn read_u8(&mut self) -> Result<u8, FrameError> {
        Ok(self.inner.read_u8().await?)
    }

    /// Reads one length-prefixed string.
    pub async fn read_string(&mut self) -> Result<String, FrameError> {
        let len = self.inner.read_u8().await?;
        let mut buf = vec![0; usize::from(len)];
        self.inner.read_exact(&mut buf).await?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Buffered writing half of a framed connection.
#[derive(Debug)]
pub struct FrameWriter<W> {
    inner: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
        }
    }

    /// Buffers `s` as one frame, truncated to `MAX_FRAME_LEN` bytes.
    ///
    /// Failures are logged and swallowed; the caller still flushes.
    pub async fn write_string(&mut self, s: &str) {
        let bytes = truncate(s);

        if let Err(e) = self.inner.write_u8(bytes.len() as u8).await {
            warn!(error = %e, "Failed to write message length to client");
        }

        if let Err(e) = self.inner.write_all(bytes).await {
            warn!(error = %e, "Failed to write message to client");
        }
    }

    pub async fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().await
    }

    /// Flushes and closes the write direction of the stream.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.inner.shutdown().await
    }
}
