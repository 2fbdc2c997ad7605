//! Keyboard-wedge scanner input: raw bytes cut into terminated chunks.

use anyhow::{Context, Result};
use client_core::RedemptionFlow;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::warn;

const READ_BUFFER_BYTES: usize = 1024;

/// Splits a byte stream at every `\r` or `\n`. A `\n` directly after a
/// `\r` belongs to the same terminator and is dropped.
#[derive(Debug, Default)]
pub struct ScanChunker {
    pending: Vec<u8>,
    after_cr: bool,
}

impl ScanChunker {
    /// Feeds raw bytes and returns every chunk they completed, terminator
    /// included. Chunks that are not valid UTF-8 are logged and skipped.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut chunks = Vec::new();
        for &byte in bytes {
            if byte == b'\n' && self.after_cr && self.pending.is_empty() {
                self.after_cr = false;
                continue;
            }
            self.after_cr = false;
            self.pending.push(byte);

            if byte == b'\r' || byte == b'\n' {
                self.after_cr = byte == b'\r';
                let raw = std::mem::take(&mut self.pending);
                if let Some(chunk) = decode_chunk(raw) {
                    chunks.push(chunk);
                }
            }
        }
        chunks
    }

    /// Whatever was read after the last terminator.
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        decode_chunk(self.pending)
    }
}

fn decode_chunk(raw: Vec<u8>) -> Option<String> {
    match String::from_utf8(raw) {
        Ok(chunk) => Some(chunk),
        Err(err) => {
            warn!(bytes = err.as_bytes().len(), "skipping scanner input that is not UTF-8");
            None
        }
    }
}

/// Drives the flow from `reader` until EOF. Only I/O errors end the session.
pub async fn pump_scanner_input<R>(mut reader: R, flow: &RedemptionFlow) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunker = ScanChunker::default();
    let mut buf = [0u8; READ_BUFFER_BYTES];
    loop {
        let read = reader
            .read(&mut buf)
            .await
            .context("failed to read scanner input")?;
        if read == 0 {
            break;
        }
        for chunk in chunker.push(&buf[..read]) {
            flow.on_streamed_input(&chunk).await;
        }
    }

    if let Some(rest) = chunker.finish() {
        flow.on_streamed_input(&rest).await;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
