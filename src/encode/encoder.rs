use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::BytesMut;
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::error::EncodeResult;
use crate::chunk::FileSlice;
use crate::progress::{ProgressCallback, ProgressTracker};

const READ_BLOCK_SIZE: usize = 64 * 1024;

/// Reads a file slice block by block and produces its base64 payload.
///
/// If a progress callback is supplied, a sample is emitted after every
/// block from bytes read so far, elapsed time, and bytes remaining. The
/// source is never mutated.
#[derive(Debug, Clone, Copy)]
pub struct Base64Encoder {
    block_size: usize,
}

impl Default for Base64Encoder {
    fn default() -> Self {
        Self {
            block_size: READ_BLOCK_SIZE,
        }
    }
}

impl Base64Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    /// Encode the slice's bytes as standard padded base64.
    pub async fn encode_slice(
        &self,
        slice: &FileSlice<'_>,
        on_progress: Option<&ProgressCallback>,
    ) -> EncodeResult<String> {
        let mut file = File::open(slice.source().path()).await?;
        file.seek(SeekFrom::Start(slice.offset())).await?;

        let tracker = ProgressTracker::new(slice.len());
        let mut raw = BytesMut::with_capacity(slice.len() as usize);
        let mut buf = vec![0u8; self.block_size];
        let mut remaining = slice.len();

        while remaining > 0 {
            let want = remaining.min(self.block_size as u64) as usize;
            let read = file.read(&mut buf[..want]).await?;
            if read == 0 {
                // Source shrank under us mid-read.
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("source truncated with {remaining} bytes unread"),
                )
                .into());
            }

            raw.extend_from_slice(&buf[..read]);
            remaining -= read as u64;

            if let Some(callback) = on_progress {
                callback(tracker.sample(slice.len() - remaining));
            }
        }

        Ok(STANDARD.encode(&raw))
    }
}
