use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::provider::{LogError, LogResult};

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// An open byte stream to a single log file, local or remote. The
/// underlying file handle or HTTP response is released when the stream is
/// dropped, on every exit path.
#[derive(Debug)]
pub enum LogStream {
    Local { name: String, file: File },
    Remote { name: String, response: reqwest::Response },
}

impl LogStream {
    /// Bare filename of the log this stream reads.
    pub fn name(&self) -> &str {
        match self {
            Self::Local { name, .. } => name,
            Self::Remote { name, .. } => name,
        }
    }

    /// Total length in bytes, when the source declares one up front.
    pub fn len_hint(&self) -> Option<u64> {
        match self {
            Self::Local { .. } => None,
            Self::Remote { response, .. } => response.content_length(),
        }
    }

    /// Pull the next chunk of bytes, or `None` at end of stream.
    pub async fn chunk(&mut self) -> LogResult<Option<Vec<u8>>> {
        match self {
            Self::Local { name, file } => {
                let mut buf = vec![0u8; READ_CHUNK_SIZE];
                let n = file
                    .read(&mut buf)
                    .await
                    .map_err(|e| LogError::retrieval(name.clone(), e))?;
                if n == 0 {
                    Ok(None)
                } else {
                    buf.truncate(n);
                    Ok(Some(buf))
                }
            }
            Self::Remote { name, response } => response
                .chunk()
                .await
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                .map_err(|e| LogError::retrieval(name.clone(), e)),
        }
    }

    /// Drain the stream into memory.
    pub async fn into_bytes(mut self) -> LogResult<Vec<u8>> {
        let mut data = Vec::new();
        while let Some(chunk) = self.chunk().await? {
            data.extend_from_slice(&chunk);
        }
        Ok(data)
    }
}
