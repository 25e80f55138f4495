// src/exec/capture.rs

//! Background draining of a child's stdout/stderr pipe.
//!
//! Bytes are appended to a shared buffer as they arrive, so whatever was read
//! so far is still available if the run is cut short.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::{trace, warn};

pub(crate) struct StreamCapture {
    name: &'static str,
    buf: Arc<Mutex<Vec<u8>>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl StreamCapture {
    /// Start draining `reader` on a Tokio task. `None` yields an empty capture.
    pub(crate) fn spawn<R>(name: &'static str, reader: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let handle = reader.map(|mut reader| {
            let buf = Arc::clone(&buf);
            tokio::spawn(async move {
                let mut chunk = [0u8; 8192];
                loop {
                    let n = match reader.read(&mut chunk).await {
                        Ok(n) => n,
                        Err(e) => return Err(e),
                    };
                    if n == 0 {
                        return Ok(());
                    }
                    trace!(stream = name, bytes = n, "captured output chunk");
                    buf.lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .extend_from_slice(&chunk[..n]);
                }
            })
        });

        Self { name, buf, handle }
    }

    /// Wait up to `limit` for the pipe to reach EOF.
    ///
    /// Returns `true` once the reader has finished (including on read error).
    pub(crate) async fn wait(&mut self, limit: Duration) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return true;
        };

        match tokio::time::timeout(limit, handle).await {
            Ok(joined) => {
                match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!(stream = self.name, error = %e, "error reading child output"),
                    Err(e) => warn!(stream = self.name, error = %e, "output reader task failed"),
                }
                self.handle = None;
                true
            }
            Err(_) => false,
        }
    }

    /// Stop reading (if still running) and decode what was captured.
    pub(crate) fn into_text(mut self) -> String {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        let bytes = std::mem::take(&mut *self.buf.lock().unwrap_or_else(|e| e.into_inner()));
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
