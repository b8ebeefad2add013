//! # Handlers consume the stream of harvested records.
//!
//! The watcher multiplexes every worker's output into a single channel
//! and hands it to a [`Handler`], which consumes it to end-of-stream.
//! A handler's terminal error becomes the watcher's exit status.
//!
//! [`JsonHandler`] is the stock implementation: one JSON document per
//! line on any async writer, typically an [`Output`](crate::Output).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::error;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};

use crate::error::HandlerError;
use crate::resource::{AuditRecord, ResourceAudit};

/// Consumer of the watcher's output stream.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Consumes resources until the stream closes.
    ///
    /// The stream closes when the watcher shuts down; returning early
    /// with an error tears the pipeline down.
    async fn handle(&self, stream: mpsc::Receiver<ResourceAudit>) -> Result<(), HandlerError>;
}

/// Line format emitted by [`JsonHandler`]: the raw record enriched with
/// the content type and the sweep's request time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonRecord {
    pub content_type: String,
    pub request_time: DateTime<Utc>,
    pub record: AuditRecord,
}

/// Writes each record as one JSON document per line.
///
/// Records that fail to serialize are logged and skipped; a write
/// failure is terminal.
pub struct JsonHandler<W> {
    writer: Mutex<W>,
    indent: bool,
}

impl<W> JsonHandler<W> {
    pub fn new(writer: W, indent: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            indent,
        }
    }
}

#[async_trait]
impl<W: AsyncWrite + Send + Unpin + 'static> Handler for JsonHandler<W> {
    async fn handle(&self, mut stream: mpsc::Receiver<ResourceAudit>) -> Result<(), HandlerError> {
        let mut writer = self.writer.lock().await;
        while let Some(resource) = stream.recv().await {
            let record = JsonRecord {
                content_type: resource.content_type.to_string(),
                request_time: resource.request_time,
                record: resource.record,
            };
            let encoded = if self.indent {
                serde_json::to_vec_pretty(&record)
            } else {
                serde_json::to_vec(&record)
            };
            let mut line = match encoded {
                Ok(line) => line,
                Err(err) => {
                    error!("handler: encoding record: {err}");
                    continue;
                }
            };
            line.push(b'\n');
            writer.write_all(&line).await?;
        }
        writer.flush().await?;
        Ok(())
    }
}
