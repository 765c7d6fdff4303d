//! Lifecycle event sources.
//!
//! The host delivers lifecycle notifications as text lines, one per event
//! (see [`parse_event_line`] for the accepted forms).

use std::future::Future;

use thiserror::Error;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tracing::trace;
use tracing::warn;

use crate::lifecycle::LifecycleEvent;
use crate::lifecycle::parse_event_line;

/// Errors that can occur while reading lifecycle events.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read lifecycle event: {0}")]
    ReadError(#[from] std::io::Error),
}

/// Trait for lifecycle event sources.
pub trait LifecycleSource {
    /// Get the next lifecycle event.
    ///
    /// Resolves to `Ok(None)` once the source is exhausted.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<LifecycleEvent>, SourceError>>;
}

/// Line-oriented source over any buffered async reader.
pub struct LineSource<R> {
    reader: R,
    line: String,
}

impl<R> LineSource<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R> LifecycleSource for LineSource<R>
where
    R: AsyncBufRead + Unpin,
{
    async fn next_event(&mut self) -> Result<Option<LifecycleEvent>, SourceError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line).await? == 0 {
                return Ok(None);
            }

            trace!("Received line: {}", self.line.trim());
            if let Some(event) = parse_event_line(&self.line) {
                return Ok(Some(event));
            }

            let line = self.line.trim();
            if !line.is_empty() && !line.starts_with('#') {
                warn!("Ignoring unrecognized lifecycle line: {:?}", line);
            }
        }
    }
}
