use crate::Result;
use crate::transport::ToolTransport;
use optimus_core::ToolResult;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// What became of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The newest invocation finished; its result is now the session's latest.
    Current(ToolResult),
    /// A newer invocation began first, so this result was dropped.
    Superseded,
}

/// Issues tool calls and keeps only the result of the most recent one.
///
/// Each call takes a generation number when it is issued. A result is stored
/// only if no newer call was issued meanwhile; stale calls are left to finish
/// and their results discarded.
#[derive(Clone)]
pub struct ToolSession {
    transport: Arc<dyn ToolTransport>,
    generation: Arc<AtomicU64>,
    latest: Arc<Mutex<Option<ToolResult>>>,
}

impl ToolSession {
    pub fn new(transport: Arc<dyn ToolTransport>) -> Self {
        Self {
            transport,
            generation: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(Mutex::new(None)),
        }
    }

    pub fn transport(&self) -> &Arc<dyn ToolTransport> {
        &self.transport
    }

    /// Issue a call. The generation is taken immediately, before the returned
    /// future is polled.
    pub fn call(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> impl Future<Output = Result<Outcome>> + Send + 'static {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let session = self.clone();
        let name = name.to_string();

        async move { session.complete(ticket, name, arguments).await }
    }

    async fn complete(
        &self,
        ticket: u64,
        name: String,
        arguments: Map<String, Value>,
    ) -> Result<Outcome> {
        tracing::debug!("Calling {} (generation {})", name, ticket);
        let invoked = self.transport.invoke(&name, &arguments).await;

        let mut latest = self.latest.lock().await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!("Discarding late result of {} (generation {})", name, ticket);
            return Ok(Outcome::Superseded);
        }

        let payload = invoked?;
        let result = if payload.is_null() {
            ToolResult::empty(name)
        } else {
            ToolResult::new(name, payload)
        };
        *latest = Some(result.clone());

        Ok(Outcome::Current(result))
    }

    /// The most recent current result, if any.
    pub async fn latest(&self) -> Option<ToolResult> {
        self.latest.lock().await.clone()
    }

    /// Take the most recent result, leaving none behind.
    pub async fn take(&self) -> Option<ToolResult> {
        self.latest.lock().await.take()
    }
}
