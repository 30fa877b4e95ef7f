//! # Stage Pipeline
//!
//! Explicit ordered stage chain replacing opaque middleware composition.
//!
//! Stages share one [`RelayContext`] per request. A stage either lets the
//! chain continue or halts it; a halt leaves the remaining stages uninvoked
//! and the context status becomes the response.

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Request Context
// ============================================================================

/// Per-request mutable state threaded through the stage chain.
///
/// Header names are stored lowercased, matching how the hosting shell lowers
/// them from the HTTP layer. The status defaults to `200 OK`; stages record
/// failure outcomes by overwriting it.
#[derive(Debug, Clone)]
pub struct RelayContext {
    headers: HashMap<String, String>,
    pub body: Bytes,
    pub status: StatusCode,
}

impl RelayContext {
    /// Create a context for one inbound request.
    ///
    /// `headers` keys must already be lowercased.
    pub fn new(headers: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            headers,
            body,
            status: StatusCode::OK,
        }
    }

    /// Look up a header by its lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

// ============================================================================
// Stage Abstraction
// ============================================================================

/// Outcome of a single stage invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageFlow {
    /// Proceed to the next stage in the chain.
    Continue,
    /// Stop the chain; `ctx.status` is the final response.
    Halt,
}

/// One step of the per-environment request pipeline.
///
/// Implementations must be cheap to share: a chain is built once at startup
/// and invoked concurrently from independent request tasks, so stages hold
/// only immutable configuration.
#[async_trait]
pub trait RelayStage: Send + Sync {
    async fn handle(&self, ctx: &mut RelayContext) -> StageFlow;
}

/// Run `stages` in order against `ctx`, stopping at the first halt.
pub async fn run_chain(stages: &[Arc<dyn RelayStage>], ctx: &mut RelayContext) {
    for stage in stages {
        if stage.handle(ctx).await == StageFlow::Halt {
            break;
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
