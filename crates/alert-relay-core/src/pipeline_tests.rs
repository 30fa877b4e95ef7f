//! Tests for the stage chain abstraction

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stage that records its invocation and returns a fixed flow.
struct RecordingStage {
    calls: Arc<AtomicUsize>,
    flow: StageFlow,
    status: Option<StatusCode>,
}

impl RecordingStage {
    fn new(calls: Arc<AtomicUsize>, flow: StageFlow) -> Self {
        Self {
            calls,
            flow,
            status: None,
        }
    }

    fn with_status(calls: Arc<AtomicUsize>, flow: StageFlow, status: StatusCode) -> Self {
        Self {
            calls,
            flow,
            status: Some(status),
        }
    }
}

#[async_trait]
impl RelayStage for RecordingStage {
    async fn handle(&self, ctx: &mut RelayContext) -> StageFlow {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.status {
            ctx.status = status;
        }
        self.flow
    }
}

fn empty_context() -> RelayContext {
    RelayContext::new(HashMap::new(), Bytes::new())
}

#[tokio::test]
async fn test_context_status_defaults_to_ok() {
    let ctx = empty_context();
    assert_eq!(ctx.status, StatusCode::OK);
}

#[tokio::test]
async fn test_header_lookup_uses_lowercase_names() {
    // Arrange
    let mut headers = HashMap::new();
    headers.insert("authorization".to_string(), "Basic abc".to_string());
    let ctx = RelayContext::new(headers, Bytes::new());

    // Assert
    assert_eq!(ctx.header("authorization"), Some("Basic abc"));
    assert_eq!(ctx.header("x-forwarded-authorization"), None);
}

#[tokio::test]
async fn test_chain_runs_all_stages_in_order() {
    // Arrange
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let stages: Vec<Arc<dyn RelayStage>> = vec![
        Arc::new(RecordingStage::new(first.clone(), StageFlow::Continue)),
        Arc::new(RecordingStage::new(second.clone(), StageFlow::Continue)),
    ];
    let mut ctx = empty_context();

    // Act
    run_chain(&stages, &mut ctx).await;

    // Assert
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.status, StatusCode::OK);
}

#[tokio::test]
async fn test_halt_short_circuits_remaining_stages() {
    // Arrange
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let stages: Vec<Arc<dyn RelayStage>> = vec![
        Arc::new(RecordingStage::with_status(
            first.clone(),
            StageFlow::Halt,
            StatusCode::FORBIDDEN,
        )),
        Arc::new(RecordingStage::new(second.clone(), StageFlow::Continue)),
    ];
    let mut ctx = empty_context();

    // Act
    run_chain(&stages, &mut ctx).await;

    // Assert
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0, "halt must stop the chain");
    assert_eq!(ctx.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_empty_chain_leaves_context_untouched() {
    // Arrange
    let stages: Vec<Arc<dyn RelayStage>> = vec![];
    let mut ctx = empty_context();

    // Act
    run_chain(&stages, &mut ctx).await;

    // Assert
    assert_eq!(ctx.status, StatusCode::OK);
}
