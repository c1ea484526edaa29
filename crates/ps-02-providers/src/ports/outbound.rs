//! # Outbound Ports
//!
//! The workload-inspection collaborator the providers depend on.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;

use crate::domain::{EventFilter, InspectError, LifecycleEvent, Workload};

/// Lifecycle events as delivered by the collaborator.
///
/// An `Err` item ends the subscription.
pub type WorkloadEventStream =
    Pin<Box<dyn Stream<Item = Result<LifecycleEvent, InspectError>> + Send>>;

/// Access to the local workload runtime.
#[async_trait]
pub trait WorkloadInspector: Send + Sync {
    /// Workloads currently running.
    async fn list_running(&self) -> Result<Vec<Workload>, InspectError>;

    /// Current state of one workload.
    async fn inspect(&self, id: &str) -> Result<Workload, InspectError>;

    /// Subscribe to lifecycle events matching `filter`.
    async fn events(&self, filter: &EventFilter) -> Result<WorkloadEventStream, InspectError>;
}

#[derive(Default)]
struct MockState {
    workloads: HashMap<String, Workload>,
    running: Vec<String>,
    inspected: Vec<String>,
    fail_list: bool,
    event_tx: Option<mpsc::UnboundedSender<Result<LifecycleEvent, InspectError>>>,
    event_rx: Option<mpsc::UnboundedReceiver<Result<LifecycleEvent, InspectError>>>,
}

/// In-memory inspector for testing.
///
/// Workloads stay inspectable after they stop running, so stop events can
/// still be resolved. A single event subscription is supported.
#[derive(Clone)]
pub struct MockWorkloadInspector {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockWorkloadInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorkloadInspector {
    /// Create an empty inspector.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(Mutex::new(MockState {
                event_tx: Some(tx),
                event_rx: Some(rx),
                ..Default::default()
            })),
        }
    }

    /// Register a running workload.
    pub fn add_workload(&self, workload: Workload) {
        let mut state = self.state.lock();
        if !state.running.contains(&workload.id) {
            state.running.push(workload.id.clone());
        }
        state.workloads.insert(workload.id.clone(), workload);
    }

    /// Mark a workload as no longer running while keeping it inspectable.
    pub fn stop_workload(&self, id: &str) {
        self.state.lock().running.retain(|running| running != id);
    }

    /// Make `list_running` fail.
    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().fail_list = fail;
    }

    /// Push an event to the subscriber.
    pub fn emit(&self, event: LifecycleEvent) {
        if let Some(tx) = self.state.lock().event_tx.as_ref() {
            let _ = tx.send(Ok(event));
        }
    }

    /// Push a stream failure to the subscriber.
    pub fn fail_stream(&self, message: &str) {
        if let Some(tx) = self.state.lock().event_tx.as_ref() {
            let _ = tx.send(Err(InspectError::Stream(message.to_string())));
        }
    }

    /// End the event stream.
    pub fn close_stream(&self) {
        self.state.lock().event_tx = None;
    }

    /// Identifiers passed to `inspect`, in call order.
    pub fn inspected(&self) -> Vec<String> {
        self.state.lock().inspected.clone()
    }
}

#[async_trait]
impl WorkloadInspector for MockWorkloadInspector {
    async fn list_running(&self) -> Result<Vec<Workload>, InspectError> {
        let state = self.state.lock();
        if state.fail_list {
            return Err(InspectError::Unavailable("mock list failure".to_string()));
        }
        Ok(state
            .running
            .iter()
            .filter_map(|id| state.workloads.get(id).cloned())
            .collect())
    }

    async fn inspect(&self, id: &str) -> Result<Workload, InspectError> {
        let mut state = self.state.lock();
        state.inspected.push(id.to_string());
        state
            .workloads
            .get(id)
            .cloned()
            .ok_or_else(|| InspectError::NotFound(id.to_string()))
    }

    async fn events(&self, filter: &EventFilter) -> Result<WorkloadEventStream, InspectError> {
        use tokio_stream::StreamExt;

        let rx = self
            .state
            .lock()
            .event_rx
            .take()
            .ok_or_else(|| InspectError::Unavailable("already subscribed".to_string()))?;
        let filter = filter.clone();
        let stream = UnboundedReceiverStream::new(rx).filter(move |item| match item {
            Ok(event) => filter.matches(event),
            Err(_) => true,
        });
        Ok(Box::pin(stream))
    }
}
