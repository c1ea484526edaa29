//! Provider driven by workload lifecycle events.

use std::sync::Arc;

use async_trait::async_trait;
use ps_01_label_extractor::{short_id, LabelExtractor};
use shared_types::PortMapping;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::{EventFilter, LifecycleAction, LifecycleEvent, PortEventChannels, ProviderError};
use crate::ports::{EventPortProvider, PortProvider, WorkloadInspector};

#[derive(Debug, Clone, Copy)]
enum Direction {
    Add,
    Delete,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Add => "add",
            Direction::Delete => "delete",
        }
    }
}

/// Publishes mappings as workloads start and withdraws them as they stop.
///
/// Each event is handled in its own task so a slow inspection does not hold
/// up the rest of the stream. Mappings of one workload are sent in
/// extraction order.
#[derive(Clone)]
pub struct EventProvider {
    inspector: Arc<dyn WorkloadInspector>,
    extractor: Arc<LabelExtractor>,
}

impl EventProvider {
    /// Create a provider over `inspector`.
    pub fn new(inspector: Arc<dyn WorkloadInspector>, extractor: LabelExtractor) -> Self {
        Self {
            inspector,
            extractor: Arc::new(extractor),
        }
    }

    fn dispatch(
        &self,
        event: LifecycleEvent,
        channels: &PortEventChannels,
        cancel: &CancellationToken,
        handlers: &mut JoinSet<()>,
    ) {
        let (direction, tx) = match event.action {
            LifecycleAction::Start => (Direction::Add, channels.add.clone()),
            LifecycleAction::Stop | LifecycleAction::Die => match &channels.delete {
                Some(delete) => (Direction::Delete, delete.clone()),
                None => return,
            },
            LifecycleAction::Other(action) => {
                debug!(action = %action, "[ps-02] Ignoring lifecycle event");
                return;
            }
        };

        handlers.spawn(deliver(
            Arc::clone(&self.inspector),
            Arc::clone(&self.extractor),
            event.actor_id,
            direction,
            tx,
            cancel.clone(),
        ));
    }
}

async fn deliver(
    inspector: Arc<dyn WorkloadInspector>,
    extractor: Arc<LabelExtractor>,
    actor_id: String,
    direction: Direction,
    tx: mpsc::Sender<PortMapping>,
    cancel: CancellationToken,
) {
    let workload = tokio::select! {
        _ = cancel.cancelled() => return,
        result = inspector.inspect(&actor_id) => match result {
            Ok(workload) => workload,
            Err(e) => {
                warn!(
                    workload = short_id(&actor_id),
                    error = %e,
                    "[ps-02] Failed to inspect workload, dropping event"
                );
                return;
            }
        },
    };

    for mapping in extractor.extract(&workload.container_info()) {
        debug!(
            workload = short_id(&actor_id),
            direction = direction.as_str(),
            mapping = %mapping,
            "[ps-02] Publishing mapping"
        );
        tokio::select! {
            _ = cancel.cancelled() => return,
            sent = tx.send(mapping) => {
                if sent.is_err() {
                    debug!(direction = direction.as_str(), "[ps-02] Receiver closed");
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl PortProvider for EventProvider {
    fn name(&self) -> &'static str {
        "events"
    }

    async fn get_port_mappings(&self) -> Result<Vec<PortMapping>, ProviderError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl EventPortProvider for EventProvider {
    fn name(&self) -> &'static str {
        "events"
    }

    async fn listen(&self, cancel: CancellationToken, channels: PortEventChannels) {
        let mut stream = match self.inspector.events(&EventFilter::container_lifecycle()).await {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "[ps-02] Failed to subscribe to lifecycle events");
                return;
            }
        };
        info!(
            cleanup = channels.delete.is_some(),
            "[ps-02] Listening for lifecycle events"
        );

        let mut handlers = JoinSet::new();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                item = stream.next() => match item {
                    Some(Ok(event)) => self.dispatch(event, &channels, &cancel, &mut handlers),
                    Some(Err(e)) => {
                        error!(error = %e, "[ps-02] Lifecycle event stream failed");
                        break;
                    }
                    None => {
                        info!("[ps-02] Lifecycle event stream ended");
                        break;
                    }
                },
                Some(joined) = handlers.join_next(), if !handlers.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "[ps-02] Event handler failed");
                    }
                }
            }
        }

        // Handlers observe `cancel` at every await, so this drains promptly.
        while let Some(joined) = handlers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "[ps-02] Event handler failed");
            }
        }
        debug!("[ps-02] Event listener stopped");
    }
}
