//! # Domain Entities
//!
//! Shapes exchanged with the workload-inspection collaborator, and the
//! channel pair event providers publish on.

use std::collections::HashMap;
use std::fmt;

use ps_01_label_extractor::{ContainerInfo, PortBinding};
use shared_types::PortMapping;
use tokio::sync::mpsc;

/// Event type the event provider subscribes to.
pub const CONTAINER_EVENT_TYPE: &str = "container";

/// A workload as reported by the inspection collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Workload {
    /// Opaque identifier.
    pub id: String,
    /// Declared name, possibly with a leading `/`.
    pub name: Option<String>,
    /// Labels.
    pub labels: HashMap<String, String>,
    /// Declared port bindings.
    pub ports: Vec<PortBinding>,
}

impl Workload {
    /// Create a workload with no labels or ports.
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    /// Add a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add a port binding.
    #[must_use]
    pub fn with_port(mut self, binding: PortBinding) -> Self {
        self.ports.push(binding);
        self
    }

    /// Extractor view of this workload.
    pub fn container_info(&self) -> ContainerInfo {
        ContainerInfo::new(
            self.id.clone(),
            self.name.as_deref(),
            self.labels.clone(),
            self.ports.clone(),
        )
    }
}

/// Lifecycle transitions the event provider reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Workload started.
    Start,
    /// Workload stopped.
    Stop,
    /// Workload exited.
    Die,
    /// Any other action; ignored.
    Other(String),
}

impl LifecycleAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleAction::Start => "start",
            LifecycleAction::Stop => "stop",
            LifecycleAction::Die => "die",
            LifecycleAction::Other(action) => action,
        }
    }
}

impl From<&str> for LifecycleAction {
    fn from(action: &str) -> Self {
        match action {
            "start" => LifecycleAction::Start,
            "stop" => LifecycleAction::Stop,
            "die" => LifecycleAction::Die,
            other => LifecycleAction::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// What happened.
    pub action: LifecycleAction,
    /// Identifier of the workload it happened to.
    pub actor_id: String,
}

impl LifecycleEvent {
    /// Create an event.
    pub fn new(action: impl Into<LifecycleAction>, actor_id: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            actor_id: actor_id.into(),
        }
    }
}

/// Subscription filter passed to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// Object type, e.g. `container`.
    pub event_type: String,
    /// Actions of interest.
    pub actions: Vec<LifecycleAction>,
}

impl EventFilter {
    /// Container start, stop and die events.
    pub fn container_lifecycle() -> Self {
        Self {
            event_type: CONTAINER_EVENT_TYPE.to_string(),
            actions: vec![
                LifecycleAction::Start,
                LifecycleAction::Stop,
                LifecycleAction::Die,
            ],
        }
    }

    /// Whether an event passes the filter.
    pub fn matches(&self, event: &LifecycleEvent) -> bool {
        self.actions.contains(&event.action)
    }
}

/// Channels an event provider publishes on.
///
/// `delete` is absent when nobody drains deletions; stop events are then
/// ignored without inspecting the workload.
#[derive(Debug, Clone)]
pub struct PortEventChannels {
    /// Mappings to publish.
    pub add: mpsc::Sender<PortMapping>,
    /// Mappings to withdraw.
    pub delete: Option<mpsc::Sender<PortMapping>>,
}

impl PortEventChannels {
    /// Channels with both directions.
    pub fn new(add: mpsc::Sender<PortMapping>, delete: mpsc::Sender<PortMapping>) -> Self {
        Self {
            add,
            delete: Some(delete),
        }
    }

    /// Channels that only carry additions.
    pub fn add_only(add: mpsc::Sender<PortMapping>) -> Self {
        Self { add, delete: None }
    }
}
