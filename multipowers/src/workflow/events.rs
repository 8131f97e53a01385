//! Best-effort event emission for executed nodes

use multipowers_sdk::{EventRecord, EventSink, JsonlEventSink, NullSink};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// Event name recorded for every attempted node
pub const NODE_EXECUTED_EVENT: &str = "workflow_node_executed";

/// Tool name recorded on events from this engine
pub const EVENT_TOOL: &str = "execute-workflow";

/// Everything known about one attempted node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEvent {
    pub role: String,
    pub workflow: String,
    pub node: String,
    pub index: usize,
    pub exit_code: i32,
    pub duration_ms: u64,
    pub request_id: Option<String>,
    pub track_id: Option<String>,
}

impl NodeEvent {
    pub fn reason(&self) -> &'static str {
        if self.exit_code == 0 {
            "node completed"
        } else {
            "node failed"
        }
    }

    pub fn to_record(&self) -> EventRecord {
        EventRecord::new(NODE_EXECUTED_EVENT, self.role.as_str(), EVENT_TOOL)
            .with_exit_code(self.exit_code)
            .with_duration_ms(self.duration_ms)
            .with_request_id(self.request_id.as_deref())
            .with_field("workflow", self.workflow.as_str())
            .with_field("track_id", self.track_id.as_deref().filter(|id| !id.is_empty()))
            .with_field("node", self.node.as_str())
            .with_field("reason", self.reason())
            .with_field("metadata", json!({ "index": self.index, "exit_code": self.exit_code }))
    }
}

/// Fire-and-forget front for an [`EventSink`].
///
/// `emit` returns nothing: a failing sink is logged at debug level and otherwise
/// ignored, so emission can never change a run's outcome.
#[derive(Clone)]
pub struct EventEmitter {
    sink: Arc<dyn EventSink>,
}

impl EventEmitter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Append to `<dir>/YYYY-MM-DD.jsonl`
    pub fn jsonl(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(JsonlEventSink::new(dir)))
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(NullSink))
    }

    pub fn emit(&self, event: &NodeEvent) {
        if let Err(e) = self.sink.append(&event.to_record()) {
            tracing::debug!(error = %e, node = %event.node, "Dropped workflow event");
        }
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter").finish_non_exhaustive()
    }
}
