//! Events pushed by the controlling plane.

use eos_types::{MacEntry, MacKey};
use tokio::sync::mpsc;

/// A lifecycle, configuration or table event destined for an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// The agent's state is synchronized; it may start working.
    Initialized,
    /// The agent was enabled (`true`) or disabled (`false`).
    AgentEnabled(bool),
    /// An option changed. An empty value means the option was removed.
    AgentOption {
        /// Option name.
        key: String,
        /// New value.
        value: String,
    },
    /// A watched MAC entry was installed or changed.
    MacEntrySet(MacEntry),
    /// A watched MAC entry was removed.
    MacEntryDel(MacKey),
}

impl AgentEvent {
    /// Creates an option event.
    pub fn option(key: impl Into<String>, value: impl Into<String>) -> Self {
        AgentEvent::AgentOption {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Short name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentEvent::Initialized => "initialized",
            AgentEvent::AgentEnabled(_) => "agent_enabled",
            AgentEvent::AgentOption { .. } => "agent_option",
            AgentEvent::MacEntrySet(_) => "mac_entry_set",
            AgentEvent::MacEntryDel(_) => "mac_entry_del",
        }
    }
}

/// Sending half of the event queue.
pub type EventSender = mpsc::UnboundedSender<AgentEvent>;

/// Receiving half of the event queue.
pub type EventReceiver = mpsc::UnboundedReceiver<AgentEvent>;

/// Creates an event queue.
///
/// The queue is unbounded so that collaborators can raise events from inside
/// a running callback without blocking it; the events are delivered after
/// the callback returns.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
