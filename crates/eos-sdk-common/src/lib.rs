//! Agent-side SDK surface for EOS MAC table agents.
//!
//! This crate holds everything an agent needs besides its own behaviour:
//!
//! - [`manager`]: the agent and MAC table manager interfaces
//! - [`handler`]: the callbacks the controller drives
//! - [`cursor`]: the sentinel-terminated cursor protocol and its inline
//!   iterator bridge
//! - [`cursor_channel`]: a threaded, cancellable variant of the bridge
//! - [`event`] / [`event_loop`]: the controller stand-in that delivers
//!   callbacks one at a time
//! - [`memory`]: in-process manager backends used by the demo daemon and
//!   by tests
//!
//! # Example
//!
//! ```ignore
//! use eos_sdk_common::{CursorExt, InMemoryMacTable, MacTableMgr};
//!
//! let table = InMemoryMacTable::new();
//! for key in table.mac_table_status_iter()?.items() {
//!     println!("{}", key);
//! }
//! ```

pub mod cursor;
pub mod cursor_channel;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod handler;
pub mod manager;
pub mod memory;

// Re-export commonly used items at crate root
pub use cursor::{BoxCursor, Cursor, CursorExt, CursorIter, Sentinel, SnapshotCursor};
pub use cursor_channel::CursorChannel;
pub use error::{SdkError, SdkResult};
pub use event::{event_channel, AgentEvent, EventReceiver, EventSender};
pub use event_loop::{EventLoop, EventLoopStats};
pub use handler::{AgentHandler, MacTableHandler};
pub use manager::{AgentMgr, MacTableMgr};
pub use memory::{InMemoryAgentMgr, InMemoryMacTable};
