//! Event loop delivering controller events to an agent.
//!
//! Events are taken from the queue one at a time and handed to the agent's
//! callbacks in order. A callback always runs to completion before the next
//! event is dequeued, so an agent never sees reentrant calls.

use crate::error::SdkResult;
use crate::event::{AgentEvent, EventReceiver};
use crate::handler::{AgentHandler, MacTableHandler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Counters kept by the event loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventLoopStats {
    /// Events handed to the agent.
    pub dispatched: u64,
    /// Callbacks that returned a non-fatal error.
    pub failed: u64,
}

/// Sequential dispatcher of [`AgentEvent`]s.
pub struct EventLoop {
    events: EventReceiver,
    shutdown: CancellationToken,
    stats: EventLoopStats,
}

impl EventLoop {
    /// Creates an event loop reading from `events`.
    ///
    /// The loop stops once `shutdown` is cancelled, which is how the agent
    /// manager reports that the agent acknowledged its shutdown.
    pub fn new(events: EventReceiver, shutdown: CancellationToken) -> Self {
        Self {
            events,
            shutdown,
            stats: EventLoopStats::default(),
        }
    }

    /// Returns the loop counters.
    pub fn stats(&self) -> EventLoopStats {
        self.stats
    }

    /// Runs until shutdown is acknowledged, the queue closes, or a callback
    /// fails fatally.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error raised by a callback.
    pub async fn run<A>(&mut self, agent: &mut A) -> SdkResult<()>
    where
        A: AgentHandler + MacTableHandler,
    {
        info!(agent = agent.name(), "Starting event loop");

        loop {
            let event = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!(agent = agent.name(), "Shutdown acknowledged, leaving event loop");
                    break;
                }
                event = self.events.recv() => match event {
                    Some(event) => event,
                    None => {
                        info!(agent = agent.name(), "Event queue closed, leaving event loop");
                        break;
                    }
                },
            };

            self.dispatch(agent, event)?;
        }

        info!(
            dispatched = self.stats.dispatched,
            failed = self.stats.failed,
            "Event loop stopped"
        );
        Ok(())
    }

    /// Delivers the events already queued, including any raised while they
    /// are handled, without waiting for new ones. Stops early once shutdown
    /// is acknowledged.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error raised by a callback.
    pub fn drain<A>(&mut self, agent: &mut A) -> SdkResult<usize>
    where
        A: AgentHandler + MacTableHandler,
    {
        let mut drained = 0;
        while !self.shutdown.is_cancelled() {
            let Ok(event) = self.events.try_recv() else {
                break;
            };
            self.dispatch(agent, event)?;
            drained += 1;
        }
        debug!(drained, "Drained pending events");
        Ok(drained)
    }

    /// Delivers a single event.
    ///
    /// Non-fatal callback errors are logged and counted; fatal ones are
    /// returned.
    pub fn dispatch<A>(&mut self, agent: &mut A, event: AgentEvent) -> SdkResult<()>
    where
        A: AgentHandler + MacTableHandler,
    {
        debug!(event = event.kind(), "Dispatching event");

        let result = match &event {
            AgentEvent::Initialized => agent.on_initialized(),
            AgentEvent::AgentEnabled(enabled) => agent.on_agent_enabled(*enabled),
            AgentEvent::AgentOption { key, value } => agent.on_agent_option(key, value),
            AgentEvent::MacEntrySet(entry) => agent.on_mac_entry_set(entry),
            AgentEvent::MacEntryDel(key) => agent.on_mac_entry_del(key),
        };
        self.stats.dispatched += 1;

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => {
                error!(event = event.kind(), error = %e, "Fatal error while handling event");
                Err(e)
            }
            Err(e) => {
                self.stats.failed += 1;
                warn!(event = event.kind(), error = %e, "Event handler failed");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use crate::event::event_channel;
    use eos_types::{MacEntry, MacKey};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
        fail_option: Option<&'static str>,
        fatal_option: Option<&'static str>,
    }

    impl AgentHandler for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn on_initialized(&mut self) -> SdkResult<()> {
            self.seen.push("init".to_string());
            Ok(())
        }

        fn on_agent_enabled(&mut self, enabled: bool) -> SdkResult<()> {
            self.seen.push(format!("enabled={}", enabled));
            Ok(())
        }

        fn on_agent_option(&mut self, key: &str, value: &str) -> SdkResult<()> {
            self.seen.push(format!("{}={}", key, value));
            if self.fatal_option == Some(key) {
                return Err(SdkError::disconnected("status_set"));
            }
            if self.fail_option == Some(key) {
                return Err(SdkError::rejected("mac_entry_del", "busy"));
            }
            Ok(())
        }
    }

    impl MacTableHandler for Recorder {
        fn on_mac_entry_set(&mut self, _entry: &MacEntry) -> SdkResult<()> {
            self.seen.push("set".to_string());
            Ok(())
        }

        fn on_mac_entry_del(&mut self, _key: &MacKey) -> SdkResult<()> {
            self.seen.push("del".to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_events_delivered_in_order() {
        let (tx, rx) = event_channel();
        let mut event_loop = EventLoop::new(rx, CancellationToken::new());
        let mut agent = Recorder::default();

        tx.send(AgentEvent::Initialized).unwrap();
        tx.send(AgentEvent::option("name", "Alice")).unwrap();
        tx.send(AgentEvent::MacEntrySet(MacEntry::default())).unwrap();
        tx.send(AgentEvent::MacEntryDel(MacKey::default())).unwrap();
        tx.send(AgentEvent::AgentEnabled(false)).unwrap();
        drop(tx);

        event_loop.run(&mut agent).await.unwrap();
        assert_eq!(
            agent.seen,
            vec!["init", "name=Alice", "set", "del", "enabled=false"]
        );
        assert_eq!(event_loop.stats().dispatched, 5);
    }

    #[tokio::test]
    async fn test_non_fatal_error_continues() {
        let (tx, rx) = event_channel();
        let mut event_loop = EventLoop::new(rx, CancellationToken::new());
        let mut agent = Recorder {
            fail_option: Some("clear"),
            ..Default::default()
        };

        tx.send(AgentEvent::option("clear", "")).unwrap();
        tx.send(AgentEvent::option("name", "Bob")).unwrap();
        drop(tx);

        event_loop.run(&mut agent).await.unwrap();
        assert_eq!(agent.seen, vec!["clear=", "name=Bob"]);
        assert_eq!(
            event_loop.stats(),
            EventLoopStats {
                dispatched: 2,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_fatal_error_stops_loop() {
        let (tx, rx) = event_channel();
        let mut event_loop = EventLoop::new(rx, CancellationToken::new());
        let mut agent = Recorder {
            fatal_option: Some("mac"),
            ..Default::default()
        };

        tx.send(AgentEvent::option("mac", "1")).unwrap();
        tx.send(AgentEvent::option("name", "never")).unwrap();

        let err = event_loop.run(&mut agent).await.unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(agent.seen, vec!["mac=1"]);
    }

    #[tokio::test]
    async fn test_shutdown_token_stops_loop() {
        let (tx, rx) = event_channel();
        let shutdown = CancellationToken::new();
        let mut event_loop = EventLoop::new(rx, shutdown.clone());
        let mut agent = Recorder::default();

        shutdown.cancel();
        tx.send(AgentEvent::Initialized).unwrap();

        event_loop.run(&mut agent).await.unwrap();
        assert!(agent.seen.is_empty());
    }

    #[test]
    fn test_drain_pending_events() {
        let (tx, rx) = event_channel();
        let mut event_loop = EventLoop::new(rx, CancellationToken::new());
        let mut agent = Recorder::default();

        tx.send(AgentEvent::Initialized).unwrap();
        tx.send(AgentEvent::AgentEnabled(true)).unwrap();

        assert_eq!(event_loop.drain(&mut agent).unwrap(), 2);
        assert_eq!(event_loop.drain(&mut agent).unwrap(), 0);
        assert_eq!(agent.seen, vec!["init", "enabled=true"]);
    }
}
