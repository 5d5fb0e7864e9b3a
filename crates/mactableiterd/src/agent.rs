//! MacTableAgent - lifecycle state machine of the MAC table agent

use eos_sdk_common::{AgentHandler, AgentMgr, MacTableHandler, MacTableMgr, SdkResult};
use eos_types::{MacEntry, MacKey};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

use crate::bridge::bridge_cursor;
use crate::config::AgentConfig;
use crate::enumerator::SnapshotEnumerator;
use crate::mutator::TableMutator;
use crate::status::StatusPublisher;
use crate::tables::{greetings, status_keys, OPTION_NAME};
use crate::types::{AgentState, OptionKey};

/// MacTableAgent reacts to controller callbacks
///
/// Event flow:
/// 1. initialized → greet the configured name, or prompt for one
/// 2. option changes → greeting, MAC table enumeration, example install, clear
/// 3. disabled → farewell status, shutdown acknowledgement; later events are ignored
pub struct MacTableAgent {
    agent_mgr: Arc<dyn AgentMgr>,
    config: AgentConfig,
    status: StatusPublisher,
    enumerator: SnapshotEnumerator,
    mutator: TableMutator,

    state: AgentState,

    /// Name currently greeted
    name: Option<String>,

    /// Keys returned by the last `mac` enumeration, in cursor order
    last_keys: Vec<MacKey>,

    /// MAC entry notifications received
    observed_events: u64,
}

impl MacTableAgent {
    /// Creates the agent and, if configured, subscribes to every MAC entry.
    pub fn new(
        agent_mgr: Arc<dyn AgentMgr>,
        mac_table: Arc<dyn MacTableMgr>,
        config: AgentConfig,
    ) -> SdkResult<Self> {
        let status = StatusPublisher::new(Arc::clone(&agent_mgr));
        let enumerator =
            SnapshotEnumerator::new(Arc::clone(&mac_table), status.clone(), config.cursor_bridge);
        let mutator = TableMutator::new(Arc::clone(&mac_table), config.cursor_bridge);

        if config.watch_all_mac_entries {
            mac_table.watch_all_mac_entries(true)?;
            debug!("Watching all MAC entries");
        }

        info!(
            agent = %config.tracer_name,
            cursor_bridge = %config.cursor_bridge,
            "Agent constructed"
        );

        Ok(Self {
            agent_mgr,
            config,
            status,
            enumerator,
            mutator,
            state: AgentState::Uninitialized,
            name: None,
            last_keys: Vec::new(),
            observed_events: 0,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Name currently greeted
    pub fn greeted_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Keys from the last `mac` enumeration
    pub fn last_keys(&self) -> &[MacKey] {
        &self.last_keys
    }

    /// Number of MAC entry notifications received
    pub fn observed_events(&self) -> u64 {
        self.observed_events
    }

    /// Agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Handles an option, then traces every configured option value.
    ///
    /// The option values are traced even when the option's own handling
    /// failed, unless the failure was fatal.
    fn process_option(&mut self, key: &str, value: &str) -> SdkResult<()> {
        let handled = match OptionKey::parse(key) {
            Some(OptionKey::Name) => self.handle_name(value),
            Some(OptionKey::Mac) => self.handle_mac(),
            Some(OptionKey::Set) => self.handle_set(),
            Some(OptionKey::Clear) => self.handle_clear(),
            None => {
                debug!(key, "Ignoring unrecognized option");
                Ok(())
            }
        };
        match handled {
            Err(e) if e.is_fatal() => Err(e),
            handled => {
                self.trace_options()?;
                handled
            }
        }
    }

    fn handle_name(&mut self, value: &str) -> SdkResult<()> {
        if value.is_empty() {
            info!("Name removed");
            self.name = None;
            self.status.greeting(greetings::GOODBYE)
        } else {
            info!(name = value, "Greeting");
            self.name = Some(value.to_string());
            self.status.greeting(&greetings::hello(value))
        }
    }

    fn handle_mac(&mut self) -> SdkResult<()> {
        let observed = self.enumerator.enumerate()?;
        info!(count = observed.len(), "Published MAC table status");
        self.last_keys = observed.into_iter().map(|(key, _)| key).collect();
        Ok(())
    }

    fn handle_set(&mut self) -> SdkResult<()> {
        let report = self.mutator.set_example_entries()?;
        self.status.set(status_keys::MAC_SET, &report.summary())
    }

    fn handle_clear(&mut self) -> SdkResult<()> {
        let report = self.mutator.clear_all()?;
        self.status.set(status_keys::MAC_CLEAR, &report.summary())
    }

    fn trace_options(&self) -> SdkResult<()> {
        let values = bridge_cursor(self.agent_mgr.agent_option_iter()?, self.config.cursor_bridge)?;
        for value in values {
            trace!(value = %value, "Option value");
        }
        Ok(())
    }
}

impl AgentHandler for MacTableAgent {
    fn name(&self) -> &str {
        &self.config.tracer_name
    }

    #[instrument(skip(self), fields(agent = %self.config.tracer_name, state = %self.state))]
    fn on_initialized(&mut self) -> SdkResult<()> {
        if self.state.is_disabled() {
            info!("Agent is disabled, ignoring initialization");
            return Ok(());
        }
        self.state = AgentState::Enabled;
        info!("Agent initialized");

        match self.agent_mgr.agent_option(OPTION_NAME)? {
            Some(name) if !name.is_empty() => self.process_option(OPTION_NAME, &name),
            _ => self.status.greeting(greetings::PROMPT),
        }
    }

    #[instrument(skip(self), fields(agent = %self.config.tracer_name, state = %self.state))]
    fn on_agent_enabled(&mut self, enabled: bool) -> SdkResult<()> {
        if enabled {
            if self.state.is_disabled() {
                info!("Ignoring enable after disable");
            } else {
                debug!("Agent enabled");
            }
            return Ok(());
        }

        if self.state.is_disabled() {
            debug!("Agent already disabled");
            return Ok(());
        }

        info!("Agent disabled, shutting down");
        self.status.farewell()?;
        self.agent_mgr.agent_shutdown_complete_is(true)?;
        self.state = AgentState::Disabled;
        Ok(())
    }

    #[instrument(skip(self), fields(agent = %self.config.tracer_name, state = %self.state))]
    fn on_agent_option(&mut self, key: &str, value: &str) -> SdkResult<()> {
        if self.state.is_disabled() {
            debug!("Agent is disabled, ignoring option");
            return Ok(());
        }
        self.process_option(key, value)
    }
}

impl MacTableHandler for MacTableAgent {
    #[instrument(skip_all, fields(agent = %self.config.tracer_name))]
    fn on_mac_entry_set(&mut self, entry: &MacEntry) -> SdkResult<()> {
        self.observed_events += 1;
        info!(%entry, "MAC entry set");
        Ok(())
    }

    #[instrument(skip_all, fields(agent = %self.config.tracer_name))]
    fn on_mac_entry_del(&mut self, key: &MacKey) -> SdkResult<()> {
        self.observed_events += 1;
        info!(%key, "MAC entry deleted");
        Ok(())
    }
}
