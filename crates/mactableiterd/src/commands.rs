//! Controller commands for the interactive daemon
//!
//! Each stdin line is one command:
//!
//! ```text
//! init
//! enable | disable
//! option <key> [value]
//! mac-set <vlan> <addr> <intf>[,<intf>...]
//! mac-del <vlan> <addr>
//! exit
//! ```

use eos_sdk_common::{
    AgentEvent, EventSender, InMemoryAgentMgr, InMemoryMacTable, MacTableMgr, SdkResult,
};
use eos_types::{IntfId, MacEntry, MacKey, ParseError};
use std::io::BufRead;
use std::ops::ControlFlow;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Command parsing error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' needs <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Too many arguments for '{0}'")]
    TooManyArguments(&'static str),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A controller command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Deliver the initialization callback
    Init,
    /// Enable the agent
    Enable,
    /// Disable the agent
    Disable,
    /// Set (or, with an empty value, remove) an option
    Option { key: String, value: String },
    /// Install an entry as the device would
    MacSet(MacEntry),
    /// Remove an entry as the device would
    MacDel(MacKey),
    /// Stop the daemon
    Exit,
}

fn required<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    args.next()
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn no_more<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<(), CommandError> {
    match args.next() {
        Some(_) => Err(CommandError::TooManyArguments(command)),
        None => Ok(()),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match word {
            "" => return Err(CommandError::Empty),
            "init" => Command::Init,
            "enable" => Command::Enable,
            "disable" => Command::Disable,
            "exit" | "quit" => Command::Exit,
            "option" => {
                // The value is the rest of the line and may contain spaces
                let (key, value) = match rest.split_once(char::is_whitespace) {
                    Some((key, value)) => (key, value.trim()),
                    None => (rest, ""),
                };
                if key.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "option",
                        argument: "key",
                    });
                }
                return Ok(Command::Option {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            "mac-set" => {
                let vlan = required(&mut args, "mac-set", "vlan")?;
                let addr = required(&mut args, "mac-set", "addr")?;
                let intfs = required(&mut args, "mac-set", "intf")?;
                no_more(&mut args, "mac-set")?;
                let intfs = intfs
                    .split(',')
                    .map(IntfId::new)
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Command::MacSet(MacEntry::with_intfs(
                    MacKey::parse(vlan, addr)?,
                    intfs,
                )));
            }
            "mac-del" => {
                let vlan = required(&mut args, "mac-del", "vlan")?;
                let addr = required(&mut args, "mac-del", "addr")?;
                no_more(&mut args, "mac-del")?;
                return Ok(Command::MacDel(MacKey::parse(vlan, addr)?));
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        no_more(&mut args, word_name(&command))?;
        Ok(command)
    }
}

fn word_name(command: &Command) -> &'static str {
    match command {
        Command::Init => "init",
        Command::Enable => "enable",
        Command::Disable => "disable",
        Command::Exit => "exit",
        Command::Option { .. } => "option",
        Command::MacSet(_) => "mac-set",
        Command::MacDel(_) => "mac-del",
    }
}

/// Applies commands to the in-memory management plane
pub struct Controller {
    events: EventSender,
    agent_mgr: Arc<InMemoryAgentMgr>,
    mac_table: Arc<InMemoryMacTable>,
    stop: CancellationToken,
}

impl Controller {
    /// Creates a controller; `stop` is cancelled on `exit` or end of input
    pub fn new(
        events: EventSender,
        agent_mgr: Arc<InMemoryAgentMgr>,
        mac_table: Arc<InMemoryMacTable>,
        stop: CancellationToken,
    ) -> Self {
        Self {
            events,
            agent_mgr,
            mac_table,
            stop,
        }
    }

    /// Applies one command.
    ///
    /// Table commands go straight to the MAC table; their notifications
    /// reach the agent through the watch. Returns `Break` once the daemon
    /// should stop.
    pub fn apply(&self, command: Command) -> SdkResult<ControlFlow<()>> {
        let event = match command {
            Command::Init => AgentEvent::Initialized,
            Command::Enable => AgentEvent::AgentEnabled(true),
            Command::Disable => AgentEvent::AgentEnabled(false),
            Command::Option { key, value } => {
                self.agent_mgr.set_option(key.as_str(), value.as_str());
                AgentEvent::option(key, value)
            }
            Command::MacSet(entry) => {
                self.mac_table.mac_entry_set(entry)?;
                return Ok(ControlFlow::Continue(()));
            }
            Command::MacDel(key) => {
                self.mac_table.mac_entry_del(&key)?;
                return Ok(ControlFlow::Continue(()));
            }
            Command::Exit => return Ok(ControlFlow::Break(())),
        };

        if self.events.send(event).is_err() {
            debug!("Event loop gone, stopping controller");
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Reads and applies commands until `exit`, end of input or a fatal
    /// error. Returns the number of commands applied.
    pub fn run<R: BufRead>(&self, input: R) -> usize {
        let mut applied = 0;
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Failed to read command");
                    break;
                }
            };
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    warn!(line = %line, error = %e, "Skipping command");
                    continue;
                }
            };

            match self.apply(command) {
                Ok(ControlFlow::Continue(())) => applied += 1,
                Ok(ControlFlow::Break(())) => break,
                Err(e) if e.is_fatal() => {
                    warn!(error = %e, "Management plane unavailable");
                    break;
                }
                Err(e) => warn!(error = %e, "Command failed"),
            }
        }

        info!(applied, "Controller input finished");
        self.stop.cancel();
        applied
    }
}
