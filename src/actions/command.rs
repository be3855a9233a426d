//! Shell command executor
//!
//! Runs one configured command per action through `sh -c`. The triggering
//! gesture and action are exported to the command as `LAUNCHER_GESTURE` and
//! `LAUNCHER_ACTION`.

use std::collections::BTreeMap;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Action, ActionExecutor, ActionRequest};
use crate::error::ActionFailure;

/// Commands for each action, keyed by action name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CommandTable {
    /// Command that authenticates the user; must exit 0 to allow the action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticate: Option<String>,

    #[serde(flatten)]
    pub actions: BTreeMap<String, String>,
}

impl CommandTable {
    pub fn command_for(&self, action: Action) -> Option<&str> {
        self.actions.get(action.name()).map(String::as_str)
    }

    /// Action names that do not match any known action
    pub fn unknown_actions(&self) -> Vec<&str> {
        self.actions
            .keys()
            .filter(|name| Action::from_name(name).is_none())
            .map(String::as_str)
            .collect()
    }
}

/// Executes actions as shell commands
pub struct CommandExecutor {
    table: CommandTable,
    /// Log what would run instead of running it
    dry_run: bool,
}

impl CommandExecutor {
    pub fn new(table: CommandTable) -> Self {
        Self { table, dry_run: false }
    }

    pub fn dry_run(table: CommandTable) -> Self {
        Self { table, dry_run: true }
    }

    fn run(&self, command: &str, request: &ActionRequest) -> Result<(), ActionFailure> {
        if self.dry_run {
            info!(%command, action = %request.action, "dry run, not executing");
            return Ok(());
        }

        debug!(%command, action = %request.action, "running action command");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .env("LAUNCHER_GESTURE", request.gesture.name())
            .env("LAUNCHER_ACTION", request.action.name())
            .status()
            .map_err(|source| ActionFailure::Spawn {
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ActionFailure::Exit {
                command: command.to_string(),
                code: status.code(),
            })
        }
    }
}

impl ActionExecutor for CommandExecutor {
    fn execute(&mut self, request: &ActionRequest) -> Result<(), ActionFailure> {
        let command = self
            .table
            .command_for(request.action)
            .ok_or(ActionFailure::Unbound)?;

        if request.authenticate {
            let auth = self
                .table
                .authenticate
                .as_deref()
                .ok_or(ActionFailure::AuthenticationUnavailable)?;
            match self.run(auth, request) {
                Ok(()) => {}
                Err(ActionFailure::Exit { .. }) => return Err(ActionFailure::AuthenticationFailed),
                Err(e) => return Err(e),
            }
        }

        self.run(command, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::GestureEvent;

    fn request(action: Action, authenticate: bool) -> ActionRequest {
        ActionRequest {
            action,
            gesture: GestureEvent::LongPress,
            authenticate,
        }
    }

    fn table(entries: &[(&str, &str)]) -> CommandTable {
        CommandTable {
            authenticate: None,
            actions: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_parse_command_table() {
        let table: CommandTable = toml::from_str(
            r#"
            authenticate = "fprintd-verify"
            lock_screen = "loginctl lock-session"
            bogus = "true"
            "#,
        )
        .unwrap();
        assert_eq!(table.authenticate.as_deref(), Some("fprintd-verify"));
        assert_eq!(table.command_for(Action::LockScreen), Some("loginctl lock-session"));
        assert_eq!(table.unknown_actions(), vec!["bogus"]);
    }

    #[test]
    fn test_missing_command_is_unbound() {
        let mut executor = CommandExecutor::new(CommandTable::default());
        let err = executor.execute(&request(Action::LockScreen, false)).unwrap_err();
        assert!(matches!(err, ActionFailure::Unbound));
    }

    #[test]
    fn test_exit_status_is_reported() {
        let mut executor = CommandExecutor::new(table(&[("show_recents", "exit 3")]));
        let err = executor.execute(&request(Action::ShowRecents, false)).unwrap_err();
        assert!(matches!(err, ActionFailure::Exit { code: Some(3), .. }));

        let mut executor = CommandExecutor::new(table(&[("show_recents", "true")]));
        assert!(executor.execute(&request(Action::ShowRecents, false)).is_ok());
    }

    #[test]
    fn test_authentication_gate() {
        let mut t = table(&[("open_settings", "true")]);
        let mut executor = CommandExecutor::new(t.clone());
        assert!(matches!(
            executor.execute(&request(Action::OpenSettings, true)),
            Err(ActionFailure::AuthenticationUnavailable)
        ));

        t.authenticate = Some("false".to_string());
        let mut executor = CommandExecutor::new(t.clone());
        assert!(matches!(
            executor.execute(&request(Action::OpenSettings, true)),
            Err(ActionFailure::AuthenticationFailed)
        ));

        t.authenticate = Some("true".to_string());
        let mut executor = CommandExecutor::new(t);
        assert!(executor.execute(&request(Action::OpenSettings, true)).is_ok());
    }

    #[test]
    fn test_dry_run_never_spawns() {
        let mut executor = CommandExecutor::dry_run(table(&[("lock_screen", "exit 1")]));
        assert!(executor.execute(&request(Action::LockScreen, false)).is_ok());
    }
}
