//! Transport command sink
//!
//! Forwards play/pause, next and previous to the system media layer through
//! the external `nowplaying-cli` tool. The sink reports success or failure
//! only; commands are never queued or retried, so a failed command is a no-op
//! from the user's point of view.

use crate::util;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Default install location of nowplaying-cli (Homebrew on Apple Silicon)
pub const DEFAULT_CLI_PATH: &str = "/opt/homebrew/bin/nowplaying-cli";

/// Environment override for the CLI path
pub const CLI_PATH_ENV: &str = "DEEZER_OVERLAY_CLI";

/// The closed set of transport commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportCommand {
    PlayPause,
    Next,
    Previous,
}

impl TransportCommand {
    /// The nowplaying-cli subcommand this maps to.
    pub fn subcommand(self) -> &'static str {
        match self {
            TransportCommand::PlayPause => "togglePlayPause",
            TransportCommand::Next => "next",
            TransportCommand::Previous => "previous",
        }
    }
}

impl fmt::Display for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCommand::PlayPause => write!(f, "playpause"),
            TransportCommand::Next => write!(f, "next"),
            TransportCommand::Previous => write!(f, "previous"),
        }
    }
}

/// Command sink backed by the external CLI.
pub struct TransportSink {
    cli_path: PathBuf,
}

impl TransportSink {
    /// Sink at the default path, honoring the `DEEZER_OVERLAY_CLI`
    /// environment override.
    pub fn new() -> Self {
        let cli_path = std::env::var_os(CLI_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CLI_PATH), PathBuf::from);
        Self { cli_path }
    }

    pub fn with_cli_path(cli_path: PathBuf) -> Self {
        Self { cli_path }
    }

    /// Send one command. Returns whether the CLI reported success; every
    /// failure is absorbed and logged.
    pub fn send(&self, command: TransportCommand) -> bool {
        debug!("sending transport command: {command}");

        match util::run_command_with_timeout(
            Command::new(&self.cli_path).arg(command.subcommand()),
            util::DEFAULT_COMMAND_TIMEOUT,
        ) {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(
                    "transport command {command} exited with {}: {}",
                    output.status,
                    stderr.trim()
                );
                false
            }
            Err(e) => {
                warn!("transport command {command} failed: {e}");
                false
            }
        }
    }
}

impl Default for TransportSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommand_mapping() {
        assert_eq!(TransportCommand::PlayPause.subcommand(), "togglePlayPause");
        assert_eq!(TransportCommand::Next.subcommand(), "next");
        assert_eq!(TransportCommand::Previous.subcommand(), "previous");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TransportCommand::PlayPause.to_string(), "playpause");
        assert_eq!(TransportCommand::Next.to_string(), "next");
        assert_eq!(TransportCommand::Previous.to_string(), "previous");
    }

    #[test]
    fn test_send_reports_success() {
        // "true" ignores its argument and exits zero.
        let sink = TransportSink::with_cli_path(PathBuf::from("true"));
        assert!(sink.send(TransportCommand::PlayPause));
    }

    #[test]
    fn test_send_absorbs_nonzero_exit() {
        let sink = TransportSink::with_cli_path(PathBuf::from("false"));
        assert!(!sink.send(TransportCommand::Next));
    }

    #[test]
    fn test_send_absorbs_missing_binary() {
        let sink = TransportSink::with_cli_path(PathBuf::from("/nonexistent/nowplaying-cli"));
        assert!(!sink.send(TransportCommand::Previous));
    }
}
