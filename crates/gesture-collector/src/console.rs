//! Line-oriented stdin console.
//!
//! Reads commands from stdin on a blocking task and forwards them to the
//! main application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use gesture_collector_core::{Force, Gesture, Hand, SessionLabels};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Command reference printed by `help`.
pub(crate) const HELP: &str = "\
Commands:
  start <hand> <gesture> <force> [note]   open a new session
  stop                                    close the open session
  list                                    refresh the session list
  select <n>                              toggle session #n
  select-all                              select all, or clear when all are selected
  delete                                  delete selected sessions
  delete-all                              delete every session
  export                                  send selected sessions (all when none selected)
  status                                  show recorder and transfer status
  help                                    show this text
  quit                                    stop recording and exit

Hands:    left right (or 左手 右手)
Gestures: single_tap double_tap fist clap wrist_shake slap daily
Forces:   light heavy (or 轻 重)";

/// Parses one console line.
///
/// Returns `Ok(None)` for blank lines. Session numbers are one-based as
/// printed by `list`.
#[track_caller]
pub(crate) fn parse_command(line: &str) -> AppResult<Option<AppCommand>> {
    let (verb, rest) = next_word(line);

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "start" => AppCommand::StartSession {
            labels: parse_labels(rest)?,
        },
        "stop" => no_args(AppCommand::StopSession, verb, rest)?,
        "list" | "ls" => no_args(AppCommand::List, verb, rest)?,
        "select" => AppCommand::Select {
            index: parse_index(rest)?,
        },
        "select-all" => no_args(AppCommand::SelectAll, verb, rest)?,
        "delete" => no_args(AppCommand::Delete, verb, rest)?,
        "delete-all" => no_args(AppCommand::DeleteAll, verb, rest)?,
        "export" => no_args(AppCommand::Export, verb, rest)?,
        "status" => no_args(AppCommand::Status, verb, rest)?,
        "help" | "?" => AppCommand::Help,
        "quit" | "exit" => AppCommand::Shutdown,
        other => return Err(invalid(format!("unknown command '{}', try 'help'", other))),
    };

    Ok(Some(command))
}

#[track_caller]
fn parse_labels(args: &str) -> AppResult<SessionLabels> {
    let (hand, rest) = next_word(args);
    let (gesture, rest) = next_word(rest);
    let (force, note) = next_word(rest);

    if force.is_empty() {
        return Err(invalid(
            "usage: start <hand> <gesture> <force> [note]".to_string(),
        ));
    }

    let hand = Hand::from_label(hand).ok_or_else(|| invalid(format!("unknown hand '{}'", hand)))?;
    let gesture = Gesture::from_label(gesture)
        .ok_or_else(|| invalid(format!("unknown gesture '{}'", gesture)))?;
    let force =
        Force::from_label(force).ok_or_else(|| invalid(format!("unknown force '{}'", force)))?;

    let note = Some(note).filter(|n| !n.is_empty());
    Ok(SessionLabels::new(hand, gesture, force, note))
}

/// Splits off the first whitespace-delimited word; the rest is trimmed.
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

#[track_caller]
fn parse_index(args: &str) -> AppResult<usize> {
    match args.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(invalid("usage: select <n>, where n is a number from 'list'".to_string())),
    }
}

#[track_caller]
fn no_args(command: AppCommand, verb: &str, rest: &str) -> AppResult<AppCommand> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(invalid(format!("'{}' takes no arguments", verb)))
    }
}

#[track_caller]
fn invalid(reason: String) -> AppError {
    AppError::InvalidCommand {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Forwards stdin lines to the application as [`AppCommand`]s.
pub struct Console {
    command_tx: mpsc::Sender<AppCommand>,
}

impl Console {
    /// Create a console that sends to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the console until shutdown is signalled or stdin closes.
    ///
    /// End of input is treated as `quit`.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Stdin has no async API; a single blocking task forwards lines.
        // It exits on EOF or once line_rx is dropped and the next send fails.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                }
            }
        });

        println!("{}", HELP);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console shutting down");
                    break;
                }
                line = line_rx.recv() => match line {
                    Some(line) => self.handle_line(&line).await?,
                    None => {
                        info!("Stdin closed, requesting shutdown");
                        self.send(AppCommand::Shutdown).await?;
                        break;
                    }
                },
            }
        }

        drop(line_rx);

        // The blocking task may still be parked in read() until the next
        // line arrives; the runtime's shutdown timeout reclaims it.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Stdin forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Stdin forwarder task panicked"),
            Err(_) => debug!("Stdin forwarder did not stop within timeout, will be cleaned up on exit"),
        }

        Ok(())
    }

    async fn handle_line(&self, line: &str) -> AppResult<()> {
        match parse_command(line) {
            Ok(Some(command)) => self.send(command).await,
            Ok(None) => Ok(()),
            Err(AppError::InvalidCommand { reason, .. }) => {
                debug!(line = %line, reason = %reason, "Rejected console input");
                println!("{}", reason);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
