//! Special commands parser for interactive chat mode
//!
//! Special commands are handled by the terminal UI instead of being sent to
//! the model. They are prefixed with `/` and are case-insensitive; `exit`
//! and `quit` also work without the slash.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Log out, forget the stored key and clear the transcript
    Logout,
    /// Reprint the transcript
    History,
    /// Show session status
    ShowStatus,
    /// Show help
    Help,
    /// Leave the chat
    Exit,
    /// Not a command; send as a message
    None,
}

/// Parse user input into a special command
///
/// # Examples
///
/// ```
/// use relaychat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/logout").unwrap(), SpecialCommand::Logout);
/// assert_eq!(parse_special_command("QUIT").unwrap(), SpecialCommand::Exit);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/logout" => Ok(SpecialCommand::Logout),
        "/history" => Ok(SpecialCommand::History),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

  /status         - Show login state and model settings
  /history        - Reprint the conversation so far
  /logout         - Log out, forget the saved API key, clear the conversation
  /help           - Show this help
  exit, quit      - Leave the chat (the saved API key is kept)

Anything else is sent to the model as a single message. Earlier messages
are shown in the transcript but are not sent along with new ones.
"#
    );
}
