/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`  : Interactive chat session (login view + chat view)
- `auth`  : One-shot `login` and `logout`
- `send`  : Send a single message
- `status`: Report where the API key would come from

Handlers are thin: all session and exchange behavior lives in
[`ChatClient`](crate::client::ChatClient).
*/

use crate::client::ChatClient;
use crate::config::{ChatConfig, Config, Theme};
use crate::conversation::ChatMessage;
use crate::error::{Result, RelayError};
use crate::session::LoginOutcome;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

// Special commands parser for the chat view
pub mod special_commands;

/// Format one transcript line for the terminal
///
/// Replies that carry an exchange failure are highlighted as errors.
pub fn render_message(message: &ChatMessage, chat: &ChatConfig) -> String {
    let is_error = !message.is_user && message.text.starts_with("Error: ");

    let label = match (message.is_user, chat.theme) {
        (true, Theme::Light) => "You".blue().bold(),
        (true, Theme::Dark) => "You".bright_cyan().bold(),
        (false, Theme::Light) => "Assistant".green().bold(),
        (false, Theme::Dark) => "Assistant".bright_green().bold(),
    };
    let body = match (is_error, chat.theme) {
        (true, Theme::Light) => message.text.red(),
        (true, Theme::Dark) => message.text.bright_red(),
        (false, _) => message.text.normal(),
    };

    if chat.show_timestamps {
        format!(
            "{} {}: {}",
            format!("[{}]", message.time_label()).dimmed(),
            label,
            body
        )
    } else {
        format!("{}: {}", label, body)
    }
}

/// Outcome of prompting the user for an API key
enum PromptResult {
    Value(String),
    Aborted,
}

fn prompt_line(rl: &mut DefaultEditor, prompt: &str) -> Result<PromptResult> {
    match rl.readline(prompt) {
        Ok(line) => Ok(PromptResult::Value(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(PromptResult::Aborted),
        Err(err) => {
            tracing::error!("Readline error: {:?}", err);
            Err(RelayError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                err.to_string(),
            ))
            .into())
        }
    }
}

fn record_history(rl: &mut DefaultEditor, line: &str) -> Result<()> {
    rl.add_history_entry(line)?;
    Ok(())
}

fn parse_yes_no(answer: &str, default: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}

fn report_login(outcome: LoginOutcome, remember: bool) {
    match outcome {
        LoginOutcome::Authenticated { persisted } => {
            println!("{}", "API key validated.".green());
            if remember && !persisted {
                eprintln!(
                    "{}",
                    "Warning: the API key could not be saved; you will need to log in again next time."
                        .yellow()
                );
            } else if persisted {
                println!("API key saved for future sessions.");
            }
        }
        LoginOutcome::Rejected => {
            eprintln!(
                "{}",
                "Invalid API key. Please check your OpenAI API key.".red()
            );
        }
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Resolves the startup credential, falls back to an interactive login
    //! view, then runs a readline loop that relays each line to the model.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let mut client = ChatClient::from_config(&config)?;
        let mut rl = DefaultEditor::new()?;

        match client.resolve_startup_credential().await {
            Some(source) => println!("Using API key from {}.", source),
            None => {
                if !login_view(&mut rl, &mut client).await? {
                    println!("Goodbye!");
                    return Ok(());
                }
            }
        }

        print_welcome_banner(&config);

        loop {
            let prompt = format!("{} ", ">".cyan().bold());
            let line = match prompt_line(&mut rl, &prompt)? {
                PromptResult::Value(line) => line,
                PromptResult::Aborted => break,
            };
            if line.is_empty() {
                continue;
            }
            record_history(&mut rl, &line)?;

            match parse_special_command(&line) {
                Ok(SpecialCommand::None) => {}
                Ok(SpecialCommand::Exit) => break,
                Ok(SpecialCommand::Help) => {
                    print_help();
                    continue;
                }
                Ok(SpecialCommand::History) => {
                    print_history(&client, &config);
                    continue;
                }
                Ok(SpecialCommand::ShowStatus) => {
                    print_status(&client, &config);
                    continue;
                }
                Ok(SpecialCommand::Logout) => {
                    client.logout().await;
                    println!("Logged out. The saved API key has been removed.\n");
                    if !login_view(&mut rl, &mut client).await? {
                        break;
                    }
                    continue;
                }
                Err(e) => {
                    eprintln!("{}", e.to_string().red());
                    continue;
                }
            }

            println!("{}", "Thinking...".dimmed());
            client.send_message(&line).await;
            if let Some(reply) = client.messages().last() {
                println!("{}\n", render_message(reply, &config.chat));
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Prompt for an API key until one validates or the user aborts
    ///
    /// Returns `false` if the user aborted with CTRL-C or CTRL-D.
    async fn login_view(rl: &mut DefaultEditor, client: &mut ChatClient) -> Result<bool> {
        println!("\nEnter your OpenAI API key to start chatting.");
        loop {
            let key = match prompt_line(rl, "API key: ")? {
                PromptResult::Value(key) => key,
                PromptResult::Aborted => return Ok(false),
            };
            if key.is_empty() {
                eprintln!("{}", "Please enter an API key.".yellow());
                continue;
            }

            let remember = match prompt_line(rl, "Remember this key? [Y/n]: ")? {
                PromptResult::Value(answer) => parse_yes_no(&answer, true),
                PromptResult::Aborted => return Ok(false),
            };

            println!("{}", "Validating...".dimmed());
            let outcome = client.login_with_outcome(&key, remember).await;
            report_login(outcome, remember);
            if outcome.is_authenticated() {
                return Ok(true);
            }
        }
    }

    fn print_welcome_banner(config: &Config) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                  RelayChat - Welcome!                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Model: {}", config.api.model.cyan());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_history(client: &ChatClient, config: &Config) {
        if client.messages().is_empty() {
            println!("No messages yet.\n");
            return;
        }
        for message in client.messages() {
            println!("{}", render_message(message, &config.chat));
        }
        println!();
    }

    fn print_status(client: &ChatClient, config: &Config) {
        let settings = client.exchange_settings();
        let login = if client.is_authenticated() {
            "logged in".green()
        } else {
            "logged out".red()
        };
        println!("\nSession:     {}", login);
        println!("Model:       {}", settings.model);
        println!("Max tokens:  {}", settings.max_tokens);
        println!("Temperature: {}", settings.temperature);
        println!("Endpoint:    {}", config.api.base_url);
        println!("Messages:    {}\n", client.messages().len());
    }
}

// Login/logout command handlers
pub mod auth {
    use super::*;

    /// Validate an API key and optionally remember it
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `key` - API key; prompted for when `None`
    /// * `remember` - Save the key to the key store on success
    ///
    /// # Errors
    ///
    /// Returns error if the key is empty or rejected by the endpoint
    pub async fn login(config: Config, key: Option<String>, remember: bool) -> Result<()> {
        let key = match key {
            Some(key) => key.trim().to_string(),
            None => {
                let mut rl = DefaultEditor::new()?;
                match prompt_line(&mut rl, "API key: ")? {
                    PromptResult::Value(key) => key,
                    PromptResult::Aborted => return Ok(()),
                }
            }
        };

        if key.is_empty() {
            return Err(RelayError::Authentication("API key cannot be empty".to_string()).into());
        }

        let mut client = ChatClient::from_config(&config)?;
        let outcome = client.login_with_outcome(&key, remember).await;
        report_login(outcome, remember);

        if outcome.is_authenticated() {
            Ok(())
        } else {
            Err(RelayError::Authentication("API key was rejected".to_string()).into())
        }
    }

    /// Forget the remembered API key
    pub async fn logout(config: Config) -> Result<()> {
        let mut client = ChatClient::from_config(&config)?;
        client.logout().await;
        println!("Logged out. The saved API key has been removed.");
        Ok(())
    }
}

// One-shot send handler
pub mod send {
    use super::*;

    /// Send one message using the startup credential and print the reply
    ///
    /// # Errors
    ///
    /// Returns error if the exchange fails
    pub async fn send_message(config: Config, text: String) -> Result<()> {
        let mut client = ChatClient::from_config(&config)?;
        if client.resolve_startup_credential().await.is_none() {
            tracing::debug!("No startup credential; the exchange will report it");
        }

        let outcome = client.send_message(&text).await;
        if outcome.is_success() {
            println!("{}", outcome.user_message());
            Ok(())
        } else {
            eprintln!("{}", format!("Error: {}", outcome.user_message()).red());
            Err(RelayError::Exchange(outcome.user_message()).into())
        }
    }
}

// Status handler
pub mod status {
    use super::*;

    /// Report whether an API key resolves and from where
    pub async fn show_status(config: Config) -> Result<()> {
        let mut client = ChatClient::from_config(&config)?;
        match client.resolve_startup_credential().await {
            Some(source) => println!("Logged in (API key from {})", source),
            None => println!("Not logged in"),
        }
        println!("Model:   {}", config.api.model);
        println!("Endpoint: {}", config.api.base_url);
        println!("Storage: {:?}", config.storage.backend);
        Ok(())
    }
}
