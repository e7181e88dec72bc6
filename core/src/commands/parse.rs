use anyhow::{bail, Context, Result};

use super::Command;
use crate::display;

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        // The last argument keeps the rest of the line, inner spacing included.
        let (cmd, rest) = next_word(input);
        let cmd = cmd.to_lowercase();
        let (arg1, rest) = next_word(rest);
        let arg1 = Some(arg1).filter(|s| !s.is_empty());
        let arg2 = Some(rest.trim()).filter(|s| !s.is_empty());

        match cmd.as_str() {
            "messages" | "msgs" => Ok(Command::Messages),

            "balance" | "bal" => Ok(Command::Balance),

            "send" | "coffee" => {
                let amount = arg1.ok_or_else(|| {
                    anyhow::anyhow!("Missing amount. Usage: send <amount> <message>")
                })?;
                let text = arg2.ok_or_else(|| {
                    anyhow::anyhow!("Missing message. Usage: send <amount> <message>")
                })?;

                display::parse_eth_amount(amount)
                    .with_context(|| format!("Invalid amount '{amount}'"))?;

                Ok(Command::Send {
                    amount: amount.to_string(),
                    text: text.to_string(),
                })
            }

            "connect" | "login" => Ok(Command::Connect),

            "disconnect" | "logout" => Ok(Command::Disconnect),

            "whoami" | "address" => Ok(Command::WhoAmI),

            "refresh" => Ok(Command::Refresh),

            "status" => Ok(Command::Status),

            "help" | "?" => Ok(Command::Help {
                command: arg1.map(|s| s.to_lowercase()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

/// Split off the first word and the remainder with its leading whitespace removed.
fn next_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}
