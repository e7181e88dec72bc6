use anyhow::{bail, Result};

use super::help::help_text;
use super::Command;
use crate::display;
use crate::session::Session;

impl Command {
    /// Execute a command against the session and return the output string.
    pub async fn execute(&self, session: &mut Session, json_output: bool) -> Result<String> {
        match self {
            Command::Messages => {
                let messages = session.service().messages().await?;
                if json_output {
                    Ok(display::format_messages_json(&messages))
                } else {
                    Ok(display::format_messages(&messages))
                }
            }

            Command::Balance => {
                let wei = session.service().balance().await?;
                if json_output {
                    Ok(display::format_balance_json(wei))
                } else {
                    Ok(display::format_fund(wei))
                }
            }

            Command::Send { amount, text } => {
                if !session.is_connected() {
                    bail!("No wallet connected. Run 'connect' first.");
                }
                let settled = session.send(amount, text).await?;
                let confirmation = match &settled.outcome {
                    Ok(c) => c,
                    Err(e) => bail!("{}", e.user_message()),
                };
                let tx_hash = confirmation.tx_hash_hex();
                let explorer = session.service().config().tx_url(&tx_hash);

                if json_output {
                    Ok(serde_json::json!({
                        "tx_hash": tx_hash,
                        "block_number": confirmation.block_number,
                        "amount_eth": amount,
                        "message": text,
                        "explorer": explorer,
                    })
                    .to_string())
                } else {
                    Ok(format!(
                        "{}\n  Explorer: {explorer}\n{}",
                        display::format_confirmation(confirmation),
                        session.controller.fund_line(),
                    ))
                }
            }

            Command::Connect => {
                session.connect()?;
                match session.address() {
                    Some(addr) => Ok(format!("Connected: {addr:#x}")),
                    None => Ok("Connected.".to_string()),
                }
            }

            Command::Disconnect => {
                session.disconnect()?;
                Ok("Disconnected.".to_string())
            }

            Command::WhoAmI => {
                let Some(addr) = session.address() else {
                    bail!("Not connected.");
                };
                let addr = format!("{addr:#x}");
                if json_output {
                    Ok(serde_json::json!({ "address": addr }).to_string())
                } else {
                    Ok(addr)
                }
            }

            Command::Refresh => {
                // A failure is recorded on the controller and rendered below.
                let _ = session.refresh().await;
                let board = session.controller.board(session.is_connected());
                Ok(format!(
                    "{}\n\n{}",
                    display::format_board(&board),
                    session.controller.fund_line(),
                ))
            }

            Command::Status => {
                let status = session.service().status().await?;
                if json_output {
                    Ok(display::format_status_json(&status))
                } else {
                    Ok(display::format_status(&status))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}
