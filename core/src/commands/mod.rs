/// Command definitions and parsing for the REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show every paid message: messages
    Messages,
    /// Show the contract balance
    Balance,
    /// Pay for a message: send <amount> <message>
    Send { amount: String, text: String },
    /// Log in with the identity provider
    Connect,
    /// Log out
    Disconnect,
    /// Show the connected account
    WhoAmI,
    /// Re-query the contract and show the board
    Refresh,
    /// Show chain, contract and latest block
    Status,
    /// Print help
    Help { command: Option<String> },
    /// Exit
    Exit,
}

impl Command {
    /// Commands that cannot run without a connected wallet.
    pub fn needs_wallet(&self) -> bool {
        matches!(self, Command::Send { .. } | Command::WhoAmI | Command::Refresh)
    }
}
