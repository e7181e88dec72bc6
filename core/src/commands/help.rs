#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("messages") | Some("msgs") => {
            "messages\n  Show every paid message, oldest first.\n  Alias: msgs".to_string()
        }
        Some("balance") | Some("bal") => {
            "balance\n  Show the total coffee fund held by the contract.\n  Alias: bal".to_string()
        }
        Some("send") | Some("coffee") => {
            "send <amount> <message>\n  Buy a coffee: pay <amount> ETH and post <message> on-chain.\n  Requires a connected wallet; you are asked to approve before signing.\n  Example: send 0.001 gm\n  Alias: coffee".to_string()
        }
        Some("connect") | Some("login") => {
            "connect\n  Log in and bind a signing account.\n  The key is read from TIPJAR_PRIVATE_KEY or prompted for.\n  Alias: login".to_string()
        }
        Some("disconnect") | Some("logout") => {
            "disconnect\n  Log out and forget the signing account.\n  Alias: logout".to_string()
        }
        Some("whoami") | Some("address") => {
            "whoami\n  Show the connected account address.\n  Alias: address".to_string()
        }
        Some("refresh") => {
            "refresh\n  Re-query the contract and show the message board.\n  Needs a connected wallet; with --cmd it connects first.".to_string()
        }
        Some("status") => {
            "status\n  Show chain, RPC endpoint, contract address and latest block.".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Leave the REPL.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list."),
        None => {
            "Available commands:\n\
             \n\
             \x20 messages         Show all paid messages\n\
             \x20 balance          Show the total coffee fund\n\
             \x20 send             Buy a coffee with a message\n\
             \x20 connect          Connect a wallet\n\
             \x20 disconnect       Disconnect the wallet\n\
             \x20 whoami           Show the connected address\n\
             \x20 refresh          Reload and show the board\n\
             \x20 status           Show network status\n\
             \x20 help [cmd]       Show help for a command\n\
             \x20 exit             Exit\n\
             \n\
             Type 'help <command>' for detailed help on a specific command."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_text_general() {
        let text = help_text(None);
        assert!(text.contains("messages"));
        assert!(text.contains("send"));
        assert!(text.contains("connect"));
    }

    #[test]
    fn help_text_specific() {
        let text = help_text(Some("send"));
        assert!(text.contains("<amount>"));
        assert!(text.contains("<message>"));
        assert_eq!(help_text(Some("coffee")), text);
    }

    #[test]
    fn help_text_unknown() {
        assert!(help_text(Some("nonexistent")).contains("Unknown command"));
    }
}
