use crate::Cli;
/// REPL shell: Reedline-based interactive session.
use anyhow::Result;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use tipjar_core::commands::Command;
use tipjar_core::display::short_address;
use tipjar_core::{Affordance, Session};

fn build_prompt(session: &Session) -> DefaultPrompt {
    let label = match session.address() {
        Some(addr) => format!("[tipjar {}]", short_address(&addr)),
        None => format!("[tipjar {}]", session.service().config().chain),
    };
    DefaultPrompt::new(DefaultPromptSegment::Basic(label), DefaultPromptSegment::Empty)
}

pub async fn run_repl(cli: &Cli) -> Result<()> {
    let mut session = cli.build_session()?;
    let config = session.service().config().clone();

    println!("tipjar v{}", env!("CARGO_PKG_VERSION"));
    println!("Chain:    {} ({})", config.chain, config.chain.chain_id());
    println!("Contract: {:#x}", config.contract_address);
    match session.controller.affordance(session.provider()) {
        Affordance::Unavailable(reason) => println!("{reason}"),
        Affordance::Connect => println!("Type 'connect' to connect a wallet."),
        Affordance::Disconnect | Affordance::Hidden => {}
    }
    println!("Type 'help' for a list of commands.");
    println!();

    let mut prompt = build_prompt(&session);

    let commands: Vec<String> = vec![
        "messages".into(),
        "msgs".into(),
        "balance".into(),
        "bal".into(),
        "send".into(),
        "coffee".into(),
        "connect".into(),
        "login".into(),
        "disconnect".into(),
        "logout".into(),
        "whoami".into(),
        "address".into(),
        "refresh".into(),
        "status".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        let session_change = matches!(cmd, Command::Connect | Command::Disconnect);
                        match cmd.execute(&mut session, cli.json).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => eprintln!("Error: {e}"),
                        }
                        if session_change {
                            prompt = build_prompt(&session);
                        }
                        // A failed send keeps the form for the next attempt;
                        // the error was already printed.
                        session.controller.dismiss_notice();
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}
