mod prompt;
mod repl;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tipjar_core::commands::Command;
use tipjar_core::config::{
    ENV_APP_ID, ENV_CHAIN, ENV_CLIENT_ID, ENV_CONTRACT_ADDRESS, ENV_RPC_URL,
};
use tipjar_core::{
    AppConfig, Approval, AutoApprove, BoardService, ConfigInput, IdentityProvider,
    LocalKeyProvider, Session,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::prompt::{PromptApproval, PromptKeySource};

#[derive(Parser)]
#[command(name = "tipjar", about = "Buy Me a Coffee: pay to post a message on-chain", version)]
pub(crate) struct Cli {
    /// Chain to use: mainnet or sepolia (default: sepolia)
    #[arg(long, env = ENV_CHAIN)]
    chain: Option<String>,

    /// Custom RPC URL (default: a public endpoint for the chain)
    #[arg(long, env = ENV_RPC_URL)]
    rpc: Option<String>,

    /// Contract address (default: the known deployment)
    #[arg(long, env = ENV_CONTRACT_ADDRESS)]
    contract: Option<String>,

    /// Identity provider app id; wallet features are disabled without it
    #[arg(long, env = ENV_APP_ID)]
    app_id: Option<String>,

    /// Identity provider client id; wallet features are disabled without it
    #[arg(long, env = ENV_CLIENT_ID)]
    client_id: Option<String>,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,

    /// Allow plain http:// RPC URLs
    #[arg(long)]
    insecure: bool,

    /// Sign without asking for confirmation
    #[arg(long, short = 'y')]
    yes: bool,

    /// Read the private key from stdin instead of prompting (for scripting)
    #[arg(long)]
    key_stdin: bool,

    /// Log debug output to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn config_input(&self) -> ConfigInput {
        ConfigInput {
            chain: self.chain.clone(),
            rpc_url: self.rpc.clone(),
            contract_address: self.contract.clone(),
            app_id: self.app_id.clone(),
            client_id: self.client_id.clone(),
        }
    }

    fn approval(&self) -> Arc<dyn Approval> {
        if self.yes {
            Arc::new(AutoApprove)
        } else {
            Arc::new(PromptApproval)
        }
    }

    pub(crate) fn build_session(&self) -> Result<Session> {
        let config = AppConfig::resolve(self.config_input(), self.insecure)?;

        let keys = Box::new(PromptKeySource::new(self.key_stdin));
        let identity = LocalKeyProvider::from_config(&config, keys)
            .map(|p| Box::new(p.with_approval(self.approval())) as Box<dyn IdentityProvider>);

        let service = BoardService::from_config(config).context("Failed to set up RPC client")?;
        Ok(Session::new(Arc::new(service), identity))
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(cmd_str) = &cli.cmd {
        run_oneshot(&cli, cmd_str).await
    } else {
        repl::run_repl(&cli).await
    }
}

async fn run_oneshot(cli: &Cli, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }

    debug!(?command, json = cli.json, "running one-shot command");
    let mut session = cli.build_session()?;
    if command.needs_wallet() && !session.is_connected() {
        debug!("connecting wallet before running command");
        session.connect()?;
    }

    let output = command.execute(&mut session, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
