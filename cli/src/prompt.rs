/// Terminal prompts: signing approval and private key entry.
use std::io::Write;

use anyhow::Context;
use tipjar_core::config::ENV_PRIVATE_KEY;
use tipjar_core::error::{ClientError, Result};
use tipjar_core::{Approval, KeySource, SignRequest};
use zeroize::{Zeroize, Zeroizing};

pub(crate) fn prompt_confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}

/// Asks on the terminal before every signature.
pub(crate) struct PromptApproval;

impl Approval for PromptApproval {
    fn approve(&self, request: &SignRequest) -> bool {
        println!("{request}");
        prompt_confirm("Sign and send this transaction?")
    }
}

/// `TIPJAR_PRIVATE_KEY` if set, otherwise stdin or a hidden prompt.
pub(crate) struct PromptKeySource {
    from_stdin: bool,
}

impl PromptKeySource {
    pub(crate) fn new(from_stdin: bool) -> Self {
        Self { from_stdin }
    }
}

impl KeySource for PromptKeySource {
    fn private_key(&self) -> Result<Zeroizing<String>> {
        if let Ok(key) = std::env::var(ENV_PRIVATE_KEY) {
            if !key.trim().is_empty() {
                return Ok(Zeroizing::new(key));
            }
        }
        let key = if self.from_stdin {
            read_key_stdin()
        } else {
            rpassword::prompt_password("Private key: ")
                .context("Failed to read private key")
                .map(Zeroizing::new)
        };
        key.map_err(ClientError::Other)
    }
}

fn read_key_stdin() -> anyhow::Result<Zeroizing<String>> {
    let mut key = String::new();
    std::io::stdin()
        .read_line(&mut key)
        .context("Failed to read private key from stdin")?;
    let trimmed = key.trim().to_string();
    key.zeroize();
    Ok(Zeroizing::new(trimmed))
}
