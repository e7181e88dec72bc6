/// Output formatting: ETH denomination conversion and display helpers.
///
/// Ether uses 18 decimal places (wei). 1 ETH = 10^18 wei.
use ethers::types::{Address, U256};

use crate::controller::{Board, CONNECT_PROMPT, NO_DATA_TEXT};
use crate::error::{ClientError, Result};
use crate::network::{Confirmation, Message, NetworkStatus};

pub const ETH_DECIMALS: usize = 18;

/// Text rendered in place of an empty message list.
pub const EMPTY_BOARD_TEXT: &str = "No coffee messages yet";

/// 10^18, the wei-per-ether scaling factor.
#[must_use]
pub fn wei_per_eth() -> U256 {
    U256::exp10(ETH_DECIMALS)
}

/// Convert wei to a human-readable ETH string with trailing zeros trimmed.
/// Examples: 2_500_000_000_000_000 -> "0.0025", 0 -> "0", 10^18 -> "1"
#[must_use]
pub fn wei_to_eth(wei: U256) -> String {
    let factor = wei_per_eth();
    let whole = wei / factor;
    let frac = wei % factor;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = ETH_DECIMALS);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Format a balance for display.
#[must_use]
pub fn format_balance(wei: U256) -> String {
    format!("{} ETH", wei_to_eth(wei))
}

/// Parse a human-readable ETH amount string into wei.
/// Accepts: "1.5" -> 1.5 * 10^18, "1" -> 10^18, "0.001" -> 10^15, ".5" -> 0.5 * 10^18
pub fn parse_eth_amount(input: &str) -> Result<U256> {
    let input = input.trim();

    if input.is_empty() {
        return Err(invalid("Amount cannot be empty"));
    }

    if input.starts_with('-') {
        return Err(invalid("Amount must not be negative"));
    }

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() > 2 {
        return Err(invalid(
            "Invalid amount format. Use ETH units like '0.001' or '1.5'.",
        ));
    }

    let whole_str = parts[0];
    let frac_str = parts.get(1).copied().unwrap_or("");

    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(invalid(format!("Invalid amount '{input}'")));
    }
    if !whole_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("Invalid whole part: '{whole_str}'")));
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("Invalid fractional part: '{frac_str}'")));
    }
    if frac_str.len() > ETH_DECIMALS {
        return Err(invalid(format!(
            "Too many decimal places. ETH supports up to {ETH_DECIMALS}."
        )));
    }

    let whole = if whole_str.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole_str).map_err(|_| invalid("Amount too large"))?
    };

    // Trailing dot: "1." is treated as "1.0"
    let frac_wei = if frac_str.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{frac_str:0<width$}", width = ETH_DECIMALS);
        U256::from_dec_str(&padded)
            .map_err(|_| invalid(format!("Invalid fractional part: '{frac_str}'")))?
    };

    whole
        .checked_mul(wei_per_eth())
        .and_then(|w| w.checked_add(frac_wei))
        .ok_or_else(|| invalid("Amount too large"))
}

/// Number of digits after the decimal point, ignoring trailing zeros.
#[must_use]
pub fn decimal_places(input: &str) -> usize {
    input
        .trim()
        .split_once('.')
        .map(|(_, frac)| frac.trim_end_matches('0').len())
        .unwrap_or(0)
}

fn invalid(msg: impl Into<String>) -> ClientError {
    ClientError::Validation(msg.into())
}

/// Shorten an address for compact display: 0x102ffe...9cfd3e
#[must_use]
pub fn short_address(address: &Address) -> String {
    let full = format!("{address:#x}");
    if full.len() > 16 {
        format!("{}...{}", &full[..8], &full[full.len() - 6..])
    } else {
        full
    }
}

/// Render a ledger timestamp in the local time zone.
#[must_use]
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| secs.to_string())
}

/// Format the message board for display, in ledger order.
#[must_use]
pub fn format_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return EMPTY_BOARD_TEXT.to_string();
    }

    let mut lines = Vec::with_capacity(messages.len() * 2);
    for msg in messages {
        lines.push(format!(
            "{:#x}  {}",
            msg.sender,
            format_timestamp(msg.timestamp)
        ));
        lines.push(format!("  {}", msg.text));
    }
    lines.join("\n")
}

/// Render whatever the controller says the board should show.
#[must_use]
pub fn format_board(board: &Board<'_>) -> String {
    match board {
        Board::ConnectPrompt => CONNECT_PROMPT.to_string(),
        Board::NoData => NO_DATA_TEXT.to_string(),
        Board::LoadFailed(err) => format!("Could not load messages: {err}"),
        Board::Empty => EMPTY_BOARD_TEXT.to_string(),
        Board::Messages(messages) => format_messages(messages),
    }
}

#[must_use]
pub fn format_messages_json(messages: &[Message]) -> String {
    let items: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "sender": format!("{:#x}", m.sender),
                "text": m.text,
                "timestamp": m.timestamp,
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

/// Format the contract balance line.
#[must_use]
pub fn format_fund(wei: U256) -> String {
    format!("Total Coffee Fund: {}", format_balance(wei))
}

#[must_use]
pub fn format_balance_json(wei: U256) -> String {
    serde_json::json!({
        "balance_wei": wei.to_string(),
        "balance_eth": wei_to_eth(wei),
    })
    .to_string()
}

#[must_use]
pub fn format_confirmation(confirmation: &Confirmation) -> String {
    let mut out = format!("Coffee sent!\n  Tx: {}", confirmation.tx_hash_hex());
    if let Some(block) = confirmation.block_number {
        out.push_str(&format!("\n  Block: {block}"));
    }
    if let Some(gas) = confirmation.gas_used {
        out.push_str(&format!("\n  Gas used: {gas}"));
    }
    out
}

#[must_use]
pub fn format_status(status: &NetworkStatus) -> String {
    format!(
        "Chain:    {} ({})\nBlock:    {}\nRPC:      {}\nContract: {:#x}",
        status.chain, status.chain_id, status.block_number, status.rpc_url, status.contract_address,
    )
}

#[must_use]
pub fn format_status_json(status: &NetworkStatus) -> String {
    serde_json::json!({
        "chain": status.chain.to_string(),
        "chain_id": status.chain_id,
        "block_number": status.block_number,
        "rpc_url": status.rpc_url,
        "contract": format!("{:#x}", status.contract_address),
    })
    .to_string()
}
