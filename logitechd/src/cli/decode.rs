use std::io::{BufWriter, Write};

use anyhow::{Context, Result, bail};
use clap::Args;
use hidpp20::message::Message;
use itertools::Itertools;
use owo_colors::OwoColorize;
use serde_json::json;

use super::Cli;

/// Decode a raw HID++ 2.0 report.
#[derive(Args)]
pub struct DecodeCommand {
    /// The report as hex bytes, e.g. "10 01 00 11 00 00 42" or 10010011000042
    #[arg(required = true, num_args = 1..)]
    bytes: Vec<String>,
}

impl DecodeCommand {
    pub fn execute(&self, root: &Cli) -> Result<()> {
        let raw = parse_hex(&self.bytes)?;
        let msg = Message::from_bytes(&raw).context("not a valid HID++ 2.0 report")?;
        let error = msg.error_reply();

        let mut stdout = BufWriter::new(anstream::stdout());

        if root.json {
            writeln!(stdout, "{}", json!({ "message": msg, "error": error }))?;
            stdout.flush()?;
            return Ok(());
        }

        writeln!(
            stdout,
            "{}",
            raw.iter().map(|b| format!("{b:02x}")).join(" ").bright_black()
        )?;
        writeln!(stdout, "{msg}")?;
        if let Some(error) = error {
            writeln!(
                stdout,
                " ╰─ {} {:?} (feature index {:#04x}, function {}, sw_id {})",
                "error".red(),
                error.code,
                error.feature_index,
                error.function_id,
                error.software_id,
            )?;
        }
        stdout.flush()?;

        Ok(())
    }
}

/// Parses hex bytes, ignoring whitespace, colons and `0x` prefixes.
fn parse_hex(parts: &[String]) -> Result<Vec<u8>> {
    let digits: String = parts
        .iter()
        .flat_map(|part| part.split([' ', ':']))
        .map(|part| {
            part.strip_prefix("0x")
                .or_else(|| part.strip_prefix("0X"))
                .unwrap_or(part)
        })
        .collect();

    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            let pair = digits.get(i..i + 2).context("invalid hex digits")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("'{pair}' is not a hex byte"))
        })
        .collect()
}
