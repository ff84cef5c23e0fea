use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Args;
use hidpp20::{
    channel::{Loopback, RawHidChannel},
    driver::{Driver, DriverConfig},
    nibble::U4,
    report::{LONG_REPORT_ID, SHORT_REPORT_ID},
};
use owo_colors::OwoColorize;
use serde_json::json;

use super::{Cli, parse_u4, parse_u8};
use crate::hidraw::HidrawChannel;

/// Ping a device and report the protocol version it supports.
#[derive(Args)]
pub struct PingCommand {
    /// The hidraw node of the HID++ interface, e.g. /dev/hidraw3
    #[arg(required_unless_present = "loopback")]
    path: Option<PathBuf>,

    /// Echo every report back instead of talking to a device
    #[arg(long, conflicts_with = "path")]
    loopback: bool,

    /// The index of the device on the channel (0xff for directly connected
    /// devices)
    #[arg(short = 'i', long, default_value = "0xff", value_parser = parse_u8)]
    device_index: u8,

    /// The byte the device should echo
    #[arg(short, long, default_value = "0x42", value_parser = parse_u8)]
    data: u8,

    /// The software ID included in requests
    #[arg(long, default_value = "0x1", value_parser = parse_u4)]
    sw_id: U4,

    /// Send long (20 bytes) instead of short (7 bytes) reports
    #[arg(long)]
    long: bool,

    /// Fail if a reply does not match its request
    #[arg(long)]
    verify: bool,
}

impl PingCommand {
    pub fn execute(&self, root: &Cli) -> Result<()> {
        let config = DriverConfig {
            report_id: if self.long {
                LONG_REPORT_ID
            } else {
                SHORT_REPORT_ID
            },
            verify_replies: self.verify,
            ..Default::default()
        };

        let stdout = BufWriter::new(anstream::stdout());

        if self.loopback {
            return self.ping(Loopback::new(), config, root.json, stdout);
        }

        let path = self.path.as_deref().context("no hidraw node was given")?;
        let chan = HidrawChannel::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;
        self.ping(chan, config, root.json, stdout)
    }

    fn ping<T, W>(&self, chan: T, config: DriverConfig, json: bool, mut stdout: W) -> Result<()>
    where
        T: RawHidChannel,
        T::Error: Send + Sync + 'static,
        W: Write,
    {
        let mut driver = Driver::with_config(chan, self.device_index, config)?;
        driver.set_sw_id(self.sw_id);

        let version = driver
            .protocol_version()
            .context("could not determine the protocol version")?;
        let echoed = driver.ping(self.data).context("could not ping the device")?;

        if json {
            writeln!(
                stdout,
                "{}",
                json!({
                    "device_index": self.device_index,
                    "protocol_version": version,
                    "sent": self.data,
                    "received": echoed,
                })
            )?;
            stdout.flush()?;
            return Ok(());
        }

        writeln!(
            stdout,
            "{} {}: HID++ {}.{}",
            "device".bright_black(),
            format!("{:#04x}", self.device_index).bright_blue(),
            version.protocol_num,
            version.target_sw,
        )?;
        writeln!(
            stdout,
            " ╰─ ping {:#04x} → {}",
            self.data,
            if echoed == self.data {
                format!("{echoed:#04x}").green().to_string()
            } else {
                format!("{echoed:#04x}").red().to_string()
            }
        )?;
        stdout.flush()?;

        Ok(())
    }
}
