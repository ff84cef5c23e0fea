mod decode;
mod describe;
mod ping;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use decode::DecodeCommand;
use describe::DescribeCommand;
use hidpp20::nibble::U4;
use ping::PingCommand;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    color: colorchoice_clap::Color,

    #[command(subcommand)]
    command: Commands,

    /// Output plain JSON without color
    #[arg(short, long, global = true)]
    json: bool,

    /// Log more details to stderr (-v for debug, -vv for every report)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    Ping(PingCommand),
    Describe(DescribeCommand),
    Decode(DecodeCommand),
}

pub fn execute() -> Result<()> {
    let cli = Cli::parse();

    cli.color.write_global();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Ping(cmd) => cmd.execute(&cli),
        Commands::Describe(cmd) => cmd.execute(&cli),
        Commands::Decode(cmd) => cmd.execute(&cli),
    }
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses an integer given either in decimal or `0x`-prefixed hexadecimal
/// notation.
fn parse_int<T>(raw: &str) -> Result<T, String>
where
    T: TryFrom<u32>,
{
    let value = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse::<u32>(),
    }
    .map_err(|err| format!("'{raw}' is not a number: {err}"))?;

    T::try_from(value).map_err(|_| format!("{value:#x} is out of range"))
}

fn parse_u8(raw: &str) -> Result<u8, String> {
    parse_int(raw)
}

fn parse_u16(raw: &str) -> Result<u16, String> {
    parse_int(raw)
}

fn parse_u4(raw: &str) -> Result<U4, String> {
    U4::try_from(parse_u8(raw)?).map_err(|err| err.to_string())
}
