use anyhow::Result;

mod cli;
mod hidraw;

fn main() -> Result<()> {
    cli::execute()
}
