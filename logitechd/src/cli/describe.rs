use std::io::{BufWriter, Write};

use anyhow::Result;
use clap::Args;
use hidpp20::{
    nibble::U4,
    registry::{Feature, Function, KnownFunction},
};
use owo_colors::OwoColorize;
use serde_json::json;

use super::{Cli, parse_u4, parse_u16};

/// Look up the names of a feature and its functions.
#[derive(Args)]
pub struct DescribeCommand {
    /// The feature ID, e.g. 0x0001
    #[arg(value_parser = parse_u16)]
    feature: u16,

    /// A function ID within the feature. All known functions are listed if
    /// omitted.
    #[arg(value_parser = parse_u4)]
    function: Option<U4>,
}

impl DescribeCommand {
    pub fn execute(&self, root: &Cli) -> Result<()> {
        let feature = Feature::from(self.feature);
        let functions: Vec<Function> = match self.function {
            Some(number) => vec![Function::new(self.feature, number)],
            None => KnownFunction::ALL
                .iter()
                .filter(|func| func.feature().code() == self.feature)
                .map(|&func| Function::from(func))
                .collect(),
        };

        let mut stdout = BufWriter::new(anstream::stdout());

        if root.json {
            writeln!(
                stdout,
                "{}",
                json!({ "feature": feature, "functions": functions })
            )?;
            stdout.flush()?;
            return Ok(());
        }

        let name = if feature.known.is_some() {
            feature.name().to_string()
        } else {
            feature.name().bright_black().italic().to_string()
        };
        writeln!(stdout, "{} {}", name, format!("({:#06x})", feature.code).bright_black())?;

        let functions_len = functions.len();
        for (i, function) in functions.into_iter().enumerate() {
            writeln!(
                stdout,
                " {} {} {}",
                if i == functions_len - 1 { "╰─" } else { "├─" },
                function.number.bright_blue(),
                if function.known.is_some() {
                    function.description().to_string()
                } else {
                    function.description().bright_black().italic().to_string()
                }
            )?;
        }
        stdout.flush()?;

        Ok(())
    }
}
