// Calculator - runs the classic demo sequence through aspect chains

mod cli;

use anyhow::{Context, Result};
use aspectx::calculator::{AspectCalculator, Calculator, CalculatorConfig};
use aspectx::cfg::TypeOptions;
use aspectx::log::LoggerConfig;
use clap::Parser;
use std::fmt::Display;
use std::fs;
use std::path::Path;

use cli::Cli;

/// Load configuration from file
fn load_config(path: &Path) -> Result<CalculatorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    json5::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Apply command line overrides to the default logger
fn apply_overrides(config: &mut CalculatorConfig, cli: &Cli) {
    if let LoggerConfig::Create(logger) = &mut config.logger {
        if let Some(level) = &cli.level {
            logger.level = level.clone();
        }
        if cli.json {
            logger.formatter = TypeOptions::of("JsonFormatter");
        }
    }
}

fn report<T: Display, E: Display>(expression: &str, result: Result<T, E>) {
    match result {
        Ok(value) => println!("{} = {}", expression, value),
        Err(err) => println!("{} failed: {}", expression, err),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CalculatorConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    let calculator = AspectCalculator::from_config(config)?;

    report("add(2, 7)", calculator.add(2, 7));
    report("subtract(10, 8)", calculator.subtract(10, 8));
    report("multiply(3, 3)", calculator.multiply(3, 3));
    report("divide(20, 4)", calculator.divide(20, 4));
    report("divide(20, 0)", calculator.divide(20, 0));

    Ok(())
}
