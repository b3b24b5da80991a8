//! Rules command - validate and scaffold rule sets.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use docsift_core::{PipelineConfig, RuleSet};

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// Load a rules file and report what it defines
    Validate {
        /// Path to the rules file
        path: PathBuf,
    },

    /// Write a starter rules file
    Init {
        /// Path to write
        #[arg(default_value = "rules.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

const STARTER_RULES: &str = r#"{
  "invoice": {
    "keywords": ["invoice", "rechnung", "faktura"],
    "phrases": ["total due", "amount due", "bill to"],
    "regexes": ["\\bINV[-/]?\\d+"],
    "temperature": 1.0
  },
  "flight_ticket": {
    "keywords": ["airline", "boarding", "itinerary"],
    "phrases": ["boarding pass", "booking reference"],
    "regexes": ["\\b[A-Z]{2}\\s?\\d{3,4}\\b"]
  },
  "passport": {
    "keywords": ["passport", "nationality"],
    "phrases": ["date of expiry", "given names"]
  },
  "other": {}
}
"#;

pub fn run(args: RulesArgs) -> anyhow::Result<()> {
    match args.command {
        RulesCommand::Validate { path } => {
            let rules = RuleSet::from_file(&path, &PipelineConfig::default())?;
            println!(
                "{} {} is valid: {} classes",
                style("✓").green(),
                path.display(),
                rules.len()
            );
            for (name, class) in rules.iter() {
                println!(
                    "  {:<16} {} signals, temperature {}",
                    name,
                    class.signal_count(),
                    class.temperature()
                );
            }
            Ok(())
        }
        RulesCommand::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            fs::write(&path, STARTER_RULES)?;
            println!("{} Wrote starter rules to {}", style("✓").green(), path.display());
            Ok(())
        }
    }
}
