use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hyperprop_core::VariableCatalog;
use hyperprop_parser::parse_formula;
use tracing::info;

use crate::driver;

#[derive(Parser)]
#[command(name = "hyperprop")]
#[command(about = "Check HyperPLTL specifications against pairs of recorded traces")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check every specification of a fact directory and write the satisfied ones
    Check {
        /// Directory holding IntVars, BoolVars, the fact files and both specification files
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Output file, relative to the fact directory unless absolute
        #[arg(long, default_value = driver::SATISFIED)]
        output: PathBuf,
    },
    /// Parse a formula and print it in canonical form
    Print {
        formula: String,
        /// Term variable names
        #[arg(long, value_delimiter = ',')]
        int_vars: Vec<String>,
        /// Proposition variable names
        #[arg(long, value_delimiter = ',')]
        bool_vars: Vec<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Check { dir, output } => {
                let satisfied = driver::run(&dir)?;
                let output = dir.join(output);

                driver::write_satisfied(&output, &satisfied)?;
                info!(satisfied = satisfied.len(), output = %output.display(), "wrote satisfied specifications");
            }
            Command::Print {
                formula,
                int_vars,
                bool_vars,
            } => {
                let mut catalog = VariableCatalog::new();

                for name in &int_vars {
                    catalog.add_term_var(name)?;
                }

                for name in &bool_vars {
                    catalog.add_prop_var(name)?;
                }

                println!("{}", parse_formula(&formula, &catalog)?);
            }
        }

        Ok(())
    }
}
