use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SuspenseConfig;
use crate::contestant::display_name;
use crate::error::{RaffleError, Result};
use crate::ledger::{EditOutcome, Ledger};
use crate::suspense::{self, SuspenseStyle};
use crate::table;

#[derive(Parser)]
#[command(author, version, about = "Fairness-weighted name raffle", long_about = None)]
pub struct Cli {
    /// State file (overrides $RAFFLE_STATE and the config file)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Config file (default: <config dir>/name-raffle/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Draw the next winner from the least-picked contestants
    Draw {
        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Override the configured suspense effect
        #[arg(long, value_enum)]
        suspense: Option<SuspenseStyle>,
    },

    /// Revert the most recent draw
    Undo,

    /// Add contestants, tied with the least-picked contestant
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Remove contestants
    Remove {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Keep a contestant in the list but out of the draw
    Exclude { name: String },

    /// Put an excluded contestant back into the draw
    Include { name: String },

    /// Zero every count and forget the history
    Reset,

    /// Set one contestant's count (clears the history if it changes)
    Set {
        name: String,
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },

    /// Print the name/count table
    Table,

    /// Replace the table with an edited copy (`-` reads stdin)
    Edit { file: PathBuf },

    /// Print the draw history, oldest first
    History,
}

/// Runs one command against the ledger, writing user-facing messages to `out`.
pub fn run<W: Write>(
    command: Command,
    ledger: &mut Ledger,
    settings: &SuspenseConfig,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Draw { seed, suspense: style } => {
            if ledger.eligible_tier().is_none() {
                return Err(RaffleError::EmptyPool.into());
            }

            let names: Vec<String> = ledger.entries().keys().map(|k| display_name(k)).collect();
            let style = style.unwrap_or(settings.style);
            suspense::play(out, style, settings.duration(), &names, &mut rand::rng())?;

            let mut rng: Box<dyn RngCore> = match seed {
                Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
                None => Box::new(rand::rng()),
            };
            let winner = ledger.pick_winner(&mut *rng)?;
            writeln!(out, "The winner is {winner}.")?;
        }
        Command::Undo => {
            writeln!(out, "{}", ledger.undo_last_pick())?;
        }
        Command::Add { names } => {
            for name in names {
                writeln!(out, "{}", ledger.add_contestant(&name)?)?;
            }
        }
        Command::Remove { names } => {
            for name in names {
                writeln!(out, "{}", ledger.remove_contestant(&name))?;
            }
        }
        Command::Exclude { name } => {
            let changed = ledger.set_excluded(&name, true)?;
            let note = if changed { "is now excluded" } else { "was already excluded" };
            writeln!(out, "{} {note}.", display_name(name.trim()))?;
        }
        Command::Include { name } => {
            let changed = ledger.set_excluded(&name, false)?;
            let note = if changed { "is back in the draw" } else { "was not excluded" };
            writeln!(out, "{} {note}.", display_name(name.trim()))?;
        }
        Command::Reset => {
            ledger.reset_scores();
            writeln!(out, "All counts reset.")?;
        }
        Command::Set { name, count } => {
            let outcome = ledger.set_count(&name, count)?;
            report_edit(out, outcome)?;
        }
        Command::Table => {
            if ledger.is_empty() {
                writeln!(out, "No contestants.")?;
            } else {
                write!(out, "{}", table::render(ledger))?;
            }
        }
        Command::Edit { file } => {
            let text = if file.as_os_str() == "-" {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                text
            } else {
                fs::read_to_string(&file)?
            };
            let rows = table::parse(&text)?;
            let outcome = ledger.apply_edits(rows)?;
            report_edit(out, outcome)?;
        }
        Command::History => {
            for (i, key) in ledger.history().iter().enumerate() {
                writeln!(out, "{:>3}. {}", i + 1, display_name(key))?;
            }
        }
    }
    Ok(())
}

fn report_edit<W: Write>(out: &mut W, outcome: EditOutcome) -> io::Result<()> {
    match outcome {
        EditOutcome::Unchanged => writeln!(out, "Nothing changed."),
        EditOutcome::Applied => writeln!(out, "Table updated, history cleared."),
    }
}
