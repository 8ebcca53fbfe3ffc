// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use notesplit::notes::{sanitize, ViolinString};
use notesplit::splitter::{self, BatchOutcome, Classification, SplitError, SplitReport};
use notesplit::util::{duration_minutes_seconds, filename_display};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Splits violin recordings into note samples."
)]
struct Cli {
    /// The path to a YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Splits a recording of one string into sustain and pluck clips.
    /// Prompts for anything not given on the command line.
    Split {
        /// The audio file name, relative to the base directory.
        filename: Option<String>,
        /// The string that was recorded: 0 = E, 1 = A, 2 = D, 3 = G (or the letter).
        #[arg(short, long)]
        string: Option<String>,
        /// The directory the file name is resolved against.
        #[arg(short, long)]
        base_dir: Option<String>,
    },
    /// Lists the notes recorded on each string.
    Notes {},
    /// Prints the effective configuration.
    Config {},
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = notesplit::config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Split {
            filename,
            string,
            base_dir,
        } => {
            let config = match base_dir {
                Some(base_dir) => config.with_base_dir(&base_dir),
                None => config,
            };
            let base = config.base_dir();

            let filename = match filename {
                Some(filename) => filename,
                None => {
                    println!("\nAudio file should be in {}.", base.display());
                    prompt("Enter the audio filename (e.g. g_string.mp3): ")?
                }
            };

            // Check the file before asking which string it is.
            if let Err(e) = splitter::resolve_input(&base, &filename) {
                print_error(&e);
                return Ok(());
            }

            let selection = match string {
                Some(string) => string,
                None => {
                    println!("\nSelect the violin string (0 = E, 1 = A, 2 = D, 3 = G):");
                    prompt("Enter the string number: ")?
                }
            };

            match splitter::split_file(&config, &filename, &selection) {
                Ok(report) => print_report(&report),
                Err(e) => print_error(&e),
            }
        }
        Commands::Notes {} => {
            for string in ViolinString::ALL {
                println!("{} = {}:", string.index(), string);
                for note in string.notes() {
                    println!("- {:<6} {}_{}", note, string.letter(), sanitize(note));
                }
            }
        }
        Commands::Config {} => {
            print!("{}", config);
        }
    }

    Ok(())
}

/// Prints the prompt and reads one line from stdin.
fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_error(error: &SplitError) {
    match error {
        SplitError::InputNotFound(path) => println!("Error: {}", path_not_found(path)),
        SplitError::InvalidSelection(e) => println!("Invalid choice: {}", e),
        e => println!("Error processing audio: {}", e),
    }
}

fn path_not_found(path: &std::path::Path) -> String {
    match path.parent() {
        Some(parent) => format!(
            "File '{}' not found in {}",
            filename_display(path),
            parent.display()
        ),
        None => format!("File '{}' not found", path.display()),
    }
}

fn print_report(report: &SplitReport) {
    println!(
        "Loaded {} ({}, {})",
        filename_display(&report.input),
        report.string,
        duration_minutes_seconds(report.duration)
    );
    println!("Found {} sustain segments", report.sustain_found);
    println!("Found {} pluck segments", report.pluck_found);
    for warning in report.warnings.iter() {
        println!("Warning: {}", warning);
    }

    for classification in Classification::ALL {
        let Some(outcome) = report.outcome(classification) else {
            println!("Skipped {} export", classification);
            continue;
        };

        for path in outcome.exported() {
            println!("Exported {}", path.display());
        }
        match outcome {
            BatchOutcome::Complete { .. } => {}
            BatchOutcome::Partial {
                shortfall_index, ..
            } => println!(
                "Error: Ran out of {} segments at index {}",
                classification, shortfall_index
            ),
            BatchOutcome::Failed { error, .. } => println!("Error processing audio: {}", error),
        }
    }
}
