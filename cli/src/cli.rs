//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "evac-council",
    about = "Multi-evaluator evacuation planning with consensus-gated approval",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one planning workflow over a scenario document
    Run {
        /// Path to the raw scenario JSON document
        #[arg(short, long, value_name = "FILE")]
        scenario: PathBuf,

        /// Explicit config file (highest priority)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Run identifier; generated when omitted
        #[arg(long, value_name = "ID")]
        run_id: Option<String>,

        /// Resume the run from its last checkpoint instead of starting over
        #[arg(long, requires = "run_id")]
        resume: bool,

        /// Override the checkpoint directory from config
        #[arg(long, value_name = "DIR")]
        checkpoint_dir: Option<PathBuf>,

        /// Override the transition trace file from config
        #[arg(long, value_name = "FILE")]
        trace_file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_run() {
        let cli = Cli::try_parse_from(["evac-council", "run", "--scenario", "fire.json"]).unwrap();
        let Command::Run { scenario, resume, .. } = cli.command;
        assert_eq!(scenario, PathBuf::from("fire.json"));
        assert!(!resume);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn resume_requires_a_run_id() {
        assert!(
            Cli::try_parse_from(["evac-council", "run", "--scenario", "fire.json", "--resume"])
                .is_err()
        );
        assert!(Cli::try_parse_from([
            "evac-council",
            "run",
            "--scenario",
            "fire.json",
            "--resume",
            "--run-id",
            "run-7",
        ])
        .is_ok());
    }
}
