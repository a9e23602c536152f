//! Command-line interface for Skirmish
//!
//! Runs a headless arena match from a JSON config file.

use clap::Parser;
use std::path::PathBuf;

/// Headless arena battle simulator
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Headless arena battle simulator")]
#[command(version)]
pub struct Args {
    /// JSON match config file
    #[arg(value_name = "CONFIG_FILE")]
    pub config: PathBuf,

    /// Output path for match log (overrides the config)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum match duration in seconds (overrides the config)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed for a reproducible match (overrides the config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// RON archetype file to use instead of the built-in archetypes
    #[arg(long, value_name = "ARCHETYPES_FILE")]
    pub archetypes: Option<PathBuf>,

    /// Skip writing the combat log
    #[arg(long)]
    pub no_log: bool,

    /// Print engine log output (info! and above)
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_parse() {
        let args = Args::parse_from([
            "skirmish",
            "match.json",
            "--seed",
            "7",
            "--max-duration",
            "30",
            "--no-log",
        ]);
        assert_eq!(args.config, PathBuf::from("match.json"));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.max_duration, Some(30.0));
        assert!(args.no_log);
        assert!(!args.verbose);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_config_path_is_required() {
        assert!(Args::try_parse_from(["skirmish"]).is_err());
    }
}
