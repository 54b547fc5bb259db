use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "talent-scout")]
#[command(about = "Collect candidate experience from people search and shortlist it with an LLM", long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,

    /// Sets the logger's verbosity level
    #[arg(short, long, value_name = "VERBOSITY", default_value_t = LevelFilter::Info)]
    pub verbosity: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a browser window, log in by hand and save the session file
    Login,

    /// Search for candidates, analyze their experience and write the results
    Run {
        /// Role to search for and to judge candidates against
        #[arg(short, long, value_name = "QUERY", default_value = "Cyber Security Engineer")]
        query: String,

        /// Location added to the search keywords
        #[arg(short, long, value_name = "LOCATION", default_value = "Dublin, Ireland")]
        location: String,

        /// Maximum number of profiles to visit
        #[arg(short, long, value_name = "COUNT", default_value_t = 1)]
        max_profiles: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags_parse() {
        let args = Args::parse_from([
            "talent-scout",
            "-v",
            "debug",
            "run",
            "--query",
            "SRE",
            "--location",
            "Remote",
            "--max-profiles",
            "5",
        ]);

        assert_eq!(args.verbosity, LevelFilter::Debug);
        match args.command {
            Command::Run {
                query,
                location,
                max_profiles,
            } => {
                assert_eq!(query, "SRE");
                assert_eq!(location, "Remote");
                assert_eq!(max_profiles, 5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn run_defaults() {
        let args = Args::parse_from(["talent-scout", "run"]);
        assert!(matches!(
            args.command,
            Command::Run { max_profiles: 1, .. }
        ));
        assert_eq!(args.config, PathBuf::from("config.toml"));
    }
}
