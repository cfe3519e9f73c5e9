//! Command-line and environment configuration.
//!
//! # Responsibility
//! - Define the `roster` argument surface.
//! - Resolve settings from flags, then `ROSTER_*` environment variables
//!   (optionally loaded from a dotenv file), then defaults.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Person/course enrollment store", long_about = None)]
pub struct Arguments {
    /// SQLite database file.
    #[arg(long = "database", env = "ROSTER_DATABASE", default_value = "roster.db")]
    pub database: PathBuf,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long = "log-level", env = "ROSTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset.
    #[arg(long = "log-dir", env = "ROSTER_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Environment file loaded before reading `ROSTER_*` variables.
    #[arg(long = "env-file")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print core health and version.
    Ping,
    #[command(subcommand)]
    Course(CourseCommand),
    #[command(subcommand)]
    Person(PersonCommand),
}

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    List,
    Get { id: i64 },
    Add { name: String },
    Rename { id: i64, name: String },
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum PersonCommand {
    List {
        /// "First Last", matched case-insensitively.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<i64>,
    },
    /// Look up by "First Last".
    Get { name: String },
    Add(PersonFields),
    /// Replace attributes and enrollment of the person named "First Last".
    Update {
        name: String,
        #[command(flatten)]
        fields: PersonFields,
    },
    Delete { name: String },
}

#[derive(Debug, Args)]
pub struct PersonFields {
    #[arg(long = "first")]
    pub first_name: String,
    #[arg(long = "last")]
    pub last_name: String,
    /// professor|student
    #[arg(long)]
    pub role: String,
    #[arg(long, allow_negative_numbers = true)]
    pub age: i64,
    /// Course id; repeat for several.
    #[arg(long = "course")]
    pub courses: Vec<i64>,
}

/// Loads the dotenv file named by `--env-file`, or `.env` when present.
///
/// Must run before `Arguments::parse` so `env = ...` attributes see the
/// loaded values. A missing default file is not an error.
pub fn load_env_file(raw_args: &[String]) -> Result<(), String> {
    match explicit_env_file(raw_args) {
        Some(path) => dotenv::from_path(&path)
            .map(|_| ())
            .map_err(|err| format!("failed to load env file `{}`: {err}", path.display())),
        None => {
            if Path::new(DEFAULT_ENV_FILE).exists() {
                dotenv::dotenv()
                    .map(|_| ())
                    .map_err(|err| format!("failed to load `{DEFAULT_ENV_FILE}`: {err}"))?;
            }
            Ok(())
        }
    }
}

fn explicit_env_file(raw_args: &[String]) -> Option<PathBuf> {
    let mut iter = raw_args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--env-file" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(value) = arg.strip_prefix("--env-file=") {
            return Some(PathBuf::from(value));
        }
    }
    None
}
