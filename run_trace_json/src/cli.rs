use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::{num::NonZeroUsize, path::PathBuf};

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "run_trace_json")]
#[command(about = "Trace rays through an optical system described in JSON")]
pub struct Args {
    /// JSON file describing the system
    #[arg(required_unless_present = "schemas")]
    pub system: Option<PathBuf>,

    /// Number of rays traced from each source
    #[arg(short = 'n', long, default_value = "100")]
    pub rays: usize,

    /// Where to write the trace (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Trace chunks of rays in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Rays per chunk with --parallel
    #[arg(long, default_value = "1024")]
    pub chunk_size: NonZeroUsize,

    /// Set the logging level, `RUST_LOG` takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Print the parameters of every known type, then exit
    #[arg(long)]
    pub schemas: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["run_trace_json", "system.json"]);
        assert_eq!(args.system, Some(PathBuf::from("system.json")));
        assert_eq!(args.rays, 100);
        assert_eq!(args.chunk_size.get(), 1024);
        assert!(args.output.is_none() && !args.parallel);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Info);
    }

    #[test]
    fn test_system_is_required() {
        assert!(Args::try_parse_from(["run_trace_json"]).is_err());
        assert!(Args::try_parse_from(["run_trace_json", "--schemas"]).is_ok());
        assert!(Args::try_parse_from(["run_trace_json", "s.json", "--chunk-size", "0"]).is_err());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "run_trace_json",
            "s.json",
            "-n",
            "7",
            "-o",
            "out.json",
            "--parallel",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.rays, 7);
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(args.parallel);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }
}
