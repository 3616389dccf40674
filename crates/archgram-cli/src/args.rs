//! Command-line argument definitions for the Archgram CLI.
//!
//! The diagram itself is built into the binary, so every argument is
//! optional: running `archgram` alone renders the AWS VPC architecture to
//! SVG in the current directory.

use clap::Parser;

/// Command-line arguments for the Archgram diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Output format (svg, dot, png)
    #[arg(short, long, default_value = "svg")]
    pub format: String,

    /// Overrides the diagram direction (LR, RL, TB, BT)
    #[arg(short, long)]
    pub direction: Option<String>,

    /// Directory the diagram file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            format: "svg".to_string(),
            direction: None,
            output_dir: ".".to_string(),
            config: None,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let args = Args::parse_from(["archgram"]);
        assert_eq!(args.format, "svg");
        assert_eq!(args.output_dir, ".");
        assert_eq!(args.log_level, "info");
        assert!(args.direction.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "archgram",
            "--format",
            "dot",
            "-d",
            "TB",
            "--output-dir",
            "out",
        ]);
        assert_eq!(args.format, "dot");
        assert_eq!(args.direction.as_deref(), Some("TB"));
        assert_eq!(args.output_dir, "out");
    }
}
