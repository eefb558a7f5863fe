//! Command-line interface definition using clap.

use clap::Parser;

use crate::game::GameConfig;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.1.0 (abc1234, 2026-01-29)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Event bus demo - players moving inside a border, with chat
#[derive(Parser, Debug)]
#[command(name = "eventbus-demo")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Half-width of the square border enforced for the first player
    #[arg(long, default_value_t = 500, env = "EVENTBUS_BORDER")]
    pub border: i32,

    /// Distance moved along X per step
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(i32).range(1..))]
    pub step: i32,

    /// Stop moving once X passes this value
    #[arg(long, default_value_t = 1000)]
    pub max_x: i32,

    /// Limit on nested dispatch depth
    #[arg(long, env = "EVENTBUS_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Builds the game configuration from the parsed arguments.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            border: self.border,
            step: self.step,
            max_x: self.max_x,
            max_dispatch_depth: self.max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["eventbus-demo"]);
        assert_eq!(cli.step, 200);
        assert_eq!(cli.max_x, 1000);
        assert!(!cli.json);
        assert_eq!(cli.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_cli_parse_options() {
        let cli = Cli::parse_from([
            "eventbus-demo",
            "--border",
            "300",
            "--step",
            "50",
            "--max-x",
            "400",
            "--max-depth",
            "4",
            "--json",
        ]);
        let config = cli.game_config();
        assert_eq!(config.border, 300);
        assert_eq!(config.step, 50);
        assert_eq!(config.max_x, 400);
        assert_eq!(config.max_dispatch_depth, Some(4));
        assert!(cli.json);
    }

    #[test]
    fn test_cli_rejects_non_positive_step() {
        assert!(Cli::try_parse_from(["eventbus-demo", "--step", "0"]).is_err());
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["eventbus-demo", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
