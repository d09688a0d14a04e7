/// CLI argument parsing

use clap::{Parser, Subcommand};

// Build timestamp injected at compile time
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

// Get version with timestamp
pub fn get_version() -> &'static str {
    VERSION_WITH_BUILD
}

#[derive(Parser, Debug)]
#[command(name = "teenmatch-cli")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// Moderator API endpoint (overrides the config file)
    #[arg(long, global = true, env = "MODERATOR_API_URL")]
    pub api_url: Option<String>,

    /// Log filter, e.g. "debug" or "teenmatch_cli=trace"
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Open the moderator dashboard
    Moderate,

    /// List profiles awaiting moderation
    Pending,

    /// List open reports
    Reports,

    /// Show moderation statistics
    Stats,

    /// Approve a pending profile
    Approve {
        /// Profile id
        id: i64,
    },

    /// Reject a pending profile
    Reject {
        /// Profile id
        id: i64,
    },

    /// Mark a report as resolved
    Resolve {
        /// Report id
        id: i64,
    },

    /// Dismiss a report
    Dismiss {
        /// Report id
        id: i64,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    /// True for commands that take over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self, Commands::Moderate)
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// View configuration
    View,

    /// Set the moderator API endpoint
    SetApiUrl {
        url: String,
    },

    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_opens_swipe_screen() {
        let cli = Cli::try_parse_from(["teenmatch-cli"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_action_commands_take_ids() {
        let cli = Cli::try_parse_from(["teenmatch-cli", "approve", "42"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Approve { id: 42 }));

        let cli = Cli::try_parse_from(["teenmatch-cli", "dismiss", "7", "--api-url", "http://x/api"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Dismiss { id: 7 }));
        assert_eq!(cli.api_url.as_deref(), Some("http://x/api"));

        assert!(Cli::try_parse_from(["teenmatch-cli", "reject", "abc"]).is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["teenmatch-cli", "config", "set-api-url", "https://mod.example.com"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommands::SetApiUrl { url: "https://mod.example.com".to_string() }
            })
        );
        assert!(!cli.command.unwrap().is_interactive());
    }

    #[test]
    fn test_version_carries_build_time() {
        assert!(get_version().starts_with(env!("CARGO_PKG_VERSION")));
        assert!(get_version().contains(BUILD_TIMESTAMP));
    }
}
