//! Command-line arguments.

use clap::Parser;

use crate::collector::DEFAULT_PREFIX;
use crate::environment::DEFAULT_HOME_VAR;
use crate::switcher::Settings;

/// Switch the system-wide JDK.
///
/// Finds JDKs registered under SOFTWARE\JavaSoft (32-bit and 64-bit views)
/// and system variables named <PREFIX><label>, then sets the home variable
/// and moves its `bin` directory to the front of the system Path.
#[derive(Parser, Debug)]
#[command(name = "jdk-switcher")]
#[command(version)]
pub struct Cli {
    /// Prefix of system variables that register a JDK by hand
    #[arg(long, env = "JDK_SWITCH_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Variable to set to the selected installation path
    #[arg(long, env = "JDK_SWITCH_HOME_VAR", default_value = DEFAULT_HOME_VAR)]
    pub home_var: String,

    /// Print the discovered JDKs and exit
    #[arg(short, long, conflicts_with_all = ["select", "dry_run"])]
    pub list: bool,

    /// Pick the JDK with this menu number instead of prompting (0 exits)
    #[arg(short, long, value_name = "N")]
    pub select: Option<usize>,

    /// Read a typed number instead of showing the arrow-key menu
    #[arg(long)]
    pub plain: bool,

    /// Show what would be written without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Do not relaunch through the UAC prompt when not elevated
    #[arg(long)]
    pub no_elevate: bool,

    /// Suppress the banner
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            prefix: self.prefix.clone(),
            home_var: self.home_var.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Whether this invocation can end up writing to the registry.
    pub fn writes(&self) -> bool {
        !self.list && !self.dry_run && self.select != Some(0)
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
