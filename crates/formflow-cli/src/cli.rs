//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Formflow CLI - Validate and submit forms from the command line
///
/// Runs raw form input through schema validation and business rules and
/// prints the submission state a form would display next.
#[derive(Parser, Debug)]
#[command(
    name = "formflow",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FORMFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit form data and print the next submission state
    Submit(SubmitArgs),

    /// Run field validation only and print the issues
    Validate(ValidateArgs),

    /// Replay submission sessions from a scenario file
    Replay(ReplayArgs),

    /// Show or check form schemas
    Schema(SchemaArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Form input given as a file and/or individual fields
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// JSON or YAML file holding a flat object of field values
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Field value as NAME=VALUE (repeatable, overrides --data)
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Form schema file (defaults to the configured schema or the contact form)
    #[arg(short, long, value_name = "SCHEMA_FILE")]
    pub schema: Option<PathBuf>,
}

/// Arguments for the submit command
#[derive(Parser, Debug)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// State returned by a previous submission (JSON or YAML)
    #[arg(long, value_name = "STATE_FILE")]
    pub previous: Option<PathBuf>,

    /// Save the resulting state to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,

    /// How rejections are reported
    #[arg(long, value_enum)]
    pub reporting: Option<ReportingArg>,

    /// Which validation stages run
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Arguments for the replay command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Scenario file mapping session names to ordered submissions
    #[arg(value_name = "SCENARIO_FILE")]
    pub scenario: PathBuf,

    /// Form schema file (defaults to the configured schema or the contact form)
    #[arg(short, long, value_name = "SCHEMA_FILE")]
    pub schema: Option<PathBuf>,

    /// Show every intermediate state, not just the final one
    #[arg(long)]
    pub trace: bool,
}

/// Arguments for the schema command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub action: SchemaAction,
}

/// Schema actions
#[derive(Subcommand, Debug)]
pub enum SchemaAction {
    /// Print the effective schema (or the one in FILE)
    Show {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Check that a schema file loads and compiles
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),

    /// Print the configuration file locations that are searched
    Path,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Error reporting style
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportingArg {
    /// Per-field errors plus re-population values
    FieldLevel,
    /// A single message
    Generic,
}

/// Validation stages
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Schema validation and business rules
    Strict,
    /// Schema validation only
    Basic,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Parse a `NAME=VALUE` pair; the value may be empty or contain `=`
fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    if name.is_empty() {
        return Err(format!("field name is empty in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<ReportingArg> for formflow_core::ErrorReporting {
    fn from(arg: ReportingArg) -> Self {
        match arg {
            ReportingArg::FieldLevel => formflow_core::ErrorReporting::FieldLevel,
            ReportingArg::Generic => formflow_core::ErrorReporting::Generic,
        }
    }
}

impl From<ModeArg> for formflow_core::ValidationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Strict => formflow_core::ValidationMode::Strict,
            ModeArg::Basic => formflow_core::ValidationMode::Basic,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("first=Jon"), Ok(("first".into(), "Jon".into())));
        assert_eq!(parse_field("first="), Ok(("first".into(), String::new())));
        assert_eq!(parse_field("note=a=b"), Ok(("note".into(), "a=b".into())));
        assert!(parse_field("first").is_err());
        assert!(parse_field("=Jon").is_err());
    }

    #[test]
    fn test_submit_arguments() {
        let cli = Cli::parse_from([
            "formflow",
            "-o",
            "json",
            "submit",
            "-f",
            "first=Jon",
            "--field",
            "last=Lee",
            "--previous",
            "state.json",
            "--reporting",
            "generic",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Submit(args) => {
                assert_eq!(args.input.fields.len(), 2);
                assert_eq!(args.previous, Some(PathBuf::from("state.json")));
                assert_eq!(args.reporting, Some(ReportingArg::Generic));
                assert_eq!(args.mode, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::Validate(ValidateArgs {
                input: InputArgs::default(),
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }
}
