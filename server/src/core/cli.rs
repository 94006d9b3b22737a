use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_HOST, ENV_MAX_FILTERS, ENV_ON_ERROR, ENV_PORT, ENV_STRICT_OPERATORS,
};
use crate::filters::OnError;

#[derive(Parser)]
#[command(name = "qfilter")]
#[command(version, about = "Query-string filters to SQL predicates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// What to do with a filter that fails to translate (reject or skip)
    #[arg(long, global = true, env = ENV_ON_ERROR, value_parser = parse_on_error)]
    pub on_error: Option<OnError>,

    /// Reject keys with unrecognized bracket operators
    #[arg(long, global = true, env = ENV_STRICT_OPERATORS)]
    pub strict_operators: Option<bool>,

    /// Maximum number of filters per request
    #[arg(long, global = true, env = ENV_MAX_FILTERS)]
    pub max_filters: Option<usize>,
}

/// Parse filter error mode from CLI/env string
fn parse_on_error(s: &str) -> Result<OnError, String> {
    match s.to_lowercase().as_str() {
        "reject" => Ok(OnError::Reject),
        "skip" => Ok(OnError::Skip),
        _ => Err(format!(
            "Invalid error mode '{}'. Valid options: reject, skip",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the HTTP server (default command)
    Serve,
    /// Translate query pairs and print the result
    Translate {
        /// Query pairs such as `age[>-]=18` or `name=bob`
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,

        /// Print predicates as JSON instead of a WHERE fragment
        #[arg(long)]
        json: bool,

        /// Join predicates with `or` instead of `and`
        #[arg(long)]
        or: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub on_error: Option<OnError>,
    pub strict_operators: Option<bool>,
    pub max_filters: Option<usize>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        on_error: cli.on_error,
        strict_operators: cli.strict_operators,
        max_filters: cli.max_filters,
    };
    (config, cli.command)
}

/// Split a `KEY=VALUE` argument into its key and value.
///
/// The split happens at the first `=` after any bracketed operator suffix,
/// so `id[=]=null` yields (`id[=]`, `null`).
pub fn split_pair(arg: &str) -> Result<(&str, &str), String> {
    let invalid = || format!("Invalid pair '{}'. Expected KEY=VALUE", arg);
    let first_eq = arg.find('=').ok_or_else(invalid)?;

    let eq = match arg.find('[') {
        Some(open) if open < first_eq => arg[open..]
            .find(']')
            .and_then(|close| {
                let after = open + close + 1;
                arg[after..].find('=').map(|i| after + i)
            })
            .unwrap_or(first_eq),
        _ => first_eq,
    };
    Ok((&arg[..eq], &arg[eq + 1..]))
}
