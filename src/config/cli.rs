//! Command-line interface definition.
//!
//! Parsed by the binary and converted into a library `Config`; kept here so
//! the parsing rules can be tested without spawning the binary.
//!
//! # Examples
//!
//! ```bash
//! # First catalog page, sample token
//! agri_open_data --sample search
//!
//! # Third page of 20, XML, filtered
//! agri_open_data search --page 3 --page-size 20 --format xml --query 가공
//!
//! # Vegetable ranking for one year, as JSON
//! agri_open_data vegetables --year 2022 --json
//!
//! # Local relay
//! agri_open_data relay --port 8888
//! ```

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    API_KEY_ENV, DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_RELAY_PORT,
    DEFAULT_RELAY_PREFIX, DEFAULT_RELAY_UPSTREAM, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    PAGE_SIZE_CHOICES,
};
use crate::config::types::{Config, DataFormat, LogFormat, LogLevel};

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(
    name = "agri_open_data",
    version,
    about = "Browses the agricultural open-data catalog and vegetable production statistics."
)]
pub struct Cli {
    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalArgs,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// API key (first path segment of every request)
    #[arg(long, global = true, env = API_KEY_ENV, default_value = DEFAULT_API_KEY, hide_default_value = true, hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the API, or of a relay in front of it
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Use the 5-row sample token instead of the API key
    #[arg(long, global = true)]
    pub sample: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

impl GlobalArgs {
    /// Library configuration for these options.
    pub fn to_config(&self) -> Config {
        Config {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            use_sample: self.sample,
            timeout_seconds: self.timeout_seconds,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show one page of the dataset catalog
    Search(SearchArgs),
    /// Rank vegetable production by year
    Vegetables(VegetablesArgs),
    /// Run the HTTP relay in front of the upstream API
    Relay(RelayArgs),
}

/// Options for `search`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub page: u64,

    /// Rows per page: 10, 20, 50 or 100
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Response format requested from the API
    #[arg(long, value_enum, default_value_t = DataFormat::Json)]
    pub format: DataFormat,

    /// Case-insensitive substring matched against the Korean dataset name
    #[arg(long)]
    pub query: Option<String>,

    /// Print the page as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Options for `vegetables`.
#[derive(Debug, Clone, Args)]
pub struct VegetablesArgs {
    /// Year to rank (default: the newest year in the data)
    #[arg(long)]
    pub year: Option<i32>,

    /// Print the ranking as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Options for `relay`.
#[derive(Debug, Clone, Args)]
pub struct RelayArgs {
    /// Port to listen on (127.0.0.1)
    #[arg(long, default_value_t = DEFAULT_RELAY_PORT)]
    pub port: u16,

    /// HTTP origin requests are forwarded to
    #[arg(long, default_value = DEFAULT_RELAY_UPSTREAM)]
    pub upstream: String,

    /// Mount prefix removed from incoming paths
    #[arg(long, default_value = DEFAULT_RELAY_PREFIX)]
    pub strip_prefix: String,
}

fn parse_page_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if PAGE_SIZE_CHOICES.contains(&size) {
        Ok(size)
    } else {
        Err(format!(
            "page size must be one of {}",
            PAGE_SIZE_CHOICES
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("50"), Ok(50));
        assert!(parse_page_size("15")
            .expect_err("not offered")
            .contains("10, 20, 50, 100"));
        assert!(parse_page_size("ten").is_err());
    }

    #[test]
    fn test_to_config_carries_sample_flag() {
        let cli = Cli::try_parse_from(["agri_open_data", "--sample", "search"]).expect("parse");
        let config = cli.global.to_config();
        assert!(config.use_sample);
        assert_eq!(config.api_token(), "sample");
    }
}
