use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// How SSE connections learn about newly published articles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifierMode {
    /// Articles are pushed to connections as soon as they are created.
    Push,
    /// Each connection re-reads the newest article on a fixed interval.
    Poll,
}

#[derive(Debug, PartialEq, Eq)]
pub struct NotifierModeParseError;

impl FromStr for NotifierMode {
    type Err = NotifierModeParseError;
    fn from_str(mode: &str) -> Result<NotifierMode, Self::Err> {
        match mode.to_lowercase().as_str() {
            "push" => Ok(NotifierMode::Push),
            "poll" => Ok(NotifierMode::Poll),
            _ => Err(NotifierModeParseError),
        }
    }
}

impl fmt::Display for NotifierMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotifierMode::Push => write!(f, "push"),
            NotifierMode::Poll => write!(f, "poll"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that are allowed to receive API responses.
    /// A single `*` allows any origin.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "*"
    )]
    pub allowed_origins: Vec<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,

    /// How SSE clients are told about new articles: `push` delivers each new
    /// article immediately, `poll` checks for a newer article on a timer.
    #[arg(
        long,
        env,
        default_value_t = NotifierMode::Push,
        value_parser = clap::builder::PossibleValuesParser::new(["push", "poll", "PUSH", "POLL"])
            .map(|s| s.parse::<NotifierMode>().unwrap()),
    )]
    pub notifier_mode: NotifierMode,

    /// Interval in milliseconds between checks for a newer article in `poll` mode
    #[arg(long, env, default_value_t = 1000)]
    pub notifier_poll_interval_ms: u64,

    /// Populate the news store with the sample articles on startup
    #[arg(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    pub seed_sample_news: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("127.0.0.1")
    }

    /// Address the HTTP server binds to, e.g. `127.0.0.1:4000`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.interface(), self.port)
    }

    /// True when any origin may receive API responses.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o.trim() == "*")
    }

    pub fn notifier_poll_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.notifier_poll_interval_ms.max(1))
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["news_platform_rs"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn defaults_match_the_demo_setup() {
        let config = parse(&[]);

        assert_eq!(config.listen_addr(), "127.0.0.1:4000");
        assert!(config.allows_any_origin());
        assert_eq!(config.notifier_mode, NotifierMode::Push);
        assert_eq!(config.notifier_poll_interval(), Duration::from_secs(1));
        assert!(config.seed_sample_news);
        assert_eq!(config.log_level_filter, LevelFilter::Info);
        assert!(!config.is_production());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--allowed-origins",
            "http://localhost:3000,https://news.example.com",
            "--notifier-mode",
            "poll",
            "--notifier-poll-interval-ms",
            "250",
            "--seed-sample-news",
            "false",
            "--runtime-env",
            "production",
            "--port",
            "8080",
        ]);

        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://news.example.com"]
        );
        assert!(!config.allows_any_origin());
        assert_eq!(config.notifier_mode, NotifierMode::Poll);
        assert_eq!(config.notifier_poll_interval(), Duration::from_millis(250));
        assert!(!config.seed_sample_news);
        assert!(config.is_production());
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn notifier_mode_round_trips_through_strings() {
        assert_eq!("PUSH".parse::<NotifierMode>(), Ok(NotifierMode::Push));
        assert_eq!("poll".parse::<NotifierMode>(), Ok(NotifierMode::Poll));
        assert_eq!(
            "websocket".parse::<NotifierMode>(),
            Err(NotifierModeParseError)
        );
        assert_eq!(NotifierMode::Poll.to_string(), "poll");
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let config = parse(&["--notifier-poll-interval-ms", "0"]);

        assert_eq!(config.notifier_poll_interval(), Duration::from_millis(1));
    }
}
