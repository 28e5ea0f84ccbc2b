//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, an optional YAML
//! configuration file, and the resolved [`ChatConfig`]. Command-line flags
//! override the file, which overrides the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_TIMEOUT;
use crate::error::{Error, Result};
use crate::types::{IncomeBand, Occupation, UserProfile};

/// Command-line arguments for the moneymitra-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend base URL (default: http://localhost:8000/api/)", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 30)", "SECONDS")]
    pub timeout: Option<u64>,

    /// YAML configuration file.
    #[arrrg(optional, "YAML configuration file", "FILE")]
    pub config: Option<String>,

    /// Occupation label.
    #[arrrg(optional, "Occupation, e.g. \"Uber/Ola driver\"", "OCCUPATION")]
    pub occupation: Option<String>,

    /// Monthly income range.
    #[arrrg(optional, "Monthly income range, e.g. 18000-25000", "RANGE")]
    pub income: Option<String>,

    /// Monthly expenses.
    #[arrrg(optional, "Monthly expenses in rupees", "AMOUNT")]
    pub expenses: Option<String>,

    /// Location.
    #[arrrg(optional, "Location, e.g. Mumbai", "CITY")]
    pub location: Option<String>,

    /// Skip the interactive profile questions.
    #[arrrg(flag, "Skip profile setup and start chatting")]
    pub skip_setup: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Client request log.
    #[arrrg(optional, "Append client requests to this JSON-lines file", "FILE")]
    pub log_file: Option<String>,
}

/// Profile defaults as written in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDefaults {
    /// Occupation label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<Occupation>,

    /// Income range such as `18000-25000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<IncomeBand>,

    /// Monthly expenses in rupees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<String>,

    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// The YAML configuration file.
///
/// ```yaml
/// base_url: http://localhost:8000/api/
/// timeout_secs: 30
/// color: true
/// profile:
///   occupation: Uber/Ola driver
///   income: 25000-35000
///   expenses: "21000"
///   location: Pune
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Backend base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Whether to use ANSI colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Skip the interactive profile questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_setup: Option<bool>,

    /// Client request log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Profile defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDefaults>,
}

impl ConfigFile {
    /// Load a configuration file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::io(format!("failed to read config {}", path.display()), err)
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after layering the
/// config file and command-line arguments over the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Backend base URL; `None` lets the client consult the environment.
    pub base_url: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to skip the interactive profile questions.
    pub skip_setup: bool,

    /// Initial profile, pre-filled into the setup form.
    pub profile: UserProfile,

    /// File receiving one JSON line per client event.
    pub log_file: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: from the environment, else the local development server
    /// - Timeout: 30 seconds
    /// - Color: enabled
    /// - Setup: interactive
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            use_color: true,
            skip_setup: false,
            profile: UserProfile::default(),
            log_file: None,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the initial profile.
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the client log path.
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Resolve arguments into a configuration, loading `--config` if given.
    pub fn from_args(args: ChatArgs) -> Result<Self> {
        let mut config = ChatConfig::new();
        if let Some(path) = &args.config {
            config.apply_file(ConfigFile::from_file(path)?)?;
        }
        config.apply_args(args)?;
        Ok(config)
    }

    /// Layer a configuration file over the current values.
    pub fn apply_file(&mut self, file: ConfigFile) -> Result<()> {
        if let Some(base_url) = file.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = timeout_from_secs(secs)?;
        }
        if let Some(color) = file.color {
            self.use_color = color;
        }
        if let Some(skip) = file.skip_setup {
            self.skip_setup = skip;
        }
        if let Some(path) = file.log_file {
            self.log_file = Some(path);
        }
        if let Some(profile) = file.profile {
            if let Some(occupation) = profile.occupation {
                self.profile.occupation = occupation;
            }
            if let Some(income) = profile.income {
                self.profile.income = income;
            }
            if let Some(expenses) = profile.expenses {
                self.profile.set_expenses(&expenses)?;
            }
            if let Some(location) = profile.location {
                self.profile.set_location(&location)?;
            }
        }
        Ok(())
    }

    /// Layer command-line arguments over the current values.
    pub fn apply_args(&mut self, args: ChatArgs) -> Result<()> {
        if let Some(base_url) = args.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(secs) = args.timeout {
            self.timeout = timeout_from_secs(secs)?;
        }
        if args.no_color {
            self.use_color = false;
        }
        if args.skip_setup {
            self.skip_setup = true;
        }
        if let Some(path) = args.log_file {
            self.log_file = Some(PathBuf::from(path));
        }
        if let Some(occupation) = args.occupation {
            self.profile.occupation = occupation
                .parse()
                .map_err(|e| Error::validation(format!("{e}"), Some("occupation".to_string())))?;
        }
        if let Some(income) = args.income {
            self.profile.income = income
                .parse()
                .map_err(|e| Error::validation(format!("{e}"), Some("income".to_string())))?;
        }
        if let Some(expenses) = args.expenses {
            self.profile.set_expenses(&expenses)?;
        }
        if let Some(location) = args.location {
            self.profile.set_location(&location)?;
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn timeout_from_secs(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(Error::config("timeout must be at least one second"));
    }
    Ok(Duration::from_secs(secs))
}
