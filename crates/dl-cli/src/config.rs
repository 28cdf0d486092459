//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use dl_core::{LogConfig, NegativeDurationPolicy, Rule, default_category_rules, default_priority_rules};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The log's author, listed on every entry.
    pub user_name: String,

    /// Team members recognised in entry text.
    pub team_roster: Vec<String>,

    /// Category keywords, first match wins.
    pub category_rules: Vec<Rule>,

    /// Priority keywords, first match wins.
    pub priority_rules: Vec<Rule>,

    /// Treatment of entries that end before they start.
    pub negative_durations: NegativeDurationPolicy,

    pub email: EmailConfig,
}

/// How the `email` command delivers its message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailTransport {
    /// Authenticated SMTP submission upgraded with STARTTLS.
    #[default]
    Smtp,
    /// A local sendmail-compatible program reading the message on stdin.
    Sendmail,
}

/// Addresses and transport for the `email` command.
#[derive(Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// One or more comma-separated recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,

    /// Plain-text body placed above the attachment.
    pub body: String,

    pub transport: EmailTransport,

    /// SMTP relay host, e.g. `smtp.gmail.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smtp_server: Option<String>,

    /// SMTP submission port.
    pub port: u16,

    /// SMTP login; defaults to `from`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// SMTP password, normally supplied as `DL_EMAIL__PASSWORD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Program used by the sendmail transport.
    pub command: String,

    pub args: Vec<String>,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("transport", &self.transport)
            .field("smtp_server", &self.smtp_server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            cc: None,
            body: "Please find attached my daily task log.".to_string(),
            transport: EmailTransport::default(),
            smtp_server: None,
            port: 587,
            username: None,
            password: None,
            command: "sendmail".to_string(),
            args: vec!["-t".to_string()],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_name: std::env::var("USER").unwrap_or_else(|_| "me".to_string()),
            team_roster: Vec::new(),
            category_rules: default_category_rules(),
            priority_rules: default_priority_rules(),
            negative_durations: NegativeDurationPolicy::default(),
            email: EmailConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (DL_*, DL_EMAIL__TO for nested keys)
        figment = figment.merge(Env::prefixed("DL_").split("__"));

        figment.extract()
    }

    /// The part of the configuration the log pipeline consumes.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            user_name: self.user_name.clone(),
            team_roster: self.team_roster.clone(),
            category_rules: self.category_rules.clone(),
            priority_rules: self.priority_rules.clone(),
            negative_durations: self.negative_durations,
        }
    }
}

/// Returns the platform-specific config directory for dl.
///
/// On Linux: `~/.config/daylog`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("daylog"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_daylog() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "daylog");
    }

    #[test]
    fn test_default_config_uses_builtin_rules() {
        let config = Config::default();
        assert_eq!(config.category_rules, default_category_rules());
        assert_eq!(config.priority_rules, default_priority_rules());
        assert_eq!(config.email.transport, EmailTransport::Smtp);
        assert_eq!(config.email.port, 587);
        assert_eq!(config.email.command, "sendmail");
        assert!(config.email.to.is_none());
        assert!(config.email.password.is_none());
    }

    #[test]
    fn test_load_from_file_keeps_rule_order() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
user_name = "Flash"
team_roster = ["Serge", "Kimi"]
negative_durations = "clamp"

[[category_rules]]
keyword = "review"
label = "Review"

[[category_rules]]
keyword = "meet"
label = "Communication"

[email]
to = "boss@example.com"
smtp_server = "smtp.example.com"
port = 2525
username = "flash"
password = "hunter2"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.user_name, "Flash");
        assert_eq!(config.team_roster, ["Serge", "Kimi"]);
        assert_eq!(
            config.category_rules,
            [Rule::new("review", "Review"), Rule::new("meet", "Communication")]
        );
        assert_eq!(config.priority_rules, default_priority_rules());
        assert_eq!(config.negative_durations, NegativeDurationPolicy::Clamp);
        assert_eq!(config.email.to.as_deref(), Some("boss@example.com"));
        assert_eq!(config.email.transport, EmailTransport::Smtp);
        assert_eq!(config.email.smtp_server.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.email.port, 2525);
        assert_eq!(config.email.username.as_deref(), Some("flash"));
        assert_eq!(config.email.password.as_deref(), Some("hunter2"));
        assert_eq!(config.email.command, "sendmail");
    }

    #[test]
    fn test_debug_redacts_password() {
        let email = EmailConfig {
            password: Some("hunter2".to_string()),
            ..EmailConfig::default()
        };
        let debug = format!("{email:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_load_sendmail_transport() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[email]\ntransport = \"sendmail\"\ncommand = \"cat\"\nargs = []\n").unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.email.transport, EmailTransport::Sendmail);
        assert_eq!(config.email.command, "cat");
        assert!(config.email.args.is_empty());
    }

    #[test]
    fn test_log_config_copies_tables() {
        let config = Config {
            user_name: "Flash".to_string(),
            team_roster: vec!["Serge".to_string()],
            ..Config::default()
        };
        let log_config = config.log_config();
        assert_eq!(log_config.user_name, "Flash");
        assert_eq!(log_config.team_roster, ["Serge"]);
        assert_eq!(log_config.category_rules, config.category_rules);
    }
}
