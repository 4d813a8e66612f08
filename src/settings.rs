use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_trust_forwarded_for")]
    pub trust_forwarded_for: bool,

    #[serde(default)]
    pub sendgrid_api_key: Option<String>,

    #[serde(default = "default_sendgrid_api_url")]
    pub sendgrid_api_url: String,

    #[serde(default)]
    pub contact_recipient: Option<String>,

    #[serde(default)]
    pub recaptcha_secret: Option<String>,

    #[serde(default = "default_recaptcha_verify_url")]
    pub recaptcha_verify_url: String,

    #[serde(default = "default_recaptcha_min_score")]
    pub recaptcha_min_score: f64,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u32,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_outbound_timeout_secs")]
    pub outbound_timeout_secs: u64,

    #[serde(default = "default_subject")]
    pub default_subject: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Contact-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_trust_forwarded_for() -> bool {
    true
}
fn default_sendgrid_api_url() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}
fn default_recaptcha_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}
fn default_recaptcha_min_score() -> f64 {
    0.5
}
fn default_rate_limit_max_requests() -> u32 {
    5
}
fn default_rate_limit_window_secs() -> u64 {
    60 * 60
}
fn default_outbound_timeout_secs() -> u64 {
    10
}
fn default_subject() -> String {
    "Nouveau message".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            cors_allowed_origins: default_cors_origins(),
            trust_forwarded_for: default_trust_forwarded_for(),
            sendgrid_api_key: None,
            sendgrid_api_url: default_sendgrid_api_url(),
            contact_recipient: None,
            recaptcha_secret: None,
            recaptcha_verify_url: default_recaptcha_verify_url(),
            recaptcha_min_score: default_recaptcha_min_score(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            outbound_timeout_secs: default_outbound_timeout_secs(),
            default_subject: default_subject(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Deployment secrets are also accepted under their provider names
        config.sendgrid_api_key = fill_or_env(config.sendgrid_api_key, "SENDGRID_API_KEY");
        config.contact_recipient = fill_or_env(config.contact_recipient, "CONTACT_RECIPIENT");
        config.recaptcha_secret = fill_or_env(config.recaptcha_secret, "RECAPTCHA_SECRET");

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if !(0.0..=1.0).contains(&self.recaptcha_min_score) {
            errors.push("RECAPTCHA_MIN_SCORE must be between 0.0 and 1.0");
        }
        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be greater than zero");
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        if self.outbound_timeout_secs == 0 {
            errors.push("OUTBOUND_TIMEOUT_SECS must be greater than zero");
        }
        if Url::parse(&self.sendgrid_api_url).is_err() {
            errors.push("SENDGRID_API_URL is not a valid URL");
        }
        if Url::parse(&self.recaptcha_verify_url).is_err() {
            errors.push("RECAPTCHA_VERIFY_URL is not a valid URL");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Both the provider key and the recipient are needed to deliver mail.
    pub fn mail_configured(&self) -> bool {
        present(&self.sendgrid_api_key).is_some() && present(&self.contact_recipient).is_some()
    }

    pub fn captcha_enabled(&self) -> bool {
        present(&self.recaptcha_secret).is_some()
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }
}

/// Treats blank strings as absent.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn fill_or_env(current: Option<String>, env_key: &str) -> Option<String> {
    if present(&current).is_some() {
        return current;
    }
    env::var(env_key).ok().filter(|s| !s.trim().is_empty())
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match present(self) {
            Some(_) => "[REDACTED]",
            None => "[MISSING]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("sendgrid_api_key", &self.sendgrid_api_key.redact())
            .field("sendgrid_api_url", &self.sendgrid_api_url)
            .field("contact_recipient", &self.contact_recipient)
            .field("recaptcha_secret", &self.recaptcha_secret.redact())
            .field("recaptcha_verify_url", &self.recaptcha_verify_url)
            .field("recaptcha_min_score", &self.recaptcha_min_score)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("outbound_timeout_secs", &self.outbound_timeout_secs)
            .field("default_subject", &self.default_subject)
            .finish()
    }
}
