use std::env;
use std::fmt;

use reqwest::Url;

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_COURSES_PATH: &str = "/api/public-courses/";
const DEFAULT_APPLICATIONS_PATH: &str = "/api/application/";
const DEFAULT_NOTICE_SECONDS: i64 = 4;

/// Top-level configuration for the intake client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub endpoints: EndpointConfig,
    pub form: FormSettings,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let endpoints = EndpointConfig {
            base_url: env::var("INTAKE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            courses_path: env::var("INTAKE_COURSES_PATH")
                .unwrap_or_else(|_| DEFAULT_COURSES_PATH.to_string()),
            applications_path: env::var("INTAKE_APPLICATIONS_PATH")
                .unwrap_or_else(|_| DEFAULT_APPLICATIONS_PATH.to_string()),
        };
        // Surface a bad origin at startup rather than on the first request.
        endpoints.courses_url()?;

        let notice_duration = match env::var("INTAKE_NOTICE_SECONDS") {
            Ok(raw) => notice_duration(&raw)?,
            Err(_) => chrono::Duration::seconds(DEFAULT_NOTICE_SECONDS),
        };

        let form = FormSettings {
            notice_duration,
            guard_double_submit: flag("INTAKE_GUARD_DOUBLE_SUBMIT")?,
            surface_transport_errors: flag("INTAKE_SURFACE_TRANSPORT_ERRORS")?,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            endpoints,
            form,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Whole, non-negative seconds that chrono can represent.
fn notice_duration(raw: &str) -> Result<chrono::Duration, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|seconds| *seconds >= 0)
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| ConfigError::InvalidNoticeDuration {
            value: raw.to_string(),
        })
}

fn flag(name: &'static str) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value: raw }),
    }
}

/// Location of the remote course listing and application intake endpoints.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub courses_path: String,
    pub applications_path: String,
}

impl EndpointConfig {
    pub fn courses_url(&self) -> Result<Url, ConfigError> {
        self.join(&self.courses_path)
    }

    pub fn applications_url(&self) -> Result<Url, ConfigError> {
        self.join(&self.applications_path)
    }

    fn join(&self, path: &str) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            value: self.base_url.clone(),
            reason,
        };

        let base = Url::parse(self.base_url.trim()).map_err(|err| invalid(err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("url cannot carry a path".to_string()));
        }
        base.join(path).map_err(|err| invalid(err.to_string()))
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            courses_path: DEFAULT_COURSES_PATH.to_string(),
            applications_path: DEFAULT_APPLICATIONS_PATH.to_string(),
        }
    }
}

/// Behavior dials for the application form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    /// How long the success notice stays up before it hides itself.
    pub notice_duration: chrono::Duration,
    /// Refuse a new submission while another one is still in flight.
    pub guard_double_submit: bool,
    /// Show a dismissible banner when the intake service cannot be reached.
    pub surface_transport_errors: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            notice_duration: chrono::Duration::seconds(DEFAULT_NOTICE_SECONDS),
            guard_double_submit: false,
            surface_transport_errors: false,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl { value: String, reason: String },
    InvalidNoticeDuration { value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl { value, reason } => {
                write!(f, "INTAKE_API_BASE_URL '{value}' is not a usable url ({reason})")
            }
            ConfigError::InvalidNoticeDuration { value } => {
                write!(f, "INTAKE_NOTICE_SECONDS must be a whole number of seconds, got '{value}'")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_LOG_LEVEL",
            "INTAKE_API_BASE_URL",
            "INTAKE_COURSES_PATH",
            "INTAKE_APPLICATIONS_PATH",
            "INTAKE_NOTICE_SECONDS",
            "INTAKE_GUARD_DOUBLE_SUBMIT",
            "INTAKE_SURFACE_TRANSPORT_ERRORS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.form, FormSettings::default());
        assert_eq!(
            config.endpoints.courses_url().expect("courses url").as_str(),
            "http://localhost:8000/api/public-courses/"
        );
        assert_eq!(
            config
                .endpoints
                .applications_url()
                .expect("applications url")
                .as_str(),
            "http://localhost:8000/api/application/"
        );
    }

    #[test]
    fn load_reads_form_dials() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INTAKE_NOTICE_SECONDS", "10");
        env::set_var("INTAKE_GUARD_DOUBLE_SUBMIT", "yes");
        env::set_var("INTAKE_SURFACE_TRANSPORT_ERRORS", "1");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.form.notice_duration, chrono::Duration::seconds(10));
        assert!(config.form.guard_double_submit);
        assert!(config.form.surface_transport_errors);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INTAKE_GUARD_DOUBLE_SUBMIT", "maybe");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { name: "INTAKE_GUARD_DOUBLE_SUBMIT", .. })
        ));

        reset_env();
        env::set_var("INTAKE_API_BASE_URL", "not a url");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        reset_env();
    }

    #[test]
    fn notice_seconds_must_fit_a_duration() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        for raw in ["-1", "18446744073709551615", "9223372036854775807", "four"] {
            reset_env();
            env::set_var("INTAKE_NOTICE_SECONDS", raw);
            assert!(
                matches!(
                    AppConfig::load(),
                    Err(ConfigError::InvalidNoticeDuration { .. })
                ),
                "{raw} should be rejected"
            );
        }

        reset_env();
        env::set_var("INTAKE_NOTICE_SECONDS", "0");
        let config = AppConfig::load().expect("zero seconds is allowed");
        assert_eq!(config.form.notice_duration, chrono::Duration::zero());
        reset_env();
    }
}
