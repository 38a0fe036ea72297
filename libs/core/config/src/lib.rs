pub mod tracing;

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment (dev = local/kind, prod = full k8s)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load and parse environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Helper to load and parse environment variable or return error
///
/// An empty value counts as unset.
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

/// Parse an environment variable into `T`, falling back to `default` when unset.
pub fn env_parse<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}

/// Parse a required environment variable into `T`.
pub fn env_parse_required<T>(key: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    env_required(key)?
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        temp_env::with_var("APP_ENV", Some("PRODUCTION"), || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Production);
        });

        temp_env::with_var("APP_ENV", Some("Production"), || {
            let env = Environment::from_env();
            assert!(env.is_production());
        });
    }

    #[test]
    fn test_environment_unknown_defaults_to_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
        });
    }

    #[test]
    fn test_env_or_default_without_value() {
        temp_env::with_var_unset("MISSING_VAR", || {
            let result = env_or_default("MISSING_VAR", "default_value");
            assert_eq!(result, "default_value");
        });
    }

    #[test]
    fn test_env_required_success() {
        temp_env::with_var("REQUIRED_VAR", Some("required_value"), || {
            let result = env_required("REQUIRED_VAR");
            assert_eq!(result.unwrap(), "required_value");
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("MISSING_REQUIRED", || {
            let err = env_required("MISSING_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("MISSING_REQUIRED"));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_required_empty_is_missing() {
        temp_env::with_var("EMPTY_REQUIRED", Some(""), || {
            let result = env_required("EMPTY_REQUIRED");
            assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
        });
    }

    #[test]
    fn test_env_parse_default_and_override() {
        temp_env::with_var_unset("PARSE_VAR", || {
            let value: u32 = env_parse("PARSE_VAR", "17").unwrap();
            assert_eq!(value, 17);
        });

        temp_env::with_var("PARSE_VAR", Some("42"), || {
            let value: u32 = env_parse("PARSE_VAR", "17").unwrap();
            assert_eq!(value, 42);
        });
    }

    #[test]
    fn test_env_parse_invalid() {
        temp_env::with_var("PARSE_VAR", Some("not_a_number"), || {
            let err = env_parse::<u16>("PARSE_VAR", "1").unwrap_err();
            assert!(err.to_string().contains("PARSE_VAR"));
        });
    }

    #[test]
    fn test_env_parse_required_missing() {
        temp_env::with_var_unset("PORT_VAR", || {
            let result = env_parse_required::<u16>("PORT_VAR");
            assert!(matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "PORT_VAR"));
        });
    }

    #[test]
    fn test_env_parse_required_out_of_range() {
        temp_env::with_var("PORT_VAR", Some("99999"), || {
            let result = env_parse_required::<u16>("PORT_VAR");
            assert!(matches!(result, Err(ConfigError::ParseError { .. })));
        });
    }
}
