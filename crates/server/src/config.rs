//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLOTHESLINE_TOKEN_SECRET` - Session token signing secret (min 32 chars,
//!   high entropy)
//!
//! ## Optional
//! - `CLOTHESLINE_DATA_PATH` - Path of the JSON data file (default: `clothesline.json`)
//! - `CLOTHESLINE_HOST` - Bind address (default: 127.0.0.1)
//! - `CLOTHESLINE_PORT` - Listen port (default: 3100)
//! - `CLOTHESLINE_TOKEN_TTL_DAYS` - Session token lifetime (default: 7)
//! - `CLOTHESLINE_SAVE_TIMEOUT_MS` - Upper bound on a single durable save (default: 5000)
//! - `CLOTHESLINE_SHIPPING_FEE` - Flat shipping fee (default: 5.50)
//! - `CLOTHESLINE_TAX_RATE` - Tax rate on subtotal + shipping (default: 0.132)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use clothesline_core::PricingPolicy;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON data file owned by this process
    pub data_path: PathBuf,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Session token signing secret
    pub token_secret: SecretString,
    /// Session token lifetime
    pub token_ttl: Duration,
    /// Upper bound on a single durable save
    pub save_timeout: Duration,
    /// Flat shipping fee and tax rate
    pub pricing: PricingPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if variables are invalid or the token secret
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_path =
            PathBuf::from(get_env_or_default("CLOTHESLINE_DATA_PATH", "clothesline.json"));
        let host = get_env_or_default("CLOTHESLINE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CLOTHESLINE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CLOTHESLINE_PORT", "3100")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CLOTHESLINE_PORT".to_string(), e.to_string()))?;

        let token_secret = get_validated_secret("CLOTHESLINE_TOKEN_SECRET")?;
        let token_ttl_days = get_env_or_default("CLOTHESLINE_TOKEN_TTL_DAYS", "7")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CLOTHESLINE_TOKEN_TTL_DAYS".to_string(), e.to_string())
            })?;
        let save_timeout_ms = get_env_or_default("CLOTHESLINE_SAVE_TIMEOUT_MS", "5000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CLOTHESLINE_SAVE_TIMEOUT_MS".to_string(), e.to_string())
            })?;

        let shipping_fee = get_decimal_or_default("CLOTHESLINE_SHIPPING_FEE", "5.50")?;
        let tax_rate = get_decimal_or_default("CLOTHESLINE_TAX_RATE", "0.132")?;

        Ok(Self {
            data_path,
            host,
            port,
            token_secret,
            token_ttl: Duration::from_secs(token_ttl_days * 24 * 60 * 60),
            save_timeout: Duration::from_millis(save_timeout_ms),
            pricing: PricingPolicy {
                shipping_fee,
                tax_rate,
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse a decimal environment variable with a default value.
fn get_decimal_or_default(key: &str, default: &str) -> Result<Decimal, ConfigError> {
    get_env_or_default(key, default)
        .parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;

    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "must be at least {MIN_TOKEN_SECRET_LENGTH} characters (got {})",
                value.len()
            ),
        ));
    }

    validate_secret_strength(&value, key)?;

    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_of_repeated_char_is_zero() {
        assert!(shannon_entropy("aaaaaaaa") < f64::EPSILON);
        assert!(shannon_entropy("") < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_of_random_secret_is_high() {
        let entropy = shannon_entropy("kX9mP2vQ7rT4wY6zB1nC8dF3gH5jL0sA");
        assert!(entropy >= MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_placeholder_secrets_rejected() {
        assert!(validate_secret_strength("your-session-key-goes-here-123456", "X").is_err());
        assert!(validate_secret_strength("changeme-changeme-changeme-change", "X").is_err());
    }

    #[test]
    fn test_strong_secret_accepted() {
        assert!(validate_secret_strength("kX9mP2vQ7rT4wY6zB1nC8dF3gH5jL0sA", "X").is_ok());
    }

    #[test]
    fn test_low_entropy_secret_rejected() {
        assert!(validate_secret_strength("abababababababababababababababab", "X").is_err());
    }
}
