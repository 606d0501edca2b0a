use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

/// Prefix carried by every secret unless configured otherwise.
pub const DEFAULT_KEY_PREFIX: &str = "tvly-";

/// Number of `*` characters after the prefix in a masked key.
pub const MASK_WIDTH: usize = 24;

const SECRET_LEN: usize = 32;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LastUsed {
    Never,
    Today,
}

impl LastUsed {
    pub fn display_name(&self) -> &'static str {
        match self {
            LastUsed::Never => "Never",
            LastUsed::Today => "Today",
        }
    }
}

impl fmt::Display for LastUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub secret: String,
    pub usage: u64,
    pub created_at: DateTime<Utc>,
    pub last_used: LastUsed,
}

impl ApiKey {
    /// Prefix the secret was issued under: `configured` when the secret
    /// carries it, otherwise everything up to and including the first `-`.
    pub fn secret_prefix<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.secret.starts_with(configured) {
            return configured;
        }
        match self.secret.find('-') {
            Some(end) => &self.secret[..=end],
            None => "",
        }
    }
}

/// Generate a secret: `prefix` followed by 32 lowercase base-36 characters.
pub fn generate_secret(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let random_part: String = (0..SECRET_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..BASE36.len());
            BASE36[idx] as char
        })
        .collect();
    format!("{prefix}{random_part}")
}

/// Fixed placeholder shown for a hidden key. Never derived from the secret.
pub fn masked(prefix: &str) -> String {
    format!("{prefix}{}", "*".repeat(MASK_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_secret_format() {
        let secret = generate_secret(DEFAULT_KEY_PREFIX);
        assert!(secret.starts_with("tvly-"), "missing prefix: {secret}");
        assert_eq!(secret.len(), DEFAULT_KEY_PREFIX.len() + SECRET_LEN);
        assert!(
            secret[5..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()),
            "suffix should be base36: {secret}"
        );
    }

    #[test]
    fn generate_secret_uniqueness() {
        let a = generate_secret(DEFAULT_KEY_PREFIX);
        let b = generate_secret(DEFAULT_KEY_PREFIX);
        assert_ne!(a, b, "two generated secrets should differ");
    }

    #[test]
    fn masked_is_constant() {
        assert_eq!(masked("tvly-"), "tvly-************************");
        assert_eq!(masked(""), "*".repeat(MASK_WIDTH));
    }

    fn with_secret(secret: &str) -> ApiKey {
        ApiKey {
            id: "1".into(),
            name: "default".into(),
            secret: secret.into(),
            usage: 0,
            created_at: Utc::now(),
            last_used: LastUsed::Never,
        }
    }

    #[test]
    fn secret_prefix_prefers_configured() {
        assert_eq!(with_secret("tvly-abc").secret_prefix("tvly-"), "tvly-");
        assert_eq!(with_secret("sk_live_abc").secret_prefix("sk_live_"), "sk_live_");
    }

    #[test]
    fn secret_prefix_falls_back_to_issued_prefix() {
        assert_eq!(with_secret("tvly-abc").secret_prefix("sk-"), "tvly-");
        assert_eq!(with_secret("plainsecret").secret_prefix("sk-"), "");
    }

    #[test]
    fn secret_is_not_serialized() {
        let key = ApiKey {
            id: "1".into(),
            name: "default".into(),
            secret: "tvly-abc".into(),
            usage: 0,
            created_at: Utc::now(),
            last_used: LastUsed::Never,
        };
        let json = serde_json::to_string(&key).unwrap();
        assert!(!json.contains("tvly-abc"));
        assert!(json.contains("\"name\":\"default\""));
    }
}
