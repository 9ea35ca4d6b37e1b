//! Credential store for the basic-auth endpoints.

use crate::config::CredentialConfig;

/// Verifies a username/password pair.
pub trait CredentialStore: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Fixed set of pairs loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    pairs: Vec<CredentialConfig>,
}

impl StaticCredentials {
    pub fn new(pairs: Vec<CredentialConfig>) -> Self {
        Self { pairs }
    }

    pub fn single(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(vec![CredentialConfig {
            username: username.into(),
            password: password.into(),
        }])
    }
}

impl CredentialStore for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.pairs
            .iter()
            .any(|c| constant_time_eq(c.username.as_bytes(), username.as_bytes())
                & constant_time_eq(c.password.as_bytes(), password.as_bytes()))
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pair() {
        let store = StaticCredentials::single("alice", "secret");
        assert!(store.verify("alice", "secret"));
        assert!(!store.verify("alice", "wrong"));
        assert!(!store.verify("bob", "secret"));
        assert!(!store.verify("", ""));
    }

    #[test]
    fn test_multiple_pairs() {
        let store = StaticCredentials::new(vec![
            CredentialConfig { username: "alice".into(), password: "secret".into() },
            CredentialConfig { username: "bob".into(), password: "hunter2".into() },
        ]);
        assert!(store.verify("bob", "hunter2"));
        assert!(!store.verify("bob", "secret"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
