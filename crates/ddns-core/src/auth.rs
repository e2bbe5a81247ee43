//! Credential resolution
//!
//! A provider is configured with a single auth string. It is either an API
//! token or an `<email>:<key>` pair. When the configured string is empty the
//! resolver consults an environment fallback instead.

use std::fmt;

/// A credential derived from an auth string
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Bearer token
    Token(String),
    /// Username (account email) and API key
    BasicAuth {
        /// Account email
        username: String,
        /// API key
        password: String,
    },
}

// Never print secrets.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Token(_) => f.debug_tuple("Token").field(&"<REDACTED>").finish(),
            Credential::BasicAuth { username, .. } => f
                .debug_struct("BasicAuth")
                .field("username", username)
                .field("password", &"<REDACTED>")
                .finish(),
        }
    }
}

/// Resolve a credential from `raw`, falling back to `env_fallback` when `raw`
/// is empty.
///
/// `"<left>:<right>"` with both sides non-empty and colon-free is a
/// [`Credential::BasicAuth`]; any other non-empty string is a
/// [`Credential::Token`]. No case or whitespace normalization is applied.
///
/// Returns `None` when nothing usable is found.
pub fn resolve_credential<F>(raw: &str, env_fallback: F) -> Option<Credential>
where
    F: FnOnce() -> Option<String>,
{
    let auth = if raw.is_empty() {
        env_fallback().unwrap_or_default()
    } else {
        raw.to_string()
    };

    if auth.is_empty() {
        return None;
    }

    if let Some((username, password)) = split_basic(&auth) {
        return Some(Credential::BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    Some(Credential::Token(auth))
}

fn split_basic(auth: &str) -> Option<(&str, &str)> {
    let (left, right) = auth.split_once(':')?;
    if left.is_empty() || right.is_empty() || right.contains(':') {
        return None;
    }
    Some((left, right))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Option<String> {
        None
    }

    #[test]
    fn email_and_key_become_basic_auth() {
        let cred = resolve_credential("user@x.com:secretkey", no_env);
        assert_eq!(
            cred,
            Some(Credential::BasicAuth {
                username: "user@x.com".to_string(),
                password: "secretkey".to_string(),
            })
        );
    }

    #[test]
    fn plain_string_is_a_token() {
        let cred = resolve_credential("abc123token", no_env);
        assert_eq!(cred, Some(Credential::Token("abc123token".to_string())));
    }

    #[test]
    fn empty_without_fallback_is_unconfigured() {
        assert_eq!(resolve_credential("", no_env), None);
        assert_eq!(resolve_credential("", || Some(String::new())), None);
    }

    #[test]
    fn empty_uses_environment_fallback() {
        let cred = resolve_credential("", || Some("a@b.c:k".to_string()));
        assert_eq!(
            cred,
            Some(Credential::BasicAuth {
                username: "a@b.c".to_string(),
                password: "k".to_string(),
            })
        );
    }

    #[test]
    fn fallback_is_ignored_when_raw_is_set() {
        let cred = resolve_credential("tok", || panic!("fallback must not be consulted"));
        assert_eq!(cred, Some(Credential::Token("tok".to_string())));
    }

    #[test]
    fn malformed_pairs_fall_back_to_token() {
        for raw in [":key", "user:", "a:b:c", ":"] {
            assert_eq!(
                resolve_credential(raw, no_env),
                Some(Credential::Token(raw.to_string())),
                "{raw:?} should be treated as a token"
            );
        }
    }

    #[test]
    fn no_whitespace_normalization() {
        let cred = resolve_credential(" user : key ", no_env);
        assert_eq!(
            cred,
            Some(Credential::BasicAuth {
                username: " user ".to_string(),
                password: " key ".to_string(),
            })
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let token = format!("{:?}", Credential::Token("secret_token_12345".to_string()));
        assert!(!token.contains("secret_token_12345"));

        let basic = format!(
            "{:?}",
            Credential::BasicAuth {
                username: "user@x.com".to_string(),
                password: "secretkey".to_string(),
            }
        );
        assert!(basic.contains("user@x.com"));
        assert!(!basic.contains("secretkey"));
    }
}
