use std::fmt;
use std::path::Path;

use reqwest::Url;

use crate::error::CoreError;

/// HTTP basic-auth credentials sent with every node call.
#[derive(Clone, PartialEq, Eq)]
pub(super) struct RpcAuth {
    user: String,
    pass: String,
}

impl fmt::Debug for RpcAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcAuth")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

impl RpcAuth {
    /// Explicit credentials win over the cookie file; both must be given
    /// together. `None` means the node is called without auth.
    pub(super) fn resolve(
        user: Option<&str>,
        pass: Option<&str>,
        cookie_file: Option<&Path>,
    ) -> Result<Option<Self>, CoreError> {
        match (user, pass, cookie_file) {
            (Some(user), Some(pass), _) => Ok(Some(Self {
                user: user.to_owned(),
                pass: pass.to_owned(),
            })),
            (Some(_), None, _) | (None, Some(_), _) => Err(CoreError::Config(
                "rpc user and rpc pass must be given together".to_owned(),
            )),
            (None, None, Some(path)) => Self::from_cookie_file(path).map(Some),
            (None, None, None) => Ok(None),
        }
    }

    fn from_cookie_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("read rpc cookie file {}: {e}", path.display()))
        })?;
        Self::parse_cookie(&content).ok_or_else(|| {
            CoreError::Config(format!(
                "rpc cookie file {} must hold `user:password` on its first line",
                path.display()
            ))
        })
    }

    /// Bitcoin Core writes `__cookie__:<hex>` on a single line.
    fn parse_cookie(content: &str) -> Option<Self> {
        let (user, pass) = content.lines().next()?.trim().split_once(':')?;
        if user.is_empty() || pass.is_empty() {
            return None;
        }
        Some(Self {
            user: user.to_owned(),
            pass: pass.to_owned(),
        })
    }

    pub(super) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.user, Some(&self.pass))
    }
}

/// Normalize the node endpoint into an HTTP(S) URL.
///
/// A bare `host:port` is accepted and served over plain HTTP, which is how
/// Bitcoin Core listens unless it sits behind a TLS proxy.
pub(super) fn parse_connection(connection: &str) -> Result<String, CoreError> {
    let connection = connection.trim();
    if connection.is_empty() {
        return Err(CoreError::Config("rpc endpoint must not be empty".to_owned()));
    }

    let candidate = if connection.contains("://") {
        connection.to_owned()
    } else {
        format!("http://{connection}")
    };

    let parsed = Url::parse(&candidate).map_err(|e| {
        CoreError::Config(format!(
            "invalid connection `{connection}`: expected host:port or HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(candidate),
        other => Err(CoreError::Config(format!(
            "unsupported connection scheme `{other}`; expected http or https"
        ))),
    }
}
