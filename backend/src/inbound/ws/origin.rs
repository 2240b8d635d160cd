//! Origin allow-list applied to WebSocket upgrades.
//!
//! HTTP origins on `localhost` with a non-zero explicit port are always
//! accepted for local development. HTTPS origins are accepted when their host
//! is one of the configured hosts or a subdomain of one.

use url::Url;

const LOCALHOST: &str = "localhost";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    hosts: Vec<String>,
}

impl OriginPolicy {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hosts = hosts
            .into_iter()
            .map(Into::into)
            .map(|host| host.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        Self { hosts }
    }

    /// Parse a comma-separated host list such as `social.example,chat.example`.
    pub fn from_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn allows(&self, origin: &Url) -> bool {
        let Some(host) = origin.host_str() else {
            return false;
        };

        match origin.scheme() {
            "http" if host == LOCALHOST => matches!(origin.port(), Some(port) if port != 0),
            "https" => self.hosts.iter().any(|allowed| {
                host == allowed
                    || host
                        .strip_suffix(allowed.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }),
            _ => false,
        }
    }
}
