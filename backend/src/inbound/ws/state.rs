//! Shared WebSocket adapter state and the Origin allow-list.

use url::Url;

use crate::domain::AuthService;

/// One allow-list entry.
///
/// `https://*.learnhub.example` admits any subdomain of `learnhub.example`
/// over HTTPS; every other entry must match scheme, host and port exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    Exact(url::Origin),
    Subdomains { scheme: String, suffix: String },
}

impl OriginRule {
    fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if let Some((scheme, host)) = trimmed.split_once("://*.") {
            // Validate the shape even though only the suffix is kept.
            Url::parse(&format!("{scheme}://{host}"))?;
            return Ok(Self::Subdomains {
                scheme: scheme.to_ascii_lowercase(),
                suffix: format!(".{}", host.to_ascii_lowercase()),
            });
        }
        Ok(Self::Exact(Url::parse(trimmed)?.origin()))
    }

    fn admits(&self, origin: &Url) -> bool {
        match self {
            Self::Exact(expected) => &origin.origin() == expected,
            Self::Subdomains { scheme, suffix } => {
                origin.scheme() == scheme
                    && origin.host_str().is_some_and(|host| {
                        host.len() > suffix.len() && host.ends_with(suffix.as_str())
                    })
            }
        }
    }
}

/// Origins allowed to open a WebSocket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins {
    rules: Vec<OriginRule>,
}

impl AllowedOrigins {
    /// Parse configured entries.
    ///
    /// # Errors
    ///
    /// Returns the first entry that is not a URL, with its parse error.
    pub fn parse<I, S>(entries: I) -> Result<Self, (String, url::ParseError)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = entries
            .into_iter()
            .filter(|entry| !entry.as_ref().trim().is_empty())
            .map(|entry| {
                let raw = entry.as_ref();
                OriginRule::parse(raw).map_err(|err| (raw.to_owned(), err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn admits(&self, origin: &Url) -> bool {
        self.rules.iter().any(|rule| rule.admits(origin))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub auth: AuthService,
    pub allowed_origins: AllowedOrigins,
}

impl WsState {
    /// Share `auth` with the HTTP state so pushes follow HTTP logins.
    pub fn new(auth: AuthService, allowed_origins: AllowedOrigins) -> Self {
        Self {
            auth,
            allowed_origins,
        }
    }
}
