use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// A document source: a normalized absolute URL or a filesystem path.
///
/// URLs are parsed (scheme and host come out lower-cased) and have their
/// fragment removed. Trailing slashes are kept, so `/a` and `/a/` differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Url(Url),
    Path(PathBuf),
}

impl Location {
    /// Normalize an absolute http(s) link. Returns `None` for anything else.
    pub fn parse_url(raw: &str) -> Option<Self> {
        let mut url = Url::parse(raw.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.set_fragment(None);
        Some(Location::Url(url))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self { Location::Path(path.as_ref().to_path_buf()) }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Location::Url(u) => Some(u),
            Location::Path(_) => None,
        }
    }

    pub fn host(&self) -> Option<&str> { self.as_url().and_then(Url::host_str) }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(u) => f.write_str(u.as_str()),
            Location::Path(p) => write!(f, "{}", p.display()),
        }
    }
}
