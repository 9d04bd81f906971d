//! URL value that travels through JSON as a plain string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::MirrorError;

/// A parsed URL, or the empty value when upstream sent `""` or `null`.
///
/// The catalog API always includes every download key, even for formats a
/// work does not have, so "absent" is a legitimate state of the value rather
/// than a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Option<String>", into = "String")]
pub struct RemoteUrl(Option<Url>);

impl RemoteUrl {
    /// The empty URL
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The parsed URL, if any
    pub fn as_url(&self) -> Option<&Url> {
        self.0.as_ref()
    }

    /// String form; empty string for the empty value
    pub fn as_str(&self) -> &str {
        self.0.as_ref().map(Url::as_str).unwrap_or("")
    }
}

impl FromStr for RemoteUrl {
    type Err = MirrorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::empty());
        }

        Url::parse(s)
            .map(|u| Self(Some(u)))
            .map_err(|e| MirrorError::InvalidUrl {
                url: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl TryFrom<Option<String>> for RemoteUrl {
    type Error = MirrorError;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        match value {
            Some(s) => s.parse(),
            None => Ok(Self::empty()),
        }
    }
}

impl From<RemoteUrl> for String {
    fn from(url: RemoteUrl) -> Self {
        url.as_str().to_string()
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
