use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locale the faker-backed provider draws words, emails, and domains from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocaleKey {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "pt_BR")]
    PtBr,
}

impl LocaleKey {
    pub const SUPPORTED: [LocaleKey; 2] = [LocaleKey::EnUs, LocaleKey::PtBr];

    /// Accepts `en_US` / `pt_BR`, also with a dash separator.
    pub fn parse(value: &str) -> Option<Self> {
        Self::SUPPORTED
            .into_iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(&value.replace('-', "_")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocaleKey::EnUs => "en_US",
            LocaleKey::PtBr => "pt_BR",
        }
    }
}

impl FromStr for LocaleKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| format!("unsupported locale '{value}'"))
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
