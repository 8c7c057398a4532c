//! Interview languages.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Language an interview is conducted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "id")]
    Indonesian,
}

impl Language {
    /// Short language code (`en`, `id`), used on the wire and in storage.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
        }
    }

    /// Regional locale code (`en-US`, `id-ID`).
    pub fn locale(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Indonesian => "id-ID",
        }
    }

    /// Resolve the language requested at session start.
    ///
    /// Anything other than a recognized code falls back to English.
    pub fn from_request(requested: Option<&str>) -> Self {
        requested
            .and_then(|code| code.trim().parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "en-us" => Ok(Language::English),
            "id" | "id-id" => Ok(Language::Indonesian),
            other => Err(format!("unsupported language: '{other}'")),
        }
    }
}
