//! Display language for bilingual (English / Arabic) content.
//!
//! Catalog entities carry both an English and an Arabic name. Every label
//! shown to the user picks exactly one of them based on the editor
//! language, and the same rule is used for dropdown options and cards.

use crate::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Editor display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// Parse a language code ("en" / "ar", case-insensitive)
    pub fn from_code(code: &str) -> CommonResult<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            _ => Err(CommonError::UnsupportedLanguage(code.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Text direction attribute value for rendered content
    pub fn dir(&self) -> &'static str {
        match self {
            Language::En => "ltr",
            Language::Ar => "rtl",
        }
    }

    /// Pick the variant matching this language
    pub fn pick<'a>(&self, en: &'a str, ar: &'a str) -> &'a str {
        match self {
            Language::En => en,
            Language::Ar => ar,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}

/// Anything with an English and an Arabic name
pub trait Bilingual {
    fn name_en(&self) -> &str;
    fn name_ar(&self) -> &str;

    /// The user-visible label for `language`
    fn label(&self, language: Language) -> &str {
        language.pick(self.name_en(), self.name_ar())
    }
}
