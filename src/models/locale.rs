//! Localized sentinels and connectives used when rendering references.

use serde::{Deserialize, Serialize};

/// Output language for sentinels, connectives and error messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    /// Returns the label table for this locale
    pub fn labels(&self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Id => &ID,
        }
    }

    /// Returns the locale identifier
    pub fn id(&self) -> &str {
        match self {
            Locale::En => "en",
            Locale::Id => "id",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "id" | "indonesian" | "bahasa" => Ok(Locale::Id),
            other => Err(format!("unknown locale: {}", other)),
        }
    }
}

/// Every piece of user-visible fixed text
#[derive(Debug)]
pub struct Labels {
    pub anonymous: &'static str,
    pub unknown_title: &'static str,
    pub unknown_year: &'static str,
    pub unknown_journal: &'static str,
    pub unknown_volume: &'static str,
    pub unknown_pages: &'static str,
    pub and: &'static str,
    pub et_al: &'static str,
    pub in_: &'static str,
    pub editor: &'static str,
    pub editors: &'static str,
    pub pages_prefix: &'static str,
    pub upstream_failed: &'static str,
    pub parse_failed: &'static str,
    pub no_results: &'static str,
}

static EN: Labels = Labels {
    anonymous: "[Anonymous]",
    unknown_title: "[Unknown title]",
    unknown_year: "[Unknown year]",
    unknown_journal: "[Unknown journal]",
    unknown_volume: "[Unknown volume]",
    unknown_pages: "[Unknown pages]",
    and: "and",
    et_al: "et al.",
    in_: "In:",
    editor: "editor",
    editors: "editors",
    pages_prefix: "pp.",
    upstream_failed: "Failed to contact the server",
    parse_failed: "Failed to parse data",
    no_results: "No results found",
};

static ID: Labels = Labels {
    anonymous: "[Anonim]",
    unknown_title: "[Judul tidak diketahui]",
    unknown_year: "[Tahun tidak diketahui]",
    unknown_journal: "[Jurnal tidak diketahui]",
    unknown_volume: "[Volume tidak diketahui]",
    unknown_pages: "[Halaman tidak diketahui]",
    and: "dan",
    et_al: "et al.",
    in_: "Di dalam:",
    editor: "editor",
    editors: "editor",
    pages_prefix: "hlm",
    upstream_failed: "Gagal menghubungi server",
    parse_failed: "Gagal parsing data",
    no_results: "Tidak ditemukan hasil",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_str() {
        assert_eq!("id".parse::<Locale>().unwrap(), Locale::Id);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_labels_differ_by_locale() {
        assert_eq!(Locale::En.labels().anonymous, "[Anonymous]");
        assert_eq!(Locale::Id.labels().anonymous, "[Anonim]");
        assert_eq!(Locale::Id.labels().and, "dan");
    }
}
