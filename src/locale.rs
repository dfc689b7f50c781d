//! Localized messages and number formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ControllerError;

/// Display locale for user-visible strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Persian, with Persian digits.
    Fa,
}

impl Locale {
    /// Returns the message catalog for this locale.
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Fa => &FA,
        }
    }

    /// Formats an integer with locale digits and thousands grouping.
    ///
    /// `en` gives `1,234`; `fa` gives `۱٬۲۳۴`.
    pub fn format_count(self, n: u64) -> String {
        let (digits, separator): (&[char; 10], char) = match self {
            Locale::En => (&ASCII_DIGITS, ','),
            Locale::Fa => (&PERSIAN_DIGITS, '\u{066C}'),
        };

        let raw = n.to_string();
        let len = raw.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, b) in raw.bytes().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(separator);
            }
            out.push(digits[(b - b'0') as usize]);
        }
        out
    }

    /// Builds the status line: hit count and elapsed time label.
    pub fn status_line(self, total_hits: u64, elapsed: &str) -> String {
        let count = self.format_count(total_hits);
        match self {
            Locale::En => format!("{} results found ({})", count, elapsed),
            Locale::Fa => format!("{} نتیجه یافت شد ({})", count, elapsed),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Fa => f.write_str("fa"),
        }
    }
}

impl FromStr for Locale {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::En),
            "fa" | "fa-ir" | "persian" => Ok(Locale::Fa),
            other => Err(ControllerError::Other(format!("Unsupported locale: {}", other))),
        }
    }
}

const ASCII_DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Fixed strings shown by the controller.
#[derive(Debug)]
pub struct Messages {
    pub searching: &'static str,
    pub search_failed: &'static str,
    pub untitled: &'static str,
    pub no_results: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub did_you_mean: &'static str,
    pub score: &'static str,
}

static EN: Messages = Messages {
    searching: "Searching...",
    search_failed: "Could not reach the search server.",
    untitled: "Untitled",
    no_results: "No results found.",
    previous: "Previous",
    next: "Next",
    did_you_mean: "Did you mean:",
    score: "Score",
};

static FA: Messages = Messages {
    searching: "در حال جستجو...",
    search_failed: "خطا در ارتباط با سرور جستجو.",
    untitled: "بدون عنوان",
    no_results: "نتیجه‌ای یافت نشد.",
    previous: "قبلی",
    next: "بعدی",
    did_you_mean: "آیا منظور شما این بود:",
    score: "امتیاز",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_default() {
        assert_eq!(Locale::default(), Locale::En);
    }

    #[test]
    fn test_format_count_en() {
        assert_eq!(Locale::En.format_count(0), "0");
        assert_eq!(Locale::En.format_count(23), "23");
        assert_eq!(Locale::En.format_count(999), "999");
        assert_eq!(Locale::En.format_count(1234), "1,234");
        assert_eq!(Locale::En.format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_count_fa() {
        assert_eq!(Locale::Fa.format_count(23), "۲۳");
        assert_eq!(Locale::Fa.format_count(1234), "۱٬۲۳۴");
    }

    #[test]
    fn test_status_line() {
        assert_eq!(Locale::En.status_line(23, "12ms"), "23 results found (12ms)");
        assert!(Locale::Fa.status_line(5, "1s").starts_with("۵ "));
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("FA-IR".parse::<Locale>().unwrap(), Locale::Fa);
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_locale_serialization() {
        assert_eq!(serde_json::to_string(&Locale::Fa).unwrap(), "\"fa\"");
        let locale: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(locale, Locale::En);
    }

    #[test]
    fn test_messages_differ_by_locale() {
        assert_eq!(Locale::En.messages().untitled, "Untitled");
        assert_eq!(Locale::Fa.messages().next, "بعدی");
    }
}
