use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LogEntry {
    pub id: i64,
    pub glucose: f64,
    pub meal: Option<String>,
    pub mood: Mood,
    pub time_of_day: Option<String>,
    pub noted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
    #[default]
    Unset,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Positive, Mood::Neutral, Mood::Negative, Mood::Unset];

    /// Accepts either the display symbol or the lowercase variant name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" | "unset" => Some(Mood::Unset),
            "😊" | "positive" => Some(Mood::Positive),
            "😐" | "neutral" => Some(Mood::Neutral),
            "😞" | "negative" => Some(Mood::Negative),
            _ => None,
        }
    }

    pub fn score(self) -> i32 {
        match self {
            Mood::Positive => 1,
            Mood::Negative => -1,
            Mood::Neutral | Mood::Unset => 0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Mood::Positive => "😊",
            Mood::Neutral => "😐",
            Mood::Negative => "😞",
            Mood::Unset => "",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Neutral => "neutral",
            Mood::Negative => "negative",
            Mood::Unset => "unset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_symbols_and_names() {
        assert_eq!(Mood::parse("😊"), Some(Mood::Positive));
        assert_eq!(Mood::parse("negative"), Some(Mood::Negative));
        assert_eq!(Mood::parse(" 😐 "), Some(Mood::Neutral));
        assert_eq!(Mood::parse(""), Some(Mood::Unset));
        assert_eq!(Mood::parse("unset"), Some(Mood::Unset));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Mood::parse("ecstatic"), None);
        assert_eq!(Mood::parse("😄"), None);
    }

    #[test]
    fn test_scores() {
        let scores: Vec<i32> = Mood::ALL.iter().map(|m| m.score()).collect();
        assert_eq!(scores, vec![1, 0, -1, 0]);
    }

    #[test]
    fn test_symbol_parses_back() {
        for mood in Mood::ALL {
            assert_eq!(Mood::parse(mood.symbol()), Some(mood));
            assert_eq!(Mood::parse(mood.as_str()), Some(mood));
        }
    }

    #[test]
    fn test_serializes_as_lowercase_name() {
        let json = serde_json::to_value(Mood::Negative).unwrap();
        assert_eq!(json, "negative");
    }
}
