use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::entry::Mood;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPreset {
    pub id: i64,
    pub name: String,
    pub default_glucose: Option<f64>,
    pub default_mood: Mood,
    pub default_time_of_day: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MealPreset {
    /// Glucose for an entry created from this preset: override, then the
    /// preset default, then zero.
    pub fn glucose_for(&self, override_glucose: Option<f64>) -> f64 {
        override_glucose.or(self.default_glucose).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(default_glucose: Option<f64>) -> MealPreset {
        MealPreset {
            id: 1,
            name: "Porridge".into(),
            default_glucose,
            default_mood: Mood::Unset,
            default_time_of_day: Some("Breakfast".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_glucose_prefers_override() {
        assert_eq!(preset(Some(6.5)).glucose_for(Some(8.1)), 8.1);
    }

    #[test]
    fn test_glucose_falls_back_to_default() {
        assert_eq!(preset(Some(6.5)).glucose_for(None), 6.5);
    }

    #[test]
    fn test_glucose_falls_back_to_zero() {
        assert_eq!(preset(None).glucose_for(None), 0.0);
    }
}
