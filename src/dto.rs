//! # PancrePal — Request/Response DTOs
//!
//! Every write endpoint accepts either an HTML form post or a JSON body.
//! Input goes through two explicit steps:
//!
//! 1. [`FormFields`] extracts the body into a normalized string map,
//!    whatever the content type was.
//! 2. A `*Command` constructor validates that map into typed values.
//!
//! Conventions:
//! - `*Command`  → validated input, ready to persist
//! - `*Response` → serialized to client JSON
//! - Empty optional text is normalized to `None`

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;
use crate::models::entry::{LogEntry, Mood};

// ============================================================================
// Normalized input
// ============================================================================

/// Request body flattened to `key -> string`.
///
/// JSON scalars are stringified (`null` becomes `""`); nested JSON values
/// are ignored. A request with neither a form nor a JSON content type is
/// treated as an empty body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Value for `key`, trimmed, with empty treated as missing.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn from_json(map: serde_json::Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    Value::Array(_) | Value::Object(_) => return None,
                };
                Some((key, value))
            })
            .collect();
        Self(fields)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(map) = Json::<serde_json::Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(format!("Malformed JSON body: {e}")))?;
            Ok(Self::from_json(map))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(map) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(format!("Malformed form body: {e}")))?;
            Ok(Self(map))
        } else {
            Ok(Self::default())
        }
    }
}

// ============================================================================
// Field parsing
// ============================================================================

fn parse_glucose(raw: &str) -> Result<f64, AppError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Glucose must be a number".into()))?;
    // Two decimal places, matching the stored precision of a reading. Huge
    // inputs overflow while scaling, so finiteness is checked afterwards.
    let rounded = (value * 100.0).round() / 100.0;
    if !rounded.is_finite() {
        return Err(AppError::Validation("Glucose must be a number".into()));
    }
    Ok(rounded)
}

fn parse_mood(raw: &str) -> Result<Mood, AppError> {
    Mood::parse(raw).ok_or_else(|| AppError::Validation(format!("Unknown mood: {raw}")))
}

fn optional_text(fields: &FormFields, key: &str) -> Option<String> {
    fields.non_empty(key).map(str::to_string)
}

fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".into())
}

// ============================================================================
// Entries
// ============================================================================

/// POST /entries
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEntryCommand {
    pub glucose: f64,
    pub meal: Option<String>,
    pub mood: Mood,
    pub time_of_day: Option<String>,
}

impl CreateEntryCommand {
    pub fn from_fields(fields: &FormFields) -> Result<Self, AppError> {
        let glucose = fields
            .non_empty("glucose")
            .ok_or_else(|| AppError::Validation("Glucose is required".into()))?;

        Ok(Self {
            glucose: parse_glucose(glucose)?,
            meal: optional_text(fields, "meal"),
            mood: parse_mood(fields.get("mood").unwrap_or_default())?,
            time_of_day: optional_text(fields, "time_of_day"),
        })
    }
}

/// POST /entries/{id} — only the supplied fields change.
///
/// The outer `Option` says whether a field was supplied; for text fields the
/// inner `Option` is the new value, so a supplied empty string clears it.
/// An empty glucose counts as not supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEntryCommand {
    pub glucose: Option<f64>,
    pub meal: Option<Option<String>>,
    pub mood: Option<Mood>,
    pub time_of_day: Option<Option<String>>,
}

impl UpdateEntryCommand {
    pub fn from_fields(fields: &FormFields) -> Result<Self, AppError> {
        let glucose = fields.non_empty("glucose").map(parse_glucose).transpose()?;
        let mood = fields.get("mood").map(parse_mood).transpose()?;

        Ok(Self {
            glucose,
            meal: fields.contains("meal").then(|| optional_text(fields, "meal")),
            mood,
            time_of_day: fields
                .contains("time_of_day")
                .then(|| optional_text(fields, "time_of_day")),
        })
    }

    pub fn apply(&self, entry: &mut LogEntry) {
        if let Some(glucose) = self.glucose {
            entry.glucose = glucose;
        }
        if let Some(meal) = &self.meal {
            entry.meal = meal.clone();
        }
        if let Some(mood) = self.mood {
            entry.mood = mood;
        }
        if let Some(time_of_day) = &self.time_of_day {
            entry.time_of_day = time_of_day.clone();
        }
    }
}

/// GET /api/entries
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: i64,
    pub glucose: f64,
    pub meal: Option<String>,
    pub mood: Mood,
    pub time_of_day: Option<String>,
    pub noted_at: String,
}

impl From<LogEntry> for EntryResponse {
    fn from(entry: LogEntry) -> Self {
        Self {
            id: entry.id,
            glucose: entry.glucose,
            meal: entry.meal,
            mood: entry.mood,
            time_of_day: entry.time_of_day,
            noted_at: format_timestamp(entry.noted_at),
        }
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ============================================================================
// Presets
// ============================================================================

/// POST /presets
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreatePresetCommand {
    #[validate(length(min = 1, message = "Preset name is required"))]
    pub name: String,
    pub default_glucose: Option<f64>,
    pub default_mood: Mood,
    pub default_time_of_day: Option<String>,
}

impl CreatePresetCommand {
    pub fn from_fields(fields: &FormFields) -> Result<Self, AppError> {
        let command = Self {
            name: fields.get("name").unwrap_or_default().trim().to_string(),
            default_glucose: fields
                .non_empty("default_glucose")
                .map(parse_glucose)
                .transpose()?,
            default_mood: parse_mood(fields.get("default_mood").unwrap_or_default())?,
            default_time_of_day: optional_text(fields, "default_time_of_day"),
        };

        command
            .validate()
            .map_err(|e| AppError::Validation(first_validation_message(&e)))?;

        Ok(command)
    }
}

/// POST /presets/{id}/use
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsePresetCommand {
    pub glucose: Option<f64>,
}

impl UsePresetCommand {
    pub fn from_fields(fields: &FormFields) -> Result<Self, AppError> {
        Ok(Self {
            glucose: fields.non_empty("glucose").map(parse_glucose).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    // ── FormFields ───────────────────────────────────────────────────────

    #[test]
    fn test_json_scalars_are_stringified() {
        let map = json!({ "glucose": 6.4, "meal": "Toast", "mood": null, "flag": true })
            .as_object()
            .cloned()
            .unwrap();
        let f = FormFields::from_json(map);
        assert_eq!(f.get("glucose"), Some("6.4"));
        assert_eq!(f.get("meal"), Some("Toast"));
        assert_eq!(f.get("mood"), Some(""));
        assert_eq!(f.get("flag"), Some("true"));
    }

    #[test]
    fn test_json_nested_values_are_dropped() {
        let map = json!({ "meal": ["a"], "extra": { "x": 1 } }).as_object().cloned().unwrap();
        let f = FormFields::from_json(map);
        assert!(!f.contains("meal"));
        assert!(!f.contains("extra"));
    }

    // ── CreateEntryCommand ───────────────────────────────────────────────

    #[test]
    fn test_create_entry_requires_glucose() {
        let err = CreateEntryCommand::from_fields(&fields(&[("meal", "Toast")])).unwrap_err();
        assert_eq!(validation_message(err), "Glucose is required");

        let err = CreateEntryCommand::from_fields(&fields(&[("glucose", "  ")])).unwrap_err();
        assert_eq!(validation_message(err), "Glucose is required");
    }

    #[test]
    fn test_create_entry_rejects_non_numeric_glucose() {
        let err = CreateEntryCommand::from_fields(&fields(&[("glucose", "high")])).unwrap_err();
        assert_eq!(validation_message(err), "Glucose must be a number");
    }

    #[test]
    fn test_create_entry_rejects_glucose_that_overflows_when_rounded() {
        for raw in ["1e307", "1.7e308", "inf", "NaN"] {
            let err = CreateEntryCommand::from_fields(&fields(&[("glucose", raw)])).unwrap_err();
            assert_eq!(validation_message(err), "Glucose must be a number", "input {raw}");
        }
    }

    #[test]
    fn test_create_entry_normalizes_optional_fields() {
        let cmd = CreateEntryCommand::from_fields(&fields(&[
            ("glucose", "7.456"),
            ("meal", ""),
            ("mood", "😊"),
            ("time_of_day", "Lunch"),
        ]))
        .unwrap();
        assert_eq!(cmd.glucose, 7.46);
        assert_eq!(cmd.meal, None);
        assert_eq!(cmd.mood, Mood::Positive);
        assert_eq!(cmd.time_of_day.as_deref(), Some("Lunch"));
    }

    #[test]
    fn test_create_entry_missing_mood_is_unset() {
        let cmd = CreateEntryCommand::from_fields(&fields(&[("glucose", "5")])).unwrap();
        assert_eq!(cmd.mood, Mood::Unset);
    }

    // ── UpdateEntryCommand ───────────────────────────────────────────────

    #[test]
    fn test_update_only_mood_touches_only_mood() {
        let cmd = UpdateEntryCommand::from_fields(&fields(&[("mood", "negative")])).unwrap();
        assert_eq!(
            cmd,
            UpdateEntryCommand {
                mood: Some(Mood::Negative),
                ..Default::default()
            }
        );

        let mut entry = LogEntry {
            id: 1,
            glucose: 6.2,
            meal: Some("Rice".into()),
            mood: Mood::Positive,
            time_of_day: Some("Dinner".into()),
            noted_at: Utc::now(),
        };
        cmd.apply(&mut entry);
        assert_eq!(entry.glucose, 6.2);
        assert_eq!(entry.meal.as_deref(), Some("Rice"));
        assert_eq!(entry.time_of_day.as_deref(), Some("Dinner"));
        assert_eq!(entry.mood, Mood::Negative);
    }

    #[test]
    fn test_update_empty_glucose_is_ignored_but_empty_meal_clears() {
        let cmd =
            UpdateEntryCommand::from_fields(&fields(&[("glucose", ""), ("meal", "")])).unwrap();
        assert_eq!(cmd.glucose, None);
        assert_eq!(cmd.meal, Some(None));
        assert_eq!(cmd.time_of_day, None);
    }

    // ── Presets ──────────────────────────────────────────────────────────

    #[test]
    fn test_preset_name_required() {
        let err = CreatePresetCommand::from_fields(&fields(&[("name", "   ")])).unwrap_err();
        assert_eq!(validation_message(err), "Preset name is required");

        let err = CreatePresetCommand::from_fields(&fields(&[])).unwrap_err();
        assert_eq!(validation_message(err), "Preset name is required");
    }

    #[test]
    fn test_preset_long_name_accepted() {
        let name = "a".repeat(121);
        let cmd = CreatePresetCommand::from_fields(&fields(&[("name", name.as_str())])).unwrap();
        assert_eq!(cmd.name, name);
    }

    #[test]
    fn test_preset_defaults_parse() {
        let cmd = CreatePresetCommand::from_fields(&fields(&[
            ("name", " Porridge "),
            ("default_glucose", ""),
            ("default_mood", "😐"),
            ("default_time_of_day", "Breakfast"),
        ]))
        .unwrap();
        assert_eq!(cmd.name, "Porridge");
        assert_eq!(cmd.default_glucose, None);
        assert_eq!(cmd.default_mood, Mood::Neutral);
        assert_eq!(cmd.default_time_of_day.as_deref(), Some("Breakfast"));
    }

    #[test]
    fn test_use_preset_override_optional() {
        assert_eq!(UsePresetCommand::from_fields(&fields(&[])).unwrap().glucose, None);
        assert_eq!(
            UsePresetCommand::from_fields(&fields(&[("glucose", "9.1")])).unwrap().glucose,
            Some(9.1)
        );
    }

    // ── Responses ────────────────────────────────────────────────────────

    #[test]
    fn test_entry_response_shape() {
        let noted_at = DateTime::parse_from_rfc3339("2026-02-10T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let resp = EntryResponse::from(LogEntry {
            id: 3,
            glucose: 5.5,
            meal: None,
            mood: Mood::Neutral,
            time_of_day: Some("Breakfast".into()),
            noted_at,
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["glucose"], 5.5);
        assert!(json["meal"].is_null());
        assert_eq!(json["mood"], "neutral");
        assert_eq!(json["noted_at"], "2026-02-10T08:30:00Z");
    }
}
