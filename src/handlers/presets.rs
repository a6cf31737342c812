use axum::{
    extract::{Path, State},
    response::Redirect,
};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::Utc;

use super::split_validation;
use crate::dto::{CreatePresetCommand, FormFields, UsePresetCommand};
use crate::error::{AppError, AppResult};
use crate::flash::redirect_with_flash;
use crate::models::entry::LogEntry;
use crate::models::preset::MealPreset;
use crate::AppState;

pub async fn create_preset(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    fields: FormFields,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let command = match split_validation(CreatePresetCommand::from_fields(&fields))? {
        Ok(command) => command,
        Err(message) => {
            tracing::debug!(%message, "Preset rejected");
            return Ok(redirect_with_flash(jar, message));
        }
    };

    let preset = sqlx::query_as::<_, MealPreset>(
        r#"
        INSERT INTO meal_presets (name, default_glucose, default_mood, default_time_of_day, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&command.name)
    .bind(command.default_glucose)
    .bind(command.default_mood)
    .bind(&command.default_time_of_day)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    tracing::info!(preset_id = preset.id, name = %preset.name, "Preset created");

    Ok((jar, Redirect::to("/")))
}

/// Logs a new entry from the preset's defaults. The entry keeps no link to
/// the preset.
pub async fn use_preset(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(preset_id): Path<i64>,
    fields: FormFields,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let preset = sqlx::query_as::<_, MealPreset>("SELECT * FROM meal_presets WHERE id = ?")
        .bind(preset_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Preset not found".into()))?;

    let command = match split_validation(UsePresetCommand::from_fields(&fields))? {
        Ok(command) => command,
        Err(message) => {
            tracing::debug!(preset_id, %message, "Preset use rejected");
            return Ok(redirect_with_flash(jar, message));
        }
    };

    let entry = sqlx::query_as::<_, LogEntry>(
        r#"
        INSERT INTO log_entries (glucose, meal, mood, time_of_day, noted_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(preset.glucose_for(command.glucose))
    .bind(&preset.name)
    .bind(preset.default_mood)
    .bind(&preset.default_time_of_day)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    tracing::info!(preset_id, entry_id = entry.id, "Entry created from preset");

    Ok((jar, Redirect::to("/")))
}

pub async fn delete_preset(
    State(state): State<AppState>,
    Path(preset_id): Path<i64>,
) -> AppResult<Redirect> {
    let result = sqlx::query("DELETE FROM meal_presets WHERE id = ?")
        .bind(preset_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Preset not found".into()));
    }

    tracing::info!(preset_id, "Preset deleted");

    Ok(Redirect::to("/"))
}
