use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::Utc;

use super::split_validation;
use crate::dto::{CreateEntryCommand, EntryResponse, FormFields, UpdateEntryCommand};
use crate::error::{AppError, AppResult};
use crate::flash::redirect_with_flash;
use crate::models::entry::LogEntry;
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    fields: FormFields,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let command = match split_validation(CreateEntryCommand::from_fields(&fields))? {
        Ok(command) => command,
        Err(message) => {
            tracing::debug!(%message, "Entry rejected");
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
    .bind(command.glucose)
    .bind(&command.meal)
    .bind(command.mood)
    .bind(&command.time_of_day)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    tracing::info!(entry_id = entry.id, glucose = entry.glucose, "Entry created");

    Ok((jar, Redirect::to("/")))
}

pub async fn list_entries(State(state): State<AppState>) -> AppResult<Json<Vec<EntryResponse>>> {
    let entries = sqlx::query_as::<_, LogEntry>(
        "SELECT * FROM log_entries ORDER BY noted_at DESC, id DESC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries.into_iter().map(EntryResponse::from).collect()))
}

pub async fn update_entry(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(entry_id): Path<i64>,
    fields: FormFields,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let mut entry = sqlx::query_as::<_, LogEntry>("SELECT * FROM log_entries WHERE id = ?")
        .bind(entry_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Entry not found".into()))?;

    let command = match split_validation(UpdateEntryCommand::from_fields(&fields))? {
        Ok(command) => command,
        Err(message) => {
            tracing::debug!(entry_id, %message, "Entry update rejected");
            return Ok(redirect_with_flash(jar, message));
        }
    };

    command.apply(&mut entry);

    sqlx::query(
        r#"
        UPDATE log_entries SET
            glucose = ?,
            meal = ?,
            mood = ?,
            time_of_day = ?
        WHERE id = ?
        "#,
    )
    .bind(entry.glucose)
    .bind(&entry.meal)
    .bind(entry.mood)
    .bind(&entry.time_of_day)
    .bind(entry_id)
    .execute(&state.db)
    .await?;

    Ok((jar, Redirect::to("/")))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> AppResult<Redirect> {
    let result = sqlx::query("DELETE FROM log_entries WHERE id = ?")
        .bind(entry_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    tracing::info!(entry_id, "Entry deleted");

    Ok(Redirect::to("/"))
}
