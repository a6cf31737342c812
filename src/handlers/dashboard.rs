use axum::{extract::State, response::Html, Json};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::dto::EntryResponse;
use crate::error::AppResult;
use crate::flash::take_flash;
use crate::models::entry::LogEntry;
use crate::models::preset::MealPreset;
use crate::services::dashboard::{chart_series, derive_avatar, window_start, Avatar, ChartSeries};
use crate::views;
use crate::AppState;

/// Rows shown in the recent-entries table.
pub const RECENT_LIMIT: i64 = 50;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub entries: Vec<EntryResponse>,
    pub chart: ChartSeries,
    pub avatar: Avatar,
    pub presets: Vec<MealPreset>,
}

pub async fn load_dashboard(db: &SqlitePool, today: NaiveDate) -> AppResult<Dashboard> {
    let entries = sqlx::query_as::<_, LogEntry>(
        "SELECT * FROM log_entries ORDER BY noted_at DESC, id DESC LIMIT ?",
    )
    .bind(RECENT_LIMIT)
    .fetch_all(db)
    .await?;

    let window_from = Utc.from_utc_datetime(&window_start(today).and_time(NaiveTime::MIN));
    let window_entries = sqlx::query_as::<_, LogEntry>(
        "SELECT * FROM log_entries WHERE noted_at >= ? ORDER BY noted_at ASC",
    )
    .bind(window_from)
    .fetch_all(db)
    .await?;

    let presets = sqlx::query_as::<_, MealPreset>(
        "SELECT * FROM meal_presets ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(db)
    .await?;

    Ok(Dashboard {
        chart: chart_series(&window_entries, today),
        avatar: derive_avatar(&entries),
        entries: entries.into_iter().map(EntryResponse::from).collect(),
        presets,
    })
}

pub async fn home(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Html<String>)> {
    let dashboard = load_dashboard(&state.db, Utc::now().date_naive()).await?;
    let (jar, flash) = take_flash(jar);

    Ok((jar, Html(views::dashboard_page(&dashboard, flash.as_deref()))))
}

pub async fn dashboard_json(State(state): State<AppState>) -> AppResult<Json<Dashboard>> {
    let dashboard = load_dashboard(&state.db, Utc::now().date_naive()).await?;
    Ok(Json(dashboard))
}

pub async fn privacy() -> Html<String> {
    Html(views::privacy_page())
}
