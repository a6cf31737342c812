//! Replaces the contents of the store with a week of demo readings.
//!
//! `cargo run --bin seed`

use anyhow::Context;
use chrono::{Duration, NaiveTime, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use pancrepal::{config::Config, db};

const MEALS: [&str; 10] = [
    "Porridge",
    "Chicken Wrap",
    "Pasta",
    "Salad",
    "Yoghurt",
    "Toast",
    "Snack Bar",
    "Rice",
    "Omelette",
    "Cereal",
];
const TIMES: [&str; 5] = ["Breakfast", "Lunch", "Dinner", "Snack", "Training"];
const ENTRIES_PER_DAY: usize = 10;
const DAYS: i64 = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,pancrepal=info".into()),
        )
        .init();

    let config = Config::from_env();
    let pool = db::create_pool(&config).context("invalid DATABASE_URL")?;
    db::run_migrations(&pool)
        .await
        .context("failed to prepare schema")?;

    tracing::info!("Seeding PancrePal database");

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM log_entries").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM meal_presets").execute(&mut *tx).await?;

    let moods = pancrepal::models::entry::Mood::ALL;
    let today = Utc::now().date_naive();
    let mut rng = rand::thread_rng();

    for d in 0..DAYS {
        let date = today - Duration::days(DAYS - 1 - d);
        for _ in 0..ENTRIES_PER_DAY {
            let glucose = (rng.gen_range(4.5..=12.5_f64) * 10.0).round() / 10.0;
            let time = NaiveTime::from_hms_opt(rng.gen_range(6..=22), rng.gen_range(0..=59), 0)
                .unwrap_or(NaiveTime::MIN);
            let noted_at = Utc.from_utc_datetime(&date.and_time(time));

            sqlx::query(
                r#"
                INSERT INTO log_entries (glucose, meal, mood, time_of_day, noted_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(glucose)
            .bind(MEALS.choose(&mut rng).copied())
            .bind(moods.choose(&mut rng).copied().unwrap_or_default())
            .bind(TIMES.choose(&mut rng).copied())
            .bind(noted_at)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    tracing::info!(
        entries = DAYS as usize * ENTRIES_PER_DAY,
        days = DAYS,
        "Seed complete"
    );

    Ok(())
}
