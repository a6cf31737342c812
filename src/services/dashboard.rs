//! Dashboard aggregation: the trailing 7-day glucose chart and the
//! mood-driven avatar.
//!
//! Everything here is a pure function over already-loaded records, so the
//! handler decides what to fetch and these functions decide what it means.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::entry::{LogEntry, Mood};

/// Days in the chart window, today included.
pub const WINDOW_DAYS: i64 = 7;

/// How many of the most recent entries feed the mood score.
pub const MOOD_LOOKBACK: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    /// `None` marks a day without readings; the chart draws a gap there.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvatarState {
    Concerned,
    Upbeat,
    Discouraged,
    Neutral,
}

impl AvatarState {
    pub fn symbol(self) -> &'static str {
        match self {
            AvatarState::Concerned => "😟",
            AvatarState::Upbeat => "😄",
            AvatarState::Discouraged => "😕",
            AvatarState::Neutral => "🙂",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AvatarState::Concerned => "Looks like a tough one, you've got this.",
            AvatarState::Upbeat => "Nice consistency! Keep it going.",
            AvatarState::Discouraged => "Small steps are still progress.",
            AvatarState::Neutral => "You're doing fine, one entry at a time.",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Avatar {
    pub state: AvatarState,
    pub symbol: &'static str,
    pub message: &'static str,
    pub mood_sum: i32,
}

impl From<(AvatarState, i32)> for Avatar {
    fn from((state, mood_sum): (AvatarState, i32)) -> Self {
        Self {
            state,
            symbol: state.symbol(),
            message: state.message(),
            mood_sum,
        }
    }
}

/// First day of the window ending on `today`.
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(WINDOW_DAYS - 1)
}

/// Per-day average glucose over the trailing window, oldest day first.
///
/// Entries are bucketed by the UTC calendar date of `noted_at`; anything
/// outside the window is ignored.
pub fn chart_series(entries: &[LogEntry], today: NaiveDate) -> ChartSeries {
    let start = window_start(today);

    let mut buckets: HashMap<NaiveDate, (f64, u32)> = HashMap::new();
    for entry in entries {
        let day = entry.noted_at.date_naive();
        if day < start || day > today {
            continue;
        }
        let slot = buckets.entry(day).or_insert((0.0, 0));
        slot.0 += entry.glucose;
        slot.1 += 1;
    }

    let days: Vec<NaiveDate> = (0..WINDOW_DAYS).map(|i| start + Duration::days(i)).collect();

    ChartSeries {
        labels: days.iter().map(|d| d.format("%d %b").to_string()).collect(),
        values: days
            .iter()
            .map(|d| buckets.get(d).map(|(sum, count)| sum / *count as f64))
            .collect(),
    }
}

/// Avatar for the given entries, which must be ordered newest first.
pub fn derive_avatar(recent: &[LogEntry]) -> Avatar {
    let moods: Vec<Mood> = recent.iter().take(MOOD_LOOKBACK).map(|e| e.mood).collect();
    avatar_for_moods(&moods).into()
}

fn avatar_for_moods(newest_first: &[Mood]) -> (AvatarState, i32) {
    let mood_sum: i32 = newest_first.iter().take(MOOD_LOOKBACK).map(|m| m.score()).sum();

    let state = if newest_first.first() == Some(&Mood::Negative) {
        AvatarState::Concerned
    } else if mood_sum >= 2 {
        AvatarState::Upbeat
    } else if mood_sum <= -2 {
        AvatarState::Discouraged
    } else {
        AvatarState::Neutral
    };

    (state, mood_sum)
}
