//! Completion history and the 14-day streak grid.
//!
//! History is a JSON array of `YYYY-MM-DD` local dates under [`HISTORY_KEY`].
//! Storage trouble never reaches the user: reads degrade to an empty
//! history and failed writes are logged and skipped.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::storage::KvStore;

pub const HISTORY_KEY: &str = "lockin_history";
pub const GRID_DAYS: usize = 14;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today in the local timezone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Stored date strings in insertion order. Malformed payloads read as empty.
fn load_history(store: &dyn KvStore) -> Result<Vec<String>, StorageError> {
    let Some(value) = store.get(HISTORY_KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_value::<Vec<String>>(value) {
        Ok(dates) => Ok(dates),
        Err(e) => {
            tracing::warn!(error = %e, "streak history is not a list of dates, treating as empty");
            Ok(Vec::new())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Recorded,
    AlreadyPresent,
    /// Storage failed; the session flow carries on regardless.
    Failed,
}

/// Appends completion days.
pub struct StreakRecorder<'a> {
    store: &'a dyn KvStore,
}

impl<'a> StreakRecorder<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    /// Add `today` to the history unless it is already there.
    pub fn record(&self, today: NaiveDate) -> RecordOutcome {
        match self.try_record(today) {
            Ok(outcome) => {
                tracing::debug!(date = %today, ?outcome, "streak history updated");
                outcome
            }
            Err(e) => {
                tracing::error!(error = %e, date = %today, "failed to save history");
                RecordOutcome::Failed
            }
        }
    }

    fn try_record(&self, today: NaiveDate) -> Result<RecordOutcome, StorageError> {
        let key = date_key(today);
        let mut history = load_history(self.store)?;
        if history.iter().any(|d| *d == key) {
            return Ok(RecordOutcome::AlreadyPresent);
        }
        history.push(key);
        let value = Value::from(history);
        self.store.set(HISTORY_KEY, &value)?;
        Ok(RecordOutcome::Recorded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub date: NaiveDate,
    pub filled: bool,
}

/// Read-only snapshot of the trailing window. Later writes are not observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakGrid {
    pub today: NaiveDate,
    pub cells: Vec<GridCell>,
    /// Consecutive completed days ending today, or ending yesterday when
    /// today has not been completed yet.
    pub current_streak: u32,
}

impl StreakGrid {
    pub fn load(store: &dyn KvStore, today: NaiveDate) -> Self {
        let history = load_history(store).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load history");
            Vec::new()
        });
        Self::from_history(&history, today)
    }

    pub fn from_history(history: &[String], today: NaiveDate) -> Self {
        let done: BTreeSet<NaiveDate> = history
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
            .collect();

        let cells = (0..GRID_DAYS as i64)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                GridCell {
                    date,
                    filled: done.contains(&date),
                }
            })
            .collect();

        Self {
            today,
            cells,
            current_streak: current_streak(&done, today),
        }
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.filled).count()
    }

    /// One glyph per day, oldest first.
    pub fn render(&self) -> String {
        self.cells
            .iter()
            .map(|c| if c.filled { '■' } else { '□' })
            .collect()
    }
}

fn current_streak(done: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut day = if done.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0;
    while done.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn date_key_is_iso() {
        assert_eq!(date_key(day("2026-03-07")), "2026-03-07");
    }

    #[test]
    fn grid_is_fourteen_days_oldest_first() {
        let grid = StreakGrid::from_history(&[], day("2026-10-19"));
        assert_eq!(grid.cells.len(), 14);
        assert_eq!(grid.cells[0].date, day("2026-10-06"));
        assert_eq!(grid.cells[13].date, day("2026-10-19"));
        assert_eq!(grid.render(), "□".repeat(14));
    }

    #[test]
    fn grid_crosses_month_boundaries() {
        let grid = StreakGrid::from_history(&["2026-02-28".into()], day("2026-03-05"));
        assert_eq!(grid.cells[0].date, day("2026-02-20"));
        assert!(grid.cells.iter().any(|c| c.filled && c.date == day("2026-02-28")));
    }

    #[test]
    fn malformed_history_reads_empty() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, &json!({"not": "a list"})).unwrap();
        let grid = StreakGrid::load(&store, day("2026-10-19"));
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn unparseable_entries_are_ignored() {
        let history = vec!["garbage".to_string(), "2026-10-19".to_string()];
        let grid = StreakGrid::from_history(&history, day("2026-10-19"));
        assert_eq!(grid.filled_count(), 1);
    }

    #[test]
    fn current_streak_counts_back_from_today_or_yesterday() {
        let history: Vec<String> = ["2026-10-15", "2026-10-17", "2026-10-18"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(StreakGrid::from_history(&history, day("2026-10-19")).current_streak, 2);
        assert_eq!(StreakGrid::from_history(&history, day("2026-10-18")).current_streak, 2);
        assert_eq!(StreakGrid::from_history(&history, day("2026-10-21")).current_streak, 0);
    }

    #[test]
    fn record_appends_in_order() {
        let store = MemoryStore::new();
        let recorder = StreakRecorder::new(&store);
        assert_eq!(recorder.record(day("2026-10-18")), RecordOutcome::Recorded);
        assert_eq!(recorder.record(day("2026-10-19")), RecordOutcome::Recorded);
        assert_eq!(
            store.get(HISTORY_KEY).unwrap(),
            Some(json!(["2026-10-18", "2026-10-19"]))
        );
    }
}
