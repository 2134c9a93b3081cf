//! Export collaborator.
//!
//! Two portable formats: a progress export (raw history + computed metrics +
//! a generated summary, for sharing or offline inspection) and a plain
//! backup bundle (measurements, logs, settings) matching the front-end's
//! export/import feature.

use std::io::{Read, Write};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::metrics::ProgressMetrics;
use crate::models::session::{Measurements, Settings, WorkoutLog, WorkoutSession};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
  #[error("Export I/O failed: {0}")]
  Io(#[from] std::io::Error),

  #[error("Malformed export data: {0}")]
  Malformed(#[from] serde_json::Error),
}

/// ---------------------------------------------------------------------------
/// Progress Summary
/// ---------------------------------------------------------------------------

/// Direction of the volume trend; the sign is surfaced, the magnitude stays
/// in the raw slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
  Increasing,
  Decreasing,
}

impl TrendDirection {
  pub fn from_slope(slope: f64) -> Self {
    if slope > 0.0 {
      TrendDirection::Increasing
    } else {
      TrendDirection::Decreasing
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
  pub volume_trend: TrendDirection,

  /// Watched exercise with the highest positive improvement rate, if any.
  pub most_improved_exercise: Option<String>,

  pub avg_weekly_workouts: f64,
  pub current_streak: u32,

  /// Distinct exercises holding a personal record.
  pub personal_records: usize,
}

pub fn generate_summary(metrics: &ProgressMetrics) -> ProgressSummary {
  let weeks = &metrics.frequency_metrics.workouts_by_week;
  let avg_weekly_workouts = if weeks.is_empty() {
    0.0
  } else {
    f64::from(weeks.values().sum::<u32>()) / weeks.len() as f64
  };

  let most_improved_exercise = metrics
    .exercise_progress
    .iter()
    .filter(|(_, p)| p.improvement_rate > 0.0)
    .max_by(|(_, a), (_, b)| {
      a.improvement_rate
        .partial_cmp(&b.improvement_rate)
        .unwrap_or(std::cmp::Ordering::Equal)
    })
    .map(|(name, _)| name.clone());

  ProgressSummary {
    volume_trend: TrendDirection::from_slope(metrics.volume_progression.volume_trend),
    most_improved_exercise,
    avg_weekly_workouts,
    current_streak: metrics.frequency_metrics.current_streak,
    personal_records: metrics.strength_progression.personal_records.len(),
  }
}

/// ---------------------------------------------------------------------------
/// Progress Export
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DateRange {
  pub start: Option<NaiveDate>,
  pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressExport {
  pub export_date: DateTime<Utc>,
  pub total_workouts: usize,
  pub date_range: DateRange,
  pub metrics: ProgressMetrics,
  pub summary: ProgressSummary,
}

/// Bundle a history snapshot and its computed metrics for export.
/// The date range is taken from the dates themselves, so the history may be
/// in either storage or chronological order.
pub fn export_progress(history: &[WorkoutSession], metrics: ProgressMetrics) -> ProgressExport {
  let summary = generate_summary(&metrics);

  ProgressExport {
    export_date: Utc::now(),
    total_workouts: history.len(),
    date_range: DateRange {
      start: history.iter().map(|s| s.date).min(),
      end: history.iter().map(|s| s.date).max(),
    },
    metrics,
    summary,
  }
}

/// ---------------------------------------------------------------------------
/// Backup Bundle
/// ---------------------------------------------------------------------------

/// The measurements + logs + settings bundle the front-end exports and
/// re-imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Backup {
  #[serde(default)]
  pub measurements: Measurements,

  #[serde(default)]
  pub logs: Vec<WorkoutLog>,

  #[serde(default)]
  pub settings: Settings,
}

pub fn write_backup<W: Write>(writer: W, backup: &Backup) -> Result<(), ExportError> {
  serde_json::to_writer_pretty(writer, backup)?;
  Ok(())
}

pub fn read_backup<R: Read>(reader: R) -> Result<Backup, ExportError> {
  Ok(serde_json::from_reader(reader)?)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analytics::ProgressAnalyzer;
  use crate::models::session::{ExerciseSets, SetRecord};
  use std::collections::BTreeMap;

  fn resolver(_: &WorkoutSession, key: &str) -> Option<String> {
    Some(key.to_string())
  }

  fn session(day: &str, name: &str, exercise: &str, weight: f64) -> WorkoutSession {
    let mut sets = BTreeMap::new();
    sets.insert("0".to_string(), SetRecord::new(weight, 5));
    let mut exercises = ExerciseSets::new();
    exercises.insert(exercise.to_string(), sets);
    WorkoutSession {
      date: day.parse().expect("valid date"),
      workout_name: name.to_string(),
      workout_type: String::new(),
      duration_min: Some(45),
      exercises,
    }
  }

  fn fixture_history() -> Vec<WorkoutSession> {
    vec![
      session("2025-03-03", "Push #1", "Bench Press", 100.0),
      session("2025-03-10", "Push #2", "Bench Press", 110.0),
      session("2025-03-17", "Push #3", "Bench Press", 120.0),
      session("2025-03-17", "Legs #1", "Squat", 140.0),
    ]
  }

  fn fixture_metrics(history: &[WorkoutSession]) -> ProgressMetrics {
    ProgressAnalyzer::new(&resolver)
      .with_today("2025-03-18".parse().expect("valid date"))
      .calculate_progress_metrics(history)
  }

  #[test]
  fn test_summary_counts_personal_records() {
    let history = fixture_history();
    let summary = generate_summary(&fixture_metrics(&history));

    assert_eq!(summary.personal_records, 2); // Bench Press + Squat
    assert_eq!(summary.volume_trend, TrendDirection::Increasing);
  }

  #[test]
  fn test_summary_picks_most_improved() {
    let history = fixture_history();
    let summary = generate_summary(&fixture_metrics(&history));

    // Bench Press improved 100 -> 120; Squat has a single session
    assert_eq!(summary.most_improved_exercise.as_deref(), Some("Bench Press"));
  }

  #[test]
  fn test_summary_of_empty_metrics() {
    let summary = generate_summary(&fixture_metrics(&[]));

    assert_eq!(summary.most_improved_exercise, None);
    assert_eq!(summary.avg_weekly_workouts, 0.0);
    assert_eq!(summary.personal_records, 0);
    // Zero slope reads as not increasing
    assert_eq!(summary.volume_trend, TrendDirection::Decreasing);
  }

  #[test]
  fn test_export_date_range_from_unordered_history() {
    // Most-recent-first, the store's order
    let mut history = fixture_history();
    history.reverse();
    let metrics = fixture_metrics(&history);
    let export = export_progress(&history, metrics);

    assert_eq!(export.total_workouts, 4);
    assert_eq!(export.date_range.start, Some("2025-03-03".parse().unwrap()));
    assert_eq!(export.date_range.end, Some("2025-03-17".parse().unwrap()));
  }

  #[test]
  fn test_backup_roundtrip() {
    let mut measurements = Measurements::new();
    measurements.insert("weight".to_string(), 82.0);
    let backup = Backup { measurements, logs: Vec::new(), settings: Settings::default() };

    let mut buf = Vec::new();
    write_backup(&mut buf, &backup).expect("write");
    let back = read_backup(buf.as_slice()).expect("read");

    assert_eq!(back, backup);
  }

  #[test]
  fn test_backup_tolerates_partial_bundle() {
    // An old export with only measurements still imports
    let back = read_backup(r#"{"measurements":{"waist":86.5}}"#.as_bytes()).expect("read");
    assert_eq!(back.measurements["waist"], 86.5);
    assert!(back.logs.is_empty());
    assert_eq!(back.settings, Settings::default());
  }
}
