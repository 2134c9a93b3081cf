use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Set Records
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetType {
  Warmup,
  #[default]
  Working,
}

/// One performed unit of an exercise.
///
/// Legacy logs may omit any of these fields, so everything defaults to zero
/// on deserialization. An RPE of 0 means the set was not rated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SetRecord {
  #[serde(default)]
  pub weight: f64,

  #[serde(default)]
  pub reps: u32,

  #[serde(default)]
  pub rpe: f64,

  #[serde(rename = "type", default)]
  pub set_type: SetType,
}

impl SetRecord {
  pub fn new(weight: f64, reps: u32) -> Self {
    Self { weight, reps, ..Self::default() }
  }

  /// Weight clamped to non-negative before any arithmetic.
  pub fn effective_weight(&self) -> f64 {
    self.weight.max(0.0)
  }

  /// Tonnage for this set: weight x reps. Bodyweight sets legitimately
  /// contribute 0.
  pub fn volume(&self) -> f64 {
    self.effective_weight() * f64::from(self.reps)
  }

  pub fn is_rated(&self) -> bool {
    self.rpe > 0.0
  }
}

/// ---------------------------------------------------------------------------
/// Completed Sessions
/// ---------------------------------------------------------------------------

/// Map from exercise-index key to set-index key to the logged set.
///
/// Keys are strings because that is how the front-end logged them; the
/// exercise key resolves to a name through the plan (see `plan`).
pub type ExerciseSets = BTreeMap<String, BTreeMap<String, SetRecord>>;

/// One completed workout. Immutable once logged; the store owns appending
/// and history-cap enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
  /// Calendar day the session was completed (local time).
  pub date: NaiveDate,

  pub workout_name: String,

  /// Plan slot this session came from ("push", "pull", ...).
  #[serde(default)]
  pub workout_type: String,

  #[serde(default)]
  pub duration_min: Option<i64>,

  #[serde(default)]
  pub exercises: ExerciseSets,
}

/// ---------------------------------------------------------------------------
/// Log Digest
/// ---------------------------------------------------------------------------

/// Compact per-workout digest kept alongside the full history, for the
/// history list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
  pub id: i64,
  pub date: NaiveDate,
  pub workout: String,
  pub workout_type: String,
  pub exercises: usize,
  pub duration_min: i64,
  pub timestamp: DateTime<Utc>,
}

impl WorkoutLog {
  pub fn from_session(session: &WorkoutSession, timestamp: DateTime<Utc>) -> Self {
    Self {
      id: timestamp.timestamp_millis(),
      date: session.date,
      workout: session.workout_name.clone(),
      workout_type: session.workout_type.clone(),
      exercises: session.exercises.len(),
      duration_min: session.duration_min.unwrap_or(0),
      timestamp,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Measurements
/// ---------------------------------------------------------------------------

/// Current body measurements, keyed by field name ("weight", "chest", ...).
pub type Measurements = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementEntry {
  pub date: NaiveDate,
  pub value: f64,
}

/// Dated history per measurement field.
pub type MeasurementHistory = BTreeMap<String, Vec<MeasurementEntry>>;

/// ---------------------------------------------------------------------------
/// Settings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Units {
  #[default]
  Imperial,
  Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
  pub units: Units,
  pub rest_timer: String,
  pub theme: String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      units: Units::Imperial,
      rest_timer: "2:00".to_string(),
      theme: "light".to_string(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_set_record_defaults_missing_fields() {
    // A bare object is a valid (empty) set
    let set: SetRecord = serde_json::from_str("{}").expect("empty set should parse");
    assert_eq!(set.weight, 0.0);
    assert_eq!(set.reps, 0);
    assert_eq!(set.rpe, 0.0);
    assert_eq!(set.set_type, SetType::Working);
    assert!(!set.is_rated());
  }

  #[test]
  fn test_set_volume_clamps_negative_weight() {
    let set = SetRecord { weight: -40.0, reps: 8, ..SetRecord::default() };
    assert_eq!(set.effective_weight(), 0.0);
    assert_eq!(set.volume(), 0.0);
  }

  #[test]
  fn test_set_volume() {
    let set = SetRecord::new(80.0, 5);
    assert_eq!(set.volume(), 400.0);
  }

  #[test]
  fn test_set_type_tag_roundtrip() {
    let set = SetRecord { set_type: SetType::Warmup, ..SetRecord::default() };
    let json = serde_json::to_string(&set).expect("serialize");
    assert!(json.contains("\"type\":\"warmup\""), "got {}", json);
    let back: SetRecord = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.set_type, SetType::Warmup);
  }

  #[test]
  fn test_workout_log_from_session() {
    let session = WorkoutSession {
      date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
      workout_name: "Push #1 - Week 1".to_string(),
      workout_type: "push".to_string(),
      duration_min: Some(48),
      exercises: ExerciseSets::new(),
    };
    let ts = Utc::now();
    let log = WorkoutLog::from_session(&session, ts);
    assert_eq!(log.workout, "Push #1 - Week 1");
    assert_eq!(log.duration_min, 48);
    assert_eq!(log.exercises, 0);
    assert_eq!(log.id, ts.timestamp_millis());
  }
}
