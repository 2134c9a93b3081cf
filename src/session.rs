//! Active-session lifecycle.
//!
//! An [`ActiveSession`] is the in-flight workout: sets get logged against it
//! as they happen, and the store persists it between launches so an
//! interrupted workout can be resumed. `finish` freezes it into the
//! immutable [`WorkoutSession`] that goes into history.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::{ExerciseSets, SetRecord, WorkoutSession};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
  pub workout_name: String,

  /// Plan slot the workout was started from ("push", "pull", ...).
  pub workout_type: String,

  pub start_time: DateTime<Utc>,

  /// Sets logged so far, exercise-index key -> set-index key.
  #[serde(default)]
  pub exercises: ExerciseSets,
}

impl ActiveSession {
  pub fn start(
    workout_name: impl Into<String>,
    workout_type: impl Into<String>,
    start_time: DateTime<Utc>,
  ) -> Self {
    Self {
      workout_name: workout_name.into(),
      workout_type: workout_type.into(),
      start_time,
      exercises: ExerciseSets::new(),
    }
  }

  /// Record (or overwrite) one set. Logging the same keys again replaces the
  /// earlier entry, which is how edits during a session work.
  pub fn log_set(&mut self, exercise_key: &str, set_key: &str, set: SetRecord) {
    self
      .exercises
      .entry(exercise_key.to_string())
      .or_default()
      .insert(set_key.to_string(), set);
  }

  /// Exercises with at least one logged set.
  pub fn logged_exercises(&self) -> usize {
    self.exercises.len()
  }

  /// Freeze into a completed session. The date is the local calendar day of
  /// the end instant; duration is whole minutes, clamped non-negative.
  pub fn finish(self, end_time: DateTime<Utc>) -> WorkoutSession {
    let duration_min = (end_time - self.start_time).num_minutes().max(0);

    WorkoutSession {
      date: end_time.with_timezone(&Local).date_naive(),
      workout_name: self.workout_name,
      workout_type: self.workout_type,
      duration_min: Some(duration_min),
      exercises: self.exercises,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 17, 30, 0).unwrap()
  }

  #[test]
  fn test_log_set_overwrites_same_slot() {
    let mut session = ActiveSession::start("Push #1 - Week 1", "push", start_time());

    session.log_set("0", "0", SetRecord::new(95.0, 5));
    session.log_set("0", "0", SetRecord::new(100.0, 5)); // corrected entry
    session.log_set("0", "1", SetRecord::new(100.0, 4));

    assert_eq!(session.logged_exercises(), 1);
    assert_eq!(session.exercises["0"].len(), 2);
    assert_eq!(session.exercises["0"]["0"].weight, 100.0);
  }

  #[test]
  fn test_finish_computes_duration_and_carries_sets() {
    let mut session = ActiveSession::start("Push #1 - Week 1", "push", start_time());
    session.log_set("0", "0", SetRecord::new(100.0, 5));

    let end = start_time() + Duration::minutes(48) + Duration::seconds(30);
    let completed = session.finish(end);

    assert_eq!(completed.duration_min, Some(48)); // whole minutes
    assert_eq!(completed.workout_name, "Push #1 - Week 1");
    assert_eq!(completed.workout_type, "push");
    assert_eq!(completed.exercises["0"]["0"].reps, 5);
    assert_eq!(completed.date, end.with_timezone(&Local).date_naive());
  }

  #[test]
  fn test_finish_clamps_negative_duration() {
    let session = ActiveSession::start("Push #1 - Week 1", "push", start_time());
    // Clock skew: end before start
    let completed = session.finish(start_time() - Duration::minutes(5));
    assert_eq!(completed.duration_min, Some(0));
  }

  #[test]
  fn test_roundtrips_through_json() {
    let mut session = ActiveSession::start("Pull #1 - Week 1", "pull", start_time());
    session.log_set("2", "0", SetRecord::new(70.0, 10));

    let json = serde_json::to_string(&session).expect("serialize");
    let back: ActiveSession = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, session);
  }
}
