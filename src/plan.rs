//! Static workout-plan dataset.
//!
//! The week-1 Ultimate PPL plan ships embedded as JSON: five workout slots
//! (push, pull, upper, lower, legs), each with its exercise prescriptions.
//! The plan also resolves a session's exercise-index key back to a name for
//! the analytics engine.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::analytics::ExerciseNameResolver;
use crate::models::session::WorkoutSession;

static WEEK1_JSON: &str = include_str!("../data/week1.json");

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
  #[error("Failed to parse plan data: {0}")]
  Parse(#[from] serde_json::Error),
}

/// One prescribed exercise, as written in the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanExercise {
  pub name: String,

  /// Free-text counts ("3-4", "0") and rep schemes ("8-10", "30s HOLD").
  pub warmup_sets: String,
  pub working_sets: u32,
  pub reps: String,
  pub rpe: String,
  pub rest: String,

  pub substitution_option_1: String,
  pub substitution_option_2: String,
  pub coaching_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWorkout {
  pub name: String,
  pub exercises: Vec<PlanExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
  pub week: u32,

  /// Slot key ("push", "pull", ...) to workout.
  pub workouts: BTreeMap<String, PlanWorkout>,
}

impl WorkoutPlan {
  pub fn from_json(json: &str) -> Result<Self, PlanError> {
    Ok(serde_json::from_str(json)?)
  }

  /// The embedded week-1 plan. Parsed once; the asset is validated by tests.
  pub fn week1() -> &'static WorkoutPlan {
    static PLAN: OnceLock<WorkoutPlan> = OnceLock::new();
    PLAN.get_or_init(|| {
      Self::from_json(WEEK1_JSON).expect("embedded week-1 plan data is valid")
    })
  }

  pub fn workout(&self, slot: &str) -> Option<&PlanWorkout> {
    self.workouts.get(slot)
  }

  /// Name of the `index`-th exercise of a workout slot.
  pub fn exercise_name(&self, slot: &str, index: usize) -> Option<&str> {
    self
      .workout(slot)?
      .exercises
      .get(index)
      .map(|e| e.name.as_str())
  }
}

impl ExerciseNameResolver for WorkoutPlan {
  /// Sessions key exercises by their index within the plan workout they ran.
  /// Non-numeric keys and out-of-range indexes resolve to None and fall out
  /// of per-exercise aggregation.
  fn resolve(&self, session: &WorkoutSession, exercise_key: &str) -> Option<String> {
    let index: usize = exercise_key.parse().ok()?;
    self
      .exercise_name(&session.workout_type, index)
      .map(str::to_string)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn session_for(slot: &str) -> WorkoutSession {
    WorkoutSession {
      date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
      workout_name: format!("{} #1 - Week 1", slot),
      workout_type: slot.to_string(),
      duration_min: None,
      exercises: Default::default(),
    }
  }

  #[test]
  fn test_embedded_plan_parses() {
    let plan = WorkoutPlan::week1();
    assert_eq!(plan.week, 1);
    assert_eq!(plan.workouts.len(), 5);
    for slot in ["push", "pull", "upper", "lower", "legs"] {
      assert!(plan.workout(slot).is_some(), "missing slot {}", slot);
    }
  }

  #[test]
  fn test_known_exercises_present() {
    let plan = WorkoutPlan::week1();
    assert_eq!(plan.exercise_name("push", 0), Some("Bench Press"));
    assert_eq!(plan.exercise_name("legs", 0), Some("Squat"));
    assert_eq!(plan.exercise_name("lower", 0), Some("Deadlift"));
    assert_eq!(plan.exercise_name("upper", 0), Some("Pull-Up"));
  }

  #[test]
  fn test_resolves_session_exercise_keys() {
    let plan = WorkoutPlan::week1();
    let session = session_for("push");

    assert_eq!(plan.resolve(&session, "0"), Some("Bench Press".to_string()));
    assert_eq!(plan.resolve(&session, "1"), Some("Larsen Press".to_string()));
  }

  #[test]
  fn test_malformed_keys_resolve_to_none() {
    let plan = WorkoutPlan::week1();
    let session = session_for("push");

    assert_eq!(plan.resolve(&session, "not-a-number"), None);
    assert_eq!(plan.resolve(&session, "99"), None);

    let unknown_slot = session_for("cardio");
    assert_eq!(plan.resolve(&unknown_slot, "0"), None);
  }

  #[test]
  fn test_watch_list_matches_plan_spellings() {
    // Exact-match watch list: every default entry must exist in the plan
    let plan = WorkoutPlan::week1();
    let names: Vec<&str> = plan
      .workouts
      .values()
      .flat_map(|w| w.exercises.iter().map(|e| e.name.as_str()))
      .collect();

    for key in crate::analytics::KEY_EXERCISES {
      assert!(names.contains(&key), "watched exercise not in plan: {}", key);
    }
  }

  #[test]
  fn test_plan_resolver_feeds_exercise_progress() {
    use crate::analytics::ProgressAnalyzer;
    use crate::models::session::SetRecord;

    let plan = WorkoutPlan::week1();
    let mut session = session_for("pull");
    let mut sets = std::collections::BTreeMap::new();
    sets.insert("0".to_string(), SetRecord::new(70.0, 10));
    // Key "0" is Lat Pulldown (Feeder Sets) in the pull slot
    session.exercises.insert("0".to_string(), sets);

    let progress = ProgressAnalyzer::new(plan)
      .with_today(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap())
      .exercise_progress(&[session]);

    assert!(progress.contains_key("Lat Pulldown (Feeder Sets)"));
  }

  #[test]
  fn test_prescriptions_survive_parsing() {
    let plan = WorkoutPlan::week1();
    let bench = &plan.workout("push").unwrap().exercises[0];

    assert_eq!(bench.warmup_sets, "3-4");
    assert_eq!(bench.working_sets, 1);
    assert_eq!(bench.reps, "3-5");
    assert_eq!(bench.rpe, "8-9");
  }
}
