//! Workout-category classification.
//!
//! The plan names workouts free-text ("Push #1 - Week 1"), so category is
//! inferred by case-insensitive substring match in a fixed priority order:
//! push, pull, upper, lower, legs. First match wins; anything else is
//! `Unknown`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutCategory {
  Push,
  Pull,
  Upper,
  Lower,
  Legs,
  Unknown,
}

impl WorkoutCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutCategory::Push => "push",
      WorkoutCategory::Pull => "pull",
      WorkoutCategory::Upper => "upper",
      WorkoutCategory::Lower => "lower",
      WorkoutCategory::Legs => "legs",
      WorkoutCategory::Unknown => "unknown",
    }
  }
}

impl std::fmt::Display for WorkoutCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Classify a workout by its display name.
pub fn classify_workout(workout_name: &str) -> WorkoutCategory {
  let name = workout_name.to_lowercase();
  if name.contains("push") {
    WorkoutCategory::Push
  } else if name.contains("pull") {
    WorkoutCategory::Pull
  } else if name.contains("upper") {
    WorkoutCategory::Upper
  } else if name.contains("lower") {
    WorkoutCategory::Lower
  } else if name.contains("legs") {
    WorkoutCategory::Legs
  } else {
    WorkoutCategory::Unknown
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_classifies_plan_names() {
    assert_eq!(classify_workout("Push #1 - Week 1"), WorkoutCategory::Push);
    assert_eq!(classify_workout("Pull #1 - Week 1"), WorkoutCategory::Pull);
    assert_eq!(classify_workout("Upper #1 - Week 1"), WorkoutCategory::Upper);
    assert_eq!(classify_workout("Lower #1 - Week 1"), WorkoutCategory::Lower);
    assert_eq!(classify_workout("Legs #1 - Week 1"), WorkoutCategory::Legs);
  }

  #[test]
  fn test_case_insensitive() {
    assert_eq!(classify_workout("PUSH DAY"), WorkoutCategory::Push);
    assert_eq!(classify_workout("leg day... LEGS"), WorkoutCategory::Legs);
  }

  #[test]
  fn test_priority_order_first_match_wins() {
    // "push" outranks "pull" outranks "legs"
    assert_eq!(classify_workout("Push + Pull"), WorkoutCategory::Push);
    assert_eq!(classify_workout("Pull & Legs"), WorkoutCategory::Pull);
  }

  #[test]
  fn test_unmatched_is_unknown() {
    assert_eq!(classify_workout("Full Body Blast"), WorkoutCategory::Unknown);
    assert_eq!(classify_workout(""), WorkoutCategory::Unknown);
  }
}
