//! Derived metric shapes produced by the analytics engine.
//!
//! Everything here is a pure function result: the engine computes these from
//! a history snapshot, the presentation layer renders them, the export layer
//! serializes them. All mappings are `BTreeMap` so series keyed by date or
//! ISO week come out in ascending order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::WorkoutCategory;

/// ---------------------------------------------------------------------------
/// Volume
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
  pub date: NaiveDate,
  pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VolumeProgression {
  /// Total tonnage per calendar day, all exercises combined.
  pub total_volume_by_date: BTreeMap<NaiveDate, f64>,

  /// Per-exercise dated volume series, ascending by date.
  pub exercise_volume: BTreeMap<String, Vec<VolumePoint>>,

  /// Average daily volume per ISO week.
  pub weekly_average_volume: BTreeMap<String, f64>,

  /// OLS slope over the date-ordered daily totals.
  pub volume_trend: f64,
}

/// ---------------------------------------------------------------------------
/// Strength
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthPoint {
  pub date: NaiveDate,
  pub weight: f64,
  pub reps: u32,
  pub estimated_one_rm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
  pub weight: f64,
  pub reps: u32,
  pub date: NaiveDate,
  pub estimated_one_rm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StrengthProgression {
  /// Every weighted set per exercise, ascending by date.
  pub by_exercise: BTreeMap<String, Vec<StrengthPoint>>,

  /// Heaviest set ever seen per exercise; ties keep the earliest.
  pub personal_records: BTreeMap<String, PersonalRecord>,

  /// OLS slope of the estimated-1RM series per exercise.
  pub strength_trends: BTreeMap<String, f64>,
}

/// ---------------------------------------------------------------------------
/// Frequency
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FrequencyMetrics {
  pub workouts_by_week: BTreeMap<String, u32>,
  pub workouts_by_category: BTreeMap<WorkoutCategory, u32>,

  /// Trailing run of workout days (gaps of <= 2 days allowed), or 0 if the
  /// most recent workout is more than 2 days old.
  pub current_streak: u32,
  pub longest_streak: u32,

  /// Mean workouts per ISO week over the weeks that had any.
  pub average_weekly_frequency: f64,

  /// Sessions logged vs. the configured target over the observed span,
  /// as a percentage capped at 100.
  pub consistency_pct: f64,
}

/// ---------------------------------------------------------------------------
/// RPE
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRpePoint {
  pub date: NaiveDate,
  pub average: f64,
  pub set_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionRpePoint {
  pub date: NaiveDate,
  pub average: f64,
  pub category: WorkoutCategory,
}

/// Simple fatigue read from the session-average RPE series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FatigueFlags {
  /// OLS slope of session-average RPE over time.
  pub rpe_trend: f64,

  /// Trailing 3-session average RPE at or above 8.5.
  pub elevated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RpeAnalysis {
  /// Per-exercise per-session averages, rated sets only.
  pub by_exercise: BTreeMap<String, Vec<ExerciseRpePoint>>,

  /// Session-average RPEs grouped by workout category.
  pub by_category: BTreeMap<WorkoutCategory, Vec<f64>>,

  /// Chronological session averages; sessions with no rated sets are absent.
  pub over_time: Vec<SessionRpePoint>,

  /// Mean of the session averages, 0 if no session was rated.
  pub average_rpe: f64,

  pub fatigue: FatigueFlags,
}

/// ---------------------------------------------------------------------------
/// Exercise-Specific Progress
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgress {
  pub total_sessions: u32,

  /// OLS slope of per-session volume for this exercise.
  pub volume_trend: f64,

  /// OLS slope of per-session best estimated 1RM.
  pub strength_trend: f64,

  /// Share of ISO weeks in the first-to-last span containing the exercise,
  /// as a percentage.
  pub consistency_score: f64,

  /// First-third vs. last-third mean of per-session best 1RM, as a percent
  /// change. 0 with fewer than 3 sessions or a zero early mean.
  pub improvement_rate: f64,

  pub last_performed: NaiveDate,

  /// None if the exercise has only ever been logged at zero weight.
  pub personal_best: Option<PersonalRecord>,
}

/// ---------------------------------------------------------------------------
/// Weekly Comparison
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeeklySummary {
  pub workout_count: u32,
  pub total_volume: f64,
  pub total_sets: u32,

  /// Sum of rated-set RPEs over rated-set count; 0 if none were rated.
  pub average_rpe: f64,

  /// Distinct exercises touched that week.
  pub exercise_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDelta {
  pub week: String,
  pub previous_week: String,
  pub volume_change_pct: f64,
  pub workout_count_change: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeeklyComparison {
  pub weekly: BTreeMap<String, WeeklySummary>,

  /// Latest week vs. the one before it; None with fewer than two weeks.
  pub current_vs_previous: Option<WeekDelta>,

  /// OLS slope of total weekly volume, weeks in ascending key order.
  pub weekly_volume_trend: f64,
}

/// ---------------------------------------------------------------------------
/// Combined Result
/// ---------------------------------------------------------------------------

/// Everything `ProgressAnalyzer::calculate_progress_metrics` derives from one
/// history snapshot. Well-formed (all-empty, all-zero) for an empty history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProgressMetrics {
  pub volume_progression: VolumeProgression,
  pub strength_progression: StrengthProgression,
  pub frequency_metrics: FrequencyMetrics,
  pub rpe_analysis: RpeAnalysis,
  pub exercise_progress: BTreeMap<String, ExerciseProgress>,
  pub weekly_comparison: WeeklyComparison,
}
