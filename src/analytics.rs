//! Progress analytics engine.
//!
//! Pure calculations over a workout-history snapshot. The store owns the
//! history (append, 100-entry cap); this module only reads the slice it is
//! handed and derives volume, strength, frequency, RPE, per-exercise, and
//! weekly metrics from it. Nothing here errors: missing numeric fields are
//! treated as zero and an empty history yields empty, zero-valued results.
//!
//! Exercise names are resolved through an injected [`ExerciseNameResolver`]
//! so the engine stays decoupled from the plan dataset. Entries whose key
//! the resolver cannot resolve are skipped from per-exercise aggregation
//! only; their sets still count toward session and weekly totals.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Local, NaiveDate};

use crate::classify::{classify_workout, WorkoutCategory};
use crate::models::metrics::{
  ExerciseProgress, ExerciseRpePoint, FatigueFlags, FrequencyMetrics, PersonalRecord,
  ProgressMetrics, RpeAnalysis, SessionRpePoint, StrengthPoint, StrengthProgression,
  VolumePoint, VolumeProgression, WeekDelta, WeeklyComparison, WeeklySummary,
};
use crate::models::session::WorkoutSession;

/// ---------------------------------------------------------------------------
/// Name Resolution Seam
/// ---------------------------------------------------------------------------

/// Resolves a session's exercise-index key to an exercise name.
///
/// Sessions store exercises keyed by their index within the workout that was
/// run, so resolution needs the plan that workout came from. `WorkoutPlan`
/// implements this; tests usually pass a closure.
pub trait ExerciseNameResolver {
  fn resolve(&self, session: &WorkoutSession, exercise_key: &str) -> Option<String>;
}

impl<F> ExerciseNameResolver for F
where
  F: Fn(&WorkoutSession, &str) -> Option<String>,
{
  fn resolve(&self, session: &WorkoutSession, exercise_key: &str) -> Option<String> {
    self(session, exercise_key)
  }
}

/// ---------------------------------------------------------------------------
/// Analyzer Configuration
/// ---------------------------------------------------------------------------

/// Key lifts tracked closely in per-exercise progress. Entries are matched
/// exactly against resolved names, so they carry the plan's full spellings.
pub const KEY_EXERCISES: [&str; 8] = [
  "Bench Press",
  "Squat",
  "Deadlift",
  "Pull-Up",
  "Lat Pulldown (Feeder Sets)",
  "Lat Pulldown (Failure Set)",
  "Leg Press",
  "Standing Dumbbell Arnold Press",
];

/// Streak rule: a gap of more than this many days between workout days
/// breaks the chain.
const STREAK_MAX_GAP_DAYS: i64 = 2;

/// Trailing 3-session average RPE at or above this flags elevated fatigue.
const ELEVATED_RPE_THRESHOLD: f64 = 8.5;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
  /// Exercises tracked in per-exercise progress.
  pub watch_list: Vec<String>,

  /// Expected training days per week, for the consistency percentage.
  pub target_days_per_week: u32,
}

impl Default for AnalyzerConfig {
  fn default() -> Self {
    Self {
      watch_list: KEY_EXERCISES.iter().map(|s| s.to_string()).collect(),
      target_days_per_week: 5,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Analyzer
/// ---------------------------------------------------------------------------

pub struct ProgressAnalyzer<'a> {
  resolver: &'a dyn ExerciseNameResolver,
  today: NaiveDate,
  config: AnalyzerConfig,
}

impl<'a> ProgressAnalyzer<'a> {
  pub fn new(resolver: &'a dyn ExerciseNameResolver) -> Self {
    Self {
      resolver,
      today: Local::now().date_naive(),
      config: AnalyzerConfig::default(),
    }
  }

  /// Pin the evaluation date. The current-streak calculation depends on it.
  pub fn with_today(mut self, today: NaiveDate) -> Self {
    self.today = today;
    self
  }

  pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
    self.config = config;
    self
  }

  /// Compute every progress metric from one history snapshot.
  pub fn calculate_progress_metrics(&self, history: &[WorkoutSession]) -> ProgressMetrics {
    ProgressMetrics {
      volume_progression: self.volume_progression(history),
      strength_progression: self.strength_progression(history),
      frequency_metrics: self.frequency_metrics(history),
      rpe_analysis: self.rpe_analysis(history),
      exercise_progress: self.exercise_progress(history),
      weekly_comparison: self.weekly_comparison(history),
    }
  }

  /// -------------------------------------------------------------------------
  /// Volume Progression
  /// -------------------------------------------------------------------------

  pub fn volume_progression(&self, history: &[WorkoutSession]) -> VolumeProgression {
    let mut total_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut by_exercise: BTreeMap<String, Vec<VolumePoint>> = BTreeMap::new();

    for session in history {
      let mut session_volume = 0.0;

      for (key, sets) in &session.exercises {
        let exercise_volume: f64 = sets.values().map(|s| s.volume()).sum();
        session_volume += exercise_volume;

        // Unresolvable keys still count toward the session total above.
        if let Some(name) = self.resolver.resolve(session, key) {
          by_exercise
            .entry(name)
            .or_default()
            .push(VolumePoint { date: session.date, volume: exercise_volume });
        }
      }

      *total_by_date.entry(session.date).or_insert(0.0) += session_volume;
    }

    for points in by_exercise.values_mut() {
      points.sort_by_key(|p| p.date);
    }

    let weekly_average_volume = weekly_averages(&total_by_date);
    let daily_totals: Vec<f64> = total_by_date.values().copied().collect();
    let volume_trend = linear_trend(&daily_totals);

    VolumeProgression {
      total_volume_by_date: total_by_date,
      exercise_volume: by_exercise,
      weekly_average_volume,
      volume_trend,
    }
  }

  /// -------------------------------------------------------------------------
  /// Strength Progression
  /// -------------------------------------------------------------------------

  pub fn strength_progression(&self, history: &[WorkoutSession]) -> StrengthProgression {
    let mut by_exercise: BTreeMap<String, Vec<StrengthPoint>> = BTreeMap::new();
    let mut personal_records: BTreeMap<String, PersonalRecord> = BTreeMap::new();

    for session in history {
      for (key, sets) in &session.exercises {
        let Some(name) = self.resolver.resolve(session, key) else {
          continue;
        };

        for set in sets.values() {
          let weight = set.effective_weight();
          // Zero-weight sets never contribute to strength or records.
          if weight <= 0.0 {
            continue;
          }

          let point = StrengthPoint {
            date: session.date,
            weight,
            reps: set.reps,
            estimated_one_rm: estimated_one_rep_max(weight, set.reps),
          };
          by_exercise.entry(name.clone()).or_default().push(point);

          let record = PersonalRecord {
            weight,
            reps: set.reps,
            date: session.date,
            estimated_one_rm: point.estimated_one_rm,
          };
          match personal_records.get_mut(&name) {
            // Strictly-greater replacement keeps the earliest on ties.
            Some(existing) if weight > existing.weight => *existing = record,
            Some(_) => {}
            None => {
              personal_records.insert(name.clone(), record);
            }
          }
        }
      }
    }

    let mut strength_trends = BTreeMap::new();
    for (name, points) in by_exercise.iter_mut() {
      points.sort_by_key(|p| p.date);
      let one_rms: Vec<f64> = points.iter().map(|p| p.estimated_one_rm).collect();
      strength_trends.insert(name.clone(), linear_trend(&one_rms));
    }

    StrengthProgression { by_exercise, personal_records, strength_trends }
  }

  /// -------------------------------------------------------------------------
  /// Frequency Metrics
  /// -------------------------------------------------------------------------

  pub fn frequency_metrics(&self, history: &[WorkoutSession]) -> FrequencyMetrics {
    let mut workouts_by_week: BTreeMap<String, u32> = BTreeMap::new();
    let mut workouts_by_category: BTreeMap<WorkoutCategory, u32> = BTreeMap::new();

    for session in history {
      *workouts_by_week.entry(iso_week_key(session.date)).or_insert(0) += 1;
      let category = classify_workout(&session.workout_name);
      *workouts_by_category.entry(category).or_insert(0) += 1;
    }

    let (current_streak, longest_streak) = self.streaks(history);

    let average_weekly_frequency = if workouts_by_week.is_empty() {
      0.0
    } else {
      f64::from(workouts_by_week.values().sum::<u32>()) / workouts_by_week.len() as f64
    };

    FrequencyMetrics {
      workouts_by_week,
      workouts_by_category,
      current_streak,
      longest_streak,
      average_weekly_frequency,
      consistency_pct: self.consistency_pct(history),
    }
  }

  /// Walk distinct workout days ascending; a gap of <= 2 days continues the
  /// run. The current streak is the trailing run, but only while the last
  /// workout is at most 2 days before today.
  fn streaks(&self, history: &[WorkoutSession]) -> (u32, u32) {
    let mut dates: Vec<NaiveDate> = history.iter().map(|s| s.date).collect();
    dates.sort();
    dates.dedup();

    let Some(&last) = dates.last() else {
      return (0, 0);
    };

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in dates.windows(2) {
      if (pair[1] - pair[0]).num_days() <= STREAK_MAX_GAP_DAYS {
        run += 1;
      } else {
        longest = longest.max(run);
        run = 1;
      }
    }
    longest = longest.max(run);

    let current = if (self.today - last).num_days() <= STREAK_MAX_GAP_DAYS {
      run
    } else {
      0
    };

    (current, longest)
  }

  /// Sessions logged vs. target over the first-to-last span, capped at 100%.
  fn consistency_pct(&self, history: &[WorkoutSession]) -> f64 {
    let first = history.iter().map(|s| s.date).min();
    let last = history.iter().map(|s| s.date).max();
    let (Some(first), Some(last)) = (first, last) else {
      return 0.0;
    };

    let span_days = (last - first).num_days() + 1;
    let expected = f64::from(self.config.target_days_per_week) * span_days as f64 / 7.0;
    if expected <= 0.0 {
      return 0.0;
    }

    (history.len() as f64 / expected * 100.0).min(100.0)
  }

  /// -------------------------------------------------------------------------
  /// RPE Analysis
  /// -------------------------------------------------------------------------

  pub fn rpe_analysis(&self, history: &[WorkoutSession]) -> RpeAnalysis {
    let mut by_exercise: BTreeMap<String, Vec<ExerciseRpePoint>> = BTreeMap::new();
    let mut by_category: BTreeMap<WorkoutCategory, Vec<f64>> = BTreeMap::new();
    let mut over_time: Vec<SessionRpePoint> = Vec::new();

    for session in history {
      let category = classify_workout(&session.workout_name);
      let mut session_sum = 0.0;
      let mut session_count = 0u32;

      for (key, sets) in &session.exercises {
        let rated: Vec<f64> =
          sets.values().filter(|s| s.is_rated()).map(|s| s.rpe).collect();
        session_sum += rated.iter().sum::<f64>();
        session_count += rated.len() as u32;

        if rated.is_empty() {
          continue;
        }
        let Some(name) = self.resolver.resolve(session, key) else {
          continue;
        };
        by_exercise.entry(name).or_default().push(ExerciseRpePoint {
          date: session.date,
          average: rated.iter().sum::<f64>() / rated.len() as f64,
          set_count: rated.len() as u32,
        });
      }

      // Sessions with no rated sets contribute nothing, not a zero entry.
      if session_count > 0 {
        let average = session_sum / f64::from(session_count);
        over_time.push(SessionRpePoint { date: session.date, average, category });
        by_category.entry(category).or_default().push(average);
      }
    }

    over_time.sort_by_key(|p| p.date);
    for points in by_exercise.values_mut() {
      points.sort_by_key(|p| p.date);
    }

    let session_averages: Vec<f64> = over_time.iter().map(|p| p.average).collect();
    let average_rpe = if session_averages.is_empty() {
      0.0
    } else {
      session_averages.iter().sum::<f64>() / session_averages.len() as f64
    };

    let trailing = &session_averages[session_averages.len().saturating_sub(3)..];
    let elevated = !trailing.is_empty()
      && trailing.iter().sum::<f64>() / trailing.len() as f64 >= ELEVATED_RPE_THRESHOLD;

    RpeAnalysis {
      by_exercise,
      by_category,
      over_time,
      average_rpe,
      fatigue: FatigueFlags { rpe_trend: linear_trend(&session_averages), elevated },
    }
  }

  /// -------------------------------------------------------------------------
  /// Exercise-Specific Progress
  /// -------------------------------------------------------------------------

  pub fn exercise_progress(&self, history: &[WorkoutSession]) -> BTreeMap<String, ExerciseProgress> {
    let mut out = BTreeMap::new();

    for name in &self.config.watch_list {
      let sessions = self.collect_exercise_sessions(history, name);
      let Some(last) = sessions.last() else {
        continue;
      };

      let volumes: Vec<f64> = sessions.iter().map(|s| s.volume).collect();
      let one_rms: Vec<f64> = sessions
        .iter()
        .filter(|s| s.best_one_rm > 0.0)
        .map(|s| s.best_one_rm)
        .collect();

      out.insert(
        name.clone(),
        ExerciseProgress {
          total_sessions: sessions.len() as u32,
          volume_trend: linear_trend(&volumes),
          strength_trend: linear_trend(&one_rms),
          consistency_score: exercise_consistency(&sessions),
          improvement_rate: improvement_rate(&one_rms),
          last_performed: last.date,
          personal_best: sessions.iter().fold(None, |best, s| match (best, s.best_set) {
            (None, found) => found,
            (Some(b), Some(found)) if found.weight > b.weight => Some(found),
            (best, _) => best,
          }),
        },
      );
    }

    out
  }

  /// Per-session rollup for one watched exercise, ascending by date.
  fn collect_exercise_sessions(
    &self,
    history: &[WorkoutSession],
    exercise_name: &str,
  ) -> Vec<ExerciseSessionData> {
    let mut sessions = Vec::new();

    for session in history {
      let mut volume = 0.0;
      let mut best_one_rm: f64 = 0.0;
      let mut best_set: Option<PersonalRecord> = None;
      let mut found = false;

      for (key, sets) in &session.exercises {
        match self.resolver.resolve(session, key) {
          Some(name) if name == exercise_name => {}
          _ => continue,
        }
        found = true;

        for set in sets.values() {
          volume += set.volume();
          let weight = set.effective_weight();
          if weight <= 0.0 {
            continue;
          }
          let one_rm = estimated_one_rep_max(weight, set.reps);
          best_one_rm = best_one_rm.max(one_rm);
          let better = best_set.map_or(true, |b| weight > b.weight);
          if better {
            best_set = Some(PersonalRecord {
              weight,
              reps: set.reps,
              date: session.date,
              estimated_one_rm: one_rm,
            });
          }
        }
      }

      if found {
        sessions.push(ExerciseSessionData { date: session.date, volume, best_one_rm, best_set });
      }
    }

    sessions.sort_by_key(|s| s.date);
    sessions
  }

  /// -------------------------------------------------------------------------
  /// Weekly Comparison
  /// -------------------------------------------------------------------------

  pub fn weekly_comparison(&self, history: &[WorkoutSession]) -> WeeklyComparison {
    let mut weekly: BTreeMap<String, WeeklySummary> = BTreeMap::new();
    let mut rated: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    let mut exercises_seen: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for session in history {
      let week = iso_week_key(session.date);
      let summary = weekly.entry(week.clone()).or_default();
      summary.workout_count += 1;

      for (key, sets) in &session.exercises {
        if let Some(name) = self.resolver.resolve(session, key) {
          exercises_seen.entry(week.clone()).or_default().insert(name);
        }

        for set in sets.values() {
          summary.total_sets += 1;
          summary.total_volume += set.volume();
          if set.is_rated() {
            let entry = rated.entry(week.clone()).or_insert((0.0, 0));
            entry.0 += set.rpe;
            entry.1 += 1;
          }
        }
      }
    }

    for (week, summary) in weekly.iter_mut() {
      if let Some(&(sum, count)) = rated.get(week) {
        if count > 0 {
          summary.average_rpe = sum / f64::from(count);
        }
      }
      summary.exercise_count =
        exercises_seen.get(week).map_or(0, |names| names.len() as u32);
    }

    let weekly_volumes: Vec<f64> = weekly.values().map(|w| w.total_volume).collect();
    let weekly_volume_trend = linear_trend(&weekly_volumes);

    WeeklyComparison {
      current_vs_previous: current_vs_previous(&weekly),
      weekly,
      weekly_volume_trend,
    }
  }
}

/// One watched exercise's per-session rollup.
#[derive(Debug, Clone, Copy)]
struct ExerciseSessionData {
  date: NaiveDate,
  volume: f64,
  best_one_rm: f64,
  best_set: Option<PersonalRecord>,
}

/// ---------------------------------------------------------------------------
/// Shared Algorithms
/// ---------------------------------------------------------------------------

/// Estimated one-rep max via the Epley formula. Singles are taken at face
/// value; everything else rounds `weight * (1 + reps/30)`.
pub fn estimated_one_rep_max(weight: f64, reps: u32) -> f64 {
  if reps <= 1 {
    return weight;
  }
  (weight * (1.0 + f64::from(reps) / 30.0)).round()
}

/// OLS slope of value vs. index. 0 for fewer than two values.
pub fn linear_trend(values: &[f64]) -> f64 {
  let n = values.len();
  if n < 2 {
    return 0.0;
  }

  let n_f = n as f64;
  let mut sum_x = 0.0;
  let mut sum_y = 0.0;
  let mut sum_xy = 0.0;
  let mut sum_xx = 0.0;
  for (i, value) in values.iter().enumerate() {
    let x = i as f64;
    sum_x += x;
    sum_y += value;
    sum_xy += x * value;
    sum_xx += x * x;
  }

  let denominator = n_f * sum_xx - sum_x * sum_x;
  if denominator == 0.0 {
    return 0.0;
  }
  (n_f * sum_xy - sum_x * sum_y) / denominator
}

/// ISO-8601 week key, e.g. `2025-W07`. Uses the ISO week-numbering year, so
/// late-December dates can land in week 1 of the following year.
pub fn iso_week_key(date: NaiveDate) -> String {
  let week = date.iso_week();
  format!("{}-W{:02}", week.year(), week.week())
}

/// Average daily value per ISO week.
fn weekly_averages(by_date: &BTreeMap<NaiveDate, f64>) -> BTreeMap<String, f64> {
  let mut totals: BTreeMap<String, (f64, u32)> = BTreeMap::new();
  for (date, value) in by_date {
    let entry = totals.entry(iso_week_key(*date)).or_insert((0.0, 0));
    entry.0 += value;
    entry.1 += 1;
  }

  totals
    .into_iter()
    .map(|(week, (total, count))| (week, total / f64::from(count)))
    .collect()
}

/// Share of ISO weeks in the first-to-last span that contain the exercise.
fn exercise_consistency(sessions: &[ExerciseSessionData]) -> f64 {
  let (Some(first), Some(last)) = (sessions.first(), sessions.last()) else {
    return 0.0;
  };

  let span_weeks = (last.date - first.date).num_days() / 7 + 1;
  let performed_weeks: BTreeSet<String> =
    sessions.iter().map(|s| iso_week_key(s.date)).collect();

  (performed_weeks.len() as f64 / span_weeks as f64 * 100.0).min(100.0)
}

/// Percent change of the last-third mean over the first-third mean. Needs at
/// least 3 values and a positive early mean.
fn improvement_rate(values: &[f64]) -> f64 {
  if values.len() < 3 {
    return 0.0;
  }

  let third = values.len() / 3;
  let early: f64 = values[..third].iter().sum::<f64>() / third as f64;
  let late: f64 = values[values.len() - third..].iter().sum::<f64>() / third as f64;
  if early <= 0.0 {
    return 0.0;
  }

  (late - early) / early * 100.0
}

/// Latest week against the one before it.
fn current_vs_previous(weekly: &BTreeMap<String, WeeklySummary>) -> Option<WeekDelta> {
  let mut weeks = weekly.iter().rev();
  let (current_key, current) = weeks.next()?;
  let (previous_key, previous) = weeks.next()?;

  let volume_change_pct = if previous.total_volume > 0.0 {
    (current.total_volume - previous.total_volume) / previous.total_volume * 100.0
  } else if current.total_volume > 0.0 {
    100.0
  } else {
    0.0
  };

  Some(WeekDelta {
    week: current_key.clone(),
    previous_week: previous_key.clone(),
    volume_change_pct,
    workout_count_change: current.workout_count as i32 - previous.workout_count as i32,
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
