//! Local JSON persistence.
//!
//! One file per record family under a caller-supplied directory, mirroring
//! the key-value schema of the original front-end storage: workout history
//! (capped), log digests, measurements and their dated history, settings,
//! and the saved in-flight session. Missing files read as empty defaults.
//!
//! The store owns all mutation of the history; the analytics engine only
//! ever sees the snapshot returned by [`JsonStore::load_history`].

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::session::{
  MeasurementEntry, MeasurementHistory, Measurements, Settings, WorkoutLog, WorkoutSession,
};
use crate::session::ActiveSession;

/// Most recent workouts kept in history; older entries are dropped.
pub const HISTORY_CAP: usize = 100;

const HISTORY_FILE: &str = "history.json";
const LOGS_FILE: &str = "logs.json";
const MEASUREMENTS_FILE: &str = "measurements.json";
const MEASUREMENT_HISTORY_FILE: &str = "measurement_history.json";
const SETTINGS_FILE: &str = "settings.json";
const SESSION_FILE: &str = "session.json";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Storage I/O failed: {0}")]
  Io(#[from] std::io::Error),

  #[error("Malformed record: {0}")]
  Malformed(#[from] serde_json::Error),
}

/// ---------------------------------------------------------------------------
/// Store
/// ---------------------------------------------------------------------------

pub struct JsonStore {
  root: PathBuf,
}

impl JsonStore {
  /// Open (creating if needed) a store rooted at `root`.
  pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
    let root = root.into();
    fs::create_dir_all(&root)?;
    Ok(Self { root })
  }

  fn read_or_default<T>(&self, file: &str) -> Result<T, StoreError>
  where
    T: DeserializeOwned + Default,
  {
    let path = self.root.join(file);
    if !path.exists() {
      return Ok(T::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
  }

  fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(self.root.join(file), json)?;
    Ok(())
  }

  /// -------------------------------------------------------------------------
  /// Workout History
  /// -------------------------------------------------------------------------

  /// Full history, most recent first.
  pub fn load_history(&self) -> Result<Vec<WorkoutSession>, StoreError> {
    self.read_or_default(HISTORY_FILE)
  }

  /// Prepend a completed workout and enforce the history cap.
  pub fn append_workout(&self, session: WorkoutSession) -> Result<(), StoreError> {
    let mut history = self.load_history()?;
    history.insert(0, session);
    history.truncate(HISTORY_CAP);
    self.write(HISTORY_FILE, &history)
  }

  /// -------------------------------------------------------------------------
  /// Log Digests
  /// -------------------------------------------------------------------------

  pub fn load_logs(&self) -> Result<Vec<WorkoutLog>, StoreError> {
    self.read_or_default(LOGS_FILE)
  }

  pub fn append_log(&self, log: WorkoutLog) -> Result<(), StoreError> {
    let mut logs = self.load_logs()?;
    logs.insert(0, log);
    self.write(LOGS_FILE, &logs)
  }

  /// -------------------------------------------------------------------------
  /// Measurements
  /// -------------------------------------------------------------------------

  pub fn load_measurements(&self) -> Result<Measurements, StoreError> {
    self.read_or_default(MEASUREMENTS_FILE)
  }

  pub fn load_measurement_history(&self) -> Result<MeasurementHistory, StoreError> {
    self.read_or_default(MEASUREMENT_HISTORY_FILE)
  }

  /// Update the current value for a field and append to its dated history.
  pub fn record_measurement(
    &self,
    field: &str,
    date: NaiveDate,
    value: f64,
  ) -> Result<(), StoreError> {
    let mut current = self.load_measurements()?;
    current.insert(field.to_string(), value);
    self.write(MEASUREMENTS_FILE, &current)?;

    let mut history = self.load_measurement_history()?;
    history
      .entry(field.to_string())
      .or_default()
      .push(MeasurementEntry { date, value });
    self.write(MEASUREMENT_HISTORY_FILE, &history)
  }

  /// -------------------------------------------------------------------------
  /// Settings
  /// -------------------------------------------------------------------------

  pub fn load_settings(&self) -> Result<Settings, StoreError> {
    self.read_or_default(SETTINGS_FILE)
  }

  pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
    self.write(SETTINGS_FILE, settings)
  }

  /// -------------------------------------------------------------------------
  /// Saved Session (resume support)
  /// -------------------------------------------------------------------------

  pub fn save_session(&self, session: &ActiveSession) -> Result<(), StoreError> {
    self.write(SESSION_FILE, session)
  }

  /// The in-flight session, if one was saved. None means nothing to resume.
  pub fn load_session(&self) -> Result<Option<ActiveSession>, StoreError> {
    let path = self.root.join(SESSION_FILE);
    if !path.exists() {
      return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
  }

  pub fn clear_session(&self) -> Result<(), StoreError> {
    match fs::remove_file(self.root.join(SESSION_FILE)) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
