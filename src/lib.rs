//! Personal workout tracker: set logging, local persistence, and progress
//! analytics for a fixed weekly plan.
//!
//! The crate is split along collaborator lines. `analytics` is the core: a
//! pure engine that derives volume, strength, frequency, RPE, per-exercise,
//! and weekly metrics from a history snapshot. Around it sit `store` (local
//! JSON persistence, history cap, session resume), `plan` (the static
//! workout dataset and exercise-name resolution), `session` (the in-flight
//! workout), `export` (portable bundles), and `charts` (handle registry for
//! the renderer).

pub mod analytics;
pub mod charts;
pub mod classify;
pub mod export;
pub mod models;
pub mod plan;
pub mod session;
pub mod store;

pub use analytics::{AnalyzerConfig, ExerciseNameResolver, ProgressAnalyzer};
pub use charts::ChartRegistry;
pub use classify::{classify_workout, WorkoutCategory};
pub use models::metrics::ProgressMetrics;
pub use models::session::{SetRecord, SetType, Settings, WorkoutSession};
pub use plan::WorkoutPlan;
pub use session::ActiveSession;
pub use store::{JsonStore, StoreError, HISTORY_CAP};
