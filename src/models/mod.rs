pub mod metrics;
pub mod session;

pub use metrics::ProgressMetrics;
pub use session::{SetRecord, WorkoutSession};
