//! Chart-handle registry.
//!
//! The presentation layer owns one of these and keys every chart it builds
//! by identifier, so re-renders replace the old handle instead of leaking it
//! and teardown is an explicit `destroy_all`. The registry stores only the
//! chart description; drawing belongs to the renderer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
  Line,
  Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
  pub label: String,
  pub value: f64,
}

impl ChartPoint {
  pub fn new(label: impl Into<String>, value: f64) -> Self {
    Self { label: label.into(), value }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
  pub kind: ChartKind,
  pub points: Vec<ChartPoint>,
}

#[derive(Debug, Default)]
pub struct ChartRegistry {
  charts: HashMap<String, Chart>,
}

impl ChartRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a chart under `id`, replacing any previous handle for it.
  pub fn create(&mut self, id: impl Into<String>, kind: ChartKind, points: Vec<ChartPoint>) {
    self.charts.insert(id.into(), Chart { kind, points });
  }

  pub fn get(&self, id: &str) -> Option<&Chart> {
    self.charts.get(id)
  }

  /// Drop one chart. Returns whether a handle existed.
  pub fn clear(&mut self, id: &str) -> bool {
    self.charts.remove(id).is_some()
  }

  pub fn destroy_all(&mut self) {
    self.charts.clear();
  }

  pub fn len(&self) -> usize {
    self.charts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.charts.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn points() -> Vec<ChartPoint> {
    vec![ChartPoint::new("W10", 4200.0), ChartPoint::new("W11", 4500.0)]
  }

  #[test]
  fn test_create_and_get() {
    let mut registry = ChartRegistry::new();
    registry.create("volume-chart", ChartKind::Line, points());

    let chart = registry.get("volume-chart").expect("registered");
    assert_eq!(chart.kind, ChartKind::Line);
    assert_eq!(chart.points.len(), 2);
  }

  #[test]
  fn test_create_replaces_existing_handle() {
    let mut registry = ChartRegistry::new();
    registry.create("volume-chart", ChartKind::Line, points());
    registry.create("volume-chart", ChartKind::Bar, Vec::new());

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("volume-chart").unwrap().kind, ChartKind::Bar);
  }

  #[test]
  fn test_clear_reports_presence() {
    let mut registry = ChartRegistry::new();
    registry.create("volume-chart", ChartKind::Line, points());

    assert!(registry.clear("volume-chart"));
    assert!(!registry.clear("volume-chart"));
    assert!(registry.get("volume-chart").is_none());
  }

  #[test]
  fn test_destroy_all() {
    let mut registry = ChartRegistry::new();
    registry.create("volume-chart", ChartKind::Line, points());
    registry.create("strength-chart", ChartKind::Line, points());

    registry.destroy_all();
    assert!(registry.is_empty());
  }
}
