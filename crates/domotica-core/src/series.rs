// ── Rolling chart series ──
//
// Fixed-capacity label/value history per named chart. Inserting at
// capacity evicts the oldest pair before appending, so the two sequences
// always have the same length and parallel ordering.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Local;
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::format;

/// Points kept per series unless configured otherwise.
pub const DEFAULT_MAX_POINTS: usize = 20;

/// How a renderer should apply an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Redraw {
    /// Redraw in place, no transition.
    #[default]
    Immediate,
}

/// Ordered copy of one series.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeriesSnapshot {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl SeriesSnapshot {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(label, value)` pairs, oldest first.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn last(&self) -> Option<(&str, f64)> {
        self.points().last()
    }
}

/// Charting capability: draws a line series from ordered points.
///
/// Called while the registry holds the series entry, so implementations
/// must not call back into the [`ChartRegistry`].
pub trait SeriesRenderer: Send + Sync {
    fn render(&self, series_id: &str, series: &SeriesSnapshot, redraw: Redraw);

    /// Release whatever the renderer holds for this series.
    fn release(&self, _series_id: &str) {}
}

impl<T: SeriesRenderer + ?Sized> SeriesRenderer for Arc<T> {
    fn render(&self, series_id: &str, series: &SeriesSnapshot, redraw: Redraw) {
        (**self).render(series_id, series, redraw);
    }

    fn release(&self, series_id: &str) {
        (**self).release(series_id);
    }
}

struct Series {
    labels: VecDeque<String>,
    values: VecDeque<f64>,
    renderer: Box<dyn SeriesRenderer>,
}

impl Series {
    fn new(renderer: Box<dyn SeriesRenderer>, capacity: usize) -> Self {
        Self {
            labels: VecDeque::with_capacity(capacity),
            values: VecDeque::with_capacity(capacity),
            renderer,
        }
    }

    fn push(&mut self, label: String, value: f64, max_points: usize) {
        if self.labels.len() >= max_points {
            self.labels.pop_front();
            self.values.pop_front();
        }
        self.labels.push_back(label);
        self.values.push_back(value);
    }

    fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            labels: self.labels.iter().cloned().collect(),
            values: self.values.iter().copied().collect(),
        }
    }
}

/// Registry of rolling series keyed by chart id.
///
/// Series are created by [`register`](Self::register) and live until
/// [`destroy`](Self::destroy). Points for unknown ids are dropped.
pub struct ChartRegistry {
    series: DashMap<String, Series>,
    max_points: usize,
}

impl Default for ChartRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::with_max_points(DEFAULT_MAX_POINTS)
    }

    /// A registry whose series keep at most `max_points` (at least 1).
    pub fn with_max_points(max_points: usize) -> Self {
        Self {
            series: DashMap::new(),
            max_points: max_points.max(1),
        }
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Create an empty series drawn by `renderer`.
    ///
    /// Re-registering an id releases the previous renderer and starts
    /// from an empty series. Returns `true` if the id was new.
    pub fn register(&self, id: impl Into<String>, renderer: impl SeriesRenderer + 'static) -> bool {
        let id = id.into();
        let series = Series::new(Box::new(renderer), self.max_points);
        match self.series.insert(id.clone(), series) {
            Some(old) => {
                old.renderer.release(&id);
                debug!(series = %id, "series re-registered");
                false
            }
            None => {
                debug!(series = %id, "series registered");
                true
            }
        }
    }

    /// Append a point, evicting the oldest one at capacity, then redraw.
    ///
    /// No-op for unknown ids. Returns whether the point was stored.
    pub fn add_point(&self, id: &str, label: impl Into<String>, value: f64) -> bool {
        let Some(mut series) = self.series.get_mut(id) else {
            trace!(series = id, "point for unknown series dropped");
            return false;
        };
        series.push(label.into(), value, self.max_points);
        let snap = series.snapshot();
        series.renderer.render(id, &snap, Redraw::Immediate);
        true
    }

    /// [`add_point`](Self::add_point) labelled with the local time of day.
    pub fn add_point_now(&self, id: &str, value: f64) -> bool {
        let label = format::format_time(Some(&Local::now()));
        self.add_point(id, label, value)
    }

    /// Release the renderer and forget the series. Returns `true` if it existed.
    pub fn destroy(&self, id: &str) -> bool {
        match self.series.remove(id) {
            Some((id, series)) => {
                series.renderer.release(&id);
                debug!(series = %id, "series destroyed");
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self, id: &str) -> Option<SeriesSnapshot> {
        self.series.get(id).map(|s| s.snapshot())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.series.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.series.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every call so tests can inspect what would have been drawn.
    #[derive(Default)]
    struct Recorder {
        renders: Mutex<Vec<(String, usize, Redraw)>>,
        released: Mutex<Vec<String>>,
    }

    impl SeriesRenderer for Recorder {
        fn render(&self, series_id: &str, series: &SeriesSnapshot, redraw: Redraw) {
            self.renders
                .lock()
                .unwrap()
                .push((series_id.to_owned(), series.len(), redraw));
        }

        fn release(&self, series_id: &str) {
            self.released.lock().unwrap().push(series_id.to_owned());
        }
    }

    #[test]
    fn evicts_oldest_first() {
        let reg = ChartRegistry::with_max_points(20);
        reg.register("temp", Arc::new(Recorder::default()));

        for i in 0..25 {
            assert!(reg.add_point("temp", format!("t{i}"), f64::from(i)));
            let snap = reg.snapshot("temp").unwrap();
            assert_eq!(snap.labels.len(), snap.values.len());
            assert!(snap.len() <= 20);
        }

        let snap = reg.snapshot("temp").unwrap();
        let expected: Vec<f64> = (5..25).map(f64::from).collect();
        assert_eq!(snap.values, expected);
        for gone in 0..5 {
            assert!(!snap.values.contains(&f64::from(gone)));
        }
        assert_eq!(snap.labels.first().map(String::as_str), Some("t5"));
        assert_eq!(snap.last(), Some(("t24", 24.0)));
    }

    #[test]
    fn every_insert_redraws_immediately() {
        let reg = ChartRegistry::with_max_points(3);
        let rec = Arc::new(Recorder::default());
        reg.register("lux", Arc::clone(&rec));

        for i in 0..5 {
            reg.add_point("lux", "now", i as f64);
        }

        let renders = rec.renders.lock().unwrap();
        assert_eq!(renders.len(), 5);
        let lens: Vec<usize> = renders.iter().map(|(_, n, _)| *n).collect();
        assert_eq!(lens, [1, 2, 3, 3, 3]);
        assert!(renders.iter().all(|(id, _, r)| id == "lux" && *r == Redraw::Immediate));
    }

    #[test]
    fn unknown_series_is_a_no_op() {
        let reg = ChartRegistry::new();
        assert!(!reg.add_point("missing", "t", 1.0));
        assert!(reg.snapshot("missing").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn destroy_then_add_point_is_a_no_op() {
        let reg = ChartRegistry::new();
        let rec = Arc::new(Recorder::default());
        reg.register("smoke", Arc::clone(&rec));
        reg.add_point("smoke", "t0", 0.5);

        assert!(reg.destroy("smoke"));
        assert!(!reg.add_point("smoke", "t1", 0.7));
        assert!(!reg.contains("smoke"));
        assert_eq!(*rec.released.lock().unwrap(), ["smoke"]);
        assert_eq!(rec.renders.lock().unwrap().len(), 1);

        // Destroying twice is harmless.
        assert!(!reg.destroy("smoke"));

        // Re-registering brings it back, empty.
        reg.register("smoke", Arc::clone(&rec));
        assert!(reg.add_point("smoke", "t2", 0.9));
        assert_eq!(reg.snapshot("smoke").unwrap().values, [0.9]);
    }

    #[test]
    fn re_register_releases_previous_renderer() {
        let reg = ChartRegistry::new();
        let first = Arc::new(Recorder::default());
        assert!(reg.register("temp", Arc::clone(&first)));
        reg.add_point("temp", "t0", 20.0);

        assert!(!reg.register("temp", Arc::new(Recorder::default())));
        assert_eq!(*first.released.lock().unwrap(), ["temp"]);
        assert!(reg.snapshot("temp").unwrap().is_empty());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let reg = ChartRegistry::with_max_points(0);
        assert_eq!(reg.max_points(), 1);
        reg.register("x", Arc::new(Recorder::default()));
        reg.add_point("x", "a", 1.0);
        reg.add_point("x", "b", 2.0);
        assert_eq!(reg.snapshot("x").unwrap().values, [2.0]);
    }

    #[test]
    fn add_point_now_uses_time_label() {
        let reg = ChartRegistry::new();
        reg.register("temp", Arc::new(Recorder::default()));
        reg.add_point_now("temp", 21.5);
        let snap = reg.snapshot("temp").unwrap();
        let (label, value) = snap.last().unwrap();
        assert_eq!(value, 21.5);
        assert_eq!(label.len(), "12:34:56".len());
        assert_eq!(label.matches(':').count(), 2);
    }

    #[test]
    fn ids_are_sorted() {
        let reg = ChartRegistry::new();
        reg.register("temperature", Arc::new(Recorder::default()));
        reg.register("luminosity", Arc::new(Recorder::default()));
        assert_eq!(reg.ids(), ["luminosity", "temperature"]);
        assert_eq!(reg.len(), 2);
    }
}
