use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;
use vitals_provider::Category;

/// Ordered mapping from metric name to value.
///
/// Keys are unique. Re-inserting an existing key overwrites the value in place,
/// so serialization order always follows first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricRecord {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl MetricRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced if the key already existed.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => {
                let previous = self.entries[position].1;
                self.entries[position].1 = value;
                Some(previous)
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&position| self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl Serialize for MetricRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Typed values the health scorer is driven by.
///
/// A `None` field means the category did not produce a value this cycle and
/// is left out of the overall score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthInputs {
    pub cpu_usage: Option<f64>,
    pub memory_usage: Option<f64>,
    /// Usage percent of every readable mount. `Some(vec![])` means the disk
    /// collector ran but found nothing to score.
    pub disk_usage: Option<Vec<f64>>,
}

impl HealthInputs {
    /// Overwrite each field `other` carries; fields `other` lacks are kept.
    pub fn merge(&mut self, other: HealthInputs) {
        if other.cpu_usage.is_some() {
            self.cpu_usage = other.cpu_usage;
        }
        if other.memory_usage.is_some() {
            self.memory_usage = other.memory_usage;
        }
        if other.disk_usage.is_some() {
            self.disk_usage = other.disk_usage;
        }
    }
}

/// Non-fatal condition observed during a health-check cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleWarning {
    /// A single sub-item (partition, interface, core) was skipped.
    PartialCollection {
        category: Category,
        item: String,
        reason: String,
    },
    /// A whole category produced no fragment.
    CategoryFailed { category: Category, reason: String },
    /// The same metric key was written twice; the later write won.
    Collision {
        key: String,
        previous: Category,
        current: Category,
    },
    /// A scored category was left out of the overall score.
    ScoreExcluded { category: Category },
}

impl fmt::Display for CycleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleWarning::PartialCollection {
                category,
                item,
                reason,
            } => write!(f, "{category}: skipped {item}: {reason}"),
            CycleWarning::CategoryFailed { category, reason } => {
                write!(f, "{category}: collection failed: {reason}")
            }
            CycleWarning::Collision {
                key,
                previous,
                current,
            } => write!(
                f,
                "metric key collision on {key}: {current} overwrote value from {previous}"
            ),
            CycleWarning::ScoreExcluded { category } => {
                write!(f, "{category}: excluded from overall health score")
            }
        }
    }
}

/// Partial record produced by one collector.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub category: Category,
    pub metrics: MetricRecord,
    pub inputs: HealthInputs,
    pub warnings: Vec<CycleWarning>,
}

impl Fragment {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            metrics: MetricRecord::new(),
            inputs: HealthInputs::default(),
            warnings: Vec::new(),
        }
    }

    /// Record a value. Non-finite values are dropped with a warning, and a key
    /// written twice is reported as a collision.
    pub fn put(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        if !value.is_finite() {
            self.skip(key, format!("non-finite value {value}"));
            return;
        }
        if self.metrics.insert(key.clone(), value).is_some() {
            warn!(
                "Metric key collision: {} written twice by {}",
                key, self.category
            );
            self.warnings.push(CycleWarning::Collision {
                key,
                previous: self.category,
                current: self.category,
            });
        }
    }

    /// Note a sub-item that could not be collected.
    pub fn skip(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        self.warnings.push(CycleWarning::PartialCollection {
            category: self.category,
            item: item.into(),
            reason: reason.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
