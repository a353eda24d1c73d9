use crate::metrics::collector::CollectError;
use crate::metrics::types::{CycleWarning, Fragment, HealthInputs, MetricRecord};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;
use vitals_provider::Category;

/// Merged output of every collector in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedMetrics {
    pub record: MetricRecord,
    pub inputs: HealthInputs,
    /// Categories that produced a fragment, in merge order.
    pub collected: Vec<Category>,
    /// Categories that failed, with the reason.
    pub failed: Vec<(Category, String)>,
    pub warnings: Vec<CycleWarning>,
}

impl AggregatedMetrics {
    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
    }
}

/// Collects per-category outcomes and merges them once all are in.
///
/// Outcomes may be added in any order; [`finalize`](Self::finalize) always
/// merges in category order so collisions resolve the same way on every run.
pub struct MetricsAggregator {
    outcomes: BTreeMap<Category, Result<Fragment, CollectError>>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self {
            outcomes: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, category: Category, outcome: Result<Fragment, CollectError>) {
        self.outcomes.insert(category, outcome);
    }

    pub fn finalize(self) -> AggregatedMetrics {
        let mut record = MetricRecord::new();
        let mut owners: HashMap<String, Category> = HashMap::new();
        let mut inputs = HealthInputs::default();
        let mut collected = Vec::new();
        let mut failed = Vec::new();
        let mut warnings = Vec::new();

        for (category, outcome) in self.outcomes {
            let fragment = match outcome {
                Ok(fragment) => fragment,
                Err(e) => {
                    let reason = e.to_string();
                    warnings.push(CycleWarning::CategoryFailed {
                        category,
                        reason: reason.clone(),
                    });
                    failed.push((category, reason));
                    continue;
                }
            };

            warnings.extend(fragment.warnings);
            for (key, value) in fragment.metrics.iter() {
                if let Some(previous) = owners.insert(key.to_string(), category) {
                    warn!(
                        "Metric key collision: {} from {} overwrites value from {}",
                        key, category, previous
                    );
                    warnings.push(CycleWarning::Collision {
                        key: key.to_string(),
                        previous,
                        current: category,
                    });
                }
                record.insert(key, value);
            }
            inputs.merge(fragment.inputs);
            collected.push(category);
        }

        AggregatedMetrics {
            record,
            inputs,
            collected,
            failed,
            warnings,
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge a batch of collector outcomes in one call.
pub fn aggregate(
    outcomes: impl IntoIterator<Item = (Category, Result<Fragment, CollectError>)>,
) -> AggregatedMetrics {
    let mut aggregator = MetricsAggregator::new();
    for (category, outcome) in outcomes {
        aggregator.add(category, outcome);
    }
    aggregator.finalize()
}
