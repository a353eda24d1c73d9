use crate::health::curve::{cpu_score, disk_score, memory_score, MAX_SCORE};
use crate::metrics::HealthInputs;
use serde::{Deserialize, Serialize};
use vitals_provider::Category;

/// Overall score used when no category could be scored.
pub const NEUTRAL_SCORE: f64 = MAX_SCORE;

/// Score of a single category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
}

/// Per-category scores plus the combined overall score.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthScore {
    categories: Vec<CategoryScore>,
    overall: f64,
    excluded: Vec<Category>,
}

impl HealthScore {
    pub fn categories(&self) -> &[CategoryScore] {
        &self.categories
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.categories
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.score)
    }

    pub fn overall(&self) -> f64 {
        self.overall
    }

    /// Scored categories that had no input this cycle.
    pub fn excluded(&self) -> &[Category] {
        &self.excluded
    }
}

/// Relative weight of each scored category in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl ScoreWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Cpu => self.cpu,
            Category::Memory => self.memory,
            Category::Disk => self.disk,
            Category::Network | Category::Process => 0.0,
        }
    }
}

/// Derives health scores from the aggregated driving values.
#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    weights: Option<ScoreWeights>,
}

impl HealthScorer {
    /// Scorer combining categories with an unweighted mean.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scorer combining categories with a weighted mean.
    pub fn weighted(weights: ScoreWeights) -> Self {
        Self {
            weights: Some(weights),
        }
    }

    pub fn weights(&self) -> Option<&ScoreWeights> {
        self.weights.as_ref()
    }

    pub fn score(&self, inputs: &HealthInputs) -> HealthScore {
        let mut categories = Vec::with_capacity(3);
        let mut excluded = Vec::new();

        match inputs.cpu_usage {
            Some(usage) => categories.push(CategoryScore {
                category: Category::Cpu,
                score: cpu_score(usage),
            }),
            None => excluded.push(Category::Cpu),
        }
        match inputs.memory_usage {
            Some(usage) => categories.push(CategoryScore {
                category: Category::Memory,
                score: memory_score(usage),
            }),
            None => excluded.push(Category::Memory),
        }
        match &inputs.disk_usage {
            Some(usages) => categories.push(CategoryScore {
                category: Category::Disk,
                score: disk_score(usages),
            }),
            None => excluded.push(Category::Disk),
        }

        let overall = self.combine(&categories);

        HealthScore {
            categories,
            overall,
            excluded,
        }
    }

    fn combine(&self, categories: &[CategoryScore]) -> f64 {
        if categories.is_empty() {
            return NEUTRAL_SCORE;
        }

        if let Some(weights) = &self.weights {
            let total: f64 = categories.iter().map(|s| weights.weight(s.category)).sum();
            if total > 0.0 {
                let weighted: f64 = categories
                    .iter()
                    .map(|s| weights.weight(s.category) * s.score)
                    .sum();
                return (weighted / total).clamp(0.0, MAX_SCORE);
            }
        }

        let sum: f64 = categories.iter().map(|s| s.score).sum();
        (sum / categories.len() as f64).clamp(0.0, MAX_SCORE)
    }
}
