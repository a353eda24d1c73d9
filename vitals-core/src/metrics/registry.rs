use crate::metrics::collector::{
    Collector, CpuCollector, DiskCollector, MemoryCollector, NetworkCollector, ProcessCollector,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use vitals_provider::Category;

/// Registry of the collectors a health check fans out to.
///
/// The registry is responsible for:
/// - Holding at most one collector per category
/// - Handing collectors out in merge order (cpu, memory, disk, network, process)
pub struct CollectorRegistry {
    collectors: BTreeMap<Category, Arc<dyn Collector>>,
}

impl CollectorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            collectors: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in collector for every category.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CpuCollector);
        registry.register(MemoryCollector);
        registry.register(DiskCollector);
        registry.register(NetworkCollector);
        registry.register(ProcessCollector);
        registry
    }

    /// Register a collector under its category.
    /// Returns the collector it replaced, if any.
    pub fn register<T: Collector + 'static>(&mut self, collector: T) -> Option<Arc<dyn Collector>> {
        self.collectors
            .insert(collector.category(), Arc::new(collector))
    }

    /// Remove the collector for a category.
    pub fn remove(&mut self, category: Category) -> Option<Arc<dyn Collector>> {
        self.collectors.remove(&category)
    }

    /// Get the number of registered collectors
    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Get the collector for a category.
    pub fn get(&self, category: Category) -> Option<&Arc<dyn Collector>> {
        self.collectors.get(&category)
    }

    /// All registered collectors in merge order.
    pub fn all(&self) -> Vec<&Arc<dyn Collector>> {
        self.collectors.values().collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.collectors.keys().copied().collect()
    }
}

impl Default for CollectorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_category_in_order() {
        let registry = CollectorRegistry::with_defaults();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.categories(), Category::ALL.to_vec());

        let order: Vec<Category> = registry.all().iter().map(|c| c.category()).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn test_register_replaces_same_category() {
        let mut registry = CollectorRegistry::new();
        assert!(registry.register(DiskCollector).is_none());
        assert!(registry.register(DiskCollector).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut registry = CollectorRegistry::with_defaults();
        assert!(registry.remove(Category::Network).is_some());
        assert!(registry.get(Category::Network).is_none());
        assert_eq!(registry.len(), 4);
    }
}
