use crate::filter::Filter;
use crate::record::Record;
use std::fmt;
use std::sync::Arc;

/// Capacity reserved by [`MultiFilter::clear_filters`].
pub const DEFAULT_CHAIN_CAPACITY: usize = 8;

/// Ordered composition of [`Filter`]s.
///
/// Every filter sees the same record in list order, so later stages observe
/// what earlier ones wrote. The optional downstream filter runs last and can
/// be shared between several chains.
#[derive(Default)]
pub struct MultiFilter {
    filters: Vec<Box<dyn Filter>>,
    downstream: Option<Arc<dyn Filter>>,
}

impl MultiFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filters(filters: Vec<Box<dyn Filter>>) -> Self {
        MultiFilter {
            filters,
            downstream: None,
        }
    }

    /// Append a filter to the end of the chain.
    pub fn add_filter(&mut self, filter: impl Filter + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Drop every filter in the list. The downstream filter is kept.
    pub fn clear_filters(&mut self) {
        self.clear_filters_with_capacity(DEFAULT_CHAIN_CAPACITY);
    }

    pub fn clear_filters_with_capacity(&mut self, capacity: usize) {
        self.filters = Vec::with_capacity(capacity);
    }

    pub fn set_downstream(&mut self, filter: Arc<dyn Filter>) {
        self.downstream = Some(filter);
    }

    pub fn take_downstream(&mut self) -> Option<Arc<dyn Filter>> {
        self.downstream.take()
    }

    /// Number of filters in the list, not counting the downstream filter.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.filters.capacity()
    }
}

impl Filter for MultiFilter {
    fn apply(&self, record: &mut Record) {
        for filter in &self.filters {
            filter.apply(record);
        }
        if let Some(downstream) = &self.downstream {
            downstream.apply(record);
        }
    }
}

impl fmt::Debug for MultiFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiFilter")
            .field("filters", &self.filters.len())
            .field("downstream", &self.downstream.is_some())
            .finish()
    }
}
