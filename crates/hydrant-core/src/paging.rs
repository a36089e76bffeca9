//! Paged list results.

use serde::{Deserialize, Serialize};

use crate::filter::FilterExpression;

/// Conventional query variable for the number of entities to skip.
pub const SKIP_VARIABLE: &str = "$skip";

/// Conventional query variable for the page size, `0` meaning unbounded.
pub const TOP_VARIABLE: &str = "$top";

/// One page of a list together with the full item count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Entities in this page.
    pub items: Vec<T>,
    /// Number of entities matching the query, ignoring paging.
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub fn new(items: Vec<T>, total_items: usize) -> Self {
        Self { items, total_items }
    }
}

/// Paging and filtering arguments of a list operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Entities to skip.
    pub skip: usize,
    /// Page size, `0` meaning unbounded.
    pub take: usize,
    /// Optional filter.
    pub filter: Option<FilterExpression>,
}

impl ListQuery {
    /// Creates a query for one page.
    #[must_use]
    pub fn new(skip: usize, take: usize) -> Self {
        Self {
            skip,
            take,
            filter: None,
        }
    }

    /// Attaches a filter.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterExpression) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Filters, counts and pages `items` in memory.
    ///
    /// # Example
    ///
    /// ```
    /// use hydrant_core::ListQuery;
    ///
    /// let page = ListQuery::new(2, 3).apply(1..=10);
    /// assert_eq!(page.items, vec![3, 4, 5]);
    /// assert_eq!(page.total_items, 10);
    /// ```
    pub fn apply<T, I>(&self, items: I) -> Page<T>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let matching: Vec<T> = match &self.filter {
            Some(filter) => items
                .into_iter()
                .filter(|item| filter.matches_entity(item))
                .collect(),
            None => items.into_iter().collect(),
        };
        let total_items = matching.len();
        let take = if self.take == 0 { usize::MAX } else { self.take };
        let items = matching.into_iter().skip(self.skip).take(take).collect();
        Page { items, total_items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_unbounded() {
        let page = ListQuery::new(0, 0).apply(vec![1, 2, 3]);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total_items, 3);
    }

    #[test]
    fn test_apply_skip_past_end() {
        let page = ListQuery::new(10, 5).apply(vec![1, 2, 3]);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
    }

    #[test]
    fn test_apply_with_filter() {
        let filter = FilterExpression::parse("id gt 2").unwrap();
        let items: Vec<_> = (1..=5).map(|id| serde_json::json!({ "id": id })).collect();

        let page = ListQuery::new(1, 1).with_filter(filter).apply(items);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items, vec![serde_json::json!({ "id": 4 })]);
    }
}
