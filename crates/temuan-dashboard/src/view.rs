//! Detail table view state: sort, filters, and page
//!
//! [`ViewState`] is a plain value. Each user action consumes the old state and
//! returns the new one, and the visible rows are derived from the full record
//! list plus the state with no hidden mutation in between.
//!
//! Derivation order is fixed: sort the full list, then filter, then paginate.

use std::collections::BTreeMap;

use crate::record::{Field, FilterField, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Field,
    pub direction: SortDirection,
}

/// Sort, filter, and page selection for the detail table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    sort: Option<SortSpec>,
    filters: BTreeMap<FilterField, String>,
    page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort: None,
            filters: BTreeMap::new(),
            page: 1,
        }
    }
}

impl ViewState {
    /// No sort, no filters, page 1
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn filter(&self, field: FilterField) -> Option<&str> {
        self.filters.get(&field).map(String::as_str)
    }

    /// Active filters
    pub fn filters(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.filters.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Current page, 1-based
    pub fn page(&self) -> usize {
        self.page
    }

    /// Header click: ascending on a new field, ascending -> descending on the
    /// same field, and back to ascending after descending.
    #[must_use]
    pub fn sort_by(mut self, field: Field) -> Self {
        let direction = match self.sort {
            Some(current) if current.field == field && current.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortSpec { field, direction });
        self
    }

    /// Select a filter value; `None` or an empty value clears the filter.
    ///
    /// The current page is left as is, even if it no longer exists.
    #[must_use]
    pub fn set_filter(mut self, field: FilterField, value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => {
                self.filters.insert(field, v);
            }
            _ => {
                self.filters.remove(&field);
            }
        }
        self
    }

    #[must_use]
    pub fn set_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// True when every active filter matches the record
    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| field.value_of(record) == value)
    }
}

/// Stable sort of the full list; `None` keeps source order
pub fn sort_records(records: &[Record], sort: Option<SortSpec>) -> Vec<&Record> {
    let mut rows: Vec<&Record> = records.iter().collect();

    if let Some(spec) = sort {
        rows.sort_by(|a, b| {
            let ordering = a.compare_by(b, spec.field);
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

/// Keep rows matching every active filter (logical AND)
pub fn filter_records<'a>(rows: Vec<&'a Record>, state: &ViewState) -> Vec<&'a Record> {
    rows.into_iter().filter(|r| state.matches(r)).collect()
}

/// Distinct non-empty values of `field` across the full list, first-observed order
pub fn unique_values(records: &[Record], field: FilterField) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();

    for record in records {
        let value = field.value_of(record);
        if !value.is_empty() && !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }

    values
}

/// Slice for a 1-based page; page 0 or past the end is empty
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
    else {
        return &[];
    };

    if start >= items.len() {
        return &[];
    }

    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages for `count` rows (0 rows -> 0 pages)
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Rows shown in the detail table for the current state
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Record>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
}

/// Sort, filter, and paginate the full list for display
pub fn visible<'a>(records: &'a [Record], state: &ViewState, page_size: usize) -> PageView<'a> {
    let filtered = filter_records(sort_records(records, state.sort()), state);

    PageView {
        rows: paginate(&filtered, state.page(), page_size).to_vec(),
        page: state.page(),
        page_size,
        total_pages: total_pages(filtered.len(), page_size),
        filtered_count: filtered.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_PAGE_SIZE;
    use pretty_assertions::assert_eq;

    fn record(identifier: &str, loss: f64, owner: &str, status: &str) -> Record {
        Record {
            identifier: identifier.to_string(),
            owner: owner.to_string(),
            loss_amount: loss,
            status: status.to_string(),
            ..Default::default()
        }
    }

    fn ids(rows: &[&Record]) -> Vec<String> {
        rows.iter().map(|r| r.identifier.clone()).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            record("1", 1000.0, "Andi", "Proses"),
            record("2", 500.0, "Budi", "Selesai"),
        ]
    }

    fn many(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| record(&i.to_string(), i as f64, "", ""))
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let state = ViewState::new();
        assert_eq!(state.sort(), None);
        assert_eq!(state.filters().count(), 0);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_sort_by_toggles_on_same_field() {
        let state = ViewState::new().sort_by(Field::LossAmount);
        assert_eq!(
            state.sort(),
            Some(SortSpec {
                field: Field::LossAmount,
                direction: SortDirection::Ascending
            })
        );
        let records = sample();
        assert_eq!(ids(&sort_records(&records, state.sort())), vec!["2", "1"]);

        let state = state.sort_by(Field::LossAmount);
        assert_eq!(state.sort().unwrap().direction, SortDirection::Descending);
        assert_eq!(ids(&sort_records(&records, state.sort())), vec!["1", "2"]);

        let state = state.sort_by(Field::LossAmount);
        assert_eq!(state.sort().unwrap().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_by_new_field_resets_to_ascending() {
        let state = ViewState::new()
            .sort_by(Field::LossAmount)
            .sort_by(Field::LossAmount)
            .sort_by(Field::Owner);
        assert_eq!(
            state.sort(),
            Some(SortSpec {
                field: Field::Owner,
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let records = vec![
            record("a", 1.0, "X", ""),
            record("b", 2.0, "Y", ""),
            record("c", 1.0, "Z", ""),
            record("d", 2.0, "W", ""),
        ];
        let asc = sort_records(
            &records,
            Some(SortSpec {
                field: Field::LossAmount,
                direction: SortDirection::Ascending,
            }),
        );
        assert_eq!(ids(&asc), vec!["a", "c", "b", "d"]);

        let desc = sort_records(
            &records,
            Some(SortSpec {
                field: Field::LossAmount,
                direction: SortDirection::Descending,
            }),
        );
        assert_eq!(ids(&desc), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_filter_by_status() {
        let records = sample();
        let state = ViewState::new().set_filter(FilterField::Status, Some("Selesai".to_string()));
        let view = visible(&records, &state, DEFAULT_PAGE_SIZE);
        assert_eq!(ids(&view.rows), vec!["2"]);
        assert_eq!(view.filtered_count, 1);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let records = vec![
            record("1", 0.0, "Andi", "Proses"),
            record("2", 0.0, "Andi", "Selesai"),
            record("3", 0.0, "Budi", "Selesai"),
        ];
        let state = ViewState::new()
            .set_filter(FilterField::Owner, Some("Andi".to_string()))
            .set_filter(FilterField::Status, Some("Selesai".to_string()));
        assert_eq!(ids(&visible(&records, &state, DEFAULT_PAGE_SIZE).rows), vec!["2"]);
    }

    #[test]
    fn test_empty_filter_value_clears_filter() {
        let state = ViewState::new()
            .set_filter(FilterField::Unit, Some("Audit".to_string()))
            .set_filter(FilterField::Unit, Some(String::new()));
        assert_eq!(state.filter(FilterField::Unit), None);

        let state = state
            .set_filter(FilterField::Unit, Some("Audit".to_string()))
            .set_filter(FilterField::Unit, None);
        assert_eq!(state, ViewState::new());
    }

    #[test]
    fn test_filter_applies_after_sort() {
        let records = vec![
            record("1", 30.0, "Andi", ""),
            record("2", 10.0, "Budi", ""),
            record("3", 20.0, "Andi", ""),
        ];
        let state = ViewState::new()
            .sort_by(Field::LossAmount)
            .set_filter(FilterField::Owner, Some("Andi".to_string()));
        assert_eq!(ids(&visible(&records, &state, DEFAULT_PAGE_SIZE).rows), vec!["3", "1"]);
    }

    #[test]
    fn test_unique_values_skip_empty_and_keep_order() {
        let records = vec![
            record("1", 0.0, "Budi", ""),
            record("2", 0.0, "", ""),
            record("3", 0.0, "Andi", ""),
            record("4", 0.0, "Budi", ""),
        ];
        assert_eq!(unique_values(&records, FilterField::Owner), vec!["Budi", "Andi"]);
        assert!(unique_values(&records, FilterField::Status).is_empty());
    }

    #[test]
    fn test_pagination_fifteen_records() {
        let records = many(15);
        let page1 = visible(&records, &ViewState::new(), DEFAULT_PAGE_SIZE);
        assert_eq!(page1.rows.len(), 10);
        assert_eq!(page1.total_pages, 2);

        let page2 = visible(&records, &ViewState::new().set_page(2), DEFAULT_PAGE_SIZE);
        assert_eq!(page2.rows.len(), 5);
        assert_eq!(page2.rows[0].identifier, "11");
    }

    #[test]
    fn test_page_is_not_clamped_when_filter_shrinks_list() {
        let mut records = many(15);
        records[0].status = "Selesai".to_string();

        let state = ViewState::new()
            .set_page(2)
            .set_filter(FilterField::Status, Some("Selesai".to_string()));
        let view = visible(&records, &state, DEFAULT_PAGE_SIZE);
        assert_eq!(view.page, 2);
        assert_eq!(view.total_pages, 1);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_paginate_edges() {
        let items = [1, 2, 3];
        assert_eq!(paginate(&items, 0, 10), &[] as &[i32]);
        assert_eq!(paginate(&items, 1, 2), &[1, 2]);
        assert_eq!(paginate(&items, 2, 2), &[3]);
        assert_eq!(paginate(&items, 3, 2), &[] as &[i32]);
        assert_eq!(paginate(&items, usize::MAX, 2), &[] as &[i32]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
