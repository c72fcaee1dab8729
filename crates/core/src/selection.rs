//! Angle selection filters.
//!
//! Pure projections over a collection of selectable items. Nothing here
//! mutates selection state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Anything carrying an `is_selected` flag.
pub trait Selectable {
    fn is_selected(&self) -> bool;
}

/// Which angles a listing should return.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionFilter {
    #[default]
    All,
    Selected,
    Unselected,
}

impl SelectionFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionFilter::All => "all",
            SelectionFilter::Selected => "selected",
            SelectionFilter::Unselected => "unselected",
        }
    }

    /// Whether `item` passes this filter.
    pub fn matches<T: Selectable>(self, item: &T) -> bool {
        match self {
            SelectionFilter::All => true,
            SelectionFilter::Selected => item.is_selected(),
            SelectionFilter::Unselected => !item.is_selected(),
        }
    }
}

impl fmt::Display for SelectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SelectionFilter::All),
            "selected" => Ok(SelectionFilter::Selected),
            "unselected" => Ok(SelectionFilter::Unselected),
            other => Err(CoreError::Validation(format!(
                "Invalid selection filter '{other}'. Must be one of: all, selected, unselected"
            ))),
        }
    }
}

/// Keep the items matching `filter`, preserving order.
pub fn apply_filter<T: Selectable>(items: Vec<T>, filter: SelectionFilter) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| filter.matches(item))
        .collect()
}

/// Number of selected items.
pub fn count_selected<T: Selectable>(items: &[T]) -> usize {
    items.iter().filter(|item| item.is_selected()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(u32, bool);

    impl Selectable for Item {
        fn is_selected(&self) -> bool {
            self.1
        }
    }

    fn items() -> Vec<Item> {
        vec![Item(1, true), Item(2, false), Item(3, true), Item(4, false)]
    }

    #[test]
    fn all_keeps_everything_in_order() {
        assert_eq!(apply_filter(items(), SelectionFilter::All), items());
    }

    #[test]
    fn selected_and_unselected_partition() {
        let selected = apply_filter(items(), SelectionFilter::Selected);
        let unselected = apply_filter(items(), SelectionFilter::Unselected);
        assert_eq!(selected, vec![Item(1, true), Item(3, true)]);
        assert_eq!(unselected, vec![Item(2, false), Item(4, false)]);
        assert_eq!(selected.len() + unselected.len(), items().len());
    }

    #[test]
    fn count_selected_counts_flags() {
        assert_eq!(count_selected(&items()), 2);
        assert_eq!(count_selected::<Item>(&[]), 0);
    }

    #[test]
    fn filter_parses_from_query_strings() {
        assert_eq!("selected".parse::<SelectionFilter>().unwrap(), SelectionFilter::Selected);
        assert_eq!(SelectionFilter::default(), SelectionFilter::All);
        assert!("chosen".parse::<SelectionFilter>().is_err());
    }
}
