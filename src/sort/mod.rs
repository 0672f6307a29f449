//! Sorting engine.
//!
//! - [`language_sort`] orders one field's literals by language affinity.
//! - [`deep_sort`] ranks consolidated records on one field's values.
//! - [`result_sort`] gives search results their final order by sort key.

pub mod deep_sort;
pub mod language_sort;
pub mod result_sort;

pub use deep_sort::{compare_values, deep_sort, stable_sort_by};
pub use language_sort::{language_sort, unique_sorted_strings};
pub use result_sort::{compare_sort_keys, sort_by_keys};
