//! Final ordering of search results by their `sort` strings.

use std::cmp::Ordering;

/// Compares two results' sort keys.
///
/// A missing or empty key sorts first. Otherwise keys are compared
/// element-wise, case-insensitively, and a key that is a prefix of the
/// other sorts first.
#[must_use]
pub fn compare_sort_keys(a: Option<&[String]>, b: Option<&[String]>) -> Ordering {
    let a = a.filter(|k| !k.is_empty());
    let b = b.filter(|k| !k.is_empty());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a
            .iter()
            .zip(b)
            .map(|(x, y)| x.to_lowercase().cmp(&y.to_lowercase()))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| a.len().cmp(&b.len())),
    }
}

/// Stable-sorts `items` by the sort keys `key` returns.
pub fn sort_by_keys<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> Option<&[String]>,
{
    items.sort_by(|a, b| compare_sort_keys(key(a), key(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_missing_key_sorts_first() {
        let k = key(&["a"]);
        assert_eq!(compare_sort_keys(None, Some(&k)), Ordering::Less);
        assert_eq!(compare_sort_keys(Some(&[]), Some(&k)), Ordering::Less);
        assert_eq!(compare_sort_keys(Some(&k), None), Ordering::Greater);
        assert_eq!(compare_sort_keys(None, Some(&[])), Ordering::Equal);
    }

    #[test]
    fn test_caseless_elementwise() {
        let a = key(&["Cornell", "Ithaca"]);
        let b = key(&["cornell", "jamestown"]);
        assert_eq!(compare_sort_keys(Some(&a), Some(&b)), Ordering::Less);
    }

    #[test]
    fn test_prefix_sorts_first() {
        let short = key(&["cornell"]);
        let long = key(&["CORNELL", "university"]);
        assert_eq!(compare_sort_keys(Some(&short), Some(&long)), Ordering::Less);
        assert_eq!(compare_sort_keys(Some(&long), Some(&short)), Ordering::Greater);
    }

    #[test]
    fn test_sort_keeps_ties_in_order() {
        let mut items = vec![
            ("b", Some(key(&["same"]))),
            ("none", None),
            ("a", Some(key(&["SAME"]))),
            ("first", Some(key(&["alpha"]))),
        ];
        sort_by_keys(&mut items, |item| item.1.as_deref());
        let names: Vec<_> = items.iter().map(|i| i.0).collect();
        assert_eq!(names, vec!["none", "first", "b", "a"]);
    }
}
