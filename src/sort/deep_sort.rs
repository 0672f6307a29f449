//! Ranking whole records by the values of one field.
//!
//! Each record's (already language-sorted) value list is classified as
//! numeric, single or multiple, and pairs of records are compared with the
//! rules of [`compare_values`]. The multi-language rule sums per-language
//! comparison results and is not transitive for every input, so records are
//! ordered with [`stable_sort_by`], which never relies on a total order.

use std::cmp::Ordering;

use lazy_static::lazy_static;
use regex::Regex;

use crate::rdf::RdfNode;

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^\s*[+-]?\d+\s*$").expect("valid integer pattern");
}

#[derive(Debug)]
enum SortValue<'a> {
    Numeric(i128),
    Single(&'a RdfNode),
    Multiple(&'a [RdfNode]),
}

impl<'a> SortValue<'a> {
    fn classify(values: &'a [RdfNode]) -> Self {
        match values {
            [only] => integer_value(only).map_or(Self::Single(only), Self::Numeric),
            _ => Self::Multiple(values),
        }
    }
}

fn integer_value(node: &RdfNode) -> Option<i128> {
    if node.is_blank() || !INTEGER.is_match(node.lexical()) {
        return None;
    }
    node.lexical().trim().trim_start_matches('+').parse().ok()
}

fn language_of(node: &RdfNode) -> Option<String> {
    node.language().map(str::to_ascii_lowercase)
}

fn caseless_cmp(a: &RdfNode, b: &RdfNode) -> Ordering {
    a.lexical().to_lowercase().cmp(&b.lexical().to_lowercase())
}

/// Compares two records' value lists for ranking.
///
/// - both numeric (one integer-like value each): numeric order
/// - both single: same language compares case-insensitively; otherwise the
///   preferred language first, tagged before untagged, then by tag
/// - otherwise the multiple-value rules: uniform-language lists compare
///   element-wise; failing that, values in the preferred language decide;
///   failing that, per-language comparisons are summed
#[must_use]
pub fn compare_values(a: &[RdfNode], b: &[RdfNode], preferred: Option<&str>) -> Ordering {
    let preferred = preferred.map(str::to_ascii_lowercase);
    let preferred = preferred.as_deref();
    match (SortValue::classify(a), SortValue::classify(b)) {
        (SortValue::Numeric(x), SortValue::Numeric(y)) => x.cmp(&y),
        (SortValue::Numeric(_) | SortValue::Single(_), SortValue::Numeric(_) | SortValue::Single(_)) => {
            single_compare(&a[0], &b[0], preferred)
        },
        _ => multiple_compare(a, b, preferred),
    }
}

fn single_compare(a: &RdfNode, b: &RdfNode, preferred: Option<&str>) -> Ordering {
    let (lang_a, lang_b) = (language_of(a), language_of(b));
    if lang_a == lang_b {
        return caseless_cmp(a, b);
    }
    if preferred.is_some() {
        if lang_a.as_deref() == preferred {
            return Ordering::Less;
        }
        if lang_b.as_deref() == preferred {
            return Ordering::Greater;
        }
    }
    match (lang_a, lang_b) {
        (None, _) => Ordering::Greater,
        (_, None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

fn is_uniform(values: &[RdfNode]) -> bool {
    values
        .split_first()
        .map_or(true, |(first, rest)| {
            let lang = language_of(first);
            rest.iter().all(|v| language_of(v) == lang)
        })
}

fn in_language<'a>(values: &'a [RdfNode], lang: Option<&str>) -> Vec<&'a RdfNode> {
    values
        .iter()
        .filter(|v| language_of(v).as_deref() == lang)
        .collect()
}

fn multiple_compare(a: &[RdfNode], b: &[RdfNode], preferred: Option<&str>) -> Ordering {
    if is_uniform(a) && is_uniform(b) {
        let (a, b): (Vec<_>, Vec<_>) = (a.iter().collect(), b.iter().collect());
        return list_compare(&a, &b);
    }

    if let Some(lang) = preferred {
        let (pa, pb) = (in_language(a, Some(lang)), in_language(b, Some(lang)));
        match (pa.is_empty(), pb.is_empty()) {
            (false, false) => return list_compare(&pa, &pb),
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (true, true) => {},
        }
    }

    let mut languages: Vec<Option<String>> = Vec::new();
    for value in a.iter().chain(b) {
        let lang = language_of(value);
        if !languages.contains(&lang) {
            languages.push(lang);
        }
    }
    let score: i32 = languages
        .iter()
        .map(|lang| {
            let (la, lb) = (in_language(a, lang.as_deref()), in_language(b, lang.as_deref()));
            match list_compare(&la, &lb) {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            }
        })
        .sum();
    score.cmp(&0)
}

/// Compares two lists element-wise, case-insensitively.
///
/// A non-empty list sorts before an empty one; when one list is a prefix
/// of the other, the shorter list sorts first.
fn list_compare(a: &[&RdfNode], b: &[&RdfNode]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {},
    }
    for (x, y) in a.iter().zip(b) {
        let ord = caseless_cmp(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Stable merge sort that tolerates comparators without a total order.
///
/// Unlike [`slice::sort_by`], it never panics on an inconsistent
/// comparator; the result is then merely some permutation of the input.
pub fn stable_sort_by<T, F>(items: Vec<T>, mut compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if items.len() <= 1 {
            return items;
        }
        let right = items.split_off(items.len() / 2);
        let left = merge_sort(items, compare);
        let right = merge_sort(right, compare);

        let mut merged = Vec::with_capacity(left.len() + right.len());
        let mut left = left.into_iter().peekable();
        let mut right = right.into_iter().peekable();
        loop {
            let take_right = match (left.peek(), right.peek()) {
                (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
                (Some(_), None) => false,
                (None, Some(_)) => true,
                (None, None) => break,
            };
            let next = if take_right { right.next() } else { left.next() };
            merged.extend(next);
        }
        merged
    }
    merge_sort(items, &mut compare)
}

/// Ranks `items` by the values `key` returns for each of them.
pub fn deep_sort<T, F>(items: Vec<T>, key: F, preferred: Option<&str>) -> Vec<T>
where
    F: Fn(&T) -> &[RdfNode],
{
    stable_sort_by(items, |a, b| compare_values(key(a), key(b), preferred))
}
