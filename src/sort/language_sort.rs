//! Language-aware ordering of one field's values.

use std::collections::BTreeMap;

use crate::rdf::RdfNode;

/// Orders `literals` by language, then alphabetically within each language.
///
/// Literals are binned by language tag and the bins ordered by tag. The
/// bin of `preferred` (if present) moves to the front and untagged values
/// always come last. Within a bin values are ordered case-insensitively,
/// keeping the input order of equal values.
///
/// # Examples
///
/// ```ignore
/// use authlink::rdf::RdfNode;
/// use authlink::sort::language_sort;
///
/// let values = vec![
///     RdfNode::literal("mucca"),
///     RdfNode::literal_with_lang("cow", "en"),
///     RdfNode::literal_with_lang("Kuh", "de"),
/// ];
/// let sorted = language_sort(&values, Some("en"));
/// assert_eq!(sorted[0].lexical(), "cow");
/// ```
#[must_use]
pub fn language_sort(literals: &[RdfNode], preferred: Option<&str>) -> Vec<RdfNode> {
    let mut tagged: BTreeMap<&str, Vec<&RdfNode>> = BTreeMap::new();
    let mut untagged: Vec<&RdfNode> = Vec::new();
    for literal in literals {
        match literal.language() {
            Some(tag) => tagged.entry(tag).or_default().push(literal),
            None => untagged.push(literal),
        }
    }

    let mut bins: Vec<Vec<&RdfNode>> = Vec::with_capacity(tagged.len() + 1);
    let mut preferred_bin = None;
    for (tag, bin) in tagged {
        if preferred_bin.is_none() && preferred.is_some_and(|p| p.eq_ignore_ascii_case(tag)) {
            preferred_bin = Some(bin);
        } else {
            bins.push(bin);
        }
    }
    if let Some(bin) = preferred_bin {
        bins.insert(0, bin);
    }
    bins.push(untagged);

    let mut sorted = Vec::with_capacity(literals.len());
    for mut bin in bins {
        bin.sort_by_cached_key(|literal| literal.lexical().to_lowercase());
        sorted.extend(bin.into_iter().cloned());
    }
    sorted
}

/// Language-sorts `literals` and returns their distinct, non-blank string forms.
#[must_use]
pub fn unique_sorted_strings(literals: &[RdfNode], preferred: Option<&str>) -> Vec<String> {
    let mut strings: Vec<String> = Vec::with_capacity(literals.len());
    for literal in language_sort(literals, preferred) {
        let value = literal.lexical();
        if value.trim().is_empty() || strings.iter().any(|s| s == value) {
            continue;
        }
        strings.push(value.to_string());
    }
    strings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cow_literals() -> Vec<RdfNode> {
        vec![
            RdfNode::literal("mucca"),
            RdfNode::literal_with_lang("vache", "fr"),
            RdfNode::literal_with_lang("cow", "en"),
            RdfNode::literal_with_lang("Rind", "de"),
            RdfNode::literal("vaca"),
            RdfNode::literal_with_lang("bovine", "en"),
            RdfNode::literal_with_lang("Kuh", "de"),
        ]
    }

    fn lexicals(nodes: &[RdfNode]) -> Vec<&str> {
        nodes.iter().map(RdfNode::lexical).collect()
    }

    #[test]
    fn test_sort_without_preferred_language() {
        let sorted = language_sort(&cow_literals(), None);
        assert_eq!(
            lexicals(&sorted),
            vec!["Kuh", "Rind", "bovine", "cow", "vache", "mucca", "vaca"]
        );
    }

    #[test]
    fn test_sort_with_preferred_language() {
        let sorted = language_sort(&cow_literals(), Some("en"));
        assert_eq!(
            lexicals(&sorted),
            vec!["bovine", "cow", "Kuh", "Rind", "vache", "mucca", "vaca"]
        );
    }

    #[test]
    fn test_preferred_language_not_present() {
        let sorted = language_sort(&cow_literals(), Some("ja"));
        assert_eq!(lexicals(&sorted), lexicals(&language_sort(&cow_literals(), None)));
    }

    #[test]
    fn test_untagged_always_last() {
        let values = vec![
            RdfNode::literal("aardvark"),
            RdfNode::literal_with_lang("zebra", "zu"),
        ];
        let sorted = language_sort(&values, None);
        assert_eq!(lexicals(&sorted), vec!["zebra", "aardvark"]);
    }

    #[test]
    fn test_case_insensitive_within_bin() {
        let values = vec![
            RdfNode::literal_with_lang("banana", "en"),
            RdfNode::literal_with_lang("Apple", "en"),
            RdfNode::literal_with_lang("apricot", "en"),
        ];
        assert_eq!(
            lexicals(&language_sort(&values, None)),
            vec!["Apple", "apricot", "banana"]
        );
    }

    #[test]
    fn test_unique_sorted_strings() {
        let values = vec![
            RdfNode::literal_with_lang("cow", "en"),
            RdfNode::literal("  "),
            RdfNode::literal_with_lang("cow", "fr"),
            RdfNode::literal_with_lang("Kuh", "de"),
        ];
        assert_eq!(unique_sorted_strings(&values, None), vec!["Kuh", "cow"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(language_sort(&[], Some("en")).is_empty());
        assert!(unique_sorted_strings(&[], None).is_empty());
    }
}
