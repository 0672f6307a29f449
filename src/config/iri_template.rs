//! IRI templates used to build authority request URLs.
//!
//! Authority configurations describe their URLs as Hydra-style IRI
//! templates: a template string with `{variable}` slots plus one mapping
//! entry per variable. `{?variable}` marks a slot that expands to the
//! empty string when no value is bound.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{LinkedDataError, Result};

/// Raw `url` block as it appears in an authority configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIriTemplate {
    /// Template string with `{variable}` slots.
    pub template: Option<String>,
    /// Variable representation; only `BasicRepresentation` is meaningful.
    #[serde(default, alias = "variableRepresentation")]
    pub variable_representation: Option<String>,
    /// One entry per template variable.
    #[serde(default)]
    pub mapping: Vec<RawIriTemplateMapping>,
}

/// Raw mapping entry of an IRI template.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIriTemplateMapping {
    /// Name of the variable.
    pub variable: String,
    /// Descriptive property (e.g. `hydra:freetextQuery`).
    #[serde(default)]
    pub property: Option<String>,
    /// Whether a value must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Value used when none is bound.
    #[serde(default)]
    pub default: Option<String>,
    /// Whether to percent-encode the bound value.
    #[serde(default)]
    pub encode: bool,
}

/// Mapping of one template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IriTemplateMapping {
    /// Name of the variable.
    pub variable: String,
    /// Descriptive property, kept for diagnostics.
    pub property: Option<String>,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Value used when none is bound.
    pub default: Option<String>,
    /// Whether to percent-encode the bound value.
    pub encode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot { variable: String, optional: bool },
}

/// A validated IRI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IriTemplate {
    template: String,
    segments: Vec<Segment>,
    mappings: IndexMap<String, IriTemplateMapping>,
}

impl IriTemplate {
    /// Validates a raw `url` block.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] if the template
    /// string is missing, a slot is unterminated, or a slot has no mapping.
    pub fn from_raw(raw: &RawIriTemplate) -> Result<Self> {
        let template = raw
            .template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                LinkedDataError::InvalidConfiguration("url is missing its template".into())
            })?;

        let mappings: IndexMap<String, IriTemplateMapping> = raw
            .mapping
            .iter()
            .map(|m| {
                (
                    m.variable.clone(),
                    IriTemplateMapping {
                        variable: m.variable.clone(),
                        property: m.property.clone(),
                        required: m.required,
                        default: m.default.clone(),
                        encode: m.encode,
                    },
                )
            })
            .collect();

        let segments = parse_segments(template)?;
        for segment in &segments {
            if let Segment::Slot { variable, .. } = segment {
                if !mappings.contains_key(variable) {
                    return Err(LinkedDataError::InvalidConfiguration(format!(
                        "url template variable '{variable}' has no mapping"
                    )));
                }
            }
        }

        Ok(Self {
            template: template.to_string(),
            segments,
            mappings,
        })
    }

    /// Returns the template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns true if the template has a slot for `variable`.
    #[must_use]
    pub fn has_variable(&self, variable: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Slot { variable: v, .. } if v == variable))
    }

    /// Returns the mapping of `variable`, if declared.
    #[must_use]
    pub fn mapping(&self, variable: &str) -> Option<&IriTemplateMapping> {
        self.mappings.get(variable)
    }

    /// Substitutes `bindings` into the template.
    ///
    /// Unbound variables fall back to their mapping default. Optional
    /// (`{?var}`) slots and non-required variables expand to nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidRequest`] if a required variable
    /// has neither a binding nor a default.
    pub fn expand(&self, bindings: &IndexMap<String, String>) -> Result<String> {
        let mut url = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => url.push_str(text),
                Segment::Slot { variable, optional } => {
                    let Some(mapping) = self.mappings.get(variable) else {
                        continue;
                    };
                    let value = bindings
                        .get(variable)
                        .map(String::as_str)
                        .or(mapping.default.as_deref());
                    match value {
                        Some(value) if mapping.encode => url.push_str(&urlencoding::encode(value)),
                        Some(value) => url.push_str(value),
                        None if mapping.required && !optional => {
                            return Err(LinkedDataError::InvalidRequest(format!(
                                "required url variable '{variable}' is not bound"
                            )));
                        },
                        None => {},
                    }
                },
            }
        }
        Ok(url)
    }
}

fn parse_segments(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_string()));
        }
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            LinkedDataError::InvalidConfiguration(format!(
                "unterminated variable in url template '{template}'"
            ))
        })?;
        let expr = after[..close].trim();
        let (variable, optional) = match expr.strip_prefix('?') {
            Some(name) => (name.trim(), true),
            None => (expr, false),
        };
        if variable.is_empty() {
            return Err(LinkedDataError::InvalidConfiguration(format!(
                "empty variable in url template '{template}'"
            )));
        }
        segments.push(Segment::Slot {
            variable: variable.to_string(),
            optional,
        });
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(value: serde_json::Value) -> Result<IriTemplate> {
        let raw: RawIriTemplate = serde_json::from_value(value).expect("raw template");
        IriTemplate::from_raw(&raw)
    }

    fn bindings(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn search_template() -> IriTemplate {
        template(json!({
            "template": "http://localhost/search?q={query}&sub={?subauth}&max={maxRecords}",
            "variableRepresentation": "BasicRepresentation",
            "mapping": [
                { "variable": "query", "required": true, "encode": true },
                { "variable": "subauth", "required": false },
                { "variable": "maxRecords", "required": false, "default": "20" }
            ]
        }))
        .expect("valid template")
    }

    #[test]
    fn test_expand_with_defaults_and_encoding() {
        let url = search_template()
            .expand(&bindings(&[("query", "mark twain")]))
            .unwrap();
        assert_eq!(url, "http://localhost/search?q=mark%20twain&sub=&max=20");
    }

    #[test]
    fn test_expand_binding_overrides_default() {
        let url = search_template()
            .expand(&bindings(&[
                ("query", "cornell"),
                ("subauth", "person"),
                ("maxRecords", "4"),
            ]))
            .unwrap();
        assert_eq!(url, "http://localhost/search?q=cornell&sub=person&max=4");
    }

    #[test]
    fn test_missing_required_variable_is_request_error() {
        let err = search_template().expand(&IndexMap::new()).unwrap_err();
        assert!(matches!(err, LinkedDataError::InvalidRequest(_)));
    }

    #[test]
    fn test_missing_template_is_configuration_error() {
        let err = template(json!({ "mapping": [] })).unwrap_err();
        assert!(matches!(err, LinkedDataError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_slot_without_mapping_is_configuration_error() {
        let err = template(json!({ "template": "http://x/{id}", "mapping": [] })).unwrap_err();
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn test_unterminated_slot_is_configuration_error() {
        let err = template(json!({ "template": "http://x/{id", "mapping": [] })).unwrap_err();
        assert!(matches!(err, LinkedDataError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_has_variable() {
        let t = search_template();
        assert!(t.has_variable("query"));
        assert!(t.has_variable("subauth"));
        assert!(!t.has_variable("term_id"));
        assert_eq!(t.mapping("maxRecords").and_then(|m| m.default.as_deref()), Some("20"));
    }
}
