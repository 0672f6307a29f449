//! Context maps: extra, independently evaluated values shown beside search results.
//!
//! Each property is an LDPath expression evaluated from a result's subject.
//! Properties may be gathered under labeled groups and flagged as
//! selectable or drillable for the calling user interface.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{LinkedDataError, Result};
use crate::ldpath::LdPath;
use crate::rdf::{RdfGraph, RdfNode};

use super::PrefixMap;

/// Resolves i18n keys to display strings.
pub trait Translator: Send + Sync {
    /// Returns the translation of `key`, if one exists.
    fn translate(&self, key: &str) -> Option<String>;
}

/// A translator without any translations; labels fall back to their defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslations;

impl Translator for NoTranslations {
    fn translate(&self, _key: &str) -> Option<String> {
        None
    }
}

impl Translator for HashMap<String, String> {
    fn translate(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolves a label: translation of the key, else the default, else the key.
fn resolve_label(
    translator: &dyn Translator,
    i18n_key: Option<&str>,
    default: Option<&str>,
) -> String {
    i18n_key
        .and_then(|key| translator.translate(key))
        .or_else(|| default.map(str::to_string))
        .or_else(|| i18n_key.map(str::to_string))
        .unwrap_or_default()
}

/// Raw `context` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContextMap {
    /// Group definitions keyed by group id.
    #[serde(default)]
    pub groups: IndexMap<String, RawContextGroup>,
    /// Property definitions in display order.
    #[serde(default)]
    pub properties: Vec<RawContextProperty>,
}

/// Raw group definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContextGroup {
    /// i18n key of the group label.
    #[serde(default)]
    pub group_label_i18n: Option<String>,
    /// Literal group label.
    #[serde(default)]
    pub group_label_default: Option<String>,
}

/// Raw property definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContextProperty {
    /// i18n key of the property label.
    #[serde(default)]
    pub property_label_i18n: Option<String>,
    /// Literal property label.
    #[serde(default)]
    pub property_label_default: Option<String>,
    /// Path expression producing the values.
    pub ldpath: Option<String>,
    /// Whether the values may be selected by the user.
    #[serde(default)]
    pub selectable: bool,
    /// Whether the values may be followed to another search.
    #[serde(default)]
    pub drillable: bool,
    /// Group this property belongs to.
    #[serde(default)]
    pub group_id: Option<String>,
}

/// A labeled group of context properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextGroup {
    id: String,
    label_i18n: Option<String>,
    label_default: Option<String>,
}

impl ContextGroup {
    /// Returns the group id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display label of the group.
    #[must_use]
    pub fn label(&self, translator: &dyn Translator) -> String {
        resolve_label(
            translator,
            self.label_i18n.as_deref(),
            self.label_default.as_deref(),
        )
    }
}

/// One context property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPropertyMap {
    label_i18n: Option<String>,
    label_default: Option<String>,
    ldpath: LdPath,
    selectable: bool,
    drillable: bool,
    group_id: Option<String>,
}

impl ContextPropertyMap {
    /// Returns the display label of the property.
    #[must_use]
    pub fn label(&self, translator: &dyn Translator) -> String {
        resolve_label(
            translator,
            self.label_i18n.as_deref(),
            self.label_default.as_deref(),
        )
    }

    /// Returns the configured path expression.
    #[must_use]
    pub fn ldpath(&self) -> &LdPath {
        &self.ldpath
    }

    /// Whether the values may be selected by the user.
    #[must_use]
    pub const fn selectable(&self) -> bool {
        self.selectable
    }

    /// Whether the values may be followed to another search.
    #[must_use]
    pub const fn drillable(&self) -> bool {
        self.drillable
    }

    /// Returns the group id, if the property is grouped.
    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    /// Evaluates the property from `subject`.
    #[must_use]
    pub fn values(&self, graph: &RdfGraph, subject: &RdfNode) -> Vec<String> {
        self.ldpath.values(graph, subject)
    }
}

/// The context configuration of a search action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMap {
    groups: IndexMap<String, ContextGroup>,
    properties: Vec<ContextPropertyMap>,
}

impl ContextMap {
    /// Validates a raw `context` block.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] when a property has
    /// no ldpath, the ldpath does not parse, or the property names an
    /// undefined group.
    pub fn from_raw(raw: &RawContextMap, prefixes: &PrefixMap) -> Result<Self> {
        let groups: IndexMap<String, ContextGroup> = raw
            .groups
            .iter()
            .map(|(id, g)| {
                (
                    id.clone(),
                    ContextGroup {
                        id: id.clone(),
                        label_i18n: g.group_label_i18n.clone(),
                        label_default: g.group_label_default.clone(),
                    },
                )
            })
            .collect();

        let mut properties = Vec::with_capacity(raw.properties.len());
        for (index, prop) in raw.properties.iter().enumerate() {
            let source = prop.ldpath.as_deref().ok_or_else(|| {
                LinkedDataError::InvalidConfiguration(format!(
                    "context property {index} is missing its ldpath"
                ))
            })?;
            if let Some(group) = prop.group_id.as_deref() {
                if !groups.contains_key(group) {
                    return Err(LinkedDataError::InvalidConfiguration(format!(
                        "context property {index} refers to undefined group '{group}'"
                    )));
                }
            }
            properties.push(ContextPropertyMap {
                label_i18n: prop.property_label_i18n.clone(),
                label_default: prop.property_label_default.clone(),
                ldpath: LdPath::parse(source, prefixes)?,
                selectable: prop.selectable,
                drillable: prop.drillable,
                group_id: prop.group_id.clone(),
            });
        }

        Ok(Self { groups, properties })
    }

    /// Returns the properties in display order.
    #[must_use]
    pub fn properties(&self) -> &[ContextPropertyMap] {
        &self.properties
    }

    /// Returns a group by id.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&ContextGroup> {
        self.groups.get(id)
    }

    /// Evaluates every property from `subject` into the JSON context list.
    #[must_use]
    pub fn context_for(
        &self,
        graph: &RdfGraph,
        subject: &RdfNode,
        translator: &dyn Translator,
    ) -> Vec<Value> {
        self.properties
            .iter()
            .map(|prop| {
                let mut entry = json!({
                    "property": prop.label(translator),
                    "values": prop.values(graph, subject),
                    "selectable": prop.selectable,
                    "drillable": prop.drillable,
                });
                if let Some(group) = prop.group_id().and_then(|id| self.group(id)) {
                    entry["group"] = Value::String(group.label(translator));
                }
                entry
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::properties;

    fn raw() -> RawContextMap {
        serde_json::from_value(json!({
            "groups": {
                "hierarchy": { "group_label_i18n": "qa.context.hierarchy", "group_label_default": "Hierarchy" }
            },
            "properties": [
                {
                    "property_label_i18n": "qa.context.broader",
                    "property_label_default": "Broader",
                    "ldpath": "skos:broader / skos:prefLabel",
                    "selectable": true,
                    "group_id": "hierarchy"
                },
                {
                    "property_label_i18n": "qa.context.alt",
                    "ldpath": "skos:altLabel",
                    "drillable": true
                }
            ]
        }))
        .expect("raw context")
    }

    fn graph() -> RdfGraph {
        let mut g = RdfGraph::new();
        let cow = RdfNode::uri("http://example.org/cow");
        let animal = RdfNode::uri("http://example.org/animal");
        g.add(cow.clone(), properties::BROADER, animal.clone());
        g.add(cow, properties::ALT_LABEL, RdfNode::literal("cattle"));
        g.add(animal, properties::PREF_LABEL, RdfNode::literal("Animal"));
        g
    }

    #[test]
    fn test_labels_fall_back_to_default_then_key() {
        let map = ContextMap::from_raw(&raw(), &PrefixMap::default()).unwrap();
        assert_eq!(map.properties()[0].label(&NoTranslations), "Broader");
        assert_eq!(map.properties()[1].label(&NoTranslations), "qa.context.alt");

        let mut translations = HashMap::new();
        translations.insert("qa.context.broader".to_string(), "Oberbegriff".to_string());
        assert_eq!(map.properties()[0].label(&translations), "Oberbegriff");
    }

    #[test]
    fn test_context_for_subject() {
        let map = ContextMap::from_raw(&raw(), &PrefixMap::default()).unwrap();
        let context = map.context_for(
            &graph(),
            &RdfNode::uri("http://example.org/cow"),
            &NoTranslations,
        );
        assert_eq!(context.len(), 2);
        assert_eq!(context[0]["property"], "Broader");
        assert_eq!(context[0]["values"], json!(["Animal"]));
        assert_eq!(context[0]["group"], "Hierarchy");
        assert_eq!(context[0]["selectable"], true);
        assert_eq!(context[1]["values"], json!(["cattle"]));
        assert!(context[1].get("group").is_none());
        assert_eq!(context[1]["drillable"], true);
    }

    #[test]
    fn test_undefined_group_is_rejected() {
        let mut raw = raw();
        raw.properties[1].group_id = Some("missing".into());
        let err = ContextMap::from_raw(&raw, &PrefixMap::default()).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_missing_ldpath_is_rejected() {
        let mut raw = raw();
        raw.properties[0].ldpath = None;
        assert!(ContextMap::from_raw(&raw, &PrefixMap::default()).is_err());
    }
}
