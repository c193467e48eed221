//! Concept data model in the shape served by the terminology browser API.
//!
//! Everything here is filled in by whoever fetches the concept; the renderer
//! only reads it. Fields the API sometimes omits default to empty values so a
//! sparse payload still renders.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// Concept id of the subsumption relationship type (`116680003 |Is a|`).
pub const IS_A: &str = "116680003";

/// Language whose fully specified names never defer to a localized synonym.
pub const ENGLISH: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefinitionStatus {
    Primitive,
    /// Anything the API does not mark as primitive is drawn as defined.
    #[default]
    #[serde(other)]
    FullyDefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DescriptionType {
    Fsn,
    Synonym,
    TextDefinition,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Acceptability {
    Preferred,
    Acceptable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacteristicType {
    StatedRelationship,
    InferredRelationship,
    AdditionalRelationship,
    #[serde(other)]
    Other,
}

/// A bare term as it appears in the `fsn` / `pt` shortcuts of a concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    #[serde(default)]
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub term: String,
    #[serde(default)]
    pub lang: String,
    #[serde(rename = "type")]
    pub kind: DescriptionType,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Dialect reference set id to acceptability.
    #[serde(default)]
    pub acceptability_map: BTreeMap<String, Acceptability>,
}

impl Description {
    pub fn is_preferred_somewhere(&self) -> bool {
        self.acceptability_map
            .values()
            .any(|acceptability| *acceptability == Acceptability::Preferred)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcreteValue {
    #[serde(default)]
    pub data_type: String,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
}

impl ConcreteValue {
    pub fn is_string(&self) -> bool {
        self.data_type.eq_ignore_ascii_case("STRING")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "type")]
    pub kind: Concept,
    #[serde(default)]
    pub target: Option<Concept>,
    #[serde(default)]
    pub destination: Option<Concept>,
    #[serde(default)]
    pub group_id: u32,
    #[serde(default)]
    pub concrete_value: Option<ConcreteValue>,
    #[serde(default)]
    pub characteristic_type: Option<CharacteristicType>,
}

impl Relationship {
    /// The object concept of the relationship.
    ///
    /// The API fills either `target` or `destination`; `target` wins when both
    /// are present.
    pub fn object(&self) -> Option<&Concept> {
        self.target.as_ref().or(self.destination.as_ref())
    }

    /// Concept id of the object, or an empty string when neither field is set.
    pub fn object_id(&self) -> &str {
        self.object()
            .map(|concept| concept.concept_id.as_str())
            .unwrap_or_default()
    }

    pub fn is_a(&self) -> bool {
        self.kind.concept_id == IS_A
    }

    pub fn is_grouped(&self) -> bool {
        self.group_id != 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axiom {
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub concept_id: String,
    #[serde(default)]
    pub fsn: Option<Term>,
    #[serde(default)]
    pub pt: Option<Term>,
    #[serde(default)]
    pub definition_status: DefinitionStatus,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub stated_relationships: Vec<Relationship>,
    #[serde(default)]
    pub class_axioms: Vec<Axiom>,
    #[serde(default)]
    pub gci_axioms: Vec<Axiom>,
}

impl Concept {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_primitive(&self) -> bool {
        self.definition_status == DefinitionStatus::Primitive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Stated,
    #[default]
    Inferred,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Stated => "stated",
            View::Inferred => "inferred",
        }
    }
}

/// Per-render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DiagramOptions {
    #[serde(default = "default_language", alias = "defaultLanguage")]
    pub default_language: String,
    #[serde(default, alias = "selectedView")]
    pub view: View,
    /// Upstream branch context; the renderer ignores it.
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            view: View::default(),
            edition: None,
            release: None,
        }
    }
}

impl DiagramOptions {
    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }
}

/// One row of a reference set members page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefsetMember {
    pub referenced_component_id: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub additional_fields: BTreeMap<String, String>,
}

impl RefsetMember {
    /// Members flagged as not requiring grouping: the `grouped` field must be
    /// present and anything other than `"1"`.
    pub fn is_ungrouped(&self) -> bool {
        self.additional_fields
            .get("grouped")
            .is_some_and(|grouped| grouped != "1")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberPage {
    #[serde(default)]
    pub items: Vec<RefsetMember>,
}

/// Attribute types known to be administratively ungrouped.
///
/// An ungrouped (`groupId == 0`) attribute whose type is listed here is drawn
/// without its own self-group circle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UngroupedAttributeIndex {
    ids: BTreeSet<String>,
}

impl UngroupedAttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members<'m>(members: impl IntoIterator<Item = &'m RefsetMember>) -> Self {
        members
            .into_iter()
            .filter(|member| member.is_ungrouped())
            .map(|member| member.referenced_component_id.clone())
            .collect()
    }

    pub fn from_members_json(json: &str) -> Result<Self, serde_json::Error> {
        let page: MemberPage = serde_json::from_str(json)?;
        Ok(Self::from_members(&page.items))
    }

    pub fn contains(&self, concept_id: &str) -> bool {
        self.ids.contains(concept_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UngroupedAttributeIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_active() -> bool {
    true
}

fn default_language() -> String {
    ENGLISH.to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Literal {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
    }

    Ok(match Literal::deserialize(deserializer)? {
        Literal::Text(text) => text,
        Literal::Number(number) => number.to_string(),
        Literal::Flag(flag) => flag.to_string(),
    })
}
