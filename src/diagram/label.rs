//! Box labels: display terms for concepts and literal formatting for
//! concrete values.

use std::collections::HashMap;

use crate::model::{Concept, ConcreteValue, DescriptionType, ENGLISH};

/// Placeholder for a relationship end the API did not resolve.
pub const UNKNOWN_TERM: &str = "Unknown";

/// Resolves the term a concept is displayed with in `language`.
///
/// A localized preferred synonym is only used when a non-English language is
/// requested and the fully specified name is not already in that language.
/// Otherwise the order is FSN, preferred term, then the bare concept id.
pub fn display_term(concept: &Concept, language: &str) -> String {
    let fsn_lang = concept.fsn.as_ref().map(|fsn| fsn.lang.as_str());
    if language != ENGLISH && fsn_lang != Some(language) {
        if let Some(term) = localized_synonym(concept, language) {
            return term.to_string();
        }
    }

    if let Some(fsn) = &concept.fsn {
        fsn.term.clone()
    } else if let Some(pt) = &concept.pt {
        pt.term.clone()
    } else {
        concept.concept_id.clone()
    }
}

fn localized_synonym<'c>(concept: &'c Concept, language: &str) -> Option<&'c str> {
    let from_descriptions = concept
        .descriptions
        .iter()
        .find(|d| {
            d.active
                && d.kind == DescriptionType::Synonym
                && d.lang == language
                && d.is_preferred_somewhere()
        })
        .map(|d| d.term.as_str());

    // Concepts nested in relationships usually come without descriptions but
    // with a `pt` already resolved for the requested language.
    from_descriptions.or_else(|| {
        concept
            .pt
            .as_ref()
            .filter(|pt| pt.lang == language)
            .map(|pt| pt.term.as_str())
    })
}

/// `"text"` for string literals, `#value` for everything numeric.
pub fn format_concrete_value(value: &ConcreteValue) -> String {
    if value.is_string() {
        format!("\"{}\"", value.value)
    } else {
        format!("#{}", value.value)
    }
}

/// Display terms resolved once per render and reused by every box that
/// shows the same concept.
#[derive(Debug)]
pub struct LabelCache<'o> {
    language: &'o str,
    terms: HashMap<String, String>,
}

impl<'o> LabelCache<'o> {
    pub fn new(language: &'o str) -> Self {
        Self {
            language,
            terms: HashMap::new(),
        }
    }

    pub fn term(&mut self, concept: Option<&Concept>) -> String {
        let Some(concept) = concept else {
            return UNKNOWN_TERM.to_string();
        };
        if let Some(term) = self.terms.get(&concept.concept_id) {
            return term.clone();
        }
        let term = display_term(concept, self.language);
        self.terms.insert(concept.concept_id.clone(), term.clone());
        term
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;
    use crate::model::{Acceptability, Description, Term};

    fn term(text: &str, lang: &str) -> Option<Term> {
        Some(Term {
            term: text.to_string(),
            lang: lang.to_string(),
        })
    }

    fn synonym(text: &str, lang: &str, acceptability: Acceptability, active: bool) -> Description {
        Description {
            term: text.to_string(),
            lang: lang.to_string(),
            kind: DescriptionType::Synonym,
            active,
            acceptability_map: BTreeMap::from([("450828004".to_string(), acceptability)]),
        }
    }

    fn appendicitis() -> Concept {
        Concept {
            concept_id: "74400008".into(),
            fsn: term("Appendicitis (disorder)", "en"),
            pt: term("Appendicitis", "en"),
            descriptions: vec![
                synonym("Apendicitis aguda", "es", Acceptability::Acceptable, true),
                synonym("Apendicitis vieja", "es", Acceptability::Preferred, false),
                synonym("Apendicitis", "es", Acceptability::Preferred, true),
                synonym("Inflamacion apendicular", "es", Acceptability::Preferred, true),
            ],
            ..Concept::default()
        }
    }

    #[test]
    fn english_always_uses_the_fsn() {
        assert_eq!(display_term(&appendicitis(), "en"), "Appendicitis (disorder)");
    }

    #[test]
    fn first_active_preferred_synonym_wins_for_other_languages() {
        assert_eq!(display_term(&appendicitis(), "es"), "Apendicitis");
    }

    #[test]
    fn fsn_already_in_requested_language_is_kept() {
        let mut concept = appendicitis();
        concept.fsn = term("Apendicitis (trastorno)", "es");
        assert_eq!(display_term(&concept, "es"), "Apendicitis (trastorno)");
    }

    #[test]
    fn language_without_synonyms_falls_back_to_fsn() {
        assert_eq!(display_term(&appendicitis(), "sv"), "Appendicitis (disorder)");
    }

    #[test]
    fn fallback_chain_ends_at_concept_id() {
        let mut concept = appendicitis();
        concept.descriptions.clear();
        concept.fsn = None;
        assert_eq!(display_term(&concept, "en"), "Appendicitis");
        concept.pt = None;
        assert_eq!(display_term(&concept, "en"), "74400008");
    }

    #[test]
    fn nested_concepts_use_a_localized_pt() {
        let concept = Concept {
            concept_id: "66071002".into(),
            fsn: term("Viral hepatitis type B (disorder)", "en"),
            pt: term("Hepatitis viral tipo B", "es"),
            ..Concept::default()
        };
        assert_eq!(display_term(&concept, "es"), "Hepatitis viral tipo B");
        assert_eq!(display_term(&concept, "en"), "Viral hepatitis type B (disorder)");
    }

    #[test]
    fn missing_concept_gets_the_placeholder() {
        let mut cache = LabelCache::new("en");
        assert_eq!(cache.term(None), UNKNOWN_TERM);
    }

    #[test]
    fn cache_returns_the_first_resolution() {
        let mut cache = LabelCache::new("en");
        let concept = appendicitis();
        let first = cache.term(Some(&concept));
        let mut renamed = concept.clone();
        renamed.fsn = term("Renamed", "en");
        assert_eq!(cache.term(Some(&renamed)), first);
    }

    proptest! {
        #[test]
        fn concrete_values_format_stably(value in "[a-z0-9.]{1,12}", data_type in "(STRING|INTEGER|DECIMAL)") {
            let literal = ConcreteValue { data_type: data_type.clone(), value: value.clone() };
            let first = format_concrete_value(&literal);
            prop_assert_eq!(&first, &format_concrete_value(&literal));
            if data_type == "STRING" {
                prop_assert_eq!(first, format!("\"{}\"", value));
            } else {
                prop_assert_eq!(first, format!("#{}", value));
            }
        }
    }

    #[test]
    fn concrete_value_examples() {
        let text = ConcreteValue {
            data_type: "STRING".into(),
            value: "foo".into(),
        };
        let number = ConcreteValue {
            data_type: "INTEGER".into(),
            value: "5".into(),
        };
        assert_eq!(format_concrete_value(&text), "\"foo\"");
        assert_eq!(format_concrete_value(&number), "#5");
    }
}
