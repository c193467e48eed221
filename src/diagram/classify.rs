//! Splits a concept's definition into subsumption and attribute edges for
//! the selected view.

use crate::model::{Axiom, Concept, Relationship, View};

/// Active edges of one view, each list in encounter order.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedEdges<'c> {
    pub isa: Vec<&'c Relationship>,
    pub attributes: Vec<&'c Relationship>,
}

impl<'c> ClassifiedEdges<'c> {
    pub fn is_empty(&self) -> bool {
        self.isa.is_empty() && self.attributes.is_empty()
    }

    /// Attributes outside any role group (`groupId == 0`).
    pub fn ungrouped(&self) -> impl Iterator<Item = &'c Relationship> + '_ {
        self.attributes.iter().copied().filter(|rel| !rel.is_grouped())
    }

    /// Distinct non-zero group ids, ascending.
    pub fn group_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = Vec::new();
        for rel in self.attributes.iter().filter(|rel| rel.is_grouped()) {
            if !ids.contains(&rel.group_id) {
                ids.push(rel.group_id);
            }
        }
        ids.sort_unstable();
        ids
    }

    /// Members of one role group in encounter order.
    pub fn group(&self, group_id: u32) -> impl Iterator<Item = &'c Relationship> + '_ {
        self.attributes
            .iter()
            .copied()
            .filter(move |rel| rel.group_id == group_id)
    }

    fn push(&mut self, rel: &'c Relationship) {
        if !rel.active {
            return;
        }
        if rel.is_a() {
            self.isa.push(rel);
        } else {
            self.attributes.push(rel);
        }
    }

    fn extend(&mut self, rels: &'c [Relationship]) {
        for rel in rels {
            self.push(rel);
        }
    }

    fn extend_axioms(&mut self, axioms: &'c [Axiom]) {
        for axiom in axioms.iter().filter(|axiom| axiom.active) {
            self.extend(&axiom.relationships);
        }
    }
}

/// Classifies the edges drawn for `view`.
///
/// The inferred view reads the concept's relationships. The stated view reads
/// stated relationships, then class axioms, then GCI axioms, all merged into
/// the same two lists; GCI-origin edges are not drawn differently.
pub fn classify(concept: &Concept, view: View) -> ClassifiedEdges<'_> {
    let mut edges = ClassifiedEdges::default();
    match view {
        View::Inferred => edges.extend(&concept.relationships),
        View::Stated => {
            edges.extend(&concept.stated_relationships);
            edges.extend_axioms(&concept.class_axioms);
            edges.extend_axioms(&concept.gci_axioms);
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::IS_A;

    fn concept(id: &str) -> Concept {
        Concept {
            concept_id: id.to_string(),
            ..Concept::default()
        }
    }

    fn rel(kind: &str, target: &str, group_id: u32) -> Relationship {
        Relationship {
            active: true,
            kind: concept(kind),
            target: Some(concept(target)),
            destination: None,
            group_id,
            concrete_value: None,
            characteristic_type: None,
        }
    }

    fn axiom(active: bool, relationships: Vec<Relationship>) -> Axiom {
        Axiom {
            active,
            relationships,
        }
    }

    #[test]
    fn inferred_view_splits_on_the_is_a_type() {
        let mut inactive = rel(IS_A, "retired", 0);
        inactive.active = false;
        let fracture = Concept {
            relationships: vec![
                rel(IS_A, "46866001", 0),
                rel("116676008", "72704001", 1),
                inactive,
                rel(IS_A, "7523003", 0),
            ],
            stated_relationships: vec![rel(IS_A, "stated-only", 0)],
            ..concept("71620000")
        };

        let edges = classify(&fracture, View::Inferred);

        let isa: Vec<&str> = edges.isa.iter().map(|r| r.object_id()).collect();
        assert_eq!(isa, ["46866001", "7523003"]);
        assert_eq!(edges.attributes.len(), 1);
    }

    #[test]
    fn stated_view_merges_axioms_in_fixed_order() {
        let subject = Concept {
            relationships: vec![rel(IS_A, "inferred-only", 0)],
            stated_relationships: vec![rel(IS_A, "stated", 0)],
            class_axioms: vec![
                axiom(true, vec![rel(IS_A, "class", 0), rel("363698007", "site", 1)]),
                axiom(false, vec![rel(IS_A, "retired-axiom", 0)]),
            ],
            gci_axioms: vec![axiom(true, vec![rel(IS_A, "gci", 0)])],
            ..concept("404684003")
        };

        let edges = classify(&subject, View::Stated);

        let isa: Vec<&str> = edges.isa.iter().map(|r| r.object_id()).collect();
        assert_eq!(isa, ["stated", "class", "gci"]);
        assert_eq!(edges.attributes[0].object_id(), "site");
    }

    #[test]
    fn concept_without_relationships_yields_empty_lists() {
        let bare = concept("138875005");
        assert!(classify(&bare, View::Inferred).is_empty());
        assert!(classify(&bare, View::Stated).is_empty());
    }

    #[test]
    fn ungrouped_and_group_members_keep_encounter_order() {
        let subject = Concept {
            relationships: vec![
                rel("a", "1", 2),
                rel("b", "2", 0),
                rel("c", "3", 2),
                rel("d", "4", 0),
            ],
            ..concept("x")
        };
        let edges = classify(&subject, View::Inferred);

        let ungrouped: Vec<&str> = edges.ungrouped().map(|r| r.kind.concept_id.as_str()).collect();
        let group: Vec<&str> = edges.group(2).map(|r| r.kind.concept_id.as_str()).collect();
        assert_eq!(ungrouped, ["b", "d"]);
        assert_eq!(group, ["a", "c"]);
    }

    #[test]
    fn group_ids_are_ascending() {
        let subject = Concept {
            relationships: vec![
                rel("a", "1", 3),
                rel("b", "2", 1),
                rel("c", "3", 2),
                rel("d", "4", 3),
            ],
            ..concept("x")
        };
        assert_eq!(classify(&subject, View::Inferred).group_ids(), [1, 2, 3]);
    }

    proptest! {
        #[test]
        fn group_ids_sorted_and_distinct(groups in prop::collection::vec(0u32..12, 0..24)) {
            let subject = Concept {
                relationships: groups.iter().map(|g| rel("246075003", "t", *g)).collect(),
                ..concept("x")
            };
            let ids = classify(&subject, View::Inferred).group_ids();

            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(!ids.contains(&0));
            for g in groups.iter().filter(|g| **g != 0) {
                prop_assert!(ids.contains(g));
            }
        }
    }
}
