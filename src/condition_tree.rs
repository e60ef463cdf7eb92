//! Groups the flat condition list into AND-joined top-level elements, where
//! each run of OR-joined conditions becomes one group.

use crate::representation::{Condition, ConditionRelation};

#[derive(Debug, Clone, PartialEq)]
pub enum RootElement<'a> {
    Single(&'a Condition),
    Group(Vec<&'a Condition>),
}

impl<'a> RootElement<'a> {
    pub fn conditions(&self) -> Vec<&'a Condition> {
        match self {
            RootElement::Single(condition) => vec![*condition],
            RootElement::Group(conditions) => conditions.clone(),
        }
    }
}

/// A condition joined with `Or` pulls the element before it into a group. A
/// leading `Or` has no predecessor and starts its own group.
pub fn build_condition_tree(conditions: &[Condition]) -> Vec<RootElement<'_>> {
    let mut root: Vec<RootElement<'_>> = Vec::new();

    for condition in conditions {
        match condition.condition_relation {
            None | Some(ConditionRelation::And) => root.push(RootElement::Single(condition)),
            Some(ConditionRelation::Or) => match root.pop() {
                Some(RootElement::Single(previous)) => {
                    root.push(RootElement::Group(vec![previous, condition]));
                }
                Some(RootElement::Group(mut group)) => {
                    group.push(condition);
                    root.push(RootElement::Group(group));
                }
                None => root.push(RootElement::Group(vec![condition])),
            },
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::{Datatype, PropertyValueRelation, ReferenceRelation};

    fn conditions(relations: &[Option<ConditionRelation>]) -> Vec<Condition> {
        relations
            .iter()
            .enumerate()
            .map(|(index, relation)| Condition {
                property_id: format!("P{}", index),
                datatype: Datatype::String,
                value: "x".into(),
                property_value_relation: PropertyValueRelation::Matching,
                reference_relation: ReferenceRelation::Regardless,
                subclasses: false,
                negate: false,
                condition_relation: *relation,
            })
            .collect()
    }

    fn shape(root: &[RootElement<'_>]) -> Vec<Vec<String>> {
        root.iter()
            .map(|element| {
                element
                    .conditions()
                    .iter()
                    .map(|c| c.property_id.clone())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_and_only_stays_flat() {
        use ConditionRelation::And;
        let list = conditions(&[None, Some(And), Some(And)]);
        let root = build_condition_tree(&list);
        assert_eq!(root.len(), 3);
        assert!(root.iter().all(|e| matches!(e, RootElement::Single(_))));
    }

    #[test]
    fn test_or_groups_with_predecessor() {
        use ConditionRelation::{And, Or};
        let list = conditions(&[None, Some(Or), Some(And), Some(Or)]);
        let root = build_condition_tree(&list);
        assert_eq!(
            shape(&root),
            vec![vec!["P0", "P1"], vec!["P2", "P3"]]
        );
        assert!(root.iter().all(|e| matches!(e, RootElement::Group(_))));
    }

    #[test]
    fn test_or_chain_grows_tail_group() {
        use ConditionRelation::{And, Or};
        let list = conditions(&[None, Some(And), Some(Or), Some(Or)]);
        let root = build_condition_tree(&list);
        assert!(matches!(root[0], RootElement::Single(_)));
        assert_eq!(shape(&root), vec![vec!["P0"], vec!["P1", "P2", "P3"]]);
    }

    #[test]
    fn test_leading_or_starts_group() {
        use ConditionRelation::Or;
        let list = conditions(&[Some(Or), Some(Or)]);
        let root = build_condition_tree(&list);
        assert_eq!(shape(&root), vec![vec!["P0", "P1"]]);
    }

    #[test]
    fn test_empty_list() {
        assert!(build_condition_tree(&[]).is_empty());
    }
}
