//! Tests for TreeBuilder

use std::collections::HashSet;

use proptest::prelude::*;

use kinforest::domain::{
    DomainError, EntityId, Forest, Relation, RelationKind, TreeBuilder, UnknownRelationPolicy,
};
use kinforest::util::testing::{entities, init_test_setup};

#[test]
fn given_child_parent_relation_when_building_then_child_hangs_below_parent() {
    // Arrange
    init_test_setup();
    let mut forest = Forest::new();

    // Act
    let roots = TreeBuilder::new()
        .build_trees(
            &mut forest,
            &entities(&["child", "parent"]),
            &[Relation::descent("child", "parent")],
        )
        .unwrap();

    // Assert
    assert_eq!(roots.len(), 1);
    let root = &forest[roots[0]];
    assert_eq!(root.name(), "parent");
    assert_eq!(root.children.len(), 1);
    assert_eq!(forest[root.children[0]].name(), "child");
}

#[test]
fn given_unrelated_entities_when_building_then_one_tree_each_in_entity_order() {
    // Arrange
    let mut forest = Forest::new();

    // Act
    let roots = TreeBuilder::new()
        .build_trees(&mut forest, &entities(&["c", "a", "b"]), &[])
        .unwrap();

    // Assert
    let names: Vec<&str> = roots.iter().map(|&r| forest[r].name()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn given_second_parent_when_building_then_multiple_parents_error() {
    // Arrange
    let mut forest = Forest::new();
    let relations = [Relation::descent("b", "a"), Relation::descent("b", "c")];

    // Act
    let result = TreeBuilder::new().build_trees(&mut forest, &entities(&["a", "b", "c"]), &relations);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::MultipleParents {
            child: EntityId::from("b"),
            existing: EntityId::from("a"),
            parent: EntityId::from("c"),
        }
    );
}

#[test]
fn given_mutual_descent_when_building_then_cyclic_error() {
    // Arrange
    let mut forest = Forest::new();
    let relations = [Relation::descent("b", "a"), Relation::descent("a", "b")];

    // Act
    let result = TreeBuilder::new().build_trees(&mut forest, &entities(&["a", "b"]), &relations);

    // Assert
    assert!(matches!(result, Err(DomainError::CyclicRelation { .. })));
}

#[test]
fn given_relation_to_missing_entity_when_building_then_unknown_entity() {
    // Arrange
    let mut forest = Forest::new();

    // Act
    let result = TreeBuilder::new().build_trees(
        &mut forest,
        &entities(&["a"]),
        &[Relation::descent("a", "ghost")],
    );

    // Assert
    assert_eq!(result.unwrap_err(), DomainError::UnknownEntity(EntityId::from("ghost")));
}

#[test]
fn given_duplicate_entity_when_building_then_duplicate_error() {
    let mut forest = Forest::new();

    let result = TreeBuilder::new().build_trees(&mut forest, &entities(&["a", "a"]), &[]);

    assert_eq!(result.unwrap_err(), DomainError::DuplicateEntity(EntityId::from("a")));
}

#[test]
fn given_pairings_when_building_then_they_do_not_shape_trees() {
    let mut forest = Forest::new();

    let roots = TreeBuilder::new()
        .build_trees(&mut forest, &entities(&["a", "b"]), &[Relation::pairing("a", "b")])
        .unwrap();

    assert_eq!(roots.len(), 2);
    assert!(forest[roots[0]].partner.is_none());
}

#[test]
fn given_unrecognized_relation_when_rejecting_then_unsupported_error() {
    // Arrange
    let mut forest = Forest::new();
    let relations = [Relation::new(RelationKind::Unrecognized, "a", "b")];

    // Act
    let ignored = TreeBuilder::new().build_trees(&mut Forest::new(), &entities(&["a", "b"]), &relations);
    let rejected = TreeBuilder::with_policy(UnknownRelationPolicy::Reject).build_trees(
        &mut forest,
        &entities(&["a", "b"]),
        &relations,
    );

    // Assert
    assert_eq!(ignored.unwrap().len(), 2);
    assert!(matches!(rejected, Err(DomainError::UnsupportedRelation { .. })));
}

fn arb_descents() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..12).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..16)))
}

proptest! {
    /// Any descent input either fails with a structural error or yields a
    /// forest where each node has at most one parent, no node is its own
    /// ancestor, and the trees cover every node exactly once.
    #[test]
    fn descent_relations_build_acyclic_forest((n, pairs) in arb_descents()) {
        let names: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let relations: Vec<Relation> = pairs
            .iter()
            .map(|&(child, parent)| Relation::descent(names[child].as_str(), names[parent].as_str()))
            .collect();
        let mut forest = Forest::new();

        match TreeBuilder::new().build_trees(&mut forest, &entities(&name_refs), &relations) {
            Ok(roots) => {
                let mut seen = HashSet::new();
                for &root in &roots {
                    prop_assert!(forest[root].is_root());
                    for (id, node) in forest.iter(root) {
                        prop_assert!(seen.insert(id));
                        prop_assert!(!forest.has_ancestor(id, id));
                        for &child in &node.children {
                            prop_assert_eq!(forest[child].parent, Some(id));
                        }
                    }
                }
                prop_assert_eq!(seen.len(), n);
            }
            Err(e) => prop_assert!(matches!(
                e,
                DomainError::MultipleParents { .. } | DomainError::CyclicRelation { .. }
            ), "unexpected error: {:?}", e),
        }
    }
}
