//! Tree builder: assembles entities and descent relations into strict trees.

use tracing::{debug, instrument, trace};

use crate::domain::arena::{Forest, NodeId};
use crate::domain::entities::{Entity, Relation, RelationKind, UnknownRelationPolicy};
use crate::domain::error::{DomainError, DomainResult};

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs a forest of strict trees from a flat entity list.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    policy: UnknownRelationPolicy,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnknownRelationPolicy) -> Self {
        Self { policy }
    }

    /// Inserts one node per entity, applies every descent relation in input
    /// order and returns the forest roots in entity order.
    ///
    /// Pairing relations are left for the partner linker.
    #[instrument(level = "debug", skip_all, fields(entities = entities.len(), relations = relations.len()))]
    pub fn build_trees(
        &self,
        forest: &mut Forest,
        entities: &[Entity],
        relations: &[Relation],
    ) -> TreeResult<Vec<NodeId>> {
        for entity in entities {
            forest.insert_node(entity.clone())?;
        }

        self.process_descent_relations(forest, relations)?;

        let roots = forest.roots();
        debug!("built {} trees from {} nodes", roots.len(), forest.node_count());
        Ok(roots)
    }

    fn process_descent_relations(&self, forest: &mut Forest, relations: &[Relation]) -> TreeResult<()> {
        for relation in relations {
            match relation.kind {
                RelationKind::Descent => attach_descent(forest, relation)?,
                RelationKind::Pairing => {}
                RelationKind::Unrecognized => match self.policy {
                    UnknownRelationPolicy::Ignore => {
                        trace!("ignoring unrecognized relation {} -> {}", relation.from, relation.to);
                    }
                    UnknownRelationPolicy::Reject => {
                        return Err(DomainError::UnsupportedRelation {
                            from: relation.from.clone(),
                            to: relation.to.clone(),
                        });
                    }
                },
            }
        }
        Ok(())
    }
}

/// Resolves both endpoints of a relation.
pub fn find_related(forest: &Forest, relation: &Relation) -> DomainResult<(NodeId, NodeId)> {
    let from = forest.resolve(&relation.from)?;
    let to = forest.resolve(&relation.to)?;
    Ok((from, to))
}

/// Attaches `relation.from` (child) under `relation.to` (parent).
fn attach_descent(forest: &mut Forest, relation: &Relation) -> TreeResult<()> {
    let (child, parent) = find_related(forest, relation)?;

    if let Some(existing) = forest[child].parent {
        return Err(DomainError::MultipleParents {
            child: relation.from.clone(),
            existing: forest[existing].entity.id.clone(),
            parent: relation.to.clone(),
        });
    }

    if parent == child || forest.has_ancestor(parent, child) {
        return Err(DomainError::CyclicRelation {
            child: relation.from.clone(),
            parent: relation.to.clone(),
        });
    }

    trace!("attaching {} under {}", relation.from, relation.to);
    forest.attach_child(parent, child);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(names: &[&str]) -> Vec<Entity> {
        names.iter().map(|name| Entity::named(name)).collect()
    }

    #[test]
    fn given_child_parent_relation_when_building_then_single_tree() {
        let mut forest = Forest::new();

        let roots = TreeBuilder::new()
            .build_trees(&mut forest, &entities(&["a", "b"]), &[Relation::descent("b", "a")])
            .unwrap();

        assert_eq!(roots.len(), 1);
        assert_eq!(forest[roots[0]].name(), "a");
        let children = &forest[roots[0]].children;
        assert_eq!(children.len(), 1);
        assert_eq!(forest[children[0]].name(), "b");
    }

    #[test]
    fn given_self_descent_when_building_then_cyclic() {
        let mut forest = Forest::new();

        let result =
            TreeBuilder::new().build_trees(&mut forest, &entities(&["a"]), &[Relation::descent("a", "a")]);

        assert!(matches!(result, Err(DomainError::CyclicRelation { .. })));
    }

    #[test]
    fn given_unknown_parent_when_building_then_unknown_entity() {
        let mut forest = Forest::new();

        let result =
            TreeBuilder::new().build_trees(&mut forest, &entities(&["a"]), &[Relation::descent("a", "ghost")]);

        assert_eq!(result, Err(DomainError::UnknownEntity("ghost".into())));
    }

    #[test]
    fn given_unrecognized_kind_when_rejecting_then_unsupported_relation() {
        let mut forest = Forest::new();
        let relations = [Relation::new(RelationKind::Unrecognized, "a", "b")];

        let result = TreeBuilder::with_policy(UnknownRelationPolicy::Reject).build_trees(
            &mut forest,
            &entities(&["a", "b"]),
            &relations,
        );

        assert!(matches!(result, Err(DomainError::UnsupportedRelation { .. })));
    }

    #[test]
    fn given_unrecognized_kind_when_ignoring_then_builds() {
        let mut forest = Forest::new();
        let relations = [Relation::new(RelationKind::Unrecognized, "a", "b")];

        let roots = TreeBuilder::new()
            .build_trees(&mut forest, &entities(&["a", "b"]), &relations)
            .unwrap();

        assert_eq!(roots.len(), 2);
    }
}
