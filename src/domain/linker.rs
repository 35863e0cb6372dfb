//! Group assembly, partner linking and root extraction.

use std::cmp::Ordering;

use tracing::{debug, instrument, trace};

use crate::domain::arena::{Forest, GroupId, LinkId, NodeId};
use crate::domain::builder::find_related;
use crate::domain::entities::{Relation, RelationKind};
use crate::domain::error::{DomainError, DomainResult};

/// Wraps every tree root into its own group, in the given order.
#[instrument(level = "debug", skip_all, fields(trees = roots.len()))]
pub fn wrap_as_groups(forest: &mut Forest, roots: &[NodeId]) -> DomainResult<Vec<GroupId>> {
    roots.iter().map(|&root| forest.create_group(root)).collect()
}

/// Which group links to which, and how far down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPlan {
    /// Endpoint whose group originates the link
    pub origin: NodeId,
    /// Endpoint whose group receives the link
    pub target: NodeId,
    pub vertical_offset: usize,
}

/// Direction policy for a pairing between `from` and `to`.
///
/// The deeper endpoint links to the shallower one. At equal depth the taller
/// root tree links to the shorter, and `from` wins a height tie. Tree height
/// counts descent only, so partners recorded by earlier pairings do not
/// change the direction of later ones.
pub fn plan_link(forest: &Forest, from: NodeId, to: NodeId) -> LinkPlan {
    let from_depth = forest.depth(from);
    let to_depth = forest.depth(to);

    match from_depth.cmp(&to_depth) {
        Ordering::Greater => LinkPlan {
            origin: from,
            target: to,
            vertical_offset: from_depth - to_depth,
        },
        Ordering::Less => LinkPlan {
            origin: to,
            target: from,
            vertical_offset: to_depth - from_depth,
        },
        Ordering::Equal => {
            if forest.tree_height(from) >= forest.tree_height(to) {
                LinkPlan {
                    origin: from,
                    target: to,
                    vertical_offset: 0,
                }
            } else {
                LinkPlan {
                    origin: to,
                    target: from,
                    vertical_offset: 0,
                }
            }
        }
    }
}

/// Applies every pairing relation in input order, linking the groups of its
/// endpoints. Groups must already exist for both endpoints.
#[instrument(level = "debug", skip_all, fields(relations = relations.len()))]
pub fn link_partners(forest: &mut Forest, relations: &[Relation]) -> DomainResult<Vec<LinkId>> {
    let mut links = Vec::new();
    for relation in relations.iter().filter(|r| r.kind == RelationKind::Pairing) {
        links.push(link_pair(forest, relation)?);
    }
    debug!("linked {} pairings", links.len());
    Ok(links)
}

fn link_pair(forest: &mut Forest, relation: &Relation) -> DomainResult<LinkId> {
    let (from, to) = find_related(forest, relation)?;

    if from == to || forest.has_ancestor(from, to) || forest.has_ancestor(to, from) {
        return Err(DomainError::SameLineage {
            from: relation.from.clone(),
            to: relation.to.clone(),
        });
    }

    let (Some(from_group), Some(to_group)) = (forest.group_of(from), forest.group_of(to)) else {
        return Err(DomainError::UngroupedEntity {
            from: relation.from.clone(),
            to: relation.to.clone(),
        });
    };

    let plan = plan_link(forest, from, to);
    let (origin, target) = if plan.origin == from {
        (from_group, to_group)
    } else {
        (to_group, from_group)
    };

    if !forest.set_partner(plan.origin, plan.target) {
        trace!("{} already has a partner, keeping it", forest[plan.origin].entity.id);
    }

    trace!(
        "link {} -> {} (+{})",
        forest[plan.origin].entity.id,
        forest[plan.target].entity.id,
        plan.vertical_offset
    );
    Ok(forest.add_link(origin, target, plan.vertical_offset))
}

/// Groups without incoming links.
///
/// Fails when groups exist but every one of them has an incoming link.
pub fn extract_roots(forest: &Forest, groups: &[GroupId]) -> DomainResult<Vec<GroupId>> {
    let roots: Vec<GroupId> = groups
        .iter()
        .copied()
        .filter(|&group| !forest[group].has_parent())
        .collect();

    if roots.is_empty() && !groups.is_empty() {
        return Err(DomainError::FullCycle {
            groups: groups.len(),
        });
    }
    Ok(roots)
}
