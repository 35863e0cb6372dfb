//! Owned, serializable snapshots of a forest for renderers and output.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::arena::{Forest, GroupId, LinkId, NodeId, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}

impl NodeView {
    pub fn child(&self, name: &str) -> Option<&NodeView> {
        self.children.iter().find(|child| child.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub id: String,
    pub vertical_offset: usize,
    pub target_id: String,
    /// Expanded target; None when the same view already expands it elsewhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Box<GroupView>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerView {
    pub id: String,
    pub right: Vec<LinkView>,
    pub left: Vec<LinkView>,
}

impl LayerView {
    pub fn side(&self, side: Side) -> &[LinkView] {
        match side {
            Side::Right => &self.right,
            Side::Left => &self.left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub id: String,
    pub root: NodeView,
    /// Number of incoming links
    pub incoming: usize,
    pub layers: Vec<LayerView>,
}

impl GroupView {
    /// Name of the root entity.
    pub fn name(&self) -> &str {
        &self.root.name
    }
}

impl Forest {
    pub fn node_view(&self, node: NodeId) -> NodeView {
        let current = &self[node];
        NodeView {
            id: current.entity.id.to_string(),
            name: current.name().to_string(),
            partner: current
                .partner
                .map(|partner| self[partner].entity.id.to_string()),
            children: current
                .children
                .iter()
                .map(|&child| self.node_view(child))
                .collect(),
        }
    }

    /// Group with its layers, links expanded into their target groups.
    ///
    /// Each group is expanded at most once per view; any other link to it
    /// carries only `target_id`.
    pub fn group_view(&self, group: GroupId) -> GroupView {
        self.group_view_once(group, &mut HashSet::new())
    }

    fn group_view_once(&self, group: GroupId, shown: &mut HashSet<GroupId>) -> GroupView {
        shown.insert(group);
        let current = &self[group];
        let layers = current
            .layers
            .iter()
            .map(|layer| LayerView {
                id: layer.id.clone(),
                right: self.link_views(&layer.right_links, shown),
                left: self.link_views(&layer.left_links, shown),
            })
            .collect();

        GroupView {
            id: current.id.clone(),
            root: self.node_view(current.root),
            incoming: current.parent_links.len(),
            layers,
        }
    }

    fn link_views(&self, links: &[LinkId], shown: &mut HashSet<GroupId>) -> Vec<LinkView> {
        links
            .iter()
            .map(|&link| {
                let link = &self[link];
                let target = if shown.contains(&link.to) {
                    None
                } else {
                    Some(Box::new(self.group_view_once(link.to, shown)))
                };
                LinkView {
                    id: link.id.clone(),
                    vertical_offset: link.vertical_offset,
                    target_id: self[link.to].id.clone(),
                    target,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Entity;
    use crate::domain::packer::pack_all;

    #[test]
    fn given_two_links_to_one_group_when_viewing_then_target_expanded_once() {
        let mut forest = Forest::new();
        let a = forest.insert_node(Entity::named("a")).unwrap();
        let b = forest.insert_node(Entity::named("b")).unwrap();
        let ga = forest.create_group(a).unwrap();
        let gb = forest.create_group(b).unwrap();
        forest.add_link(ga, gb, 0);
        forest.add_link(ga, gb, 0);
        pack_all(&mut forest, &[ga, gb]);

        let view = forest.group_view(ga);

        let layer = &view.layers[0];
        assert_eq!(layer.right[0].target.as_ref().map(|t| t.name()), Some("b"));
        assert_eq!(layer.left[0].target, None);
        assert_eq!(layer.left[0].target_id, layer.right[0].target_id);
    }

    #[test]
    fn given_link_cycle_when_viewing_then_back_link_not_expanded() {
        let mut forest = Forest::new();
        let a = forest.insert_node(Entity::named("a")).unwrap();
        let b = forest.insert_node(Entity::named("b")).unwrap();
        let ga = forest.create_group(a).unwrap();
        let gb = forest.create_group(b).unwrap();
        forest.add_link(ga, gb, 0);
        forest.add_link(gb, ga, 0);
        pack_all(&mut forest, &[ga, gb]);

        let view = forest.group_view(ga);

        let inner = view.layers[0].right[0].target.as_ref().unwrap();
        assert_eq!(inner.name(), "b");
        assert_eq!(inner.layers[0].right[0].target, None);
        assert_eq!(inner.layers[0].right[0].target_id, view.id);
    }
}
