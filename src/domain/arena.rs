use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Entity, EntityId};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::{IdSource, SequentialIds, GROUP_PREFIX, LAYER_PREFIX, LINK_PREFIX};

/// Handle of a [`TreeNode`] in a [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// Handle of a [`TreeGroup`] in a [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(Index);

/// Handle of a [`CrossLink`] in a [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(Index);

/// Tree node wrapping exactly one entity.
#[derive(Debug)]
pub struct TreeNode {
    pub entity: Entity,
    /// Parent node, None for forest roots
    pub parent: Option<NodeId>,
    /// Owned children, in attachment order
    pub children: Vec<NodeId>,
    /// Paired node, set at most once and only on the side that recorded it
    pub partner: Option<NodeId>,
    /// Owning group; only ever set on a root node
    pub group: Option<GroupId>,
}

impl TreeNode {
    pub fn name(&self) -> &str {
        &self.entity.name
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One root tree plus the cross-tree links it originates or receives.
#[derive(Debug)]
pub struct TreeGroup {
    pub id: String,
    pub root: NodeId,
    /// Outgoing links
    pub child_links: Vec<LinkId>,
    /// Incoming links
    pub parent_links: Vec<LinkId>,
    /// Packed layers, innermost first
    pub layers: Vec<Layer>,
}

impl TreeGroup {
    pub fn has_parent(&self) -> bool {
        !self.parent_links.is_empty()
    }
}

/// Directed edge between two groups.
#[derive(Debug)]
pub struct CrossLink {
    pub id: String,
    pub from: GroupId,
    pub to: GroupId,
    /// Depth difference between the two paired nodes
    pub vertical_offset: usize,
}

/// Packing column of a [`Layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Right,
    Left,
}

/// Packing bucket of non-overlapping links, split into two columns.
#[derive(Debug)]
pub struct Layer {
    pub id: String,
    pub group: GroupId,
    pub right_links: Vec<LinkId>,
    pub left_links: Vec<LinkId>,
}

impl Layer {
    pub fn links(&self, side: Side) -> &[LinkId] {
        match side {
            Side::Right => &self.right_links,
            Side::Left => &self.left_links,
        }
    }

    fn links_mut(&mut self, side: Side) -> &mut Vec<LinkId> {
        match side {
            Side::Right => &mut self.right_links,
            Side::Left => &mut self.left_links,
        }
    }
}

/// Arena-backed store of every node, group and link of one run.
///
/// Relationships are handles into the arenas, so parent, partner and group
/// back-references never own anything. Handles are only meaningful for the
/// forest that issued them; indexing with a foreign handle panics.
pub struct Forest {
    nodes: Arena<TreeNode>,
    groups: Arena<TreeGroup>,
    links: Arena<CrossLink>,
    by_entity: HashMap<EntityId, NodeId>,
    node_order: Vec<NodeId>,
    group_order: Vec<GroupId>,
    ids: Box<dyn IdSource>,
}

/// Finished heights plus the keys still on the walk stack.
struct Memo<K> {
    done: HashMap<K, usize>,
    visiting: HashSet<K>,
}

impl<K> Default for Memo<K> {
    fn default() -> Self {
        Self {
            done: HashMap::new(),
            visiting: HashSet::new(),
        }
    }
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forest")
            .field("nodes", &self.nodes)
            .field("groups", &self.groups)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self::with_id_source(SequentialIds::new())
    }

    pub fn with_id_source(ids: impl IdSource + 'static) -> Self {
        Self {
            nodes: Arena::new(),
            groups: Arena::new(),
            links: Arena::new(),
            by_entity: HashMap::new(),
            node_order: Vec::new(),
            group_order: Vec::new(),
            ids: Box::new(ids),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, entity: Entity) -> DomainResult<NodeId> {
        if self.by_entity.contains_key(&entity.id) {
            return Err(DomainError::DuplicateEntity(entity.id));
        }
        let key = entity.id.clone();
        let node = TreeNode {
            entity,
            parent: None,
            children: Vec::new(),
            partner: None,
            group: None,
        };
        let node_id = NodeId(self.nodes.insert(node));
        self.by_entity.insert(key, node_id);
        self.node_order.push(node_id);
        Ok(node_id)
    }

    pub fn lookup(&self, id: &EntityId) -> Option<NodeId> {
        self.by_entity.get(id).copied()
    }

    pub fn resolve(&self, id: &EntityId) -> DomainResult<NodeId> {
        self.lookup(id)
            .ok_or_else(|| DomainError::UnknownEntity(id.clone()))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn get_group(&self, id: GroupId) -> Option<&TreeGroup> {
        self.groups.get(id.0)
    }

    pub fn get_link(&self, id: LinkId) -> Option<&CrossLink> {
        self.links.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> + '_ {
        self.node_order.iter().map(move |&id| (id, &self[id]))
    }

    /// All groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &TreeGroup)> + '_ {
        self.group_order.iter().map(move |&id| (id, &self[id]))
    }

    /// Nodes without a parent, in insertion order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| node.is_root())
            .map(|(id, _)| id)
            .collect()
    }

    pub(crate) fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Records `partner` on `node` unless it already has one.
    pub(crate) fn set_partner(&mut self, node: NodeId, partner: NodeId) -> bool {
        let slot = &mut self.nodes[node.0].partner;
        if slot.is_some() {
            return false;
        }
        *slot = Some(partner);
        true
    }

    /// True if `ancestor` lies strictly above `node`.
    pub fn has_ancestor(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self[node].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self[parent].parent;
        }
        false
    }

    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self[current].parent {
            current = parent;
        }
        current
    }

    /// Distance to the root; 0 for a root.
    pub fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self[node].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self[parent].parent;
        }
        depth
    }

    /// 0 for a leaf, else 1 + the tallest child. A partner's height joins via max.
    #[instrument(level = "trace", skip(self))]
    pub fn height(&self, node: NodeId) -> usize {
        self.height_memo(node, &mut Memo::default())
    }

    fn height_memo(&self, node: NodeId, memo: &mut Memo<NodeId>) -> usize {
        if let Some(&height) = memo.done.get(&node) {
            return height;
        }
        if !memo.visiting.insert(node) {
            return 0;
        }
        let current = &self[node];
        let below = current
            .children
            .iter()
            .map(|&child| 1 + self.height_memo(child, memo))
            .max()
            .unwrap_or(0);
        let partner = current
            .partner
            .map(|partner| self.height_memo(partner, memo))
            .unwrap_or(0);
        memo.visiting.remove(&node);

        let height = below.max(partner);
        memo.done.insert(node, height);
        height
    }

    /// Height from descent alone; partners do not count.
    pub fn descent_height(&self, node: NodeId) -> usize {
        self[node]
            .children
            .iter()
            .map(|&child| 1 + self.descent_height(child))
            .max()
            .unwrap_or(0)
    }

    /// Descent height of the whole tree containing `node`.
    pub fn tree_height(&self, node: NodeId) -> usize {
        self.descent_height(self.root_of(node))
    }

    /// Group owning the tree that contains `node`.
    pub fn group_of(&self, node: NodeId) -> Option<GroupId> {
        self[self.root_of(node)].group
    }

    /// Pre-order walk of the subtree below `root`, children left to right.
    pub fn iter(&self, root: NodeId) -> TreeIterator<'_> {
        TreeIterator {
            forest: self,
            stack: vec![root],
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn create_group(&mut self, root: NodeId) -> DomainResult<GroupId> {
        let node = &self[root];
        if node.parent.is_some() {
            return Err(DomainError::InvalidRoot {
                entity: node.entity.id.clone(),
                reason: "the root of a group must not have a parent".to_string(),
            });
        }
        if node.group.is_some() {
            return Err(DomainError::InvalidRoot {
                entity: node.entity.id.clone(),
                reason: "the tree already belongs to a group".to_string(),
            });
        }

        let group = TreeGroup {
            id: self.ids.next_id(GROUP_PREFIX),
            root,
            child_links: Vec::new(),
            parent_links: Vec::new(),
            layers: Vec::new(),
        };
        let group_id = GroupId(self.groups.insert(group));
        self.nodes[root.0].group = Some(group_id);
        self.group_order.push(group_id);
        Ok(group_id)
    }

    /// Adds a link to `from`'s outgoing and `to`'s incoming lists.
    #[instrument(level = "trace", skip(self))]
    pub fn add_link(&mut self, from: GroupId, to: GroupId, vertical_offset: usize) -> LinkId {
        let link = CrossLink {
            id: self.ids.next_id(LINK_PREFIX),
            from,
            to,
            vertical_offset,
        };
        let link_id = LinkId(self.links.insert(link));
        self.groups[from.0].child_links.push(link_id);
        self.groups[to.0].parent_links.push(link_id);
        link_id
    }

    /// Vertical extent of a group: its root tree, or a linked group hanging
    /// lower, whichever reaches further.
    ///
    /// A group met again further down the same chain contributes only its
    /// own tree height.
    pub fn group_height(&self, group: GroupId) -> usize {
        self.group_height_memo(group, &mut Memo::default(), &mut Memo::default())
    }

    /// [`Forest::group_height`] of every group, each measured once.
    pub fn group_heights(&self) -> HashMap<GroupId, usize> {
        let mut nodes = Memo::default();
        let mut groups = Memo::default();
        for &group in &self.group_order {
            self.group_height_memo(group, &mut nodes, &mut groups);
        }
        groups.done
    }

    fn group_height_memo(&self, group: GroupId, nodes: &mut Memo<NodeId>, groups: &mut Memo<GroupId>) -> usize {
        if let Some(&height) = groups.done.get(&group) {
            return height;
        }
        let current = &self[group];
        let tree = self.height_memo(current.root, nodes);
        if !groups.visiting.insert(group) {
            return tree;
        }
        let linked = current
            .child_links
            .iter()
            .map(|&link| {
                let link = &self[link];
                link.vertical_offset + self.group_height_memo(link.to, nodes, groups)
            })
            .max()
            .unwrap_or(0);
        groups.visiting.remove(&group);

        let height = tree.max(linked);
        groups.done.insert(group, height);
        height
    }

    pub(crate) fn clear_layers(&mut self, group: GroupId) {
        self.groups[group.0].layers.clear();
    }

    /// Appends an empty layer and returns its position.
    pub(crate) fn push_layer(&mut self, group: GroupId) -> usize {
        let layer = Layer {
            id: self.ids.next_id(LAYER_PREFIX),
            group,
            right_links: Vec::new(),
            left_links: Vec::new(),
        };
        let layers = &mut self.groups[group.0].layers;
        layers.push(layer);
        layers.len() - 1
    }

    pub(crate) fn place_link(&mut self, group: GroupId, layer: usize, side: Side, link: LinkId) {
        self.groups[group.0].layers[layer].links_mut(side).push(link);
    }
}

impl ops::Index<NodeId> for Forest {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }
}

impl ops::Index<GroupId> for Forest {
    type Output = TreeGroup;

    fn index(&self, id: GroupId) -> &TreeGroup {
        &self.groups[id.0]
    }
}

impl ops::Index<LinkId> for Forest {
    type Output = CrossLink;

    fn index(&self, id: LinkId) -> &CrossLink {
        &self.links[id.0]
    }
}

pub struct TreeIterator<'a> {
    forest: &'a Forest,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = &self.forest[current];
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current, node))
    }
}
