//! Layout service
//!
//! Runs the forest pipeline over one snapshot: tree building, grouping,
//! partner linking, layer packing and root extraction.

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    extract_roots, link_partners, pack_all, wrap_as_groups, Entity, Forest, GroupId, GroupView,
    IdSource, NodeId, NodeView, Relation, SequentialIds, Snapshot, TreeBuilder,
    UnknownRelationPolicy,
};

/// Forest after descent relations only.
#[derive(Debug)]
pub struct Structure {
    forest: Forest,
    roots: Vec<NodeId>,
}

impl Structure {
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Root nodes in entity order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn views(&self) -> Vec<NodeView> {
        self.roots
            .iter()
            .map(|&root| self.forest.node_view(root))
            .collect()
    }
}

/// Fully linked and layered forest.
#[derive(Debug)]
pub struct Layout {
    forest: Forest,
    groups: Vec<GroupId>,
    roots: Vec<GroupId>,
}

impl Layout {
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Every group, root or not, in creation order.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    /// Groups without incoming links.
    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    pub fn views(&self) -> Vec<GroupView> {
        self.roots
            .iter()
            .map(|&group| self.forest.group_view(group))
            .collect()
    }
}

/// Entry points of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct LayoutService {
    policy: UnknownRelationPolicy,
}

impl LayoutService {
    pub fn new(settings: &Settings) -> Self {
        Self::with_policy(settings.unknown_relations)
    }

    pub fn with_policy(policy: UnknownRelationPolicy) -> Self {
        Self { policy }
    }

    /// Structure-only build: descent relations, no grouping or pairing.
    #[instrument(level = "debug", skip_all)]
    pub fn build_structure(&self, entities: &[Entity], relations: &[Relation]) -> ApplicationResult<Structure> {
        let mut forest = Forest::new();
        let roots = TreeBuilder::with_policy(self.policy).build_trees(&mut forest, entities, relations)?;
        Ok(Structure { forest, roots })
    }

    /// Full pipeline with sequential ids.
    pub fn build_layout(&self, entities: &[Entity], relations: &[Relation]) -> ApplicationResult<Layout> {
        self.build_layout_with_ids(entities, relations, SequentialIds::new())
    }

    /// Full pipeline drawing group, link and layer ids from `ids`.
    #[instrument(level = "debug", skip_all)]
    pub fn build_layout_with_ids(
        &self,
        entities: &[Entity],
        relations: &[Relation],
        ids: impl IdSource + 'static,
    ) -> ApplicationResult<Layout> {
        let mut forest = Forest::with_id_source(ids);

        let trees = TreeBuilder::with_policy(self.policy).build_trees(&mut forest, entities, relations)?;
        let groups = wrap_as_groups(&mut forest, &trees)?;
        link_partners(&mut forest, relations)?;
        pack_all(&mut forest, &groups);
        let roots = extract_roots(&forest, &groups)?;

        debug!("layout: {} groups, {} roots", groups.len(), roots.len());
        Ok(Layout {
            forest,
            groups,
            roots,
        })
    }

    pub fn structure_snapshot(&self, snapshot: &Snapshot) -> ApplicationResult<Structure> {
        self.build_structure(&snapshot.entities(), &snapshot.relations)
    }

    pub fn layout_snapshot(&self, snapshot: &Snapshot) -> ApplicationResult<Layout> {
        self.build_layout(&snapshot.entities(), &snapshot.relations)
    }
}
