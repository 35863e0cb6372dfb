//! Layer packer: deterministic first-fit placement of a group's outgoing links.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{Forest, GroupId, LinkId, Side};

/// Rows `[start, end)` a link occupies below its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// A target of height `h` hung at `offset` covers `h + 1` rows.
    pub fn of_link(offset: usize, target_height: usize) -> Self {
        Self {
            start: offset,
            end: offset + target_height + 1,
        }
    }

    /// Spans overlap unless one ends at or before the other begins.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Rebuilds the layers of `group` from its outgoing links.
///
/// Links are placed smallest target first (ties keep link order). Each link
/// goes into the innermost layer with room, right column before left; a new
/// layer is appended when none has room.
#[instrument(level = "debug", skip(forest))]
pub fn pack_layers(forest: &mut Forest, group: GroupId) {
    let heights = forest.group_heights();
    pack_with_heights(forest, group, &heights);
}

fn pack_with_heights(forest: &mut Forest, group: GroupId, heights: &HashMap<GroupId, usize>) {
    forest.clear_layers(group);

    let mut spans = HashMap::new();
    let mut entries = Vec::new();
    for &link in &forest[group].child_links {
        let target = forest[link].to;
        let height = heights
            .get(&target)
            .copied()
            .unwrap_or_else(|| forest.group_height(target));
        let span = Span::of_link(forest[link].vertical_offset, height);
        spans.insert(link, span);
        entries.push((link, height, span));
    }

    for (link, _, span) in entries.into_iter().sorted_by_key(|&(_, height, _)| height) {
        let (layer, side) = match find_slot(forest, group, &spans, span) {
            Some(slot) => slot,
            None => (forest.push_layer(group), Side::Right),
        };
        trace!("{} -> layer {} {:?} rows {:?}", forest[link].id, layer, side, span);
        forest.place_link(group, layer, side, link);
    }

    debug!("{} packed into {} layers", forest[group].id, forest[group].layers.len());
}

/// Innermost layer and column whose placed spans leave room for `span`.
fn find_slot(
    forest: &Forest,
    group: GroupId,
    spans: &HashMap<LinkId, Span>,
    span: Span,
) -> Option<(usize, Side)> {
    let has_room = |placed: &[LinkId]| {
        placed
            .iter()
            .filter_map(|link| spans.get(link))
            .all(|other| !other.overlaps(&span))
    };

    forest[group]
        .layers
        .iter()
        .enumerate()
        .find_map(|(index, layer)| {
            [Side::Right, Side::Left]
                .into_iter()
                .find(|&side| has_room(layer.links(side)))
                .map(|side| (index, side))
        })
}

/// Packs every group independently; group heights are measured once up front.
#[instrument(level = "debug", skip_all, fields(groups = groups.len()))]
pub fn pack_all(forest: &mut Forest, groups: &[GroupId]) {
    let heights = forest.group_heights();
    for &group in groups {
        pack_with_heights(forest, group, &heights);
    }
}
