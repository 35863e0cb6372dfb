//! Text rendering of forest views as `termtree` trees.

use termtree::Tree;

use crate::domain::{GroupView, LinkView, NodeView};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for NodeView {
    fn to_tree_string(&self) -> Tree<String> {
        let label = match &self.partner {
            Some(partner) => format!("{} ~ {}", self.name, partner),
            None => self.name.clone(),
        };
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(label).with_leaves(leaves)
    }
}

impl TreeNodeConvert for LinkView {
    fn to_tree_string(&self) -> Tree<String> {
        let label = format!("+{} -> {}", self.vertical_offset, self.target_id);
        match &self.target {
            Some(target) => Tree::new(label).with_leaves([target.to_tree_string()]),
            None => Tree::new(format!("{label} (already shown)")),
        }
    }
}

impl TreeNodeConvert for GroupView {
    fn to_tree_string(&self) -> Tree<String> {
        let mut tree = Tree::new(format!("{} [{}]", self.name(), self.id));
        tree.push(self.root.to_tree_string());

        for (index, layer) in self.layers.iter().enumerate() {
            let mut layer_tree = Tree::new(format!("layer {}", index + 1));
            for (side, links) in [("right", &layer.right), ("left", &layer.left)] {
                if links.is_empty() {
                    continue;
                }
                let leaves: Vec<_> = links.iter().map(|l| l.to_tree_string()).collect();
                layer_tree.push(Tree::new(side.to_string()).with_leaves(leaves));
            }
            tree.push(layer_tree);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::LayoutService;
    use crate::domain::{Entity, Relation};

    #[test]
    fn given_linked_layout_when_rendering_then_shows_layers_and_links() {
        let entities: Vec<Entity> = ["parent", "child", "childsPartner"]
            .iter()
            .map(|name| Entity::named(name))
            .collect();
        let relations = [
            Relation::descent("child", "parent"),
            Relation::pairing("childsPartner", "child"),
        ];
        let layout = LayoutService::default()
            .build_layout(&entities, &relations)
            .unwrap();

        let text = layout.views()[0].to_tree_string().to_string();

        assert!(text.starts_with("parent [tree-group-1]"));
        assert!(text.contains("child ~ childsPartner"));
        assert!(text.contains("layer 1"));
        assert!(text.contains("right"));
        assert!(text.contains("+1 -> tree-group-2"));
        assert!(!text.contains("left"));
    }
}
