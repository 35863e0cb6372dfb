//! Domain layer: entities, the forest model and the layout algorithm
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod ids;
pub mod linker;
pub mod packer;
pub mod view;

pub use arena::{CrossLink, Forest, GroupId, Layer, LinkId, NodeId, Side, TreeGroup, TreeNode};
pub use builder::TreeBuilder;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use ids::{IdSource, SequentialIds};
pub use linker::{extract_roots, link_partners, plan_link, wrap_as_groups, LinkPlan};
pub use packer::{pack_all, pack_layers, Span};
pub use view::{GroupView, LayerView, LinkView, NodeView};
