//! kinforest: lays out a forest of kinship trees as linked groups.
//!
//! Entities joined by descent relations form trees. Each root tree becomes a
//! group, pairing relations link groups to each other, and every group packs
//! its outgoing links into layers of right/left columns.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use application::services::{Layout, LayoutService, Structure};
pub use domain::{
    DomainError, DomainResult, Entity, EntityId, Forest, GroupView, Relation, RelationKind,
    Snapshot, TreeBuilder,
};
