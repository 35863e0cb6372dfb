//! Test support: logging setup and expected-structure fixtures.
//!
//! Fixtures describe the expected shape of a layout by entity names only,
//! so they compare against [`GroupView`]s without caring about generated ids.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Entity, GroupView, LinkView, NodeView, Relation, RelationKind};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kinforest=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
    debug!("RUST_LOG={:?}", env::var("RUST_LOG").ok());
}

/// Entities whose names double as ids.
pub fn entities(names: &[&str]) -> Vec<Entity> {
    names.iter().map(|name| Entity::named(name)).collect()
}

/// Relations of one kind from `(from, to)` pairs.
pub fn rels(kind: RelationKind, pairs: &[(&str, &str)]) -> Vec<Relation> {
    pairs
        .iter()
        .map(|(from, to)| Relation::new(kind, *from, *to))
        .collect()
}

/// Expected tree: a name and its children.
#[derive(Debug, Clone)]
pub struct ExpectedTree {
    pub name: String,
    pub children: Vec<ExpectedTree>,
}

/// Expected group: a root tree and its layers.
#[derive(Debug, Clone)]
pub struct ExpectedGroup {
    pub root: ExpectedTree,
    pub layers: Vec<ExpectedLayer>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpectedLayer {
    pub right: Vec<ExpectedLink>,
    pub left: Vec<ExpectedLink>,
}

#[derive(Debug, Clone)]
pub struct ExpectedLink {
    pub target: ExpectedGroup,
    pub vertical_offset: usize,
}

pub fn tree(name: &str, children: Vec<ExpectedTree>) -> ExpectedTree {
    ExpectedTree {
        name: name.to_string(),
        children,
    }
}

pub fn leaf(name: &str) -> ExpectedTree {
    tree(name, Vec::new())
}

pub fn group(root: ExpectedTree, layers: Vec<ExpectedLayer>) -> ExpectedGroup {
    ExpectedGroup { root, layers }
}

pub fn layer(right: Vec<ExpectedLink>, left: Vec<ExpectedLink>) -> ExpectedLayer {
    ExpectedLayer { right, left }
}

pub fn link(target: ExpectedGroup, vertical_offset: usize) -> ExpectedLink {
    ExpectedLink {
        target,
        vertical_offset,
    }
}

/// Compares a node view with the expectation; children match by name in any order.
pub fn check_tree(actual: &NodeView, expected: &ExpectedTree) -> Result<(), String> {
    if actual.name != expected.name {
        return Err(format!("expected node {}, found {}", expected.name, actual.name));
    }
    if actual.children.len() != expected.children.len() {
        return Err(format!(
            "node {}: expected {} children, found {}",
            expected.name,
            expected.children.len(),
            actual.children.len()
        ));
    }
    for child in &expected.children {
        let found = actual
            .child(&child.name)
            .ok_or_else(|| format!("node {}: missing child {}", expected.name, child.name))?;
        check_tree(found, child)?;
    }
    Ok(())
}

fn check_links(owner: &str, side: &str, actual: &[LinkView], expected: &[ExpectedLink]) -> Result<(), String> {
    if actual.len() != expected.len() {
        return Err(format!(
            "group {owner} {side}: expected {} links, found {}",
            expected.len(),
            actual.len()
        ));
    }
    for want in expected {
        let target_name = &want.target.root.name;
        let found = actual
            .iter()
            .find(|l| l.target.as_ref().is_some_and(|t| t.name() == target_name.as_str()))
            .ok_or_else(|| format!("group {owner} {side}: missing link to {target_name}"))?;
        if found.vertical_offset != want.vertical_offset {
            return Err(format!(
                "group {owner} {side}: link to {target_name} has offset {}, expected {}",
                found.vertical_offset, want.vertical_offset
            ));
        }
        if let Some(target) = &found.target {
            check_group(target, &want.target)?;
        }
    }
    Ok(())
}

/// Compares a group view with the expectation, layer by layer.
pub fn check_group(actual: &GroupView, expected: &ExpectedGroup) -> Result<(), String> {
    check_tree(&actual.root, &expected.root)?;
    let owner = actual.name();
    if actual.layers.len() != expected.layers.len() {
        return Err(format!(
            "group {owner}: expected {} layers, found {}",
            expected.layers.len(),
            actual.layers.len()
        ));
    }
    for (got, want) in actual.layers.iter().zip(&expected.layers) {
        check_links(owner, "right", &got.right, &want.right)?;
        check_links(owner, "left", &got.left, &want.left)?;
    }
    Ok(())
}

/// Compares root groups in order.
pub fn check_structure(actual: &[GroupView], expected: &[ExpectedGroup]) -> Result<(), String> {
    if actual.len() != expected.len() {
        return Err(format!("expected {} groups, found {}", expected.len(), actual.len()));
    }
    actual
        .iter()
        .zip(expected)
        .try_for_each(|(got, want)| check_group(got, want))
}
