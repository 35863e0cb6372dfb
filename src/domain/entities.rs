//! Domain entities: the input snapshot

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A named item placed in the hierarchy (e.g. a person).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Entity whose name doubles as its id.
    pub fn named(name: &str) -> Self {
        Self::new(name, name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Entity as written in a snapshot file.
///
/// The id may be omitted when the name is unique; the name then acts as id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl From<EntityRecord> for Entity {
    fn from(record: EntityRecord) -> Self {
        let id = match record.id {
            Some(id) if !id.is_empty() => id,
            _ => record.name.clone(),
        };
        Self::new(id, record.name)
    }
}

/// Kind of a relation between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// `from` is a child of `to`
    #[serde(alias = "parent")]
    Descent,
    /// `from` and `to` are partners
    #[serde(alias = "partner")]
    Pairing,
    /// Any kind this crate does not understand
    #[serde(other)]
    Unrecognized,
}

/// Directed relation between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub from: EntityId,
    pub to: EntityId,
}

impl Relation {
    pub fn new(kind: RelationKind, from: impl Into<EntityId>, to: impl Into<EntityId>) -> Self {
        Self {
            kind,
            from: from.into(),
            to: to.into(),
        }
    }

    /// `child` descends from `parent`.
    pub fn descent(child: impl Into<EntityId>, parent: impl Into<EntityId>) -> Self {
        Self::new(RelationKind::Descent, child, parent)
    }

    pub fn pairing(from: impl Into<EntityId>, to: impl Into<EntityId>) -> Self {
        Self::new(RelationKind::Pairing, from, to)
    }
}

/// What to do with relations whose kind is neither descent nor pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRelationPolicy {
    #[default]
    Ignore,
    Reject,
}

/// Immutable input: every entity and relation of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Snapshot {
    /// Resolved entities, in input order.
    pub fn entities(&self) -> Vec<Entity> {
        self.entities.iter().cloned().map(Entity::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_record_without_id_when_converting_then_name_is_id() {
        let record = EntityRecord {
            id: None,
            name: "grandparent".into(),
        };

        let entity = Entity::from(record);

        assert_eq!(entity.id.as_str(), "grandparent");
        assert_eq!(entity.name, "grandparent");
    }

    #[test]
    fn given_record_with_empty_id_when_converting_then_name_is_id() {
        let record = EntityRecord {
            id: Some(String::new()),
            name: "ada".into(),
        };

        assert_eq!(Entity::from(record).id.as_str(), "ada");
    }

    #[test]
    fn given_legacy_kind_names_when_deserializing_then_aliases_apply() {
        let json = r#"[
            {"kind": "parent", "from": "b", "to": "a"},
            {"kind": "partner", "from": "a", "to": "c"},
            {"kind": "sibling", "from": "b", "to": "c"}
        ]"#;

        let relations: Vec<Relation> = serde_json::from_str(json).unwrap();

        assert_eq!(relations[0].kind, RelationKind::Descent);
        assert_eq!(relations[1].kind, RelationKind::Pairing);
        assert_eq!(relations[2].kind, RelationKind::Unrecognized);
    }
}
