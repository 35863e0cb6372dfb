//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::EntityId;

/// Domain errors represent structural violations in the input snapshot.
/// Every variant names the identifiers that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    #[error("entity {child} already has a parent ({existing}), cannot attach to {parent}")]
    MultipleParents {
        child: EntityId,
        existing: EntityId,
        parent: EntityId,
    },

    #[error("descent relation {child} -> {parent} would make the tree cyclic")]
    CyclicRelation { child: EntityId, parent: EntityId },

    #[error("pairing cannot link two nodes from the same line of descent ({from}, {to})")]
    SameLineage { from: EntityId, to: EntityId },

    #[error("pairing ({from}, {to}) targets a tree without a group")]
    UngroupedEntity { from: EntityId, to: EntityId },

    #[error("{entity} cannot root a group: {reason}")]
    InvalidRoot { entity: EntityId, reason: String },

    #[error("every group has an incoming link, no root group remains ({groups} groups)")]
    FullCycle { groups: usize },

    #[error("unsupported relation kind between {from} and {to}")]
    UnsupportedRelation { from: EntityId, to: EntityId },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
