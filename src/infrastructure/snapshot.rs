//! Snapshot files
//!
//! A snapshot lists entities and relations, either as JSON
//! (`{"entities": [...], "relations": [...]}`) or as TOML
//! (`[[entities]]` and `[[relations]]` tables).

use std::path::Path;

use tracing::debug;

use crate::domain::Snapshot;
use crate::infrastructure::{InfraError, InfraResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Toml,
}

impl SnapshotFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Read and parse a snapshot file.
pub fn read_snapshot(path: &Path) -> InfraResult<Snapshot> {
    let format = SnapshotFormat::from_path(path)
        .ok_or_else(|| InfraError::parse(path, "expected a .json or .toml file"))?;
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;

    let snapshot = parse_snapshot(&content, format).map_err(|message| InfraError::parse(path, message))?;
    debug!(
        "read {}: {} entities, {} relations",
        path.display(),
        snapshot.entities.len(),
        snapshot.relations.len()
    );
    Ok(snapshot)
}

/// Parse snapshot text; the error is the parser's message.
pub fn parse_snapshot(content: &str, format: SnapshotFormat) -> Result<Snapshot, String> {
    match format {
        SnapshotFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        SnapshotFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RelationKind;
    use std::path::PathBuf;

    #[test]
    fn given_toml_snapshot_when_parsing_then_reads_tables() {
        let content = r#"
[[entities]]
name = "parent"

[[entities]]
id = "c1"
name = "child"

[[relations]]
kind = "descent"
from = "c1"
to = "parent"
"#;

        let snapshot = parse_snapshot(content, SnapshotFormat::Toml).unwrap();

        assert_eq!(snapshot.entities.len(), 2);
        assert_eq!(snapshot.entities()[1].id.as_str(), "c1");
        assert_eq!(snapshot.relations[0].kind, RelationKind::Descent);
    }

    #[test]
    fn given_json_without_relations_when_parsing_then_defaults_empty() {
        let snapshot =
            parse_snapshot(r#"{"entities": [{"name": "solo"}]}"#, SnapshotFormat::Json).unwrap();

        assert_eq!(snapshot.entities.len(), 1);
        assert!(snapshot.relations.is_empty());
    }

    #[test]
    fn given_extensions_when_detecting_format_then_case_insensitive() {
        assert_eq!(
            SnapshotFormat::from_path(&PathBuf::from("family.JSON")),
            Some(SnapshotFormat::Json)
        );
        assert_eq!(
            SnapshotFormat::from_path(&PathBuf::from("family.toml")),
            Some(SnapshotFormat::Toml)
        );
        assert_eq!(SnapshotFormat::from_path(&PathBuf::from("family.yaml")), None);
    }
}
