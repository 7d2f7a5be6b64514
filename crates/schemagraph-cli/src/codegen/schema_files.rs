//! JSON Schema files for registered root types.
//!
//! Each root is written to `<TypeName>.json` with a `<TypeName>.json.sum`
//! sidecar holding the hex SHA-256 of the rendered bytes. A file whose
//! sidecar and content both match the freshly rendered document is left
//! untouched.

use anyhow::{Context, Result};
use schemagraph_core::{SchemaNode, TypeIdentity};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Extension of checksum sidecar files
pub const CHECKSUM_EXTENSION: &str = "sum";

/// How existing output files are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Write files whose content changed
    #[default]
    Update,
    /// Rewrite every file
    Force,
    /// Write nothing and report stale files
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Written,
    Unchanged,
    /// Missing or out of date; only reported in [`WriteMode::Check`]
    Stale,
}

/// Outcome for one output file
#[derive(Debug, Clone)]
pub struct SchemaFile {
    pub type_name: TypeIdentity,
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Render a root schema as a draft-07 document
pub fn render_schema(node: &SchemaNode, pretty: bool) -> Result<String> {
    let document = node.to_document();
    let mut rendered = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    rendered.push('\n');
    Ok(rendered)
}

/// Hex SHA-256 digest of the given bytes
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Path of the checksum sidecar for a schema file
pub fn checksum_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(CHECKSUM_EXTENSION);
    PathBuf::from(name)
}

/// Write one schema file per root into `dir`
pub fn write_schemas(
    dir: &Path,
    roots: &[(TypeIdentity, Arc<SchemaNode>)],
    mode: WriteMode,
    pretty: bool,
) -> Result<Vec<SchemaFile>> {
    let mut owners: HashMap<String, &TypeIdentity> = HashMap::new();
    for (id, _) in roots {
        if let Some(first) = owners.insert(file_name(id), id) {
            anyhow::bail!(
                "Roots `{}` and `{}` would both be written to {}",
                first,
                id,
                file_name(id)
            );
        }
    }

    if mode != WriteMode::Check {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create schema directory: {:?}", dir))?;
    }

    let mut files = Vec::with_capacity(roots.len());
    for (id, node) in roots {
        let path = dir.join(file_name(id));
        let rendered = render_schema(node, pretty)?;
        let digest = checksum(rendered.as_bytes());
        let current = is_current(&path, &digest);

        let status = match mode {
            WriteMode::Check if current => FileStatus::Unchanged,
            WriteMode::Check => FileStatus::Stale,
            WriteMode::Update if current => FileStatus::Unchanged,
            WriteMode::Update | WriteMode::Force => {
                persist(&path, rendered.as_bytes())?;
                persist(&checksum_path(&path), format!("{}\n", digest).as_bytes())?;
                FileStatus::Written
            }
        };

        debug!(type_name = %id, path = %path.display(), ?status, "schema file");
        files.push(SchemaFile {
            type_name: id.clone(),
            path,
            status,
        });
    }

    info!(
        written = files.iter().filter(|file| file.status == FileStatus::Written).count(),
        total = files.len(),
        "schema files processed"
    );
    Ok(files)
}

fn file_name(id: &TypeIdentity) -> String {
    format!("{}.json", id.type_name())
}

/// Whether the file on disk and its sidecar both carry `digest`
fn is_current(path: &Path, digest: &str) -> bool {
    let Ok(recorded) = fs::read_to_string(checksum_path(path)) else {
        return false;
    };
    let Ok(content) = fs::read(path) else {
        return false;
    };
    recorded.trim() == digest && checksum(&content) == digest
}

/// Atomically replace `path` with `bytes`
pub(crate) fn persist(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
    temp.write_all(bytes)
        .with_context(|| format!("Failed to write {:?}", path))?;
    temp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Failed to persist {:?}", path))?;
    Ok(())
}
