//! The `generate` command: resolve every root, write schema files and the
//! dispatch source.

use crate::codegen::dispatch::generate_dispatch;
use crate::codegen::schema_files::{self, FileStatus, SchemaFile, WriteMode};
use crate::manifest::{DEFAULT_MANIFEST, Manifest};
use crate::scan::scan;
use anyhow::{Context, Result};
use schemagraph_core::{Resolution, Resolver};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub manifest: PathBuf,
    pub mode: WriteMode,
    /// Write the dispatch source when `[output] code_file` is set
    pub emit_code: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            mode: WriteMode::Update,
            emit_code: true,
        }
    }
}

/// What a generate run produced
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub schemas: Vec<SchemaFile>,
    pub code_file: Option<(PathBuf, FileStatus)>,
    pub unions: usize,
}

impl GenerateReport {
    /// Files that are missing or out of date in check mode
    pub fn stale(&self) -> Vec<&Path> {
        let code = self
            .code_file
            .iter()
            .filter(|(_, status)| *status == FileStatus::Stale)
            .map(|(path, _)| path.as_path());
        self.schemas
            .iter()
            .filter(|file| file.status == FileStatus::Stale)
            .map(|file| file.path.as_path())
            .chain(code)
            .collect()
    }

    pub fn written(&self) -> usize {
        let code = self
            .code_file
            .iter()
            .filter(|(_, status)| *status == FileStatus::Written)
            .count();
        self.schemas
            .iter()
            .filter(|file| file.status == FileStatus::Written)
            .count()
            + code
    }
}

/// Scan and resolve a validated manifest.
///
/// Every failing root is reported, not just the first one.
pub fn resolve(manifest: &Manifest) -> Result<Resolution> {
    let scanned = scan(manifest)?;
    let resolution = Resolver::new(
        &scanned.declarations,
        &scanned.registrations,
        manifest.resolver.clone(),
    )
    .run();

    if !resolution.is_success() {
        let diagnostics = resolution
            .failures()
            .iter()
            .map(|(root, err)| format!("error[E{}] in root `{}`: {}", err.error_code(), root, err))
            .collect::<Vec<_>>()
            .join("\n");
        anyhow::bail!(
            "Schema generation failed for {} root(s):\n{}",
            resolution.failures().len(),
            diagnostics
        );
    }

    Ok(resolution)
}

/// Run generation for a manifest
pub fn run(options: &GenerateOptions) -> Result<GenerateReport> {
    let manifest = Manifest::from_file(&options.manifest)?;
    manifest.validate()?;

    let base = options
        .manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let resolution = resolve(&manifest)?;

    let schemas = schema_files::write_schemas(
        &base.join(&manifest.output.schema_dir),
        &resolution.root_schemas(),
        options.mode,
        manifest.output.pretty,
    )?;

    let tables: Vec<_> = resolution.dispatch_tables().collect();
    let code_file = match (&manifest.output.code_file, options.emit_code) {
        (Some(code_file), true) => {
            let path = base.join(code_file);
            let source = generate_dispatch(&tables, &manifest.output.module_root)?;
            let status = write_code(&path, &source, options.mode)?;
            Some((path, status))
        }
        _ => None,
    };

    let report = GenerateReport {
        schemas,
        code_file,
        unions: tables.len(),
    };
    info!(
        project = %manifest.project.name,
        written = report.written(),
        unions = report.unions,
        "generation finished"
    );
    Ok(report)
}

fn write_code(path: &Path, source: &str, mode: WriteMode) -> Result<FileStatus> {
    let current = fs::read_to_string(path).is_ok_and(|existing| existing == source);

    match mode {
        WriteMode::Check if current => Ok(FileStatus::Unchanged),
        WriteMode::Check => Ok(FileStatus::Stale),
        WriteMode::Update if current => Ok(FileStatus::Unchanged),
        WriteMode::Update | WriteMode::Force => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            schema_files::persist(path, source.as_bytes())?;
            Ok(FileStatus::Written)
        }
    }
}
