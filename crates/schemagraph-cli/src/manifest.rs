//! Manifest parsing and validation
//!
//! A `schemagraph.toml` manifest declares the packages, types, and root
//! registrations that stand in for scanned source code.

use crate::type_expr::parse_type_expr;
use anyhow::{Context, Result};
use schemagraph_core::{EnumMode, Position, ResolverConfig, ScalarKind};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use toml::Spanned;

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "schemagraph.toml";

/// schemagraph.toml manifest structure
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub project: ProjectSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub packages: Vec<PackageDefinition>,

    /// Maps byte offsets of the manifest text to positions
    #[serde(skip)]
    pub source: SourceMap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    pub name: String,

    /// Qualified names (`package::Type`) of the types to generate schemas for
    #[serde(default)]
    pub roots: Vec<Spanned<String>>,

    /// Top-level descriptions of root schemas, keyed by qualified root name
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Rust file receiving the generated dispatch functions
    #[serde(default)]
    pub code_file: Option<PathBuf>,

    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Path prefix of declared packages in generated code
    #[serde(default = "default_module_root")]
    pub module_root: String,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("schemas")
}

fn default_pretty() -> bool {
    true
}

fn default_module_root() -> String {
    "crate".to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            code_file: None,
            pretty: default_pretty(),
            module_root: default_module_root(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageDefinition {
    pub path: String,

    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Scalar,
    Alias,
    Struct,
    Enum,
    Interface,
    Alternatives,
}

/// One declared type. Which optional keys apply depends on `kind`.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDefinition {
    pub name: Spanned<String>,

    pub kind: TypeKind,

    #[serde(default)]
    pub doc: String,

    /// `kind = "scalar"`
    #[serde(default)]
    pub scalar: Option<ScalarKind>,

    /// `kind = "alias"`: the aliased type expression
    #[serde(default)]
    pub target: Option<String>,

    /// `kind = "struct"`
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    /// `kind = "enum"`: literal kind of the constants, `string` by default
    #[serde(default)]
    pub repr: Option<ScalarKind>,

    /// `kind = "enum"`
    #[serde(default)]
    pub values: Vec<EnumValueDefinition>,

    /// `kind = "enum"`: `names` renders the constant names instead of their literals
    #[serde(default)]
    pub mode: EnumMode,

    /// `kind = "interface"`
    #[serde(default)]
    pub implementations: Vec<String>,

    /// `kind = "alternatives"`
    #[serde(default)]
    pub alternatives: Vec<AlternativeDefinition>,

    /// Discriminator property override for unions
    #[serde(default)]
    pub discriminator: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDefinition {
    pub name: Spanned<String>,

    /// Rust type expression, or `struct` for an inline struct
    #[serde(default, rename = "type")]
    pub type_expr: Option<String>,

    /// Wire name; `-` skips the field
    #[serde(default)]
    pub json: Option<String>,

    #[serde(default)]
    pub doc: String,

    #[serde(default)]
    pub embedded: bool,

    #[serde(default)]
    pub optional: bool,

    #[serde(default = "default_exported")]
    pub exported: bool,

    /// Field-level enumeration literals
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<toml::Value>>,

    /// Field-level rendering of the enumeration the field refers to
    #[serde(default)]
    pub enum_mode: Option<EnumMode>,

    /// Fields of an inline struct
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

fn default_exported() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumValueDefinition {
    pub name: String,

    /// Literal value; omitted for counter-based constants
    #[serde(default)]
    pub value: Option<toml::Value>,

    #[serde(default)]
    pub doc: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlternativeDefinition {
    /// Type the alternative is decoded from
    pub source: String,

    /// Path of the conversion function into the union type
    pub convert: String,

    #[serde(default)]
    pub label: Option<String>,
}

/// Line index over the manifest text
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    file: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(file: impl Into<String>, text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self {
            file: file.into(),
            line_starts,
        }
    }

    /// One-based position of a byte offset
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        Position::new(
            self.file.clone(),
            (line + 1) as u32,
            (offset - start + 1) as u32,
        )
    }

    pub fn file(&self) -> &str {
        &self.file
    }
}

impl Manifest {
    /// Load manifest from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {:?}", path))?;

        Self::from_source(&content, &path.display().to_string())
    }

    /// Parse manifest from string
    pub fn from_str(content: &str) -> Result<Self> {
        Self::from_source(content, "<inline>")
    }

    fn from_source(content: &str, file: &str) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(content).context("Failed to parse manifest")?;
        manifest.source = SourceMap::new(file, content);
        Ok(manifest)
    }

    /// Position of a spanned manifest value
    pub fn position_of<T>(&self, spanned: &Spanned<T>) -> Position {
        self.source.position(spanned.span().start)
    }

    /// Number of declared types across all packages
    pub fn type_count(&self) -> usize {
        self.packages.iter().map(|package| package.types.len()).sum()
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        if self.project.name.is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }

        if self.project.roots.is_empty() {
            anyhow::bail!("At least one root type must be registered in [project] roots");
        }

        if self.resolver.max_depth == 0 {
            anyhow::bail!("resolver.max_depth must be at least 1");
        }

        if self.resolver.discriminator_property.is_empty() {
            anyhow::bail!("resolver.discriminator_property cannot be empty");
        }

        let named_by_field = self.enums_rendered_by_name();
        let mut declared = HashSet::new();
        for package in &self.packages {
            if package.path.is_empty() {
                anyhow::bail!("Package path cannot be empty");
            }
            for definition in &package.types {
                let name = definition.name.get_ref();
                if !declared.insert(format!("{}::{}", package.path, name)) {
                    anyhow::bail!(
                        "{}: type `{}` declared twice in package `{}`",
                        self.position_of(&definition.name),
                        name,
                        package.path
                    );
                }
                self.validate_type(&package.path, definition, &named_by_field)
                    .with_context(|| format!("{}: invalid type `{}`", self.position_of(&definition.name), name))?;
            }
        }

        for root in &self.project.roots {
            let name = root.get_ref();
            if !name.contains("::") {
                anyhow::bail!(
                    "{}: root `{}` must be qualified as `package::Type`",
                    self.position_of(root),
                    name
                );
            }
            if !declared.contains(name) {
                anyhow::bail!("{}: root `{}` is not declared", self.position_of(root), name);
            }
        }

        for name in self.project.descriptions.keys() {
            if !self.project.roots.iter().any(|root| root.get_ref() == name) {
                anyhow::bail!("description given for `{}`, which is not a registered root", name);
            }
        }

        Ok(())
    }

    fn validate_type(
        &self,
        package: &str,
        definition: &TypeDefinition,
        named_by_field: &HashSet<String>,
    ) -> Result<()> {
        match definition.kind {
            TypeKind::Scalar => {
                if definition.scalar.is_none() {
                    anyhow::bail!("scalar types require `scalar`");
                }
            }
            TypeKind::Alias => {
                let target = definition
                    .target
                    .as_deref()
                    .context("alias types require `target`")?;
                parse_type_expr(target, package)?;
            }
            TypeKind::Struct => self.validate_fields(package, &definition.fields)?,
            TypeKind::Enum => {
                let repr = definition.repr.unwrap_or(ScalarKind::String);
                let qualified = format!("{}::{}", package, definition.name.get_ref());
                // Counter-based constants only render by name
                let by_name = definition.mode == EnumMode::Names || named_by_field.contains(&qualified);
                for value in &definition.values {
                    if value.value.is_none() && repr != ScalarKind::String && !by_name {
                        anyhow::bail!(
                            "constant `{}` has no literal value; counter-based enumerations require `mode = \"names\"` or a field with `enum_mode = \"names\"`",
                            value.name
                        );
                    }
                }
            }
            TypeKind::Interface => {
                if definition.implementations.is_empty() {
                    anyhow::bail!("interface types require at least one implementation");
                }
            }
            TypeKind::Alternatives => {
                if definition.alternatives.is_empty() {
                    anyhow::bail!("alternative unions require at least one alternative");
                }
                let mut labels = HashSet::new();
                for alternative in &definition.alternatives {
                    if let Some(label) = &alternative.label {
                        if !labels.insert(label.as_str()) {
                            anyhow::bail!("alternative label `{}` is used twice", label);
                        }
                    }
                    if alternative.convert.is_empty() {
                        anyhow::bail!("alternative `{}` requires `convert`", alternative.source);
                    }
                }
            }
        }
        Ok(())
    }

    /// Qualified names of the types that some field renders with `enum_mode = "names"`
    fn enums_rendered_by_name(&self) -> HashSet<String> {
        fn collect(package: &str, fields: &[FieldDefinition], names: &mut HashSet<String>) {
            for field in fields {
                collect(package, &field.fields, names);
                if field.enum_mode != Some(EnumMode::Names) {
                    continue;
                }
                let identity = field
                    .type_expr
                    .as_deref()
                    .and_then(|expr| parse_type_expr(expr, package).ok())
                    .and_then(|expr| expr.identity());
                if let Some(identity) = identity {
                    names.insert(identity.concrete().to_string());
                }
            }
        }

        let mut names = HashSet::new();
        for package in &self.packages {
            for definition in &package.types {
                collect(&package.path, &definition.fields, &mut names);
            }
        }
        names
    }

    fn validate_fields(&self, package: &str, fields: &[FieldDefinition]) -> Result<()> {
        for field in fields {
            if field.enum_mode.is_some() && field.enum_values.is_some() {
                anyhow::bail!(
                    "{}: field `{}` sets both `enum` and `enum_mode`",
                    self.position_of(&field.name),
                    field.name.get_ref()
                );
            }
            match field.type_expr.as_deref() {
                Some("struct") => self.validate_fields(package, &field.fields)?,
                Some(expr) => {
                    parse_type_expr(expr, package).with_context(|| {
                        format!("{}: field `{}`", self.position_of(&field.name), field.name.get_ref())
                    })?;
                }
                None if field.embedded => {}
                None => anyhow::bail!(
                    "{}: field `{}` requires `type`",
                    self.position_of(&field.name),
                    field.name.get_ref()
                ),
            }
        }
        Ok(())
    }
}

/// Check command implementation
pub fn check(manifest_path: Option<&Path>) -> Result<()> {
    let path = manifest_path.unwrap_or(Path::new(DEFAULT_MANIFEST));

    println!("Checking manifest: {}", path.display());

    let manifest = Manifest::from_file(path)?;
    manifest.validate()?;

    println!("✓ Project: {}", manifest.project.name);
    println!(
        "✓ Types: {} in {} package(s)",
        manifest.type_count(),
        manifest.packages.len()
    );

    let resolution = crate::generate::resolve(&manifest)?;
    println!("✓ Roots: {}", manifest.project.roots.len());
    println!("✓ Schemas: {}", resolution.store().len());
    println!("✓ Unions: {}", resolution.dispatch_tables().count());
    println!("\nManifest is valid!");

    Ok(())
}
