//! Type graph resolver
//!
//! [`Resolver`] turns declarations into [`SchemaNode`]s. Every named type is
//! synthesized at most once and kept in a [`SchemaStore`]; later references
//! get the stored node back. An explicit `visiting` stack detects cycles,
//! independent of the call stack, and a configurable ceiling bounds nesting.

use crate::config::ResolverConfig;
use crate::declaration::{
    Declaration, DeclarationKind, DeclarationSource, RegistrationSet, TypeExpr,
};
use crate::error::{Nesting, SchemaError, SchemaResult};
use crate::identity::TypeIdentity;
use crate::position::Position;
use crate::schema::{ArrayNode, ObjectNode, PropertyNode, SchemaNode};
use crate::store::SchemaStore;
use crate::union::{self, DispatchTable};
use crate::{enums, flatten};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Where a type expression sits relative to the struct field that holds it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// The expression is the field's own type
    Direct,
    /// The expression is wrapped in a container
    Nested(Nesting),
}

/// Resolves registered root types into schemas
pub struct Resolver<'a, S: DeclarationSource + ?Sized> {
    source: &'a S,
    registrations: &'a RegistrationSet,
    config: ResolverConfig,
    store: SchemaStore,
    visiting: Vec<TypeIdentity>,
    root: Option<(TypeIdentity, Position)>,
    dispatch: BTreeMap<TypeIdentity, DispatchTable>,
    failures: Vec<(TypeIdentity, SchemaError)>,
}

impl<'a, S: DeclarationSource + ?Sized> Resolver<'a, S> {
    pub fn new(source: &'a S, registrations: &'a RegistrationSet, config: ResolverConfig) -> Self {
        Self {
            source,
            registrations,
            config,
            store: SchemaStore::new(),
            visiting: Vec::new(),
            root: None,
            dispatch: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn registrations(&self) -> &'a RegistrationSet {
        self.registrations
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    /// The memoized schema of a type, if it has been resolved
    pub fn get_schema(&self, id: &TypeIdentity) -> Option<Arc<SchemaNode>> {
        self.store.get(id)
    }

    pub fn dispatch_table(&self, union: &TypeIdentity) -> Option<&DispatchTable> {
        self.dispatch.get(union)
    }

    /// Resolve one named type
    pub fn resolve(&mut self, id: &TypeIdentity) -> SchemaResult<Arc<SchemaNode>> {
        self.resolve_named(id, None)
    }

    /// Resolve every registered root.
    ///
    /// A failing root stops at its first error; the remaining roots are still attempted.
    /// Returns the number of roots that failed.
    pub fn resolve_roots(&mut self) -> usize {
        let registrations = self.registrations;
        let before = self.failures.len();

        for root in registrations.roots() {
            self.root = None;
            if let Err(err) = self.resolve(root) {
                warn!(root = %root, code = err.error_code(), "{}", err);
                self.failures.push((root.clone(), err));
            }
        }

        let failed = self.failures.len() - before;
        info!(
            roots = registrations.roots().len(),
            failed,
            schemas = self.store.len(),
            unions = self.dispatch.len(),
            "resolution finished"
        );
        failed
    }

    /// Resolve every registered root and collect the outcome
    pub fn run(mut self) -> Resolution {
        self.resolve_roots();
        self.finish()
    }

    pub fn finish(self) -> Resolution {
        let registrations = self.registrations;
        let descriptions = registrations
            .roots()
            .iter()
            .filter_map(|root| {
                registrations
                    .description(root)
                    .map(|text| (root.clone(), text.to_string()))
            })
            .collect();
        Resolution {
            roots: registrations.roots().to_vec(),
            descriptions,
            store: self.store,
            dispatch: self.dispatch.into_values().collect(),
            failures: self.failures,
        }
    }

    /// Look up a declaration, reporting a missing one at `site`
    pub(crate) fn declaration(
        &self,
        id: &TypeIdentity,
        site: Option<&Position>,
    ) -> SchemaResult<&'a Declaration> {
        let source = self.source;
        source
            .get_declaration(id)
            .ok_or_else(|| SchemaError::UnresolvedType {
                type_name: id.to_string(),
                position: site.cloned().unwrap_or_default(),
            })
    }

    pub(crate) fn resolve_named(
        &mut self,
        id: &TypeIdentity,
        site: Option<&Position>,
    ) -> SchemaResult<Arc<SchemaNode>> {
        let key = id.concrete();
        if let Some(node) = self.store.get(&key) {
            trace!(type_name = %key, "memoized schema");
            return Ok(node);
        }

        let declaration = self.declaration(&key, site)?;
        let position = match site {
            Some(site) if !site.is_unknown() => site.clone(),
            _ => declaration.position.clone(),
        };

        if let Some(start) = self.visiting.iter().position(|seen| *seen == key) {
            let chain = self.visiting[start..]
                .iter()
                .chain(std::iter::once(&key))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(SchemaError::CyclicType {
                type_name: key.to_string(),
                chain,
                position,
            });
        }

        if self.visiting.is_empty() {
            self.root = Some((key.clone(), declaration.position.clone()));
        }
        if self.visiting.len() >= self.config.max_depth {
            let (root, root_position) = self
                .root
                .clone()
                .unwrap_or_else(|| (key.clone(), declaration.position.clone()));
            return Err(SchemaError::MaxDepthExceeded {
                root: root.to_string(),
                limit: self.config.max_depth,
                position: root_position,
            });
        }

        self.visiting.push(key.clone());
        let result = self.synthesize(declaration);
        self.visiting.pop();
        let node = result?;

        debug!(type_name = %key, kind = declaration.kind.label(), "synthesized schema");
        Ok(self.store.insert(&key, node))
    }

    fn synthesize(&mut self, declaration: &'a Declaration) -> SchemaResult<SchemaNode> {
        match &declaration.kind {
            DeclarationKind::Scalar(kind) => Ok(SchemaNode::Property(PropertyNode {
                description: declaration.doc.clone(),
                ..PropertyNode::new(*kind)
            })),
            DeclarationKind::Definition(underlying) => {
                let node = self.resolve_expr(underlying, Placement::Direct, &declaration.position)?;
                if declaration.doc.is_empty() {
                    Ok(node.as_ref().clone())
                } else {
                    Ok(node.with_description(&declaration.doc))
                }
            }
            DeclarationKind::Struct(fields) => {
                let properties =
                    flatten::flatten_struct(self, &declaration.id, fields, Placement::Direct)?;
                Ok(SchemaNode::Object(ObjectNode {
                    description: declaration.doc.clone(),
                    properties,
                    discriminator_label: declaration.id.type_name().to_string(),
                }))
            }
            DeclarationKind::EnumSet { kind, values, mode } => enums::synthesize_enum(
                declaration,
                *kind,
                values,
                *mode,
                &self.config.description_separator,
            ),
            DeclarationKind::InterfaceUnion { implementations } => {
                let candidates = union::interface_candidates(declaration, implementations);
                self.synthesize_union(declaration, union::UnionKind::Interface, candidates)
            }
            DeclarationKind::AlternativeUnion { alternatives } => {
                let candidates = union::alternative_candidates(declaration, alternatives);
                self.synthesize_union(declaration, union::UnionKind::Alternative, candidates)
            }
        }
    }

    fn synthesize_union(
        &mut self,
        declaration: &'a Declaration,
        kind: union::UnionKind,
        candidates: Vec<union::Candidate<'a>>,
    ) -> SchemaResult<SchemaNode> {
        let (node, table) = union::synthesize_union(self, declaration, kind, candidates)?;
        self.dispatch.insert(declaration.id.clone(), table);
        Ok(SchemaNode::Union(node))
    }

    /// Resolve a type expression found at `site`
    pub(crate) fn resolve_expr(
        &mut self,
        expr: &'a TypeExpr,
        placement: Placement,
        site: &Position,
    ) -> SchemaResult<Arc<SchemaNode>> {
        match expr {
            TypeExpr::Builtin(kind) => Ok(Arc::new(SchemaNode::Property(PropertyNode::new(*kind)))),
            TypeExpr::Ident { path, name } => {
                let id = TypeIdentity::new(path.clone(), name.clone());
                let node = self.resolve_named(&id, Some(site))?;
                check_placement(&node, &id, placement, site)?;
                Ok(node)
            }
            TypeExpr::Pointer(inner) | TypeExpr::Group(inner) => {
                self.resolve_expr(inner, placement, site)
            }
            TypeExpr::Array(elem) => {
                let items = self.resolve_expr(elem, Placement::Nested(Nesting::Array), site)?;
                Ok(Arc::new(SchemaNode::Array(ArrayNode {
                    description: String::new(),
                    items,
                })))
            }
            TypeExpr::Map { value, .. } => match self.union_behind(value) {
                Some(union) => Err(SchemaError::IllegalUnionPlacement {
                    union: union.to_string(),
                    container: Nesting::Map,
                    position: site.clone(),
                }),
                None => Err(unsupported("map types are not representable", site)),
            },
            TypeExpr::Channel(_) => Err(unsupported("channel types are not representable", site)),
            TypeExpr::Func => Err(unsupported("function types are not representable", site)),
            TypeExpr::Interface { name } => Err(unsupported(
                format!("interface `{}` is not registered as a union", name),
                site,
            )),
            TypeExpr::InlineStruct(fields) => {
                let properties = flatten::flatten_inline(self, fields, site)?;
                Ok(Arc::new(SchemaNode::Object(ObjectNode {
                    description: String::new(),
                    properties,
                    discriminator_label: String::new(),
                })))
            }
        }
    }

    /// The union a type expression denotes, following pointers and definitions
    fn union_behind(&self, expr: &TypeExpr) -> Option<TypeIdentity> {
        let mut current = expr;
        for _ in 0..self.config.max_depth {
            match current {
                TypeExpr::Pointer(inner) | TypeExpr::Group(inner) => current = inner,
                TypeExpr::Ident { path, name } => {
                    let id = TypeIdentity::new(path.clone(), name.clone());
                    let declaration = self.source.get_declaration(&id)?;
                    match &declaration.kind {
                        DeclarationKind::Definition(underlying) => current = underlying,
                        kind if kind.is_union() => return Some(id),
                        _ => return None,
                    }
                }
                _ => return None,
            }
        }
        None
    }
}

fn check_placement(
    node: &SchemaNode,
    id: &TypeIdentity,
    placement: Placement,
    site: &Position,
) -> SchemaResult<()> {
    match placement {
        Placement::Nested(container) if node.is_union() => {
            Err(SchemaError::IllegalUnionPlacement {
                union: id.to_string(),
                container,
                position: site.clone(),
            })
        }
        _ => Ok(()),
    }
}

fn unsupported(detail: impl Into<String>, site: &Position) -> SchemaError {
    SchemaError::UnsupportedType {
        detail: detail.into(),
        position: site.clone(),
    }
}

/// Outcome of a resolution run
#[derive(Debug, Clone)]
pub struct Resolution {
    roots: Vec<TypeIdentity>,
    descriptions: BTreeMap<TypeIdentity, String>,
    store: SchemaStore,
    dispatch: Vec<DispatchTable>,
    failures: Vec<(TypeIdentity, SchemaError)>,
}

impl Resolution {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn get_schema(&self, id: &TypeIdentity) -> Option<Arc<SchemaNode>> {
        self.store.get(id)
    }

    /// Schemas of every root that resolved, in registration order.
    ///
    /// A root registered with a description carries it at the top level; the
    /// memoized schema of the type keeps its own documentation.
    pub fn root_schemas(&self) -> Vec<(TypeIdentity, Arc<SchemaNode>)> {
        self.roots
            .iter()
            .filter_map(|root| {
                let node = self.store.get(root)?;
                let node = match self.descriptions.get(root) {
                    Some(text) => Arc::new(node.with_description(text)),
                    None => node,
                };
                Some((root.clone(), node))
            })
            .collect()
    }

    /// Dispatch tables ordered by union identity
    pub fn dispatch_tables(&self) -> impl Iterator<Item = &DispatchTable> {
        self.dispatch.iter()
    }

    /// Roots that failed, with the first error of each
    pub fn failures(&self) -> &[(TypeIdentity, SchemaError)] {
        &self.failures
    }

    pub fn errors(&self) -> impl Iterator<Item = &SchemaError> {
        self.failures.iter().map(|(_, err)| err)
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }
}


#[cfg(test)]
#[path = "resolver/resolver_parameterized_tests.rs"]
mod resolver_parameterized_tests;
