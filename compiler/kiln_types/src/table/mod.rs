//! The declaration table.
//!
//! `DeclTable` owns every [`TypeDecl`] of a compilation unit and hands out
//! shared references to the synthesizer and the planner.
//!
//! # Design
//!
//! - Dense storage: `Vec<TypeDecl>` indexed by `DeclId`
//! - Path index: `(module, parent, name)` → `DeclId` for O(1) lookup
//! - Qualified index: `BTreeMap` of `Module.Outer.Inner` strings for sorted
//!   iteration and lookup from textual manifests
//! - Insertion validates every `TypeRef`, so readers never see a dangling
//!   reference or an out-of-range parameter

use std::collections::BTreeMap;
use std::fmt;

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_ir::{Name, SharedInterner, Span};
use rustc_hash::FxHashMap;

use crate::decl::{DeclId, DeclSpec, NestedKind, NestedMember, TypeDecl, TypeRef};
use crate::BoundType;

/// Contract violations detected while building a table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeclError {
    #[error("`{name}` is declared more than once")]
    Duplicate {
        name: String,
        span: Span,
        previous: Span,
    },

    #[error("reference to unknown declaration #{id}")]
    UnknownDecl { id: u32, span: Span },

    #[error("generic parameter {index} is out of range for `{decl}`, which has {count}")]
    ParamOutOfRange {
        decl: String,
        index: u32,
        count: usize,
        span: Span,
    },

    #[error("`{module}` is not a valid module name")]
    InvalidModuleName { module: String, span: Span },

    #[error("`{decl}` expects {expected} generic argument(s) but {found} were given")]
    ArgumentCount {
        decl: String,
        expected: usize,
        found: usize,
        span: Span,
    },
}

impl DeclError {
    pub fn span(&self) -> Span {
        match self {
            DeclError::Duplicate { span, .. }
            | DeclError::UnknownDecl { span, .. }
            | DeclError::ParamOutOfRange { span, .. }
            | DeclError::InvalidModuleName { span, .. }
            | DeclError::ArgumentCount { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DeclError::Duplicate { .. } => ErrorCode::E1001,
            DeclError::UnknownDecl { .. } => ErrorCode::E1002,
            DeclError::ParamOutOfRange { .. } => ErrorCode::E1003,
            DeclError::InvalidModuleName { .. } => ErrorCode::E1004,
            DeclError::ArgumentCount { .. } => ErrorCode::E3001,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let span = self.span();
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            DeclError::Duplicate { previous, .. } => diag
                .with_label(span, "redeclared here")
                .with_secondary_label(previous, "first declared here"),
            DeclError::UnknownDecl { .. } => diag.with_label(span, "not declared"),
            DeclError::ParamOutOfRange { .. } => diag.with_label(span, "no such parameter"),
            DeclError::InvalidModuleName { .. } => {
                diag.with_label(span, "declared in this module")
            }
            DeclError::ArgumentCount { .. } => diag.with_label(span, "wrong number of arguments"),
        }
    }
}

/// Lookup key: a name is unique within its module and enclosing declaration.
type DeclPath = (Name, Option<DeclId>, Name);

/// Table of all declarations in a compilation unit.
#[derive(Clone)]
pub struct DeclTable {
    interner: SharedInterner,
    decls: Vec<TypeDecl>,
    by_path: FxHashMap<DeclPath, DeclId>,
    by_qualified: BTreeMap<String, DeclId>,
}

impl DeclTable {
    pub fn new(interner: SharedInterner) -> Self {
        DeclTable {
            interner,
            decls: Vec::new(),
            by_path: FxHashMap::default(),
            by_qualified: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Intern a string with this table's interner.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Register a top-level declaration in `module`.
    ///
    /// `module` must be an identifier: it is the first component of every
    /// qualified name and symbol derived from the declaration.
    pub fn declare(&mut self, module: Name, spec: DeclSpec) -> Result<DeclId, DeclError> {
        let module_name = self.interner.lookup(module);
        if !is_identifier(module_name) {
            return Err(DeclError::InvalidModuleName {
                module: module_name.to_owned(),
                span: spec.span,
            });
        }
        if let Some(&existing) = self.by_path.get(&(module, None, spec.name)) {
            return Err(self.duplicate(spec.name, spec.span, self.decls[existing.index()].span));
        }
        self.insert(module, None, spec)
    }

    /// Register a declaration nested in `parent`, such as a keys enum.
    pub fn declare_nested(&mut self, parent: DeclId, spec: DeclSpec) -> Result<DeclId, DeclError> {
        let (module, previous) = {
            let owner = self.get(parent).ok_or(DeclError::UnknownDecl {
                id: parent.raw(),
                span: spec.span,
            })?;
            (owner.module, owner.nested_named(spec.name).map(|m| m.span))
        };
        if let Some(previous) = previous {
            return Err(self.duplicate(spec.name, spec.span, previous));
        }

        let name = spec.name;
        let span = spec.span;
        let id = self.insert(module, Some(parent), spec)?;
        self.decls[parent.index()].nested.push(NestedMember {
            name,
            kind: NestedKind::Type(id),
            span,
        });
        Ok(id)
    }

    /// Record a non-type binding nested in `parent`.
    pub fn declare_value(
        &mut self,
        parent: DeclId,
        name: Name,
        span: Span,
    ) -> Result<(), DeclError> {
        let owner = self.decls.get(parent.index()).ok_or(DeclError::UnknownDecl {
            id: parent.raw(),
            span,
        })?;
        if let Some(previous) = owner.nested_named(name) {
            return Err(self.duplicate(name, span, previous.span));
        }
        self.decls[parent.index()].nested.push(NestedMember {
            name,
            kind: NestedKind::Value,
            span,
        });
        Ok(())
    }

    fn insert(
        &mut self,
        module: Name,
        parent: Option<DeclId>,
        spec: DeclSpec,
    ) -> Result<DeclId, DeclError> {
        let raw = u32::try_from(self.decls.len()).map_err(|_| DeclError::UnknownDecl {
            id: u32::MAX,
            span: spec.span,
        })?;
        let id = DeclId::from_raw(raw);

        // A declaration may refer to itself, so validate against the id it
        // is about to receive.
        let arity = spec.generic_params.len();
        let field_types = spec
            .stored
            .iter()
            .map(|m| (&m.ty, m.span))
            .chain(spec.cases.iter().flat_map(|c| c.payload.iter().map(move |t| (t, c.span))));
        for (ty, span) in field_types {
            self.validate_ref(ty, id, spec.name, arity, span)?;
        }

        let mut qualified = match parent {
            Some(parent) => self.qualified_name(parent),
            None => self.interner.lookup(module).to_owned(),
        };
        qualified.push('.');
        qualified.push_str(self.interner.lookup(spec.name));
        if let Some(&existing) = self.by_qualified.get(&qualified) {
            return Err(self.duplicate(spec.name, spec.span, self.decls[existing.index()].span));
        }
        tracing::trace!(decl = %qualified, kind = spec.kind.as_str(), "declared");

        self.by_path.insert((module, parent, spec.name), id);
        self.by_qualified.insert(qualified, id);
        self.decls.push(TypeDecl {
            id,
            name: spec.name,
            module,
            parent,
            kind: spec.kind,
            generic_params: spec.generic_params,
            stored: spec.stored,
            cases: spec.cases,
            nested: Vec::new(),
            conformances: spec.conformances,
            interface: spec.interface,
            visibility: spec.visibility,
            span: spec.span,
        });
        Ok(id)
    }

    fn validate_ref(
        &self,
        ty: &TypeRef,
        self_id: DeclId,
        self_name: Name,
        self_arity: usize,
        span: Span,
    ) -> Result<(), DeclError> {
        match ty {
            TypeRef::Param(index) => {
                if (*index as usize) < self_arity {
                    Ok(())
                } else {
                    Err(DeclError::ParamOutOfRange {
                        decl: self.interner.lookup(self_name).to_owned(),
                        index: *index,
                        count: self_arity,
                        span,
                    })
                }
            }
            TypeRef::Named { decl, args } => {
                let (expected, name) = if *decl == self_id {
                    (self_arity, self.interner.lookup(self_name).to_owned())
                } else {
                    let target = self.get(*decl).ok_or(DeclError::UnknownDecl {
                        id: decl.raw(),
                        span,
                    })?;
                    (target.arity(), self.qualified_name(*decl))
                };
                if expected != args.len() {
                    return Err(DeclError::ArgumentCount {
                        decl: name,
                        expected,
                        found: args.len(),
                        span,
                    });
                }
                args.iter().try_for_each(|arg| {
                    self.validate_ref(arg, self_id, self_name, self_arity, span)
                })
            }
            TypeRef::Indirect(inner) => {
                self.validate_ref(inner, self_id, self_name, self_arity, span)
            }
        }
    }

    fn duplicate(&self, name: Name, span: Span, previous: Span) -> DeclError {
        DeclError::Duplicate {
            name: self.interner.lookup(name).to_owned(),
            span,
            previous,
        }
    }

    // === Lookup ===

    #[inline]
    pub fn get(&self, id: DeclId) -> Option<&TypeDecl> {
        self.decls.get(id.index())
    }

    /// Look up a top-level declaration by module and name.
    #[inline]
    pub fn lookup(&self, module: Name, name: Name) -> Option<DeclId> {
        self.by_path.get(&(module, None, name)).copied()
    }

    /// Look up a nested type declaration.
    #[inline]
    pub fn lookup_nested(&self, parent: DeclId, name: Name) -> Option<DeclId> {
        let module = self.get(parent)?.module;
        self.by_path.get(&(module, Some(parent), name)).copied()
    }

    /// Look up by qualified path, e.g. `Main.Outer.CodingKeys`.
    pub fn lookup_qualified(&self, path: &str) -> Option<DeclId> {
        self.by_qualified.get(path).copied()
    }

    /// Unqualified name of a declaration.
    pub fn name(&self, id: DeclId) -> &str {
        self.get(id).map_or("<unknown>", |d| self.interner.lookup(d.name))
    }

    /// Module-qualified name, including enclosing declarations.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let Some(decl) = self.get(id) else {
            return "<unknown>".to_owned();
        };
        let prefix = match decl.parent {
            Some(parent) => self.qualified_name(parent),
            None => self.interner.lookup(decl.module).to_owned(),
        };
        format!("{prefix}.{}", self.interner.lookup(decl.name))
    }

    /// Render an instantiation as source-like text: `Pair<Int, Double>`.
    pub fn display(&self, ty: &BoundType) -> String {
        let mut out = String::new();
        self.write_bound(&mut out, ty);
        out
    }

    fn write_bound(&self, out: &mut String, ty: &BoundType) {
        out.push_str(self.name(ty.decl));
        if ty.args.is_empty() {
            return;
        }
        out.push('<');
        for (i, arg) in ty.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_bound(out, arg);
        }
        out.push('>');
    }

    // === Iteration ===

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.iter()
    }

    /// Qualified names and ids in sorted order.
    pub fn iter_qualified(&self) -> impl Iterator<Item = (&str, DeclId)> {
        self.by_qualified.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

/// Letters, digits and `_`, not starting with a digit.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Debug for DeclTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclTable")
            .field("decls", &self.by_qualified)
            .finish_non_exhaustive()
    }
}
