//! JSON manifests describing a program's declarations.
//!
//! ```json
//! {
//!   "module": "Main",
//!   "declarations": [
//!     { "module": "Argument", "name": "Integer", "kind": "builtin", "layout": "word" },
//!     { "module": "Argument", "name": "TwoArgument", "kind": "struct",
//!       "visibility": "public", "generics": ["First", "Second"],
//!       "fields": [{ "name": "first", "type": "First" },
//!                  { "name": "second", "type": "Second" }] },
//!     { "name": "Broken", "kind": "enum", "conforms": ["Codable"],
//!       "nested": [{ "value": "CodingKeys" }] }
//!   ],
//!   "plan": ["Argument.TwoArgument<Argument.Integer, Argument.Integer>"]
//! }
//! ```
//!
//! Declarations are entered in order, so a type may refer only to itself and
//! to declarations listed before it. Each declaration's span is the position
//! of its name in the manifest text, so diagnostics point into the file.

mod types;

use std::path::{Path, PathBuf};

use kiln_ir::{Name, Span, StringLookup};
use kiln_types::{
    BoundType, DeclId, DeclSpec, DeclTable, EnumCase, Layout, MemberSigKind, ScalarLayout,
    StoredMember, TargetInfo, TypeRef, Visibility,
};
use serde::Deserialize;

pub use types::{parse_type, TypeExpr};

use crate::DriverError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Module requesting metadata; also the default module of declarations.
    pub module: String,
    /// Pointer width in bits.
    #[serde(default)]
    pub target: Option<u32>,
    pub declarations: Vec<DeclEntry>,
    /// Instantiations to plan.
    #[serde(default)]
    pub plan: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclEntry {
    pub name: String,
    pub kind: KindEntry,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub visibility: VisibilityEntry,
    #[serde(default)]
    pub generics: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    #[serde(default)]
    pub cases: Vec<CaseEntry>,
    #[serde(default)]
    pub conforms: Vec<String>,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
    #[serde(default)]
    pub nested: Vec<NestedEntry>,
    /// Layout of a builtin.
    #[serde(default)]
    pub layout: Option<LayoutEntry>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindEntry {
    Struct,
    Enum,
    Builtin,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityEntry {
    Public,
    #[default]
    Internal,
    Private,
}

impl From<VisibilityEntry> for Visibility {
    fn from(entry: VisibilityEntry) -> Self {
        match entry {
            VisibilityEntry::Public => Visibility::Public,
            VisibilityEntry::Internal => Visibility::Internal,
            VisibilityEntry::Private => Visibility::Private,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// The field has an initial value.
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseEntry {
    pub name: String,
    #[serde(default)]
    pub payload: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKindEntry {
    Property,
    Initializer,
    Method,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberEntry {
    pub name: String,
    pub kind: MemberKindEntry,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NestedEntry {
    /// A non-type binding, like `static let CodingKeys = 5`.
    Value { value: String },
    Type(Box<DeclEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LayoutEntry {
    Named(NamedLayout),
    Fixed {
        size: u64,
        align: u32,
        #[serde(default)]
        extra_inhabitants: u32,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedLayout {
    Word,
    Pointer,
}

impl From<&LayoutEntry> for ScalarLayout {
    fn from(entry: &LayoutEntry) -> Self {
        match *entry {
            LayoutEntry::Named(NamedLayout::Word) => ScalarLayout::Word,
            LayoutEntry::Named(NamedLayout::Pointer) => ScalarLayout::Pointer,
            LayoutEntry::Fixed {
                size,
                align,
                extra_inhabitants,
            } => ScalarLayout::Fixed(
                Layout::new(size, align).with_extra_inhabitants(extra_inhabitants),
            ),
        }
    }
}

/// A loaded manifest: the declaration table plus what to do with it.
pub struct Program {
    pub path: PathBuf,
    /// Manifest text, which spans point into.
    pub source: String,
    pub table: DeclTable,
    pub module: Name,
    pub target: TargetInfo,
    /// Planning requests with their manifest spelling.
    pub requests: Vec<(String, BoundType)>,
}

impl Manifest {
    pub fn parse(path: &Path, text: &str) -> Result<Self, DriverError> {
        serde_json::from_str(text).map_err(|source| DriverError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read and build the manifest at `path`.
pub fn load(path: &Path) -> Result<Program, DriverError> {
    let source = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = Manifest::parse(path, &source)?;
    build(path, source, &manifest)
}

/// Enter every declaration of `manifest` into a fresh table and resolve its
/// planning requests.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn build(path: &Path, source: String, manifest: &Manifest) -> Result<Program, DriverError> {
    let target = match manifest.target {
        None => TargetInfo::default(),
        Some(bits) => TargetInfo::from_pointer_width(bits)
            .ok_or_else(|| DriverError::Manifest(format!("unsupported target width {bits}")))?,
    };

    let mut table = DeclTable::new(kiln_ir::SharedInterner::new());
    let module = table.intern(&manifest.module);
    let mut builder = Builder {
        table: &mut table,
        locator: NameLocator::new(&source),
    };
    for entry in &manifest.declarations {
        let entry_module = match &entry.module {
            Some(name) => builder.table.intern(name),
            None => module,
        };
        builder.declare(entry_module, None, entry)?;
    }

    let mut requests = Vec::with_capacity(manifest.plan.len());
    for text in &manifest.plan {
        let expr = parse_type(text).map_err(DriverError::Manifest)?;
        let ty = resolve_bound(&table, module, &expr)?;
        requests.push((text.clone(), ty));
    }
    tracing::debug!(
        declarations = table.len(),
        requests = requests.len(),
        "manifest loaded"
    );

    Ok(Program {
        path: path.to_path_buf(),
        source,
        table,
        module,
        target,
        requests,
    })
}

/// Resolve a planning request: every path names a declaration.
pub fn resolve_bound(
    table: &DeclTable,
    module: Name,
    expr: &TypeExpr,
) -> Result<BoundType, DriverError> {
    match expr {
        TypeExpr::Path { path, args } => {
            let decl = lookup_path(table, module, None, path).ok_or_else(|| {
                DriverError::Manifest(format!("unknown type `{}`", path.join(".")))
            })?;
            let args = args
                .iter()
                .map(|arg| resolve_bound(table, module, arg))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BoundType::new(decl, args))
        }
        TypeExpr::Indirect(_) => Err(DriverError::Manifest(format!(
            "`{expr}`: indirection is a storage property and cannot be planned"
        ))),
    }
}

fn lookup_path(
    table: &DeclTable,
    module: Name,
    parent: Option<DeclId>,
    path: &[String],
) -> Option<DeclId> {
    if let [name] = path {
        let name = table.intern(name);
        // Innermost enclosing scope first.
        let mut scope = parent;
        while let Some(id) = scope {
            if let Some(found) = table.lookup_nested(id, name) {
                return Some(found);
            }
            scope = table.get(id).and_then(|decl| decl.parent);
        }
        return table.lookup(module, name);
    }
    let joined = path.join(".");
    table.lookup_qualified(&joined).or_else(|| {
        let module_name = table.interner().lookup(module).to_owned();
        table.lookup_qualified(&format!("{module_name}.{joined}"))
    })
}

/// Scope a declaration's member types resolve in.
struct Scope<'e> {
    module: Name,
    parent: Option<DeclId>,
    name: &'e str,
    id: DeclId,
    generics: &'e [String],
}

struct Builder<'t, 's> {
    table: &'t mut DeclTable,
    locator: NameLocator<'s>,
}

impl Builder<'_, '_> {
    fn declare(
        &mut self,
        module: Name,
        parent: Option<DeclId>,
        entry: &DeclEntry,
    ) -> Result<DeclId, DriverError> {
        let span = self.locator.locate(&entry.name);
        let next = u32::try_from(self.table.len())
            .map_err(|_| DriverError::Manifest("too many declarations".to_owned()))?;
        let scope = Scope {
            module,
            parent,
            name: &entry.name,
            id: DeclId::from_raw(next),
            generics: &entry.generics,
        };

        let name = self.table.intern(&entry.name);
        let mut spec = match entry.kind {
            KindEntry::Struct => DeclSpec::structure(name),
            KindEntry::Enum => DeclSpec::enumeration(name),
            KindEntry::Builtin => {
                let layout = entry.layout.as_ref().ok_or_else(|| {
                    DriverError::Manifest(format!("builtin `{}` needs a layout", entry.name))
                })?;
                DeclSpec::builtin(name, layout.into())
            }
        }
        .at(span);

        if entry.kind != KindEntry::Builtin {
            spec = spec.with_visibility(entry.visibility.into());
        }
        for param in &entry.generics {
            spec = spec.with_generic(self.table.intern(param));
        }
        for field in &entry.fields {
            let ty = self.resolve(&scope, &field.ty)?;
            spec = spec.with_stored(StoredMember {
                name: self.table.intern(&field.name),
                ty,
                has_default: field.default,
                span,
            });
        }
        for case in &entry.cases {
            let payload = case
                .payload
                .iter()
                .map(|ty| self.resolve(&scope, ty))
                .collect::<Result<Vec<_>, _>>()?;
            spec = spec.with_enum_case(EnumCase {
                name: self.table.intern(&case.name),
                payload,
                span,
            });
        }
        for protocol in &entry.conforms {
            spec = spec.conforming_to(self.table.intern(protocol));
        }
        for member in &entry.members {
            let kind = match member.kind {
                MemberKindEntry::Property => MemberSigKind::Property,
                MemberKindEntry::Initializer => MemberSigKind::Initializer,
                MemberKindEntry::Method => MemberSigKind::Method,
            };
            spec = spec.with_member(self.table.intern(&member.name), kind);
        }

        let id = match parent {
            Some(parent) => self.table.declare_nested(parent, spec)?,
            None => self.table.declare(module, spec)?,
        };

        for nested in &entry.nested {
            match nested {
                NestedEntry::Value { value } => {
                    let span = self.locator.locate_value(value);
                    let name = self.table.intern(value);
                    self.table.declare_value(id, name, span)?;
                }
                NestedEntry::Type(inner) => {
                    self.declare(module, Some(id), inner)?;
                }
            }
        }
        Ok(id)
    }

    fn resolve(&self, scope: &Scope<'_>, text: &str) -> Result<TypeRef, DriverError> {
        let expr = parse_type(text).map_err(DriverError::Manifest)?;
        self.resolve_expr(scope, &expr)
    }

    fn resolve_expr(&self, scope: &Scope<'_>, expr: &TypeExpr) -> Result<TypeRef, DriverError> {
        match expr {
            TypeExpr::Indirect(inner) => Ok(TypeRef::indirect(self.resolve_expr(scope, inner)?)),
            TypeExpr::Path { path, args } => {
                if let [single] = path.as_slice() {
                    if let Some(index) = scope.generics.iter().position(|p| p == single) {
                        if !args.is_empty() {
                            return Err(DriverError::Manifest(format!(
                                "generic parameter `{single}` cannot take arguments"
                            )));
                        }
                        let index = u32::try_from(index).map_err(|_| {
                            DriverError::Manifest("too many generic parameters".to_owned())
                        })?;
                        return Ok(TypeRef::Param(index));
                    }
                }
                let decl = if path.len() == 1 && path[0] == scope.name {
                    scope.id
                } else {
                    lookup_path(self.table, scope.module, scope.parent, path).ok_or_else(|| {
                        DriverError::Manifest(format!(
                            "unknown type `{}` in `{}`",
                            path.join("."),
                            scope.name
                        ))
                    })?
                };
                let args = args
                    .iter()
                    .map(|arg| self.resolve_expr(scope, arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeRef::applied(decl, args))
            }
        }
    }
}

/// Finds declaration names in manifest text, scanning forward so that
/// repeated names resolve to successive occurrences.
struct NameLocator<'s> {
    text: &'s str,
    cursor: usize,
}

impl<'s> NameLocator<'s> {
    fn new(text: &'s str) -> Self {
        NameLocator { text, cursor: 0 }
    }

    /// Span of the next `"name": "<name>"` value.
    fn locate(&mut self, name: &str) -> Span {
        self.find_keyed("name", name)
    }

    /// Span of the next `"value": "<name>"` value.
    fn locate_value(&mut self, name: &str) -> Span {
        self.find_keyed("value", name)
    }

    fn find_keyed(&mut self, key: &str, value: &str) -> Span {
        let key = format!("\"{key}\"");
        let quoted = format!("\"{value}\"");
        let mut from = self.cursor;
        while let Some(found) = self.text[from..].find(&key) {
            let after_key = from + found + key.len();
            let rest = self.text[after_key..].trim_start();
            if let Some(rest) = rest.strip_prefix(':') {
                let rest_trimmed = rest.trim_start();
                if rest_trimmed.starts_with(&quoted) {
                    let start = self.text.len() - rest_trimmed.len();
                    self.cursor = start + quoted.len();
                    return span_of(start, self.cursor);
                }
            }
            from = after_key;
        }
        Span::DUMMY
    }
}

fn span_of(start: usize, end: usize) -> Span {
    match (u32::try_from(start), u32::try_from(end)) {
        (Ok(start), Ok(end)) => Span::new(start, end),
        _ => Span::DUMMY,
    }
}

#[cfg(test)]
mod tests;
