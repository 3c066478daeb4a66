//! Type declarations stored in the [`DeclTable`](crate::DeclTable).

use kiln_ir::{Name, Span};

use crate::layout::ScalarLayout;

/// Dense index of a declaration inside its table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        DeclId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Reference to a type from inside a declaration.
///
/// Field types are written against the enclosing declaration's generic
/// parameters; the planner substitutes concrete arguments for `Param`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// The enclosing declaration's generic parameter at this position.
    Param(u32),

    /// A declared type, possibly applied to arguments.
    Named { decl: DeclId, args: Vec<TypeRef> },

    /// A type stored out of line behind a single pointer.
    Indirect(Box<TypeRef>),
}

impl TypeRef {
    /// A named type with no generic arguments.
    #[inline]
    pub fn named(decl: DeclId) -> Self {
        TypeRef::Named {
            decl,
            args: Vec::new(),
        }
    }

    #[inline]
    pub fn applied(decl: DeclId, args: Vec<TypeRef>) -> Self {
        TypeRef::Named { decl, args }
    }

    #[inline]
    pub fn indirect(inner: TypeRef) -> Self {
        TypeRef::Indirect(Box::new(inner))
    }

    /// The declaration at the head of this reference, looking through
    /// indirection. `None` for generic parameters.
    pub fn head(&self) -> Option<DeclId> {
        match self {
            TypeRef::Param(_) => None,
            TypeRef::Named { decl, .. } => Some(*decl),
            TypeRef::Indirect(inner) => inner.head(),
        }
    }

    pub fn is_param(&self) -> bool {
        matches!(self, TypeRef::Param(_))
    }
}

/// Visibility of a declaration across module boundaries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible to every module.
    Public,

    /// Visible within the defining module.
    #[default]
    Internal,

    /// Visible within the enclosing declaration.
    Private,
}

impl Visibility {
    /// Whether metadata for this declaration may be shared with other modules.
    #[inline]
    pub fn is_exported(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// What a declaration is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Struct,
    Enum,
    /// A leaf type with a layout fixed by the target.
    Builtin(ScalarLayout),
}

impl DeclKind {
    #[inline]
    pub fn is_enum(&self) -> bool {
        matches!(self, DeclKind::Enum)
    }

    #[inline]
    pub fn is_struct(&self) -> bool {
        matches!(self, DeclKind::Struct)
    }

    #[inline]
    pub fn is_builtin(&self) -> bool {
        matches!(self, DeclKind::Builtin(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Builtin(_) => "builtin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericParam {
    pub name: Name,
    pub span: Span,
}

/// A stored property of a struct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoredMember {
    pub name: Name,
    pub ty: TypeRef,
    /// The member has an initial value, so decoding may leave it out.
    pub has_default: bool,
    pub span: Span,
}

/// A case of an enum, with its associated values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumCase {
    pub name: Name,
    pub payload: Vec<TypeRef>,
    pub span: Span,
}

/// A member nested inside another declaration's body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NestedMember {
    pub name: Name,
    pub kind: NestedKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NestedKind {
    /// A nested type declaration, itself stored in the table.
    Type(DeclId),

    /// A non-type binding such as `let CodingKeys = 5`.
    Value,
}

/// Kind of a declared interface member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberSigKind {
    Property,
    Initializer,
    Method,
}

/// A declared (non-stored) interface member, identified by its full name,
/// e.g. `stringValue` or `init(intValue:)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberSig {
    pub name: Name,
    pub kind: MemberSigKind,
}

/// A registered type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDecl {
    pub id: DeclId,
    pub name: Name,
    /// Module the declaration belongs to.
    pub module: Name,
    /// Enclosing declaration for nested types.
    pub parent: Option<DeclId>,
    pub kind: DeclKind,
    pub generic_params: Vec<GenericParam>,
    pub stored: Vec<StoredMember>,
    pub cases: Vec<EnumCase>,
    pub nested: Vec<NestedMember>,
    /// Protocol names listed in the declaration's inheritance clause.
    pub conformances: Vec<Name>,
    pub interface: Vec<MemberSig>,
    pub visibility: Visibility,
    pub span: Span,
}

impl TypeDecl {
    #[inline]
    pub fn arity(&self) -> usize {
        self.generic_params.len()
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }

    /// Find a nested member by name.
    pub fn nested_named(&self, name: Name) -> Option<&NestedMember> {
        self.nested.iter().find(|member| member.name == name)
    }

    pub fn stored_named(&self, name: Name) -> Option<&StoredMember> {
        self.stored.iter().find(|member| member.name == name)
    }

    pub fn case_named(&self, name: Name) -> Option<&EnumCase> {
        self.cases.iter().find(|case| case.name == name)
    }

    /// Whether the inheritance clause lists `protocol`.
    #[inline]
    pub fn declares(&self, protocol: Name) -> bool {
        self.conformances.contains(&protocol)
    }

    /// Whether the interface declares a member with this name and kind.
    pub fn has_member(&self, name: Name, kind: MemberSigKind) -> bool {
        self.interface
            .iter()
            .any(|sig| sig.name == name && sig.kind == kind)
    }
}

/// Builder for a declaration before it is inserted into a table.
///
/// The table assigns the id, module and parent on insertion.
#[derive(Clone, Debug)]
pub struct DeclSpec {
    pub name: Name,
    pub kind: DeclKind,
    pub generic_params: Vec<GenericParam>,
    pub stored: Vec<StoredMember>,
    pub cases: Vec<EnumCase>,
    pub conformances: Vec<Name>,
    pub interface: Vec<MemberSig>,
    pub visibility: Visibility,
    pub span: Span,
}

impl DeclSpec {
    fn new(name: Name, kind: DeclKind) -> Self {
        DeclSpec {
            name,
            kind,
            generic_params: Vec::new(),
            stored: Vec::new(),
            cases: Vec::new(),
            conformances: Vec::new(),
            interface: Vec::new(),
            visibility: Visibility::default(),
            span: Span::DUMMY,
        }
    }

    pub fn structure(name: Name) -> Self {
        Self::new(name, DeclKind::Struct)
    }

    pub fn enumeration(name: Name) -> Self {
        Self::new(name, DeclKind::Enum)
    }

    /// A builtin leaf; builtins are always public.
    pub fn builtin(name: Name, layout: ScalarLayout) -> Self {
        Self::new(name, DeclKind::Builtin(layout)).with_visibility(Visibility::Public)
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_generic(mut self, name: Name) -> Self {
        self.generic_params.push(GenericParam {
            name,
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: Name, ty: TypeRef) -> Self {
        self.stored.push(StoredMember {
            name,
            ty,
            has_default: false,
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn with_stored(mut self, member: StoredMember) -> Self {
        self.stored.push(member);
        self
    }

    #[must_use]
    pub fn with_case(mut self, name: Name) -> Self {
        self.cases.push(EnumCase {
            name,
            payload: Vec::new(),
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn with_enum_case(mut self, case: EnumCase) -> Self {
        self.cases.push(case);
        self
    }

    #[must_use]
    pub fn conforming_to(mut self, protocol: Name) -> Self {
        self.conformances.push(protocol);
        self
    }

    #[must_use]
    pub fn with_member(mut self, name: Name, kind: MemberSigKind) -> Self {
        self.interface.push(MemberSig { name, kind });
        self
    }
}

#[cfg(test)]
mod tests;
