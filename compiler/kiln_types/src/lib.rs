//! Declaration table for Kiln.
//!
//! Holds every type declaration of a compilation unit: structs, enums and
//! builtin leaf types, their generic parameters, stored members, enum cases,
//! nested declarations and declared conformances. The conformance
//! synthesizer and the metadata planner both read from a [`DeclTable`] and
//! never mutate it.
//!
//! # Design
//!
//! - Dense storage: declarations live in a `Vec`, addressed by [`DeclId`]
//! - Name index: `(module, parent, name)` → `DeclId` for O(1) lookup
//! - Declarations are validated on insertion, so downstream passes can
//!   assume every `TypeRef` resolves

mod bound;
mod decl;
mod layout;
mod table;

pub use bound::{BoundType, GenericArgs};
pub use decl::{
    DeclId, DeclKind, DeclSpec, EnumCase, GenericParam, MemberSig, MemberSigKind, NestedKind,
    NestedMember, StoredMember, TypeDecl, TypeRef, Visibility,
};
pub use layout::{align_to, Layout, ScalarLayout, TargetInfo};
pub use table::{DeclError, DeclTable};
