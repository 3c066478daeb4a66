//! Generic metadata prespecialization for Kiln.
//!
//! Given a generic type applied to concrete arguments, the [`Planner`]
//! decides whether the instantiation's runtime metadata can be emitted once
//! at build time and shared (canonical), or must be canonicalized by the
//! runtime on first use (instantiated). It also computes the metadata
//! record: value witness table, type descriptor, one argument slot per
//! generic parameter, field offsets and trailing flags.
//!
//! # Sharing
//!
//! Canonical descriptors live in a [`CanonicalCache`] and structurally
//! identical requests receive the same `Arc`. Instantiated descriptors are
//! built fresh per planning call; the runtime path goes through a
//! [`CanonicalizationResolver`], which memoizes the first result per
//! caching token.

mod access;
mod cache;
mod descriptor;
mod error;
mod mangle;
mod planner;
pub mod render;
mod stack;

pub use access::{CanonicalizationResolver, MetadataAccess, RuntimeRequest};
pub use cache::CanonicalCache;
pub use descriptor::{
    ArgumentRefs, MetadataDescriptor, MetadataKind, SizeClass, TrailingFlags, ValueWitnessTable,
};
pub use error::PlanError;
pub use mangle::{Mangler, MANGLE_PREFIX};
pub use planner::{Planner, PlannerConfig, DEFAULT_MAX_DEPTH};
pub use stack::ensure_sufficient_stack;
