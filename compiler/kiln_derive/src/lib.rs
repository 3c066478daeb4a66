//! Conformance synthesis for derivable protocols.
//!
//! A type that lists `Encodable`, `Decodable` or `Codable` in its
//! inheritance clause gets its conformance synthesized from its shape. The
//! synthesis depends on a nested keys holder (`CodingKeys`), which must be an
//! enum conforming to the key protocol (`CodingKey`).
//!
//! [`synthesize`] answers one (declaration, requirement) pair with a
//! [`ConformanceResult`]. Failure carries every unmet structural predicate as
//! a [`DiagnosticReason`]; reasons are independent and additive. Rendering
//! those reasons as diagnostics lives in [`report`].

mod predicate;
mod protocol;
mod reason;
pub mod report;
mod synthesize;

pub use predicate::{KeyPredicate, KeysCandidate, PredicateOutcome, KEY_PREDICATES};
pub use protocol::{DerivableProtocol, DerivableProtocolRequirement, KeyProtocol};
pub use reason::{DiagnosticReason, ReasonKind};
pub use synthesize::{
    requested_requirements, synthesize, synthesize_all, ConformanceResult, Synthesis,
};
