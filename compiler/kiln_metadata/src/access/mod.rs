//! How generated code obtains a planned record.
//!
//! Canonical records defined in the requesting module are referenced
//! directly. Records that other modules may also prespecialize, and records
//! that only exist at runtime, go through a runtime request keyed by a
//! caching token.

use std::sync::Arc;

use crate::{CanonicalCache, MetadataDescriptor, TrailingFlags};

/// A runtime canonicalization request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeRequest {
    pub descriptor: Arc<MetadataDescriptor>,
    /// A build-time record exists and is passed to the runtime as a candidate.
    pub prespecialized: bool,
    /// Symbol of the once-token the runtime memoizes the result under.
    pub caching_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetadataAccess {
    /// Reference the record by address.
    Direct(Arc<MetadataDescriptor>),
    /// Ask the runtime for the canonical record.
    Runtime(RuntimeRequest),
}

impl MetadataAccess {
    /// Choose the access path for a planned record.
    pub(crate) fn for_descriptor(
        descriptor: Arc<MetadataDescriptor>,
        caching_token: String,
    ) -> Self {
        if !descriptor.is_canonical() {
            return MetadataAccess::Runtime(RuntimeRequest {
                descriptor,
                prespecialized: false,
                caching_token,
            });
        }
        let defined_here = descriptor.argument_count() == 0
            || descriptor
                .flags
                .contains(TrailingFlags::CANONICAL_STATIC_SPECIALIZATION);
        if defined_here {
            MetadataAccess::Direct(descriptor)
        } else {
            MetadataAccess::Runtime(RuntimeRequest {
                descriptor,
                prespecialized: true,
                caching_token,
            })
        }
    }

    pub fn descriptor(&self) -> &Arc<MetadataDescriptor> {
        match self {
            MetadataAccess::Direct(descriptor) => descriptor,
            MetadataAccess::Runtime(request) => &request.descriptor,
        }
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        matches!(self, MetadataAccess::Direct(_))
    }
}

/// Resolves runtime requests the way the runtime would: the first record
/// registered for a caching token becomes canonical for the process.
#[derive(Clone, Copy)]
pub struct CanonicalizationResolver<'c> {
    cache: &'c CanonicalCache,
}

impl<'c> CanonicalizationResolver<'c> {
    pub fn new(cache: &'c CanonicalCache) -> Self {
        CanonicalizationResolver { cache }
    }

    /// The canonical record for `request`.
    ///
    /// The record the declaring module emitted for the same symbol is
    /// preferred; otherwise the request's own descriptor is registered unless
    /// another request got there first.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(token = %request.caching_token, prespecialized = request.prespecialized)
    )]
    pub fn resolve(&self, request: &RuntimeRequest) -> Arc<MetadataDescriptor> {
        let descriptor = &request.descriptor;
        let owner = TrailingFlags::STATIC_SPECIALIZATION
            | TrailingFlags::CANONICAL_STATIC_SPECIALIZATION;
        let precomputed = self
            .cache
            .canonical(&descriptor.symbol, descriptor.target, owner);
        if let Some(shared) = precomputed {
            tracing::trace!("precomputed record");
            return self
                .cache
                .resolve_token(&request.caching_token, descriptor.target, || shared);
        }
        self.cache
            .resolve_token(&request.caching_token, descriptor.target, || {
                Arc::clone(descriptor)
            })
    }
}

#[cfg(test)]
mod tests;
