//! Metadata specialization planning.
//!
//! # Algorithm
//!
//! Planning a [`BoundType`] first plans each argument, then decides where
//! the record lives:
//!
//! | Declaration | Arguments | Result |
//! |-------------|-----------|--------|
//! | non-generic | none | canonical, no trailing flags |
//! | generic, this module | canonical | canonical, `STATIC \| CANONICAL_STATIC` |
//! | generic, other module, public | canonical | canonical, `STATIC`, runtime lookup |
//! | anything else | | instantiated at runtime |
//!
//! Canonical records are interned in the [`CanonicalCache`] by symbol and
//! trailing flags, so every request for the same instantiation from the same
//! side of its module boundary receives the same `Arc`.
//! Instantiated records are built fresh for each planning call.
//!
//! # Cycle Detection
//!
//! A session keeps the instantiations currently being planned. Meeting one
//! again means its layout contains itself by value; references through
//! [`TypeRef::Indirect`] have pointer layout and are not followed. Nesting
//! that grows without repeating is stopped by the depth limit.

mod layout;

use std::sync::Arc;

use kiln_ir::Name;
use kiln_types::{BoundType, DeclKind, DeclTable, Layout, TargetInfo, TypeDecl, TypeRef};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::descriptor::{field_offset_words, trailing_flag_words, HEADER_WORDS};
use crate::{
    ensure_sufficient_stack, ArgumentRefs, CanonicalCache, Mangler, MetadataAccess,
    MetadataDescriptor, MetadataKind, PlanError, SizeClass, TrailingFlags, ValueWitnessTable,
};

use self::layout::{enum_layout, struct_layout};

/// Default bound on nested planning.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Maximum planning depth across arguments and stored fields.
    pub max_depth: usize,
    pub target: TargetInfo,
    /// Module requesting the metadata. Canonical records of its own generic
    /// types are referenced directly.
    pub module: Name,
}

impl PlannerConfig {
    pub fn for_module(module: Name) -> Self {
        PlannerConfig {
            module,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetInfo) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            target: TargetInfo::default(),
            module: Name::EMPTY,
        }
    }
}

/// Plans metadata records against one declaration table.
pub struct Planner<'a> {
    table: &'a DeclTable,
    config: PlannerConfig,
    cache: &'a CanonicalCache,
    mangler: Mangler,
}

impl<'a> Planner<'a> {
    /// Planner sharing canonical records through the process-wide cache.
    pub fn new(table: &'a DeclTable, config: PlannerConfig) -> Self {
        Self::with_cache(table, config, CanonicalCache::global())
    }

    pub fn with_cache(
        table: &'a DeclTable,
        config: PlannerConfig,
        cache: &'a CanonicalCache,
    ) -> Self {
        Planner {
            table,
            config,
            cache,
            mangler: Mangler::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &'a CanonicalCache {
        self.cache
    }

    #[inline]
    pub fn table(&self) -> &'a DeclTable {
        self.table
    }

    /// Plan the metadata record of `ty`.
    ///
    /// # Errors
    ///
    /// Fails on wrong arity anywhere in `ty`, on a layout that contains
    /// itself by value, and when nesting exceeds `max_depth`. Failure aborts
    /// only this call.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %self.table.display(ty)))]
    pub fn plan(&self, ty: &BoundType) -> Result<Arc<MetadataDescriptor>, PlanError> {
        let mut session = Session::new(self);
        let descriptor = session.plan(ty)?;
        tracing::debug!(
            symbol = %descriptor.symbol,
            class = descriptor.size_class.as_str(),
            planned = session.memo.len(),
            "planned"
        );
        Ok(descriptor)
    }

    /// Plan `ty` and choose how generated code reaches its record.
    ///
    /// # Errors
    ///
    /// Same as [`Planner::plan`].
    pub fn access(&self, ty: &BoundType) -> Result<MetadataAccess, PlanError> {
        let descriptor = self.plan(ty)?;
        let token = self.mangler.caching_token(self.table, ty);
        Ok(MetadataAccess::for_descriptor(descriptor, token))
    }
}

/// State of one planning call.
///
/// Structurally equal instantiations met during the call share one record,
/// even when they are not canonical.
struct Session<'p, 'a> {
    planner: &'p Planner<'a>,
    memo: FxHashMap<BoundType, Arc<MetadataDescriptor>>,
    in_progress: FxHashSet<BoundType>,
    depth: usize,
}

impl<'p, 'a> Session<'p, 'a> {
    fn new(planner: &'p Planner<'a>) -> Self {
        Session {
            planner,
            memo: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            depth: 0,
        }
    }

    fn plan(&mut self, ty: &BoundType) -> Result<Arc<MetadataDescriptor>, PlanError> {
        if let Some(hit) = self.memo.get(ty) {
            return Ok(Arc::clone(hit));
        }

        let table = self.planner.table;
        let decl = table.get(ty.decl).ok_or(PlanError::UnknownDecl { id: ty.decl.raw() })?;
        if decl.arity() != ty.args.len() {
            return Err(PlanError::ArityMismatch {
                ty: table.qualified_name(ty.decl),
                expected: decl.arity(),
                found: ty.args.len(),
                span: decl.span,
            });
        }
        if self.depth >= self.planner.config.max_depth {
            return Err(PlanError::RecursionLimitExceeded {
                ty: table.display(ty),
                limit: self.planner.config.max_depth,
                span: decl.span,
            });
        }
        if !self.in_progress.insert(ty.clone()) {
            return Err(PlanError::CyclicLayout {
                ty: table.display(ty),
                span: decl.span,
            });
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.build(decl, ty));
        self.depth -= 1;
        self.in_progress.remove(ty);

        let descriptor = result?;
        self.memo.insert(ty.clone(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    fn build(
        &mut self,
        decl: &'a TypeDecl,
        ty: &BoundType,
    ) -> Result<Arc<MetadataDescriptor>, PlanError> {
        let planner = self.planner;
        let target = planner.config.target;

        let mut arguments = ArgumentRefs::with_capacity(ty.args.len());
        for arg in &ty.args {
            arguments.push(self.plan(arg)?);
        }
        let args_class = arguments
            .iter()
            .fold(SizeClass::Canonical, |class, arg| class.join(arg.size_class));
        let (size_class, flags) = self.placement(decl, args_class);

        let symbol = planner.mangler.metadata(planner.table, ty);
        if size_class == SizeClass::Canonical {
            if let Some(shared) = planner.cache.canonical(&symbol, target, flags) {
                tracing::trace!(%symbol, "canonical cache hit");
                return Ok(shared);
            }
        }

        let (layout, field_offsets) = self.value_layout(decl, &ty.args)?;
        let witness_symbol = planner.mangler.value_witnesses(planner.table, ty, layout);
        let value_witnesses = planner.cache.intern_witnesses(&witness_symbol, target, || {
            ValueWitnessTable {
                symbol: witness_symbol.clone(),
                layout,
            }
        });

        let mut extra_data_words = field_offset_words(field_offsets.len(), target);
        if !flags.is_empty() {
            extra_data_words += trailing_flag_words(target);
        }

        let descriptor = MetadataDescriptor {
            ty: ty.clone(),
            symbol: symbol.clone(),
            target,
            kind: if decl.kind.is_enum() {
                MetadataKind::Enum
            } else {
                MetadataKind::Struct
            },
            size_class,
            value_witnesses,
            type_descriptor: planner.mangler.type_descriptor(planner.table, decl.id),
            offset_to_first_field: HEADER_WORDS + arguments.len(),
            argument_references: arguments,
            flags,
            field_offsets,
            extra_data_words,
            layout,
        };
        tracing::trace!(%symbol, class = size_class.as_str(), %layout, "built record");

        Ok(match size_class {
            SizeClass::Canonical => {
                planner
                    .cache
                    .intern_canonical(&symbol, target, flags, || descriptor)
            }
            SizeClass::Instantiated => Arc::new(descriptor),
        })
    }

    /// Where the record of `decl` applied to the planned arguments lives.
    fn placement(&self, decl: &TypeDecl, args: SizeClass) -> (SizeClass, TrailingFlags) {
        if !decl.is_generic() {
            return (SizeClass::Canonical, TrailingFlags::empty());
        }
        if args == SizeClass::Instantiated {
            return (SizeClass::Instantiated, TrailingFlags::empty());
        }
        if decl.module == self.planner.config.module {
            (
                SizeClass::Canonical,
                TrailingFlags::STATIC_SPECIALIZATION
                    | TrailingFlags::CANONICAL_STATIC_SPECIALIZATION,
            )
        } else if decl.visibility.is_exported() {
            (SizeClass::Canonical, TrailingFlags::STATIC_SPECIALIZATION)
        } else {
            (SizeClass::Instantiated, TrailingFlags::empty())
        }
    }

    /// Layout of values of `decl` with parameters bound to `env`, and the
    /// byte offset of each stored field.
    fn value_layout(
        &mut self,
        decl: &'a TypeDecl,
        env: &[BoundType],
    ) -> Result<(Layout, Vec<u32>), PlanError> {
        let target = self.planner.config.target;
        match decl.kind {
            DeclKind::Builtin(scalar) => Ok((scalar.resolve(target), Vec::new())),
            DeclKind::Struct => {
                let mut fields = Vec::with_capacity(decl.stored.len());
                for member in &decl.stored {
                    fields.push(self.field_layout(&member.ty, env)?);
                }
                let (layout, offsets) = struct_layout(&fields);
                let offsets = offsets
                    .into_iter()
                    .map(|offset| {
                        u32::try_from(offset).map_err(|_| {
                            PlanError::Internal(format!(
                                "field offset {offset} does not fit in 32 bits"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((layout, offsets))
            }
            DeclKind::Enum => {
                let mut empty_cases = 0;
                let mut payloads = Vec::new();
                for case in &decl.cases {
                    if case.payload.is_empty() {
                        empty_cases += 1;
                        continue;
                    }
                    let mut elements = Vec::with_capacity(case.payload.len());
                    for ty in &case.payload {
                        elements.push(self.field_layout(ty, env)?);
                    }
                    payloads.push(struct_layout(&elements).0);
                }
                Ok((enum_layout(empty_cases, &payloads), Vec::new()))
            }
        }
    }

    fn field_layout(&mut self, ty: &TypeRef, env: &[BoundType]) -> Result<Layout, PlanError> {
        if let TypeRef::Indirect(_) = ty {
            return Ok(self.planner.config.target.pointer_layout());
        }
        let bound = substitute(ty, env)?;
        Ok(self.plan(&bound)?.layout)
    }
}

/// Replace generic parameters in `ty` with `env`.
///
/// Indirection only matters for storage, so it is dropped from arguments.
fn substitute(ty: &TypeRef, env: &[BoundType]) -> Result<BoundType, PlanError> {
    match ty {
        TypeRef::Param(index) => usize::try_from(*index)
            .ok()
            .and_then(|i| env.get(i))
            .cloned()
            .ok_or_else(|| PlanError::Internal(format!("unbound generic parameter #{index}"))),
        TypeRef::Named { decl, args } => {
            let args = args
                .iter()
                .map(|arg| substitute(arg, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BoundType::new(*decl, args))
        }
        TypeRef::Indirect(inner) => substitute(inner, env),
    }
}
