use super::*;
use crate::{Planner, PlannerConfig};
use kiln_ir::SharedInterner;
use kiln_types::{BoundType, DeclId, DeclSpec, DeclTable, ScalarLayout, TypeRef, Visibility};
use pretty_assertions::assert_eq;

struct Fixture {
    table: DeclTable,
    main: kiln_ir::Name,
    integer: DeclId,
    exported: DeclId,
    internal: DeclId,
}

fn fixture() -> Fixture {
    let mut table = DeclTable::new(SharedInterner::new());
    let main = table.intern("Main");
    let lib = table.intern("Lib");
    let integer = table
        .declare(lib, DeclSpec::builtin(table.intern("Integer"), ScalarLayout::Word))
        .unwrap();
    let exported = table
        .declare(
            lib,
            DeclSpec::structure(table.intern("Shared"))
                .with_generic(table.intern("T"))
                .with_field(table.intern("value"), TypeRef::Param(0))
                .with_visibility(Visibility::Public),
        )
        .unwrap();
    let internal = table
        .declare(
            lib,
            DeclSpec::structure(table.intern("Hidden"))
                .with_generic(table.intern("T"))
                .with_field(table.intern("value"), TypeRef::Param(0)),
        )
        .unwrap();
    Fixture {
        table,
        main,
        integer,
        exported,
        internal,
    }
}

fn runtime(access: MetadataAccess) -> RuntimeRequest {
    match access {
        MetadataAccess::Runtime(request) => request,
        MetadataAccess::Direct(d) => panic!("expected a runtime request for {}", d.symbol),
    }
}

#[test]
fn prespecialized_request_resolves_to_the_shared_record() {
    let f = fixture();
    let cache = CanonicalCache::new();
    let planner = Planner::with_cache(&f.table, PlannerConfig::for_module(f.main), &cache);
    let ty = BoundType::new(f.exported, vec![BoundType::leaf(f.integer)]);

    let request = runtime(planner.access(&ty).unwrap());
    assert!(request.prespecialized);

    let resolver = CanonicalizationResolver::new(&cache);
    let resolved = resolver.resolve(&request);
    assert!(Arc::ptr_eq(&resolved, &request.descriptor));
    let d = &request.descriptor;
    let stored = cache.canonical(&d.symbol, d.target, d.flags).unwrap();
    assert!(Arc::ptr_eq(&resolved, &stored));
}

#[test]
fn client_request_resolves_to_the_declaring_module_record() {
    let f = fixture();
    let cache = CanonicalCache::new();
    let lib = f.table.intern("Lib");
    let ty = BoundType::new(f.exported, vec![BoundType::leaf(f.integer)]);

    let owned = Planner::with_cache(&f.table, PlannerConfig::for_module(lib), &cache)
        .plan(&ty)
        .unwrap();
    let request = runtime(
        Planner::with_cache(&f.table, PlannerConfig::for_module(f.main), &cache)
            .access(&ty)
            .unwrap(),
    );
    assert_eq!(request.descriptor.flags, TrailingFlags::STATIC_SPECIALIZATION);
    assert!(!Arc::ptr_eq(&request.descriptor, &owned));

    let resolved = CanonicalizationResolver::new(&cache).resolve(&request);
    assert!(Arc::ptr_eq(&resolved, &owned));
}

#[test]
fn runtime_instantiation_is_memoized_by_token() {
    let f = fixture();
    let cache = CanonicalCache::new();
    let planner = Planner::with_cache(&f.table, PlannerConfig::for_module(f.main), &cache);
    let ty = BoundType::new(f.internal, vec![BoundType::leaf(f.integer)]);
    let resolver = CanonicalizationResolver::new(&cache);

    let first = runtime(planner.access(&ty).unwrap());
    let second = runtime(planner.access(&ty).unwrap());
    assert!(!first.prespecialized);
    assert!(!Arc::ptr_eq(&first.descriptor, &second.descriptor));
    assert_eq!(first.caching_token, second.caching_token);

    let a = resolver.resolve(&first);
    let b = resolver.resolve(&second);
    assert!(Arc::ptr_eq(&a, &first.descriptor));
    assert!(Arc::ptr_eq(&b, &first.descriptor));
    assert_eq!(cache.resolved_len(), 1);
}

#[test]
fn distinct_instantiations_resolve_separately() {
    let f = fixture();
    let cache = CanonicalCache::new();
    let planner = Planner::with_cache(&f.table, PlannerConfig::for_module(f.main), &cache);
    let resolver = CanonicalizationResolver::new(&cache);

    let inner = BoundType::new(f.internal, vec![BoundType::leaf(f.integer)]);
    let outer = BoundType::new(f.internal, vec![inner.clone()]);
    let a = resolver.resolve(&runtime(planner.access(&inner).unwrap()));
    let b = resolver.resolve(&runtime(planner.access(&outer).unwrap()));
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(cache.resolved_len(), 2);
}

#[test]
fn accessor_descriptor() {
    let f = fixture();
    let cache = CanonicalCache::new();
    let planner = Planner::with_cache(&f.table, PlannerConfig::for_module(f.main), &cache);
    let access = planner.access(&BoundType::leaf(f.integer)).unwrap();
    assert!(access.is_direct());
    assert_eq!(access.descriptor().symbol, "_kn_Lib$Integer$N");
}

#[test]
fn concurrent_resolution_converges() {
    use rayon::prelude::*;

    let f = fixture();
    let cache = CanonicalCache::new();
    let ty = BoundType::new(f.internal, vec![BoundType::leaf(f.integer)]);

    let resolved: Vec<_> = (0..64)
        .into_par_iter()
        .map(|_| {
            let planner = Planner::with_cache(&f.table, PlannerConfig::for_module(f.main), &cache);
            let request = runtime(planner.access(&ty).unwrap());
            CanonicalizationResolver::new(&cache).resolve(&request)
        })
        .collect();
    for d in &resolved {
        assert!(Arc::ptr_eq(d, &resolved[0]));
    }
}
