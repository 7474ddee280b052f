use nova_lambda::{
    resolve_functional, FunctionalError, FunctionalResolver, FunctionalTarget, LambdaCheckConfig,
};
use nova_types::{ClassId, Type, TypeEnv, TypeStore, WildcardBound};
use pretty_assertions::assert_eq;

use super::support::{abstract_method, integer, interface};

/// `interface Container<T extends Number> { void fill(<param>); }`
fn container(store: &mut TypeStore, name: &str, param: impl FnOnce(Type) -> Type) -> ClassId {
    let number = Type::class(store.well_known().number, vec![]);
    let t = store.add_type_param("T", vec![number]);
    let method = abstract_method("fill", vec![param(Type::TypeVar(t))], Type::Void);
    interface(store, name, vec![t], vec![], vec![method])
}

fn unbounded() -> Type {
    Type::Wildcard(WildcardBound::Unbounded)
}

#[test]
fn wildcard_not_mentioned_by_parameters_cannot_be_instantiated() {
    let mut store = TypeStore::with_minimal_jdk();
    let class = container(&mut store, "com.example.Container", |_| Type::int());
    let target = Type::class(class, vec![unbounded()]);

    let err = resolve_functional(&store, &target).unwrap_err();
    assert_eq!(
        err,
        FunctionalError::UnresolvedTypeArguments("Container<?>".to_string())
    );
    assert_eq!(
        err.to_string(),
        "No instance of type Container<?> exists so that lambda expression can be type-checked"
    );
}

#[test]
fn wildcard_used_as_parameter_type_resolves() {
    let mut store = TypeStore::with_minimal_jdk();
    let class = container(&mut store, "com.example.Container", |t| t);
    let target = Type::class(class, vec![unbounded()]);

    let Ok(FunctionalTarget::Sam(sam)) = resolve_functional(&store, &target) else {
        panic!("expected a functional target");
    };
    // Grounded to the declared bound.
    assert_eq!(
        sam.parameter_types(&store),
        vec![Type::class(store.well_known().number, vec![])]
    );
}

#[test]
fn nested_mention_counts_as_constraint() {
    let mut store = TypeStore::with_minimal_jdk();
    let list = store.class_id("java.util.List").unwrap();
    let class = container(&mut store, "com.example.Container", |t| {
        Type::class(list, vec![Type::wildcard_extends(t)])
    });

    let target = Type::class(class, vec![unbounded()]);
    assert!(matches!(
        resolve_functional(&store, &target),
        Ok(FunctionalTarget::Sam(_))
    ));
}

#[test]
fn concrete_and_bounded_arguments_are_not_existential() {
    let mut store = TypeStore::with_minimal_jdk();
    let class = container(&mut store, "com.example.Container", |_| Type::int());
    let i = integer(&store);

    for arg in [i.clone(), Type::wildcard_extends(i)] {
        let target = Type::class(class, vec![arg]);
        assert!(matches!(
            resolve_functional(&store, &target),
            Ok(FunctionalTarget::Sam(_))
        ));
    }
}

#[test]
fn unbounded_type_parameter_with_wildcard_is_fine() {
    let store = TypeStore::with_minimal_jdk();
    let supplier = store.class_id("java.util.function.Supplier").unwrap();
    let target = Type::class(supplier, vec![unbounded()]);

    let Ok(FunctionalTarget::Sam(sam)) = resolve_functional(&store, &target) else {
        panic!("expected a functional target");
    };
    assert_eq!(
        sam.return_type(&store),
        Type::class(store.well_known().object, vec![])
    );
}

#[test]
fn generic_method_is_reported_before_existential_problem() {
    let mut store = TypeStore::with_minimal_jdk();
    let number = Type::class(store.well_known().number, vec![]);
    let t = store.add_type_param("T", vec![number]);
    let u = store.add_type_param("U", vec![]);
    let class = interface(
        &mut store,
        "com.example.GenericContainer",
        vec![t],
        vec![],
        vec![nova_types::MethodDef {
            type_params: vec![u],
            ..abstract_method("fill", vec![Type::TypeVar(u)], Type::Void)
        }],
    );

    assert_eq!(
        resolve_functional(&store, &Type::class(class, vec![unbounded()])),
        Err(FunctionalError::GenericMethodTarget)
    );
}

#[test]
fn check_can_be_disabled_through_config() {
    let mut store = TypeStore::with_minimal_jdk();
    let class = container(&mut store, "com.example.Container", |_| Type::int());
    let target = Type::class(class, vec![unbounded()]);
    let config = LambdaCheckConfig {
        report_unresolved_type_arguments: false,
        ..LambdaCheckConfig::default()
    };

    let resolved = FunctionalResolver::new(&store)
        .with_config(&config)
        .resolve(&target);
    assert!(matches!(resolved, Ok(FunctionalTarget::Sam(_))));
}
