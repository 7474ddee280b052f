use nova_lambda::{
    check_parameters, resolve_functional, Expr, FunctionalTarget, LambdaParam, LambdaParams,
    LambdaShape, MethodSignature, ParameterMismatch, ResolvedSam,
};
use nova_types::{MethodDef, MethodKind, PrimitiveType, Substitutor, Type, TypeStore};
use pretty_assertions::assert_eq;

use super::support::{generic, integer, named, string};

/// A target method `void accept(int, String)`.
fn int_string_target(store: &TypeStore) -> MethodSignature {
    let owner = store.class_id("java.lang.Runnable").unwrap();
    MethodSignature::from_def(
        owner,
        &MethodDef {
            name: "accept".to_string(),
            type_params: vec![],
            params: vec![Type::int(), string(store)],
            return_type: Type::Void,
            kind: MethodKind::Abstract,
        },
        &Substitutor::new(),
    )
}

fn lambda(params: LambdaParams) -> LambdaShape {
    LambdaShape::expression(params, Expr::statement(0))
}

fn sam(store: &TypeStore, target: &Type) -> ResolvedSam {
    match resolve_functional(store, target) {
        Ok(FunctionalTarget::Sam(sam)) => sam,
        other => panic!("expected a functional target, got {other:?}"),
    }
}

#[test]
fn implicit_parameters_accept_assignable_context() {
    let store = TypeStore::with_minimal_jdk();
    let target = int_string_target(&store);

    let bound = lambda(LambdaParams::Implicit(vec![
        LambdaParam::new("x", Type::int()),
        LambdaParam::new("y", string(&store)),
    ]));
    assert_eq!(
        check_parameters(&store, &bound, &target, &Substitutor::new()),
        None
    );

    let unbound = lambda(LambdaParams::Implicit(vec![
        LambdaParam::new("x", Type::Unknown),
        LambdaParam::new("y", Type::Unknown),
    ]));
    assert_eq!(
        check_parameters(&store, &unbound, &target, &Substitutor::new()),
        None
    );
}

#[test]
fn explicit_parameters_require_exact_types() {
    let store = TypeStore::with_minimal_jdk();
    let target = int_string_target(&store);

    let explicit = lambda(LambdaParams::Explicit(vec![
        LambdaParam::new("x", string(&store)),
        LambdaParam::new("y", string(&store)),
    ]));
    let mismatch = check_parameters(&store, &explicit, &target, &Substitutor::new());
    assert_eq!(
        mismatch,
        Some(ParameterMismatch::Parameter {
            index: 0,
            expected: Type::int(),
            found: string(&store),
        })
    );
    assert_eq!(
        mismatch.unwrap().message(&store),
        "Incompatible parameter types in lambda expression: expected int but found String"
    );

    // `long` would accept an `int` argument, but explicit types are exact-match only.
    let widened = lambda(LambdaParams::Explicit(vec![
        LambdaParam::new("x", Type::Primitive(PrimitiveType::Long)),
        LambdaParam::new("y", string(&store)),
    ]));
    assert!(matches!(
        check_parameters(&store, &widened, &target, &Substitutor::new()),
        Some(ParameterMismatch::Parameter { index: 0, .. })
    ));
}

#[test]
fn implicit_parameter_with_incompatible_binding_is_reported() {
    let store = TypeStore::with_minimal_jdk();
    let target = int_string_target(&store);

    let lambda = lambda(LambdaParams::Implicit(vec![
        LambdaParam::new("x", Type::int()),
        LambdaParam::new("y", Type::boolean()),
    ]));
    assert!(matches!(
        check_parameters(&store, &lambda, &target, &Substitutor::new()),
        Some(ParameterMismatch::Parameter { index: 1, .. })
    ));
}

#[test]
fn wrong_arity_is_reported_for_both_forms() {
    let store = TypeStore::with_minimal_jdk();
    let target = int_string_target(&store);

    for params in [
        LambdaParams::Implicit(vec![LambdaParam::new("x", Type::Unknown)]),
        LambdaParams::Explicit(vec![]),
    ] {
        let found = params.len();
        assert_eq!(
            check_parameters(&store, &lambda(params), &target, &Substitutor::new()),
            Some(ParameterMismatch::Arity { expected: 2, found })
        );
    }
}

#[test]
fn target_parameters_are_substituted_with_type_arguments() {
    let store = TypeStore::with_minimal_jdk();
    let target = generic(
        &store,
        "java.util.function.BiFunction",
        vec![string(&store), integer(&store), string(&store)],
    );
    let sam = sam(&store, &target);

    let explicit = lambda(LambdaParams::Explicit(vec![
        LambdaParam::new("s", string(&store)),
        LambdaParam::new("i", integer(&store)),
    ]));
    assert_eq!(
        check_parameters(&store, &explicit, &sam.signature, &sam.substitutor),
        None
    );

    let swapped = lambda(LambdaParams::Explicit(vec![
        LambdaParam::new("i", integer(&store)),
        LambdaParam::new("s", string(&store)),
    ]));
    assert!(check_parameters(&store, &swapped, &sam.signature, &sam.substitutor).is_some());
}

#[test]
fn wildcard_target_parameter_matches_its_bound() {
    let store = TypeStore::with_minimal_jdk();
    let target = generic(
        &store,
        "java.util.function.Consumer",
        vec![Type::wildcard_super(integer(&store))],
    );
    let sam = sam(&store, &target);

    let explicit = lambda(LambdaParams::Explicit(vec![LambdaParam::new(
        "n",
        integer(&store),
    )]));
    assert_eq!(
        check_parameters(
            &store,
            &explicit,
            &sam.signature,
            &sam.ground_substitutor(&store)
        ),
        None
    );

    let object = lambda(LambdaParams::Explicit(vec![LambdaParam::new(
        "o",
        named(&store, "java.lang.Object"),
    )]));
    assert!(check_parameters(
        &store,
        &object,
        &sam.signature,
        &sam.ground_substitutor(&store)
    )
    .is_some());
}
