use nova_lambda::{
    check_lambda, Expr, LambdaCheckConfig, LambdaChecker, LambdaParam, LambdaParams, LambdaShape,
    Stmt, LAMBDA_PARAMS, LAMBDA_RETURN,
};
use nova_types::{ClassId, Diagnostic, Severity, Span, Type, TypeStore};
use pretty_assertions::assert_eq;

use super::support::{expr_types, generic, integer, named, string};

#[test]
fn compatible_lambda_has_no_diagnostics() {
    let store = TypeStore::with_minimal_jdk();
    // Function<String, Integer> f = s -> s.length();
    let target = generic(
        &store,
        "java.util.function.Function",
        vec![string(&store), integer(&store)],
    );
    let lambda = LambdaShape::expression(
        LambdaParams::Implicit(vec![LambdaParam::new("s", string(&store))]),
        Expr::statement(0),
    );
    let types = expr_types(&[(0, Type::int())]);

    let diags = check_lambda(&store, &target, &lambda, &types, &LambdaCheckConfig::default());
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn return_mismatch_is_rendered_with_code_and_span() {
    let store = TypeStore::with_minimal_jdk();
    // Supplier<String> s = () -> 42;
    let target = generic(&store, "java.util.function.Supplier", vec![string(&store)]);
    let lambda = LambdaShape::expression(LambdaParams::Implicit(vec![]), Expr::value(0));
    let types = expr_types(&[(0, Type::int())]);

    let checker = LambdaChecker::new(&store, LambdaCheckConfig::default());
    let diags = checker.check(&target, &lambda, &types, Some(Span::new(20, 28)));
    assert_eq!(
        diags,
        vec![Diagnostic::error(
            LAMBDA_RETURN,
            "Bad return type in lambda expression: int cannot be converted to String",
            Some(Span::new(20, 28)),
        )]
    );
    assert_eq!(diags[0].severity, Severity::Error);
}

#[test]
fn explicit_parameter_mismatch_is_reported() {
    let store = TypeStore::with_minimal_jdk();
    // Predicate<String> p = (Integer i) -> true;
    let target = generic(&store, "java.util.function.Predicate", vec![string(&store)]);
    let lambda = LambdaShape::expression(
        LambdaParams::Explicit(vec![LambdaParam::new("i", integer(&store))]),
        Expr::value(0),
    );
    let types = expr_types(&[(0, Type::boolean())]);

    let diags = check_lambda(&store, &target, &lambda, &types, &LambdaCheckConfig::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, LAMBDA_PARAMS);
    assert_eq!(
        diags[0].message,
        "Incompatible parameter types in lambda expression: expected String but found Integer"
    );
}

#[test]
fn target_errors_use_per_variant_codes() {
    let mut store = TypeStore::with_minimal_jdk();
    let empty = store.upsert_class(nova_types::ClassDef {
        name: "com.example.Empty".to_string(),
        kind: nova_types::ClassKind::Interface,
        type_params: vec![],
        super_class: None,
        interfaces: vec![],
        methods: vec![],
    });
    let lambda = LambdaShape::block(LambdaParams::Implicit(vec![]), vec![]);
    let types = expr_types(&[]);
    let config = LambdaCheckConfig::default();

    let cases = [
        (string(&store), "LAMBDA_NOT_INTERFACE"),
        (Type::class(empty, vec![]), "LAMBDA_NO_TARGET_METHOD"),
        (named(&store, "java.util.List"), "LAMBDA_AMBIGUOUS_METHODS"),
        (Type::int(), "LAMBDA_NOT_FUNCTIONAL"),
    ];
    for (target, code) in cases {
        let diags = check_lambda(&store, &target, &lambda, &types, &config);
        assert_eq!(
            diags.iter().map(|d| d.code).collect::<Vec<_>>(),
            vec![code]
        );
    }
}

#[test]
fn deferred_and_internal_targets_produce_no_diagnostics() {
    let mut store = TypeStore::with_minimal_jdk();
    let t = store.add_type_param("T", vec![]);
    let lambda = LambdaShape::block(
        LambdaParams::Implicit(vec![]),
        vec![Stmt::Return(Some(Expr::value(0)))],
    );
    let types = expr_types(&[(0, Type::int())]);
    let config = LambdaCheckConfig::default();

    assert!(check_lambda(&store, &Type::TypeVar(t), &lambda, &types, &config).is_empty());
    let dangling = Type::class(ClassId::from_raw(4_096), vec![]);
    assert!(check_lambda(&store, &dangling, &lambda, &types, &config).is_empty());
}

#[test]
fn diagnostics_serialize_for_clients() {
    let store = TypeStore::with_minimal_jdk();
    let target = named(&store, "java.lang.Runnable");
    let lambda = LambdaShape::block(
        LambdaParams::Implicit(vec![]),
        vec![Stmt::Return(Some(Expr::value(0)))],
    );
    let types = expr_types(&[(0, Type::int())]);

    let checker = LambdaChecker::new(&store, LambdaCheckConfig::default());
    let diags = checker.check(&target, &lambda, &types, Some(Span::new(0, 3)));
    let json = serde_json::to_value(&diags).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "severity": "error",
            "code": "LAMBDA_RETURN",
            "message": "Unexpected return value",
            "span": { "start": 0, "end": 3 },
        }])
    );
}
