//! Parameter and return compatibility between a lambda and its resolved target method.

use std::collections::{HashMap, HashSet};

use nova_types::{
    format_type, is_assignable, types_equal, Substitutor, Type, TypeEnv, WildcardBound,
};

use crate::{ExprId, LambdaBody, LambdaShape, MethodSignature};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterMismatch {
    /// The lambda declares a different number of parameters than the target method.
    Arity { expected: usize, found: usize },
    /// First position whose type does not fit. `expected` is the target parameter type after
    /// substitution, `found` the lambda's parameter type.
    Parameter {
        index: usize,
        expected: Type,
        found: Type,
    },
}

impl ParameterMismatch {
    pub fn message(&self, env: &dyn TypeEnv) -> String {
        match self {
            ParameterMismatch::Arity { expected, found } => format!(
                "Incompatible parameter types in lambda expression: wrong number of parameters: expected {expected} but found {found}"
            ),
            ParameterMismatch::Parameter {
                expected, found, ..
            } => format!(
                "Incompatible parameter types in lambda expression: expected {} but found {}",
                format_type(env, expected),
                format_type(env, found)
            ),
        }
    }
}

/// Compare the lambda's parameter list with `target`'s, under `substitutor`.
///
/// Explicitly typed parameters must match the substituted target type exactly. For implicitly
/// typed parameters the target type only needs to be assignable to the type bound by the
/// argument context (an [`Type::Unknown`] binding accepts anything). The first offending
/// position is reported.
pub fn check_parameters(
    env: &dyn TypeEnv,
    lambda: &LambdaShape,
    target: &MethodSignature,
    substitutor: &Substitutor,
) -> Option<ParameterMismatch> {
    let params = lambda.params();
    if params.len() != target.params.len() {
        return Some(ParameterMismatch::Arity {
            expected: target.params.len(),
            found: params.len(),
        });
    }

    let explicit = lambda.has_explicit_types();
    for (index, (param, target_ty)) in params.iter().zip(target.params.iter()).enumerate() {
        let expected = ground(env, substitutor.substitute(target_ty));
        let compatible = if explicit {
            types_equal(&param.ty, &expected)
        } else {
            is_assignable(env, &expected, &param.ty)
        };
        if !compatible {
            return Some(ParameterMismatch::Parameter {
                index,
                expected,
                found: param.ty.clone(),
            });
        }
    }

    None
}

/// A lambda parameter can't have a wildcard type; use the wildcard's bound instead.
fn ground(env: &dyn TypeEnv, ty: Type) -> Type {
    match ty {
        Type::Wildcard(WildcardBound::Extends(bound) | WildcardBound::Super(bound)) => *bound,
        Type::Wildcard(WildcardBound::Unbounded) => Type::class(env.well_known().object, vec![]),
        other => other,
    }
}

/// Expressions currently being typed by one top-level check.
///
/// A guard is created per [`check_return`] call and passed down to [`ExprTypes::expr_type`];
/// re-entering an expression that is already on the stack yields no type instead of recursing.
#[derive(Debug, Default)]
pub struct RecursionGuard {
    active: HashSet<ExprId>,
}

impl RecursionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with `key` marked as in progress. Returns `None` if `key` is already in progress.
    pub fn compute<T>(
        &mut self,
        key: ExprId,
        f: impl FnOnce(&mut RecursionGuard) -> Option<T>,
    ) -> Option<T> {
        if !self.active.insert(key) {
            tracing::trace!(
                target: "nova.lambda",
                expr = key.to_raw(),
                "recursive expression typing; treating type as unknown"
            );
            return None;
        }
        let result = f(self);
        self.active.remove(&key);
        result
    }

    pub fn is_active(&self, key: ExprId) -> bool {
        self.active.contains(&key)
    }
}

/// Expression typing, supplied by the caller's inference engine.
pub trait ExprTypes {
    /// Type of `expr`, or `None` when it cannot be computed. Implementations that type nested
    /// lambdas should route through `guard` so self-referential bodies terminate.
    fn expr_type(&self, expr: ExprId, guard: &mut RecursionGuard) -> Option<Type>;
}

impl ExprTypes for HashMap<ExprId, Type> {
    fn expr_type(&self, expr: ExprId, guard: &mut RecursionGuard) -> Option<Type> {
        guard.compute(expr, |_| self.get(&expr).cloned())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LambdaDiagnostic {
    /// `void` target, block body returning a value.
    UnexpectedReturnValue,
    /// `found` is `None` when the expression type is unknown.
    BadReturnType { found: Option<Type>, expected: Type },
    MissingReturnValue,
}

impl LambdaDiagnostic {
    pub fn message(&self, env: &dyn TypeEnv) -> String {
        match self {
            LambdaDiagnostic::UnexpectedReturnValue => "Unexpected return value".to_string(),
            LambdaDiagnostic::BadReturnType { found, expected } => {
                let found = match found {
                    None | Some(Type::Null) => "<null>".to_string(),
                    Some(ty) => format_type(env, ty),
                };
                format!(
                    "Bad return type in lambda expression: {found} cannot be converted to {}",
                    format_type(env, expected)
                )
            }
            LambdaDiagnostic::MissingReturnValue => "Missing return value".to_string(),
        }
    }
}

/// Check the lambda body against the target method's return type.
///
/// `target_return` is `None` when the target could not be resolved; nothing is reported then.
pub fn check_return(
    env: &dyn TypeEnv,
    lambda: &LambdaShape,
    target_return: Option<&Type>,
    types: &dyn ExprTypes,
) -> Option<LambdaDiagnostic> {
    let mut guard = RecursionGuard::new();
    check_return_guarded(env, lambda, target_return, types, &mut guard)
}

/// [`check_return`] for callers that are already inside a guarded computation (e.g. checking a
/// lambda nested in another lambda's body).
pub fn check_return_guarded(
    env: &dyn TypeEnv,
    lambda: &LambdaShape,
    target_return: Option<&Type>,
    types: &dyn ExprTypes,
    guard: &mut RecursionGuard,
) -> Option<LambdaDiagnostic> {
    let expected = target_return?;

    if *expected == Type::Void {
        return match &lambda.body {
            LambdaBody::Block(_) => (!lambda.return_expressions().is_empty())
                .then_some(LambdaDiagnostic::UnexpectedReturnValue),
            LambdaBody::Expression(expr) if !expr.statement_shaped => {
                Some(LambdaDiagnostic::BadReturnType {
                    found: types.expr_type(expr.id, guard),
                    expected: Type::Void,
                })
            }
            LambdaBody::Expression(_) => None,
        };
    }

    let returns = lambda.return_expressions();
    for expr in &returns {
        let Some(found) = types.expr_type(expr.id, guard) else {
            continue;
        };
        if !is_assignable(env, &found, expected) {
            return Some(LambdaDiagnostic::BadReturnType {
                found: Some(found),
                expected: expected.clone(),
            });
        }
    }

    let missing = lambda.return_statement_count() > returns.len()
        || (returns.is_empty() && !lambda.void_compatible)
        || (matches!(lambda.body, LambdaBody::Block(_)) && lambda.can_complete_normally());
    missing.then_some(LambdaDiagnostic::MissingReturnValue)
}
