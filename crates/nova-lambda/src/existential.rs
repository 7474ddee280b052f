use nova_types::{mentions_type_var, ClassDef, Substitutor, Type, TypeEnv};

use crate::MethodSignature;

/// Does an unbounded wildcard argument leave the functional method under-constrained?
///
/// For every type parameter of `class_def` that declares a bound and is instantiated with `?`,
/// at least one parameter type of `candidate` must mention it; otherwise no single type can stand
/// in for the captured wildcard (`Container<?>` where `Container<T extends Number>` has a method
/// `void run()`). The first unconstrained parameter decides the answer.
pub fn has_unconstrained_wildcard(
    env: &dyn TypeEnv,
    class_def: &ClassDef,
    candidate: &MethodSignature,
    substitutor: &Substitutor,
) -> bool {
    for &tp in &class_def.type_params {
        let Some(tp_def) = env.type_param(tp) else {
            continue;
        };
        if tp_def.upper_bounds.is_empty() {
            continue;
        }

        let substituted = substitutor.substitute(&Type::TypeVar(tp));
        if !substituted.is_unbounded_wildcard() {
            continue;
        }

        let constrained = candidate
            .params
            .iter()
            .any(|param| mentions_type_var(param, tp));
        if !constrained {
            tracing::debug!(
                target: "nova.lambda",
                class = %class_def.name,
                type_param = %tp_def.name,
                method = %candidate.name,
                "wildcard type argument is not constrained by the functional method"
            );
            return true;
        }
    }

    false
}
