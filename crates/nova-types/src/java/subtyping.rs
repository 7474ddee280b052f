//! Best-effort subtyping and assignment compatibility (JLS 4.10, 5.2).
//!
//! Unknown types are compatible with everything so that a missing type never causes a cascade of
//! follow-up diagnostics.

use crate::{instantiate_as_supertype, ClassType, PrimitiveType, Type, TypeEnv, WildcardBound};

/// `sub <: sup`.
pub fn is_subtype(env: &dyn TypeEnv, sub: &Type, sup: &Type) -> bool {
    if sub == sup {
        return true;
    }

    match (sub, sup) {
        (Type::Unknown, _) | (_, Type::Unknown) => true,
        (Type::Void, _) | (_, Type::Void) => false,
        (Type::Null, other) => other.is_reference(),
        (Type::Primitive(from), Type::Primitive(to)) => is_primitive_widening(*from, *to),
        (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,

        (_, Type::Intersection(parts)) => parts.iter().all(|part| is_subtype(env, sub, part)),
        (Type::Intersection(parts), _) => parts.iter().any(|part| is_subtype(env, part, sup)),

        (Type::TypeVar(id), _) => {
            let bounds = env
                .type_param(*id)
                .map(|tp| tp.upper_bounds.as_slice())
                .unwrap_or_default();
            if bounds.is_empty() {
                return is_object(env, sup);
            }
            bounds.iter().any(|bound| is_subtype(env, bound, sup))
        }
        (_, Type::TypeVar(id)) => env
            .type_param(*id)
            .and_then(|tp| tp.lower_bound.as_ref())
            .is_some_and(|lower| is_subtype(env, sub, lower)),

        (Type::Wildcard(bound), _) => match bound {
            WildcardBound::Extends(upper) => is_subtype(env, upper, sup),
            WildcardBound::Unbounded | WildcardBound::Super(_) => is_object(env, sup),
        },
        (_, Type::Wildcard(_)) => type_arg_contains(env, sup, sub),
        (_, Type::Null) => false,

        (Type::Array(from), Type::Array(to)) => {
            if from.is_reference() && to.is_reference() {
                is_subtype(env, from, to)
            } else {
                from == to
            }
        }
        (Type::Array(_), Type::Class(ClassType { def, .. })) => {
            let wk = env.well_known();
            *def == wk.object || *def == wk.cloneable || *def == wk.serializable
        }
        (Type::Class(_), Type::Array(_)) => false,

        (Type::Class(_), Type::Class(ClassType { def, args })) => {
            let Some(Type::Class(ClassType {
                args: sub_args, ..
            })) = instantiate_as_supertype(env, sub, *def)
            else {
                return false;
            };
            // Raw on either side: unchecked conversion is allowed.
            if args.is_empty() || sub_args.is_empty() {
                return true;
            }
            args.len() == sub_args.len()
                && args
                    .iter()
                    .zip(sub_args.iter())
                    .all(|(formal, actual)| type_arg_contains(env, formal, actual))
        }
    }
}

/// Assignment compatibility: `from` can be assigned to a variable of type `to` (JLS 5.2, minus
/// constant narrowing).
pub fn is_assignable(env: &dyn TypeEnv, from: &Type, to: &Type) -> bool {
    if is_subtype(env, from, to) {
        return true;
    }

    match (from, to) {
        // Boxing, optionally followed by widening reference conversion.
        (Type::Primitive(prim), target) if target.is_reference() => env
            .lookup_class(prim.box_class_name())
            .is_some_and(|boxed| is_subtype(env, &Type::class(boxed, vec![]), target)),
        // Unboxing, optionally followed by widening primitive conversion.
        (source, Type::Primitive(target)) => {
            unboxed(env, source).is_some_and(|prim| is_primitive_widening(prim, *target))
        }
        _ => false,
    }
}

/// Structural type identity, with [`Type::Unknown`] matching anything and intersections compared
/// independently of member order.
pub fn types_equal(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Unknown, _) | (_, Type::Unknown) => true,
        (Type::Class(left), Type::Class(right)) => {
            left.def == right.def
                && left.args.len() == right.args.len()
                && left
                    .args
                    .iter()
                    .zip(right.args.iter())
                    .all(|(l, r)| types_equal(l, r))
        }
        (Type::Array(left), Type::Array(right)) => types_equal(left, right),
        (Type::Wildcard(left), Type::Wildcard(right)) => match (left, right) {
            (WildcardBound::Unbounded, WildcardBound::Unbounded) => true,
            (WildcardBound::Extends(l), WildcardBound::Extends(r))
            | (WildcardBound::Super(l), WildcardBound::Super(r)) => types_equal(l, r),
            _ => false,
        },
        (Type::Intersection(left), Type::Intersection(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|l| right.iter().any(|r| types_equal(l, r)))
        }
        _ => a == b,
    }
}

/// Widening primitive conversion (JLS 5.1.2), identity included.
fn is_primitive_widening(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::*;

    if from == to {
        return true;
    }
    match from {
        Byte => matches!(to, Short | Int | Long | Float | Double),
        Short | Char => matches!(to, Int | Long | Float | Double),
        Int => matches!(to, Long | Float | Double),
        Long => matches!(to, Float | Double),
        Float => matches!(to, Double),
        Double | Boolean => false,
    }
}

fn unboxed(env: &dyn TypeEnv, ty: &Type) -> Option<PrimitiveType> {
    let Type::Class(ClassType { def, .. }) = ty else {
        return None;
    };
    let class_def = env.class(*def)?;
    PrimitiveType::from_box_class_name(&class_def.name)
}

fn is_object(env: &dyn TypeEnv, ty: &Type) -> bool {
    matches!(ty, Type::Class(ClassType { def, .. }) if *def == env.well_known().object)
}

/// Type argument containment (JLS 4.5.1): does `formal` contain `actual`?
fn type_arg_contains(env: &dyn TypeEnv, formal: &Type, actual: &Type) -> bool {
    match formal {
        Type::Wildcard(WildcardBound::Unbounded) => true,
        Type::Wildcard(WildcardBound::Extends(upper)) => match actual {
            Type::Wildcard(WildcardBound::Extends(actual_upper)) => {
                is_subtype(env, actual_upper, upper)
            }
            Type::Wildcard(WildcardBound::Unbounded | WildcardBound::Super(_)) => {
                is_object(env, upper)
            }
            other => is_subtype(env, other, upper),
        },
        Type::Wildcard(WildcardBound::Super(lower)) => match actual {
            Type::Wildcard(WildcardBound::Super(actual_lower)) => {
                is_subtype(env, lower, actual_lower)
            }
            Type::Wildcard(_) => false,
            other => is_subtype(env, lower, other),
        },
        other => types_equal(other, actual),
    }
}
