use std::collections::{HashSet, VecDeque};

use crate::{ClassId, ClassKind, ClassType, Substitutor, Type, TypeEnv, TypeVarId, WildcardBound};

/// Return `ty` viewed as `target` by walking the supertype graph and applying type argument
/// substitution along the way.
///
/// This is a best-effort helper used for IDE-style type recovery. It never panics: missing class
/// metadata simply returns `None`.
///
/// Example: `ArrayList<String>` instantiated as `List` returns `List<String>`.
pub fn instantiate_as_supertype(env: &dyn TypeEnv, ty: &Type, target: ClassId) -> Option<Type> {
    fn inner(
        env: &dyn TypeEnv,
        ty: &Type,
        target: ClassId,
        seen_type_vars: &mut HashSet<TypeVarId>,
    ) -> Option<Type> {
        // Handle a few non-class cases up front.
        match ty {
            Type::Array(_) => {
                let wk = env.well_known();
                if target == wk.object || target == wk.cloneable || target == wk.serializable {
                    return Some(Type::class(target, vec![]));
                }
                return None;
            }
            Type::Intersection(parts) => {
                // If multiple parts can be viewed as the requested supertype, prefer the most
                // informative one and treat incompatible instantiations as ambiguous.
                let mut out: Option<Type> = None;
                for part in parts {
                    let Some(found) = inner(env, part, target, seen_type_vars) else {
                        continue;
                    };
                    out = match out {
                        None => Some(found),
                        Some(existing) => {
                            Some(merge_instantiated_supertypes(env, existing, found)?)
                        }
                    };
                }
                return out;
            }
            Type::TypeVar(id) => {
                if !seen_type_vars.insert(*id) {
                    return None;
                }

                let mut out: Option<Type> = None;
                let bounds = env
                    .type_param(*id)
                    .map(|tp| tp.upper_bounds.clone())
                    .unwrap_or_default();
                let bounds = if bounds.is_empty() {
                    vec![Type::class(env.well_known().object, vec![])]
                } else {
                    bounds
                };
                for bound in &bounds {
                    let Some(found) = inner(env, bound, target, seen_type_vars) else {
                        continue;
                    };
                    out = match out {
                        None => Some(found),
                        Some(existing) => match merge_instantiated_supertypes(env, existing, found)
                        {
                            Some(merged) => Some(merged),
                            None => {
                                // Ensure recursion guard is cleared before returning.
                                seen_type_vars.remove(id);
                                return None;
                            }
                        },
                    };
                }

                seen_type_vars.remove(id);
                return out;
            }
            Type::Wildcard(WildcardBound::Extends(upper)) => {
                return inner(env, upper, target, seen_type_vars);
            }
            _ => {}
        }

        let Type::Class(class_ty) = ty else {
            return None;
        };

        supertype_closure(env, &Type::Class(class_ty.clone()))
            .into_iter()
            .find(|sup| sup.def == target)
            .map(Type::Class)
    }

    let mut seen_type_vars = HashSet::new();
    inner(env, ty, target, &mut seen_type_vars)
}

/// Every class type reachable from `ty` through `extends`/`implements`, including `ty` itself,
/// in breadth-first order with type arguments substituted along the way.
///
/// Each class appears once (first instantiation wins). Raw instantiations stay raw. Interfaces
/// get `Object` as an implicit supertype (JLS 4.10.2). Non-class inputs yield an empty list.
pub fn supertype_closure(env: &dyn TypeEnv, ty: &Type) -> Vec<ClassType> {
    let Type::Class(start) = ty else {
        return Vec::new();
    };

    let mut out: Vec<ClassType> = Vec::new();
    let mut queue: VecDeque<ClassType> = VecDeque::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current.def) {
            continue;
        }

        let Some(class_def) = env.class(current.def) else {
            out.push(current);
            continue;
        };

        // If the current instantiation is raw (e.g. `List` rather than `List<String>`), we can't
        // recover meaningful type arguments for supertypes. Preserve rawness when walking.
        let raw = current.args.is_empty() && !class_def.type_params.is_empty();
        let subst = Substitutor::for_class(env, class_def, &current.args);

        for sup in class_def.direct_supertypes() {
            let sup = if raw { sup.clone() } else { subst.substitute(sup) };
            if let Type::Class(ClassType { def, args }) = sup {
                let args = if raw { Vec::new() } else { args };
                queue.push_back(ClassType { def, args });
            }
        }

        if class_def.kind == ClassKind::Interface {
            queue.push_back(ClassType {
                def: env.well_known().object,
                args: Vec::new(),
            });
        }

        out.push(current);
    }

    out
}

fn merge_instantiated_supertypes(env: &dyn TypeEnv, a: Type, b: Type) -> Option<Type> {
    if a == b {
        return Some(a);
    }

    let a_score = placeholder_score(&a);
    let b_score = placeholder_score(&b);
    if a_score != b_score {
        return Some(if a_score < b_score { a } else { b });
    }

    let a_sub_b = crate::is_subtype(env, &a, &b);
    let b_sub_a = crate::is_subtype(env, &b, &a);

    match (a_sub_b, b_sub_a) {
        (true, false) => Some(a),
        (false, true) => Some(b),
        (true, true) => Some(a),
        (false, false) => None,
    }
}

fn placeholder_score(ty: &Type) -> usize {
    match ty {
        Type::Unknown => 1,
        Type::Array(elem) => placeholder_score(elem),
        Type::Class(ClassType { args, .. }) => args.iter().map(placeholder_score).sum(),
        Type::Wildcard(WildcardBound::Extends(upper))
        | Type::Wildcard(WildcardBound::Super(upper)) => placeholder_score(upper),
        Type::Intersection(parts) => parts.iter().map(placeholder_score).sum(),
        _ => 0,
    }
}

/// Type erasure (JLS 4.6): type variables become the erasure of their leftmost bound (or
/// `Object`), parameterized types lose their arguments.
pub fn erasure(env: &dyn TypeEnv, ty: &Type) -> Type {
    fn inner(env: &dyn TypeEnv, ty: &Type, seen_type_vars: &mut HashSet<TypeVarId>) -> Type {
        let object = || Type::class(env.well_known().object, vec![]);
        match ty {
            Type::Class(ClassType { def, .. }) => Type::class(*def, vec![]),
            Type::Array(elem) => Type::array(inner(env, elem, seen_type_vars)),
            Type::TypeVar(id) => {
                if !seen_type_vars.insert(*id) {
                    tracing::trace!(
                        target: "nova.types",
                        type_var = id.to_raw(),
                        "cyclic type variable bound; erasing to Object"
                    );
                    return object();
                }
                let out = env
                    .type_param(*id)
                    .and_then(|tp| tp.upper_bounds.first())
                    .map(|bound| inner(env, bound, seen_type_vars))
                    .unwrap_or_else(object);
                seen_type_vars.remove(id);
                out
            }
            Type::Intersection(parts) => parts
                .first()
                .map(|first| inner(env, first, seen_type_vars))
                .unwrap_or_else(object),
            Type::Wildcard(WildcardBound::Extends(upper)) => inner(env, upper, seen_type_vars),
            Type::Wildcard(WildcardBound::Unbounded | WildcardBound::Super(_)) => object(),
            Type::Void | Type::Null | Type::Unknown | Type::Primitive(_) => ty.clone(),
        }
    }

    let mut seen_type_vars = HashSet::new();
    inner(env, ty, &mut seen_type_vars)
}

/// Whether `var` occurs free anywhere inside `ty` (type arguments, array elements, wildcard
/// bounds and intersection members included).
pub fn mentions_type_var(ty: &Type, var: TypeVarId) -> bool {
    match ty {
        Type::TypeVar(id) => *id == var,
        Type::Class(ClassType { args, .. }) => args.iter().any(|arg| mentions_type_var(arg, var)),
        Type::Array(elem) => mentions_type_var(elem, var),
        Type::Wildcard(WildcardBound::Extends(bound))
        | Type::Wildcard(WildcardBound::Super(bound)) => mentions_type_var(bound, var),
        Type::Intersection(parts) => parts.iter().any(|part| mentions_type_var(part, var)),
        Type::Void
        | Type::Null
        | Type::Unknown
        | Type::Primitive(_)
        | Type::Wildcard(WildcardBound::Unbounded) => false,
    }
}
