//! Abstract method collection for functional interface detection (JLS 9.8).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use nova_types::{
    erasure, is_subtype, supertype_closure, ClassId, MethodDef, MethodKind, Substitutor, Type,
    TypeEnv, TypeVarId,
};

/// A method as seen from a root declaration.
///
/// Parameter and return types are expressed in terms of the root declaration's own type
/// parameters: for `interface StringFn extends Function<String, Integer>`, the inherited `apply`
/// has `params == [String]` even though `owner` is `Function`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSignature {
    pub owner: ClassId,
    pub name: String,
    pub params: Vec<Type>,
    pub type_params: Vec<TypeVarId>,
    pub return_type: Type,
}

impl MethodSignature {
    pub fn from_def(owner: ClassId, method: &MethodDef, subst: &Substitutor) -> Self {
        Self {
            owner,
            name: method.name.clone(),
            params: method.params.iter().map(|p| subst.substitute(p)).collect(),
            type_params: method.type_params.clone(),
            return_type: subst.substitute(&method.return_type),
        }
    }

    /// Whether the method introduces its own type parameters (`<T> void m(T t)`).
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn erased_params(&self, env: &dyn TypeEnv) -> Vec<Type> {
        self.params.iter().map(|p| erasure(env, p)).collect()
    }

    /// Same name and same erased parameter types (JLS 8.4.2, subsignature via erasure).
    pub fn is_signature_equal(&self, env: &dyn TypeEnv, other: &MethodSignature) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self.erased_params(env) == other.erased_params(env)
    }
}

/// Compute the abstract methods of `class` that are not overridden anywhere in its hierarchy.
///
/// Returns `None` when `class` is not an interface (annotation types included) or is unknown.
/// Otherwise the result holds zero, one or several candidates, in breadth-first hierarchy order:
///
/// - methods matching a public `java.lang.Object` method are never candidates;
/// - an abstract method is dropped when a proper subtype in the hierarchy re-declares it (abstract,
///   default or concrete); static methods neither count nor override;
/// - abstract methods with the same erasure collapse into one, keeping the most specific return
///   type, so covariant re-declarations from unrelated superinterfaces are not reported as
///   ambiguous.
pub fn function_candidates(env: &dyn TypeEnv, class: ClassId) -> Option<Vec<MethodSignature>> {
    let class_def = env.class(class)?;
    if !class_def.is_interface() {
        return None;
    }

    let object = env.well_known().object;
    let root = Type::class(
        class,
        class_def
            .type_params
            .iter()
            .map(|tp| Type::TypeVar(*tp))
            .collect(),
    );

    let mut members: Vec<(MethodSignature, MethodKind)> = Vec::new();
    for inst in supertype_closure(env, &root) {
        if inst.def == object {
            continue;
        }
        let Some(def) = env.class(inst.def) else {
            continue;
        };
        let subst = Substitutor::for_class(env, def, &inst.args);
        for method in &def.methods {
            members.push((MethodSignature::from_def(inst.def, method, &subst), method.kind));
        }
    }

    let object_methods: Vec<MethodSignature> = env
        .class(object)
        .map(|def| {
            def.methods
                .iter()
                .filter(|m| !m.is_static())
                .map(|m| MethodSignature::from_def(object, m, &Substitutor::new()))
                .collect()
        })
        .unwrap_or_default();

    let mut ancestors = AncestorCache::default();
    let mut candidates: Vec<MethodSignature> = Vec::new();

    for (idx, (sig, kind)) in members.iter().enumerate() {
        if *kind != MethodKind::Abstract {
            continue;
        }
        if object_methods.iter().any(|o| o.is_signature_equal(env, sig)) {
            continue;
        }

        let overridden = members
            .iter()
            .enumerate()
            .any(|(other_idx, (other, other_kind))| {
                other_idx != idx
                    && *other_kind != MethodKind::Static
                    && other.owner != sig.owner
                    && other.is_signature_equal(env, sig)
                    && ancestors.is_proper_subclass(env, other.owner, sig.owner)
            });
        if overridden {
            continue;
        }

        if let Some(existing) = candidates
            .iter_mut()
            .find(|c| c.is_signature_equal(env, sig))
        {
            let more_specific = is_subtype(env, &sig.return_type, &existing.return_type)
                && !is_subtype(env, &existing.return_type, &sig.return_type);
            if more_specific {
                *existing = sig.clone();
            }
            continue;
        }

        candidates.push(sig.clone());
    }

    Some(candidates)
}

/// Memoizes the class hierarchy (as a set of class ids) per owner while computing overrides.
#[derive(Default)]
struct AncestorCache {
    supers: HashMap<ClassId, HashSet<ClassId>>,
}

impl AncestorCache {
    fn is_proper_subclass(&mut self, env: &dyn TypeEnv, sub: ClassId, sup: ClassId) -> bool {
        if sub == sup {
            return false;
        }
        self.supers
            .entry(sub)
            .or_insert_with(|| {
                supertype_closure(env, &Type::class(sub, vec![]))
                    .into_iter()
                    .map(|c| c.def)
                    .collect()
            })
            .contains(&sup)
    }
}

/// Thread-safe memo of [`function_candidates`] keyed by declaration.
///
/// Declarations are immutable once the store is populated, so entries never go stale; call
/// [`CandidateCache::clear`] after rebuilding the declaration table.
#[derive(Debug, Default)]
pub struct CandidateCache {
    inner: Mutex<HashMap<ClassId, Option<Arc<[MethodSignature]>>>>,
}

impl CandidateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self, env: &dyn TypeEnv, class: ClassId) -> Option<Arc<[MethodSignature]>> {
        if let Some(hit) = self.lock_inner().get(&class) {
            return hit.clone();
        }

        // Compute without holding the lock; concurrent misses for the same class produce equal
        // values and the first insert wins.
        let computed: Option<Arc<[MethodSignature]>> =
            function_candidates(env, class).map(Arc::from);
        self.lock_inner()
            .entry(class)
            .or_insert(computed)
            .clone()
    }

    pub fn clear(&self) {
        self.lock_inner().clear();
    }

    pub fn len(&self) -> usize {
        self.lock_inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[track_caller]
    fn lock_inner(&self) -> MutexGuard<'_, HashMap<ClassId, Option<Arc<[MethodSignature]>>>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(err) => {
                let loc = std::panic::Location::caller();
                tracing::error!(
                    target: "nova.lambda",
                    file = loc.file(),
                    line = loc.line(),
                    column = loc.column(),
                    error = %err,
                    "mutex poisoned; continuing with recovered guard"
                );
                err.into_inner()
            }
        }
    }
}
