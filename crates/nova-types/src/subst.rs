use std::collections::HashMap;

use crate::{erasure, ClassDef, ClassType, Type, TypeEnv, TypeVarId, WildcardBound};

/// Mapping from type variables to the types that instantiate them.
///
/// Substitutors are cheap, short-lived values: build one per instantiation context, apply it,
/// throw it away.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitutor {
    map: HashMap<TypeVarId, Type>,
}

impl Substitutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `class_def`'s own type parameters to `args`.
    ///
    /// Raw uses (no arguments on a generic class) map every parameter to its erasure, matching
    /// the member types javac exposes for raw receivers. Missing trailing arguments (malformed
    /// input) become [`Type::Unknown`].
    pub fn for_class(env: &dyn TypeEnv, class_def: &ClassDef, args: &[Type]) -> Self {
        let raw = args.is_empty() && !class_def.type_params.is_empty();
        let mut map = HashMap::with_capacity(class_def.type_params.len());
        for (idx, formal) in class_def.type_params.iter().copied().enumerate() {
            let actual = if raw {
                erasure(env, &Type::TypeVar(formal))
            } else {
                args.get(idx).cloned().unwrap_or(Type::Unknown)
            };
            map.insert(formal, actual);
        }
        Self { map }
    }

    pub fn insert(&mut self, var: TypeVarId, ty: Type) -> Option<Type> {
        self.map.insert(var, ty)
    }

    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.map.get(&var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &Type)> {
        self.map.iter().map(|(var, ty)| (*var, ty))
    }

    /// Apply the mapping to `ty`, recursing through type arguments, array elements, wildcard
    /// bounds and intersection members. Variables without a mapping are left untouched.
    pub fn substitute(&self, ty: &Type) -> Type {
        if self.map.is_empty() {
            return ty.clone();
        }
        match ty {
            Type::TypeVar(id) => self.map.get(id).cloned().unwrap_or_else(|| ty.clone()),
            Type::Class(ClassType { def, args }) => Type::class(
                *def,
                args.iter().map(|arg| self.substitute(arg)).collect(),
            ),
            Type::Array(elem) => Type::array(self.substitute(elem)),
            Type::Wildcard(WildcardBound::Extends(bound)) => {
                Type::wildcard_extends(self.substitute(bound))
            }
            Type::Wildcard(WildcardBound::Super(bound)) => {
                Type::wildcard_super(self.substitute(bound))
            }
            Type::Intersection(parts) => {
                Type::intersection(parts.iter().map(|p| self.substitute(p)).collect())
            }
            Type::Void
            | Type::Null
            | Type::Unknown
            | Type::Primitive(_)
            | Type::Wildcard(WildcardBound::Unbounded) => ty.clone(),
        }
    }

    /// Substitutor equivalent to applying `self` and then `then`.
    ///
    /// Variables only mapped by `then` keep `then`'s mapping.
    pub fn compose(&self, then: &Substitutor) -> Substitutor {
        let mut map: HashMap<TypeVarId, Type> = self
            .map
            .iter()
            .map(|(var, ty)| (*var, then.substitute(ty)))
            .collect();
        for (var, ty) in &then.map {
            map.entry(*var).or_insert_with(|| ty.clone());
        }
        Substitutor { map }
    }
}

impl FromIterator<(TypeVarId, Type)> for Substitutor {
    fn from_iter<I: IntoIterator<Item = (TypeVarId, Type)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}
