use std::collections::HashMap;

use nova_lambda::ExprId;
use nova_types::{ClassDef, ClassId, ClassKind, MethodDef, MethodKind, Type, TypeEnv, TypeStore, TypeVarId};

pub fn abstract_method(name: &str, params: Vec<Type>, return_type: Type) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        type_params: vec![],
        params,
        return_type,
        kind: MethodKind::Abstract,
    }
}

pub fn interface(
    store: &mut TypeStore,
    name: &str,
    type_params: Vec<TypeVarId>,
    interfaces: Vec<Type>,
    methods: Vec<MethodDef>,
) -> ClassId {
    store.add_class(ClassDef {
        name: name.to_string(),
        kind: ClassKind::Interface,
        type_params,
        super_class: None,
        interfaces,
        methods,
    })
}

pub fn named(store: &TypeStore, name: &str) -> Type {
    let id = store
        .class_id(name)
        .unwrap_or_else(|| panic!("{name} must exist in the minimal JDK"));
    Type::class(id, vec![])
}

pub fn generic(store: &TypeStore, name: &str, args: Vec<Type>) -> Type {
    let Type::Class(class) = named(store, name) else {
        unreachable!()
    };
    Type::class(class.def, args)
}

pub fn string(store: &TypeStore) -> Type {
    Type::class(store.well_known().string, vec![])
}

pub fn integer(store: &TypeStore) -> Type {
    Type::class(store.well_known().integer, vec![])
}

pub fn expr_types(entries: &[(u32, Type)]) -> HashMap<ExprId, Type> {
    entries
        .iter()
        .map(|(raw, ty)| (ExprId::from_raw(*raw), ty.clone()))
        .collect()
}
