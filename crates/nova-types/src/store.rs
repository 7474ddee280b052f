use std::collections::HashMap;

use crate::{
    ClassDef, ClassId, ClassKind, MethodDef, MethodKind, PrimitiveType, Type, TypeEnv,
    TypeParamDef, TypeVarId,
};

/// Class ids for types the checkers need to refer to directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
}

/// In-memory declaration table.
///
/// The store is populated by a single writer (loaders, tests) and then shared read-only. Class
/// ids are stable: redefining a class keeps its id.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    type_params: Vec<TypeParamDef>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownTypes,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::with_minimal_jdk()
    }
}

impl TypeStore {
    /// Look up a class by binary name.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Return the id for `name`, allocating an empty placeholder declaration if needed.
    ///
    /// Placeholders let loaders create forward references (`interface Node<T extends Node<T>>`)
    /// before the declaration itself is known.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_id(name) {
            return id;
        }
        let id = ClassId::from_raw(
            self.classes
                .len()
                .try_into()
                .unwrap_or(u32::MAX),
        );
        self.classes.push(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Replace the declaration behind `id`.
    ///
    /// Returns `false` (and leaves the store untouched) if `id` was not allocated by this store.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) -> bool {
        let Some(slot) = self.classes.get_mut(id.index()) else {
            tracing::warn!(
                target: "nova.types",
                class = id.to_raw(),
                name = %def.name,
                "ignoring definition for a class id this store did not allocate"
            );
            return false;
        };
        if slot.name != def.name {
            self.by_name.remove(&slot.name);
            self.by_name.insert(def.name.clone(), id);
        }
        *slot = def;
        true
    }

    /// Insert or overwrite the declaration with `def.name`, keeping an existing id stable.
    pub fn upsert_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        self.upsert_class(def)
    }

    pub fn add_type_param(&mut self, name: &str, upper_bounds: Vec<Type>) -> TypeVarId {
        let id = TypeVarId::from_raw(
            self.type_params
                .len()
                .try_into()
                .unwrap_or(u32::MAX),
        );
        self.type_params.push(TypeParamDef {
            name: name.to_string(),
            upper_bounds,
            lower_bound: None,
        });
        id
    }

    /// Set the declared bounds of an already allocated type parameter (for F-bounded
    /// declarations such as `<T extends Comparable<T>>`).
    pub fn set_type_param_bounds(&mut self, id: TypeVarId, upper_bounds: Vec<Type>) {
        if let Some(tp) = self.type_params.get_mut(id.index()) {
            tp.upper_bounds = upper_bounds;
        }
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.index())
    }

    /// A store containing the handful of `java.lang` / `java.util` declarations the checkers and
    /// their tests rely on.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore {
            classes: Vec::new(),
            type_params: Vec::new(),
            by_name: HashMap::new(),
            well_known: WellKnownTypes {
                object: ClassId::from_raw(0),
                string: ClassId::from_raw(0),
                number: ClassId::from_raw(0),
                integer: ClassId::from_raw(0),
                cloneable: ClassId::from_raw(0),
                serializable: ClassId::from_raw(0),
            },
        };

        let object = store.intern_class_id("java.lang.Object");
        let string = store.intern_class_id("java.lang.String");
        let number = store.intern_class_id("java.lang.Number");
        let cloneable = store.intern_class_id("java.lang.Cloneable");
        let serializable = store.intern_class_id("java.io.Serializable");
        let comparable = store.intern_class_id("java.lang.Comparable");
        let integer = store.intern_class_id("java.lang.Integer");
        store.well_known = WellKnownTypes {
            object,
            string,
            number,
            integer,
            cloneable,
            serializable,
        };

        let object_ty = Type::class(object, vec![]);
        let string_ty = Type::class(string, vec![]);

        store.define_class(
            object,
            ClassDef {
                name: "java.lang.Object".to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
                // Public members only: `clone`/`finalize` are protected and do not shadow
                // interface declarations.
                methods: vec![
                    method(
                        "equals",
                        vec![object_ty.clone()],
                        Type::boolean(),
                        MethodKind::Concrete,
                    ),
                    method("hashCode", vec![], Type::int(), MethodKind::Concrete),
                    method("toString", vec![], string_ty.clone(), MethodKind::Concrete),
                    method("getClass", vec![], Type::Unknown, MethodKind::Concrete),
                    method("notify", vec![], Type::Void, MethodKind::Concrete),
                    method("notifyAll", vec![], Type::Void, MethodKind::Concrete),
                    method("wait", vec![], Type::Void, MethodKind::Concrete),
                ],
            },
        );

        store.define_class(cloneable, marker_interface("java.lang.Cloneable"));
        store.define_class(serializable, marker_interface("java.io.Serializable"));

        // interface Comparable<T> { int compareTo(T o); }
        let comparable_t = store.add_type_param("T", vec![]);
        store.define_class(
            comparable,
            ClassDef {
                name: "java.lang.Comparable".to_string(),
                kind: ClassKind::Interface,
                type_params: vec![comparable_t],
                super_class: None,
                interfaces: vec![],
                methods: vec![method(
                    "compareTo",
                    vec![Type::TypeVar(comparable_t)],
                    Type::int(),
                    MethodKind::Abstract,
                )],
            },
        );

        store.define_class(
            string,
            ClassDef {
                name: "java.lang.String".to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: Some(object_ty.clone()),
                interfaces: vec![
                    Type::class(serializable, vec![]),
                    Type::class(comparable, vec![string_ty.clone()]),
                ],
                methods: vec![
                    method("length", vec![], Type::int(), MethodKind::Concrete),
                    method("isEmpty", vec![], Type::boolean(), MethodKind::Concrete),
                ],
            },
        );

        store.define_class(
            number,
            ClassDef {
                name: "java.lang.Number".to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: Some(object_ty.clone()),
                interfaces: vec![Type::class(serializable, vec![])],
                methods: vec![
                    method("intValue", vec![], Type::int(), MethodKind::Abstract),
                    method(
                        "longValue",
                        vec![],
                        Type::Primitive(PrimitiveType::Long),
                        MethodKind::Abstract,
                    ),
                ],
            },
        );

        for prim in PrimitiveType::ALL {
            let name = prim.box_class_name();
            let id = store.intern_class_id(name);
            let numeric = !matches!(prim, PrimitiveType::Boolean | PrimitiveType::Char);
            let super_class = if numeric {
                Type::class(number, vec![])
            } else {
                object_ty.clone()
            };
            let self_ty = Type::class(id, vec![]);
            store.define_class(
                id,
                ClassDef {
                    name: name.to_string(),
                    kind: ClassKind::Class,
                    type_params: vec![],
                    super_class: Some(super_class),
                    interfaces: vec![
                        Type::class(serializable, vec![]),
                        Type::class(comparable, vec![self_ty]),
                    ],
                    methods: vec![],
                },
            );
        }

        // interface Runnable { void run(); }
        store.add_class(ClassDef {
            name: "java.lang.Runnable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
            methods: vec![method("run", vec![], Type::Void, MethodKind::Abstract)],
        });

        // interface Callable<V> { V call() throws Exception; }
        let callable_v = store.add_type_param("V", vec![]);
        store.add_class(ClassDef {
            name: "java.util.concurrent.Callable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![callable_v],
            super_class: None,
            interfaces: vec![],
            methods: vec![method(
                "call",
                vec![],
                Type::TypeVar(callable_v),
                MethodKind::Abstract,
            )],
        });

        store.add_minimal_collections();
        store.add_minimal_functions();
        store
    }

    fn add_minimal_collections(&mut self) {
        // interface Iterator<E> { boolean hasNext(); E next(); }
        let iterator_e = self.add_type_param("E", vec![]);
        let iterator = self.add_class(ClassDef {
            name: "java.util.Iterator".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![iterator_e],
            super_class: None,
            interfaces: vec![],
            methods: vec![
                method("hasNext", vec![], Type::boolean(), MethodKind::Abstract),
                method("next", vec![], Type::TypeVar(iterator_e), MethodKind::Abstract),
            ],
        });

        let consumer = self.intern_class_id("java.util.function.Consumer");

        // interface Iterable<T> { Iterator<T> iterator(); default void forEach(Consumer<? super T>) }
        let iterable_t = self.add_type_param("T", vec![]);
        let iterable = self.add_class(ClassDef {
            name: "java.lang.Iterable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![iterable_t],
            super_class: None,
            interfaces: vec![],
            methods: vec![
                method(
                    "iterator",
                    vec![],
                    Type::class(iterator, vec![Type::TypeVar(iterable_t)]),
                    MethodKind::Abstract,
                ),
                method(
                    "forEach",
                    vec![Type::class(
                        consumer,
                        vec![Type::wildcard_super(Type::TypeVar(iterable_t))],
                    )],
                    Type::Void,
                    MethodKind::Default,
                ),
            ],
        });

        // interface Collection<E> extends Iterable<E>
        let collection_e = self.add_type_param("E", vec![]);
        let collection = self.add_class(ClassDef {
            name: "java.util.Collection".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![collection_e],
            super_class: None,
            interfaces: vec![Type::class(iterable, vec![Type::TypeVar(collection_e)])],
            methods: vec![
                method("size", vec![], Type::int(), MethodKind::Abstract),
                method("isEmpty", vec![], Type::boolean(), MethodKind::Abstract),
                method(
                    "add",
                    vec![Type::TypeVar(collection_e)],
                    Type::boolean(),
                    MethodKind::Abstract,
                ),
            ],
        });

        // interface List<E> extends Collection<E>
        let list_e = self.add_type_param("E", vec![]);
        let list = self.add_class(ClassDef {
            name: "java.util.List".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![list_e],
            super_class: None,
            interfaces: vec![Type::class(collection, vec![Type::TypeVar(list_e)])],
            methods: vec![method(
                "get",
                vec![Type::int()],
                Type::TypeVar(list_e),
                MethodKind::Abstract,
            )],
        });

        // class ArrayList<E> implements List<E>
        let array_list_e = self.add_type_param("E", vec![]);
        let object_ty = Type::class(self.well_known.object, vec![]);
        self.add_class(ClassDef {
            name: "java.util.ArrayList".to_string(),
            kind: ClassKind::Class,
            type_params: vec![array_list_e],
            super_class: Some(object_ty),
            interfaces: vec![
                Type::class(list, vec![Type::TypeVar(array_list_e)]),
                Type::class(self.well_known.cloneable, vec![]),
                Type::class(self.well_known.serializable, vec![]),
            ],
            methods: vec![
                method("size", vec![], Type::int(), MethodKind::Concrete),
                method("isEmpty", vec![], Type::boolean(), MethodKind::Concrete),
                method(
                    "add",
                    vec![Type::TypeVar(array_list_e)],
                    Type::boolean(),
                    MethodKind::Concrete,
                ),
                method(
                    "get",
                    vec![Type::int()],
                    Type::TypeVar(array_list_e),
                    MethodKind::Concrete,
                ),
                method(
                    "iterator",
                    vec![],
                    Type::class(iterator, vec![Type::TypeVar(array_list_e)]),
                    MethodKind::Concrete,
                ),
            ],
        });
    }

    fn add_minimal_functions(&mut self) {
        let object_ty = Type::class(self.well_known.object, vec![]);

        // interface Supplier<T> { T get(); }
        let supplier_t = self.add_type_param("T", vec![]);
        self.add_class(ClassDef {
            name: "java.util.function.Supplier".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![supplier_t],
            super_class: None,
            interfaces: vec![],
            methods: vec![method(
                "get",
                vec![],
                Type::TypeVar(supplier_t),
                MethodKind::Abstract,
            )],
        });

        // interface Consumer<T> { void accept(T t); default Consumer<T> andThen(Consumer<? super T>) }
        let consumer = self.intern_class_id("java.util.function.Consumer");
        let consumer_t = self.add_type_param("T", vec![]);
        self.define_class(
            consumer,
            ClassDef {
                name: "java.util.function.Consumer".to_string(),
                kind: ClassKind::Interface,
                type_params: vec![consumer_t],
                super_class: None,
                interfaces: vec![],
                methods: vec![
                    method(
                        "accept",
                        vec![Type::TypeVar(consumer_t)],
                        Type::Void,
                        MethodKind::Abstract,
                    ),
                    method(
                        "andThen",
                        vec![Type::class(
                            consumer,
                            vec![Type::wildcard_super(Type::TypeVar(consumer_t))],
                        )],
                        Type::class(consumer, vec![Type::TypeVar(consumer_t)]),
                        MethodKind::Default,
                    ),
                ],
            },
        );

        // interface Function<T, R> { R apply(T t); static <T> Function<T, T> identity() }
        let function = self.intern_class_id("java.util.function.Function");
        let function_t = self.add_type_param("T", vec![]);
        let function_r = self.add_type_param("R", vec![]);
        let identity_t = self.add_type_param("T", vec![]);
        self.define_class(
            function,
            ClassDef {
                name: "java.util.function.Function".to_string(),
                kind: ClassKind::Interface,
                type_params: vec![function_t, function_r],
                super_class: None,
                interfaces: vec![],
                methods: vec![
                    method(
                        "apply",
                        vec![Type::TypeVar(function_t)],
                        Type::TypeVar(function_r),
                        MethodKind::Abstract,
                    ),
                    MethodDef {
                        name: "identity".to_string(),
                        type_params: vec![identity_t],
                        params: vec![],
                        return_type: Type::class(
                            function,
                            vec![Type::TypeVar(identity_t), Type::TypeVar(identity_t)],
                        ),
                        kind: MethodKind::Static,
                    },
                ],
            },
        );

        // interface BiFunction<T, U, R> { R apply(T t, U u); }
        let bi_t = self.add_type_param("T", vec![]);
        let bi_u = self.add_type_param("U", vec![]);
        let bi_r = self.add_type_param("R", vec![]);
        self.add_class(ClassDef {
            name: "java.util.function.BiFunction".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![bi_t, bi_u, bi_r],
            super_class: None,
            interfaces: vec![],
            methods: vec![method(
                "apply",
                vec![Type::TypeVar(bi_t), Type::TypeVar(bi_u)],
                Type::TypeVar(bi_r),
                MethodKind::Abstract,
            )],
        });

        // interface UnaryOperator<T> extends Function<T, T>
        let unary_t = self.add_type_param("T", vec![]);
        self.add_class(ClassDef {
            name: "java.util.function.UnaryOperator".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![unary_t],
            super_class: None,
            interfaces: vec![Type::class(
                function,
                vec![Type::TypeVar(unary_t), Type::TypeVar(unary_t)],
            )],
            methods: vec![],
        });

        // interface Predicate<T> { boolean test(T t); default Predicate<T> negate() }
        let predicate = self.intern_class_id("java.util.function.Predicate");
        let predicate_t = self.add_type_param("T", vec![]);
        self.define_class(
            predicate,
            ClassDef {
                name: "java.util.function.Predicate".to_string(),
                kind: ClassKind::Interface,
                type_params: vec![predicate_t],
                super_class: None,
                interfaces: vec![],
                methods: vec![
                    method(
                        "test",
                        vec![Type::TypeVar(predicate_t)],
                        Type::boolean(),
                        MethodKind::Abstract,
                    ),
                    method(
                        "negate",
                        vec![],
                        Type::class(predicate, vec![Type::TypeVar(predicate_t)]),
                        MethodKind::Default,
                    ),
                ],
            },
        );

        // interface Comparator<T> { int compare(T a, T b); boolean equals(Object o); }
        let comparator = self.intern_class_id("java.util.Comparator");
        let comparator_t = self.add_type_param("T", vec![]);
        self.define_class(
            comparator,
            ClassDef {
                name: "java.util.Comparator".to_string(),
                kind: ClassKind::Interface,
                type_params: vec![comparator_t],
                super_class: None,
                interfaces: vec![],
                methods: vec![
                    method(
                        "compare",
                        vec![Type::TypeVar(comparator_t), Type::TypeVar(comparator_t)],
                        Type::int(),
                        MethodKind::Abstract,
                    ),
                    method(
                        "equals",
                        vec![object_ty],
                        Type::boolean(),
                        MethodKind::Abstract,
                    ),
                    method(
                        "reversed",
                        vec![],
                        Type::class(comparator, vec![Type::TypeVar(comparator_t)]),
                        MethodKind::Default,
                    ),
                ],
            },
        );
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    /// Resolve a binary name, falling back to the implicit `java.lang.*` import for simple names.
    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_id(name) {
            return Some(id);
        }
        if !name.contains('.') {
            return self.class_id(&format!("java.lang.{name}"));
        }
        None
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

fn method(name: &str, params: Vec<Type>, return_type: Type, kind: MethodKind) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        type_params: vec![],
        params,
        return_type,
        kind,
    }
}

fn marker_interface(name: &str) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Interface,
        type_params: vec![],
        super_class: None,
        interfaces: vec![],
        methods: vec![],
    }
}
