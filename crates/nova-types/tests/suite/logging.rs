use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use nova_types::{erasure, ClassDef, ClassId, ClassKind, Type, TypeEnv, TypeStore};

use pretty_assertions::assert_eq;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let bytes = captured.0.lock().expect("log buffer mutex poisoned");
    (out, String::from_utf8_lossy(&bytes).into_owned())
}

#[test]
fn defining_a_foreign_class_id_is_ignored_and_logged() {
    let mut store = TypeStore::with_minimal_jdk();
    let foreign = ClassId::from_raw(90_000);

    let (defined, logs) = capture(|| {
        store.define_class(
            foreign,
            ClassDef {
                name: "com.example.Stray".to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
                methods: vec![],
            },
        )
    });

    assert!(!defined);
    assert_eq!(store.class(foreign), None);
    assert_eq!(store.lookup_class("com.example.Stray"), None);
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("class=90000"), "{logs}");
    assert!(logs.contains("nova.types"), "{logs}");
}

#[test]
fn cyclic_type_variable_bounds_erase_to_object() {
    let mut store = TypeStore::with_minimal_jdk();
    let t = store.add_type_param("T", vec![]);
    let u = store.add_type_param("U", vec![Type::TypeVar(t)]);
    store.set_type_param_bounds(t, vec![Type::TypeVar(u)]);

    let (erased, logs) = capture(|| erasure(&store, &Type::TypeVar(t)));

    assert_eq!(erased, Type::class(store.well_known().object, vec![]));
    assert!(logs.contains("cyclic type variable bound"), "{logs}");
}
