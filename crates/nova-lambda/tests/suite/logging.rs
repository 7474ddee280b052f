use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use nova_lambda::{check_lambda, Expr, LambdaCheckConfig, LambdaParams, LambdaShape};
use nova_types::{ClassId, Type, TypeStore};

use super::support::expr_types;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        let bytes = self.0.lock().expect("log buffer mutex poisoned");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

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

fn capture(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[test]
fn internal_fault_is_logged_at_error_level_and_not_reported() {
    let store = TypeStore::with_minimal_jdk();
    let lambda = LambdaShape::expression(LambdaParams::Implicit(vec![]), Expr::statement(0));
    let types = expr_types(&[]);
    let dangling = Type::class(ClassId::from_raw(77_777), vec![]);

    let mut diags = None;
    let logs = capture(|| {
        diags = Some(check_lambda(
            &store,
            &dangling,
            &lambda,
            &types,
            &LambdaCheckConfig::default(),
        ));
    });

    assert_eq!(diags, Some(Vec::new()));
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(
        logs.contains("lambda target refers to a class that is not in the declaration table"),
        "{logs}"
    );
    assert!(logs.contains("class=77777"), "{logs}");
}

#[test]
fn resolution_outcomes_are_logged_at_debug_level() {
    let store = TypeStore::with_minimal_jdk();
    let runnable = Type::class(store.class_id("java.lang.Runnable").unwrap(), vec![]);
    let lambda = LambdaShape::expression(LambdaParams::Implicit(vec![]), Expr::statement(0));
    let types = expr_types(&[]);

    let logs = capture(|| {
        check_lambda(
            &store,
            &runnable,
            &lambda,
            &types,
            &LambdaCheckConfig::default(),
        );
    });

    assert!(logs.contains("resolved functional target"), "{logs}");
    assert!(logs.contains("method=run"), "{logs}");
    assert!(logs.contains("nova.lambda"), "{logs}");
}
