use nova_types::ClassId;
use thiserror::Error;

/// Invariant violations detected while analyzing a lambda target.
///
/// These never describe a problem in user code: they mean some other component handed the checker
/// a type that does not match the declaration table. They are logged at error level where they are
/// detected and must not be rendered as user-facing diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("class #{} is missing from the declaration table", .0.to_raw())]
    MissingClass(ClassId),
}

impl InternalError {
    #[track_caller]
    pub(crate) fn missing_class(class: ClassId) -> Self {
        let loc = std::panic::Location::caller();
        tracing::error!(
            target: "nova.lambda",
            file = loc.file(),
            line = loc.line(),
            class = class.to_raw(),
            "lambda target refers to a class that is not in the declaration table"
        );
        InternalError::MissingClass(class)
    }
}
