//! Lambda target analysis: functional interface detection (JLS 9.8), function types of
//! wildcard-parameterized targets (JLS 9.9) and lambda parameter/return compatibility
//! (JLS 15.27.3).
//!
//! All queries are read-only over a populated [`nova_types::TypeEnv`].

mod check;
mod compat;
mod config;
mod error;
mod existential;
mod functional;
mod shape;
mod signature;

pub use crate::check::{check_lambda, LambdaChecker, LAMBDA_PARAMS, LAMBDA_RETURN};
pub use crate::compat::{
    check_parameters, check_return, check_return_guarded, ExprTypes, LambdaDiagnostic,
    ParameterMismatch, RecursionGuard,
};
pub use crate::config::{LambdaCheckConfig, DEFAULT_NOT_INTERFACE_MESSAGE};
pub use crate::error::InternalError;
pub use crate::existential::has_unconstrained_wildcard;
pub use crate::functional::{
    check_class_functional, resolve_functional, FunctionalError, FunctionalResolver,
    FunctionalTarget, ResolvedSam,
};
pub use crate::shape::{
    Expr, ExprId, LambdaBody, LambdaParam, LambdaParams, LambdaParent, LambdaShape, LoopKind,
    Stmt,
};
pub use crate::signature::{function_candidates, CandidateCache, MethodSignature};
