//! Functional interface resolution for lambda targets (JLS 9.8, 9.9).

use std::sync::Arc;

use nova_types::{
    erasure, format_type, mentions_type_var, ClassId, ClassType, Substitutor, Type,
    TypeEnv, WildcardBound,
};
use thiserror::Error;

use crate::config::DEFAULT_NOT_INTERFACE_MESSAGE;
use crate::{
    function_candidates, has_unconstrained_wildcard, CandidateCache, InternalError,
    LambdaCheckConfig, MethodSignature,
};

/// Why a type cannot be used as a lambda target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionalError {
    #[error("{}", DEFAULT_NOT_INTERFACE_MESSAGE)]
    NotAnInterface,
    #[error("No target method found")]
    NoTargetMethod,
    /// `in_type` is set when the ambiguity comes from several functional members of an
    /// intersection.
    #[error(
        "Multiple non-overriding abstract methods found{}",
        .in_type.as_ref().map(|ty| format!(" in {ty}")).unwrap_or_default()
    )]
    AmbiguousMethods { in_type: Option<String> },
    #[error("Target method is generic")]
    GenericMethodTarget,
    #[error("No instance of type {0} exists so that lambda expression can be type-checked")]
    UnresolvedTypeArguments(String),
    #[error("{0} is not a functional interface")]
    NotFunctional(String),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl FunctionalError {
    pub fn is_internal(&self) -> bool {
        matches!(self, FunctionalError::Internal(_))
    }

    /// User-facing message, honoring the configured not-an-interface wording.
    pub fn message(&self, config: &LambdaCheckConfig) -> String {
        match self {
            FunctionalError::NotAnInterface => config.not_interface_message.clone(),
            other => other.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FunctionalError::NotAnInterface => "LAMBDA_NOT_INTERFACE",
            FunctionalError::NoTargetMethod => "LAMBDA_NO_TARGET_METHOD",
            FunctionalError::AmbiguousMethods { .. } => "LAMBDA_AMBIGUOUS_METHODS",
            FunctionalError::GenericMethodTarget => "LAMBDA_GENERIC_TARGET",
            FunctionalError::UnresolvedTypeArguments(_) => "LAMBDA_UNRESOLVED_TYPE_ARGS",
            FunctionalError::NotFunctional(_) => "LAMBDA_NOT_FUNCTIONAL",
            FunctionalError::Internal(_) => "LAMBDA_INTERNAL",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FunctionalTarget {
    /// The target is a type variable still being inferred; whoever owns the inference reports
    /// problems with it.
    Deferred,
    Sam(ResolvedSam),
}

impl FunctionalTarget {
    pub fn sam(&self) -> Option<&ResolvedSam> {
        match self {
            FunctionalTarget::Deferred => None,
            FunctionalTarget::Sam(sam) => Some(sam),
        }
    }
}

/// The single abstract method of a functional interface type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSam {
    /// Interface the target type refers to (not necessarily the method's owner).
    pub class: ClassId,
    pub signature: MethodSignature,
    /// `class`'s type parameters mapped to the target type's arguments.
    pub substitutor: Substitutor,
}

impl ResolvedSam {
    /// The substitutor of the ground target type (JLS 9.9): wildcard arguments replaced by a
    /// type, so the function type has no wildcards at top level.
    pub fn ground_substitutor(&self, env: &dyn TypeEnv) -> Substitutor {
        let class_params: Vec<_> = env
            .class(self.class)
            .map(|def| def.type_params.clone())
            .unwrap_or_default();

        self.substitutor
            .iter()
            .map(|(var, ty)| {
                let grounded = match ty {
                    Type::Wildcard(WildcardBound::Extends(bound) | WildcardBound::Super(bound)) => {
                        (**bound).clone()
                    }
                    Type::Wildcard(WildcardBound::Unbounded) => {
                        let bounds = env
                            .type_param(var)
                            .map(|tp| tp.upper_bounds.clone())
                            .unwrap_or_default();
                        if bounds.is_empty() {
                            Type::class(env.well_known().object, vec![])
                        } else if bounds
                            .iter()
                            .any(|b| class_params.iter().any(|p| mentions_type_var(b, *p)))
                        {
                            // F-bounded (`T extends Comparable<T>`): no closed form, use erasure.
                            erasure(env, &Type::TypeVar(var))
                        } else {
                            Type::intersection(bounds)
                        }
                    }
                    other => other.clone(),
                };
                (var, grounded)
            })
            .collect()
    }

    pub fn parameter_types(&self, env: &dyn TypeEnv) -> Vec<Type> {
        let ground = self.ground_substitutor(env);
        self.signature
            .params
            .iter()
            .map(|p| ground.substitute(p))
            .collect()
    }

    pub fn return_type(&self, env: &dyn TypeEnv) -> Type {
        self.ground_substitutor(env)
            .substitute(&self.signature.return_type)
    }
}

/// Resolves target types to their functional method.
///
/// Cheap to construct; borrow a [`CandidateCache`] to share candidate computation across calls.
#[derive(Clone, Copy)]
pub struct FunctionalResolver<'a> {
    env: &'a dyn TypeEnv,
    cache: Option<&'a CandidateCache>,
    check_existential: bool,
}

impl<'a> FunctionalResolver<'a> {
    pub fn new(env: &'a dyn TypeEnv) -> Self {
        Self {
            env,
            cache: None,
            check_existential: true,
        }
    }

    pub fn with_cache(mut self, cache: &'a CandidateCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_config(mut self, config: &LambdaCheckConfig) -> Self {
        self.check_existential = config.report_unresolved_type_arguments;
        self
    }

    pub fn resolve(&self, ty: &Type) -> Result<FunctionalTarget, FunctionalError> {
        let result = self.resolve_type(ty);
        match &result {
            Ok(FunctionalTarget::Deferred) => tracing::debug!(
                target: "nova.lambda",
                ty = %format_type(self.env, ty),
                "functional target deferred"
            ),
            Ok(FunctionalTarget::Sam(sam)) => tracing::debug!(
                target: "nova.lambda",
                ty = %format_type(self.env, ty),
                method = %sam.signature.name,
                "resolved functional target"
            ),
            Err(err) if !err.is_internal() => tracing::debug!(
                target: "nova.lambda",
                ty = %format_type(self.env, ty),
                code = err.code(),
                "type is not a functional target"
            ),
            // Already logged where the fault was detected.
            Err(_) => {}
        }
        result
    }

    fn resolve_type(&self, ty: &Type) -> Result<FunctionalTarget, FunctionalError> {
        match ty {
            Type::TypeVar(_) | Type::Unknown => Ok(FunctionalTarget::Deferred),
            Type::Intersection(members) => self.resolve_intersection(ty, members),
            Type::Class(class_type) => self.resolve_class(ty, class_type),
            Type::Wildcard(WildcardBound::Extends(bound)) => self.resolve_type(bound),
            Type::Void
            | Type::Null
            | Type::Primitive(_)
            | Type::Array(_)
            | Type::Wildcard(WildcardBound::Unbounded | WildcardBound::Super(_)) => Err(
                FunctionalError::NotFunctional(format_type(self.env, ty)),
            ),
        }
    }

    fn resolve_intersection(
        &self,
        ty: &Type,
        members: &[Type],
    ) -> Result<FunctionalTarget, FunctionalError> {
        let mut first_error = None;
        let mut resolved = Vec::new();
        for member in members {
            match self.resolve_type(member) {
                Ok(target) => resolved.push(target),
                Err(err) if err.is_internal() => return Err(err),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        match resolved.len() {
            0 => Err(first_error
                .unwrap_or_else(|| FunctionalError::NotFunctional(format_type(self.env, ty)))),
            1 => Ok(resolved.swap_remove(0)),
            _ => Err(FunctionalError::AmbiguousMethods {
                in_type: Some(format_type(self.env, ty)),
            }),
        }
    }

    fn resolve_class(
        &self,
        ty: &Type,
        class_type: &ClassType,
    ) -> Result<FunctionalTarget, FunctionalError> {
        let class = class_type.def;
        let Some(class_def) = self.env.class(class) else {
            return Err(InternalError::missing_class(class).into());
        };
        let substitutor = Substitutor::for_class(self.env, class_def, &class_type.args);

        let candidates = self.candidates(class);
        let candidate = single_candidate(candidates.as_deref())?;

        if self.check_existential
            && has_unconstrained_wildcard(self.env, class_def, candidate, &substitutor)
        {
            return Err(FunctionalError::UnresolvedTypeArguments(format_type(
                self.env, ty,
            )));
        }

        Ok(FunctionalTarget::Sam(ResolvedSam {
            class,
            signature: candidate.clone(),
            substitutor,
        }))
    }

    fn candidates(&self, class: ClassId) -> Option<Arc<[MethodSignature]>> {
        match self.cache {
            Some(cache) => cache.candidates(self.env, class),
            None => function_candidates(self.env, class).map(Arc::from),
        }
    }
}

/// Candidate count and generic-method checks shared by type- and declaration-level resolution.
fn single_candidate(
    candidates: Option<&[MethodSignature]>,
) -> Result<&MethodSignature, FunctionalError> {
    match candidates {
        None => Err(FunctionalError::NotAnInterface),
        Some([]) => Err(FunctionalError::NoTargetMethod),
        Some([candidate]) if candidate.is_generic() => Err(FunctionalError::GenericMethodTarget),
        Some([candidate]) => Ok(candidate),
        Some(_) => Err(FunctionalError::AmbiguousMethods { in_type: None }),
    }
}

/// Resolve `ty` as a lambda target without a candidate cache.
pub fn resolve_functional(
    env: &dyn TypeEnv,
    ty: &Type,
) -> Result<FunctionalTarget, FunctionalError> {
    FunctionalResolver::new(env).resolve(ty)
}

/// Declaration-level check: is `class` a functional interface, ignoring type arguments?
pub fn check_class_functional(env: &dyn TypeEnv, class: ClassId) -> Result<(), FunctionalError> {
    if env.class(class).is_none() {
        return Err(InternalError::missing_class(class).into());
    }
    let candidates = function_candidates(env, class);
    single_candidate(candidates.as_deref()).map(|_| ())
}
