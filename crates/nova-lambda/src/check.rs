use nova_types::{Diagnostic, Span, Type, TypeEnv};

use crate::{
    check_parameters, check_return, CandidateCache, ExprTypes, FunctionalError,
    FunctionalResolver, FunctionalTarget, LambdaCheckConfig, LambdaShape,
};

pub const LAMBDA_PARAMS: &str = "LAMBDA_PARAMS";
pub const LAMBDA_RETURN: &str = "LAMBDA_RETURN";

/// Runs target resolution and the compatibility checks for lambdas of one file or project.
///
/// Holds the candidate cache (when enabled) so repeated checks against the same interfaces only
/// walk each hierarchy once.
pub struct LambdaChecker<'env> {
    env: &'env dyn TypeEnv,
    config: LambdaCheckConfig,
    cache: Option<CandidateCache>,
}

impl<'env> LambdaChecker<'env> {
    pub fn new(env: &'env dyn TypeEnv, config: LambdaCheckConfig) -> Self {
        let cache = config.memoize_candidates.then(CandidateCache::new);
        Self { env, config, cache }
    }

    pub fn config(&self) -> &LambdaCheckConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&CandidateCache> {
        self.cache.as_ref()
    }

    pub fn resolver(&self) -> FunctionalResolver<'_> {
        let resolver = FunctionalResolver::new(self.env).with_config(&self.config);
        match &self.cache {
            Some(cache) => resolver.with_cache(cache),
            None => resolver,
        }
    }

    pub fn resolve(&self, target: &Type) -> Result<FunctionalTarget, FunctionalError> {
        self.resolver().resolve(target)
    }

    /// Drop memoized candidates; call after the declaration table was rebuilt.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Diagnostics for `lambda` converted to `target`, anchored at `span`.
    ///
    /// Target problems are reported alone. The return check only runs once the parameters fit,
    /// since body types computed against mismatched parameters are meaningless.
    pub fn check(
        &self,
        target: &Type,
        lambda: &LambdaShape,
        types: &dyn ExprTypes,
        span: Option<Span>,
    ) -> Vec<Diagnostic> {
        let sam = match self.resolve(target) {
            Ok(FunctionalTarget::Sam(sam)) => sam,
            Ok(FunctionalTarget::Deferred) => return Vec::new(),
            Err(err) if err.is_internal() => return Vec::new(),
            Err(err) => {
                return vec![Diagnostic::error(
                    err.code(),
                    err.message(&self.config),
                    span,
                )]
            }
        };

        let ground = sam.ground_substitutor(self.env);
        if let Some(mismatch) = check_parameters(self.env, lambda, &sam.signature, &ground) {
            return vec![Diagnostic::error(
                LAMBDA_PARAMS,
                mismatch.message(self.env),
                span,
            )];
        }

        let target_return = ground.substitute(&sam.signature.return_type);
        let mut diagnostics = Vec::new();
        if let Some(diag) = check_return(self.env, lambda, Some(&target_return), types) {
            diagnostics.push(Diagnostic::error(
                LAMBDA_RETURN,
                diag.message(self.env),
                span,
            ));
        }

        tracing::debug!(
            target: "nova.lambda",
            method = %sam.signature.name,
            diagnostics = diagnostics.len(),
            "checked lambda against functional target"
        );
        diagnostics
    }
}

/// One-off check of a single lambda. Prefer [`LambdaChecker`] when checking many lambdas.
pub fn check_lambda(
    env: &dyn TypeEnv,
    target: &Type,
    lambda: &LambdaShape,
    types: &dyn ExprTypes,
    config: &LambdaCheckConfig,
) -> Vec<Diagnostic> {
    let config = LambdaCheckConfig {
        memoize_candidates: false,
        ..config.clone()
    };
    LambdaChecker::new(env, config).check(target, lambda, types, None)
}
