use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NOT_INTERFACE_MESSAGE: &str =
    "Target type of a lambda conversion must be an interface";

/// Knobs for the lambda checks. Every field is optional when deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LambdaCheckConfig {
    /// Message reported when the target type is not an interface.
    ///
    /// Method references reuse the lambda checks with their own wording.
    #[serde(default = "LambdaCheckConfig::default_not_interface_message")]
    pub not_interface_message: String,

    /// Memoize functional-method candidates per interface declaration.
    #[serde(default = "default_true")]
    pub memoize_candidates: bool,

    /// Report targets like `Container<?>` whose wildcard cannot be instantiated.
    ///
    /// Disable when the caller performs its own inference of wildcard-parameterized targets.
    #[serde(default = "default_true")]
    pub report_unresolved_type_arguments: bool,
}

impl LambdaCheckConfig {
    fn default_not_interface_message() -> String {
        DEFAULT_NOT_INTERFACE_MESSAGE.to_string()
    }
}

fn default_true() -> bool {
    true
}

impl Default for LambdaCheckConfig {
    fn default() -> Self {
        Self {
            not_interface_message: Self::default_not_interface_message(),
            memoize_candidates: true,
            report_unresolved_type_arguments: true,
        }
    }
}
