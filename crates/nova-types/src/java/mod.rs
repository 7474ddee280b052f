//! Java-specific type queries: presentable formatting, supertype instantiation and erasure,
//! subtyping and assignment compatibility.

pub mod format;
pub mod helpers;
pub mod subtyping;
