//! CLI command implementations.

pub(crate) mod collect;
pub(crate) mod fetch;
pub(crate) mod symbols;
pub(crate) mod validate;
