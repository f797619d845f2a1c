//! CLI command implementations.

pub(crate) mod preprocess;

pub(crate) use preprocess::PreprocessArgs;
