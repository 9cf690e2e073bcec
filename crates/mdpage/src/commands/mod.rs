//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod bundle;
pub(crate) mod convert;

pub(crate) use build::BuildArgs;
pub(crate) use bundle::BundleArgs;
pub(crate) use convert::ConvertArgs;
