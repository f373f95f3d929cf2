//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;

pub use deps::{build_providers, build_store, ServerDeps};
pub use test_dependencies::{MockProvider, TestDependencies};
