//! Command-line front end: orchestration, rendering and dispatch.

pub mod dispatch;
pub mod render;
pub mod status;
pub mod workbench;

pub use workbench::{DigestKind, RepoRef, Workbench};
