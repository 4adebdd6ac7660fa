//! Module contract, lifecycle registry and layered settings shared by every
//! productapp crate.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
