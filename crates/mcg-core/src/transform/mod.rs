pub mod builder;
pub mod decorate;

pub use builder::build;
pub use decorate::{Decoration, DecorationHooks, HookKind};
