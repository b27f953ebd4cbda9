//! Built-in pipeline phases.

mod map_types;
mod resolve_names;
mod validate;

pub use map_types::MapTypesPhase;
pub use resolve_names::ResolveNamesPhase;
pub use validate::{AbstractResourceSetLint, EmptyContainerLint, Lint, ValidatePhase};
