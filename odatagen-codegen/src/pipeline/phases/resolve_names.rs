//! Resolve-names phase - computes canonical operation identifiers.

use eyre::Result;
use tracing::debug;

use crate::{
    names::NameResolver,
    pipeline::{CompilationContext, Phase},
};

/// Phase that resolves every operation to its canonical identifier.
///
/// Two operations resolving to the same identifier abort the pipeline with
/// [`Error::NameCollision`](crate::Error::NameCollision).
pub struct ResolveNamesPhase;

impl Phase for ResolveNamesPhase {
    fn name(&self) -> &'static str {
        "resolve-names"
    }

    fn description(&self) -> &'static str {
        "Compute canonical operation identifiers"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let names = NameResolver.resolve_all(&ctx.graph)?;
        debug!(operations = names.len(), "resolved operation identifiers");
        ctx.names = Some(names);
        Ok(())
    }
}
