use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `entwine relations`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.registry.relations(), flags.format)
}
