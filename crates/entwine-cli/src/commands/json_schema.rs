use anyhow::Context;
use entwine_schema::SchemaBundle;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::JsonSchemaArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `entwine json-schema [ENTITY | --bundle]`.
pub fn handle(args: &JsonSchemaArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match (&args.entity, args.bundle) {
        (_, true) => SchemaBundle::json_schema().context("failed to generate bundle schema")?,
        (Some(entity), false) => ctx.registry.json_schema(entity)?,
        (None, false) => anyhow::bail!("pass an entity name or --bundle"),
    };
    output(&schema, flags.format)
}
