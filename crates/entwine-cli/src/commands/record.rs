use anyhow::Context;
use entwine_schema::{SchemaError, SchemaRegistry};
use serde::Serialize;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RecordArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RecordResponse {
    entity: String,
    valid: bool,
    defaults_applied: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    record: Value,
}

/// Handle `entwine record ENTITY FILE`.
pub fn handle(args: &RecordArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let record: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let response = check_record(&ctx.registry, &args.entity, record, args.apply_defaults)?;
    output(&response, flags.format)?;

    if response.valid {
        Ok(())
    } else {
        anyhow::bail!(
            "{} record in {} has {} error(s)",
            args.entity,
            args.file.display(),
            response.errors.len()
        )
    }
}

/// Fill defaults when asked, then validate. Record-level failures land in
/// the response; unknown entities and schema errors are returned.
fn check_record(
    registry: &SchemaRegistry,
    entity: &str,
    mut record: Value,
    apply_defaults: bool,
) -> Result<RecordResponse, SchemaError> {
    let defaults_applied = if apply_defaults {
        registry.apply_defaults(entity, &mut record)?
    } else {
        0
    };

    let errors = match registry.validate_record(entity, &record) {
        Ok(()) => Vec::new(),
        Err(SchemaError::ValidationFailed { errors }) => errors,
        Err(other) => return Err(other),
    };

    Ok(RecordResponse {
        entity: entity.to_string(),
        valid: errors.is_empty(),
        defaults_applied,
        errors,
        record,
    })
}
