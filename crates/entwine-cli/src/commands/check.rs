use entwine_schema::{ValidationReport, Violation};
use serde::Serialize;

use crate::cli::root_commands::CheckArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::{AppContext, SchemaSource};
use crate::output::output;

#[derive(Debug, Serialize)]
struct CheckResponse<'a> {
    source: String,
    summary: String,
    valid: bool,
    strict: bool,
    passed: bool,
    violations: &'a [Violation],
}

/// Handle `entwine check`.
///
/// Fails when the report has errors, or warnings in strict mode.
pub fn handle(args: &CheckArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let strict = args.strict || ctx.config.general.strict;
    let report = ctx.registry.validate();
    let passed = report.passes(strict);

    if flags.format == OutputFormat::Table {
        if report.violations.is_empty() {
            println!("{}", report.summary());
        } else {
            output(&report.violations, flags.format)?;
        }
    } else {
        output(&response(&report, &ctx.source, strict), flags.format)?;
    }

    if passed {
        Ok(())
    } else {
        anyhow::bail!("schema check failed: {}", report.summary())
    }
}

fn response<'a>(
    report: &'a ValidationReport,
    source: &SchemaSource,
    strict: bool,
) -> CheckResponse<'a> {
    CheckResponse {
        source: match source {
            SchemaSource::Builtin => "builtin".to_string(),
            SchemaSource::File(path) => path.display().to_string(),
        },
        summary: report.summary(),
        valid: report.is_valid(),
        strict,
        passed: report.passes(strict),
        violations: &report.violations,
    }
}
