use std::path::{Path, PathBuf};

use anyhow::Context;
use entwine_gen::{GoEmitter, write_all};
use entwine_schema::{SchemaRegistry, Severity};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::GenerateArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct GeneratedRow {
    path: String,
    package: String,
    bytes: usize,
    written: bool,
}

/// Handle `entwine generate`.
///
/// Refuses to emit anything while the schema has validation errors.
pub fn handle(args: &GenerateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&ctx.config.codegen.out_dir));
    let emitter = GoEmitter::new(&ctx.config.codegen.package);

    let rows = generate(&ctx.registry, &emitter, &out_dir, args.dry_run)?;
    output(&rows, flags.format)
}

fn generate(
    registry: &SchemaRegistry,
    emitter: &GoEmitter,
    out_dir: &Path,
    dry_run: bool,
) -> anyhow::Result<Vec<GeneratedRow>> {
    let report = registry.validate();
    if !report.is_valid() {
        for violation in report.violations.iter().filter(|v| v.severity == Severity::Error) {
            tracing::error!("{violation}");
        }
        anyhow::bail!(
            "refusing to generate from an invalid schema: {}",
            report.summary()
        );
    }

    let files = emitter
        .emit(registry)
        .context("failed to emit Go schema sources")?;

    let paths: Vec<PathBuf> = if dry_run {
        files.iter().map(|file| out_dir.join(&file.path)).collect()
    } else {
        write_all(&files, out_dir)
            .with_context(|| format!("failed to write sources to {}", out_dir.display()))?
    };

    Ok(paths
        .iter()
        .zip(&files)
        .map(|(path, file)| GeneratedRow {
            path: path.display().to_string(),
            package: emitter.package().to_string(),
            bytes: file.contents.len(),
            written: !dry_run,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use entwine_schema::community_schema;
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolved() -> SchemaRegistry {
        let mut registry = community_schema().unwrap();
        registry
            .resolve_enum("User", "role", &["member".to_string(), "owner".to_string()])
            .unwrap();
        registry
            .resolve_enum("Subscription", "plan", &["free".to_string(), "pro".to_string()])
            .unwrap();
        registry
    }

    #[test]
    fn unresolved_schema_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let registry = community_schema().unwrap();
        let err = generate(&registry, &GoEmitter::default(), dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("invalid schema"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("ent/schema");
        let rows = generate(&resolved(), &GoEmitter::new("entschema"), &out, true).unwrap();

        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| !row.written && row.package == "entschema"));
        assert!(rows[0].path.ends_with("user.go"));
        assert!(!out.exists());
    }

    #[test]
    fn writes_one_file_per_entity() {
        let dir = tempfile::tempdir().unwrap();
        let rows = generate(&resolved(), &GoEmitter::default(), dir.path(), false).unwrap();

        assert!(rows.iter().all(|row| row.written));
        for row in &rows {
            let contents = std::fs::read_to_string(&row.path).unwrap();
            assert_eq!(contents.len(), row.bytes);
            assert!(contents.starts_with("package schema\n"));
        }
    }
}
