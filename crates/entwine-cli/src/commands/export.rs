use std::path::Path;

use anyhow::Context;
use entwine_schema::BundleFormat;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ExportArgs, ExportFormat};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExportResponse {
    path: String,
    format: &'static str,
    entities: usize,
    bytes: usize,
}

/// Handle `entwine export`.
///
/// Without `--out` the encoded bundle is printed as-is, ignoring `--format`.
pub fn handle(args: &ExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let format = resolve_format(args.to, args.out.as_deref())?;
    let text = ctx
        .registry
        .encode(format)
        .context("failed to encode schema bundle")?;

    let Some(path) = &args.out else {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported schema bundle");

    output(
        &ExportResponse {
            path: path.display().to_string(),
            format: match format {
                BundleFormat::Json => "json",
                BundleFormat::Toml => "toml",
            },
            entities: ctx.registry.len(),
            bytes: text.len(),
        },
        flags.format,
    )
}

/// `--to` wins; otherwise the `--out` extension; otherwise JSON.
fn resolve_format(to: Option<ExportFormat>, out: Option<&Path>) -> anyhow::Result<BundleFormat> {
    match (to, out) {
        (Some(ExportFormat::Json), _) => Ok(BundleFormat::Json),
        (Some(ExportFormat::Toml), _) => Ok(BundleFormat::Toml),
        (None, Some(path)) => BundleFormat::from_path(path)
            .with_context(|| format!("cannot infer format of {}; pass --to", path.display())),
        (None, None) => Ok(BundleFormat::Json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_format_wins() {
        let format = resolve_format(Some(ExportFormat::Toml), Some(Path::new("schema.json")));
        assert_eq!(format.unwrap(), BundleFormat::Toml);
    }

    #[test]
    fn format_from_extension_or_default() {
        assert_eq!(
            resolve_format(None, Some(Path::new("out/schema.toml"))).unwrap(),
            BundleFormat::Toml
        );
        assert_eq!(resolve_format(None, None).unwrap(), BundleFormat::Json);
        assert!(resolve_format(None, Some(Path::new("schema.yml"))).is_err());
    }
}
