use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate the schema and report violations.
    Check(CheckArgs),
    /// List entities, or show one entity's fields and edges.
    Describe(DescribeArgs),
    /// List relations with their back-references.
    Relations,
    /// Write the compiler form (JSON or TOML).
    Export(ExportArgs),
    /// Emit ent Go schema sources.
    Generate(GenerateArgs),
    /// Print the JSON Schema of an entity record or of the compiler form.
    JsonSchema(JsonSchemaArgs),
    /// Validate a JSON record against an entity.
    Record(RecordArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CheckArgs {
    /// Fail on warnings as well as errors (also `general.strict`).
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Debug, Args)]
pub struct DescribeArgs {
    /// Entity to show. Lists every entity when omitted.
    pub entity: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Toml,
}

#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    /// Encoding. Defaults to the --out extension, or json.
    #[arg(long)]
    pub to: Option<ExportFormat>,

    /// Destination file. Prints to stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    /// Output directory (defaults to `codegen.out_dir`).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// List the files that would be written without writing them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Args)]
pub struct JsonSchemaArgs {
    /// Entity whose record schema to print.
    #[arg(required_unless_present = "bundle", conflicts_with = "bundle")]
    pub entity: Option<String>,

    /// Print the schema of the compiler form instead.
    #[arg(long)]
    pub bundle: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RecordArgs {
    /// Entity the record belongs to.
    pub entity: String,

    /// JSON file holding the record.
    pub file: PathBuf,

    /// Fill absent defaulted fields before validating.
    #[arg(long)]
    pub apply_defaults: bool,
}
