//! `ent` Go schema emitter.

use std::fs;
use std::path::{Path, PathBuf};

use entwine_core::naming::snake_case;
use entwine_core::{
    Cardinality, DefaultValue, EdgeDescriptor, EdgeDirection, EntityDescriptor, FieldDescriptor,
    FieldType,
};
use entwine_schema::SchemaRegistry;

use crate::error::GenError;

/// Default Go package for generated schema files.
pub const DEFAULT_PACKAGE: &str = "schema";

const ENT_IMPORT: &str = "entgo.io/ent";
const EDGE_IMPORT: &str = "entgo.io/ent/schema/edge";
const FIELD_IMPORT: &str = "entgo.io/ent/schema/field";

/// One emitted source file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct GoEmitter {
    package: String,
}

impl Default for GoEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGE)
    }
}

impl GoEmitter {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Emit one file per declared entity, in registry order.
    ///
    /// # Errors
    ///
    /// Returns `GenError::UnresolvedEnum` for the first enum field without
    /// members.
    pub fn emit(&self, registry: &SchemaRegistry) -> Result<Vec<GeneratedFile>, GenError> {
        registry
            .declared()
            .map(|entity| self.emit_entity(entity))
            .collect()
    }

    /// Emit the schema source for a single entity.
    ///
    /// # Errors
    ///
    /// Returns `GenError::UnresolvedEnum` if an enum field has no members.
    pub fn emit_entity(&self, entity: &EntityDescriptor) -> Result<GeneratedFile, GenError> {
        if let Some(field) = entity.unresolved_enums().next() {
            return Err(GenError::UnresolvedEnum {
                entity: entity.name.clone(),
                field: field.name.clone(),
            });
        }
        let fields = entity.fields.iter().map(render_field).collect::<Vec<_>>();
        let edges = entity.edges.iter().map(render_edge).collect::<Vec<_>>();

        let name = &entity.name;
        let mut out = format!("package {}\n\n", self.package);
        out.push_str(&render_imports(!fields.is_empty(), !edges.is_empty()));

        out.push_str(&format!(
            "\n// {name} holds the schema definition for the {name} entity.\n"
        ));
        if let Some(comment) = &entity.comment {
            for line in comment.lines() {
                out.push_str(&format!("// {line}\n"));
            }
        }
        out.push_str(&format!("type {name} struct {{\n\tent.Schema\n}}\n"));

        out.push_str(&format!(
            "\n// Fields of {name}.\nfunc ({name}) Fields() []ent.Field {{\n"
        ));
        out.push_str(&render_list("ent.Field", &fields));
        out.push_str("}\n");

        out.push_str(&format!(
            "\n// Edges of {name}.\nfunc ({name}) Edges() []ent.Edge {{\n"
        ));
        out.push_str(&render_list("ent.Edge", &edges));
        out.push_str("}\n");

        Ok(GeneratedFile {
            path: PathBuf::from(format!("{}.go", snake_case(name))),
            contents: out,
        })
    }
}

/// Write every file under `dir`, creating it if needed.
///
/// Returns the written paths.
///
/// # Errors
///
/// Returns `GenError::Io` if the directory or a file cannot be written.
pub fn write_all(files: &[GeneratedFile], dir: &Path) -> Result<Vec<PathBuf>, GenError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.path);
        fs::write(&path, &file.contents)?;
        tracing::info!(path = %path.display(), bytes = file.contents.len(), "wrote schema source");
        written.push(path);
    }
    Ok(written)
}

fn render_imports(uses_field: bool, uses_edge: bool) -> String {
    let mut imports = vec![ENT_IMPORT];
    if uses_edge {
        imports.push(EDGE_IMPORT);
    }
    if uses_field {
        imports.push(FIELD_IMPORT);
    }
    let body: String = imports
        .iter()
        .map(|path| format!("\t\"{path}\"\n"))
        .collect();
    format!("import (\n{body})\n")
}

fn render_list(element: &str, items: &[String]) -> String {
    if items.is_empty() {
        return "\treturn nil\n".to_string();
    }
    let body: String = items.iter().map(|item| format!("\t\t{item},\n")).collect();
    format!("\treturn []{element}{{\n{body}\t}}\n")
}

fn render_field(field: &FieldDescriptor) -> String {
    let name = go_quote(&field.name);
    let mut out = match &field.field_type {
        FieldType::String => format!("field.String({name})"),
        FieldType::Bool => format!("field.Bool({name})"),
        FieldType::Int => format!("field.Int({name})"),
        FieldType::Float => format!("field.Float({name})"),
        FieldType::Time => format!("field.Time({name})"),
        FieldType::Enum { values } => {
            let members = values
                .iter()
                .map(|v| go_quote(v))
                .collect::<Vec<_>>()
                .join(", ");
            format!("field.Enum({name}).Values({members})")
        }
    };

    if field.optional {
        out.push_str(".Optional()");
    }
    if let Some(default) = &field.default {
        out.push_str(&format!(".Default({})", go_literal(default)));
    }
    if field.unique {
        out.push_str(".Unique()");
    }
    if let Some(comment) = &field.comment {
        out.push_str(&format!(".Comment({})", go_quote(comment)));
    }
    out
}

fn render_edge(edge: &EdgeDescriptor) -> String {
    let name = go_quote(&edge.name);
    let mut out = match edge.direction {
        EdgeDirection::To => format!("edge.To({name}, {}.Type)", edge.target),
        EdgeDirection::From => format!("edge.From({name}, {}.Type)", edge.target),
    };
    if let Some(owner_edge) = edge.inverse.as_deref().filter(|_| edge.is_back_reference()) {
        out.push_str(&format!(".Ref({})", go_quote(owner_edge)));
    }
    if edge.cardinality == Cardinality::One {
        out.push_str(".Unique()");
    }
    if edge.required {
        out.push_str(".Required()");
    }
    if let Some(field) = &edge.field {
        out.push_str(&format!(".Field({})", go_quote(field)));
    }
    out
}

fn go_literal(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Bool(v) => v.to_string(),
        DefaultValue::Int(v) => v.to_string(),
        DefaultValue::Float(v) => format!("{v:?}"),
        DefaultValue::String(v) => go_quote(v),
    }
}

/// Interpreted Go string literal.
fn go_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
