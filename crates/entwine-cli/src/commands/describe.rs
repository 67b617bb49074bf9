use anyhow::Context;
use entwine_core::{EdgeDescriptor, EntityDescriptor, FieldDescriptor};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DescribeArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct EntitySummary<'a> {
    name: &'a str,
    external: bool,
    fields: usize,
    edges: usize,
}

/// One field or edge of an entity.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct MemberRow {
    kind: &'static str,
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    modifiers: Vec<String>,
}

/// Handle `entwine describe [ENTITY]`.
pub fn handle(args: &DescribeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match &args.entity {
        None => {
            let summaries = ctx
                .registry
                .entities()
                .iter()
                .map(|entity| EntitySummary {
                    name: &entity.name,
                    external: entity.external,
                    fields: entity.fields.len(),
                    edges: entity.edges.len(),
                })
                .collect::<Vec<_>>();
            output(&summaries, flags.format)
        }
        Some(name) => {
            let entity = ctx
                .registry
                .entity(name)
                .with_context(|| format!("known entities: {}", ctx.registry.names().join(", ")))?;
            output(&members(entity), flags.format)
        }
    }
}

fn members(entity: &EntityDescriptor) -> Vec<MemberRow> {
    entity
        .fields
        .iter()
        .map(field_row)
        .chain(entity.edges.iter().map(edge_row))
        .collect()
}

fn field_row(field: &FieldDescriptor) -> MemberRow {
    let mut modifiers = Vec::new();
    if field.optional {
        modifiers.push("optional".to_string());
    }
    if field.unique {
        modifiers.push("unique".to_string());
    }
    if let Some(default) = &field.default {
        modifiers.push(format!("default={default}"));
    }
    MemberRow {
        kind: "field",
        name: field.name.clone(),
        type_name: field.field_type.to_string(),
        modifiers,
    }
}

fn edge_row(edge: &EdgeDescriptor) -> MemberRow {
    let mut modifiers = vec![edge.cardinality.to_string()];
    if let Some(owner_edge) = &edge.inverse {
        modifiers.push(format!("ref={owner_edge}"));
    }
    if edge.required {
        modifiers.push("required".to_string());
    }
    if let Some(field) = &edge.field {
        modifiers.push(format!("field={field}"));
    }
    MemberRow {
        kind: edge.direction.as_str(),
        name: edge.name.clone(),
        type_name: edge.target.clone(),
        modifiers,
    }
}
