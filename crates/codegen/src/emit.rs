//! Emission driver.
//!
//! Walks the linked artifact graph and produces one in-memory file
//! description per artifact, plus the index registration file and optional
//! diagnostic documents. Pure with respect to the filesystem; the writer
//! puts descriptors on disk afterwards.

use serde_json::{json, Value};

use typegql_core::{
    DmmfDocument, GeneratorConfig, GeneratorError, ResolvedScalar, ScalarKind, ScalarTable,
};

use crate::linker::{LinkedArtifactSet, ResolvedReference};
use crate::naming::to_camel_case;
use crate::planner::{Artifact, ArtifactKind, PlannedField, PlannedMethod, PlannedType};
use crate::templates::TemplateEngine;

/// One file the host should materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: String,
    pub content: String,
    /// Primary exported symbol, when the file has one.
    pub symbol: Option<String>,
    /// Host-side transpilation requested for this file.
    pub transpile: bool,
}

pub fn emit(
    linked: &LinkedArtifactSet,
    scalars: &ScalarTable,
    config: &GeneratorConfig,
    document: &DmmfDocument,
    alternate: Option<&Value>,
) -> Result<Vec<FileDescriptor>, GeneratorError> {
    let engine = TemplateEngine::new()?;
    let mut files = Vec::with_capacity(linked.artifacts().len() + 2);

    let mut order: Vec<usize> = (0..linked.artifacts().len()).collect();
    order.sort_by(|&a, &b| linked.artifacts()[a].path.cmp(&linked.artifacts()[b].path));

    for index in order {
        let artifact = &linked.artifacts()[index];
        let content = render_artifact(linked, scalars, &engine, index)?;
        files.push(FileDescriptor {
            path: artifact.path.clone(),
            content,
            symbol: match artifact.kind {
                ArtifactKind::Index => None,
                _ => Some(artifact.symbol.clone()),
            },
            transpile: config.emit_transpiled_code,
        });
    }

    if config.emit_dmmf {
        files.push(FileDescriptor {
            path: "dmmf.json".to_string(),
            content: serde_json::to_string_pretty(document)?,
            symbol: None,
            transpile: false,
        });
        let alt = match alternate {
            Some(value) => serde_json::to_string_pretty(value)?,
            None => serde_json::to_string_pretty(document)?,
        };
        files.push(FileDescriptor {
            path: "prisma-client-dmmf.json".to_string(),
            content: alt,
            symbol: None,
            transpile: false,
        });
    }

    tracing::debug!(files = files.len(), "emission complete");
    Ok(files)
}

fn render_artifact(
    linked: &LinkedArtifactSet,
    scalars: &ScalarTable,
    engine: &TemplateEngine,
    index: usize,
) -> Result<String, GeneratorError> {
    let artifact = &linked.artifacts()[index];
    match &artifact.kind {
        ArtifactKind::EnumType | ArtifactKind::ScalarFieldEnum => engine.render(
            "enum",
            &json!({ "symbol": artifact.symbol, "values": artifact.enum_values }),
        ),
        ArtifactKind::Model | ArtifactKind::AggregateOutput | ArtifactKind::AffectedRowsOutput => {
            render_class(linked, scalars, engine, index, "ObjectType")
        }
        ArtifactKind::WhereInput
        | ArtifactKind::WhereUniqueInput
        | ArtifactKind::OrderByInput
        | ArtifactKind::CreateInput
        | ArtifactKind::UpdateInput
        | ArtifactKind::UncheckedCreateInput
        | ArtifactKind::UncheckedUpdateInput => {
            render_class(linked, scalars, engine, index, "InputType")
        }
        ArtifactKind::CrudArgs(_) | ArtifactKind::RelationArgs => {
            render_class(linked, scalars, engine, index, "ArgsType")
        }
        ArtifactKind::CrudResolver(_) => render_crud_resolver(linked, scalars, engine, index),
        ArtifactKind::RelationsResolver => render_relations_resolver(linked, scalars, engine, index),
        ArtifactKind::Index => render_index(linked, engine),
    }
}

fn render_class(
    linked: &LinkedArtifactSet,
    scalars: &ScalarTable,
    engine: &TemplateEngine,
    index: usize,
    decorator: &str,
) -> Result<String, GeneratorError> {
    let artifact = &linked.artifacts()[index];
    let fields: Vec<Value> = artifact
        .fields
        .iter()
        .map(|f| field_context(scalars, f))
        .collect();

    engine.render(
        "class",
        &json!({
            "symbol": artifact.symbol,
            "decorator": decorator,
            "imports": import_lines(linked, index),
            "fields": fields,
        }),
    )
}

fn render_crud_resolver(
    linked: &LinkedArtifactSet,
    scalars: &ScalarTable,
    engine: &TemplateEngine,
    index: usize,
) -> Result<String, GeneratorError> {
    let artifact = &linked.artifacts()[index];
    let method = artifact
        .methods
        .first()
        .ok_or_else(|| GeneratorError::Template(format!("resolver `{}` has no method", artifact.symbol)))?;
    let entity = entity_model_symbol(linked, artifact);

    engine.render(
        "resolver",
        &json!({
            "symbol": artifact.symbol,
            "entity": entity,
            "imports": import_lines(linked, index),
            "exposure": if method.mutation { "Mutation" } else { "Query" },
            "return_gql": type_expr(scalars, &method.returns, method.list),
            "return_ts": return_ts(scalars, method),
            "nullable": method.nullable,
            "method": method.name,
            "args_param": args_param(method),
            "invoke_args": invoke_args(method),
            "client_entity": method.data_access.entity,
            "operation": method.data_access.operation,
        }),
    )
}

fn render_relations_resolver(
    linked: &LinkedArtifactSet,
    scalars: &ScalarTable,
    engine: &TemplateEngine,
    index: usize,
) -> Result<String, GeneratorError> {
    let artifact = &linked.artifacts()[index];
    let entity = entity_model_symbol(linked, artifact);
    let root = to_camel_case(&entity);

    let methods: Vec<Value> = artifact
        .methods
        .iter()
        .map(|m| {
            json!({
                "name": m.name,
                "return_gql": type_expr(scalars, &m.returns, m.list),
                "return_ts": return_ts(scalars, m),
                "nullable": m.nullable,
                "root": root,
                "root_key": m.root_key.as_deref().unwrap_or("id"),
                "args_param": args_param(m),
                "invoke_args": invoke_args(m),
                "client_entity": m.data_access.entity,
            })
        })
        .collect();

    engine.render(
        "relations",
        &json!({
            "symbol": artifact.symbol,
            "entity": entity,
            "imports": import_lines(linked, index),
            "methods": methods,
        }),
    )
}

fn render_index(
    linked: &LinkedArtifactSet,
    engine: &TemplateEngine,
) -> Result<String, GeneratorError> {
    let mut exports: Vec<&Artifact> = linked
        .artifacts()
        .iter()
        .filter(|a| a.kind.is_resolver())
        .collect();
    exports.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let exports: Vec<Value> = exports
        .iter()
        .map(|a| {
            json!({
                "symbol": a.symbol,
                "module": a.path.trim_end_matches(".ts"),
            })
        })
        .collect();

    engine.render("index", &json!({ "exports": exports }))
}

/// The model output symbol of the entity a resolver is attached to.
fn entity_model_symbol(linked: &LinkedArtifactSet, artifact: &Artifact) -> String {
    linked
        .artifacts()
        .iter()
        .find(|a| a.kind == ArtifactKind::Model && a.entity == artifact.entity)
        .map(|a| a.symbol.clone())
        .unwrap_or_else(|| artifact.entity.clone().unwrap_or_default())
}

/// Import lines for an artifact, derived from its resolved references and
/// ordered as declared. Self-references and primitives import nothing.
fn import_lines(linked: &LinkedArtifactSet, index: usize) -> Vec<String> {
    let artifact = &linked.artifacts()[index];
    let mut lines = Vec::new();
    let mut push = |line: String| {
        if !lines.contains(&line) {
            lines.push(line);
        }
    };

    for reference in linked.references(index) {
        match reference {
            ResolvedReference::Artifact(j) => {
                if *j == index {
                    continue;
                }
                let target = &linked.artifacts()[*j];
                push(format!(
                    "import {{ {} }} from \"{}\";",
                    target.symbol,
                    relative_import(&artifact.path, &target.path)
                ));
            }
            ResolvedReference::Scalar { binding, .. } => {
                if let ResolvedScalar::Custom(entry) = binding {
                    push(format!(
                        "import {{ {} }} from \"{}\";",
                        entry.graphql.import_name, entry.graphql.module
                    ));
                    if let Some(field) = &entry.field {
                        push(format!(
                            "import {{ {} }} from \"{}\";",
                            field.import_name, field.module
                        ));
                    }
                }
            }
        }
    }
    lines
}

/// Relative module specifier from one generated file to another.
fn relative_import(from: &str, to: &str) -> String {
    let from_dirs: Vec<&str> = {
        let mut parts: Vec<&str> = from.split('/').collect();
        parts.pop();
        parts
    };
    let mut to_parts: Vec<&str> = to.split('/').collect();
    let to_file = to_parts.pop().unwrap_or_default();
    let to_file = to_file.trim_end_matches(".ts");

    let common = from_dirs
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_dirs.len() - common;
    let mut spec = if ups == 0 {
        "./".to_string()
    } else {
        "../".repeat(ups)
    };
    for dir in &to_parts[common..] {
        spec.push_str(dir);
        spec.push('/');
    }
    spec.push_str(to_file);
    spec
}

fn field_context(scalars: &ScalarTable, field: &PlannedField) -> Value {
    let ts = ts_type(scalars, &field.ty, field.list);
    let declaration = if field.nullable {
        format!("{}?: {} | undefined", field.name, ts)
    } else {
        format!("{}!: {}", field.name, ts)
    };
    json!({
        "gql_type": type_expr(scalars, &field.ty, field.list),
        "nullable": field.nullable,
        "declaration": declaration,
    })
}

/// GraphQL type expression for a planned type, list-wrapped when needed.
fn type_expr(scalars: &ScalarTable, ty: &PlannedType, list: bool) -> String {
    let base = match ty {
        PlannedType::Ref(symbol) => symbol.clone(),
        PlannedType::Primitive(p) => primitive_gql(p).to_string(),
        PlannedType::Scalar(kind) => match scalars.resolve(kind) {
            ResolvedScalar::Custom(entry) => entry.graphql.import_name,
            ResolvedScalar::Primitive(p) => primitive_gql(p).to_string(),
        },
    };
    if list {
        format!("[{base}]")
    } else {
        base
    }
}

fn primitive_gql(p: &str) -> &str {
    match p {
        "Int" => "TypeGraphQL.Int",
        "Float" => "TypeGraphQL.Float",
        other => other,
    }
}

fn ts_type(scalars: &ScalarTable, ty: &PlannedType, list: bool) -> String {
    let base = match ty {
        PlannedType::Ref(symbol) => symbol.clone(),
        PlannedType::Primitive(p) => primitive_ts(p).to_string(),
        PlannedType::Scalar(kind) => {
            let field_override = ScalarTable::lookup_name(kind)
                .and_then(|name| scalars.get(name))
                .and_then(|entry| entry.field.as_ref())
                .map(|b| b.import_name.clone());
            field_override.unwrap_or_else(|| scalar_ts(kind).to_string())
        }
    };
    if list {
        format!("{base}[]")
    } else {
        base
    }
}

fn primitive_ts(p: &str) -> &str {
    match p {
        "Int" | "Float" => "number",
        "String" => "string",
        "Boolean" => "boolean",
        "Date" => "Date",
        other => other,
    }
}

fn scalar_ts(kind: &ScalarKind) -> &str {
    match kind {
        ScalarKind::String => "string",
        ScalarKind::Int | ScalarKind::Float | ScalarKind::Decimal => "number",
        ScalarKind::Boolean => "boolean",
        ScalarKind::DateTime => "Date",
        ScalarKind::Json => "any",
        ScalarKind::Bytes => "Buffer",
        ScalarKind::BigInt => "bigint",
        ScalarKind::Enum(_) => "string",
    }
}

fn return_ts(scalars: &ScalarTable, method: &PlannedMethod) -> String {
    let base = ts_type(scalars, &method.returns, method.list);
    if method.nullable {
        format!("{base} | null")
    } else {
        base
    }
}

fn args_param(method: &PlannedMethod) -> String {
    match &method.args_symbol {
        Some(symbol) => format!(", @TypeGraphQL.Args() args: {symbol}"),
        None => String::new(),
    }
}

fn invoke_args(method: &PlannedMethod) -> &'static str {
    if method.args_symbol.is_some() {
        "args"
    } else {
        "{}"
    }
}
