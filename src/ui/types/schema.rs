use anyhow::{Context, Result, anyhow};
use schemars::{JsonSchema, Schema, schema_for};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allowed: Option<Vec<String>>,
}

pub fn root_schema<T: JsonSchema>() -> Schema {
    schema_for!(T)
}

/// Flattens the top-level properties of a struct schema into field descriptions,
/// in declaration order.
pub fn field_specs(root: &Schema) -> Result<Vec<FieldSpec>> {
    let root_obj = root.as_object().context("root schema is not an object")?;
    let props = root_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .context("schema has no properties")?;

    let mut out = Vec::new();
    for (name, field_schema) in props {
        let mut fs_obj = field_schema
            .as_object()
            .context("field schema not object")?;

        if fs_obj.get("$ref").is_some() {
            fs_obj = resolve_ref_obj(root_obj, fs_obj)
                .ok_or_else(|| anyhow!("failed to resolve field $ref for '{name}'"))?;
        }

        let Some(kind) = detect_field_kind(fs_obj.get("type")) else {
            continue;
        };

        let title = fs_obj
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(name)
            .to_string();

        let description = fs_obj
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let min = fs_obj
            .get("minimum")
            .or_else(|| fs_obj.get("exclusiveMinimum"))
            .and_then(|v| v.as_f64());

        let max = fs_obj
            .get("maximum")
            .or_else(|| fs_obj.get("exclusiveMaximum"))
            .and_then(|v| v.as_f64());

        let allowed = fs_obj.get("enum").and_then(|v| v.as_array()).map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        });

        out.push(FieldSpec {
            name: name.clone(),
            title,
            description,
            kind,
            default: fs_obj.get("default").cloned(),
            min,
            max,
            allowed,
        });
    }
    Ok(out)
}

/// One line per field: `name  kind  default  constraints  description`.
pub fn render_field_table(specs: &[FieldSpec], defaults: &Value) -> String {
    let width = specs.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for spec in specs {
        let default = spec
            .default
            .clone()
            .or_else(|| defaults.get(&spec.name).cloned())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".into());

        let mut constraints = Vec::new();
        if let Some(min) = spec.min {
            constraints.push(format!(">= {min}"));
        }
        if let Some(max) = spec.max {
            constraints.push(format!("<= {max}"));
        }
        if let Some(allowed) = &spec.allowed {
            constraints.push(allowed.join("|"));
        }

        out.push_str(&format!(
            "{:<width$}  {:<7}  {:<12}  {:<28}  {}\n",
            spec.name,
            spec.kind.to_string(),
            default,
            constraints.join(", "),
            spec.description.as_deref().unwrap_or(spec.title.as_str()),
            width = width
        ));
    }
    out
}

/// Resolve a local $ref like "#/$defs/KnnParams" against the root object.
fn resolve_ref_obj<'a>(
    root_obj: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match obj.get("$ref") {
        Some(Value::String(r)) => {
            let path = r.strip_prefix("#/")?;
            let mut cur: &Map<String, Value> = root_obj;
            for raw_seg in path.split('/') {
                // JSON Pointer unescape (~1 => /, ~0 => ~)
                let seg = raw_seg.replace("~1", "/").replace("~0", "~");
                cur = cur.get(&seg)?.as_object()?;
            }
            Some(cur)
        }
        _ => Some(obj),
    }
}

fn kind_from_name(s: &str) -> Option<FieldKind> {
    match s {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "number" => Some(FieldKind::Number),
        "boolean" => Some(FieldKind::Boolean),
        _ => None,
    }
}

fn detect_field_kind(ty: Option<&Value>) -> Option<FieldKind> {
    match ty {
        Some(Value::String(s)) => kind_from_name(s),
        // unions like ["null","integer"] for Option<T>
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str()).find_map(kind_from_name),
        _ => None,
    }
}
