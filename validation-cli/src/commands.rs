use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::borrow::Cow;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};
use validation_engine::{schemas, LeafRule, Rule, Schema, SchemaError, ValidationResult, Validator};

use crate::cli::{CheckArgs, Command, DescribeArgs};
use crate::config::CliConfig;

/// Exit status for operational failures (unreadable input, bad descriptor)
pub const FAILURE_EXIT: u8 = 2;

/// What a successfully executed command concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Rejected,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Valid => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::from(1),
        }
    }
}

/// Execute a command, writing its report to `out`.
///
/// # Errors
///
/// Returns an error for operational failures only; a rejected payload is
/// [`Outcome::Rejected`].
pub fn run(command: &Command, config: &CliConfig, out: &mut dyn Write) -> Result<Outcome> {
    match command {
        Command::Check(args) => check(args, config, out),
        Command::Endpoints => endpoints(out),
        Command::Describe(args) => describe(args, out),
    }
}

/// Validate a payload and print the `{ isError, error }` result.
///
/// # Errors
///
/// Fails when the payload or schema cannot be read, or the descriptor is malformed.
pub fn check(args: &CheckArgs, config: &CliConfig, out: &mut dyn Write) -> Result<Outcome> {
    let schema = resolve_schema(args)?;
    let payload = read_payload(&args.payload)?;

    let result = Validator::new(config.validator.clone()).validate(&payload, &schema);
    write_result(out, &result, args.compact)?;

    if result.is_error {
        info!(
            payload = %args.payload,
            violations = result.violations().len(),
            "Payload rejected"
        );
        Ok(Outcome::Rejected)
    } else {
        debug!(payload = %args.payload, "Payload accepted");
        Ok(Outcome::Valid)
    }
}

/// List every built-in endpoint schema with its top-level field count.
///
/// # Errors
///
/// Fails only when `out` cannot be written.
pub fn endpoints(out: &mut dyn Write) -> Result<Outcome> {
    for name in schemas::ENDPOINTS {
        if let Some(schema) = schemas::lookup(name) {
            writeln!(out, "{name:<14} {} fields", schema.len())?;
        }
    }
    Ok(Outcome::Valid)
}

/// Strictly classify a descriptor and print its outline, or its defects.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or its root is not a mapping.
pub fn describe(args: &DescribeArgs, out: &mut dyn Write) -> Result<Outcome> {
    let descriptor = read_document(&args.schema)?;

    match Schema::try_from_descriptor(&descriptor) {
        Ok(schema) => {
            for line in outline(&schema) {
                writeln!(out, "{line}")?;
            }
            Ok(Outcome::Valid)
        }
        Err(SchemaError::Defects(defects)) => {
            for defect in &defects {
                writeln!(out, "defect: {defect}")?;
            }
            info!(
                schema = %args.schema.display(),
                defects = defects.len(),
                "Schema descriptor is malformed"
            );
            Ok(Outcome::Rejected)
        }
        Err(err) => Err(err).with_context(|| format!("Cannot describe {}", args.schema.display())),
    }
}

fn resolve_schema(args: &CheckArgs) -> Result<Cow<'static, Schema>> {
    match (&args.schema, &args.endpoint) {
        (Some(path), None) => load_schema(path).map(Cow::Owned),
        (None, Some(name)) => schemas::lookup(name)
            .map(Cow::Borrowed)
            .with_context(|| format!("Unknown endpoint '{name}'; run `rustcare-validate endpoints`")),
        _ => bail!("Exactly one of --schema or --endpoint is required"),
    }
}

/// Read a descriptor file and classify it, rejecting any malformed rule.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or the descriptor has defects.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let descriptor = read_document(path)?;
    let schema = Schema::try_from_descriptor(&descriptor)
        .with_context(|| format!("Invalid schema descriptor {}", path.display()))?;
    debug!(
        schema = %path.display(),
        fields = schema.len(),
        depth = schema.depth(),
        "Schema descriptor loaded"
    );
    Ok(schema)
}

fn read_payload(source: &str) -> Result<Value> {
    if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read payload from standard input")?;
        return serde_json::from_str(&text).context("Payload on standard input is not valid JSON");
    }
    read_document(Path::new(source))
}

/// Parse a JSON or YAML document, picking the format from the extension.
///
/// # Errors
///
/// Fails when the file cannot be read or does not parse.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_document(&text, path)
}

fn parse_document(text: &str, path: &Path) -> Result<Value> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(text)
            .with_context(|| format!("{} is not valid YAML", path.display())),
        _ => serde_json::from_str(text)
            .with_context(|| format!("{} is not valid JSON", path.display())),
    }
}

fn write_result(out: &mut dyn Write, result: &ValidationResult, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, result)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, result)?;
    }
    writeln!(out)?;
    Ok(())
}

/// One line per rule, nested rules indented under their parent.
pub fn outline(schema: &Schema) -> Vec<String> {
    let mut lines = Vec::new();
    push_outline(schema, 0, &mut lines);
    lines
}

fn push_outline(schema: &Schema, indent: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(indent);
    for (name, rule) in schema.iter() {
        let kind = rule.kind_name();
        match rule {
            Rule::Leaf(leaf) => lines.push(format!("{pad}{name}: {kind}{}", leaf_summary(leaf))),
            Rule::Object(object) => {
                lines.push(format!(
                    "{pad}{name}: {kind}{}",
                    presence(object.demands_presence())
                ));
                push_outline(&object.fields, indent.saturating_add(1), lines);
            }
            Rule::ArrayOfObjects(array) => {
                lines.push(format!("{pad}{name}[]: {kind}{}", presence(array.required)));
                push_outline(&array.items, indent.saturating_add(1), lines);
            }
            Rule::Defect(reason) => lines.push(format!("{pad}{name}: {kind} ({reason})")),
        }
    }
}

fn presence(required: bool) -> &'static str {
    if required {
        " (required)"
    } else {
        ""
    }
}

fn leaf_summary(leaf: &LeafRule) -> String {
    let mut parts = Vec::new();
    if leaf.required {
        parts.push("required".to_string());
    }
    if let Some(kind) = leaf.kind {
        parts.push(kind.as_str().to_string());
    }
    if let Some(min) = leaf.min {
        parts.push(format!("min {min}"));
    }
    if let Some(max) = leaf.max {
        parts.push(format!("max {max}"));
    }
    if let Some(pattern) = &leaf.pattern {
        parts.push(format!("pattern {}", pattern.as_str()));
    }
    if let Some(values) = &leaf.one_of {
        parts.push(format!("one of {}", values.join("|")));
    }
    if leaf.email {
        parts.push("email".to_string());
    }
    parts.extend(leaf.hints.keys().map(|key| format!("hint {key}")));

    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_supplier_outline() {
        let lines = outline(schemas::supplier());
        assert_eq!(
            lines,
            vec![
                "clinic: leaf (required)",
                "name: leaf (required)",
                r"phone: leaf (required, pattern ^[6-9]\d{9}$)",
                "email: leaf (email)",
                "address: object (required)",
                "  city: leaf (required)",
                "  state: leaf (required)",
            ]
        );
    }

    #[test]
    fn test_prescription_outline_marks_array_items() {
        let lines = outline(schemas::prescription());
        assert!(lines.contains(&"medicines[]: array (required)".to_string()));
        assert!(lines.contains(&"  qty: leaf (required, number, min 1)".to_string()));
    }

    #[test]
    fn test_hints_are_listed() {
        let lines = outline(schemas::user());
        assert!(lines.contains(&"acceptTerms: leaf (required, boolean, hint checkbox)".to_string()));
    }

    #[test]
    fn test_parse_document_by_extension() {
        let yaml = parse_document("name:\n  required: true\n", Path::new("s.yaml")).unwrap();
        assert_eq!(yaml, json!({ "name": { "required": true } }));

        let json = parse_document(r#"{"name": {"required": true}}"#, Path::new("s.json")).unwrap();
        assert_eq!(json, yaml);

        assert!(parse_document("name: [", Path::new("s.yml")).is_err());
        assert!(parse_document("{", Path::new("s")).is_err());
    }

    #[test]
    fn test_unknown_endpoint_is_operational_failure() {
        let args = CheckArgs {
            payload: "-".to_string(),
            schema: None,
            endpoint: Some("pharmacy".to_string()),
            compact: true,
        };
        let err = resolve_schema(&args).unwrap_err();
        assert!(err.to_string().contains("pharmacy"));
    }

    #[test]
    fn test_endpoint_schema_is_borrowed() {
        let args = CheckArgs {
            payload: "-".to_string(),
            schema: None,
            endpoint: Some("supplier".to_string()),
            compact: false,
        };
        assert!(matches!(resolve_schema(&args).unwrap(), Cow::Borrowed(_)));

        let both = CheckArgs {
            schema: Some(PathBuf::from("supplier.yaml")),
            ..args
        };
        assert!(resolve_schema(&both).is_err());
    }

    #[test]
    fn test_endpoints_listing() {
        let mut out = Vec::new();
        assert_eq!(endpoints(&mut out).unwrap(), Outcome::Valid);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), schemas::ENDPOINTS.len());
        assert!(text.lines().any(|line| line.starts_with("supplier") && line.ends_with("5 fields")));
    }
}
