//! Strict placeholder substitution over merged documents.
//!
//! Rather than serialising the whole document to text, running a template
//! engine over it and re-parsing (with its attendant escaping hazards), the
//! substitutor walks only the string leaves of the document value and
//! substitutes placeholders in place. The document shape is preserved by
//! construction, rendering is pure and deterministic, and no partially
//! substituted document is ever returned: the first failure aborts the
//! render.
//!
//! Placeholder grammar inside string values:
//!
//! - `{{ .dotted.path }}` — strict lookup into the context document;
//!   scalars stringify, anything else is an error.
//! - `{{ childName .dotted.path "-suffix" }}` — deterministic child-name
//!   derivation applied to the resolved path value.
//!
//! Single braces pass through untouched, so shell fragments such as
//! `${VAR:-default}` survive rendering; doubled braces must form a valid
//! placeholder.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

use crate::ResolveResult;
use crate::config::ResolverConfig;
use crate::error::TemplateError;
use crate::names::child_name;
use crate::result_ext::{MalformedExt, ResolveResultExt};
use crate::spec::{InferenceService, ServiceSpec};

#[expect(
    clippy::expect_used,
    reason = "the placeholder pattern is a compile-time constant"
)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("placeholder pattern compiles"));

/// Context document placeholders resolve against.
///
/// Exposes the primary resource (`metadata`, `spec`, `status`) and the
/// resolver configuration (`global`), all in wire form.
#[derive(Clone, Debug)]
pub struct TemplateContext {
    root: Value,
}

impl TemplateContext {
    /// Build the context for one resolution.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResolveError::Malformed`] when the resource or the
    /// configuration fail to serialise.
    pub fn new(svc: &InferenceService, config: &ResolverConfig) -> ResolveResult<Self> {
        let stage = "serialise template context";
        let root = json!({
            "metadata": serde_json::to_value(&svc.metadata).at_stage(stage)?,
            "spec": serde_json::to_value(&svc.spec).at_stage(stage)?,
            "status": serde_json::to_value(&svc.status).at_stage(stage)?,
            "global": serde_json::to_value(config).at_stage(stage)?,
        });
        Ok(Self { root })
    }

    pub(crate) fn root(&self) -> &Value {
        &self.root
    }
}

/// Render every placeholder in `spec` against `ctx`.
///
/// # Errors
///
/// Returns [`crate::ResolveError::Malformed`] on (de)serialisation failure
/// and [`crate::ResolveError::Template`] on any placeholder defect.
pub fn substitute_spec(spec: &ServiceSpec, ctx: &TemplateContext) -> ResolveResult<ServiceSpec> {
    let mut doc = serde_json::to_value(spec).at_stage("serialise spec for rendering")?;
    substitute_value(&mut doc, ctx.root()).into_resolve()?;
    serde_json::from_value(doc).at_stage("parse rendered spec")
}

/// Substitute placeholders in every string leaf of `doc`, in place.
///
/// # Errors
///
/// Returns the first [`TemplateError`] encountered; `doc` must then be
/// discarded by the caller.
pub fn substitute_value(doc: &mut Value, ctx: &Value) -> Result<(), TemplateError> {
    match doc {
        Value::String(s) => {
            *s = render(s, ctx)?;
        }
        Value::Array(items) => {
            for item in items {
                substitute_value(item, ctx)?;
            }
        }
        Value::Object(entries) => {
            for value in entries.values_mut() {
                substitute_value(value, ctx)?;
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
    Ok(())
}

fn render(value: &str, ctx: &Value) -> Result<String, TemplateError> {
    if !value.contains("{{") && !value.contains("}}") {
        return Ok(value.to_owned());
    }
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for captures in PLACEHOLDER.captures_iter(value) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let expr = captures.get(1).map_or("", |m| m.as_str());
        push_literal(&mut out, &value[last..whole.start()], value)?;
        out.push_str(&eval_expr(expr, ctx, value)?);
        last = whole.end();
    }
    push_literal(&mut out, &value[last..], value)?;
    Ok(out)
}

/// Append a non-placeholder segment, rejecting stray doubled braces.
fn push_literal(out: &mut String, segment: &str, original: &str) -> Result<(), TemplateError> {
    if segment.contains("{{") || segment.contains("}}") {
        return Err(TemplateError::Syntax {
            value: original.to_owned(),
            message: "unbalanced placeholder braces".to_owned(),
        });
    }
    out.push_str(segment);
    Ok(())
}

fn eval_expr(expr: &str, ctx: &Value, original: &str) -> Result<String, TemplateError> {
    let expr = expr.trim();
    if let Some(rest) = expr.strip_prefix("childName") {
        if rest.starts_with(char::is_whitespace) {
            return eval_child_name(rest, ctx, original);
        }
    }
    if expr.starts_with('.') {
        return lookup_scalar(ctx, expr);
    }
    Err(TemplateError::Syntax {
        value: original.to_owned(),
        message: format!("unrecognised placeholder expression {expr:?}"),
    })
}

fn eval_child_name(rest: &str, ctx: &Value, original: &str) -> Result<String, TemplateError> {
    let syntax = |message: &str| TemplateError::Syntax {
        value: original.to_owned(),
        message: message.to_owned(),
    };
    let mut parts = rest.trim_start().splitn(2, char::is_whitespace);
    let path = parts
        .next()
        .filter(|p| p.starts_with('.'))
        .ok_or_else(|| syntax("childName expects a dotted path argument"))?;
    let literal = parts
        .next()
        .map(str::trim)
        .ok_or_else(|| syntax("childName expects a quoted suffix argument"))?;
    let suffix = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| syntax("childName suffix must be a double-quoted string"))?;
    let parent = lookup_scalar(ctx, path)?;
    Ok(child_name(&parent, suffix))
}

/// Resolve a dotted path to a scalar, strictly.
fn lookup_scalar(ctx: &Value, path: &str) -> Result<String, TemplateError> {
    let undefined = || TemplateError::UndefinedReference {
        path: path.to_owned(),
    };
    let dotted = path.strip_prefix('.').ok_or_else(undefined)?;
    let mut current = ctx;
    for segment in dotted.split('.') {
        if segment.is_empty() {
            return Err(undefined());
        }
        current = current.get(segment).ok_or_else(undefined)?;
    }
    match current {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(undefined()),
        Value::Array(_) | Value::Object(_) => Err(TemplateError::NotScalar {
            path: path.to_owned(),
        }),
    }
}
