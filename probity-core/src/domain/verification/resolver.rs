// probity-core/src/domain/verification/resolver.rs
//
// Finds the value an attribute name refers to. Sources are probed in a fixed
// order and the first one that knows the name wins:
//   1. the response (status_code, text, headers, ...)
//   2. the check itself (http_code, endpoint, ...)
//   3. top-level keys of a JSON body
// `regex` never goes through this chain, it always reads the raw text body.
// When the fetch failed every name resolves: check fields keep their values,
// anything else is null.

use serde_json::{Map, Value, json};

use crate::domain::error::DomainError;
use crate::domain::payload::HttpResponse;

pub const REGEX_ATTRIBUTE: &str = "regex";

type Resolver = fn(&ResolutionContext<'_>, &str) -> Option<Value>;

const RESOLVERS: [(&str, Resolver); 3] = [
    ("response", from_response),
    ("check", from_check),
    ("json_body", from_json_body),
];

/// Everything an attribute may be resolved against.
pub struct ResolutionContext<'a> {
    check_fields: &'a Map<String, Value>,
    response: Option<&'a HttpResponse>,
    json: Option<Value>,
}

impl<'a> ResolutionContext<'a> {
    /// `response` is `None` when the fetch failed.
    pub fn new(check_fields: &'a Map<String, Value>, response: Option<&'a HttpResponse>) -> Self {
        Self {
            check_fields,
            response,
            json: response.and_then(HttpResponse::json),
        }
    }

    /// Source text for pattern rules: empty when the fetch failed or was not OK.
    pub fn regex_source(&self) -> &str {
        self.response.map(HttpResponse::text_if_ok).unwrap_or_default()
    }

    /// Resolves `attribute`, or fails with a configuration error when no
    /// source knows the name.
    pub fn resolve(&self, attribute: &str) -> Result<Value, DomainError> {
        RESOLVERS
            .iter()
            .find_map(|(source, resolver)| {
                resolver(self, attribute).inspect(|_| {
                    tracing::trace!(attribute, source, "Attribute resolved");
                })
            })
            .ok_or_else(|| DomainError::UnrecognizedAttribute(attribute.to_string()))
    }
}

const RESPONSE_ATTRIBUTES: [&str; 6] = ["status_code", "text", "headers", "ok", "url", "reason"];

/// Response attributes are always known names. Without a response they are
/// null: the fetch error already explains the failure.
fn from_response(ctx: &ResolutionContext<'_>, attribute: &str) -> Option<Value> {
    if !RESPONSE_ATTRIBUTES.contains(&attribute) {
        return None;
    }
    let Some(response) = ctx.response else {
        return Some(Value::Null);
    };
    let value = match attribute {
        "status_code" => json!(response.status_code),
        "text" => json!(response.text),
        "headers" => json!(response.headers),
        "ok" => json!(response.ok()),
        "url" => json!(response.url),
        _ => json!(response.reason),
    };
    Some(value)
}

fn from_check(ctx: &ResolutionContext<'_>, attribute: &str) -> Option<Value> {
    ctx.check_fields.get(attribute).cloned()
}

/// A non-empty JSON object answers for every key: missing keys are null.
/// Without a response every key is null.
fn from_json_body(ctx: &ResolutionContext<'_>, attribute: &str) -> Option<Value> {
    if ctx.response.is_none() {
        return Some(Value::Null);
    }
    match ctx.json.as_ref()? {
        Value::Object(body) if !body.is_empty() => {
            Some(body.get(attribute).cloned().unwrap_or(Value::Null))
        }
        _ => None,
    }
}
