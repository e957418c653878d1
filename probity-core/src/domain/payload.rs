// probity-core/src/domain/payload.rs
//
// What a check fetched: an HTTP response or a SQL row set.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const HTTP_VERBS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl FromStr for HttpVerb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            other => Err(format!(
                "ERROR. {} not a recognized HTTP verb. allowed values [{}]",
                other,
                HTTP_VERBS.join(", ")
            )),
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Outgoing request. Empty maps and a null body are left out of the call.
#[derive(Debug, Clone, Serialize)]
pub struct HttpRequest {
    #[serde(skip)]
    pub verb: HttpVerb,
    #[serde(skip)]
    pub endpoint: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(rename = "params", skip_serializing_if = "BTreeMap::is_empty")]
    pub query_parameters: BTreeMap<String, String>,
    #[serde(rename = "json", skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(rename = "verify")]
    pub verify_ssl: bool,
}

impl HttpRequest {
    /// The request arguments as shown in fetch error messages.
    pub fn describe_arguments(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub reason: String,
    pub url: String,
    /// Header names are stored lowercase.
    pub headers: BTreeMap<String, String>,
    pub text: String,
}

impl HttpResponse {
    /// Same notion of OK as most HTTP clients: anything below 400.
    pub fn ok(&self) -> bool {
        self.status_code < 400
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Raw body if the response is OK, empty otherwise.
    pub fn text_if_ok(&self) -> &str {
        if self.ok() { &self.text } else { "" }
    }

    /// Parsed body, only for `application/json` responses that actually parse.
    pub fn json(&self) -> Option<Value> {
        let content_type = self.header("content-type").unwrap_or_default();
        if !content_type.contains("application/json") {
            return None;
        }
        serde_json::from_str(&self.text).ok()
    }
}

/// One result row: column name to scalar value, in select order.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn json_response(body: &str) -> HttpResponse {
        HttpResponse {
            status_code: 200,
            headers: BTreeMap::from([(
                "content-type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )]),
            text: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_verb_message() {
        let err = "fetch".parse::<HttpVerb>().unwrap_err();
        assert_eq!(
            err,
            "ERROR. fetch not a recognized HTTP verb. allowed values [get, post, put, patch, delete]"
        );
    }

    #[test]
    fn test_json_requires_content_type() {
        let mut response = json_response(r#"{"a": 1}"#);
        assert!(response.json().is_some());

        response.headers.clear();
        assert!(response.json().is_none());
    }

    #[test]
    fn test_text_if_ok_hides_error_bodies() {
        let mut response = json_response("boom");
        response.status_code = 503;
        assert_eq!(response.text_if_ok(), "");
    }

    #[test]
    fn test_request_arguments_skip_empty_parts() {
        let request = HttpRequest {
            verb: HttpVerb::Get,
            endpoint: "http://localhost".into(),
            headers: BTreeMap::new(),
            query_parameters: BTreeMap::from([("q".to_string(), "1".to_string())]),
            body: None,
            verify_ssl: false,
        };
        assert_eq!(
            request.describe_arguments(),
            r#"{"params":{"q":"1"},"verify":false}"#
        );
    }
}
