// probity-core/src/application/http_check.rs

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::application::check::{Check, Verdicts, conclude};
use crate::domain::check::{CheckIdentity, CheckOutcome, OutputOptions};
use crate::domain::payload::{HttpRequest, HttpResponse, HttpVerb};
use crate::domain::suite::HttpCheckConfig;
use crate::domain::verification::{EvaluationMode, ResolutionContext, verify_response};
use crate::error::ProbityError;
use crate::ports::http::HttpClient;

/// Echoed as `http_code` until a response arrives.
pub const DEFAULT_HTTP_CODE: u16 = 500;

pub struct HttpCheck {
    identity: CheckIdentity,
    output: OutputOptions,
    mode: EvaluationMode,
    config: HttpCheckConfig,
    client: Arc<dyn HttpClient>,
}

impl HttpCheck {
    pub fn new(tag: &str, config: HttpCheckConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            identity: CheckIdentity::new(tag, config.id.clone()),
            output: OutputOptions::default(),
            mode: EvaluationMode::default(),
            config,
            client,
        }
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Any failure here is data: it becomes the check's error message.
    async fn fetch(&self) -> Result<HttpResponse, String> {
        let verb: HttpVerb = self.config.verb.parse()?;
        let request = HttpRequest {
            verb,
            endpoint: self.config.endpoint.clone(),
            headers: self.config.headers.clone(),
            query_parameters: self.config.query_parameters.clone(),
            body: self.config.body.clone().filter(|b| !is_blank(b)),
            verify_ssl: self.config.verify_ssl,
        };

        self.client.send(&request).await.map_err(|e| {
            format!(
                "ERROR. Failed to fetch {} response from endpoint {} with request arguments {}. {}",
                verb,
                request.endpoint,
                request.describe_arguments(),
                e
            )
        })
    }

    /// Attributes the check exposes about itself to the rules. `errors` holds
    /// what went wrong before evaluation, null when the fetch succeeded.
    fn check_fields(&self, response: Option<&HttpResponse>, errors: &[String]) -> Map<String, Value> {
        let http_code = response.map_or(DEFAULT_HTTP_CODE, |r| r.status_code);
        let mut fields = Map::new();
        fields.insert("http_code".into(), json!(http_code));
        fields.insert("endpoint".into(), json!(self.config.endpoint));
        fields.insert("http_verb".into(), json!(self.config.verb));
        fields.insert("verify_ssl".into(), json!(self.config.verify_ssl));
        fields.insert(
            "query_parameters".into(),
            json!(self.config.query_parameters),
        );
        fields.insert("body".into(), json!(self.config.body));
        let errors = (!errors.is_empty()).then(|| errors.join("\n"));
        fields.insert("errors".into(), json!(errors));
        fields.insert("test_id".into(), json!(self.identity.test_id));
        fields.insert("tag".into(), json!(self.identity.tag));
        fields
    }
}

fn is_blank(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[async_trait]
impl Check for HttpCheck {
    fn identity(&self) -> &CheckIdentity {
        &self.identity
    }

    fn output(&self) -> &OutputOptions {
        &self.output
    }

    #[instrument(skip(self), fields(test_id = %self.identity.test_id, endpoint = %self.config.endpoint))]
    async fn run(&self) -> Result<CheckOutcome, ProbityError> {
        let mut verdicts = Verdicts::default();

        let response = match self.fetch().await {
            Ok(response) => {
                debug!(status = response.status_code, "Response received");
                Some(response)
            }
            Err(message) => {
                debug!(error = %message, "Fetch failed");
                verdicts.push(message);
                None
            }
        };

        let fields = self.check_fields(response.as_ref(), &verdicts.errors);
        let ctx = ResolutionContext::new(&fields, response.as_ref());
        match verify_response(&self.config.evaluate, &ctx, self.mode) {
            Ok(failures) => verdicts.errors.extend(failures),
            Err(e) => verdicts.abort(e.into()),
        }

        if let Some(code) = fields.get("http_code") {
            verdicts.extra.insert("http_code".into(), code.clone());
        }
        conclude(&self.identity, &self.output, verdicts)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::verification::HttpExpectation;
    use crate::infrastructure::error::InfrastructureError;
    use crate::infrastructure::store::ResultStore;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // --- MOCK HTTP CLIENT ---
    struct MockHttpClient {
        response: Option<HttpResponse>,
        sent: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        fn replying(status: u16, content_type: &str, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Some(HttpResponse {
                    status_code: status,
                    reason: "OK".into(),
                    url: "http://service.test/health".into(),
                    headers: BTreeMap::from([("content-type".into(), content_type.into())]),
                    text: body.into(),
                }),
                sent: Mutex::new(vec![]),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                response: None,
                sent: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ProbityError> {
            self.sent
                .lock()
                .unwrap()
                .push(format!("{} {}", request.verb, request.endpoint));
            self.response.clone().ok_or_else(|| {
                ProbityError::Infrastructure(InfrastructureError::ConfigError(
                    "connection refused".into(),
                ))
            })
        }
    }

    fn config(id: &str, evaluate: Value) -> HttpCheckConfig {
        HttpCheckConfig {
            id: id.into(),
            endpoint: "http://service.test/health".into(),
            verb: "get".into(),
            headers: BTreeMap::new(),
            query_parameters: BTreeMap::new(),
            body: None,
            verify_ssl: false,
            evaluate: serde_json::from_value::<HttpExpectation>(evaluate).unwrap(),
        }
    }

    fn output_in(dir: &Path) -> OutputOptions {
        OutputOptions {
            file_prefix: format!("{}/", dir.display()),
            ..Default::default()
        }
    }

    fn saved(check: &HttpCheck) -> Value {
        let result = ResultStore::new(check.output())
            .load(&check.result_path())
            .unwrap();
        serde_json::to_value(result).unwrap()
    }

    #[tokio::test]
    async fn test_status_200_passes_without_errors_key() -> Result<()> {
        let dir = tempdir()?;
        let check = HttpCheck::new(
            "",
            config("health", json!({"include": {"status_code": [200]}})),
            MockHttpClient::replying(200, "text/plain", "up"),
        )
        .with_output(output_in(dir.path()));

        assert_eq!(check.run().await?, CheckOutcome::Passed);
        assert_eq!(saved(&check), json!({"success": true, "http_code": 200}));
        Ok(())
    }

    #[tokio::test]
    async fn test_wildcard_on_missing_json_key_fails() -> Result<()> {
        let dir = tempdir()?;
        let check = HttpCheck::new(
            "nightly",
            config("body", json!({"include": {"version": "*"}})),
            MockHttpClient::replying(200, "application/json", r#"{"status": "up"}"#),
        )
        .with_output(output_in(dir.path()));

        let outcome = check.run().await?;
        assert!(matches!(outcome, CheckOutcome::Failed(ref m) if m.starts_with("version: ")));
        assert!(dir.path().join("nightly_body_result.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_exclude_match_fails() -> Result<()> {
        let dir = tempdir()?;
        let check = HttpCheck::new(
            "",
            config("not_down", json!({"exclude": {"status": "down"}})),
            MockHttpClient::replying(200, "application/json", r#"{"status": "down"}"#),
        )
        .with_output(output_in(dir.path()));

        assert!(!check.run().await?.is_success());
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded_not_raised() -> Result<()> {
        let dir = tempdir()?;
        let client = MockHttpClient::unreachable();
        let check = HttpCheck::new(
            "",
            config("down", json!({"include": {"http_code": [200]}})),
            client.clone(),
        )
        .with_output(output_in(dir.path()));

        let outcome = check.run().await?;
        let CheckOutcome::Failed(message) = outcome else {
            panic!("expected a failure");
        };
        assert!(message.starts_with(
            "ERROR. Failed to fetch get response from endpoint http://service.test/health"
        ));
        assert!(message.contains("connection refused"));
        assert!(message.ends_with("http_code: 500 not found in [200]"));
        assert_eq!(saved(&check)["http_code"], json!(500));
        assert_eq!(client.sent.lock().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_body_rules_after_fetch_failure_fail_as_data() -> Result<()> {
        let dir = tempdir()?;
        let check = HttpCheck::new(
            "",
            config(
                "outage",
                json!({"include": {"status_code": [200], "status": "up"}}),
            ),
            MockHttpClient::unreachable(),
        )
        .with_output(output_in(dir.path()));

        let CheckOutcome::Failed(message) = check.run().await? else {
            panic!("expected a failure");
        };
        assert!(message.contains("status_code: null not found in [200]"));
        assert!(message.ends_with("status: null != up"));
        assert_eq!(saved(&check)["success"], json!(false));
        Ok(())
    }

    #[tokio::test]
    async fn test_errors_attribute_reflects_the_fetch() -> Result<()> {
        let dir = tempdir()?;
        let rules = json!({"include": {"errors": ""}});

        let healthy = HttpCheck::new(
            "",
            config("healthy", rules.clone()),
            MockHttpClient::replying(200, "text/plain", "up"),
        )
        .with_output(output_in(dir.path()));
        assert_eq!(healthy.run().await?, CheckOutcome::Passed);

        let down = HttpCheck::new("", config("down", rules), MockHttpClient::unreachable())
            .with_output(output_in(dir.path()));
        assert!(!down.run().await?.is_success());
        Ok(())
    }

    #[tokio::test]
    async fn test_request_settings_are_resolvable() -> Result<()> {
        let dir = tempdir()?;
        let mut cfg = config(
            "paged",
            json!({"include": {"query_parameters": {"page": "2"}, "body": null}}),
        );
        cfg.query_parameters = BTreeMap::from([("page".to_string(), "2".to_string())]);
        let check = HttpCheck::new(
            "",
            cfg,
            MockHttpClient::replying(200, "text/plain", "up"),
        )
        .with_output(output_in(dir.path()));

        assert_eq!(check.run().await?, CheckOutcome::Passed);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_verb_never_reaches_the_client() -> Result<()> {
        let dir = tempdir()?;
        let client = MockHttpClient::replying(200, "text/plain", "");
        let mut cfg = config("verb", json!({"include": {"http_code": [500]}}));
        cfg.verb = "fetch".into();
        let check = HttpCheck::new("", cfg, client.clone()).with_output(output_in(dir.path()));

        let CheckOutcome::Failed(message) = check.run().await? else {
            panic!("expected a failure");
        };
        assert_eq!(
            message,
            "ERROR. fetch not a recognized HTTP verb. allowed values [get, post, put, patch, delete]"
        );
        assert!(client.sent.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_unrecognized_attribute_is_persisted_then_raised() -> Result<()> {
        let dir = tempdir()?;
        let check = HttpCheck::new(
            "",
            config("typo", json!({"include": {"colour": "blue"}})),
            MockHttpClient::replying(200, "text/plain", "plain body"),
        )
        .with_output(output_in(dir.path()));

        let err = check.run().await.unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(
            saved(&check)["errors"],
            json!("ERROR. unrecognized evaluate attribute: colour")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_collect_all_versus_first_failure() -> Result<()> {
        let dir = tempdir()?;
        let rules = json!({"include": {"status_code": [201], "ok": false}});
        let client = MockHttpClient::replying(200, "text/plain", "");

        let all = HttpCheck::new("", config("all", rules.clone()), client.clone())
            .with_output(output_in(dir.path()));
        let first = HttpCheck::new("", config("first", rules), client)
            .with_output(output_in(dir.path()))
            .with_mode(EvaluationMode::FirstFailure);

        let CheckOutcome::Failed(all_errors) = all.run().await? else {
            panic!("expected a failure");
        };
        let CheckOutcome::Failed(first_errors) = first.run().await? else {
            panic!("expected a failure");
        };
        assert_eq!(all_errors.lines().count(), 2);
        assert_eq!(first_errors.lines().count(), 1);
        Ok(())
    }

    #[test]
    fn test_blank_bodies_are_dropped() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!({"a": 1})));
        assert!(!is_blank(&json!([])));
    }
}
