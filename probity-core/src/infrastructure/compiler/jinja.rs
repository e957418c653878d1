// probity-core/src/infrastructure/compiler/jinja.rs

// Turns a parameterised query ("... WHERE id = {{ user_id }}") into the SQL sent to
// the database, for checks whose params are substituted before the query runs.

use crate::infrastructure::error::InfrastructureError;
use minijinja::{Environment, UndefinedBehavior};

pub struct JinjaRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> JinjaRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();

        // A parameter missing from the check is an error, not an empty string
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        // 'it''s' -> SQL string literal
        env.add_filter("quote", |value: &str| -> String {
            format!("'{}'", value.replace('\'', "''"))
        });
        // "col" -> quoted identifier
        env.add_filter("ident", |value: &str| -> String {
            format!("\"{}\"", value.replace('"', "\"\""))
        });

        Self { env }
    }
}

impl<'a> Default for JinjaRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

use crate::application::ports::TemplateEngine;
use crate::error::ProbityError;

impl<'a> TemplateEngine for JinjaRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, ProbityError> {
        self.env
            .render_str(template, context)
            .map_err(|e| ProbityError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn test_render_params() -> Result<()> {
        let renderer = JinjaRenderer::new();
        let sql = renderer.render(
            "SELECT * FROM users WHERE age >= {{ min_age }}",
            &json!({"min_age": 18}),
        )?;
        assert_eq!(sql, "SELECT * FROM users WHERE age >= 18");
        Ok(())
    }

    #[test]
    fn test_quote_filters() -> Result<()> {
        let renderer = JinjaRenderer::new();
        let sql = renderer.render(
            "SELECT {{ col | ident }} FROM t WHERE name = {{ name | quote }}",
            &json!({"col": "full name", "name": "O'Brien"}),
        )?;
        assert_eq!(sql, "SELECT \"full name\" FROM t WHERE name = 'O''Brien'");
        Ok(())
    }

    #[test]
    fn test_missing_param_is_an_error() {
        let renderer = JinjaRenderer::new();
        let res = renderer.render("SELECT {{ missing }}", &json!({}));
        assert!(res.is_err());
    }
}
