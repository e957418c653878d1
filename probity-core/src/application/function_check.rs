// probity-core/src/application/function_check.rs

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::application::check::{Check, Verdicts, conclude};
use crate::domain::check::{CheckIdentity, CheckOutcome, OutputOptions};
use crate::domain::verification::comparator::{display_value, values_equal};
use crate::error::ProbityError;

/// A plain Rust function under test: named inputs in, one value out.
pub type CheckFn = Arc<dyn Fn(&Map<String, Value>) -> Value + Send + Sync>;

/// Calls `function` with `inputs` and expects `expected` back.
pub struct FunctionCheck {
    identity: CheckIdentity,
    output: OutputOptions,
    function: CheckFn,
    inputs: Map<String, Value>,
    expected: Value,
}

impl FunctionCheck {
    pub fn new(
        identity: CheckIdentity,
        function: CheckFn,
        inputs: Map<String, Value>,
        expected: Value,
    ) -> Self {
        Self {
            identity,
            output: OutputOptions::default(),
            function,
            inputs,
            expected,
        }
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }
}

#[async_trait]
impl Check for FunctionCheck {
    fn identity(&self) -> &CheckIdentity {
        &self.identity
    }

    fn output(&self) -> &OutputOptions {
        &self.output
    }

    async fn run(&self) -> Result<CheckOutcome, ProbityError> {
        let actual = (self.function)(&self.inputs);

        let mut verdicts = Verdicts::default();
        if !values_equal(&actual, &self.expected) {
            verdicts.push(format!(
                "{} != {}",
                display_value(&actual),
                display_value(&self.expected)
            ));
        }
        conclude(&self.identity, &self.output, verdicts)
    }
}
