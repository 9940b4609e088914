//! Test case generation against a generative text API.
//!
//! Up to three category batches are requested one after another. The first
//! batch is load-bearing: if it fails nothing is returned. A later batch that
//! fails ends generation early but keeps what earlier batches produced,
//! reported through [`Generation::advisory`].

pub mod client;
pub mod parse;
pub mod plan;
pub mod prompt;

use tracing::{info, warn, Instrument};

use crate::config::schema::GenerationConfig;
use crate::error::GenerateError;
use crate::model::{TestCase, TestCaseBatch};

pub use client::{ChatClient, ChatRequest, ChatResponse, OpenAiClient, TokenUsage};
pub use plan::{plan_batches, BatchPlan, BATCH_MODE_THRESHOLD};

/// Result of a generation run that produced at least one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Successful batches in generation order.
    pub batches: Vec<TestCaseBatch>,
    /// Set when a later batch failed and the result is partial.
    pub advisory: Option<String>,
}

impl Generation {
    pub fn len(&self) -> usize {
        self.batches.iter().map(TestCaseBatch::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_partial(&self) -> bool {
        self.advisory.is_some()
    }

    /// Concatenates every batch, Happy Path first.
    pub fn test_cases(&self) -> Vec<TestCase> {
        self.batches
            .iter()
            .flat_map(|b| b.test_cases.iter().cloned())
            .collect()
    }

    pub fn into_test_cases(self) -> Vec<TestCase> {
        self.batches
            .into_iter()
            .flat_map(|b| b.test_cases)
            .collect()
    }
}

pub struct TestCaseGenerator {
    client: Box<dyn ChatClient>,
    max_tokens: u32,
    temperature: f32,
}

impl TestCaseGenerator {
    pub fn new(client: Box<dyn ChatClient>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            client,
            max_tokens,
            temperature,
        }
    }

    pub fn from_config(client: Box<dyn ChatClient>, config: &GenerationConfig) -> Self {
        Self::new(client, config.max_tokens, config.temperature)
    }

    pub async fn generate(
        &self,
        text: &str,
        target_count: usize,
        batch_mode: bool,
    ) -> Result<Generation, GenerateError> {
        if target_count == 0 {
            return Err(GenerateError::InvalidTarget(target_count));
        }

        let plan = plan_batches(target_count, batch_mode);
        info!(
            target_count,
            batches = plan.len(),
            "Generating test cases ({})",
            plan.iter()
                .map(|b| format!("{} {}", b.count, b.category.label()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut batches: Vec<TestCaseBatch> = Vec::with_capacity(plan.len());

        for (index, batch) in plan.iter().enumerate() {
            let number = index + 1;
            let span = tracing::info_span!(
                "generator.batch",
                batch = number,
                category = batch.category.label(),
                count = batch.count
            );

            match self.run_batch(text, batch).instrument(span).await {
                Ok(result) => {
                    info!(
                        "Batch {} completed: {} test cases",
                        number,
                        result.test_cases.len()
                    );
                    batches.push(result);
                }
                Err(e) if batches.is_empty() => return Err(e),
                Err(e) => {
                    let advisory = partial_advisory(number, &e);
                    let kept: usize = batches.iter().map(TestCaseBatch::len).sum();
                    warn!("{}; returning {} test cases", advisory, kept);
                    return Ok(Generation {
                        batches,
                        advisory: Some(advisory),
                    });
                }
            }
        }

        let generation = Generation {
            batches,
            advisory: None,
        };
        info!("Total generated: {} test cases", generation.len());
        Ok(generation)
    }

    async fn run_batch(
        &self,
        text: &str,
        batch: &BatchPlan,
    ) -> Result<TestCaseBatch, GenerateError> {
        let request = ChatRequest {
            system: prompt::SYSTEM_INSTRUCTION.to_string(),
            user: prompt::build_prompt(batch.category, text, batch.count),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.client.complete(&request).await?;
        let test_cases = parse::parse_test_cases(&response.content)?;

        if test_cases.len() != batch.count {
            warn!(
                "Requested {} test cases, received {}",
                batch.count,
                test_cases.len()
            );
        }

        Ok(TestCaseBatch {
            category: batch.category,
            test_cases,
        })
    }
}

/// "Batch 2 failed but Batch 1 succeeded: ..." style message.
fn partial_advisory(failed_batch: usize, error: &GenerateError) -> String {
    let succeeded = (1..failed_batch)
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("+");
    let what = if error.is_parse_failure() {
        "parsing failed"
    } else {
        "failed"
    };
    format!(
        "Batch {} {} but Batch {} succeeded: {}",
        failed_batch, what, succeeded, error
    )
}
