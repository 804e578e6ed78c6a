use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{AdapterError, Capability, CompletionRequest, TextCompletion};

/// Token budgets applied to completions
pub struct TokenBudget;

impl TokenBudget {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 2048;
    /// Used for articles without a usable `length` and for blog titles
    pub const DEFAULT: u32 = 1000;
    pub const RESUME_REVIEW: u32 = 2000;

    /// Budget for an article from the client supplied `length`.
    ///
    /// Integers (or strings starting with one) inside `[MIN, MAX]` are used
    /// as is; anything else falls back to `DEFAULT`.
    pub fn for_article(length: Option<&Value>) -> u32 {
        let requested = match length {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => parse_leading_int(s),
            _ => None,
        };

        match requested {
            Some(n) if n >= Self::MIN as i64 && n <= Self::MAX as i64 => n as u32,
            _ => Self::DEFAULT,
        }
    }
}

/// Leading integer of a string, skipping leading whitespace ("300 words" -> 300)
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Text completion capability used for articles and blog titles
pub struct TextGeneration {
    client: Arc<dyn TextCompletion>,
}

impl TextGeneration {
    pub fn new(client: Arc<dyn TextCompletion>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Capability for TextGeneration {
    type Input = CompletionRequest;
    type Output = String;

    async fn invoke(&self, input: CompletionRequest) -> Result<String, AdapterError> {
        if input.prompt.trim().is_empty() {
            return Err(AdapterError::validation("Prompt is required"));
        }
        Ok(self.client.complete(input).await?)
    }
}
