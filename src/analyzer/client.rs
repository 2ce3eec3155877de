//! Remote analysis service client
//!
//! The pipeline depends only on the [`AnalysisClient`] trait; [`OpenAiClient`]
//! is the stock implementation, posting a chat-completion request per file.
//! The client is blocking on purpose: the batch loop is sequential with a
//! fixed pacing delay (the service enforces a shared rate limit), so there
//! is nothing to overlap.

use crate::config::AnalysisSettings;
use crate::model::FileRecord;
use std::time::Duration;
use thiserror::Error;

/// Errors from the remote analysis call
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No API key in config or environment
    #[error("no API key configured (set analysis.api-key or OPENAI_API_KEY)")]
    MissingApiKey,

    /// Transport-level failure (connection, timeout, TLS)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service returned a non-success status
    #[error("analysis service error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Response was 2xx but carried no usable message content
    #[error("analysis service returned an empty reply")]
    EmptyReply,
}

/// Per-file analysis collaborator contract.
///
/// Returns the raw reply text; structure extraction is the parser's job
/// (see [`crate::analyzer::parser`]).
pub trait AnalysisClient {
    /// Analyze one file, returning the raw service reply
    fn analyze(&self, file: &FileRecord) -> Result<String, AnalysisError>;
}

/// Chat-completions client for OpenAI-compatible endpoints
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Build a client from analysis settings.
    ///
    /// The API key comes from the config, falling back to the
    /// `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingApiKey`] when neither source has a
    /// key, or a transport error if the HTTP client cannot be constructed.
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self, AnalysisError> {
        let api_key = settings
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or(AnalysisError::MissingApiKey)?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            api_key,
            model: settings.model.clone(),
        })
    }

    /// Build the analysis prompt for one file.
    ///
    /// Asks for a JSON reply with a suggestion list and complete optimized
    /// code, focused on the ten memory-optimization areas the service is
    /// primed for.
    fn build_prompt(file: &FileRecord) -> String {
        format!(
            r#"Please analyze the following {language} code for memory optimization opportunities and provide a JSON response with the following structure:

{{
  "suggestions": [
    {{
      "type": "Memory Optimization Type",
      "description": "Detailed description of the optimization",
      "lineNumber": "Line number or range",
      "severity": "High/Medium/Low",
      "before": "Original code snippet",
      "after": "Optimized code snippet"
    }}
  ],
  "optimizedCode": "Complete optimized version of the code",
  "optimizationSummary": "Summary of all optimizations made"
}}

Focus on these memory optimization areas:
1. String concatenation optimization
2. Collection initialization and capacity management
3. Unnecessary object allocations
4. Proper disposal of resources
5. Boxing/unboxing elimination
6. Lazy initialization where appropriate
7. Value types vs reference types optimization
8. Memory-efficient enumeration/LINQ operations
9. Async memory patterns
10. Cache-friendly data structures

Code to analyze:
```{language}
{code}
```

Provide practical, implementable suggestions with clear before/after examples.
"#,
            language = file.language,
            code = file.content,
        )
    }
}

impl AnalysisClient for OpenAiClient {
    fn analyze(&self, file: &FileRecord) -> Result<String, AnalysisError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an expert code optimizer specializing in memory optimization. Analyze the provided code and suggest memory optimizations.",
                },
                {
                    "role": "user",
                    "content": Self::build_prompt(file),
                },
            ],
            "max_tokens": 2000,
            "temperature": 0.3,
        });

        log::debug!("analyzing {} via {}", file.path.display(), self.api_url);

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let json: serde_json::Value = response.json()?;
        let content = json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .unwrap_or("")
            .to_string();

        if content.trim().is_empty() {
            return Err(AnalysisError::EmptyReply);
        }

        Ok(content)
    }
}
