//! [`CurrencyParser`] implementation backed by Gemini.

use async_trait::async_trait;
use tracing::{debug, info};

use fx_types::{CurrencyParser, ParsedCurrency, ParserError};

use crate::client::GeminiClient;
use crate::decode::decode_model_output;
use crate::prompt::build_prompt;
use crate::types::{Content, GenerateContentRequest, GenerationConfig};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Sends the extraction prompt to Gemini and decodes the reply.
pub struct GeminiCurrencyParser {
    client: GeminiClient,
    model: String,
    generation_config: GenerationConfig,
}

impl GeminiCurrencyParser {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_client(GeminiClient::new(api_key))
    }

    pub fn with_client(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            generation_config: GenerationConfig {
                temperature: Some(0.1),
                max_output_tokens: Some(256),
                response_mime_type: Some("application/json".to_string()),
            },
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_for(&self, text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(build_prompt(text))],
            generation_config: Some(self.generation_config.clone()),
        }
    }
}

#[async_trait]
impl CurrencyParser for GeminiCurrencyParser {
    #[tracing::instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn parse(&self, text: &str) -> Result<ParsedCurrency, ParserError> {
        let request = self.request_for(text);
        let output = self.client.generate_text(&self.model, &request).await?;
        debug!(output = %output, "Model replied");

        let parsed = decode_model_output(&output);
        match &parsed {
            ParsedCurrency::Success {
                amount,
                currency_code,
            } => info!(amount, currency = %currency_code, "Parsed amount"),
            ParsedCurrency::NeedsClarification { .. } => info!("Model asked for clarification"),
            ParsedCurrency::Failure { reason } => info!(reason = %reason, "Model could not parse text"),
        }
        Ok(parsed)
    }
}
