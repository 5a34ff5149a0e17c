//! # FX Parser
//!
//! AI parsing adapter for the conversion pipeline. Implements the
//! [`fx_types::CurrencyParser`] port on top of Google Gemini:
//!
//! - `prompt` - deterministic prompt template
//! - `client` - connection-pooled Gemini HTTP client
//! - `decode` - strict decoding of the model's JSON reply
//! - `parser` - the port implementation tying them together

pub mod client;
pub mod decode;
pub mod parser;
pub mod prompt;
pub mod types;


pub use client::{DEFAULT_BASE_URL, GeminiClient};
pub use decode::decode_model_output;
pub use parser::{DEFAULT_MODEL, GeminiCurrencyParser};
pub use prompt::build_prompt;
