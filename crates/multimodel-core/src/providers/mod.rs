//! Provider adapters
//!
//! Each adapter speaks one provider's native HTTP protocol in one request
//! shape and normalizes the reply:
//!
//! | Provider | Shape      | Adapter                  |
//! |----------|------------|--------------------------|
//! | openai   | chat       | `OpenAiChatAdapter`      |
//! | openai   | responses  | `OpenAiResponsesAdapter` |
//! | google   | chat       | `GeminiAdapter`          |
//! | voyage   | embedding  | `VoyageAdapter`          |
//!
//! The `MockAdapter` is kept for testing purposes.

mod error;
mod gemini;
mod http;
mod mock;
mod openai_chat;
mod openai_responses;
mod registry;
mod traits;
mod voyage;

pub use error::{error_message_from_body, ProviderError, ProviderResult};
pub use traits::{AdapterCall, EmbeddingAdapter, EmbeddingCall, ProviderAdapter};

pub use gemini::GeminiAdapter;
pub use openai_chat::OpenAiChatAdapter;
pub use openai_responses::OpenAiResponsesAdapter;
pub use voyage::VoyageAdapter;

pub use registry::AdapterRegistry;

pub use mock::{MockAdapter, MockMode};
