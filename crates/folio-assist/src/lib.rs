//! folio-assist: routes a message to one of several text-generation
//! services with the open document as context.
//!
//! ```ignore
//! let assistant = Assistant::new(config);
//! let context = DocumentContext::new("main.tex", text);
//! let reply = assistant.ask(ProviderKind::Anthropic, &context, "add a results table").await?;
//! if let Some(fragment) = reply.primary_fragment() {
//!     apply_fragment(&mut document, fragment);
//! }
//! ```

pub mod assistant;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use assistant::{AssistReply, Assistant, ResolvedProvider};
pub use error::AssistError;
pub use prompt::{ChatRequest, DocumentContext};
pub use provider::{Dialect, ProviderKind};
