mod catalog;
mod client;
mod dispatch;
mod error;
mod matcher;
mod open_router;
mod utils;

pub use catalog::{CatalogPolicy, ModelCatalog, ModelSource};
pub use client::Client;
pub use dispatch::{CompletionDispatcher, Persona, RequestPolicy};
pub use error::{ErrorCode, ErrorResponse};
pub use matcher::IdMatch;
pub use open_router::{ChatRequest, OpenRouter, OpenRouterModel};
