pub mod service;
pub mod types;

pub use service::{GoogleTranslateClient, TranslateProvider, TranslationService};
pub use types::TranslationRequest;
