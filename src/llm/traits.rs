use crate::error::LlmError;
use std::future::Future;
use std::pin::Pin;

pub type ProviderFuture<'a> = Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;

/// A text-completion backend.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "gemini").
    fn name(&self) -> &str;

    /// Whether credentials are present. Calls fail fast when they are not.
    fn is_configured(&self) -> bool;

    fn chat<'a>(&'a self, message: &'a str, model: &'a str, temperature: f64) -> ProviderFuture<'a> {
        self.chat_with_system(None, message, model, temperature)
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> ProviderFuture<'a>;
}
