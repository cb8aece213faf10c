use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::Config,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tracing::debug;

/// A generic client for single-turn chat completions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends one system message and one user message, returning the trimmed reply.
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String>;
}

/// An implementation of `ChatClient` for any OpenAI-compatible API.
///
/// Works with both `OpenAIConfig` and `AzureConfig`; on Azure the deployment
/// id in the config decides the model and `model` is only echoed in the request.
pub struct OpenAICompatibleClient<C: Config> {
    client: Client<C>,
    model: String,
}

impl<C: Config> OpenAICompatibleClient<C> {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions (e.g., "a24-gpt-4o-mini").
    pub fn new(config: C, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl<C> ChatClient for OpenAICompatibleClient<C>
where
    C: Config + Send + Sync + 'static,
{
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        let answer = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .as_deref()
            .context("No content in LLM response")?
            .trim()
            .to_string();

        debug!(model = %self.model, chars = answer.chars().count(), "Chat completion received");
        Ok(answer)
    }
}
