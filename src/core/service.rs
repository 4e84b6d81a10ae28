//! Prompt forwarding service
//!
//! Validates an inbound prompt, forwards it to the upstream API and
//! normalizes whatever comes back.

use crate::core::catalog::{ModelCatalog, PromptKind};
use crate::core::client::Upstream;
use crate::core::config::Config;
use crate::core::constants::message;
use crate::models::response::{NormalizedResponse, Payload, normalize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// How upstream bodies are fed to the normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Decode the body as JSON instead of relaying it as text
    pub decode_body: bool,
    /// Treat a decoded `error` field as an error result
    pub error_check: bool,
}

pub struct PromptService {
    upstream: Arc<dyn Upstream>,
    base_api: String,
    options: NormalizeOptions,
}

impl PromptService {
    pub fn new(upstream: Arc<dyn Upstream>, base_api: String, options: NormalizeOptions) -> Self {
        Self {
            upstream,
            base_api,
            options,
        }
    }

    /// Build a service from the loaded configuration
    pub fn from_config(upstream: Arc<dyn Upstream>, config: &Config) -> Self {
        Self::new(
            upstream,
            config.base_api.clone(),
            NormalizeOptions {
                decode_body: config.decode_body,
                error_check: config.error_check,
            },
        )
    }

    /// Forward a chat prompt
    pub async fn chatbot(&self, prompt: Option<&str>, model: Option<&str>) -> NormalizedResponse {
        self.forward(PromptKind::Chat, prompt, model).await
    }

    /// Forward an image generation prompt
    pub async fn generate_image(
        &self,
        prompt: Option<&str>,
        model: Option<&str>,
    ) -> NormalizedResponse {
        self.forward(PromptKind::Image, prompt, model).await
    }

    async fn forward(
        &self,
        kind: PromptKind,
        prompt: Option<&str>,
        model: Option<&str>,
    ) -> NormalizedResponse {
        let (prompt, model) = match validate(kind, prompt, model) {
            Some(input) => input,
            None => {
                debug!("Rejected {} request: prompt={:?} model={:?}", kind, prompt, model);
                return NormalizedResponse::error(message::INVALID_INPUT);
            }
        };

        info!("Forwarding {} prompt to model {}", kind, model);

        let url = kind.url(&self.base_api);
        let params = [("model", model), ("prompt", prompt)];

        match self.upstream.get(&url, &params).await {
            Ok(body) => {
                let payload = if self.options.decode_body {
                    Payload::Encoded(body)
                } else {
                    Payload::Text(body)
                };
                let result = normalize(payload, self.options.error_check);
                if let NormalizedResponse::Data { data } = &result {
                    debug!("Decoded upstream fields: {:?}", data.keys().collect::<Vec<_>>());
                }
                result
            }
            Err(e) => {
                error!("Upstream {} request for model {} failed: {}", kind, model, e);
                NormalizedResponse::error(message::UPSTREAM_FAILED)
            }
        }
    }
}

/// Returns `(prompt, model)` when both are present and the model is allowed
fn validate<'a>(
    kind: PromptKind,
    prompt: Option<&'a str>,
    model: Option<&'a str>,
) -> Option<(&'a str, &'a str)> {
    let model = model.filter(|m| ModelCatalog::allows(kind, m))?;
    let prompt = prompt.filter(|p| !p.is_empty())?;
    Some((prompt, model))
}
