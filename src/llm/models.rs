//! Read-only listing of the models the endpoint offers.

use tracing::debug;

use crate::error::ModelListError;

use super::client::{CompletionClient, describe_transport_error};
use super::types::{ErrorResponse, ModelInfo, ModelList};

impl CompletionClient {
    /// Fetch available models, sorted by id.
    ///
    /// `filter` keeps models whose id or name contains it (case-insensitive).
    /// The API key is sent only when one is configured.
    pub async fn list_models(&self, filter: Option<&str>) -> Result<Vec<ModelInfo>, ModelListError> {
        let mut request = self.http.get(self.url("models"));
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelListError::Transport(describe_transport_error(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ModelListError::Transport(describe_transport_error(&e)))?;

        if !status.is_success() {
            return Err(ModelListError::Remote {
                status: status.as_u16(),
                message: ErrorResponse::message_from_body(&body),
            });
        }

        let list: ModelList = serde_json::from_str(&body)
            .map_err(|e| ModelListError::InvalidResponse(e.to_string()))?;

        let mut models = filter_models(list.data, filter);
        models.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Listed {} model(s)", models.len());
        Ok(models)
    }
}

fn filter_models(models: Vec<ModelInfo>, filter: Option<&str>) -> Vec<ModelInfo> {
    let needle = match filter.map(str::trim) {
        Some(f) if !f.is_empty() => f.to_lowercase(),
        _ => return models,
    };

    models
        .into_iter()
        .filter(|m| m.id.to_lowercase().contains(&needle) || m.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, name: &str) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            canonical_slug: None,
            name: name.to_string(),
            description: String::new(),
            pricing: Default::default(),
        }
    }

    #[test]
    fn test_filter_matches_id_or_name() {
        let models = vec![
            model("anthropic/claude-3.5-sonnet", "Anthropic: Claude 3.5 Sonnet"),
            model("deepseek/deepseek-r1", "DeepSeek: R1"),
            model("openai/gpt-4o", "OpenAI: GPT-4o"),
        ];

        let filtered = filter_models(models.clone(), Some("DEEPSEEK"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "deepseek/deepseek-r1");

        let by_name = filter_models(models, Some("sonnet"));
        assert_eq!(by_name.len(), 1);
    }

    #[test]
    fn test_blank_filter_keeps_everything() {
        let models = vec![model("a", "A"), model("b", "B")];
        assert_eq!(filter_models(models.clone(), Some("  ")).len(), 2);
        assert_eq!(filter_models(models, None).len(), 2);
    }
}
