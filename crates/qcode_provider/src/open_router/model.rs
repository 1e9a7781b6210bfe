use qcode_domain::Pricing;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single entry of the provider's model listing. Every field is optional so
/// that one odd entry never invalidates the whole listing.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct OpenRouterModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
}

impl OpenRouterModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), ..Default::default() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = Some(pricing);
        self
    }
}

/// Raw listing body. Entries are kept as JSON values and decoded one by one.
#[derive(Debug, Deserialize, Clone)]
pub struct ListModelResponse {
    pub data: Vec<serde_json::Value>,
}

impl ListModelResponse {
    pub fn into_models(self) -> Vec<OpenRouterModel> {
        self.data
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<OpenRouterModel>(entry) {
                Ok(model) => Some(model),
                Err(error) => {
                    debug!(error = %error, "Skipping undecodable model entry");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use qcode_domain::Price;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_listing_skips_undecodable_entries() {
        let fixture: ListModelResponse = serde_json::from_value(json!({
            "data": [
                {"id": "qwen/qwen3-coder:free", "name": "Qwen: Qwen3 Coder (free)",
                 "context_length": 262144, "pricing": {"prompt": "0", "completion": "0"}},
                {"id": "broken/model", "context_length": "lots"},
                {"name": "No id"}
            ]
        }))
        .unwrap();

        let actual = fixture.into_models();

        assert_eq!(actual.len(), 2);
        assert_eq!(actual[0].id.as_deref(), Some("qwen/qwen3-coder:free"));
        assert_eq!(actual[0].context_length, Some(262144));
        assert_eq!(
            actual[0].pricing.as_ref().and_then(|p| p.prompt.clone()),
            Some(Price::Text("0".to_string()))
        );
        assert_eq!(actual[1].id, None);
    }

    #[test]
    fn test_listing_requires_data_sequence() {
        let actual = serde_json::from_value::<ListModelResponse>(json!({"data": {}}));
        assert!(actual.is_err());

        let actual = serde_json::from_value::<ListModelResponse>(json!({"models": []}));
        assert!(actual.is_err());
    }
}
