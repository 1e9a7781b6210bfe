use derive_more::Display;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// One selectable remote model, as exposed by the catalog.
#[derive(Clone, Debug, Deserialize, Serialize, Setters, PartialEq)]
#[setters(into, strip_option)]
pub struct ModelDescriptor {
    pub id: ModelId,
    pub display_name: String,
    pub description: Option<String>,
    pub context_length: Option<u64>,
    pub pricing: Option<Pricing>,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<ModelId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: None,
            context_length: None,
            pricing: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Hash, Eq, Display)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl ToString) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Pricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<Price>,
}

impl Pricing {
    /// A model is free only when both the prompt and the completion price are
    /// present and equal to zero.
    pub fn is_free(&self) -> bool {
        let zero = |price: &Option<Price>| price.as_ref().is_some_and(Price::is_zero);
        zero(&self.prompt) && zero(&self.completion)
    }
}

/// A per-token price. The provider reports prices either as JSON numbers or
/// as decimal strings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    pub fn is_zero(&self) -> bool {
        match self {
            Price::Number(value) => *value == 0.0,
            Price::Text(value) => value.trim().parse::<f64>().is_ok_and(|value| value == 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_price_zero_in_either_representation() {
        assert!(Price::Number(0.0).is_zero());
        assert!(Price::Text("0".to_string()).is_zero());
        assert!(Price::Text("0.0".to_string()).is_zero());
        assert!(!Price::Text("0.000002".to_string()).is_zero());
        assert!(!Price::Number(0.5).is_zero());
        assert!(!Price::Text("free".to_string()).is_zero());
    }

    #[test]
    fn test_pricing_deserializes_mixed_forms() {
        let fixture = json!({"prompt": 0, "completion": "0"});
        let actual: Pricing = serde_json::from_value(fixture).unwrap();

        assert_eq!(actual.prompt, Some(Price::Number(0.0)));
        assert_eq!(actual.completion, Some(Price::Text("0".to_string())));
        assert!(actual.is_free());
    }

    #[test]
    fn test_pricing_missing_field_is_not_free() {
        let fixture = Pricing { prompt: Some(Price::Number(0.0)), completion: None };
        assert!(!fixture.is_free());
        assert!(!Pricing::default().is_free());
    }

    #[test]
    fn test_pricing_paid_completion_is_not_free() {
        let fixture = Pricing {
            prompt: Some(Price::Text("0".to_string())),
            completion: Some(Price::Text("0.00001".to_string())),
        };
        assert!(!fixture.is_free());
    }

    #[test]
    fn test_model_id_display() {
        let fixture = ModelId::new("qwen/qwen3-coder:free");
        assert_eq!(fixture.to_string(), "qwen/qwen3-coder:free");
        assert_eq!(fixture.as_str(), "qwen/qwen3-coder:free");
    }
}
