use std::collections::HashSet;

use lazy_static::lazy_static;
use qcode_domain::{ModelDescriptor, ModelId};
use regex::Regex;

use crate::matcher::IdMatch;
use crate::open_router::OpenRouterModel;

const FLAGSHIP_CODER: &str = "qwen/qwen3-coder:free";
const FLAGSHIP_LABEL: &str = "Qwen3 Coder (free)";
const FREE_TOKEN: &str = ":free";
const FREE_MARKER: &str = " (free)";
const MAX_NAME_WIDTH: usize = 45;
const ELLIPSIS: &str = "...";

lazy_static! {
    static ref PARENTHETICAL: Regex = Regex::new(r"\(.*?\)").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// How a display name is derived once a naming rule matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Naming {
    /// A fixed label, ignoring whatever the provider calls the model.
    Fixed(&'static str),
    /// The cleaned raw name with the free-tier marker appended.
    FreeTier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRule {
    pub matcher: IdMatch,
    pub naming: Naming,
}

impl NamingRule {
    const fn new(matcher: IdMatch, naming: Naming) -> Self {
        Self { matcher, naming }
    }
}

/// Filtering, naming and ranking applied to a raw provider listing. Rules are
/// evaluated top to bottom and the first match wins.
#[derive(Debug, Clone)]
pub struct CatalogPolicy {
    naming: Vec<NamingRule>,
    ranking: Vec<IdMatch>,
}

impl Default for CatalogPolicy {
    fn default() -> Self {
        Self {
            naming: vec![
                NamingRule::new(IdMatch::Exact(FLAGSHIP_CODER), Naming::Fixed(FLAGSHIP_LABEL)),
                NamingRule::new(IdMatch::Prefix("qwen/"), Naming::FreeTier),
                NamingRule::new(IdMatch::Suffix(FREE_TOKEN), Naming::FreeTier),
            ],
            ranking: vec![
                IdMatch::Exact(FLAGSHIP_CODER),
                IdMatch::Prefix("qwen/"),
                IdMatch::Contains(&["coder", "code"]),
            ],
        }
    }
}

impl CatalogPolicy {
    /// Keeps free models only, drops duplicate ids, caps the list and ranks
    /// it. The sort is stable so equally ranked models keep provider order.
    pub fn curate(&self, models: Vec<OpenRouterModel>, max: usize) -> Vec<ModelDescriptor> {
        let mut seen = HashSet::new();
        let mut curated = models
            .into_iter()
            .filter_map(|model| {
                let id = model.id.clone().filter(|id| !id.trim().is_empty())?;
                Some((id, model))
            })
            .filter(|(_, model)| model.pricing.as_ref().is_some_and(|p| p.is_free()))
            .filter(|(id, _)| seen.insert(id.clone()))
            .take(max)
            .map(|(id, model)| self.describe(id, model))
            .collect::<Vec<_>>();

        curated.sort_by_key(|model| self.rank(model.id.as_str()));
        curated
    }

    fn describe(&self, id: String, model: OpenRouterModel) -> ModelDescriptor {
        let raw = model.name.as_deref().unwrap_or(&id);
        let display_name = self.display_name(&id, raw);
        ModelDescriptor {
            id: ModelId::from(id),
            display_name,
            description: model.description,
            context_length: model.context_length,
            pricing: model.pricing,
        }
    }

    pub fn display_name(&self, id: &str, raw: &str) -> String {
        let name = match self.naming.iter().find(|rule| rule.matcher.matches(id)) {
            Some(NamingRule { naming: Naming::Fixed(label), .. }) => label.to_string(),
            Some(NamingRule { naming: Naming::FreeTier, .. }) => {
                format!("{}{FREE_MARKER}", clean(&raw.replace(FREE_TOKEN, "")))
            }
            None => clean(raw),
        };
        truncate(&name)
    }

    /// Position of the first matching rank rule; unmatched ids rank last.
    pub fn rank(&self, id: &str) -> usize {
        self.ranking
            .iter()
            .position(|rule| rule.matches(id))
            .unwrap_or(self.ranking.len())
    }
}

fn clean(name: &str) -> String {
    let name = PARENTHETICAL.replace_all(name, "");
    WHITESPACE.replace_all(&name, " ").trim().to_string()
}

fn truncate(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_WIDTH {
        return name.to_string();
    }
    let head: String = name
        .chars()
        .take(MAX_NAME_WIDTH - ELLIPSIS.len())
        .collect();
    format!("{head}{ELLIPSIS}")
}
