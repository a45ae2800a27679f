//! The static model capability table backing [`crate::model::Models`].
//!
//! Capability metadata (context window, vision/tools/reasoning/search
//! support) isn't published by a live endpoint, so it's carried as a
//! compiled-in table rather than invented from a response schema that
//! doesn't exist.

use serde::{Deserialize, Serialize};

/// Capability/limits metadata for one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub description: &'static str,
    pub max_tokens: u32,
    pub supports_vision: bool,
    pub supports_tools: bool,
    pub supports_reasoning: bool,
    pub supports_search: bool,
}

macro_rules! model {
    ($id:expr, $description:expr, $max_tokens:expr, vision=$vision:expr, tools=$tools:expr, reasoning=$reasoning:expr, search=$search:expr $(,)?) => {
        ModelInfo {
            id: $id,
            description: $description,
            max_tokens: $max_tokens,
            supports_vision: $vision,
            supports_tools: $tools,
            supports_reasoning: $reasoning,
            supports_search: $search,
        }
    };
}

/// The full known-model table, newest generation first.
pub static MODEL_DATABASE: &[ModelInfo] = &[
    // Grok-4 series (latest, with reasoning)
    model!("grok-4", "Grok-4 full capability model", 131072, vision = false, tools = true, reasoning = true, search = true),
    model!("grok-4-latest", "Auto-updated to latest grok-4", 131072, vision = false, tools = true, reasoning = true, search = true),
    model!("grok-4-0709", "Grok-4 dated release (2024-07-09)", 131072, vision = false, tools = true, reasoning = true, search = true),
    model!("grok-4-fast-reasoning", "Fast grok-4 with thinking capability", 131072, vision = false, tools = true, reasoning = true, search = true),
    model!("grok-4-fast-non-reasoning", "Fast grok-4 without reasoning overhead", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-code-fast-1", "Code-specialized fast model", 131072, vision = false, tools = true, reasoning = false, search = true),
    // Grok-3 series
    model!("grok-3", "Grok-3 current generation", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-3-latest", "Auto-updated to latest grok-3", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-3-fast", "Grok-3 with lower latency", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-3-fast-latest", "Auto-updated grok-3-fast", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-3-mini", "Efficient small grok-3 model", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-3-mini-latest", "Auto-updated grok-3-mini", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-3-mini-fast", "Smallest/fastest grok-3", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-3-mini-fast-latest", "Auto-updated grok-3-mini-fast", 131072, vision = false, tools = true, reasoning = false, search = true),
    // Grok-2 series
    model!("grok-2", "Grok-2 previous generation", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-2-latest", "Auto-updated grok-2", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-2-1212", "Grok-2 dated release (2024-12-12)", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-2-vision", "Grok-2 with vision capabilities", 131072, vision = true, tools = true, reasoning = false, search = true),
    model!("grok-2-vision-latest", "Auto-updated grok-2-vision", 131072, vision = true, tools = true, reasoning = false, search = true),
    model!("grok-2-vision-1212", "Grok-2-vision dated release (2024-12-12)", 131072, vision = true, tools = true, reasoning = false, search = true),
    model!("grok-2-image", "Grok-2 image model", 131072, vision = true, tools = false, reasoning = false, search = false),
    model!("grok-2-image-latest", "Auto-updated grok-2-image", 131072, vision = true, tools = false, reasoning = false, search = false),
    model!("grok-2-image-1212", "Grok-2-image dated release (2024-12-12)", 131072, vision = true, tools = false, reasoning = false, search = false),
    // Legacy
    model!("grok-beta", "Legacy grok beta (128K context)", 131072, vision = false, tools = true, reasoning = false, search = true),
    model!("grok-vision-beta", "Legacy grok vision beta", 8192, vision = true, tools = false, reasoning = false, search = false),
];

/// Looks up a model by id in [`MODEL_DATABASE`]. Absence is not an error;
/// callers treat a missing model as "unknown capabilities," not a failure.
pub fn lookup(model_id: &str) -> Option<&'static ModelInfo> {
    let found = MODEL_DATABASE.iter().find(|m| m.id == model_id);
    if found.is_none() {
        tracing::warn!(model_id, "model not found in local capability table");
    }
    found
}

/// A lightweight, low-latency model recommendation for resource-constrained
/// callers. Not necessarily the same as [`crate::config::GROK_DEFAULT_MODEL`],
/// which favors general capability over footprint.
pub fn recommended_model() -> &'static str {
    "grok-3-mini-fast-latest"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vision_beta_has_the_legacy_small_context_window() {
        let info = lookup("grok-vision-beta").unwrap();
        assert_eq!(info.max_tokens, 8192);
        assert!(info.supports_vision);
        assert!(!info.supports_tools);
        assert!(!info.supports_search);
    }

    #[test]
    fn image_models_do_not_support_tools_or_search() {
        let info = lookup("grok-2-image-latest").unwrap();
        assert!(info.supports_vision);
        assert!(!info.supports_tools);
        assert!(!info.supports_search);
    }

    #[test]
    fn unknown_model_returns_none() {
        assert!(lookup("grok-9000").is_none());
    }

    #[test]
    fn database_has_no_duplicate_ids() {
        let mut ids: Vec<_> = MODEL_DATABASE.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), MODEL_DATABASE.len());
    }
}
