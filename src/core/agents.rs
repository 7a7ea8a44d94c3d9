//! Display metadata for backend agents.
//!
//! The stream identifies agents by id (`triage_agent`, ...). The UI shows a
//! friendly name and a one-line description of what the agent is doing.
//! Unknown ids fall back to the raw id with a generic description.
//!
//! Colors are kept as names (`"magenta"`, `"#d75f00"`) so this module stays
//! free of terminal types; the TUI parses them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Description shown for agents missing from the directory.
pub const FALLBACK_DESCRIPTION: &str = "Processing...";

/// Color for agents that don't name one.
pub const FALLBACK_COLOR: &str = "gray";

/// Configured or built-in agent entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgentEntry {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Color name or `#rrggbb`. Defaults to the built-in color for the id, else gray.
    #[serde(default)]
    pub color: Option<String>,
}

/// Resolved display info for one agent id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub name: String,
    pub description: String,
    /// Single-letter badge used in the legend and activity panel.
    pub badge: char,
    /// Accent color name, parsed by the TUI.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDirectory {
    profiles: HashMap<String, AgentProfile>,
    /// Ids in legend order.
    order: Vec<String>,
}

impl Default for AgentDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AgentDirectory {
    /// The three agents the support backend ships with.
    pub fn builtin() -> Self {
        let mut dir = Self {
            profiles: HashMap::new(),
            order: Vec::new(),
        };
        dir.insert(
            "triage_agent",
            "Triage Agent",
            "Analyzing your request...",
            "magenta",
        );
        dir.insert(
            "product_expert",
            "Product Expert",
            "Searching product information...",
            "green",
        );
        dir.insert(
            "order_support",
            "Order Support",
            "Looking up order details...",
            "blue",
        );
        dir
    }

    /// Built-ins overlaid with configured entries (same id replaces).
    pub fn with_entries(entries: &[AgentEntry]) -> Self {
        let mut dir = Self::builtin();
        for entry in entries {
            let description = entry
                .description
                .clone()
                .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());
            let color = entry
                .color
                .clone()
                .or_else(|| dir.profiles.get(&entry.id).map(|p| p.color.clone()))
                .unwrap_or_else(|| FALLBACK_COLOR.to_string());
            dir.insert(&entry.id, &entry.name, &description, &color);
        }
        dir
    }

    fn insert(&mut self, id: &str, name: &str, description: &str, color: &str) {
        if !self.profiles.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.profiles.insert(
            id.to_string(),
            AgentProfile {
                name: name.to_string(),
                description: description.to_string(),
                badge: badge_for(name),
                color: color.to_string(),
            },
        );
    }

    /// Display info for `id`, falling back to the id itself.
    pub fn profile(&self, id: &str) -> AgentProfile {
        self.profiles.get(id).cloned().unwrap_or_else(|| AgentProfile {
            name: id.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
            badge: badge_for(id),
            color: FALLBACK_COLOR.to_string(),
        })
    }

    pub fn display_name(&self, id: &str) -> String {
        self.profile(id).name
    }

    /// Known agents in legend order.
    pub fn legend(&self) -> impl Iterator<Item = (&str, &AgentProfile)> {
        self.order
            .iter()
            .filter_map(|id| self.profiles.get(id).map(|p| (id.as_str(), p)))
    }
}

fn badge_for(name: &str) -> char {
    name.chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?')
}
