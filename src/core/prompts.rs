//! Canned prompts offered on the landing view.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuickPrompt {
    pub label: String,
    pub prompt: String,
}

impl QuickPrompt {
    fn new(label: &str, prompt: &str) -> Self {
        Self {
            label: label.to_string(),
            prompt: prompt.to_string(),
        }
    }
}

pub fn default_prompts() -> Vec<QuickPrompt> {
    vec![
        QuickPrompt::new("Product Info", "What shampoo do you recommend for dry hair?"),
        QuickPrompt::new("Order Status", "Can you check the status of my order ORD-001?"),
        QuickPrompt::new("Return Help", "I need to return a product I purchased last week"),
        QuickPrompt::new("General Question", "What are your most popular products?"),
    ]
}
