//! Prompt construction for recommendation requests
//!
//! The prompt is configuration, not code: a user-message template with
//! named placeholders plus an optional system prompt. Operators can swap
//! in their own wording (or language) without touching the handler.

use crate::ollama::ChatMessage;

/// Default system message describing the assistant's expertise
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an expert in Kubernetes cluster resource optimization.";

/// Default user-message template
///
/// Recognized placeholders: `{cluster}`, `{pod}`, `{cpu_data}`,
/// `{ram_data}`, `{cpu_cost}`, `{ram_cost}`.
pub const DEFAULT_USER_TEMPLATE: &str = "\
Analyze the recent resource usage for pod {pod} in cluster {cluster}:
 - CPU samples: {cpu_data}
 - RAM samples: {ram_data}
Cost per CPU core: {cpu_cost}, cost per MB of RAM: {ram_cost}.
Point out what is wrong with the pod's resource profile and suggest \
concrete fixes. Keep the answer short.";

/// A configurable prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: Option<String>,
    user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            user: DEFAULT_USER_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Create a template from an optional system prompt and a user template
    pub fn new(system: Option<String>, user: impl Into<String>) -> Self {
        Self {
            system,
            user: user.into(),
        }
    }

    /// Render the message list for one request
    ///
    /// Produces the optional system message followed by one user message
    /// with all placeholders substituted.
    pub fn messages(
        &self,
        cluster: &str,
        pod: &str,
        cpu_data: &[f64],
        ram_data: &[f64],
        cpu_cost: f64,
        ram_cost: f64,
    ) -> Vec<ChatMessage> {
        let user = self
            .user
            .replace("{cluster}", cluster)
            .replace("{pod}", pod)
            .replace("{cpu_data}", &render_series(cpu_data))
            .replace("{ram_data}", &render_series(ram_data))
            .replace("{cpu_cost}", &format!("{cpu_cost}"))
            .replace("{ram_cost}", &format!("{ram_cost}"));

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(user));
        messages
    }
}

/// Format a sample series as a bracketed comma-separated list
fn render_series(samples: &[f64]) -> String {
    let parts: Vec<String> = samples.iter().map(|v| format!("{v}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_substitutes_all_placeholders() {
        let template = PromptTemplate::default();
        let messages = template.messages(
            "prod",
            "web-1",
            &[10.0, 20.0, 30.0],
            &[40.0, 50.0, 60.0],
            0.1,
            0.2,
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, DEFAULT_SYSTEM_PROMPT);

        let user = &messages[1];
        assert_eq!(user.role, "user");
        assert!(user.content.contains("pod web-1"));
        assert!(user.content.contains("cluster prod"));
        assert!(user.content.contains("[10, 20, 30]"));
        assert!(user.content.contains("[40, 50, 60]"));
        assert!(user.content.contains("0.1"));
        assert!(user.content.contains("0.2"));
        assert!(!user.content.contains('{'));
    }

    #[test]
    fn test_template_without_system_prompt() {
        let template = PromptTemplate::new(None, "Check {pod} now");
        let messages = template.messages("prod", "web-1", &[], &[], 0.0, 0.0);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "Check web-1 now");
    }

    #[test]
    fn test_template_may_omit_cost_placeholders() {
        let template = PromptTemplate::new(None, "CPU for {pod}: {cpu_data}");
        let messages = template.messages("prod", "web-1", &[1.5, 2.5], &[99.0], 0.1, 0.2);

        assert_eq!(messages[0].content, "CPU for web-1: [1.5, 2.5]");
    }

    #[test]
    fn test_empty_series_render_as_empty_brackets() {
        let template = PromptTemplate::new(None, "{cpu_data} {ram_data}");
        let messages = template.messages("c", "p", &[], &[], 0.0, 0.0);

        assert_eq!(messages[0].content, "[] []");
    }
}
