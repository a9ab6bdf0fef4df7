//! Match Context - the signals a condition can look at
//!
//! A context is built once per turn and shared read-only by every candidate
//! evaluation in that turn. It holds:
//! - the raw input text
//! - the conversation so far
//! - static configuration metadata
//! - a read-only view of session state ([`StateAccessor`])
//! - the arguments of a pending tool call

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State key holding the raw input text
pub const STATE_INPUT_KEY: &str = "input";

/// State key holding the conversation messages
pub const STATE_MESSAGES_KEY: &str = "messages";

/// Read-only key lookup into state owned by the host pipeline
pub trait StateAccessor: Send + Sync {
    /// Value stored at `key`, if any
    fn value(&self, key: &str) -> Option<Value>;
}

impl StateAccessor for HashMap<String, Value> {
    fn value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl StateAccessor for serde_json::Map<String, Value> {
    fn value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

/// Adapts a closure into a [`StateAccessor`]
pub struct StateFn<F>(pub F);

impl<F> StateAccessor for StateFn<F>
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn value(&self, key: &str) -> Option<Value> {
        (self.0)(key)
    }
}

/// Speaker of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One conversation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Immutable snapshot of one turn's matching signals
#[derive(Clone, Default)]
pub struct MatchContext {
    input: Option<String>,
    messages: Vec<ChatMessage>,
    metadata: HashMap<String, Value>,
    state: Option<Arc<dyn StateAccessor>>,
    tool_args: HashMap<String, Value>,
}

impl std::fmt::Debug for MatchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchContext")
            .field("input", &self.input)
            .field("messages", &self.messages.len())
            .field("metadata", &self.metadata)
            .field("state", &self.state.is_some())
            .field("tool_args", &self.tool_args)
            .finish()
    }
}

impl MatchContext {
    /// Context with only the input text set
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: Some(input.into()),
            ..Default::default()
        }
    }

    /// Context with nothing set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a context from host state
    ///
    /// Input text comes from the `"input"` state key and the conversation
    /// from `"messages"`. Messages that do not parse are skipped.
    pub fn from_state(state: Arc<dyn StateAccessor>, metadata: HashMap<String, Value>) -> Self {
        let input = match state.value(STATE_INPUT_KEY) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };

        let messages = match state.value(STATE_MESSAGES_KEY) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<ChatMessage>(item).ok())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            input,
            messages,
            metadata,
            state: Some(state),
            tool_args: HashMap::new(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_state(mut self, state: Arc<dyn StateAccessor>) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_tool_args(mut self, tool_args: HashMap<String, Value>) -> Self {
        self.tool_args = tool_args;
        self
    }

    pub fn with_tool_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tool_args.insert(key.into(), value.into());
        self
    }

    /// Raw input text
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// State value at `key`; `None` without a state accessor or for a blank key
    pub fn state_value(&self, key: &str) -> Option<Value> {
        if !has_text(Some(key)) {
            return None;
        }
        self.state.as_ref()?.value(key)
    }

    pub fn tool_args(&self) -> &HashMap<String, Value> {
        &self.tool_args
    }

    pub fn tool_arg(&self, key: &str) -> Option<&Value> {
        self.tool_args.get(key)
    }
}

/// True if `s` contains a non-whitespace character
pub fn has_text(s: Option<&str>) -> bool {
    s.is_some_and(|s| !s.trim().is_empty())
}

/// Textual form of a value for equality checks
///
/// Strings render without quotes, other values as compact JSON. `null`
/// has no textual form.
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_empty() {
        let ctx = MatchContext::empty();
        assert!(ctx.input().is_none());
        assert!(ctx.messages().is_empty());
        assert!(ctx.metadata().is_empty());
        assert!(ctx.tool_args().is_empty());
        assert!(ctx.state_value("anything").is_none());
    }

    #[test]
    fn test_builder_chain() {
        let ctx = MatchContext::new("hello")
            .with_metadata_entry("lang", "en")
            .with_tool_arg("city", "Paris")
            .with_messages(vec![ChatMessage::user("hello")]);

        assert_eq!(ctx.input(), Some("hello"));
        assert_eq!(ctx.metadata_value("lang"), Some(&json!("en")));
        assert_eq!(ctx.tool_arg("city"), Some(&json!("Paris")));
        assert_eq!(ctx.messages()[0].role, MessageRole::User);
    }

    #[test]
    fn test_from_state() {
        let mut state: HashMap<String, Value> = HashMap::new();
        state.insert("input".to_string(), json!("refund my order"));
        state.insert(
            "messages".to_string(),
            json!([
                {"role": "user", "content": "hi"},
                {"role": "narrator", "content": "skipped"},
                {"role": "assistant", "content": "hello"}
            ]),
        );
        state.insert("stage".to_string(), json!("checkout"));

        let mut metadata = HashMap::new();
        metadata.insert("tenant".to_string(), json!("acme"));

        let ctx = MatchContext::from_state(Arc::new(state), metadata);
        assert_eq!(ctx.input(), Some("refund my order"));
        assert_eq!(ctx.messages().len(), 2);
        assert_eq!(ctx.state_value("stage"), Some(json!("checkout")));
        assert_eq!(ctx.metadata_value("tenant"), Some(&json!("acme")));
    }

    #[test]
    fn test_from_state_non_string_input() {
        let mut state: HashMap<String, Value> = HashMap::new();
        state.insert("input".to_string(), json!(42));
        let ctx = MatchContext::from_state(Arc::new(state), HashMap::new());
        assert!(ctx.input().is_none());
        assert!(ctx.messages().is_empty());
    }

    #[test]
    fn test_state_fn_accessor() {
        let accessor = StateFn(|key: &str| (key == "mode").then(|| json!("expert")));
        let ctx = MatchContext::new("x").with_state(Arc::new(accessor));
        assert_eq!(ctx.state_value("mode"), Some(json!("expert")));
        assert_eq!(ctx.state_value("other"), None);
        assert_eq!(ctx.state_value("  "), None);
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("en")), Some("en".to_string()));
        assert_eq!(stringify(&json!(42)), Some("42".to_string()));
        assert_eq!(stringify(&json!(true)), Some("true".to_string()));
        assert_eq!(stringify(&json!(["a", 1])), Some(r#"["a",1]"#.to_string()));
        assert_eq!(stringify(&Value::Null), None);
    }

    #[test]
    fn test_has_text() {
        assert!(has_text(Some("a")));
        assert!(!has_text(Some(" \t\n")));
        assert!(!has_text(Some("")));
        assert!(!has_text(None));
    }
}
