use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Source {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Model,
    #[serde(rename = "system")]
    Directive,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContextSegment {
    #[serde(rename = "role")]
    pub source: Source,
    pub content: String,
}

/// The messages sent to the model for one request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Context {
    pub items: Vec<ContextSegment>,
}

impl Context {
    /// Creates a Context that starts with the given system directive.
    /// An empty directive is left out.
    pub fn new(directive: &str) -> Self {
        let mut items = Vec::new();
        if !directive.trim().is_empty() {
            items.push(ContextSegment {
                source: Source::Directive,
                content: directive.to_string(),
            });
        }
        Context { items }
    }

    /// Adds a new ContextSegment and returns a reference to it.
    pub fn add(&mut self, segment: ContextSegment) -> &ContextSegment {
        self.items.push(segment);
        self.items.last().expect("just pushed")
    }

    pub fn add_user_message(&mut self, content: String) -> &ContextSegment {
        self.add(ContextSegment {
            source: Source::User,
            content,
        })
    }

    /// Total characters across all segments, for request logging.
    pub fn char_count(&self) -> usize {
        self.items.iter().map(|s| s.content.chars().count()).sum()
    }
}

/// Asks the model to answer with JSON matching `schema`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: serde_json::Value,
}

impl ResponseFormat {
    /// Derives the schema from a Rust type.
    pub fn for_type<T: schemars::JsonSchema>(name: &str) -> Self {
        let schema = schemars::schema_for!(T);
        Self {
            name: name.to_string(),
            schema: serde_json::to_value(schema).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Represents a chunk of streamed content from the model.
#[derive(Debug, PartialEq)]
pub enum StreamChunk {
    Content(String),
    /// The provider signalled the end of the answer.
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_init_with_directive() {
        let context = Context::new("Responda em português.");
        assert_eq!(context.items.len(), 1);
        assert_eq!(context.items[0].source, Source::Directive);
    }

    #[test]
    fn test_context_blank_directive_is_skipped() {
        let context = Context::new("   ");
        assert!(context.items.is_empty());
    }

    #[test]
    fn test_context_add() {
        let mut ctx = Context::new("sys");
        let added = ctx.add_user_message("Gênesis 1".to_string());
        assert_eq!(added.content, "Gênesis 1");
        assert_eq!(ctx.items.len(), 2);
        assert_eq!(ctx.char_count(), "sys".len() + "Gênesis 1".chars().count());
    }

    #[test]
    fn test_segment_serializes_role_names() {
        let seg = ContextSegment {
            source: Source::Model,
            content: "ok".to_string(),
        };
        let json = serde_json::to_string(&seg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }

    #[test]
    fn test_response_format_for_type_has_object_schema() {
        #[derive(schemars::JsonSchema)]
        #[allow(dead_code)]
        struct Answer {
            reference: String,
        }
        let format = ResponseFormat::for_type::<Answer>("answer");
        assert_eq!(format.name, "answer");
        assert_eq!(format.schema["type"], "object");
        assert!(format.schema["properties"]["reference"].is_object());
    }
}
