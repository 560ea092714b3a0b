use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{DailyMessage, ScriptureError, ScriptureProvider, SearchResult};
use crate::inference::{
    CompletionProvider, CompletionRequest, Context, ResponseFormat, complete_text,
};

pub const DEFAULT_TRANSLATION: &str = "João Ferreira de Almeida";

/// Search answers are wrapped in an object; strict structured output wants
/// an object at the root.
#[derive(Deserialize, JsonSchema, Debug)]
struct SearchAnswer {
    /// Versículos que contêm a palavra-chave.
    results: Vec<SearchResult>,
}

fn chapter_prompt(book: &str, chapter: u32, translation: &str) -> String {
    format!(
        "Forneça o texto completo de {book} capítulo {chapter} da Bíblia na versão {translation}. \
         Formate a resposta como um único bloco de texto. Cada versículo deve começar em uma nova \
         linha, seguido pelo número do versículo, um ponto e um espaço. Por exemplo: '1. No \
         princípio, criou Deus os céus e a terra.'. Não inclua nenhum texto introdutório ou \
         conclusivo, apenas o conteúdo do capítulo."
    )
}

const DAILY_PROMPT: &str =
    "Forneça um versículo bíblico inspirador para ser a 'mensagem do dia'.";

fn search_prompt(query: &str) -> String {
    format!(
        "Pesquise na Bíblia pela palavra-chave ou frase: \"{query}\". Retorne uma lista de \
         versículos que contenham essa palavra-chave."
    )
}

/// Drops a surrounding Markdown code fence (```json ... ```), if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Skip the info string ("json") on the opening line.
    match rest.find('\n') {
        Some(pos) => rest[pos + 1..].trim(),
        None => rest.trim(),
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ScriptureError> {
    serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        warn!("Model answer is not valid JSON: {e}");
        ScriptureError::Malformed(e.to_string())
    })
}

fn parse_daily_message(text: &str) -> Result<DailyMessage, ScriptureError> {
    let message: DailyMessage = parse_json(text)?;
    if message.reference.trim().is_empty() || message.text.trim().is_empty() {
        return Err(ScriptureError::Malformed(
            "Resposta da API em formato inválido.".to_string(),
        ));
    }
    Ok(message)
}

fn parse_search_results(text: &str) -> Result<Vec<SearchResult>, ScriptureError> {
    let body = strip_code_fence(text);
    // Some models ignore the wrapper and answer with the bare array.
    if body.starts_with('[') {
        return parse_json(body);
    }
    parse_json::<SearchAnswer>(body).map(|answer| answer.results)
}

/// Sources scripture by prompting a language model.
pub struct ModelScripture {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    translation: String,
}

impl ModelScripture {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: String, translation: String) -> Self {
        Self {
            provider,
            model,
            translation,
        }
    }

    async fn ask(
        &self,
        prompt: String,
        format: Option<&ResponseFormat>,
    ) -> Result<String, ScriptureError> {
        let mut context = Context::new("");
        context.add_user_message(prompt);
        info!(
            "Asking {} ({}): {} prompt chars, structured={}",
            self.provider.name(),
            self.model,
            context.char_count(),
            format.is_some()
        );

        let request = CompletionRequest {
            context: &context,
            model: &self.model,
            response_format: format,
        };
        complete_text(self.provider.as_ref(), request)
            .await
            .map_err(|source| ScriptureError::Provider {
                provider: self.provider.name().to_string(),
                source,
            })
    }
}

#[async_trait]
impl ScriptureProvider for ModelScripture {
    async fn fetch_chapter_text(&self, book: &str, chapter: u32) -> Result<String, ScriptureError> {
        let text = self
            .ask(chapter_prompt(book, chapter, &self.translation), None)
            .await?;
        debug!("{book} {chapter}: {} bytes of chapter text", text.len());
        Ok(text)
    }

    async fn fetch_daily_message(&self) -> Result<DailyMessage, ScriptureError> {
        let format = ResponseFormat::for_type::<DailyMessage>("daily_message");
        let text = self.ask(DAILY_PROMPT.to_string(), Some(&format)).await?;
        parse_daily_message(&text)
    }

    async fn search_bible(&self, query: &str) -> Result<Vec<SearchResult>, ScriptureError> {
        let format = ResponseFormat::for_type::<SearchAnswer>("search_results");
        let text = self.ask(search_prompt(query), Some(&format)).await?;
        let results = parse_search_results(&text)?;
        debug!("Search {:?}: {} results", query, results.len());
        Ok(results)
    }
}
