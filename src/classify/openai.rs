use serde_json::json;

use super::{Classifier, ClassifyError, ClassifyResponse, ExtractedTask};
use crate::config::AppConfig;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Low temperature biases the model toward stable categorical output.
pub const TEMPERATURE: f32 = 0.3;

/// Fixed instruction: the four legal category ids and the required answer
/// shape, nothing else.
const SYSTEM_PROMPT: &str = "\
You extract actionable tasks from a spoken note. Return ONLY a JSON object, no explanation.

Required shape:
{
  \"tasks\": [
    { \"text\": \"the task\", \"category\": \"work\" | \"home\" | \"personal\" | \"other\" }
  ]
}

Category rules:
- work: job related (meetings, documents, email, reports)
- home: household (shopping, cleaning, cooking)
- personal: yourself (gym, study, doctor, hobbies)
- other: anything else";

/// Chat-completions classifier. One awaited POST per transcript, no retry;
/// the pipeline's fallback covers every failure.
#[derive(Debug, Clone)]
pub struct OpenAiClassifier {
    client: reqwest::Client,
    api_url: String,
    model: String,
    temperature: f32,
    credential: Option<String>,
}

impl OpenAiClassifier {
    pub fn new(config: &AppConfig, credential: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            credential,
        }
    }
}

impl Classifier for OpenAiClassifier {
    async fn classify(&self, transcript: &str) -> Result<Vec<ExtractedTask>, ClassifyError> {
        let credential = self
            .credential
            .as_deref()
            .ok_or(ClassifyError::MissingCredential)?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": transcript }
            ],
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifyError::Status { status, body });
        }

        let api_resp: serde_json::Value = resp.json().await?;

        // The answer is the first choice's message text
        let content = api_resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ClassifyError::Malformed("no message content in response".to_string())
            })?;

        parse_answer(content).map(|r| r.tasks)
    }
}

/// Parse the model's textual answer as the required JSON shape, tolerating
/// markdown code fences around it.
fn parse_answer(text: &str) -> Result<ClassifyResponse, ClassifyError> {
    let trimmed = text.trim();
    let json_str = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let json_str = json_str.strip_suffix("```").unwrap_or(json_str).trim();

    serde_json::from_str(json_str)
        .map_err(|e| ClassifyError::Malformed(format!("{} — raw: {}", e, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: &str =
        r#"{"tasks":[{"text":"メールを返信する","category":"work"},{"text":"ジムに行く","category":"personal"}]}"#;

    #[test]
    fn bare_json_answer_parses() {
        let parsed = parse_answer(ANSWER).unwrap();
        assert_eq!(parsed.tasks.len(), 2);
        assert_eq!(parsed.tasks[0].category, "work");
    }

    #[test]
    fn fenced_answer_parses() {
        let fenced = format!("```json\n{}\n```", ANSWER);
        assert_eq!(parse_answer(&fenced).unwrap().tasks.len(), 2);

        let plain_fence = format!("```\n{}\n```", ANSWER);
        assert_eq!(parse_answer(&plain_fence).unwrap().tasks.len(), 2);
    }

    #[test]
    fn prose_answer_is_malformed() {
        let err = parse_answer("Sure! Here are your tasks: ...").unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed(_)));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = parse_answer(r#"{"items":[]}"#).unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed(_)));
    }
}
