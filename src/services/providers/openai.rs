/// OpenAI review-comparison oracle
///
/// Submits both places' review excerpts to a chat completion constrained to
/// JSON-only, review-grounded output. Malformed replies and out-of-range
/// similarity values are errors; the scorer downgrades any error to a
/// degraded result.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::ResolvedPlace,
    services::providers::{ComparisonOracle, ReviewComparison},
};

const TEMPERATURE: f64 = 0.4;
const MAX_TOKENS: u32 = 400;

const SYSTEM_PROMPT: &str = "You are an expert location analyst.\n\
You compare two real-world places of the SAME category using only user reviews.\n\
You must be factual, balanced, and concise.\n\
Never invent information.\n\
If reviews conflict, explicitly mention it.\n\
Return ONLY valid JSON.";

#[derive(Clone)]
pub struct OpenAiComparisonOracle {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RawComparison {
    similarity: f64,
    reasoning: String,
    #[serde(default)]
    pros: Vec<String>,
    #[serde(default)]
    cons: Vec<String>,
}

impl OpenAiComparisonOracle {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout_secs: u64,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }

    fn build_user_prompt(source: &ResolvedPlace, candidate: &ResolvedPlace) -> String {
        format!(
            "SOURCE PLACE REVIEWS:\n{}\n\n\
             CANDIDATE PLACE REVIEWS:\n{}\n\n\
             Return JSON in EXACT format:\n\
             {{\n\
               \"similarity\": number,\n\
               \"reasoning\": string,\n\
               \"pros\": string[],\n\
               \"cons\": string[]\n\
             }}\n\n\
             Rules:\n\
             - similarity must be between 0 and 10\n\
             - Base reasoning ONLY on reviews\n\
             - No markdown\n\
             - No extra keys",
            serde_json::to_string_pretty(&source.reviews).unwrap_or_default(),
            serde_json::to_string_pretty(&candidate.reviews).unwrap_or_default(),
        )
    }

    /// Parses the completion content and rejects anything outside the
    /// contract.
    fn parse_comparison(content: &str) -> AppResult<ReviewComparison> {
        let raw: RawComparison = serde_json::from_str(content).map_err(|e| {
            AppError::ExternalApi(format!("Unparsable comparison output: {}", e))
        })?;

        if !raw.similarity.is_finite() || !(0.0..=10.0).contains(&raw.similarity) {
            return Err(AppError::ExternalApi(format!(
                "Similarity {} outside [0, 10]",
                raw.similarity
            )));
        }

        Ok(ReviewComparison {
            similarity: raw.similarity,
            reasoning: raw.reasoning,
            pros: raw.pros,
            cons: raw.cons,
        })
    }
}

#[async_trait::async_trait]
impl ComparisonOracle for OpenAiComparisonOracle {
    async fn compare_reviews(
        &self,
        source: &ResolvedPlace,
        candidate: &ResolvedPlace,
    ) -> AppResult<ReviewComparison> {
        let url = format!("{}/chat/completions", self.api_url);
        let user_prompt = Self::build_user_prompt(source, candidate);

        let request = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Comparison API returned status {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;

        let content = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| AppError::ExternalApi("Empty comparison response".to_string()))?;

        let comparison = Self::parse_comparison(content)?;

        tracing::debug!(
            source = %source.name,
            candidate = %candidate.name,
            similarity = comparison.similarity,
            "Review comparison completed"
        );

        Ok(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, PlaceCategory};

    fn profile(name: &str, reviews: &[&str]) -> ResolvedPlace {
        ResolvedPlace {
            place_id: format!("id-{name}"),
            name: name.to_string(),
            category: PlaceCategory::Gym,
            coordinates: Coordinate { lat: 0.0, lng: 0.0 },
            rating: Some(4.0),
            review_count: Some(10),
            price_level: None,
            reviews: reviews.iter().map(|r| r.to_string()).collect(),
            service_tags: vec![],
        }
    }

    #[test]
    fn test_parse_comparison_success() {
        let content = r#"{
            "similarity": 7.5,
            "reasoning": "Both praised for equipment quality",
            "pros": ["newer machines"],
            "cons": ["busier at peak hours"]
        }"#;

        let comparison = OpenAiComparisonOracle::parse_comparison(content).unwrap();
        assert_eq!(comparison.similarity, 7.5);
        assert_eq!(comparison.pros, vec!["newer machines"]);
    }

    #[test]
    fn test_parse_comparison_defaults_missing_lists() {
        let content = r#"{ "similarity": 5.0, "reasoning": "thin review data" }"#;
        let comparison = OpenAiComparisonOracle::parse_comparison(content).unwrap();
        assert!(comparison.pros.is_empty());
        assert!(comparison.cons.is_empty());
    }

    #[test]
    fn test_parse_comparison_rejects_out_of_range() {
        let content = r#"{ "similarity": 11.0, "reasoning": "over-enthusiastic" }"#;
        assert!(OpenAiComparisonOracle::parse_comparison(content).is_err());

        let content = r#"{ "similarity": -0.5, "reasoning": "negative" }"#;
        assert!(OpenAiComparisonOracle::parse_comparison(content).is_err());
    }

    #[test]
    fn test_parse_comparison_rejects_markdown_wrapping() {
        let content = "```json\n{ \"similarity\": 5.0, \"reasoning\": \"x\" }\n```";
        assert!(OpenAiComparisonOracle::parse_comparison(content).is_err());
    }

    #[test]
    fn test_user_prompt_embeds_both_review_sets() {
        let source = profile("Old Gym", &["spacious", "friendly staff"]);
        let candidate = profile("New Gym", &["modern machines"]);

        let prompt = OpenAiComparisonOracle::build_user_prompt(&source, &candidate);
        assert!(prompt.contains("spacious"));
        assert!(prompt.contains("modern machines"));
        assert!(prompt.contains("between 0 and 10"));
    }
}
