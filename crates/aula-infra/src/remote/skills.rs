//! HTTP skill suggester.
//!
//! Posts `{grade, subject, topic}` to the `suggest-bncc-skills` function and
//! reads back `{skills: [{code, description, relevance?}]}`.

use aula_core::auth::AuthSession;
use aula_core::directory::{SkillQuery, SkillSuggester};
use aula_types::error::RepositoryError;
use aula_types::wizard::BnccSkill;
use serde::Deserialize;

use super::{RemoteEndpoint, status_error};

const SUGGEST_FUNCTION: &str = "suggest-bncc-skills";

#[derive(Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    skills: Vec<BnccSkill>,
}

pub struct HttpSkillSuggester {
    endpoint: RemoteEndpoint,
}

impl HttpSkillSuggester {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

impl SkillSuggester for HttpSkillSuggester {
    async fn suggest_skills(
        &self,
        session: &AuthSession,
        query: &SkillQuery,
    ) -> Result<Vec<BnccSkill>, RepositoryError> {
        let url = self.endpoint.function_url(SUGGEST_FUNCTION);

        let response = self
            .endpoint
            .post(&url, session)
            .json(query)
            .send()
            .await
            .map_err(|e| RepositoryError::Query(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let parsed: SuggestResponse = response
            .json()
            .await
            .map_err(|e| RepositoryError::Query(format!("invalid skill suggestions: {e}")))?;

        // Drop duplicate codes, keeping the first (highest ranked) entry.
        let mut skills: Vec<BnccSkill> = Vec::with_capacity(parsed.skills.len());
        for skill in parsed.skills {
            if !skills.iter().any(|s| s.code == skill.code) {
                skills.push(skill);
            }
        }
        Ok(skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::routing::post;
    use axum::{Json, Router};
    use secrecy::SecretString;
    use serde_json::{Value, json};

    use crate::remote::test_server;

    #[tokio::test]
    async fn test_suggestions_are_parsed_and_deduplicated() {
        let router = Router::new().route(
            "/functions/v1/suggest-bncc-skills",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["topic"], "Fractions");
                Json(json!({"skills": [
                    {"code": "EF05MA03", "description": "Compare fractions", "relevance": "high"},
                    {"code": "EF05MA04", "description": "Equivalent fractions"},
                    {"code": "EF05MA03", "description": "duplicate"}
                ]}))
            }),
        );
        let base = test_server::spawn(router).await;
        let suggester =
            HttpSkillSuggester::new(RemoteEndpoint::new(base, None, Duration::from_secs(5)).unwrap());

        let query = SkillQuery {
            grade: "5th grade".to_string(),
            subject: "Mathematics".to_string(),
            topic: "Fractions".to_string(),
        };
        let skills = suggester
            .suggest_skills(&AuthSession::new(SecretString::from("t")), &query)
            .await
            .unwrap();

        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].description, "Compare fractions");
        assert_eq!(skills[0].relevance.as_deref(), Some("high"));
        assert!(skills[1].relevance.is_none());
    }
}
