//! Generation request/response types.
//!
//! `GenerationRequest` is the flattened body sent to a remote generation
//! function. `GenerationResult` is the discriminated outcome handed back to
//! the UI layer: either the generated content or exactly one failure kind.

use std::fmt;

use serde::Serialize;

/// Class roster snapshot forwarded with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassContextPayload {
    pub total_students: u32,
    pub has_special_needs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_needs_notes: Option<String>,
}

/// Body of a generation call. Built once per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    pub grade: String,
    pub subject: String,
    /// Methodology display names joined with ", ".
    pub methodology: String,
    pub difficulty_level: String,
    pub duration_minutes: u32,
    pub accessibility_options: Vec<String>,
    pub specific_idea: String,
    pub students_per_class: u32,
    pub number_of_lessons: u32,
    pub no_digital_resources: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bncc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_context: Option<ClassContextPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

/// Discriminant of a [`GenerationFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    SessionExpired,
    QuotaExceeded,
    GenerationError,
    RemoteError,
    EmptyResult,
    InFlight,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SessionExpired => "session_expired",
            Self::QuotaExceeded => "quota_exceeded",
            Self::GenerationError => "generation_error",
            Self::RemoteError => "remote_error",
            Self::EmptyResult => "empty_result",
            Self::InFlight => "in_flight",
        };
        f.write_str(s)
    }
}

/// Why a generation attempt did not produce content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationFailure {
    /// No usable credential, or the remote service rejected it.
    SessionExpired,
    /// The user's tier limit is reached.
    QuotaExceeded {
        message: String,
        limit_type: String,
        limit: Option<u64>,
        tier: Option<String>,
    },
    /// The remote function ran but reported an error.
    GenerationError { message: String },
    /// The call itself failed (network, non-JSON response, unexpected status).
    RemoteError { message: String },
    /// The call succeeded but returned no content.
    EmptyResult,
    /// Another generation for this session is still running.
    InFlight,
}

impl GenerationFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SessionExpired => FailureKind::SessionExpired,
            Self::QuotaExceeded { .. } => FailureKind::QuotaExceeded,
            Self::GenerationError { .. } => FailureKind::GenerationError,
            Self::RemoteError { .. } => FailureKind::RemoteError,
            Self::EmptyResult => FailureKind::EmptyResult,
            Self::InFlight => FailureKind::InFlight,
        }
    }

    /// Whether resubmitting the same answers may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GenerationError { .. } | Self::RemoteError { .. } | Self::EmptyResult | Self::InFlight
        )
    }

    /// Notice text for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::SessionExpired => {
                "Your session has expired. Sign in again; your answers were kept.".to_string()
            }
            Self::QuotaExceeded {
                limit_type,
                limit,
                tier,
                ..
            } => {
                let tier = tier.as_deref().unwrap_or("current");
                match limit {
                    Some(limit) => format!(
                        "You reached the {limit_type} limit of your {tier} plan ({limit}). Upgrade to keep generating."
                    ),
                    None => format!(
                        "You reached the {limit_type} limit of your {tier} plan. Upgrade to keep generating."
                    ),
                }
            }
            Self::GenerationError { message } => format!("Generation failed: {message}"),
            Self::RemoteError { message } => {
                format!("Could not reach the generation service: {message}")
            }
            Self::EmptyResult => "The service returned no content. Please try again.".to_string(),
            Self::InFlight => "A generation is already running. Please wait.".to_string(),
        }
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

/// Outcome of one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success { content: String },
    Failure(GenerationFailure),
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            Self::Failure(failure) => Some(failure),
            Self::Success { .. } => None,
        }
    }
}

impl From<GenerationFailure> for GenerationResult {
    fn from(failure: GenerationFailure) -> Self {
        Self::Failure(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            topic: "Fractions".to_string(),
            grade: "5th grade".to_string(),
            subject: "Mathematics".to_string(),
            methodology: "Active learning".to_string(),
            difficulty_level: "intermediate".to_string(),
            duration_minutes: 100,
            accessibility_options: Vec::new(),
            specific_idea: String::new(),
            students_per_class: 30,
            number_of_lessons: 2,
            no_digital_resources: false,
            bncc_code: None,
            class_id: None,
            class_context: None,
            template_id: None,
        }
    }

    #[test]
    fn test_request_omits_absent_optionals() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(value["durationMinutes"], 100);
        assert_eq!(value["studentsPerClass"], 30);
        assert!(value.get("classId").is_none());
        assert!(value.get("templateId").is_none());
        assert!(value.get("bnccCode").is_none());
    }

    #[test]
    fn test_request_includes_present_optionals() {
        let mut req = request();
        req.class_id = Some("class-9".to_string());
        req.class_context = Some(ClassContextPayload {
            total_students: 28,
            has_special_needs: true,
            special_needs_notes: None,
        });
        let value = serde_json::to_value(req).unwrap();
        assert_eq!(value["classId"], "class-9");
        assert_eq!(value["classContext"]["totalStudents"], 28);
        assert!(value["classContext"].get("specialNeedsNotes").is_none());
    }

    #[test]
    fn test_failure_serialization_is_tagged() {
        let result = GenerationResult::Failure(GenerationFailure::QuotaExceeded {
            message: "limit reached".to_string(),
            limit_type: "lesson_plans".to_string(),
            limit: Some(10),
            tier: Some("free".to_string()),
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["kind"], "quota_exceeded");
        assert_eq!(value["limit"], 10);
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(!GenerationFailure::SessionExpired.is_retryable());
        assert!(GenerationFailure::EmptyResult.is_retryable());
        assert!(
            GenerationFailure::RemoteError {
                message: "timeout".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_quota_message_mentions_tier() {
        let failure = GenerationFailure::QuotaExceeded {
            message: "limit reached".to_string(),
            limit_type: "lesson_plans".to_string(),
            limit: Some(10),
            tier: Some("free".to_string()),
        };
        let msg = failure.user_message();
        assert!(msg.contains("free"));
        assert!(msg.contains("10"));
        assert_eq!(failure.kind(), FailureKind::QuotaExceeded);
    }
}
