//! End-to-end wizard flow against in-memory ports.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};

use aula_core::auth::{AuthSession, SessionProvider};
use aula_core::draft::persistence::DraftPersistenceManager;
use aula_core::draft::storage::{DraftStorage, MemoryDraftStorage};
use aula_core::generation::client::{GenerationClient, InvocationError};
use aula_core::generation::orchestrator::GenerationOrchestrator;
use aula_core::wizard::navigation::NextOutcome;
use aula_core::wizard::session::{SessionPhase, WizardSession};
use aula_types::error::RepositoryError;
use aula_types::generation::{GenerationFailure, GenerationRequest};
use aula_types::wizard::{ClassSummary, ContentType, PersistedDraft, WizardPatch, WizardStep};

/// Replays one JSON payload per call, in order.
#[derive(Clone, Default)]
struct ScriptedClient {
    replies: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<(String, GenerationRequest)>>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Value>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::default(),
        }
    }

    fn requests(&self) -> Vec<(String, GenerationRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

impl GenerationClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(
        &self,
        endpoint: &str,
        request: &GenerationRequest,
        _session: &AuthSession,
    ) -> Result<Value, InvocationError> {
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.to_string(), request.clone()));
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(InvocationError::Transport("no scripted reply".to_string()));
        }
        Ok(replies.remove(0))
    }
}

struct TokenSession;

impl SessionProvider for TokenSession {
    fn name(&self) -> &str {
        "token"
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, RepositoryError> {
        Ok(Some(AuthSession::new(SecretString::from("educator-token"))))
    }
}

fn class_5a() -> ClassSummary {
    ClassSummary {
        id: "class-5a".to_string(),
        subject: "Mathematics".to_string(),
        grade: "5th grade".to_string(),
        total_students: 28,
        has_special_needs: true,
        special_needs_notes: Some("one student with dyslexia".to_string()),
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_flow_from_open_to_submitted() {
    let storage = MemoryDraftStorage::new();
    let drafts = Arc::new(DraftPersistenceManager::new(storage.clone()));
    let session = WizardSession::open(
        Arc::clone(&drafts),
        ContentType::LessonPlan,
        &WizardPatch::default().with_topic("Fractions"),
    )
    .await;

    // Context: blocked until a class is linked.
    assert!(matches!(session.next().unwrap(), NextOutcome::Blocked(_)));
    session.store().link_class(&class_5a());
    assert_eq!(
        session.next().unwrap(),
        NextOutcome::Advanced(WizardStep::Objectives)
    );

    // Objectives: topic came from the prefill.
    session.store().toggle_methodology("gamification");
    assert_eq!(
        session.next().unwrap(),
        NextOutcome::Advanced(WizardStep::Strategy)
    );
    assert_eq!(
        session.next().unwrap(),
        NextOutcome::Advanced(WizardStep::Configuration)
    );

    // Configuration scenario: zero students blocks, 30 passes.
    session
        .update_state(WizardPatch::default().with_students_per_class(0))
        .unwrap();
    match session.next().unwrap() {
        NextOutcome::Blocked(validation) => {
            assert!(!validation.is_valid);
            assert!(
                validation
                    .errors
                    .iter()
                    .any(|e| e.contains("must be greater than zero"))
            );
        }
        other => panic!("expected Blocked, got {other:?}"),
    }
    assert_eq!(session.state().current_step, WizardStep::Configuration);

    session
        .update_state(
            WizardPatch::default()
                .with_students_per_class(30)
                .with_number_of_lessons(2)
                .with_duration_per_lesson(45),
        )
        .unwrap();
    assert_eq!(session.next().unwrap(), NextOutcome::Advanced(WizardStep::Review));
    assert_eq!(session.next().unwrap(), NextOutcome::AtTerminal);

    // The debounced autosave has written the draft by now.
    tokio::time::sleep(Duration::from_secs(1)).await;
    let raw = storage
        .get("wizard_draft_lesson_plan")
        .await
        .unwrap()
        .expect("draft should be saved");
    let draft: PersistedDraft = serde_json::from_str(&raw).unwrap();
    assert_eq!(draft.state.current_step, WizardStep::Review);
    assert_eq!(draft.content_type, "lesson_plan");

    // First attempt hits the quota; state is kept.
    let client = ScriptedClient::new(vec![
        json!({"error": "Monthly limit reached", "limit_type": "lesson_plans", "limit": 5, "tier": "free"}),
        json!({"content": "# Fractions\n\n## Lesson 1"}),
    ]);
    let orchestrator = GenerationOrchestrator::new(client.clone(), TokenSession);

    let first = session.submit(&orchestrator).await.unwrap();
    assert!(matches!(
        first.failure(),
        Some(GenerationFailure::QuotaExceeded { limit: Some(5), .. })
    ));
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert!(!storage.is_empty());

    // Second attempt succeeds.
    let second = session.submit(&orchestrator).await.unwrap();
    assert!(second.is_success());
    assert_eq!(session.phase(), SessionPhase::Submitted);
    assert!(storage.is_empty());

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    let (endpoint, request) = &requests[1];
    assert_eq!(endpoint, "generate-lesson-plan");
    assert_eq!(request.topic, "Fractions");
    assert_eq!(request.methodology, "Gamification");
    assert_eq!(request.duration_minutes, 90);
    assert_eq!(request.class_id.as_deref(), Some("class-5a"));
    assert_eq!(
        request.class_context.as_ref().map(|c| c.total_students),
        Some(28)
    );

    session.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_rapid_updates_write_once_with_last_state() {
    let storage = MemoryDraftStorage::new();
    let drafts = Arc::new(DraftPersistenceManager::new(storage.clone()));
    let session =
        WizardSession::open(drafts, ContentType::Assessment, &WizardPatch::default()).await;

    for n in 1..=20 {
        session
            .update_state(WizardPatch::default().with_topic(format!("Topic {n}")))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(storage.is_empty());

    tokio::time::sleep(Duration::from_secs(1)).await;
    let raw = storage
        .get("wizard_draft_assessment")
        .await
        .unwrap()
        .expect("draft should be saved");
    let draft: PersistedDraft = serde_json::from_str(&raw).unwrap();
    assert_eq!(draft.state.topic, "Topic 20");

    session.close().await;
}

#[tokio::test]
async fn test_resume_after_restart() {
    let storage = MemoryDraftStorage::new();

    let first = WizardSession::open(
        Arc::new(DraftPersistenceManager::new(storage.clone())),
        ContentType::Activity,
        &WizardPatch::default(),
    )
    .await;
    first
        .update_state(
            WizardPatch::default()
                .with_grade("7th grade")
                .with_subject("Science")
                .with_topic("Ecosystems"),
        )
        .unwrap();
    first.go_to_step(3).unwrap();
    first.flush().await.unwrap();
    first.close().await;

    let drafts = Arc::new(DraftPersistenceManager::new(storage.clone()));
    let listed = drafts.list_drafts().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content_type, ContentType::Activity);
    assert_eq!(listed[0].current_step, WizardStep::Strategy);

    let resumed = WizardSession::open(drafts, ContentType::Activity, &WizardPatch::default()).await;
    assert_eq!(resumed.state().topic, "Ecosystems");
    assert_eq!(resumed.state().current_step, WizardStep::Strategy);
    assert!(resumed.restored_from().is_some());
    resumed.close().await;
}
