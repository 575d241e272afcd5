//! End-to-end checklist flows against the in-memory store.

use chrono::{Duration, Utc};
use std::sync::Arc;
use stepnote_core::{SafetyPolicy, StepPatch, StepStatus, StepnoteError, SyncError};
use stepnote_service::{AgentDirectory, ChecklistService, NewStep};
use stepnote_store::{MockNoteStore, StepStore};

const AGENT: Option<&str> = Some("agente@example.cl");
const KEY: &str = "onboarding-v1";

fn service() -> (Arc<MockNoteStore>, ChecklistService) {
    let mock = Arc::new(MockNoteStore::new());
    let steps = StepStore::new(mock.clone(), 100);
    let safety = SafetyPolicy::new("example.cl");
    let agents = AgentDirectory::new(vec!["agente@example.cl".to_string()]);
    (mock, ChecklistService::new(steps, safety, agents))
}

fn new_step(title: &str, order: i64) -> NewStep {
    NewStep {
        title: title.to_string(),
        order: Some(order),
        ..NewStep::default()
    }
}

#[tokio::test]
async fn create_toggle_list_scenario() {
    let (_, service) = service();

    let created = service
        .create(KEY, None, new_step("Firmar consentimiento", 1), AGENT)
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.status, StepStatus::Pending);
    assert_eq!(created.order, 1);
    assert!(Utc::now() - created.updated_at < Duration::seconds(5));

    let toggled = service.toggle(KEY, &created.id, None, AGENT).await.unwrap();
    assert_eq!(toggled.status, StepStatus::Done);
    assert_eq!(toggled.title, "Firmar consentimiento");
    assert_eq!(toggled.order, 1);
    assert!(toggled.updated_at >= created.updated_at);

    let listed = service.list(KEY, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, StepStatus::Done);
}

#[tokio::test]
async fn stale_update_is_rejected_and_nothing_changes() {
    let (_, service) = service();
    let created = service
        .create(KEY, None, new_step("Agendar visita", 1), AGENT)
        .await
        .unwrap();

    let stale = created.updated_at - Duration::hours(1);
    let err = service
        .update(
            KEY,
            &created.id,
            None,
            StepPatch {
                title: Some("Sobrescrito".to_string()),
                ..StepPatch::default()
            },
            Some(stale),
            AGENT,
        )
        .await
        .unwrap_err();
    match err {
        StepnoteError::Sync(SyncError::VersionConflict {
            client_seen,
            server_current,
        }) => {
            assert_eq!(client_seen, stale);
            assert_eq!(server_current, created.updated_at);
        }
        other => panic!("expected a version conflict, got {other:?}"),
    }

    let listed = service.list(KEY, None).await.unwrap();
    assert_eq!(listed[0].title, "Agendar visita");
}

#[tokio::test]
async fn update_with_fresh_or_absent_timestamp_succeeds() {
    let (_, service) = service();
    let created = service
        .create(KEY, None, new_step("Agendar visita", 1), AGENT)
        .await
        .unwrap();

    let first = service
        .update(
            KEY,
            &created.id,
            None,
            StepPatch {
                desc: Some("traer carnet".to_string()),
                ..StepPatch::default()
            },
            Some(created.updated_at),
            AGENT,
        )
        .await
        .unwrap();
    assert_eq!(first.desc.as_deref(), Some("traer carnet"));
    assert!(first.updated_at >= created.updated_at);

    // No timestamp opts out of the check.
    let second = service
        .update(
            KEY,
            &created.id,
            None,
            StepPatch {
                order: Some(7),
                ..StepPatch::default()
            },
            None,
            AGENT,
        )
        .await
        .unwrap();
    assert_eq!(second.order, 7);
    assert_eq!(second.desc.as_deref(), Some("traer carnet"));
}

#[tokio::test]
async fn empty_string_in_patch_clears_the_field() {
    let (_, service) = service();
    let created = service
        .create(
            KEY,
            None,
            NewStep {
                desc: Some("detalle".to_string()),
                ..new_step("Paso", 1)
            },
            AGENT,
        )
        .await
        .unwrap();

    let updated = service
        .update(
            KEY,
            &created.id,
            None,
            StepPatch {
                desc: Some(String::new()),
                ..StepPatch::default()
            },
            None,
            AGENT,
        )
        .await
        .unwrap();
    assert_eq!(updated.desc, None);
}

#[tokio::test]
async fn updating_a_missing_step_is_not_found() {
    let (_, service) = service();
    let err = service
        .update(KEY, "fantasma", None, StepPatch::default(), None, AGENT)
        .await
        .unwrap_err();
    assert!(matches!(err, StepnoteError::Sync(SyncError::NotFound { .. })));
}

#[tokio::test]
async fn deleting_a_missing_step_is_a_noop() {
    let (_, service) = service();
    service.delete(KEY, "fantasma", None, AGENT).await.unwrap();
}

#[tokio::test]
async fn deal_scoped_steps_stay_in_their_deal() {
    let (_, service) = service();
    service
        .create(KEY, Some("deal-42"), new_step("Del deal", 1), AGENT)
        .await
        .unwrap();
    service
        .create(KEY, None, new_step("Global", 2), AGENT)
        .await
        .unwrap();

    let global = service.list(KEY, None).await.unwrap();
    assert_eq!(global.len(), 2);

    let scoped = service.list(KEY, Some("deal-42")).await.unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].title, "Del deal");

    let other = service.list(KEY, Some("deal-99")).await.unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn unsafe_content_never_reaches_the_store() {
    let (mock, service) = service();

    let clinical = service
        .create(
            KEY,
            None,
            NewStep {
                note: Some("adjuntar historial clínico".to_string()),
                ..new_step("Paso", 1)
            },
            AGENT,
        )
        .await;
    assert!(matches!(clinical, Err(StepnoteError::Safety(_))));

    let external_email = service
        .create(
            KEY,
            None,
            NewStep {
                desc: Some("contactar a paciente@gmail.com".to_string()),
                ..new_step("Paso", 1)
            },
            AGENT,
        )
        .await;
    assert!(matches!(external_email, Err(StepnoteError::Safety(_))));

    assert!(mock.is_empty());
}

#[tokio::test]
async fn writes_require_an_authorized_agent() {
    let (mock, service) = service();

    assert!(service
        .create(KEY, None, new_step("Paso", 1), Some("intruso@example.cl"))
        .await
        .is_err());
    assert!(service
        .create(KEY, None, new_step("Paso", 1), None)
        .await
        .is_err());
    assert!(mock.is_empty());

    // Reads stay public.
    assert!(service.list(KEY, None).await.unwrap().is_empty());
}
