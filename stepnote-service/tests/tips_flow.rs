//! Tip authoring flows against the in-memory store.

use std::sync::Arc;
use stepnote_core::render::PassthroughRenderer;
use stepnote_core::{SafetyPolicy, StepnoteError, TipStatus};
use stepnote_service::{AgentDirectory, TipInput, TipService};
use stepnote_store::{MockNoteStore, TipStore};

const AGENT: Option<&str> = Some("agente@example.cl");

fn service() -> (Arc<MockNoteStore>, TipService) {
    let mock = Arc::new(MockNoteStore::new());
    let tips = TipStore::new(mock.clone(), Arc::new(PassthroughRenderer), 100);
    let safety = SafetyPolicy::new("example.cl");
    let agents = AgentDirectory::new(vec!["agente@example.cl".to_string()]);
    (mock, TipService::new(tips, safety, agents))
}

fn input(title: &str, status: TipStatus) -> TipInput {
    TipInput {
        title: title.to_string(),
        body_md: "Llegar **en ayunas** de 8 horas.".to_string(),
        tags: vec!["preparacion".to_string()],
        status,
    }
}

#[tokio::test]
async fn published_tips_are_public_drafts_are_not() {
    let (_, service) = service();

    service
        .save(None, input("Preparación", TipStatus::Published), AGENT)
        .await
        .unwrap();
    service
        .save(None, input("Borrador interno", TipStatus::Draft), AGENT)
        .await
        .unwrap();

    let public = service.list_public().await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].title, "Preparación");

    let all = service.list_all(AGENT).await.unwrap();
    assert_eq!(all.len(), 2);

    assert!(service.list_all(Some("otro@gmail.com")).await.is_err());
}

#[tokio::test]
async fn save_with_id_rewrites_in_place() {
    let (mock, service) = service();

    let created = service
        .save(None, input("Preparación", TipStatus::Published), AGENT)
        .await
        .unwrap();

    let mut revised = input("Preparación v2", TipStatus::Published);
    revised.body_md = "Actualizado.".to_string();
    let updated = service
        .save(Some(&created.id), revised, AGENT)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Preparación v2");
    assert_eq!(mock.len(), 1);

    let fetched = service.get(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.body_md, "Actualizado.");
}

#[tokio::test]
async fn body_html_comes_from_the_renderer() {
    let (_, service) = service();
    let saved = service
        .save(None, input("Preparación", TipStatus::Published), AGENT)
        .await
        .unwrap();
    assert_eq!(saved.body_html, saved.body_md);
    assert!(saved.updated_by.as_deref() == Some("agente@example.cl"));
}

#[tokio::test]
async fn unsafe_tip_body_never_reaches_the_store() {
    let (mock, service) = service();

    let mut bad = input("Preparación", TipStatus::Published);
    bad.body_md = "Revisar el historial clínico del paciente.".to_string();
    let err = service.save(None, bad, AGENT).await.unwrap_err();
    assert!(matches!(err, StepnoteError::Safety(_)));
    assert!(mock.is_empty());
}

#[tokio::test]
async fn writes_require_an_authorized_agent() {
    let (mock, service) = service();
    assert!(service
        .save(None, input("Preparación", TipStatus::Published), None)
        .await
        .is_err());
    assert!(service
        .save(
            None,
            input("Preparación", TipStatus::Published),
            Some("otro@example.cl"),
        )
        .await
        .is_err());
    assert!(mock.is_empty());
}

#[tokio::test]
async fn get_missing_tip_is_none() {
    let (_, service) = service();
    assert!(service.get("no-such-id").await.unwrap().is_none());
}
