use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use wastewise_core::{
    ComplaintService, NoticeLevel, PlaceReport, PlaceService, ProfileDirectory, RecordWriter, RecordingNotifier,
    SessionContext,
};
use wastewise_live::{LiveCollectionView, ViewConfig, ViewPhase};
use wastewise_model::{Complaint, ComplaintStatus, Entity, GarbagePlace, UserType};
use wastewise_store::{MemoryStore, StoreError, StoreOp};
use wastewise_test_utils::{
    create_complaint, create_profile, sample_places, seeded_identity, seeded_store, settle, valid_place_form,
    wait_for_phase,
};

struct PlaceScreen {
    store: Arc<MemoryStore>,
    view: Arc<LiveCollectionView<GarbagePlace>>,
    service: PlaceService,
    notices: Arc<RecordingNotifier>,
}

async fn place_screen() -> PlaceScreen {
    let store = seeded_store(&sample_places()).await;
    let view = Arc::new(LiveCollectionView::new(store.clone(), ViewConfig::default()));
    view.open().await.unwrap();
    wait_for_phase(&*view, ViewPhase::Ready).await;

    let notices = Arc::new(RecordingNotifier::new());
    let writer = RecordWriter::new(store.clone(), notices.clone(), "location").with_view(view.clone());
    PlaceScreen {
        store,
        view,
        service: PlaceService::new(writer),
        notices,
    }
}

#[tokio::test]
async fn test_add_place_shows_up_and_is_confirmed() {
    let screen = place_screen().await;

    let added = screen.service.add(&valid_place_form()).await.unwrap();
    assert!(screen.view.find(&added.id).is_some());

    settle().await;
    let snap = screen.view.snapshot();
    assert_eq!(snap.records.len(), 3);
    assert_eq!(screen.view.stats().snapshots_applied, 2);
    assert_eq!(
        screen.notices.last().map(|n| n.message),
        Some("Location added successfully!".to_string())
    );
}

#[tokio::test]
async fn test_failed_add_changes_nothing_and_notifies_once() {
    let screen = place_screen().await;
    let before = screen.view.snapshot();
    screen.store.fail_next(StoreOp::Create, StoreError::NetworkUnavailable);

    assert!(screen.service.add(&valid_place_form()).await.is_err());
    settle().await;

    assert_eq!(screen.view.snapshot(), before);
    assert_eq!(screen.notices.count(NoticeLevel::Error), 1);
    assert_eq!(screen.notices.notices().len(), 1);
}

#[tokio::test]
async fn test_remove_place_is_immediate() {
    let screen = place_screen().await;
    screen.service.remove(&"1".into()).await.unwrap();

    assert!(screen.view.find(&"1".into()).is_none());
    settle().await;
    assert_eq!(screen.view.snapshot().records.len(), 1);
    assert_eq!(screen.store.len(GarbagePlace::COLLECTION), 1);
}

#[tokio::test(start_paused = true)]
async fn test_search_after_edit() {
    let screen = place_screen().await;
    let mut form = valid_place_form();
    form.address = "77 Park Ave".into();
    screen.service.edit(&"1".into(), &form).await.unwrap();
    settle().await;

    screen.view.set_filter_text("park ave").unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let ids: Vec<String> = screen.view.visible().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
}

#[tokio::test]
async fn test_report_from_live_mirror() {
    let screen = place_screen().await;
    let report = PlaceReport::build(&screen.view.snapshot().records).unwrap();
    assert_eq!(report.total_bins(), 2);

    screen.service.remove(&"1".into()).await.unwrap();
    screen.service.remove(&"2".into()).await.unwrap();
    settle().await;
    assert_eq!(
        PlaceReport::build(&screen.view.snapshot().records)
            .unwrap_err()
            .to_string(),
        "Add garbage bins to generate reports"
    );
}

#[tokio::test]
async fn test_resolve_complaint_updates_admin_list() {
    let store = seeded_store(&[create_complaint("c1", "Nimal Silva"), create_complaint("c2", "Ruwan Perera")]).await;
    let view = Arc::new(LiveCollectionView::<Complaint>::new(store.clone(), ViewConfig::default()));
    view.open().await.unwrap();
    wait_for_phase(&*view, ViewPhase::Ready).await;

    let writer = RecordWriter::new(store.clone(), Arc::new(RecordingNotifier::new()), "complaint").with_view(view.clone());
    let service = ComplaintService::new(writer);

    service.set_status(&"c2".into(), ComplaintStatus::Resolved).await.unwrap();
    assert_eq!(view.find(&"c2".into()).unwrap().status, ComplaintStatus::Resolved);

    settle().await;
    let statuses: Vec<ComplaintStatus> = view.snapshot().records.iter().map(|c| c.status).collect();
    assert_eq!(statuses, vec![ComplaintStatus::Pending, ComplaintStatus::Resolved]);
}

#[tokio::test]
async fn test_admin_session_flow() {
    let store = Arc::new(MemoryStore::new());
    let admin = create_profile("admin-1", "Dilani Admin", UserType::Admin);
    let identity = Arc::new(seeded_identity(&store, &admin, "secret1").await);
    let session = SessionContext::new(identity, ProfileDirectory::new(store.clone()));

    session.sign_in(&admin.email, "secret1").await.unwrap();
    assert_eq!(session.require_admin().unwrap().uid, admin.uid);
    assert_eq!(session.display_name().as_deref(), Some("Dilani Admin"));

    session.sign_out().await.unwrap();
    assert!(session.current().is_none());
}
