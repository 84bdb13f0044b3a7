//! ルーター・コントローラー・ストアを組み合わせた画面遷移のテスト

use super::{Route, Router};
use crate::features::new_bill::{
    FileSelection, NewBillForm, SelectedFile, SessionPhase, INVALID_EXTENSION_MESSAGE,
};
use crate::shared::config::environment::StoreConfig;
use crate::shared::context::AppContext;
use crate::shared::errors::AppError;
use crate::shared::identity::{CachedUser, IdentityCache, UserType};
use crate::shared::store::memory::{fixture_bills, InMemoryStore, StoreOperation};
use crate::shared::store::Store;
use std::sync::Arc;
use std::time::Duration;

fn employee() -> IdentityCache {
    IdentityCache::with_user(&CachedUser::employee("a@a")).unwrap()
}

fn router_with(store: Option<InMemoryStore>, identity: IdentityCache) -> Arc<Router> {
    let store = store.map(|s| Arc::new(s) as Arc<dyn Store>);
    Router::new(AppContext::new(store, identity))
}

fn form() -> NewBillForm {
    NewBillForm {
        expense_type: "Transports".to_string(),
        name: "Vol Paris Londres".to_string(),
        amount: "348".to_string(),
        date: "2022-04-08".to_string(),
        vat: "70".to_string(),
        pct: "20".to_string(),
        commentary: "séminaire".to_string(),
    }
}

#[tokio::test]
async fn test_bills_page_for_employee() {
    let router = router_with(Some(InMemoryStore::with_fixtures()), employee());

    router.navigate(Route::Bills).await;

    let html = router.current_html();
    assert_eq!(router.current_route(), Some(Route::Bills));
    assert!(html.contains("Mes notes de frais"));
    assert!(html.contains("data-testid=\"icon-window\" class=\"active-icon\""));
    assert!(html.contains("4 Avr. 04"));
    assert!(html.contains("En attente"));
}

#[tokio::test]
async fn test_bills_are_ordered_latest_first() {
    let router = router_with(Some(InMemoryStore::with_fixtures()), employee());

    router.navigate(Route::Bills).await;

    let html = router.current_html();
    let positions: Vec<usize> = ["4 Avr. 04", "3 Mar. 03", "2 Fév. 02", "1 Jan. 01"]
        .iter()
        .map(|date| html.find(date).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_list_failure_renders_404() {
    let store = InMemoryStore::with_fixtures();
    store.fail_next(StoreOperation::List, AppError::from_store_message("Erreur 404"));
    let router = router_with(Some(store), employee());

    router.navigate(Route::Bills).await;

    assert!(router.current_html().contains(">Erreur 404<"));
}

#[tokio::test]
async fn test_list_failure_renders_500() {
    let store = InMemoryStore::with_fixtures();
    store.fail_next(StoreOperation::List, AppError::from_store_message("Erreur 500"));
    let router = router_with(Some(store), employee());

    router.navigate(Route::Bills).await;

    assert!(router.current_html().contains(">Erreur 500<"));
}

#[tokio::test]
async fn test_bills_without_store_renders_empty_table() {
    let router = router_with(None, employee());

    router.navigate(Route::Bills).await;

    let html = router.current_html();
    assert!(html.contains("Mes notes de frais"));
    assert!(html.contains("<tbody data-testid=\"tbody\"></tbody>"));
}

#[tokio::test]
async fn test_employee_routes_redirect_to_login() {
    let router = router_with(Some(InMemoryStore::with_fixtures()), IdentityCache::new());

    router.navigate(Route::Bills).await;
    assert_eq!(router.current_route(), Some(Route::Login));

    let admin = IdentityCache::with_user(&CachedUser {
        user_type: UserType::Admin,
        email: Some("admin@test.tld".to_string()),
    })
    .unwrap();
    let router = router_with(Some(InMemoryStore::with_fixtures()), admin);

    router.navigate_to_path("#employee/bill/new").await;
    assert_eq!(router.current_route(), Some(Route::Login));
    assert!(router.new_bill_session().is_none());
}

#[tokio::test]
async fn test_click_new_bill_opens_form() {
    let router = router_with(Some(InMemoryStore::with_fixtures()), employee());
    router.navigate(Route::Bills).await;

    router.bills_controller().handle_click_new_bill().await;

    let html = router.current_html();
    assert_eq!(router.current_route(), Some(Route::NewBill));
    assert!(html.contains("data-testid=\"form-new-bill\""));
    assert!(html.contains("data-testid=\"icon-mail\" class=\"active-icon\""));
    assert!(router.new_bill_session().is_some());
}

#[tokio::test]
async fn test_invalid_file_alerts_through_region() {
    let router = router_with(Some(InMemoryStore::new()), employee());
    router.navigate(Route::NewBill).await;
    let session = router.new_bill_session().unwrap();

    let selection = session
        .on_file_selected(SelectedFile::new("test.txt", None, b"x".to_vec()))
        .await
        .unwrap();

    assert_eq!(selection, FileSelection::Rejected);
    assert_eq!(router.alerts(), vec![INVALID_EXTENSION_MESSAGE.to_string()]);
    assert_eq!(router.region().file_input_clears(), 1);
}

#[tokio::test]
async fn test_new_bill_flow_returns_to_bills() {
    let store = InMemoryStore::with_fixtures();
    let router = router_with(Some(store.clone()), employee());
    router.navigate_to_path("#employee/bill/new").await;
    let session = router.new_bill_session().unwrap();

    session
        .on_file_selected(SelectedFile::new("test.jpg", Some("image/jpeg"), vec![1, 2, 3]))
        .await
        .unwrap();
    session.on_submit(form()).await.unwrap();

    assert_eq!(session.phase(), SessionPhase::NavigatedAway);
    assert_eq!(router.current_route(), Some(Route::Bills));
    assert!(router.new_bill_session().is_none());

    let html = router.current_html();
    assert!(html.contains("Vol Paris Londres"));
    assert!(html.contains("8 Avr. 22"));
    assert_eq!(store.bills_snapshot().len(), 5);
    assert_eq!(store.calls(StoreOperation::Update), 1);
}

#[tokio::test]
async fn test_navigation_abandons_new_bill_session() {
    let router = router_with(Some(InMemoryStore::new()), employee());
    router.navigate(Route::NewBill).await;
    let session = router.new_bill_session().unwrap();

    router.navigate(Route::Bills).await;

    assert_eq!(session.phase(), SessionPhase::Abandoned);
    assert!(matches!(
        session.on_submit(form()).await,
        Err(AppError::Concurrency(_))
    ));
}

#[tokio::test]
async fn test_unknown_path_falls_back_to_login() {
    let router = router_with(None, employee());

    router.navigate_to_path("#nowhere").await;

    assert_eq!(router.current_route(), Some(Route::Login));
    assert!(router.current_html().contains("data-route=\"/\""));
}

#[tokio::test]
async fn test_late_bills_render_does_not_replace_new_page() {
    let store = InMemoryStore::with_config(
        fixture_bills(),
        StoreConfig {
            latency: Duration::from_millis(20),
        },
    );
    let router = router_with(Some(store.clone()), employee());

    futures::join!(router.navigate(Route::Bills), async {
        tokio::task::yield_now().await;
        router.navigate(Route::NewBill).await;
    });

    let html = router.current_html();
    assert_eq!(store.calls(StoreOperation::List), 1);
    assert_eq!(router.current_route(), Some(Route::NewBill));
    assert!(html.contains("data-testid=\"form-new-bill\""));
    assert!(!html.contains("Mes notes de frais"));
    assert!(router.new_bill_session().is_some());
}
