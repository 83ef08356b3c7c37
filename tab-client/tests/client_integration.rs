// tab-client/tests/client_integration.rs
// Integration tests against an in-process stub backend

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use shared::models::TableRef;
use shared::{AccessState, ErrorCode, SessionAction};
use tab_client::{
    CheckoutError, CheckoutService, ClientConfig, LoadError, NetworkHttpClient, PaymentIntent,
    PaymentMode, TableApi, TableLoader, TableRead, TableSession,
};

const TABLE: &str = "/restaurants/r1/branches/b1/tables/7";

#[derive(Default)]
struct Stub {
    deny_access: bool,
    fail_active_users: bool,
    split_opened_elsewhere: bool,
    split_active: Mutex<bool>,
    writes: AtomicUsize,
    split_bodies: Mutex<Vec<Value>>,
    pay_bodies: Mutex<Vec<Value>>,
}

type Shared = Arc<Stub>;

fn ok(data: Value) -> Json<Value> {
    Json(json!({"code": 0, "message": "OK", "data": data}))
}

async fn access(State(stub): State<Shared>) -> (StatusCode, Json<Value>) {
    if stub.deny_access {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"code": 1101, "message": "This QR code is not valid for this table"})),
        );
    }
    (StatusCode::OK, ok(json!({"valid": true, "guestName": "Ana"})))
}

async fn orders() -> Json<Value> {
    ok(json!({
        "dishOrders": [
            {
                "id": "d1", "guestName": "Ana", "userId": "u1",
                "paymentStatus": "not_paid", "totalPrice": 10.0
            },
            {"id": "d2", "guestName": "Ben", "paymentStatus": "paid", "totalPrice": 15.0},
            {"id": "d3", "guestName": "Cleo", "paymentStatus": "not_paid", "totalPrice": 5.0}
        ]
    }))
}

async fn active_users(State(stub): State<Shared>) -> (StatusCode, Json<Value>) {
    if stub.fail_active_users {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!("boom")));
    }
    (
        StatusCode::OK,
        ok(json!([
            {"guestName": "Ana", "totalPaidIndividual": 0, "totalPaidAmount": 0},
            {"guestName": "Cleo", "totalPaidIndividual": 0, "totalPaidAmount": 0}
        ])),
    )
}

async fn split_status(State(stub): State<Shared>) -> Json<Value> {
    let active = *stub.split_active.lock().unwrap();
    if active {
        ok(json!({
            "isActive": true,
            "numberOfPeople": 2,
            "splitPayments": [
                {"guestName": "Ana", "status": "pending"},
                {"guestName": "Cleo", "status": "pending"}
            ]
        }))
    } else {
        ok(json!({"isActive": false}))
    }
}

async fn split_bill(
    State(stub): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.writes.fetch_add(1, Ordering::SeqCst);
    stub.split_bodies.lock().unwrap().push(body);
    *stub.split_active.lock().unwrap() = true;
    if stub.split_opened_elsewhere {
        return (
            StatusCode::CONFLICT,
            Json(json!({"code": 6003, "message": "Split bill is already active"})),
        );
    }
    (
        StatusCode::OK,
        ok(json!({"isActive": true, "numberOfPeople": 2, "splitPayments": []})),
    )
}

async fn pay(State(stub): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    stub.writes.fetch_add(1, Ordering::SeqCst);
    let amount = body["amount"].as_f64().unwrap_or_default();
    stub.pay_bodies.lock().unwrap().push(body);
    if amount > 12.0 {
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({"code": 5001, "message": "Card declined"})),
        );
    }
    (
        StatusCode::OK,
        ok(json!({"transactionId": "tx-1", "status": "succeeded", "amount": amount})),
    )
}

async fn counted_write(State(stub): State<Shared>) -> Json<Value> {
    stub.writes.fetch_add(1, Ordering::SeqCst);
    ok(json!({"transactionId": "tx-2", "status": "succeeded"}))
}

async fn spawn_backend(stub: Stub) -> (String, Shared) {
    let stub = Arc::new(stub);
    let app = Router::new()
        .route(&format!("{TABLE}/access"), get(access))
        .route(&format!("{TABLE}/orders"), get(orders))
        .route(&format!("{TABLE}/active-users"), get(active_users))
        .route(&format!("{TABLE}/split-status"), get(split_status))
        .route(&format!("{TABLE}/split-bill"), post(split_bill))
        .route(&format!("{TABLE}/pay"), post(pay))
        .route(&format!("{TABLE}/pay-split"), post(counted_write))
        .route(&format!("{TABLE}/dishes/pay"), post(counted_write))
        .route(&format!("{TABLE}/transactions"), post(counted_write))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), stub)
}

fn config(base_url: &str) -> ClientConfig {
    ClientConfig::new(base_url)
        .with_token("test-token")
        .with_timeout(5)
        .with_tip_url("https://tab.example.com/tip-selection")
}

fn session(user_id: Option<&str>) -> TableSession {
    let mut session = TableSession::new();
    session.apply(SessionAction::TableResolved(TableRef::new("r1", "b1", "7")));
    session.apply(SessionAction::GuestIdentified {
        guest_name: "Ana".into(),
        user_id: user_id.map(str::to_string),
    });
    session
}

fn services(
    base_url: &str,
) -> (TableLoader<NetworkHttpClient>, CheckoutService<NetworkHttpClient>) {
    let config = config(base_url);
    let api = TableApi::new(config.build_http_client().unwrap());
    let checkout = CheckoutService::new(api.clone(), &config).unwrap();
    (TableLoader::new(api), checkout)
}

#[tokio::test]
async fn test_load_computes_allocation() {
    let (base, _stub) = spawn_backend(Stub::default()).await;
    let (loader, _) = services(&base);
    let mut session = session(Some("u1"));

    let report = loader.load(&mut session).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(session.access(), &AccessState::Ok);

    let alloc = session.allocation().unwrap();
    assert_eq!(alloc.table_total_price.value, 30.0);
    assert_eq!(alloc.paid_amount.value, 15.0);
    assert_eq!(alloc.unpaid_amount.value, 15.0);
    assert_eq!(alloc.pending_guests, vec!["Ana", "Cleo"]);
    assert_eq!(alloc.split_eligible_guests, vec!["Ana", "Cleo"]);
    assert_eq!(alloc.per_person_share, 7.5);
    assert_eq!(alloc.current_guest_unpaid_amount, 10.0);
}

#[tokio::test]
async fn test_failed_read_degrades_to_empty() {
    let (base, _stub) = spawn_backend(Stub {
        fail_active_users: true,
        ..Stub::default()
    })
    .await;
    let (loader, _) = services(&base);
    let mut session = session(None);

    let report = loader.load(&mut session).await.unwrap();
    assert_eq!(report.degraded.len(), 1);
    assert_eq!(report.degraded[0].read, TableRead::ActiveUsers);

    // falls back to unpaid dishes
    let alloc = session.allocation().unwrap();
    assert_eq!(alloc.pending_guests, vec!["Ana", "Cleo"]);
    assert_eq!(alloc.unpaid_amount.value, 15.0);
}

#[tokio::test]
async fn test_access_denied_is_terminal() {
    let (base, stub) = spawn_backend(Stub {
        deny_access: true,
        ..Stub::default()
    })
    .await;
    let (loader, checkout) = services(&base);
    let mut session = session(Some("u1"));

    let err = loader.load(&mut session).await.unwrap_err();
    match err {
        LoadError::Access(app) => {
            assert_eq!(app.code, ErrorCode::TableAccessDenied);
            assert_eq!(app.message, "This QR code is not valid for this table");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(session.access().is_error());
    assert!(session.data().orders.is_empty());

    assert!(matches!(
        loader.reload(&mut session).await,
        Err(LoadError::Access(_))
    ));
    assert!(matches!(
        checkout.begin(&mut session, &PaymentIntent::FullBill).await,
        Err(CheckoutError::NotReady)
    ));
    assert_eq!(stub.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stale_snapshot_is_not_applied() {
    let (base, _stub) = spawn_backend(Stub::default()).await;
    let (loader, _) = services(&base);
    let mut session = session(None);

    let table = session.table().cloned().unwrap();
    let old = loader.fetch(&table, session.generation()).await;
    session.apply(SessionAction::Reload);

    assert!(matches!(
        old.apply_to(&mut session),
        Err(LoadError::Superseded(_))
    ));
    assert!(session.data().orders.is_empty());

    loader.load(&mut session).await.unwrap();
    assert_eq!(session.data().orders.len(), 3);
}

#[tokio::test]
async fn test_refused_actions_make_no_request() {
    let (base, stub) = spawn_backend(Stub::default()).await;
    let (loader, checkout) = services(&base);
    let mut session = session(Some("u1"));
    loader.load(&mut session).await.unwrap();

    let refused = [
        PaymentIntent::SelectItems {
            dish_order_ids: vec![],
        },
        PaymentIntent::SelectItems {
            dish_order_ids: vec!["d2".into()],
        },
        PaymentIntent::ChooseAmount { amount: 0.0 },
        PaymentIntent::ChooseAmount { amount: 99.0 },
    ];
    for intent in &refused {
        match checkout.begin(&mut session, intent).await {
            Err(CheckoutError::Refused(v)) => assert_eq!(v.mode, intent.mode()),
            other => panic!("expected refusal, got {:?}", other),
        }
        assert!(session.alert().is_some());
    }
    assert_eq!(stub.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refused_payments_raise_alert() {
    let (base, stub) = spawn_backend(Stub::default()).await;
    let (loader, checkout) = services(&base);
    let mut session = session(Some("u1"));
    loader.load(&mut session).await.unwrap();
    assert!(session.alert().is_none());

    match checkout.pay_amount(&mut session, -1.0, "pm_1").await {
        Err(CheckoutError::Refused(v)) => assert_eq!(v.code, ErrorCode::PaymentAmountInvalid),
        other => panic!("expected refusal, got {:?}", other),
    }
    assert_eq!(
        session.alert(),
        Some("Please enter an amount greater than zero")
    );

    session.apply(SessionAction::DismissAlert);
    assert!(matches!(
        checkout.pay_dishes(&mut session, &[], "pm_1").await,
        Err(CheckoutError::Refused(_))
    ));
    assert!(session.alert().is_some());

    session.apply(SessionAction::DismissAlert);
    match checkout.pay_split(&mut session, "pm_1").await {
        Err(CheckoutError::Refused(v)) => assert_eq!(v.code, ErrorCode::SplitNotActive),
        other => panic!("expected refusal, got {:?}", other),
    }
    assert_eq!(session.alert(), Some("Split bill is not active"));
    assert!(!session.is_submitting());
    assert_eq!(stub.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pay_split_right_after_opening_split() {
    let (base, stub) = spawn_backend(Stub::default()).await;
    let (loader, checkout) = services(&base);
    let mut session = session(Some("u1"));
    loader.load(&mut session).await.unwrap();

    checkout
        .begin(&mut session, &PaymentIntent::EqualShares)
        .await
        .unwrap();
    assert!(session.data().split.as_ref().is_some_and(|s| s.is_active));

    checkout.pay_split(&mut session, "pm_1").await.unwrap();
    assert_eq!(stub.writes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_split_opened_by_another_guest() {
    let (base, stub) = spawn_backend(Stub {
        split_opened_elsewhere: true,
        ..Stub::default()
    })
    .await;
    let (loader, checkout) = services(&base);
    let mut session = session(Some("u1"));
    loader.load(&mut session).await.unwrap();

    let started = checkout
        .begin(&mut session, &PaymentIntent::EqualShares)
        .await
        .unwrap();
    assert_eq!(started.handoff.amount, 7.5);
    assert!(session.alert().is_none());

    let split = session.data().split.clone().unwrap();
    assert_eq!(split.records.len(), 2);

    checkout.pay_split(&mut session, "pm_1").await.unwrap();
    assert_eq!(stub.writes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_equal_shares_opens_split_then_hands_off() {
    let (base, stub) = spawn_backend(Stub::default()).await;
    let (loader, checkout) = services(&base);
    let mut session = session(Some("u1"));
    loader.load(&mut session).await.unwrap();

    let started = checkout
        .begin(&mut session, &PaymentIntent::EqualShares)
        .await
        .unwrap();
    assert_eq!(started.handoff.mode, PaymentMode::EqualShares);
    assert_eq!(started.handoff.amount, 7.5);
    assert_eq!(
        started.url.as_str(),
        "https://tab.example.com/tip-selection?amount=7.50&type=equal-shares&userName=Ana"
    );
    assert!(!session.is_submitting());

    let bodies = stub.split_bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![json!({"numberOfPeople": 2, "guestNames": ["Ana", "Cleo"]})]
    );

    // split now active: reload, then a second hand-off does not reopen it
    loader.reload(&mut session).await.unwrap();
    checkout
        .begin(&mut session, &PaymentIntent::EqualShares)
        .await
        .unwrap();
    assert_eq!(stub.split_bodies.lock().unwrap().len(), 1);

    checkout.pay_split(&mut session, "pm_1").await.unwrap();
    assert_eq!(stub.writes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_user_items_handoff() {
    let (base, stub) = spawn_backend(Stub::default()).await;
    let (loader, checkout) = services(&base);
    let mut session = session(Some("u1"));
    loader.load(&mut session).await.unwrap();

    let started = checkout
        .begin(&mut session, &PaymentIntent::UserItems)
        .await
        .unwrap();
    assert_eq!(started.handoff.amount, 10.0);
    assert_eq!(started.handoff.dish_order_ids, vec!["d1"]);

    checkout
        .record_transaction(&mut session, &started.handoff, 1.5, "pm_1")
        .await
        .unwrap();
    assert_eq!(stub.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_payment_failure_resets_submitting() {
    let (base, stub) = spawn_backend(Stub::default()).await;
    let (loader, checkout) = services(&base);
    let mut session = session(Some("u1"));
    loader.load(&mut session).await.unwrap();

    let err = checkout
        .pay_amount(&mut session, 14.0, "pm_1")
        .await
        .unwrap_err();
    match err {
        CheckoutError::Client(e) => assert_eq!(e.code(), ErrorCode::PaymentFailed),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!session.is_submitting());
    assert_eq!(session.alert(), Some("Card declined"));

    let receipt = checkout.pay_amount(&mut session, 5.0, "pm_1").await.unwrap();
    assert_eq!(receipt.transaction_id.as_deref(), Some("tx-1"));
    assert!(session.alert().is_none());

    let bodies = stub.pay_bodies.lock().unwrap().clone();
    assert_eq!(
        bodies[1],
        json!({"amount": 5.0, "userId": "u1", "guestName": "Ana", "paymentMethodId": "pm_1"})
    );
}

#[tokio::test]
async fn test_writes_need_user_id() {
    let (base, stub) = spawn_backend(Stub::default()).await;
    let (loader, checkout) = services(&base);
    let mut session = session(None);
    loader.load(&mut session).await.unwrap();

    assert!(matches!(
        checkout
            .pay_dishes(&mut session, &["d1".to_string()], "pm_1")
            .await,
        Err(CheckoutError::MissingIdentity(_))
    ));
    assert_eq!(stub.writes.load(Ordering::SeqCst), 0);
}
