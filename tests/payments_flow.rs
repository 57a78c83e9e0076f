mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{acquire_db_lock, body_to_json, TestApp};
use diesel::dsl::count_star;
use diesel::prelude::*;
use internhub::models::{Intern, PaymentRecord};
use internhub::schema::{interns, payment_records};
use serde_json::json;
use uuid::Uuid;

async fn load_intern(app: &TestApp, intern_id: Uuid) -> Result<Intern> {
    app.with_conn(move |conn| Ok(interns::table.find(intern_id).first(conn)?))
        .await
}

async fn payment_count(app: &TestApp) -> Result<i64> {
    app.with_conn(|conn| {
        Ok(payment_records::table
            .select(count_star())
            .first::<i64>(conn)?)
    })
    .await
}

#[tokio::test]
async fn order_amounts_follow_the_plan_prices() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    app.insert_intern("asha@example.com", "pw", "NONE", None, 5)
        .await?;
    let token = app.login_intern("asha@example.com", "pw").await?;

    let response = app
        .post_json(
            "/api/payments/create-order",
            &json!({ "plan_type": "BASIC" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await?;
    assert_eq!(body["amount"], json!(19_900));
    assert_eq!(body["currency"], json!("INR"));
    assert_eq!(body["key"], json!("rzp_test_key"));

    let response = app
        .post_json(
            "/api/payments/create-order",
            &json!({ "plan_type": "PREMIUM" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await?;
    assert_eq!(body["amount"], json!(49_900));

    let response = app
        .post_json(
            "/api/payments/create-order",
            &json!({ "plan_type": "PLATINUM" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn verified_payment_activates_the_plan() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let intern_id = app
        .insert_intern("asha@example.com", "pw", "NONE", None, 0)
        .await?;
    let token = app.login_intern("asha@example.com", "pw").await?;

    let signature = app.sign_payment("order_abc", "pay_001");
    let response = app
        .post_json(
            "/api/payments/verify",
            &json!({
                "order_id": "order_abc",
                "payment_id": "pay_001",
                "signature": signature,
                "plan_type": "PREMIUM"
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await?;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["plan_type"], json!("PREMIUM"));

    let intern = load_intern(&app, intern_id).await?;
    assert!(intern.is_paid);
    assert_eq!(intern.plan_type, "PREMIUM");
    let expiry = intern.plan_expiry.expect("plan expiry set");
    let expected = (chrono::Utc::now() + chrono::Duration::days(30)).naive_utc();
    let drift = (expiry - expected).num_seconds().abs();
    assert!(drift < 300, "expiry drifted by {drift}s");

    let record: PaymentRecord = app
        .with_conn(move |conn| {
            Ok(payment_records::table
                .filter(payment_records::intern_id.eq(intern_id))
                .first(conn)?)
        })
        .await?;
    assert_eq!(record.payment_ref, "pay_001");
    assert_eq!(record.amount_paise, 49_900);
    assert_eq!(record.status, "success");

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn tampered_signature_leaves_the_ledger_untouched() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let intern_id = app
        .insert_intern("asha@example.com", "pw", "NONE", None, 0)
        .await?;
    let token = app.login_intern("asha@example.com", "pw").await?;

    let mut signature = app.sign_payment("order_abc", "pay_002");
    let flipped = if signature.ends_with('0') { '1' } else { '0' };
    signature.pop();
    signature.push(flipped);

    let response = app
        .post_json(
            "/api/payments/verify",
            &json!({
                "order_id": "order_abc",
                "payment_id": "pay_002",
                "signature": signature,
                "plan_type": "BASIC"
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let intern = load_intern(&app, intern_id).await?;
    assert!(!intern.is_paid);
    assert_eq!(intern.plan_type, "NONE");
    assert_eq!(payment_count(&app).await?, 0);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn replayed_payment_reference_is_rejected() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    app.insert_intern("asha@example.com", "pw", "NONE", None, 0)
        .await?;
    let token = app.login_intern("asha@example.com", "pw").await?;

    let signature = app.sign_payment("order_abc", "pay_003");
    let payload = json!({
        "order_id": "order_abc",
        "payment_id": "pay_003",
        "signature": signature,
        "plan_type": "BASIC"
    });

    let first = app
        .post_json("/api/payments/verify", &payload, Some(&token))
        .await?;
    assert_eq!(first.status(), StatusCode::OK);

    let replay = app
        .post_json("/api/payments/verify", &payload, Some(&token))
        .await?;
    assert_eq!(replay.status(), StatusCode::CONFLICT);
    assert_eq!(payment_count(&app).await?, 1);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn staff_accounts_cannot_buy_plans() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    app.insert_staff("lead@example.com", "pw", "hiring").await?;
    let token = app.login_staff("lead@example.com", "pw").await?;

    let response = app
        .post_json(
            "/api/payments/create-order",
            &json!({ "plan_type": "BASIC" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    app.cleanup().await?;
    Ok(())
}
