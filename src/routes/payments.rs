use axum::{extract::State, Json};
use chrono::{Duration as ChronoDuration, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    models::NewPaymentRecord,
    payments,
    plans::PlanCategory,
    schema::{interns, payment_records},
    state::AppState,
};

const PLAN_CURRENCY: &str = "INR";

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub plan_type: String,
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key: String,
    pub plan_type: String,
}

pub async fn create_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<CreateOrderResponse>> {
    let intern_id = user.require_intern()?;

    let plan = PlanCategory::parse(&payload.plan_type)
        .ok_or_else(|| AppError::bad_request("invalid plan type"))?;
    let amount = plan
        .price_paise()
        .ok_or_else(|| AppError::bad_request("invalid plan type"))?;

    let receipt = format!("receipt_{}_{}", intern_id, Utc::now().timestamp_millis());
    let order = state
        .gateway
        .create_order(amount, PLAN_CURRENCY, &receipt)
        .await
        .map_err(AppError::internal)?;

    tracing::info!(
        intern_id = %intern_id,
        order_ref = %order.order_ref,
        plan = plan.as_str(),
        "created payment order"
    );

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: order.order_ref,
        amount: order.amount_paise,
        currency: order.currency,
        key: state.config.payment_key_id.clone(),
        plan_type: plan.as_str().to_string(),
    }))
}

#[derive(Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    pub plan_type: String,
}

#[derive(Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub plan_type: String,
    pub plan_expiry: String,
}

pub async fn verify_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<VerifyPaymentResponse>> {
    let intern_id = user.require_intern()?;

    let plan = PlanCategory::parse(&payload.plan_type)
        .ok_or_else(|| AppError::bad_request("invalid plan type"))?;
    let amount = plan
        .price_paise()
        .ok_or_else(|| AppError::bad_request("invalid plan type"))?;

    let verified = payments::verify_payment_signature(
        &state.config.payment_key_secret,
        &payload.order_id,
        &payload.payment_id,
        &payload.signature,
    );
    if !verified {
        tracing::warn!(
            intern_id = %intern_id,
            order_ref = %payload.order_id,
            "rejected payment callback with invalid signature"
        );
        return Err(AppError::unauthorized_with("invalid payment signature"));
    }

    let mut conn = state.db()?;
    let now = Utc::now();
    let plan_expiry = now + ChronoDuration::days(state.config.plan_validity_days);

    let record = NewPaymentRecord {
        id: Uuid::new_v4(),
        intern_id,
        amount_paise: amount,
        currency: PLAN_CURRENCY.to_string(),
        order_ref: payload.order_id.clone(),
        payment_ref: payload.payment_id.clone(),
        plan_type: plan.as_str().to_string(),
        status: "success".to_string(),
    };

    // The payment_ref unique index makes replaying a captured signature a
    // no-op: the insert fails before any ledger mutation.
    let result = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::insert_into(payment_records::table)
            .values(&record)
            .execute(conn)?;

        diesel::update(interns::table.find(intern_id))
            .set((
                interns::is_paid.eq(true),
                interns::plan_type.eq(plan.as_str()),
                interns::plan_expiry.eq(plan_expiry.naive_utc()),
            ))
            .execute(conn)?;

        Ok(())
    });

    match result {
        Ok(()) => {}
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return Err(AppError::conflict("payment already processed"));
        }
        Err(diesel::result::Error::NotFound) => {
            return Err(AppError::not_found_with("intern not found"));
        }
        Err(err) => return Err(AppError::from(err)),
    }

    tracing::info!(
        intern_id = %intern_id,
        payment_ref = %payload.payment_id,
        plan = plan.as_str(),
        "payment verified and plan activated"
    );

    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "payment verified and plan activated".to_string(),
        plan_type: plan.as_str().to_string(),
        plan_expiry: plan_expiry.to_rfc3339(),
    }))
}
