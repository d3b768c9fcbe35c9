use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;

use fieldbook_engine as engine;

use crate::{models::*, AppState};

/// Header the payment gateway signs its webhook calls with.
const GATEWAY_TOKEN_HEADER: &str = "x-gateway-token";

/// POST /api/payments/webhook — result callback from the external payment
/// gateway. The gateway itself is out of our hands; only its outcome
/// events are consumed here.
pub async fn gateway_webhook(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(event): Json<GatewayWebhookEvent>,
) -> StatusCode {
    // Shared-secret check when configured
    if !state.gateway_webhook_token.is_empty() {
        let token = headers
            .get(GATEWAY_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if token != state.gateway_webhook_token {
            tracing::warn!("payment webhook rejected: bad gateway token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    tracing::info!(
        "payment webhook: event={}, booking_id={}",
        event.event,
        event.booking_id
    );

    match event.event.as_str() {
        "payment.succeeded" => {
            let result = sqlx::query(
                "UPDATE bookings SET status = 'confirmed', payment_status = 'paid', confirmed_at = ?
                 WHERE id = ? AND status = 'pending'",
            )
            .bind(super::store_now())
            .bind(event.booking_id)
            .execute(&state.db)
            .await;

            match result {
                Err(e) => {
                    tracing::error!("Failed to confirm booking {}: {}", event.booking_id, e);
                    return StatusCode::INTERNAL_SERVER_ERROR;
                }
                Ok(r) if r.rows_affected() == 0 => {
                    // Booking already expired or cancelled; the gateway
                    // refunds on its side when we report no match.
                    tracing::warn!(
                        "payment for booking {} arrived but booking is no longer pending",
                        event.booking_id
                    );
                }
                Ok(_) => {
                    let booking = sqlx::query_as::<_, Booking>(
                        "SELECT * FROM bookings WHERE id = ?",
                    )
                    .bind(event.booking_id)
                    .fetch_optional(&state.db)
                    .await
                    .ok()
                    .flatten();

                    if let Some(booking) = booking {
                        super::insert_notification(
                            &state.db,
                            &booking.user_id,
                            &format!(
                                "Đặt sân ngày {} lúc {} đã được xác nhận. Tiền cọc: {}",
                                booking.date,
                                booking.start_time,
                                engine::format_vnd(booking.deposit_amount)
                            ),
                        )
                        .await;
                    }
                }
            }
        }

        "payment.canceled" => {
            sqlx::query(
                "UPDATE bookings SET status = 'expired'
                 WHERE id = ? AND status = 'pending'",
            )
            .bind(event.booking_id)
            .execute(&state.db)
            .await
            .ok();
        }

        _ => {
            tracing::info!("Ignoring webhook event: {}", event.event);
        }
    }

    // Always 200 so the gateway does not retry events we chose to ignore
    StatusCode::OK
}

/// Expire pending bookings whose payment hold has run out. The engine's
/// window math is the single source of truth; no datetime arithmetic in
/// SQL.
pub async fn expire_overdue_holds(db: &sqlx::SqlitePool) {
    let pending = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE status = 'pending'")
        .fetch_all(db)
        .await
        .unwrap_or_default();

    let now = Utc::now();
    for booking in pending {
        let record = booking.to_record();
        if record.payment().is_unpaid() && engine::remaining_payment_ms(&record, now) == 0 {
            tracing::info!("Expiring unpaid booking {}", booking.id);

            sqlx::query("UPDATE bookings SET status = 'expired' WHERE id = ? AND status = 'pending'")
                .bind(booking.id)
                .execute(db)
                .await
                .ok();

            super::insert_notification(
                db,
                &booking.user_id,
                &format!(
                    "Đặt sân ngày {} lúc {} đã hết hạn thanh toán và bị hủy giữ chỗ",
                    booking.date, booking.start_time
                ),
            )
            .await;
        }
    }
}
