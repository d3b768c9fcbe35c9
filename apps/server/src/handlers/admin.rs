use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use fieldbook_engine as engine;

use crate::{auth, models::*, AppState};

use super::client::{booking_detail_select, booking_view};

/// Helper: extract the caller and require admin rights.
fn extract_admin(
    headers: &axum::http::HeaderMap,
    state: &AppState,
) -> Result<String, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = auth::extract_user_id(headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Missing X-User-Id header")),
        )
    })?;

    if !auth::is_admin(&user_id, &state.admin_user_id) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        ));
    }

    Ok(user_id)
}

/// GET /api/admin/bookings?date=&from=&to= — bookings across all users.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingView>>>, (StatusCode, Json<ApiResponse<()>>)> {
    extract_admin(&headers, &state)?;

    let base = booking_detail_select();
    let details = if let Some(date) = &query.date {
        let sql = format!(
            "{} WHERE b.date = ? ORDER BY b.start_time ASC",
            base
        );
        sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(date)
            .fetch_all(&state.db)
            .await
    } else if let (Some(from), Some(to)) = (&query.from, &query.to) {
        let sql = format!(
            "{} WHERE b.date >= ? AND b.date <= ? ORDER BY b.date ASC, b.start_time ASC",
            base
        );
        sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&state.db)
            .await
    } else {
        let sql = format!("{} ORDER BY b.date DESC, b.start_time ASC LIMIT 200", base);
        sqlx::query_as::<_, BookingDetail>(&sql)
            .fetch_all(&state.db)
            .await
    }
    .map_err(|e| {
        tracing::error!("admin list_bookings: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("DB error")),
        )
    })?;

    let now = Utc::now();
    let requests = HashMap::new();
    let views = details
        .iter()
        .map(|d| booking_view(d, &requests, now))
        .collect();

    Ok(Json(ApiResponse::success(views)))
}

/// POST /api/admin/bookings/{id}/cancel — cancel any booking with a full
/// deposit refund, regardless of the tier the owner would get.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CancelBookingResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    extract_admin(&headers, &state)?;

    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("DB error")),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Không tìm thấy đặt sân")),
            )
        })?;

    let record = booking.to_record();
    if record.status() == engine::BookingStatus::Cancelled {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Đặt sân đã bị hủy trước đó")),
        ));
    }

    // Admin override: full refund of whatever was actually paid
    let refund = if record.payment().is_paid() {
        booking.deposit_amount
    } else {
        0
    };
    let new_payment_status = if refund > 0 {
        "refunded"
    } else {
        booking.payment_status.as_str()
    };

    if let Err(e) = sqlx::query(
        "UPDATE bookings SET status = 'cancelled', cancelled_at = ?,
         refund_amount = ?, penalty_amount = 0, payment_status = ?
         WHERE id = ?",
    )
    .bind(super::store_now())
    .bind(refund)
    .bind(new_payment_status)
    .bind(id)
    .execute(&state.db)
    .await
    {
        tracing::error!("admin cancel booking {}: {}", id, e);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("DB error")),
        ));
    }

    let refund_display = engine::format_vnd(refund);
    super::insert_notification(
        &state.db,
        &booking.user_id,
        &format!(
            "Đặt sân ngày {} lúc {} đã bị hủy bởi quản trị viên. Hoàn cọc toàn bộ: {}",
            booking.date, booking.start_time, refund_display
        ),
    )
    .await;

    let quote = engine::CancellationQuote {
        refund_rate: 100,
        penalty_rate: 0,
        refund_amount: refund,
        penalty_amount: 0,
        time_range: "admin".into(),
        hours_until_booking: 0.0,
        is_past_booking: false,
    };

    Ok(Json(ApiResponse::success(CancelBookingResponse {
        message: "Đã hủy đặt sân (quản trị viên)".into(),
        quote,
        refund_display,
    })))
}
