use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use fieldbook_engine as engine;

use crate::{auth, models::*, AppState};

// ── Constants ──

/// Minimum range span before weekday selection unlocks (weeks).
const MIN_RECUR_WEEKS: u32 = 2;

/// Volume discount policy. Pricing lives here, not in the engine: the
/// scheduling math stays put when these rates change.
const DISCOUNT_TABLE: &[engine::DiscountTier] = &[
    engine::DiscountTier {
        min_sessions: 4,
        discount_percent: 5,
    },
    engine::DiscountTier {
        min_sessions: 8,
        discount_percent: 10,
    },
    engine::DiscountTier {
        min_sessions: 12,
        discount_percent: 15,
    },
];

// ── Shared booking query (eliminates duplication across client/admin) ──

/// The shared SELECT columns for booking detail queries.
const BOOKING_DETAIL_SELECT: &str =
    "SELECT b.id, b.field_id, f.name AS field_name, b.user_id, b.date, b.start_time, b.end_time,
            b.status, b.payment_status, b.session_price, b.deposit_amount, b.recurrence_id,
            b.created_at, b.confirmed_at
     FROM bookings b
     JOIN fields f ON f.id = b.field_id";

/// The shared booking detail SELECT string (used by admin.rs too).
pub fn booking_detail_select() -> &'static str {
    BOOKING_DETAIL_SELECT
}

// ── Helpers ──

/// Helper: extract the gateway-authenticated user id or fail with 401.
fn require_user(
    headers: &axum::http::HeaderMap,
) -> Result<String, (StatusCode, Json<ApiResponse<()>>)> {
    auth::extract_user_id(headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Missing X-User-Id header")),
        )
    })
}

fn valid_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn valid_time(s: &str) -> bool {
    s.len() == 5 && s.contains(':')
}

/// Decorate one booking row with everything the engine derives from it.
/// Every screen builds its rows through here so they all agree.
pub fn booking_view(
    detail: &BookingDetail,
    requests: &HashMap<String, bool>,
    now: chrono::DateTime<Utc>,
) -> BookingView {
    let record = engine::BookingRecord {
        id: detail.id.to_string(),
        raw_status: Some(detail.status.clone()),
        payment_status: Some(detail.payment_status.clone()),
        created_at: Some(detail.created_at.clone()),
        match_request_id: None,
    };
    let remaining = engine::remaining_payment_ms(&record, now);

    BookingView {
        id: detail.id,
        field_id: detail.field_id,
        field_name: detail.field_name.clone(),
        date: detail.date.clone(),
        start_time: detail.start_time.clone(),
        end_time: detail.end_time.clone(),
        status: record.status(),
        payment_status: detail.payment_status.clone(),
        deposit_amount: detail.deposit_amount,
        deposit_display: engine::format_vnd(detail.deposit_amount),
        recurrence_id: detail.recurrence_id.clone(),
        created_at: detail.created_at.clone(),
        payment_remaining_ms: remaining,
        payment_countdown: engine::format_countdown(remaining),
        awaiting_payment: engine::is_within_payment_window(&record, now),
        can_cancel: engine::can_cancel(&record),
        can_find_opponent: engine::can_find_opponent(&record),
        has_match_request: engine::has_existing_match_request(&record, requests),
    }
}

/// Booking ids with an open match request, keyed for the engine lookup.
async fn open_match_requests(
    db: &sqlx::SqlitePool,
    user_id: &str,
) -> HashMap<String, bool> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT booking_id FROM match_requests WHERE user_id = ? AND status = 'open'",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .unwrap_or_default();

    ids.into_iter().map(|id| (id.to_string(), true)).collect()
}

// ── Endpoints ──

/// GET /api/fields — list active fields.
pub async fn list_fields(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Field>>>, StatusCode> {
    let fields = sqlx::query_as::<_, Field>(
        "SELECT id, name, description, address, price_per_session, deposit_amount, is_active, sort_order
         FROM fields WHERE is_active = 1 ORDER BY sort_order ASC",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("list_fields: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ApiResponse::success(fields)))
}

/// GET /api/policy/cancellation — the static refund tier table, so the
/// frontend renders policy text without re-deriving it.
pub async fn cancellation_policy() -> Json<ApiResponse<Vec<engine::PolicyRange>>> {
    Json(ApiResponse::success(
        engine::cancellation_policy_ranges().to_vec(),
    ))
}

/// POST /api/bookings/recurring/preview — price a recurring plan without
/// creating anything.
pub async fn preview_recurring(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecurringPlanRequest>,
) -> Result<Json<ApiResponse<RecurringPlanResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let plan = build_plan(&state, &body).await?;
    let total_display = engine::format_vnd(plan.discounted_total);

    Ok(Json(ApiResponse::success(RecurringPlanResponse {
        plan,
        total_display,
    })))
}

/// POST /api/bookings — create a single booking with a payment hold.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingView>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = require_user(&headers)?;

    if !valid_date(&body.date) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Ngày không hợp lệ")),
        ));
    }
    if !valid_time(&body.start_time) || !valid_time(&body.end_time) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Giờ không hợp lệ")),
        ));
    }

    let field = fetch_active_field(&state, body.field_id).await?;

    if has_conflict(&state, field.id, &body.date, &body.start_time, &body.end_time).await? {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Khung giờ này đã có người đặt")),
        ));
    }

    let created_at = super::store_now();
    let booking_id = sqlx::query(
        "INSERT INTO bookings (field_id, user_id, date, start_time, end_time,
         status, payment_status, session_price, deposit_amount, created_at)
         VALUES (?, ?, ?, ?, ?, 'pending', 'unpaid', ?, ?, ?)",
    )
    .bind(field.id)
    .bind(&user_id)
    .bind(&body.date)
    .bind(&body.start_time)
    .bind(&body.end_time)
    .bind(field.price_per_session)
    .bind(field.deposit_amount)
    .bind(&created_at)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("create_booking INSERT failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("DB error")),
        )
    })?
    .last_insert_rowid();

    let detail = BookingDetail {
        id: booking_id,
        field_id: field.id,
        field_name: field.name,
        user_id,
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
        status: "pending".into(),
        payment_status: "unpaid".into(),
        session_price: field.price_per_session,
        deposit_amount: field.deposit_amount,
        recurrence_id: None,
        created_at,
        confirmed_at: None,
    };

    Ok(Json(ApiResponse::success(booking_view(
        &detail,
        &HashMap::new(),
        Utc::now(),
    ))))
}

/// POST /api/bookings/recurring — create a recurring series, one booking
/// per planned session date, sharing a recurrence id.
pub async fn create_recurring(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<RecurringPlanRequest>,
) -> Result<Json<ApiResponse<CreateRecurringResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = require_user(&headers)?;
    let plan = build_plan(&state, &body).await?;

    if plan.total_sessions == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "Chưa đủ điều kiện đặt lịch cố định (khoảng ngày quá ngắn hoặc chưa chọn thứ)",
            )),
        ));
    }

    let field = fetch_active_field(&state, body.field_id).await?;

    // Conflict check every planned date up front; reject the whole series
    // rather than creating holes in it.
    let mut conflicts = Vec::new();
    for date in &plan.session_dates {
        let date_str = date.format("%Y-%m-%d").to_string();
        if has_conflict(&state, field.id, &date_str, &body.start_time, &body.end_time).await? {
            conflicts.push(date_str);
        }
    }
    if !conflicts.is_empty() {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error(format!(
                "Các ngày sau đã có người đặt: {}",
                conflicts.join(", ")
            ))),
        ));
    }

    let recurrence_id = format!("rec-{}-{}", user_id, Utc::now().timestamp_millis());
    let created_at = super::store_now();
    let mut booking_ids = Vec::with_capacity(plan.session_dates.len());

    for date in &plan.session_dates {
        let booking_id = sqlx::query(
            "INSERT INTO bookings (field_id, user_id, date, start_time, end_time,
             status, payment_status, session_price, deposit_amount, recurrence_id, created_at)
             VALUES (?, ?, ?, ?, ?, 'pending', 'unpaid', ?, ?, ?, ?)",
        )
        .bind(field.id)
        .bind(&user_id)
        .bind(date.format("%Y-%m-%d").to_string())
        .bind(&body.start_time)
        .bind(&body.end_time)
        .bind(field.price_per_session)
        .bind(field.deposit_amount)
        .bind(&recurrence_id)
        .bind(&created_at)
        .execute(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("create_recurring INSERT failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("DB error")),
            )
        })?
        .last_insert_rowid();

        booking_ids.push(booking_id);
    }

    super::insert_notification(
        &state.db,
        &user_id,
        &format!(
            "Đã tạo lịch cố định {} buổi tại {} ({})",
            plan.total_sessions,
            field.name,
            engine::format_vnd(plan.discounted_total)
        ),
    )
    .await;

    Ok(Json(ApiResponse::success(CreateRecurringResponse {
        recurrence_id,
        total_sessions: plan.total_sessions,
        discount_percent: plan.discount_percent,
        discounted_total: plan.discounted_total,
        booking_ids,
    })))
}

/// GET /api/bookings/my — list the caller's bookings, decorated by the
/// engine (status, countdown, action flags).
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<Json<ApiResponse<Vec<BookingView>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = require_user(&headers)?;

    let query = format!(
        "{} WHERE b.user_id = ? AND b.status != 'expired'
         ORDER BY b.date ASC, b.start_time ASC",
        BOOKING_DETAIL_SELECT
    );

    let details = sqlx::query_as::<_, BookingDetail>(&query)
        .bind(&user_id)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("my_bookings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("DB error")),
            )
        })?;

    let requests = open_match_requests(&state.db, &user_id).await;
    let now = Utc::now();
    let views = details
        .iter()
        .map(|d| booking_view(d, &requests, now))
        .collect();

    Ok(Json(ApiResponse::success(views)))
}

/// GET /api/bookings/{id}/cancellation-quote — preview the refund/penalty
/// split without cancelling.
pub async fn cancellation_quote(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CancelBookingResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = require_user(&headers)?;
    let booking = fetch_own_booking(&state, id, &user_id).await?;

    let quote = quote_for(&booking);
    let refund_display = engine::format_vnd(quote.refund_amount);

    Ok(Json(ApiResponse::success(CancelBookingResponse {
        message: format!("Hủy trong khung {}", quote.time_range),
        quote,
        refund_display,
    })))
}

/// DELETE /api/bookings/{id} — cancel a booking, applying the tiered
/// refund policy to the deposit.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CancelBookingResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = require_user(&headers)?;
    let booking = fetch_own_booking(&state, id, &user_id).await?;

    let record = booking.to_record();
    if !engine::can_cancel(&record) {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Không thể hủy đặt sân này")),
        ));
    }

    let quote = quote_for(&booking);
    let was_paid = record.payment().is_paid();
    let new_payment_status = if was_paid && quote.refund_amount > 0 {
        "refunded"
    } else {
        booking.payment_status.as_str()
    };

    if let Err(e) = sqlx::query(
        "UPDATE bookings SET status = 'cancelled', cancelled_at = ?,
         refund_amount = ?, penalty_amount = ?, payment_status = ?
         WHERE id = ?",
    )
    .bind(super::store_now())
    .bind(quote.refund_amount)
    .bind(quote.penalty_amount)
    .bind(new_payment_status)
    .bind(id)
    .execute(&state.db)
    .await
    {
        tracing::error!("Failed to cancel booking {}: {}", id, e);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("DB error")),
        ));
    }

    let refund_display = engine::format_vnd(quote.refund_amount);
    super::insert_notification(
        &state.db,
        &user_id,
        &format!(
            "Đã hủy đặt sân ngày {} lúc {}. Hoàn cọc: {}",
            booking.date, booking.start_time, refund_display
        ),
    )
    .await;

    Ok(Json(ApiResponse::success(CancelBookingResponse {
        message: "Đã hủy đặt sân".into(),
        quote,
        refund_display,
    })))
}

/// GET /api/bookings/groups/{recurrence_id} — a recurring series with its
/// aggregate status.
pub async fn booking_group(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Path(recurrence_id): Path<String>,
) -> Result<Json<ApiResponse<BookingGroupResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = require_user(&headers)?;

    let query = format!(
        "{} WHERE b.recurrence_id = ? AND b.user_id = ?
         ORDER BY b.date ASC, b.start_time ASC",
        BOOKING_DETAIL_SELECT
    );

    let details = sqlx::query_as::<_, BookingDetail>(&query)
        .bind(&recurrence_id)
        .bind(&user_id)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("booking_group: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("DB error")),
            )
        })?;

    if details.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Không tìm thấy lịch cố định")),
        ));
    }

    let records: Vec<engine::BookingRecord> = details
        .iter()
        .map(|d| engine::BookingRecord {
            id: d.id.to_string(),
            raw_status: Some(d.status.clone()),
            payment_status: Some(d.payment_status.clone()),
            created_at: Some(d.created_at.clone()),
            match_request_id: None,
        })
        .collect();
    let status = engine::group_status(&records);

    let requests = open_match_requests(&state.db, &user_id).await;
    let now = Utc::now();
    let bookings = details
        .iter()
        .map(|d| booking_view(d, &requests, now))
        .collect();

    Ok(Json(ApiResponse::success(BookingGroupResponse {
        recurrence_id,
        status,
        bookings,
    })))
}

/// POST /api/bookings/{id}/match-request — open a "find opponent" request
/// for a booking.
pub async fn create_match_request(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MatchRequest>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = require_user(&headers)?;
    let booking = fetch_own_booking(&state, id, &user_id).await?;

    let record = booking.to_record();
    if !engine::can_find_opponent(&record) {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Chưa thể tìm đối cho đặt sân này")),
        ));
    }

    let requests = open_match_requests(&state.db, &user_id).await;
    if engine::has_existing_match_request(&record, &requests) {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Đã có yêu cầu tìm đối cho trận này")),
        ));
    }

    let created_at = super::store_now();
    let request_id = sqlx::query(
        "INSERT INTO match_requests (booking_id, user_id, status, created_at)
         VALUES (?, ?, 'open', ?)",
    )
    .bind(id)
    .bind(&user_id)
    .bind(&created_at)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("create_match_request: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("DB error")),
        )
    })?
    .last_insert_rowid();

    Ok(Json(ApiResponse::success(MatchRequest {
        id: request_id,
        booking_id: id,
        user_id,
        status: "open".into(),
        created_at,
    })))
}

/// GET /api/notifications/my — the caller's notifications, newest first.
pub async fn my_notifications(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<Json<ApiResponse<Vec<Notification>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = require_user(&headers)?;

    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT id, user_id, body, is_read, created_at FROM notifications
         WHERE user_id = ? ORDER BY id DESC LIMIT 100",
    )
    .bind(&user_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("my_notifications: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("DB error")),
        )
    })?;

    Ok(Json(ApiResponse::success(notifications)))
}

// ── Private helpers ──

/// The refund quote for a booking as it stands right now. Only money that
/// was actually put down can be refunded; an unpaid deposit quotes as 0.
fn quote_for(booking: &Booking) -> engine::CancellationQuote {
    let record = booking.to_record();
    let deposit = if record.payment().is_paid() {
        booking.deposit_amount
    } else {
        0
    };
    engine::quote_cancellation_str(
        booking.confirmed_at.as_deref(),
        &booking.start_timestamp(),
        deposit,
        Utc::now(),
    )
}

async fn fetch_active_field(
    state: &AppState,
    field_id: i64,
) -> Result<Field, (StatusCode, Json<ApiResponse<()>>)> {
    sqlx::query_as::<_, Field>(
        "SELECT id, name, description, address, price_per_session, deposit_amount, is_active, sort_order
         FROM fields WHERE id = ? AND is_active = 1",
    )
    .bind(field_id)
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
            Json(ApiResponse::error("Sân không tồn tại")),
        )
    })
}

async fn fetch_own_booking(
    state: &AppState,
    id: i64,
    user_id: &str,
) -> Result<Booking, (StatusCode, Json<ApiResponse<()>>)> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
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
        })
}

/// True when another live booking overlaps the requested slot. Expired and
/// cancelled bookings do not hold their slot.
async fn has_conflict(
    state: &AppState,
    field_id: i64,
    date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<bool, (StatusCode, Json<ApiResponse<()>>)> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bookings
         WHERE field_id = ? AND date = ?
           AND status IN ('pending', 'confirmed')
           AND start_time < ? AND end_time > ?",
    )
    .bind(field_id)
    .bind(date)
    .bind(end_time)
    .bind(start_time)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("has_conflict: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("DB error")),
        )
    })?;

    Ok(count > 0)
}

/// Validate a plan request and run the engine planner over it.
async fn build_plan(
    state: &AppState,
    body: &RecurringPlanRequest,
) -> Result<engine::RecurringPlan, (StatusCode, Json<ApiResponse<()>>)> {
    let range_start = NaiveDate::parse_from_str(&body.range_start, "%Y-%m-%d");
    let range_end = NaiveDate::parse_from_str(&body.range_end, "%Y-%m-%d");
    let (range_start, range_end) = match (range_start, range_end) {
        (Ok(s), Ok(e)) => (s, e),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Ngày không hợp lệ")),
            ))
        }
    };
    if !valid_time(&body.start_time) || !valid_time(&body.end_time) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Giờ không hợp lệ")),
        ));
    }

    let field = fetch_active_field(state, body.field_id).await?;
    let weekdays: BTreeSet<u8> = body.weekdays.iter().copied().collect();

    Ok(engine::plan_recurring(
        range_start,
        range_end,
        &weekdays,
        MIN_RECUR_WEEKS,
        field.price_per_session,
        DISCOUNT_TABLE,
    ))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    /// Helper: build a BookingDetail without boilerplate.
    fn make_detail(status: &str, payment: &str, created_at: &str) -> BookingDetail {
        BookingDetail {
            id: 7,
            field_id: 1,
            field_name: "Sân 5 Cầu Giấy".into(),
            user_id: "user-42".into(),
            date: "2026-03-01".into(),
            start_time: "19:00".into(),
            end_time: "20:00".into(),
            status: status.into(),
            payment_status: payment.into(),
            session_price: 300_000,
            deposit_amount: 100_000,
            recurrence_id: None,
            created_at: created_at.into(),
            confirmed_at: None,
        }
    }

    #[test]
    fn test_view_pending_unpaid_inside_hold() {
        let detail = make_detail("pending", "unpaid", "2026-03-01T11:55:00Z");
        let view = booking_view(&detail, &HashMap::new(), fixed_now());
        assert!(view.awaiting_payment);
        assert_eq!(view.payment_countdown, "05:00");
        assert!(view.can_cancel);
        assert!(!view.can_find_opponent);
    }

    #[test]
    fn test_view_pending_after_hold() {
        let detail = make_detail("pending", "unpaid", "2026-03-01T11:40:00Z");
        let view = booking_view(&detail, &HashMap::new(), fixed_now());
        assert!(!view.awaiting_payment);
        assert_eq!(view.payment_countdown, "00:00");
    }

    #[test]
    fn test_view_confirmed_paid() {
        let detail = make_detail("confirmed", "paid", "2026-03-01T09:00:00Z");
        let view = booking_view(&detail, &HashMap::new(), fixed_now());
        assert!(!view.awaiting_payment);
        assert!(view.can_cancel);
        assert!(view.can_find_opponent);
        assert_eq!(view.status.as_str(), "confirmed");
        assert_eq!(view.deposit_display, "100.000 ₫");
    }

    #[test]
    fn test_view_confirmed_unpaid_cannot_cancel() {
        let detail = make_detail("confirmed", "unpaid", "2026-03-01T09:00:00Z");
        let view = booking_view(&detail, &HashMap::new(), fixed_now());
        assert!(!view.can_cancel);
        assert!(!view.can_find_opponent);
    }

    #[test]
    fn test_view_marks_existing_match_request() {
        let detail = make_detail("confirmed", "paid", "2026-03-01T09:00:00Z");
        let mut requests = HashMap::new();
        requests.insert("7".to_string(), true);
        let view = booking_view(&detail, &requests, fixed_now());
        assert!(view.has_match_request);
    }

    #[test]
    fn test_valid_date() {
        assert!(valid_date("2026-03-01"));
        assert!(!valid_date("01/03/2026"));
        assert!(!valid_date("garbage"));
    }

    #[test]
    fn test_valid_time() {
        assert!(valid_time("19:00"));
        assert!(!valid_time("7pm"));
        assert!(!valid_time("19:00:00"));
    }

    #[test]
    fn test_discount_table_is_monotone() {
        let mut last = 0;
        for tier in DISCOUNT_TABLE {
            assert!(tier.discount_percent >= last);
            last = tier.discount_percent;
        }
    }
}
