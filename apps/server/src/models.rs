use fieldbook_engine::{BookingRecord, BookingStatus, CancellationQuote, GroupStatus};
use serde::{Deserialize, Serialize};

// ── Database models ──

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Field {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub price_per_session: i64,
    pub deposit_amount: i64,
    pub is_active: bool,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    pub field_id: i64,
    pub user_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub payment_status: String,
    pub session_price: i64,
    pub deposit_amount: i64,
    pub refund_amount: Option<i64>,
    pub penalty_amount: Option<i64>,
    pub recurrence_id: Option<String>,
    pub created_at: String,
    pub confirmed_at: Option<String>,
    pub cancelled_at: Option<String>,
}

impl Booking {
    /// View of this row in the shape the engine consumes.
    pub fn to_record(&self) -> BookingRecord {
        BookingRecord {
            id: self.id.to_string(),
            raw_status: Some(self.status.clone()),
            payment_status: Some(self.payment_status.clone()),
            created_at: Some(self.created_at.clone()),
            match_request_id: None,
        }
    }

    /// Kickoff timestamp in the store's naive local format.
    pub fn start_timestamp(&self) -> String {
        format!("{} {}", self.date, self.start_time)
    }
}

/// Booking row joined with its field, for list/detail responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingDetail {
    pub id: i64,
    pub field_id: i64,
    pub field_name: String,
    pub user_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub payment_status: String,
    pub session_price: i64,
    pub deposit_amount: i64,
    pub recurrence_id: Option<String>,
    pub created_at: String,
    pub confirmed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MatchRequest {
    pub id: i64,
    pub booking_id: i64,
    pub user_id: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}

// ── API request/response types ──

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub field_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize)]
pub struct RecurringPlanRequest {
    pub field_id: i64,
    pub range_start: String,
    pub range_end: String,
    /// Weekdays 0 = Sunday .. 6 = Saturday.
    pub weekdays: Vec<u8>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// One booking decorated with everything the UI needs to render it: the
/// normalized status, the payment countdown and the action flags. All of
/// it comes from the engine so every screen shows the same booking the
/// same way.
#[derive(Debug, Serialize)]
pub struct BookingView {
    pub id: i64,
    pub field_id: i64,
    pub field_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub payment_status: String,
    pub deposit_amount: i64,
    pub deposit_display: String,
    pub recurrence_id: Option<String>,
    pub created_at: String,
    pub payment_remaining_ms: i64,
    pub payment_countdown: String,
    pub awaiting_payment: bool,
    pub can_cancel: bool,
    pub can_find_opponent: bool,
    pub has_match_request: bool,
}

#[derive(Debug, Serialize)]
pub struct CancelBookingResponse {
    pub message: String,
    pub quote: CancellationQuote,
    pub refund_display: String,
}

#[derive(Debug, Serialize)]
pub struct RecurringPlanResponse {
    pub plan: fieldbook_engine::RecurringPlan,
    pub total_display: String,
}

#[derive(Debug, Serialize)]
pub struct CreateRecurringResponse {
    pub recurrence_id: String,
    pub total_sessions: u32,
    pub discount_percent: u32,
    pub discounted_total: i64,
    pub booking_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BookingGroupResponse {
    pub recurrence_id: String,
    pub status: GroupStatus,
    pub bookings: Vec<BookingView>,
}

// ── Payment gateway webhook (consumed as a data contract only) ──

#[derive(Debug, Deserialize)]
pub struct GatewayWebhookEvent {
    pub event: String,
    pub booking_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
