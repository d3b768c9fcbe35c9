pub mod admin;
pub mod client;
pub mod health;
pub mod payment;

use fieldbook_engine::time::vietnam_now;

/// Current timestamp in the store's naive local format.
pub fn store_now() -> String {
    vietnam_now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Write a notification row for `user_id`. Failures are logged, never fatal:
/// a missed notification must not break the booking flow around it.
pub async fn insert_notification(db: &sqlx::SqlitePool, user_id: &str, body: &str) {
    if let Err(e) =
        sqlx::query("INSERT INTO notifications (user_id, body, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(body)
            .bind(store_now())
            .execute(db)
            .await
    {
        tracing::error!("Failed to insert notification for {}: {}", user_id, e);
    }
}
