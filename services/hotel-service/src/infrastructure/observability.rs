//! Hotel service metrics
//!
//! 业务指标记录

use metrics::{counter, histogram};

// ============================================================================
// Checkout Metrics
// ============================================================================

/// 记录完成的结账会话
pub fn record_checkout_completed(item_count: usize, total_value: f64) {
    counter!("hotel_checkout_sessions_total", "outcome" => "confirmed").increment(1);
    histogram!("hotel_checkout_items").record(item_count as f64);
    histogram!("hotel_checkout_total_value").record(total_value);
}

/// 记录中止的结账会话
pub fn record_checkout_aborted(reason: &str, discarded_items: usize) {
    let labels = [
        ("outcome", "aborted".to_string()),
        ("reason", reason.to_string()),
    ];
    counter!("hotel_checkout_sessions_total", &labels).increment(1);
    histogram!("hotel_checkout_discarded_items").record(discarded_items as f64);
}

// ============================================================================
// Chat Metrics
// ============================================================================

/// 记录聊天消息的路由结果
pub fn record_chat_message(domain: &str, replied: bool) {
    let labels = [
        ("domain", domain.to_string()),
        ("replied", replied.to_string()),
    ];
    counter!("hotel_chat_messages_total", &labels).increment(1);
}

/// 记录聊天流结束
pub fn record_chat_session_closed(outcome: &str, received: u64, replied: u64) {
    counter!("hotel_chat_sessions_total", "outcome" => outcome.to_string()).increment(1);
    histogram!("hotel_chat_session_messages").record(received as f64);
    histogram!("hotel_chat_session_replies").record(replied as f64);
}

// ============================================================================
// Search Metrics
// ============================================================================

/// 记录搜索请求
pub fn record_search(results: usize, duration_ms: f64) {
    counter!("hotel_search_requests_total").increment(1);
    histogram!("hotel_search_results").record(results as f64);
    histogram!("hotel_search_duration_ms").record(duration_ms);
}
