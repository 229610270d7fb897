//! Client-streaming checkout scenarios

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeZone};
use hotel_service::application::CheckoutHandler;
use hotel_service::domain::{CartItem, FixedClock};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use stay_errors::{AppError, AppResult};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_test::{assert_pending, assert_ready};

fn handler() -> CheckoutHandler {
    let clock = FixedClock(Local.with_ymd_and_hms(2024, 7, 15, 14, 5, 9).unwrap());
    CheckoutHandler::new(Arc::new(clock), Duration::from_secs(1))
}

fn item(id: &str, price: Decimal) -> AppResult<CartItem> {
    CartItem::new(id, "hotel", price)
}

#[tokio::test(start_paused = true)]
async fn test_two_items_produce_single_confirmation() {
    let items = futures::stream::iter(vec![item("H1", dec!(150.00)), item("H2", dec!(89.50))]);

    let confirmation = handler().checkout(items).await.unwrap();

    assert!(confirmation.success);
    assert_eq!(confirmation.item_count, 2);
    assert_eq!(confirmation.total_value, dec!(239.50));
    assert!(confirmation.errors.is_empty());
    assert_eq!(confirmation.timestamp, "2024-07-15 14:05:09");
    assert!(confirmation.confirmation_code.starts_with("PKG"));
    assert!(confirmation.confirmation_code.ends_with("0239"));
}

#[tokio::test(start_paused = true)]
async fn test_empty_stream_confirms_zero_items() {
    let items = futures::stream::iter(Vec::<AppResult<CartItem>>::new());

    let confirmation = handler().checkout(items).await.unwrap();

    assert!(confirmation.success);
    assert_eq!(confirmation.item_count, 0);
    assert_eq!(confirmation.total_value, Decimal::ZERO);
    assert!(confirmation.confirmation_code.ends_with("0000"));
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_discards_session() {
    let items = futures::stream::iter(vec![
        item("H1", dec!(150.00)),
        Err(AppError::transport("connection reset by peer")),
        item("H2", dec!(89.50)),
    ]);

    let result = handler().checkout(items).await;
    assert!(matches!(result, Err(AppError::Transport(_))));
}

#[tokio::test(start_paused = true)]
async fn test_nothing_emitted_before_end_of_input() {
    let handler = handler();
    let (tx, rx) = mpsc::channel(4);
    let mut checkout = tokio_test::task::spawn(handler.checkout(ReceiverStream::new(rx)));

    assert_pending!(checkout.poll());
    tx.send(item("H1", dec!(150.00))).await.unwrap();
    assert_pending!(checkout.poll());
    tx.send(item("H2", dec!(89.50))).await.unwrap();
    assert_pending!(checkout.poll());

    // end-of-input 后进入处理延迟
    drop(tx);
    assert_pending!(checkout.poll());

    tokio::time::advance(Duration::from_secs(1)).await;
    let confirmation = assert_ready!(checkout.poll()).unwrap();
    assert_eq!(confirmation.item_count, 2);
    assert_eq!(confirmation.total_value, dec!(239.50));
}

#[tokio::test(start_paused = true)]
async fn test_overflowing_total_aborts_without_confirmation() {
    let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
    let items = futures::stream::iter(vec![item("H1", huge), item("H2", huge)]);

    let result = handler().checkout(items).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}
