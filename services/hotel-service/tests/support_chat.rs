//! Bidirectional support chat scenarios

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeZone};
use futures::StreamExt;
use hotel_service::application::{ChatHandler, ReplyStream};
use hotel_service::domain::{FixedClock, InboundChatMessage, ReplyKind, TopicClassifier};
use stay_errors::{AppError, AppResult};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

type Inbound = mpsc::Sender<AppResult<InboundChatMessage>>;

fn open_chat() -> (Inbound, ReplyStream) {
    let clock = FixedClock(Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
    let handler = Arc::new(ChatHandler::new(
        TopicClassifier::default(),
        Arc::new(clock),
        Duration::from_millis(500),
        "suporte",
        "hotel",
    ));
    let (tx, rx) = mpsc::channel(8);
    let replies = handler.spawn(ReceiverStream::new(rx));
    (tx, replies)
}

async fn say(tx: &Inbound, text: &str, context: &str) {
    tx.send(Ok(InboundChatMessage::new(text, context)))
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_hotel_question_gets_pricing_reply() {
    let (tx, mut replies) = open_chat();

    say(&tx, "Qual o preço dos quartos?", "").await;
    let reply = replies.next().await.unwrap().unwrap();

    assert_eq!(reply.text, ReplyKind::Pricing.text());
    assert_eq!(reply.sender, "suporte");
    assert_eq!(reply.context, "hotel");
    assert_eq!(reply.timestamp, "2024-03-01 09:30:00");
}

#[tokio::test(start_paused = true)]
async fn test_flight_messages_are_ignored_and_order_is_kept() {
    let (tx, mut replies) = open_chat();

    say(&tx, "Quero um voo para Recife", "").await;
    say(&tx, "Bom dia", "flight").await;
    say(&tx, "Tem pacote com hotel?", "").await;
    say(&tx, "Quais cidades vocês atendem?", "general").await;
    say(&tx, "Hotel com piscina?", "").await;
    drop(tx);

    let texts: Vec<String> = replies
        .map(|reply| reply.unwrap().text)
        .collect()
        .await;

    assert_eq!(
        texts,
        vec![
            ReplyKind::PackagePitch.text().to_string(),
            ReplyKind::Greeting.text().to_string(),
            ReplyKind::Fallback.text().to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_general_context_gets_greeting() {
    let (tx, mut replies) = open_chat();

    say(&tx, "Preciso de ajuda", "geral").await;
    let reply = replies.next().await.unwrap().unwrap();
    assert_eq!(reply.text, ReplyKind::Greeting.text());
}

#[tokio::test(start_paused = true)]
async fn test_end_of_input_closes_without_final_message() {
    let (tx, mut replies) = open_chat();

    say(&tx, "Hotel 5 estrelas?", "").await;
    drop(tx);

    let reply = replies.next().await.unwrap().unwrap();
    assert_eq!(reply.text, ReplyKind::StarRating.text());
    assert!(replies.next().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_reply_waits_for_think_time() {
    let (tx, mut replies) = open_chat();
    let started = tokio::time::Instant::now();

    say(&tx, "Qual o tipo de quarto?", "").await;
    let reply = replies.next().await.unwrap().unwrap();

    assert_eq!(reply.text, ReplyKind::AccommodationTypes.text());
    assert!(started.elapsed() >= Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_is_last_item() {
    let (tx, mut replies) = open_chat();

    say(&tx, "Quais comodidades do hotel?", "").await;
    tx.send(Err(AppError::transport("stream reset"))).await.unwrap();

    let reply = replies.next().await.unwrap().unwrap();
    assert_eq!(reply.text, ReplyKind::Amenities.text());

    let err = replies.next().await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
    assert!(replies.next().await.is_none());
}
