//! Bidirectional support chat

use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use stay_config::ChatConfig;
use stay_errors::{AppError, AppResult};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::domain::{
    format_timestamp, ChatSession, Clock, InboundChatMessage, OutboundChatMessage, ReplyKind,
    TopicClassifier, TopicKeywords,
};
use crate::infrastructure::observability::{record_chat_message, record_chat_session_closed};

/// Replies are produced one at a time, so a small buffer is enough.
const REPLY_BUFFER: usize = 8;

pub type ReplyStream = ReceiverStream<AppResult<OutboundChatMessage>>;

pub struct ChatHandler {
    classifier: TopicClassifier,
    clock: Arc<dyn Clock>,
    think_time: Duration,
    sender: String,
    domain_tag: String,
}

impl ChatHandler {
    pub fn new(
        classifier: TopicClassifier,
        clock: Arc<dyn Clock>,
        think_time: Duration,
        sender: impl Into<String>,
        domain_tag: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            clock,
            think_time,
            sender: sender.into(),
            domain_tag: domain_tag.into(),
        }
    }

    pub fn from_config(config: &ChatConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            TopicClassifier::new(TopicKeywords::from(&config.keywords)),
            clock,
            Duration::from_millis(config.think_time_ms),
            config.sender.clone(),
            config.domain_tag.clone(),
        )
    }

    fn compose(&self, kind: ReplyKind) -> OutboundChatMessage {
        OutboundChatMessage {
            sender: self.sender.clone(),
            text: kind.text().to_string(),
            timestamp: format_timestamp(&self.clock.now()),
            context: self.domain_tag.clone(),
        }
    }

    /// Runs the chat on its own task and returns the reply stream.
    ///
    /// The reply stream ends without a final message when the client ends its
    /// input; a transport error is forwarded as the last item.
    pub fn spawn<S>(self: &Arc<Self>, inbound: S) -> ReplyStream
    where
        S: Stream<Item = AppResult<InboundChatMessage>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(REPLY_BUFFER);
        let handler = Arc::clone(self);

        tokio::spawn(async move {
            if let Err(e) = handler.run(inbound, &tx).await {
                // 客户端已断开时无人接收
                let _ = tx.send(Err(e)).await;
            }
        });

        ReceiverStream::new(rx)
    }

    /// Processes inbound messages in arrival order until end-of-input.
    pub async fn run<S>(
        &self,
        inbound: S,
        outbound: &mpsc::Sender<AppResult<OutboundChatMessage>>,
    ) -> AppResult<()>
    where
        S: Stream<Item = AppResult<InboundChatMessage>> + Send,
    {
        futures::pin_mut!(inbound);
        let mut session = ChatSession::open();
        info!("Support chat opened");

        let outcome = loop {
            let next = tokio::select! {
                _ = outbound.closed() => {
                    break Err(AppError::cancelled("reply stream dropped by client"));
                }
                next = inbound.next() => next,
            };

            let message = match next {
                None => break Ok(()),
                Some(Err(e)) => break Err(e),
                Some(Ok(message)) => message,
            };

            let routed = match session.route(&self.classifier, &message) {
                Ok(routed) => routed,
                Err(e) => break Err(e),
            };
            let domain = routed.classification.domain();
            record_chat_message(domain.as_str(), routed.reply.is_some());

            let Some(kind) = routed.reply else {
                debug!(domain = domain.as_str(), "Message outside hotel domain, staying silent");
                continue;
            };

            // 模拟处理时间
            tokio::time::sleep(self.think_time).await;

            if outbound.send(Ok(self.compose(kind))).await.is_err() {
                break Err(AppError::cancelled("reply stream dropped by client"));
            }
            debug!(domain = domain.as_str(), reply = kind.as_str(), "Replied");
        };

        session.close();
        match &outcome {
            Ok(()) => {
                info!(
                    received = session.received(),
                    replied = session.replied(),
                    "Support chat closed by client"
                );
                record_chat_session_closed("completed", session.received(), session.replied());
            }
            Err(e) => {
                warn!(
                    error = %e,
                    received = session.received(),
                    replied = session.replied(),
                    "Support chat aborted"
                );
                record_chat_session_closed(e.kind(), session.received(), session.replied());
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FixedClock;
    use chrono::{Local, TimeZone};

    fn handler() -> ChatHandler {
        let clock = FixedClock(Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
        ChatHandler::new(
            TopicClassifier::default(),
            Arc::new(clock),
            Duration::from_millis(500),
            "suporte",
            "hotel",
        )
    }

    #[test]
    fn test_compose_uses_fixed_identity() {
        let reply = handler().compose(ReplyKind::Pricing);
        assert_eq!(reply.sender, "suporte");
        assert_eq!(reply.context, "hotel");
        assert_eq!(reply.timestamp, "2024-03-01 09:30:00");
        assert_eq!(reply.text, ReplyKind::Pricing.text());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_when_reply_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let inbound = futures::stream::pending::<AppResult<InboundChatMessage>>();
        let result = handler().run(inbound, &tx).await;
        assert!(matches!(result, Err(AppError::Cancelled(_))));
    }
}
