//! Client-streaming checkout

use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use rust_decimal::prelude::ToPrimitive;
use stay_errors::AppResult;
use tracing::{debug, info, warn};

use crate::domain::{CartItem, CheckoutSession, Clock, PurchaseConfirmation};
use crate::infrastructure::observability::{record_checkout_aborted, record_checkout_completed};

pub struct CheckoutHandler {
    clock: Arc<dyn Clock>,
    processing_delay: Duration,
}

impl CheckoutHandler {
    pub fn new(clock: Arc<dyn Clock>, processing_delay: Duration) -> Self {
        Self {
            clock,
            processing_delay,
        }
    }

    /// Drains `items` until end-of-input and returns the single confirmation.
    ///
    /// An `Err` item aborts the session: it is discarded and the error returned,
    /// no confirmation is produced. Dropping the returned future (connection
    /// closed) discards the session the same way.
    pub async fn checkout<S>(&self, items: S) -> AppResult<PurchaseConfirmation>
    where
        S: Stream<Item = AppResult<CartItem>> + Send,
    {
        futures::pin_mut!(items);
        let mut session = CheckoutSession::open();
        debug!("Checkout stream opened");

        while let Some(next) = items.next().await {
            let accepted = next.and_then(|item| {
                debug!(
                    id = item.id(),
                    kind = item.kind(),
                    price = %item.price(),
                    "Cart item received"
                );
                session.accept(item)
            });

            if let Err(e) = accepted {
                let discarded = session.abort();
                warn!(error = %e, discarded, "Checkout stream failed, session discarded");
                record_checkout_aborted(e.kind(), discarded);
                return Err(e);
            }
        }

        session.end_of_input()?;
        info!(
            items = session.item_count(),
            total = %session.running_total(),
            "Processing checkout"
        );

        // 模拟支付处理
        tokio::time::sleep(self.processing_delay).await;

        let confirmation = session.confirm(self.clock.now())?;
        info!(
            code = %confirmation.confirmation_code,
            items = confirmation.item_count,
            total = %confirmation.total_value,
            "Checkout confirmed"
        );
        record_checkout_completed(
            confirmation.item_count,
            confirmation.total_value.to_f64().unwrap_or_default(),
        );

        Ok(confirmation)
    }
}
