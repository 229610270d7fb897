//! Checkout session state machine
//!
//! A session lives for exactly one client-streaming call:
//!
//! ```text
//! Open --accept--> Accumulating --accept--> Accumulating
//!   |                   |
//!   +---end_of_input----+--> Closing --confirm--> Closed
//!   |                   |
//!   +------abort--------+--> Closed (no confirmation)
//! ```

use chrono::{DateTime, Local};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use stay_errors::{AppError, AppResult};
use tracing::warn;

use super::clock::format_timestamp;

pub const CONFIRMATION_PREFIX: &str = "PKG";

/// A priced item streamed by the client. The price is trusted as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    id: String,
    kind: String,
    price: Decimal,
}

impl CartItem {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, price: Decimal) -> AppResult<Self> {
        let id = id.into();
        if price.is_sign_negative() && !price.is_zero() {
            return Err(AppError::validation(format!(
                "cart item {} has negative price {}",
                id, price
            )));
        }
        Ok(Self {
            id,
            kind: kind.into(),
            price,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Open,
    Accumulating,
    Closing,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseConfirmation {
    pub success: bool,
    pub confirmation_code: String,
    pub total_value: Decimal,
    pub item_count: usize,
    pub errors: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug)]
pub struct CheckoutSession {
    state: CheckoutState,
    items: Vec<CartItem>,
    running_total: Decimal,
}

impl CheckoutSession {
    pub fn open() -> Self {
        Self {
            state: CheckoutState::Open,
            items: Vec::new(),
            running_total: Decimal::ZERO,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn running_total(&self) -> Decimal {
        self.running_total
    }

    /// Appends an item and adds its price to the running total.
    ///
    /// An item that would overflow the total is rejected and not appended.
    pub fn accept(&mut self, item: CartItem) -> AppResult<()> {
        match self.state {
            CheckoutState::Open | CheckoutState::Accumulating => {
                let total = self.running_total.checked_add(item.price).ok_or_else(|| {
                    AppError::validation(format!(
                        "cart item {} overflows the running total {}",
                        item.id, self.running_total
                    ))
                })?;
                self.running_total = total;
                self.items.push(item);
                self.state = CheckoutState::Accumulating;
                Ok(())
            }
            state => Err(AppError::failed_precondition(format!(
                "checkout session cannot accept items in state {:?}",
                state
            ))),
        }
    }

    /// The client signalled it has no more items.
    pub fn end_of_input(&mut self) -> AppResult<()> {
        match self.state {
            CheckoutState::Open | CheckoutState::Accumulating => {
                self.state = CheckoutState::Closing;
                Ok(())
            }
            state => Err(AppError::failed_precondition(format!(
                "end of input observed twice (state {:?})",
                state
            ))),
        }
    }

    /// Derives the single confirmation for this session.
    ///
    /// Only valid after [`end_of_input`](Self::end_of_input); a second call fails,
    /// so a session can never confirm twice.
    pub fn confirm(&mut self, now: DateTime<Local>) -> AppResult<PurchaseConfirmation> {
        if self.state != CheckoutState::Closing {
            return Err(AppError::failed_precondition(format!(
                "cannot confirm checkout in state {:?}",
                self.state
            )));
        }
        self.state = CheckoutState::Closed;

        let item_count = self.items.len();
        Ok(PurchaseConfirmation {
            success: true,
            confirmation_code: confirmation_code(&now, item_count, self.running_total),
            total_value: self.running_total,
            item_count,
            errors: Vec::new(),
            timestamp: format_timestamp(&now),
        })
    }

    /// Discards the session without a confirmation. Returns how many items were dropped.
    pub fn abort(mut self) -> usize {
        self.state = CheckoutState::Closed;
        self.items.len()
    }
}

impl Drop for CheckoutSession {
    fn drop(&mut self) {
        if self.state != CheckoutState::Closed {
            warn!(
                state = ?self.state,
                items = self.items.len(),
                "Checkout session dropped before completion, discarding items"
            );
        }
    }
}

/// `PKG` + unix seconds mod 10000 + item count (2 digits) + whole total mod 100 (2 digits).
///
/// Not unique across concurrent sessions.
pub fn confirmation_code(now: &DateTime<Local>, item_count: usize, total: Decimal) -> String {
    let seconds = now.timestamp().rem_euclid(10_000);
    let whole_total = (total.trunc() % Decimal::ONE_HUNDRED).to_u8().unwrap_or(0);
    format!(
        "{}{}{:02}{:02}",
        CONFIRMATION_PREFIX, seconds, item_count, whole_total
    )
}
