//! Domain layer

pub mod chat;
pub mod checkout;
pub mod clock;
pub mod hotel;
pub mod repositories;
pub mod topic;

pub use chat::{
    select_reply, ChatSession, ChatState, InboundChatMessage, OutboundChatMessage, ReplyKind,
    Routed,
};
pub use checkout::{
    confirmation_code, CartItem, CheckoutSession, CheckoutState, PurchaseConfirmation,
};
pub use clock::{format_timestamp, Clock, FixedClock, SystemClock, TIMESTAMP_FORMAT};
pub use hotel::{sort_hotels, Hotel, OrderBy, SearchCriteria, SearchOutcome};
pub use repositories::InventoryProvider;
pub use topic::{Classification, TopicClassifier, TopicDomain, TopicKeywords};
