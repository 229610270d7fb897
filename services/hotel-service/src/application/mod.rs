//! Application layer - 三个 RPC 的用例处理器

pub mod chat;
pub mod checkout;
pub mod search;

pub use chat::{ChatHandler, ReplyStream};
pub use checkout::CheckoutHandler;
pub use search::SearchHandler;
