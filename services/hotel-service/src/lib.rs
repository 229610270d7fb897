//! hotel-service - 酒店搜索、结账与客服聊天

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use api::proto;

/// File descriptor set for gRPC reflection
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("hotel_service_descriptor");
