//! API layer - gRPC service and REST adapter

pub mod conversions;
pub mod grpc;
pub mod rest;

pub use grpc::HotelServiceImpl;

pub mod proto {
    tonic::include_proto!("hotel.v1");
}
