//! stay-bootstrap - 统一服务启动骨架
//!
//! 所有服务复用的启动逻辑

pub mod health;
pub mod metrics;
mod reflection;
mod runtime;
mod shutdown;
mod starter;

pub use health::{ComponentHealth, Health, HealthChecker, HealthReport, ReadinessCheck};
pub use reflection::*;
pub use runtime::*;
pub use shutdown::*;
pub use starter::*;
