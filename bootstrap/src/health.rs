//! 健康检查模块
//!
//! 在 metrics 端口上提供 /health、/ready 和 /metrics。
//! 关闭开始后 /ready 返回 503，负载均衡器可以在流结束前摘除实例。

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::metrics::MetricsRecorder;
use crate::shutdown::ShutdownController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Up,
    Down,
    Draining,
}

/// 单个组件的检查结果
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: Health,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Health::Up,
            message: None,
        }
    }

    pub fn down(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Health::Down,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: Health,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentHealth>,
}

impl HealthReport {
    fn from_components(components: Vec<ComponentHealth>) -> Self {
        let status = if components.iter().all(|c| c.status == Health::Up) {
            Health::Up
        } else {
            Health::Down
        };
        Self { status, components }
    }

    pub fn is_up(&self) -> bool {
        self.status == Health::Up
    }
}

/// 就绪检查项，由服务在组装时注册
#[async_trait::async_trait]
pub trait ReadinessCheck: Send + Sync {
    async fn check(&self) -> ComponentHealth;
}

#[derive(Default)]
pub struct HealthChecker {
    checks: RwLock<Vec<Arc<dyn ReadinessCheck>>>,
}

impl HealthChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, check: Arc<dyn ReadinessCheck>) {
        self.checks.write().await.push(check);
    }

    /// 运行所有已注册的就绪检查
    pub async fn readiness(&self) -> HealthReport {
        let checks = self.checks.read().await.clone();
        let mut components = Vec::with_capacity(checks.len());
        for check in checks {
            components.push(check.check().await);
        }
        HealthReport::from_components(components)
    }
}

#[derive(Clone)]
struct HealthState {
    checker: Arc<HealthChecker>,
    metrics: Arc<MetricsRecorder>,
    shutdown: ShutdownController,
}

pub struct HealthServer {
    state: HealthState,
    port: u16,
}

impl HealthServer {
    pub fn new(
        checker: Arc<HealthChecker>,
        metrics: Arc<MetricsRecorder>,
        shutdown: ShutdownController,
        port: u16,
    ) -> Self {
        Self {
            state: HealthState {
                checker,
                metrics,
                shutdown,
            },
            port,
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(liveness))
            .route("/ready", get(readiness))
            .route("/metrics", get(render_metrics))
            .with_state(self.state.clone())
    }

    /// 启动 HTTP 服务器，直到收到关闭信号
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, "Health check HTTP server starting");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(self.state.shutdown.wait())
            .await
    }
}

/// 进程存活即返回 200，不检查依赖
async fn liveness() -> impl IntoResponse {
    Json(HealthReport {
        status: Health::Up,
        components: vec![],
    })
}

async fn readiness(State(state): State<HealthState>) -> impl IntoResponse {
    if state.shutdown.is_shutdown() {
        let report = HealthReport {
            status: Health::Draining,
            components: vec![],
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(report));
    }

    let report = state.checker.readiness().await;
    let code = if report.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report))
}

async fn render_metrics(State(state): State<HealthState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
