//! Metrics 模块
//!
//! 提供 Prometheus metrics 导出

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Metrics 记录器
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 安装全局 Prometheus recorder
    pub fn install() -> Result<Self, BuildError> {
        let handle = stay_telemetry::init_metrics()?;
        Ok(Self { handle })
    }

    /// 创建未安装为全局 recorder 的实例（测试或重复初始化时使用）
    pub fn detached() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        Self {
            handle: recorder.handle(),
        }
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 记录 gRPC 请求
pub fn record_grpc_request(service: &str, method: &str, status: &str, duration_ms: f64) {
    let labels = [
        ("service", service.to_string()),
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];

    counter!("grpc_requests_total", &labels).increment(1);
    histogram!("grpc_request_duration_ms", &labels).record(duration_ms);
}

/// 记录 gRPC 流消息
pub fn record_grpc_stream_message(service: &str, method: &str, direction: &str) {
    let labels = [
        ("service", service.to_string()),
        ("method", method.to_string()),
        ("direction", direction.to_string()),
    ];

    counter!("grpc_stream_messages_total", &labels).increment(1);
}

/// 记录 HTTP 请求
pub fn record_http_request(path: &str, status: u16, duration_ms: f64) {
    let labels = [
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_ms", &labels).record(duration_ms);
}
