//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use stay_config::AppConfig;
use stay_errors::AppResult;
use tonic::transport::Server;
use tonic::transport::server::Router as GrpcRouter;
use tracing::{error, info, warn};

use crate::health::{HealthChecker, HealthServer};
use crate::metrics::MetricsRecorder;
use crate::runtime::{init_runtime, shutdown_signal};
use crate::shutdown::ShutdownController;

/// 传递给服务构建闭包的上下文
pub struct ServiceContext {
    pub config: AppConfig,
    pub health: Arc<HealthChecker>,
    pub shutdown: ShutdownController,
}

/// 服务构建闭包的产出
pub struct Services {
    pub grpc: GrpcRouter,
    /// 可选的 REST 适配器，监听 `server.rest_port`
    pub http: Option<axum::Router>,
}

impl Services {
    pub fn grpc(grpc: GrpcRouter) -> Self {
        Self { grpc, http: None }
    }

    pub fn with_http(mut self, http: axum::Router) -> Self {
        self.http = Some(http);
        self
    }
}

/// 运行 gRPC 服务
///
/// 所有服务的统一入口点。它负责：
/// 1. 加载配置
/// 2. 初始化运行时（日志、metrics）
/// 3. 启动健康检查 HTTP 服务器
/// 4. 调用用户提供的闭包构建 gRPC 服务（以及可选的 REST 路由）
/// 5. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use stay_bootstrap::{run_server, Services};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_server("config", |ctx, mut server| async move {
///         Ok(Services::grpc(server.add_service(MyServiceServer::new(MyService))))
///     })
///     .await
/// }
/// ```
pub async fn run_server<F, Fut>(
    config_dir: &str,
    service_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(ServiceContext, Server) -> Fut,
    Fut: Future<Output = AppResult<Services>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    // 3. 初始化 Metrics 记录器
    let metrics = match MetricsRecorder::install() {
        Ok(recorder) => Arc::new(recorder),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder already installed, metrics endpoint detached");
            Arc::new(MetricsRecorder::detached())
        }
    };

    let shutdown = ShutdownController::new();
    let signal_handle = tokio::spawn(shutdown_signal(shutdown.clone()));

    // 4. 启动健康检查 HTTP 服务器
    let health_checker = Arc::new(HealthChecker::new());
    let health_server = HealthServer::new(
        health_checker.clone(),
        metrics.clone(),
        shutdown.clone(),
        config.server.metrics_port,
    );
    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.serve().await {
            error!("Health server error: {}", e);
        }
    });

    let grpc_addr: SocketAddr =
        format!("{}:{}", config.server.host, config.server.grpc_port).parse()?;
    let rest_addr: SocketAddr =
        format!("{}:{}", config.server.host, config.server.rest_port).parse()?;
    let rest_enabled = config.server.rest_port != 0;

    // 5. 构建服务
    let ctx = ServiceContext {
        config,
        health: health_checker,
        shutdown: shutdown.clone(),
    };
    let services = service_builder(ctx, Server::builder()).await?;

    // 6. 启动 REST 适配器
    let rest_handle = match services.http {
        Some(app) if rest_enabled => {
            let listener = tokio::net::TcpListener::bind(rest_addr).await?;
            info!(addr = %rest_addr, "REST server starting");
            let rest_shutdown = shutdown.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, app)
                    .with_graceful_shutdown(rest_shutdown.wait())
                    .await
                {
                    error!("REST server error: {}", e);
                }
            }))
        }
        _ => None,
    };

    info!(addr = %grpc_addr, "gRPC server starting");

    // 7. 启动 gRPC 服务器
    let served = services
        .grpc
        .serve_with_shutdown(grpc_addr, shutdown.wait())
        .await;

    // 8. 清理
    shutdown.shutdown();
    signal_handle.abort();
    if let Some(handle) = rest_handle {
        let _ = handle.await;
    }
    let _ = health_handle.await;

    served?;
    info!("Service stopped");

    Ok(())
}
