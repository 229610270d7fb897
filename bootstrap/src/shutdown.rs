//! Graceful Shutdown

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Shutdown 控制器
///
/// 触发后所有等待者（包括之后才开始等待的）都会立即返回
#[derive(Clone)]
pub struct ShutdownController {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// 触发关闭
    pub fn shutdown(&self) {
        info!("Triggering shutdown");
        self.tx.send_replace(true);
    }

    /// 是否已触发关闭
    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }

    /// 等待关闭信号
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // Sender 与控制器同生命周期，wait_for 只会在触发后返回
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
