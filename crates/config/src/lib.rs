//! stay-config - 配置加载库

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub grpc_port: u16,
    /// REST 适配器端口，0 表示不启动
    pub rest_port: u16,
    /// 健康检查与 Prometheus 端口
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            grpc_port: 50052,
            rest_port: 5002,
            metrics_port: 8001,
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// 结账流配置
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    /// 模拟支付处理的固定延迟
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
}

fn default_processing_delay_ms() -> u64 {
    1000
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
        }
    }
}

/// 话题关键词（小写子串）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub hospitality: Vec<String>,
    pub package: Vec<String>,
    pub flight: Vec<String>,
    /// 视为 "general" 的 context 取值
    pub general_contexts: Vec<String>,
    /// 视为 "flight" 的 context 取值
    pub flight_contexts: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            hospitality: strings(&[
                "hotel", "hoteis", "hotéis", "hospedagem", "quarto", "quartos", "pousada",
                "resort", "hostel",
            ]),
            package: strings(&["pacote", "pacotes", "combo"]),
            flight: strings(&[
                "voo", "voos", "voar", "aereo", "aéreo", "aviao", "avião", "passagem",
                "passagens",
            ]),
            general_contexts: strings(&["general", "geral"]),
            flight_contexts: strings(&["flight", "voo"]),
        }
    }
}

/// 聊天流配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// 每条回复前的固定思考时间
    pub think_time_ms: u64,
    pub sender: String,
    /// 出站消息的 context 标签
    pub domain_tag: String,
    pub keywords: KeywordConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            think_time_ms: 500,
            sender: "suporte".to_string(),
            domain_tag: "hotel".to_string(),
            keywords: KeywordConfig::default(),
        }
    }
}

/// 搜索配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 动态价格波动幅度（0.6 即 ±30%）
    pub price_variation: f64,
    pub availability_rate: f64,
    pub max_delay_seconds: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            price_variation: 0.6,
            availability_rate: 0.9,
            max_delay_seconds: 30,
        }
    }
}

/// 库存生成配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// 固定种子，未设置时使用系统熵
    pub seed: Option<u64>,
    pub min_hotels: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            min_hotels: 1000,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
}

fn default_app_name() -> String {
    "hotel-service".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.search.availability_rate) {
            return Err(ConfigError::Invalid(format!(
                "search.availability_rate must be within [0, 1], got {}",
                self.search.availability_rate
            )));
        }
        if !(0.0..2.0).contains(&self.search.price_variation) {
            return Err(ConfigError::Invalid(format!(
                "search.price_variation must be within [0, 2), got {}",
                self.search.price_variation
            )));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
