use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 账单汇总方式
///
/// `PerRow` sums the food price once per order item row regardless of
/// quantity, which is what the deployed front ends currently display.
/// `PriceTimesQuantity` multiplies by the item quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillingMode {
    #[default]
    PerRow,
    PriceTimesQuantity,
}

impl std::str::FromStr for BillingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_row" | "row" => Ok(Self::PerRow),
            "price_times_quantity" | "quantity" => Ok(Self::PriceTimesQuantity),
            other => Err(format!("unknown billing mode: {other}")),
        }
    }
}

/// Store engine selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatabaseKind {
    /// Embedded RocksDB under `<work_dir>/database`
    #[default]
    RocksDb,
    /// In-memory store (tests, demos)
    Memory,
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | DATABASE | rocksdb | `rocksdb` 或 `memory` |
/// | DB_NAMESPACE | restaurant | SurrealDB namespace |
/// | DB_NAME | main | SurrealDB database |
/// | STORE_TIMEOUT_MS | 100000 | 单次存储操作超时(毫秒) |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | BILLING_MODE | per_row | 账单汇总方式 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志文件目录 (不设置则只输出到控制台) |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    pub database: DatabaseKind,
    pub db_namespace: String,
    pub db_name: String,
    /// Ceiling for every single store call
    pub store_timeout_ms: u64,
    /// Ceiling for a whole HTTP request
    pub request_timeout_ms: u64,
    pub billing_mode: BillingMode,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let database = match std::env::var("DATABASE").as_deref() {
            Ok("memory") | Ok("mem") => DatabaseKind::Memory,
            _ => DatabaseKind::RocksDb,
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 8080),
            database,
            db_namespace: std::env::var("DB_NAMESPACE").unwrap_or_else(|_| "restaurant".into()),
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "main".into()),
            store_timeout_ms: env_or("STORE_TIMEOUT_MS", 100_000),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            billing_mode: env_or("BILLING_MODE", BillingMode::PerRow),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// In-memory configuration with a fixed JWT secret
    ///
    /// 常用于测试场景
    pub fn for_testing() -> Self {
        Self {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            http_port: 0,
            database: DatabaseKind::Memory,
            db_namespace: "test".into(),
            db_name: "test".into(),
            store_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
            billing_mode: BillingMode::PerRow,
            jwt: JwtConfig::for_testing(),
            environment: "test".into(),
            log_level: "debug".into(),
            log_dir: None,
        }
    }

    /// Database directory: `work_dir/database`
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_mode_parse() {
        assert_eq!("per_row".parse::<BillingMode>(), Ok(BillingMode::PerRow));
        assert_eq!(
            "Price_Times_Quantity".parse::<BillingMode>(),
            Ok(BillingMode::PriceTimesQuantity)
        );
        assert!("sum".parse::<BillingMode>().is_err());
    }

    #[test]
    fn test_testing_config_uses_memory() {
        let config = Config::for_testing();
        assert_eq!(config.database, DatabaseKind::Memory);
        assert!(config.database_dir().ends_with("database"));
        assert!(!config.is_production());
    }
}
