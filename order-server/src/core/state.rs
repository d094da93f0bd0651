use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::Repositories;
use crate::orders::{OrderComposer, OrderLifecycle};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 显式的依赖注入上下文：仓储、订单核心组件和 JWT 服务在启动时构造一次，
/// 之后通过 `State<ServerState>` 传给每个处理器。Clone 为浅拷贝。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 |
/// | repos | 各集合的类型化仓储 |
/// | lifecycle | 订单生命周期 (批量下单、级联删除) |
/// | composer | 订单账单视图 |
/// | jwt_service | 会话令牌服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 类型化仓储
    pub repos: Repositories,
    /// 订单生命周期管理
    pub lifecycle: OrderLifecycle,
    /// 订单聚合视图
    pub composer: OrderComposer,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 从已打开的数据库构造状态
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let repos = Repositories::new(
            db.clone(),
            Duration::from_millis(config.store_timeout_ms),
        );
        let lifecycle = OrderLifecycle::new(repos.clone());
        let composer = OrderComposer::new(repos.clone(), config.billing_mode);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            db,
            repos,
            lifecycle,
            composer,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 数据库 (RocksDB: work_dir/database，或内存)
    /// 3. 仓储与订单核心组件
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!("Failed to create work dir {}: {e}", config.work_dir))
        })?;

        let db_service = DbService::new(config).await?;
        let state = Self::new(config.clone(), db_service.db);

        tracing::info!(
            billing_mode = ?config.billing_mode,
            store_timeout_ms = config.store_timeout_ms,
            "Server state initialized"
        );
        Ok(state)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
