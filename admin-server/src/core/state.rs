use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{SqliteRankStore, SqliteVariationStore};
use crate::ordering::{Grouper, Sequencer, WriteMode};
use crate::utils::AppError;
use sqlx::SqlitePool;

/// 服务器状态 - 持有配置与数据库连接池
///
/// Clone 只复制连接池句柄，成本极低。排序引擎按请求构造，绑定到
/// 单个集合 (整个目录、一个管理组的支付方式、一个菜单项的规格)。
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
}

impl ServerState {
    /// Open the configured database and build the state
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::new(config.clone(), db))
    }

    pub fn new(config: Config, db: DbService) -> Self {
        Self { config, db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn write_mode(&self) -> WriteMode {
        self.config.write_mode
    }

    /// Sequencer over the whole catalog
    pub fn menu_item_sequencer(&self) -> Sequencer<SqliteRankStore> {
        Sequencer::new(
            SqliteRankStore::menu_items(self.db.pool.clone()),
            self.write_mode(),
        )
    }

    /// Sequencer over the payment methods of one admin group
    pub fn payment_method_sequencer(&self, admin_group_id: i64) -> Sequencer<SqliteRankStore> {
        Sequencer::new(
            SqliteRankStore::payment_methods(self.db.pool.clone(), admin_group_id),
            self.write_mode(),
        )
    }

    /// Grouper over the variations of one menu item
    pub fn variation_grouper(&self, menu_item_id: i64) -> Grouper<SqliteVariationStore> {
        Grouper::new(
            SqliteVariationStore::new(self.db.pool.clone(), menu_item_id),
            self.write_mode(),
        )
    }
}
