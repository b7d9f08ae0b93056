//! Catalog Admin Server - 游戏充值目录管理后台
//!
//! # 架构概述
//!
//! - **排序引擎** (`ordering`): 平铺集合的稠密排序与规格分组
//! - **数据库** (`db`): SQLite (sqlx) 存储与迁移
//! - **HTTP API** (`api`): RESTful 接口，覆盖全部排序与分组操作
//!
//! # 模块结构
//!
//! ```text
//! admin-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── ordering/      # Sequencer / Grouper / 乐观视图
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接池、仓储
//! └── utils/         # 日志、错误类型
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod ordering;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env 并初始化日志
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#
    );
}
