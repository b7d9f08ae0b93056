//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型 (from shared::error)
//! - [`ErrorCode`] - 统一错误码
//! - 日志初始化

pub mod logger;

pub use shared::error::{AppError, AppResult, ErrorCode};
