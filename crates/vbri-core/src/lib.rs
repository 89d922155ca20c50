//! # vbri-core
//!
//! VBR 头解析库的核心 crate, 提供各成员共用的错误类型.

pub mod error;

// 重导出常用类型
pub use error::{VbriError, VbriResult};
