//! 统一错误类型定义.
//!
//! 所有成员 crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// 统一错误类型
#[derive(Debug, Error)]
pub enum VbriError {
    /// 码流在字段或 TOC 区域读完之前结束
    #[error("码流被截断, 数据不足")]
    TruncatedStream,

    /// TOC 条目宽度不是 1/2/4 字节
    #[error("不支持的 TOC 条目宽度: {0} 字节")]
    UnsupportedEntryWidth(u16),

    /// 无效数据 (未知标签等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 统一 Result 类型
pub type VbriResult<T> = Result<T, VbriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_错误信息_条目宽度() {
        let err = VbriError::UnsupportedEntryWidth(3);
        assert_eq!(err.to_string(), "不支持的 TOC 条目宽度: 3 字节");
    }

    #[test]
    fn test_io_错误转换() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VbriError = io_err.into();
        assert!(matches!(err, VbriError::Io(_)));
    }
}
