//! # vbri
//!
//! 纯 Rust 实现的 MPEG 音频 VBR 头解析库.
//!
//! 解析 MPEG 音频首帧中的 Fraunhofer IIS VBRI 头 (以及 LAME 的 Xing/Info 头),
//! 得到总帧数、总字节数与用于按时间定位字节偏移的 TOC.
//!
//! # 快速开始
//!
//! ```rust
//! use vbri::format::{IoContext, VbrHeader};
//!
//! let mut payload = vec![0u8; 22];
//! payload[19] = 1; // 条目宽度 1 字节, 无 TOC 条目
//! let mut io = IoContext::from_bytes(payload);
//! let header = VbrHeader::parse(*b"VBRI", &mut io).unwrap();
//! assert_eq!(header.header_length(), 22);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `vbri-core` | 错误类型 |
//! | `vbri-format` | 字节游标与 VBR 头解析 |

/// 错误类型
pub use vbri_core as core;

/// 字节游标与 VBR 头解析
pub use vbri_format as format;
