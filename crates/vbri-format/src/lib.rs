//! # vbri-format
//!
//! MPEG 音频首帧 VBR 头 (VBRI, Xing/Info) 的解析库.
//!
//! 调用方负责在码流中定位标记, 然后把指向标记之后第一个字节的
//! [`IoContext`] 交给解析器:
//!
//! ```rust
//! use vbri_format::{IoContext, VbriHeader};
//!
//! let payload = vec![
//!     0x00, 0x01, 0x00, 0x02, 0x00, 0x32, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x64,
//!     0x00, 0x02, 0x00, 0x0A, 0x00, 0x02, 0x00, 0x01, 0x00, 0x05, 0x00, 0x0A,
//! ];
//! let mut io = IoContext::from_bytes(payload);
//! let header = VbriHeader::parse(&mut io).unwrap();
//! assert_eq!(header.toc(), &[50, 100]);
//! assert_eq!(header.header_length(), 26);
//! ```

pub mod io;
pub mod vbr;

// 重导出常用类型
pub use io::{IoBackend, IoContext};
pub use vbr::{TocEntryWidth, VbrHeader, VbriHeader, XingHeader};
