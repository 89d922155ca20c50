//! VBR 头解析.
//!
//! MPEG 音频首帧中可能携带两类互斥的 VBR 头: Fraunhofer 的 VBRI 与
//! LAME 的 Xing/Info. 标记的定位由调用方 (帧扫描器) 负责, 这里只根据
//! 已读取的 4 字节标记分派到对应的解析器.

pub mod vbri;
pub mod xing;

use vbri_core::{VbriError, VbriResult};

use crate::io::IoContext;

pub use vbri::{TocEntryWidth, VBRI_TAG, VbriHeader};
pub use xing::{INFO_TAG, XING_TAG, XingHeader};

/// 已解析的 VBR 头
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VbrHeader {
    /// Fraunhofer IIS VBRI 头
    Vbri(VbriHeader),
    /// Xing/Info 头
    Xing(XingHeader),
}

impl VbrHeader {
    /// 根据标记解析紧随其后的载荷
    ///
    /// 游标应位于标记之后的第一个字节. 未知标记返回 [`VbriError::InvalidData`],
    /// 且不会读取任何数据.
    pub fn parse(tag: [u8; 4], io: &mut IoContext) -> VbriResult<Self> {
        match tag {
            VBRI_TAG => Ok(Self::Vbri(VbriHeader::parse(io)?)),
            XING_TAG | INFO_TAG => Ok(Self::Xing(XingHeader::parse(io, tag)?)),
            _ => Err(VbriError::InvalidData(format!(
                "未知的 VBR 头标记: {tag:02X?}"
            ))),
        }
    }

    /// 标记名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vbri(_) => "VBRI",
            Self::Xing(x) if x.is_info() => "Info",
            Self::Xing(_) => "Xing",
        }
    }

    /// 总帧数 (Xing 头可能缺省)
    pub fn total_frames(&self) -> Option<u32> {
        match self {
            Self::Vbri(v) => Some(v.total_frames()),
            Self::Xing(x) => x.total_frames(),
        }
    }

    /// 流总字节数 (Xing 头可能缺省)
    pub fn total_bytes(&self) -> Option<u32> {
        match self {
            Self::Vbri(v) => Some(v.total_bytes()),
            Self::Xing(x) => x.total_bytes(),
        }
    }

    /// 载荷长度 (不含标记)
    pub fn header_length(&self) -> u64 {
        match self {
            Self::Vbri(v) => v.header_length(),
            Self::Xing(x) => x.header_length(),
        }
    }

    /// 播放进度对应的字节偏移
    pub fn byte_offset_for_fraction(&self, fraction: f64) -> Option<u64> {
        match self {
            Self::Vbri(v) => v.byte_offset_for_fraction(fraction),
            Self::Xing(x) => x.byte_offset_for_fraction(fraction),
        }
    }
}
