//! Xing/Info VBR 头解析.
//!
//! LAME 等编码器写入的 Xing 头 (CBR 文件中标记为 `Info`), 标记之后:
//! ```text
//! flags (u32 BE)
//! [frames  (u32 BE)]  flags & 0x1
//! [bytes   (u32 BE)]  flags & 0x2
//! [toc     (100 B)]   flags & 0x4
//! [quality (u32 BE)]  flags & 0x8
//! ```

use log::debug;
use vbri_core::{VbriError, VbriResult};

use crate::io::IoContext;

/// Xing 标记 (VBR)
pub const XING_TAG: [u8; 4] = *b"Xing";

/// Info 标记 (CBR)
pub const INFO_TAG: [u8; 4] = *b"Info";

const FLAG_FRAMES: u32 = 0x1;
const FLAG_BYTES: u32 = 0x2;
const FLAG_TOC: u32 = 0x4;
const FLAG_QUALITY: u32 = 0x8;

/// Xing TOC 条目数 (每 1% 播放进度一个)
pub const XING_TOC_LEN: usize = 100;

/// Xing/Info 头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XingHeader {
    is_info: bool,
    flags: u32,
    total_frames: Option<u32>,
    total_bytes: Option<u32>,
    toc: Option<[u8; XING_TOC_LEN]>,
    quality: Option<u32>,
    header_length: u64,
}

impl XingHeader {
    /// 解析标记之后的 Xing/Info 载荷, `tag` 为已读取的 4 字节标记
    pub fn parse(io: &mut IoContext, tag: [u8; 4]) -> VbriResult<Self> {
        let is_info = match tag {
            XING_TAG => false,
            INFO_TAG => true,
            _ => {
                return Err(VbriError::InvalidData(format!(
                    "Xing: 未知标记 {:?}",
                    String::from_utf8_lossy(&tag)
                )));
            }
        };

        let start = io.position();
        let flags = io.read_u32_be()?;

        let total_frames = if flags & FLAG_FRAMES != 0 {
            Some(io.read_u32_be()?)
        } else {
            None
        };
        let total_bytes = if flags & FLAG_BYTES != 0 {
            Some(io.read_u32_be()?)
        } else {
            None
        };
        let toc = if flags & FLAG_TOC != 0 {
            let mut buf = [0u8; XING_TOC_LEN];
            io.read_exact(&mut buf)?;
            Some(buf)
        } else {
            None
        };
        let quality = if flags & FLAG_QUALITY != 0 {
            Some(io.read_u32_be()?)
        } else {
            None
        };

        let header_length = io.position() - start;
        debug!(
            "Xing: info={is_info}, flags={flags:#x}, frames={total_frames:?}, bytes={total_bytes:?}, length={header_length}"
        );

        Ok(Self {
            is_info,
            flags,
            total_frames,
            total_bytes,
            toc,
            quality,
            header_length,
        })
    }

    /// 标记是否为 `Info` (CBR 文件)
    pub fn is_info(&self) -> bool {
        self.is_info
    }

    /// 原始标志位
    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn total_frames(&self) -> Option<u32> {
        self.total_frames
    }

    pub fn total_bytes(&self) -> Option<u32> {
        self.total_bytes
    }

    /// 100 项 TOC, 第 i 项为 i% 播放进度处的字节位置 (以 1/256 文件大小为单位)
    pub fn toc(&self) -> Option<&[u8; XING_TOC_LEN]> {
        self.toc.as_ref()
    }

    pub fn quality(&self) -> Option<u32> {
        self.quality
    }

    /// 本次解析从游标消耗的字节数 (不含标记)
    pub fn header_length(&self) -> u64 {
        self.header_length
    }

    /// 播放进度 (0.0 ~ 1.0) 对应的字节偏移
    ///
    /// 缺少 TOC 或总字节数时返回 `None`. 相邻两项之间线性插值,
    /// 最后一项与 256 (文件末尾) 之间插值.
    pub fn byte_offset_for_fraction(&self, fraction: f64) -> Option<u64> {
        let toc = self.toc.as_ref()?;
        let total_bytes = self.total_bytes?;
        if fraction.is_nan() {
            return None;
        }

        let percent = fraction.clamp(0.0, 1.0) * 100.0;
        let index = (percent as usize).min(XING_TOC_LEN - 1);
        let lower = f64::from(toc[index]);
        let upper = if index < XING_TOC_LEN - 1 {
            f64::from(toc[index + 1])
        } else {
            256.0
        };
        let scaled = lower + (upper - lower) * (percent - index as f64);
        Some((scaled / 256.0 * f64::from(total_bytes)) as u64)
    }
}
