//! Fraunhofer IIS VBRI 头解析.
//!
//! VBRI 头位于 MPEG 音频首帧内 (帧头之后固定 32 字节处), 由外部扫描器
//! 定位并跳过 4 字节 `VBRI` 标记后, 游标指向的载荷结构 (全部大端):
//! ```text
//! 偏移  大小  字段
//!  0     2    version              编码器版本
//!  2     2    delay                起始延迟
//!  4     2    quality_indicator    质量 (0 最好, 100 最差)
//!  6     4    total_bytes          流总字节数
//! 10     4    total_frames         总帧数
//! 14     2    toc_entry_count      TOC 条目数
//! 16     2    toc_entry_scale      TOC 缩放因子
//! 18     2    toc_entry_size       TOC 条目宽度 (1/2/4 字节)
//! 20     2    toc_frames_per_entry 每个 TOC 条目覆盖的帧数
//! 22     N    toc                  toc_entry_count × toc_entry_size 字节
//! ```

use byteorder::{BigEndian, ByteOrder};
use log::{debug, warn};
use vbri_core::{VbriError, VbriResult};

use crate::io::IoContext;

/// VBRI 标记
pub const VBRI_TAG: [u8; 4] = *b"VBRI";

/// 固定前缀长度 (TOC 之前的字段总字节数)
pub const VBRI_FIXED_LEN: u64 = 22;

/// TOC 条目宽度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocEntryWidth {
    /// 1 字节
    U8,
    /// 2 字节大端
    U16,
    /// 4 字节大端
    U32,
}

impl TocEntryWidth {
    /// 由码流中的 `toc_entry_size` 字段映射, 仅接受 1/2/4
    pub fn from_size(size: u16) -> Option<Self> {
        match size {
            1 => Some(Self::U8),
            2 => Some(Self::U16),
            4 => Some(Self::U32),
            _ => None,
        }
    }

    /// 每个条目的字节数
    pub fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// 按码流顺序解码原始 TOC
    ///
    /// `raw` 的长度必须是条目宽度的整数倍, 多余的尾部字节被忽略.
    pub fn decode(self, raw: &[u8]) -> Vec<u32> {
        raw.chunks_exact(self.bytes())
            .map(|chunk| match self {
                Self::U8 => u32::from(chunk[0]),
                Self::U16 => u32::from(BigEndian::read_u16(chunk)),
                Self::U32 => BigEndian::read_u32(chunk),
            })
            .collect()
    }
}

/// VBRI 头
///
/// 一次解析得到的不可变值. TOC 条目已乘以缩放因子, 以 `u64` 存储,
/// 最大值 (2^32-1)×(2^16-1) 不会溢出.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VbriHeader {
    version: u16,
    delay: u16,
    quality_indicator: u16,
    total_bytes: u32,
    total_frames: u32,
    toc_frames_per_entry: u16,
    toc: Vec<u64>,
    header_length: u64,
}

impl VbriHeader {
    /// 从游标当前位置解析 VBRI 载荷 (`VBRI` 标记之后的第一个字节)
    ///
    /// 任一字段或 TOC 区域数据不足时返回 [`VbriError::TruncatedStream`];
    /// 条目宽度不受支持时返回 [`VbriError::UnsupportedEntryWidth`],
    /// 此时游标停在固定前缀末尾, 不会读取任何 TOC 字节.
    pub fn parse(io: &mut IoContext) -> VbriResult<Self> {
        let start = io.position();

        let version = io.read_u16_be()?;
        let delay = io.read_u16_be()?;
        let quality_indicator = io.read_u16_be()?;
        let total_bytes = io.read_u32_be()?;
        let total_frames = io.read_u32_be()?;

        let toc_entry_count = io.read_u16_be()?;
        let toc_entry_scale = io.read_u16_be()?;
        let toc_entry_size = io.read_u16_be()?;
        let toc_frames_per_entry = io.read_u16_be()?;

        let width = TocEntryWidth::from_size(toc_entry_size).ok_or_else(|| {
            warn!("VBRI: 不支持的 TOC 条目宽度 {toc_entry_size}");
            VbriError::UnsupportedEntryWidth(toc_entry_size)
        })?;

        let raw = io.read_bytes(usize::from(toc_entry_count) * width.bytes())?;
        let scale = u64::from(toc_entry_scale);
        let toc: Vec<u64> = width
            .decode(&raw)
            .into_iter()
            .map(|entry| u64::from(entry) * scale)
            .collect();

        let header_length = io.position() - start;

        if quality_indicator > 100 {
            debug!("VBRI: 质量指标 {quality_indicator} 超出 0..=100, 按原值保留");
        }
        debug!(
            "VBRI: version={version}, delay={delay}, frames={total_frames}, bytes={total_bytes}, \
             toc={toc_entry_count}×{toc_entry_size}B (scale={toc_entry_scale}), length={header_length}"
        );

        Ok(Self {
            version,
            delay,
            quality_indicator,
            total_bytes,
            total_frames,
            toc_frames_per_entry,
            toc,
            header_length,
        })
    }

    /// 编码器版本
    pub fn version(&self) -> u16 {
        self.version
    }

    /// 起始延迟
    pub fn delay(&self) -> u16 {
        self.delay
    }

    /// 质量指标, 约定 0 (最好) 到 100 (最差), 不做范围校验
    pub fn quality_indicator(&self) -> u16 {
        self.quality_indicator
    }

    /// 流总字节数
    pub fn total_bytes(&self) -> u32 {
        self.total_bytes
    }

    /// 总帧数
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// 每个 TOC 条目覆盖的帧数
    pub fn toc_frames_per_entry(&self) -> u16 {
        self.toc_frames_per_entry
    }

    /// 缩放后的 TOC, 顺序即播放顺序
    pub fn toc(&self) -> &[u64] {
        &self.toc
    }

    /// 本次解析从游标消耗的字节数
    pub fn header_length(&self) -> u64 {
        self.header_length
    }

    // ========================
    // seek 辅助
    // ========================

    /// 帧所在的 TOC 条目索引
    ///
    /// TOC 为空、`toc_frames_per_entry` 为 0 或帧超出表尾时返回 `None`.
    pub fn toc_index_for_frame(&self, frame: u64) -> Option<usize> {
        let per_entry = u64::from(self.toc_frames_per_entry);
        if per_entry == 0 {
            return None;
        }
        let index = usize::try_from(frame / per_entry).ok()?;
        (index < self.toc.len()).then_some(index)
    }

    /// 帧在音频数据区中的字节偏移
    ///
    /// 每个 TOC 条目是连续 `toc_frames_per_entry` 帧所占的字节数.
    /// 偏移 = 之前各段之和 + 所在段内按帧数线性插值; 超出表尾的帧
    /// 取全部条目之和.
    pub fn byte_offset_for_frame(&self, frame: u64) -> Option<u64> {
        let per_entry = u64::from(self.toc_frames_per_entry);
        if per_entry == 0 || self.toc.is_empty() {
            return None;
        }

        match self.toc_index_for_frame(frame) {
            Some(index) => {
                let base: u64 = self.toc[..index].iter().sum();
                let within = frame % per_entry;
                Some(base + self.toc[index] * within / per_entry)
            }
            None => Some(self.toc.iter().sum()),
        }
    }

    /// 播放进度 (0.0 ~ 1.0, 超出范围会被截断) 对应的字节偏移
    pub fn byte_offset_for_fraction(&self, fraction: f64) -> Option<u64> {
        if fraction.is_nan() {
            return None;
        }
        let frame = (fraction.clamp(0.0, 1.0) * f64::from(self.total_frames)) as u64;
        self.byte_offset_for_frame(frame)
    }
}
