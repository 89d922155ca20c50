//! VBRI 头解析集成测试.
//!
//! 在内存中构造 VBRI 载荷, 经 `IoContext` 读取, 验证字段、
//! TOC 缩放、头部长度与错误路径.

use vbri::core::VbriError;
use vbri::format::io::IoContext;
use vbri::format::vbr::vbri::VBRI_FIXED_LEN;
use vbri::format::{VbrHeader, VbriHeader};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 辅助: 按给定宽度编码原始 TOC 条目
fn encode_entries(raw: &[u32], size: u16) -> Vec<u8> {
    let mut out = Vec::new();
    for &v in raw {
        match size {
            1 => out.push(v as u8),
            2 => out.extend_from_slice(&(v as u16).to_be_bytes()),
            4 => out.extend_from_slice(&v.to_be_bytes()),
            _ => unreachable!(),
        }
    }
    out
}

/// 辅助: 构造 VBRI 载荷 (不含标记)
fn build_payload(scale: u16, size: u16, frames_per_entry: u16, raw: &[u32]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&2u16.to_be_bytes());
    data.extend_from_slice(&1105u16.to_be_bytes());
    data.extend_from_slice(&78u16.to_be_bytes());
    data.extend_from_slice(&3_456_789u32.to_be_bytes());
    data.extend_from_slice(&8_765u32.to_be_bytes());
    data.extend_from_slice(&(raw.len() as u16).to_be_bytes());
    data.extend_from_slice(&scale.to_be_bytes());
    data.extend_from_slice(&size.to_be_bytes());
    data.extend_from_slice(&frames_per_entry.to_be_bytes());
    data.extend(encode_entries(raw, size));
    data
}

fn parse(data: Vec<u8>) -> Result<VbriHeader, VbriError> {
    VbriHeader::parse(&mut IoContext::from_bytes(data))
}

#[test]
fn test_参考载荷() {
    init_logger();
    let data = vec![
        0x00, 0x01, 0x00, 0x02, 0x00, 0x32, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x64, 0x00,
        0x02, 0x00, 0x0A, 0x00, 0x02, 0x00, 0x01, 0x00, 0x05, 0x00, 0x0A,
    ];
    let header = parse(data).unwrap();

    assert_eq!(header.version(), 1);
    assert_eq!(header.delay(), 2);
    assert_eq!(header.quality_indicator(), 50);
    assert_eq!(header.total_bytes(), 4096);
    assert_eq!(header.total_frames(), 100);
    assert_eq!(header.toc_frames_per_entry(), 1);
    assert_eq!(header.toc(), &[50, 100]);
    assert_eq!(header.header_length(), 26);
}

#[test]
fn test_头部长度与_toc_缩放_各宽度() {
    init_logger();
    let raw = [0u32, 1, 7, 200, 255];
    for (size, scale) in [(1u16, 1u16), (2, 3), (4, 65535)] {
        for count in [0usize, 1, raw.len()] {
            let data = build_payload(scale, size, 4, &raw[..count]);
            let header = parse(data).unwrap();

            assert_eq!(
                header.header_length(),
                VBRI_FIXED_LEN + count as u64 * u64::from(size),
                "size={size}, count={count}"
            );
            let expected: Vec<u64> = raw[..count]
                .iter()
                .map(|&v| u64::from(v) * u64::from(scale))
                .collect();
            assert_eq!(header.toc(), expected.as_slice());
        }
    }
}

#[test]
fn test_宽位条目不丢失高位() {
    let raw = [0x0001_0000u32, 0xFFFF_FFFF];
    let header = parse(build_payload(2, 4, 1, &raw)).unwrap();
    assert_eq!(header.toc(), &[0x0002_0000, 0x1_FFFF_FFFE]);
}

#[test]
fn test_解析结果确定() {
    let data = build_payload(9, 2, 16, &[10, 20, 30]);
    let a = parse(data.clone()).unwrap();
    let b = parse(data).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_不支持的条目宽度() {
    init_logger();
    for size in [0u16, 3, 8] {
        let mut data = build_payload(1, 1, 1, &[1, 2, 3]);
        data[18..20].copy_from_slice(&size.to_be_bytes());
        let mut io = IoContext::from_bytes(data);

        let err = VbriHeader::parse(&mut io).unwrap_err();
        assert!(matches!(err, VbriError::UnsupportedEntryWidth(s) if s == size));
        assert_eq!(io.position(), VBRI_FIXED_LEN);
    }
}

#[test]
fn test_任意位置截断() {
    let data = build_payload(1, 2, 1, &[1, 2, 3, 4]);
    for len in 0..data.len() {
        let err = parse(data[..len].to_vec()).unwrap_err();
        assert!(
            matches!(err, VbriError::TruncatedStream),
            "长度 {len} 应返回截断错误"
        );
    }
    assert!(parse(data).is_ok());
}

#[test]
fn test_经标记分派与_seek() {
    let mut data = b"VBRI".to_vec();
    data.extend(build_payload(512, 2, 100, &[4, 4, 8]));
    let mut io = IoContext::from_bytes(data);
    let tag = io.read_tag().unwrap();

    let header = VbrHeader::parse(tag, &mut io).unwrap();
    assert_eq!(header.name(), "VBRI");
    assert_eq!(header.total_frames(), Some(8_765));
    assert_eq!(header.header_length(), 22 + 6);
    assert_eq!(io.position(), 4 + 22 + 6);

    let VbrHeader::Vbri(ref vbri) = header else {
        panic!("应为 VBRI 头");
    };
    // 每段 100 帧, 段大小 2048/2048/4096 字节
    assert_eq!(vbri.byte_offset_for_frame(150), Some(2048 + 1024));
    assert_eq!(vbri.byte_offset_for_frame(300), Some(8192));
}
