//! vbri-probe - VBR 头探测工具
//!
//! 读取文件指定偏移处的 VBR 头标记 (`VBRI`, `Xing`, `Info`),
//! 解析并输出其中的帧数、字节数与 TOC 信息.

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::SeekFrom;
use std::process;

use vbri_format::{IoContext, VbrHeader};

/// 无 ID3v2 标签时, MPEG-1 首帧中 VBRI 标记的位置 (帧头 4 字节 + 32 字节)
const DEFAULT_OFFSET: u64 = 36;

/// VBR 头探测工具
#[derive(Parser, Debug)]
#[command(name = "vbri-probe", version, about = "MPEG 音频 VBR 头探测工具")]
struct Cli {
    /// 输入文件路径
    input: String,

    /// VBR 头标记在文件中的字节偏移
    #[arg(long, default_value_t = DEFAULT_OFFSET)]
    offset: u64,

    /// 额外输出播放进度 (0.0 ~ 1.0) 对应的字节偏移
    #[arg(long)]
    seek: Option<f64>,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 静默模式 (只输出探测结果)
    #[arg(short, long)]
    quiet: bool,

    /// 日志详细程度 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================
// JSON 输出结构体
// ============================================================

/// 完整探测结果
#[derive(Serialize)]
struct ProbeOutput {
    filename: String,
    offset: u64,
    tag: String,
    header_length: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_frames: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_bytes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vbri: Option<VbriInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xing: Option<XingInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seek: Option<SeekInfo>,
}

/// VBRI 专有字段
#[derive(Serialize)]
struct VbriInfo {
    version: u16,
    delay: u16,
    quality_indicator: u16,
    toc_frames_per_entry: u16,
    toc: Vec<u64>,
}

/// Xing/Info 专有字段
#[derive(Serialize)]
struct XingInfo {
    flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    toc: Option<Vec<u8>>,
}

/// seek 查询结果
#[derive(Serialize)]
struct SeekInfo {
    fraction: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    byte_offset: Option<u64>,
}

// ============================================================
// 主逻辑
// ============================================================

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init("vbri-probe", cli.verbose) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    if let Err(e) = run(&cli) {
        log::error!("{}: {e:#}", cli.input);
        eprintln!("错误: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.quiet {
        eprintln!(
            "vbri-probe 版本 {} -- VBR 头探测工具",
            env!("CARGO_PKG_VERSION")
        );
        eprintln!("输入文件: {} (偏移 {})", cli.input, cli.offset);
    }

    let header = probe_file(&cli.input, cli.offset)?;
    let output = build_output(&cli.input, cli.offset, &header, cli.seek);

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("序列化 JSON 失败")?;
        println!("{json}");
    } else {
        print_text(&output);
    }
    Ok(())
}

/// 打开文件, 定位到标记并解析 VBR 头
fn probe_file(path: &str, offset: u64) -> Result<VbrHeader> {
    let mut io =
        IoContext::open_read(path).with_context(|| format!("无法打开文件 '{path}'"))?;
    io.seek(SeekFrom::Start(offset))
        .with_context(|| format!("无法定位到偏移 {offset}"))?;
    let tag = io
        .read_tag()
        .with_context(|| format!("偏移 {offset} 处没有完整的 VBR 头标记"))?;
    log::debug!("偏移 {offset} 处标记: {:?}", String::from_utf8_lossy(&tag));
    VbrHeader::parse(tag, &mut io).context("解析 VBR 头失败")
}

/// 从解析结果构建输出结构
fn build_output(filename: &str, offset: u64, header: &VbrHeader, seek: Option<f64>) -> ProbeOutput {
    let (vbri, xing) = match header {
        VbrHeader::Vbri(v) => (
            Some(VbriInfo {
                version: v.version(),
                delay: v.delay(),
                quality_indicator: v.quality_indicator(),
                toc_frames_per_entry: v.toc_frames_per_entry(),
                toc: v.toc().to_vec(),
            }),
            None,
        ),
        VbrHeader::Xing(x) => (
            None,
            Some(XingInfo {
                flags: x.flags(),
                quality: x.quality(),
                toc: x.toc().map(|t| t.to_vec()),
            }),
        ),
    };

    ProbeOutput {
        filename: filename.to_string(),
        offset,
        tag: header.name().to_string(),
        header_length: header.header_length(),
        total_frames: header.total_frames(),
        total_bytes: header.total_bytes(),
        vbri,
        xing,
        seek: seek.map(|fraction| SeekInfo {
            fraction,
            byte_offset: header.byte_offset_for_fraction(fraction),
        }),
    }
}

/// 文本输出
fn print_text(output: &ProbeOutput) {
    println!("[{}]", output.tag);
    println!("  文件名       : {}", output.filename);
    println!("  偏移         : {}", output.offset);
    println!("  头部长度     : {} 字节", output.header_length);
    if let Some(frames) = output.total_frames {
        println!("  总帧数       : {frames}");
    }
    if let Some(bytes) = output.total_bytes {
        println!("  总字节数     : {bytes}");
    }

    if let Some(ref v) = output.vbri {
        println!("  版本         : {}", v.version);
        println!("  延迟         : {}", v.delay);
        println!("  质量         : {}", v.quality_indicator);
        println!("  每条目帧数   : {}", v.toc_frames_per_entry);
        println!("  TOC 条目数   : {}", v.toc.len());
        if !v.toc.is_empty() {
            println!("  TOC          : {:?}", v.toc);
        }
    }

    if let Some(ref x) = output.xing {
        println!("  标志         : {:#x}", x.flags);
        if let Some(q) = x.quality {
            println!("  质量         : {q}");
        }
        if x.toc.is_some() {
            println!("  TOC          : 100 项");
        }
    }

    if let Some(ref s) = output.seek {
        match s.byte_offset {
            Some(off) => println!("  seek {:.3}   : {off} 字节", s.fraction),
            None => println!("  seek {:.3}   : 头部不含可用 TOC", s.fraction),
        }
    }
    println!("[/{}]", output.tag);
}
