//! 字节游标.
//!
//! VBR 头解析器只需要四种能力: 大端 u16/u32、定长原始字节、当前偏移.
//! 游标在创建时记下数据源总长度, 每次读取前先核对剩余字节数,
//! 不足时直接返回 [`VbriError::TruncatedStream`], 不会读出半个字段.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use vbri_core::{VbriError, VbriResult};

/// 游标数据源
///
/// 任何可读、可定位且可跨线程移动的类型都可以作为数据源.
pub trait IoBackend: Read + Seek + Send {}

impl<T: Read + Seek + Send> IoBackend for T {}

/// 只读大端字节游标
pub struct IoContext {
    inner: Box<dyn IoBackend>,
    /// 当前偏移 (相对数据源起点)
    pos: u64,
    /// 数据源总长度
    len: u64,
}

impl IoContext {
    /// 从任意数据源创建, 从数据源的当前位置开始读取
    pub fn new(mut backend: impl IoBackend + 'static) -> VbriResult<Self> {
        let pos = backend.stream_position()?;
        let len = backend.seek(SeekFrom::End(0))?;
        backend.seek(SeekFrom::Start(pos))?;
        Ok(Self {
            inner: Box::new(backend),
            pos,
            len,
        })
    }

    /// 从文件路径打开 (只读)
    pub fn open_read(path: &str) -> VbriResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::new(BufReader::new(file))
    }

    /// 从内存数据创建
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let len = data.len() as u64;
        Self {
            inner: Box::new(Cursor::new(data)),
            pos: 0,
            len,
        }
    }

    /// 当前偏移
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// 剩余可读字节数
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    /// 确认还有 `count` 字节可读
    fn require(&self, count: u64) -> VbriResult<()> {
        if count > self.remaining() {
            return Err(VbriError::TruncatedStream);
        }
        Ok(())
    }

    /// 读取大端 u16
    pub fn read_u16_be(&mut self) -> VbriResult<u16> {
        self.require(2)?;
        let value = self.inner.read_u16::<BigEndian>().map_err(eof_as_truncated)?;
        self.pos += 2;
        Ok(value)
    }

    /// 读取大端 u32
    pub fn read_u32_be(&mut self) -> VbriResult<u32> {
        self.require(4)?;
        let value = self.inner.read_u32::<BigEndian>().map_err(eof_as_truncated)?;
        self.pos += 4;
        Ok(value)
    }

    /// 填满 `buf`
    pub fn read_exact(&mut self, buf: &mut [u8]) -> VbriResult<()> {
        self.require(buf.len() as u64)?;
        self.inner.read_exact(buf).map_err(eof_as_truncated)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// 读取 `count` 个原始字节
    pub fn read_bytes(&mut self, count: usize) -> VbriResult<Vec<u8>> {
        let mut buf = vec![0u8; count];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// 读取 4 字节标记 (如 `VBRI`, `Xing`)
    pub fn read_tag(&mut self) -> VbriResult<[u8; 4]> {
        let mut tag = [0u8; 4];
        self.read_exact(&mut tag)?;
        Ok(tag)
    }

    /// 定位到指定位置, 返回新的偏移
    ///
    /// 允许定位到数据末尾之后, 之后的读取会返回截断错误.
    pub fn seek(&mut self, pos: SeekFrom) -> VbriResult<u64> {
        self.pos = self.inner.seek(pos)?;
        Ok(self.pos)
    }
}

/// 数据源在核对长度之后又提前结束 (如文件被截短) 时同样视为截断
fn eof_as_truncated(err: io::Error) -> VbriError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        VbriError::TruncatedStream
    } else {
        VbriError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_大端读取() {
        let mut io = IoContext::from_bytes(vec![0x12, 0x34, 0xDE, 0xAD, 0xBE, 0xEF, 0x7F]);
        assert_eq!(io.read_u16_be().unwrap(), 0x1234);
        assert_eq!(io.read_u32_be().unwrap(), 0xDEAD_BEEF);
        assert_eq!(io.position(), 6);
        assert_eq!(io.remaining(), 1);
        assert_eq!(io.read_bytes(1).unwrap(), vec![0x7F]);
    }

    #[test]
    fn test_数据不足时不消耗字节() {
        let mut io = IoContext::from_bytes(vec![0x00, 0x01, 0x02]);
        assert!(matches!(io.read_u32_be(), Err(VbriError::TruncatedStream)));
        assert_eq!(io.position(), 0);
        assert_eq!(io.read_u16_be().unwrap(), 0x0001);
    }

    #[test]
    fn test_定位到标记() {
        let mut io = IoContext::from_bytes(b"xxxxVBRI".to_vec());
        assert_eq!(io.seek(SeekFrom::Start(4)).unwrap(), 4);
        assert_eq!(&io.read_tag().unwrap(), b"VBRI");
        assert_eq!(io.remaining(), 0);
    }

    #[test]
    fn test_定位超出末尾后读取截断() {
        let mut io = IoContext::from_bytes(vec![0u8; 4]);
        io.seek(SeekFrom::Start(8)).unwrap();
        assert_eq!(io.remaining(), 0);
        assert!(matches!(io.read_bytes(1), Err(VbriError::TruncatedStream)));
    }

    #[test]
    fn test_从数据源当前位置开始() {
        let mut source = Cursor::new(vec![0xAA, 0xBB, 0x00, 0x05]);
        source.set_position(2);
        let mut io = IoContext::new(source).unwrap();
        assert_eq!(io.position(), 2);
        assert_eq!(io.remaining(), 2);
        assert_eq!(io.read_u16_be().unwrap(), 5);
    }

    #[test]
    fn test_数据源提前结束视为截断() {
        let err = eof_as_truncated(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, VbriError::TruncatedStream));
        let err = eof_as_truncated(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, VbriError::Io(_)));
    }
}
