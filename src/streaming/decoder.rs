//! SSE 行解码器
//!
//! 增量地把字节 chunk 切分为行，并提取带 `data: ` 前缀的记录负载。
//!
//! 只有遇到 `\n` 之后才会把整行解码为文本。UTF-8 的多字节序列中不会出现
//! `\n` 字节，所以被 chunk 边界截断的字符会留在缓冲区里，等下一个 chunk
//! 补齐后再解码。

use crate::streaming::error::StreamError;

/// 默认记录前缀
pub const DEFAULT_EVENT_PREFIX: &str = "data: ";

/// 解码出的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// 带前缀的记录，内容为去掉前缀后的负载
    Data(String),
    /// 非空但没有前缀的行（`event:`、注释等）
    Ignored(String),
}

/// SSE 行解码器
#[derive(Debug)]
pub struct SseLineDecoder {
    /// 尚未遇到换行的字节
    buffer: Vec<u8>,
    /// 缓冲区中已确认不含 `\n` 的前缀长度
    scanned: usize,
    prefix: String,
    max_line_bytes: usize,
}

impl Default for SseLineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseLineDecoder {
    /// 默认单行上限 (1MB)
    pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

    pub fn new() -> Self {
        Self::with_options(DEFAULT_EVENT_PREFIX, Self::DEFAULT_MAX_LINE_BYTES)
    }

    pub fn with_options(prefix: &str, max_line_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            prefix: prefix.to_string(),
            max_line_bytes,
        }
    }

    /// 当前缓冲的字节数
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// 处理一个 chunk，返回其中所有完整的行
    ///
    /// 任一行（无论是否已遇到换行）超过上限时返回 [`StreamError::BufferOverflow`]。
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseLine>, StreamError> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut cursor = self.scanned;

        while let Some(offset) = self.buffer[cursor..].iter().position(|b| *b == b'\n') {
            let end = cursor + offset;
            if end - start > self.max_line_bytes {
                return Err(StreamError::BufferOverflow);
            }
            if let Some(line) = self.classify(&self.buffer[start..end]) {
                lines.push(line);
            }
            start = end + 1;
            cursor = start;
        }

        self.buffer.drain(..start);
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_line_bytes {
            return Err(StreamError::BufferOverflow);
        }

        Ok(lines)
    }

    /// 流结束时处理缓冲区中没有换行结尾的最后一行
    pub fn finish(&mut self) -> Option<SseLine> {
        let rest = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        self.classify(&rest)
    }

    fn classify(&self, raw: &[u8]) -> Option<SseLine> {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            return None;
        }

        let text = String::from_utf8_lossy(raw);
        if let Some(payload) = text.strip_prefix(self.prefix.as_str()) {
            return Some(SseLine::Data(payload.to_string()));
        }
        Some(SseLine::Ignored(text.into_owned()))
    }
}
