//! 链接解码用到的底层文本工具
//!
//! 订阅源质量参差不齐：base64 缺 padding、payload 不是合法 UTF-8、
//! 链接被转义过的 HTML 包裹。这里的工具统一做宽容恢复，绝不 panic。

use crate::common::error::ConvertError;

/// Base64 解码（宽容模式）：依次尝试标准、URL-safe、无 padding 变体。
pub fn base64_decode(s: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    let s = s.replace(['\n', '\r'], "");
    base64::engine::general_purpose::STANDARD
        .decode(&s)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE.decode(&s))
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(&s))
        .or_else(|_| base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(&s))
        .ok()
}

/// Base64url 解码，先把 `=` padding 补齐到 4 的倍数再解。
///
/// SSR 链接的各个子字段都用这种编码，且野外普遍缺 padding。
pub fn base64url_decode_padded(s: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    let s = s.replace(['\n', '\r'], "");
    let trimmed = s.trim_end_matches('=');
    let mut padded = trimmed.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    base64::engine::general_purpose::URL_SAFE
        .decode(&padded)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(trimmed))
        .ok()
}

/// 字节恢复为文本：先严格 UTF-8，失败则按 Latin-1 逐字节无损转换。
///
/// 上游偶尔把 payload 用错误的编码写出来，此时 JSON 结构仍然是
/// 逐字节可恢复的，所以任何字节组合都不应让解码崩掉。
pub fn recover_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// base64 解码后恢复为文本，解码失败返回 `ConvertError::Decode`。
pub fn base64_decode_text(s: &str) -> Result<String, ConvertError> {
    base64_decode(s)
        .map(recover_text)
        .ok_or_else(|| ConvertError::Decode("invalid base64 payload".to_string()))
}

/// base64url（补 padding）解码后恢复为文本。
pub fn base64url_decode_text(s: &str) -> Result<String, ConvertError> {
    base64url_decode_padded(s)
        .map(recover_text)
        .ok_or_else(|| ConvertError::Decode("invalid base64url payload".to_string()))
}

/// URL 百分号解码（含 `+` → 空格）
///
/// 转义序列先还原成原始字节再整体走 [`recover_text`]，多字节 UTF-8
/// （如 `%E4%B8%AD`）才能拼回完整字符。残缺转义（`%` 后不足两位
/// 十六进制）原样保留。
pub fn percent_decode(s: &str) -> String {
    let raw = s.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'%' if i + 2 < raw.len()
                && raw[i + 1].is_ascii_hexdigit()
                && raw[i + 2].is_ascii_hexdigit() =>
            {
                let hi = (raw[i + 1] as char).to_digit(16).unwrap() as u8;
                let lo = (raw[i + 2] as char).to_digit(16).unwrap() as u8;
                bytes.push(hi * 16 + lo);
                i += 3;
            }
            b'+' => {
                bytes.push(b' ');
                i += 1;
            }
            b => {
                bytes.push(b);
                i += 1;
            }
        }
    }
    recover_text(bytes)
}

/// HTML 实体反转义（常见命名实体 + 数字实体）
///
/// 有些订阅源把链接包在转义过的标记里，`?a=1&amp;b=2` 这种要在
/// scheme 匹配之前先还原。
pub fn html_unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let end = match rest.find(';') {
            // entities are short; a distant ';' means this '&' is literal
            Some(e) if e <= 10 => e,
            _ => {
                result.push('&');
                rest = &rest[1..];
                continue;
            }
        };
        let entity = &rest[1..end];
        let replacement = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity.strip_prefix('#').and_then(|num| {
                let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                    u32::from_str_radix(hex, 16).ok()
                } else {
                    num.parse::<u32>().ok()
                };
                code.and_then(char::from_u32)
            }),
        };
        match replacement {
            Some(c) => {
                result.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// 拆分 `host:port`，支持 `[::1]:port` 的 IPv6 写法。端口 0 视为非法。
pub fn split_host_port(s: &str) -> Option<(String, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let port_str = s.get(end + 2..)?; // skip ]:
        let port = port_str.parse().ok().filter(|p| *p > 0)?;
        return Some((host.to_string(), port));
    }
    let (host, port_str) = s.rsplit_once(':')?;
    let port = port_str.parse().ok().filter(|p| *p > 0)?;
    Some((host.to_string(), port))
}

/// 端口字符串 → u16，0 和非数字都算解码失败。
pub fn parse_port(s: &str) -> Result<u16, ConvertError> {
    match s.trim().parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(ConvertError::Decode(format!("invalid port: {}", s))),
    }
}
