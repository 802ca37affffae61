//! 六种订阅链接 scheme 的解码入口
//!
//! scheme 是封闭集合：新增协议走枚举扩展，由穷尽 match 在编译期
//! 保证每个变体都有对应的解码函数，而不是运行时字符串表。

pub mod name;
pub mod policy;

mod hysteria2;
mod shadowsocks;
mod trojan;
mod uri;
mod vless;
mod vmess;

use crate::common::error::ConvertError;
use crate::common::text;
use crate::descriptor::ProxyDescriptor;

/// 支持的链接 scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Vmess,
    Shadowsocks,
    ShadowsocksR,
    Trojan,
    Vless,
    Hysteria2,
}

impl Scheme {
    pub const ALL: [Scheme; 6] = [
        Scheme::Vmess,
        Scheme::Shadowsocks,
        Scheme::ShadowsocksR,
        Scheme::Trojan,
        Scheme::Vless,
        Scheme::Hysteria2,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Vmess => "vmess://",
            Scheme::Shadowsocks => "ss://",
            Scheme::ShadowsocksR => "ssr://",
            Scheme::Trojan => "trojan://",
            Scheme::Vless => "vless://",
            Scheme::Hysteria2 => "hysteria2://",
        }
    }

    /// 前缀精确匹配（大小写敏感），返回 scheme 和剩余部分。
    pub fn detect(line: &str) -> Option<(Scheme, &str)> {
        Scheme::ALL
            .iter()
            .find_map(|s| line.strip_prefix(s.prefix()).map(|rest| (*s, rest)))
    }
}

/// 单条链接 → 统一描述
///
/// 订阅源有时把链接包在转义过的 HTML 里，先反转义再匹配前缀。
pub fn decode_link(raw: &str) -> Result<ProxyDescriptor, ConvertError> {
    let line = text::html_unescape(raw);
    let (scheme, rest) = Scheme::detect(&line)
        .ok_or_else(|| ConvertError::UnsupportedScheme(scheme_label(&line)))?;
    match scheme {
        Scheme::Vmess => vmess::decode(rest),
        Scheme::Shadowsocks => shadowsocks::decode_ss(rest),
        Scheme::ShadowsocksR => shadowsocks::decode_ssr(rest),
        Scheme::Trojan => trojan::decode(rest),
        Scheme::Vless => vless::decode(rest),
        Scheme::Hysteria2 => hysteria2::decode(rest),
    }
}

/// 错误信息里带上未识别的 scheme 片段，截断防日志爆炸。
fn scheme_label(line: &str) -> String {
    let head = line.split("://").next().unwrap_or(line);
    head.chars().take(24).collect()
}
