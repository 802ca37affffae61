//! `ss://` 与 `ssr://` 解码
//!
//! 两种链接最终都落成 shadowsocks 类型节点。SSR 的 `protocol` /
//! `obfs` 字段在统一模型里没有对应物，按已知限制丢弃。

use crate::common::error::ConvertError;
use crate::common::text;
use crate::descriptor::{ProxyDescriptor, ProxyKind, ProxyParams, ShadowsocksParams};
use crate::link::name::sanitize_name;
use crate::link::policy;

/// `ss://base64(method:password)@server:port#remark`
pub fn decode_ss(rest: &str) -> Result<ProxyDescriptor, ConvertError> {
    let (auth, server_part) = rest
        .split_once('@')
        .ok_or_else(|| ConvertError::Decode("ss link missing '@' separator".to_string()))?;

    let auth = text::base64_decode_text(auth)?;
    let (method, password) = auth
        .split_once(':')
        .ok_or_else(|| ConvertError::Decode("ss auth missing ':' separator".to_string()))?;
    policy::check_cipher(method)?;

    let (host_port, remark) = match server_part.split_once('#') {
        Some((hp, r)) => (hp, Some(text::percent_decode(r))),
        None => (server_part, None),
    };
    let (server, port_str) = host_port
        .split_once(':')
        .ok_or_else(|| ConvertError::Decode("ss link missing port".to_string()))?;
    if server.is_empty() {
        return Err(ConvertError::MissingField("server"));
    }
    let port = text::parse_port(port_str)?;
    policy::check_address(server)?;

    let remark = remark.unwrap_or_else(|| format!("{}:{}", server, port));
    Ok(ProxyDescriptor {
        name: format!("ss_{}_{}", sanitize_name(&remark), port),
        kind: ProxyKind::Shadowsocks,
        server: server.to_string(),
        port,
        params: ProxyParams::Shadowsocks(ShadowsocksParams {
            cipher: method.to_string(),
            password: password.to_string(),
            udp: true,
        }),
    })
}

/// `ssr://base64url(server:port:protocol:method:obfs:password_b64/?params#remark_b64)`
pub fn decode_ssr(rest: &str) -> Result<ProxyDescriptor, ConvertError> {
    let decoded = text::base64url_decode_text(rest)?;
    let parts: Vec<&str> = decoded.splitn(6, ':').collect();
    if parts.len() < 6 {
        return Err(ConvertError::Decode(
            "ssr payload has fewer than 6 fields".to_string(),
        ));
    }

    let server = parts[0];
    if server.is_empty() {
        return Err(ConvertError::MissingField("server"));
    }
    let port = text::parse_port(parts[1])?;
    let method = parts[3];
    policy::check_cipher(method)?;
    policy::check_address(server)?;

    let mut tail = parts[5].splitn(2, "/?");
    let password_b64 = tail.next().unwrap_or("");
    let password = text::base64url_decode_text(password_b64)?;

    // remark 解不出来不报废整条记录，退回 server:port
    let remark = tail
        .next()
        .and_then(|params| params.split('#').nth(1))
        .filter(|b64| !b64.is_empty())
        .and_then(|b64| text::base64url_decode_text(b64).ok())
        .unwrap_or_else(|| format!("{}:{}", server, port));

    Ok(ProxyDescriptor {
        name: format!("ssr_{}_{}", sanitize_name(&remark), port),
        kind: ProxyKind::Shadowsocks,
        server: server.to_string(),
        port,
        params: ProxyParams::Shadowsocks(ShadowsocksParams {
            cipher: method.to_string(),
            password,
            udp: true,
        }),
    })
}
