//! `hysteria2://` 解码：QUIC 传输，TLS 恒开

use crate::common::error::ConvertError;
use crate::descriptor::{Hysteria2Params, ProxyDescriptor, ProxyKind, ProxyParams};
use crate::link::name::sanitize_name;
use crate::link::policy;
use crate::link::uri::UriLink;

pub fn decode(rest: &str) -> Result<ProxyDescriptor, ConvertError> {
    let uri = UriLink::parse(rest)?;

    if uri.host.is_empty() {
        return Err(ConvertError::MissingField("server"));
    }
    let port = uri.port.unwrap_or(443);
    policy::check_address(&uri.host)?;

    let sni = uri.query_get("sni").unwrap_or(&uri.host).to_string();
    let alpn = match uri.query_get("alpn") {
        Some(v) => v.split(',').map(str::to_string).collect(),
        None => vec!["h3".to_string()],
    };

    let remark = uri.remark(port);
    Ok(ProxyDescriptor {
        name: format!("h2_{}_{}", sanitize_name(&remark), port),
        kind: ProxyKind::Hysteria2,
        server: uri.host.clone(),
        port,
        params: ProxyParams::Hysteria2(Hysteria2Params {
            obfs: uri.query_get("obfs").unwrap_or("none").to_string(),
            obfs_password: uri.query_get("obfsParam").unwrap_or("").to_string(),
            auth: uri.query_get("auth").unwrap_or("").to_string(),
            up: query_u64(&uri, "up")?,
            down: query_u64(&uri, "down")?,
            fast_open: uri.query_bool("fastOpen", true),
            quic: true,
            tls: true,
            sni,
            alpn,
            udp: true,
        }),
    })
}

fn query_u64(uri: &UriLink, key: &str) -> Result<u64, ConvertError> {
    match uri.query_get(key) {
        None => Ok(0),
        Some(v) => v
            .parse()
            .map_err(|_| ConvertError::Decode(format!("invalid integer for {}: {}", key, v))),
    }
}
