//! `trojan://` 解码：标准 URI 形，TLS 恒为开启

use crate::common::error::ConvertError;
use crate::descriptor::{ProxyDescriptor, ProxyKind, ProxyParams, TrojanParams};
use crate::link::name::sanitize_name;
use crate::link::policy;
use crate::link::uri::UriLink;

pub fn decode(rest: &str) -> Result<ProxyDescriptor, ConvertError> {
    let uri = UriLink::parse(rest)?;

    let password = match uri.userinfo.as_deref() {
        None => {
            return Err(ConvertError::Decode(
                "trojan link has no userinfo".to_string(),
            ))
        }
        Some("") => return Err(ConvertError::MissingField("password")),
        Some(u) => u.to_string(),
    };
    if uri.host.is_empty() {
        return Err(ConvertError::MissingField("server"));
    }
    let port = uri.port.unwrap_or(443);
    policy::check_address(&uri.host)?;

    let sni = uri.query_get("sni").unwrap_or(&uri.host).to_string();
    let alpn = match uri.query_get("alpn") {
        Some(v) => v.split(',').map(str::to_string).collect(),
        None => vec!["h2".to_string(), "http/1.1".to_string()],
    };

    let remark = uri.remark(port);
    Ok(ProxyDescriptor {
        name: format!("trojan_{}_{}", sanitize_name(&remark), port),
        kind: ProxyKind::Trojan,
        server: uri.host.clone(),
        port,
        params: ProxyParams::Trojan(TrojanParams {
            password,
            tls: true,
            sni,
            alpn,
            skip_cert_verify: uri.query_bool("skip-cert-verify", true),
            udp: true,
        }),
    })
}
