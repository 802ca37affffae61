//! `vless://` 解码
//!
//! TLS 开关比较绕：`security=tls` 或者走 ws/grpc 传输都算开。

use crate::common::error::ConvertError;
use crate::descriptor::{
    GrpcOptions, ProxyDescriptor, ProxyKind, ProxyParams, VlessParams, WsHeaders, WsOptions,
};
use crate::link::name::sanitize_name;
use crate::link::policy;
use crate::link::uri::UriLink;

pub fn decode(rest: &str) -> Result<ProxyDescriptor, ConvertError> {
    let uri = UriLink::parse(rest)?;

    // 连 '@' 都没有的链接按格式损坏处理，有 '@' 但 userinfo 为空才算字段缺失
    let uuid = match uri.userinfo.as_deref() {
        None => {
            return Err(ConvertError::Decode(
                "vless link has no userinfo".to_string(),
            ))
        }
        Some("") => return Err(ConvertError::MissingField("uuid")),
        Some(u) => u.to_string(),
    };
    if uri.host.is_empty() {
        return Err(ConvertError::MissingField("server"));
    }
    let port = uri.port.unwrap_or(443);
    policy::check_address(&uri.host)?;

    let network = uri.query_get("type").unwrap_or("tcp").to_string();
    let tls = uri.query_get("security") == Some("tls") || network == "ws" || network == "grpc";
    // 空 flow 不进输出
    let flow = uri
        .query_get("flow")
        .filter(|f| !f.is_empty())
        .map(str::to_string);

    let ws_opts = (network == "ws").then(|| WsOptions {
        path: uri.query_get("path").unwrap_or("/").to_string(),
        headers: WsHeaders {
            host: uri.query_get("host").unwrap_or(&uri.host).to_string(),
        },
    });
    let grpc_opts = (network == "grpc").then(|| GrpcOptions {
        service_name: uri.query_get("serviceName").unwrap_or("").to_string(),
    });

    let remark = uri.remark(port);
    Ok(ProxyDescriptor {
        name: format!("vless_{}_{}", sanitize_name(&remark), port),
        kind: ProxyKind::Vless,
        server: uri.host.clone(),
        port,
        params: ProxyParams::Vless(VlessParams {
            uuid,
            tls,
            flow,
            network,
            ws_opts,
            grpc_opts,
            udp: true,
        }),
    })
}
