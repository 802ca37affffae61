//! `vmess://` 解码：base64 包裹的 JSON 配置

use serde_json::Value;

use crate::common::error::ConvertError;
use crate::common::text;
use crate::descriptor::{
    GrpcOptions, ProxyDescriptor, ProxyKind, ProxyParams, VmessParams, WsHeaders, WsOptions,
};
use crate::link::name::sanitize_name;
use crate::link::policy;

pub fn decode(rest: &str) -> Result<ProxyDescriptor, ConvertError> {
    let decoded = text::base64_decode_text(rest)?;
    let config: Value = serde_json::from_str(&decoded)
        .map_err(|e| ConvertError::Decode(format!("vmess payload is not JSON: {}", e)))?;

    let server = config
        .get("add")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(ConvertError::MissingField("add"))?
        .to_string();
    let port = match config.get("port") {
        None | Some(Value::Null) => return Err(ConvertError::MissingField("port")),
        Some(v) => json_port(v)?,
    };
    let uuid = config
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(ConvertError::MissingField("id"))?
        .to_string();

    policy::check_address(&server)?;

    let network = config
        .get("net")
        .and_then(Value::as_str)
        .unwrap_or("tcp")
        .to_string();
    let ws_opts = (network == "ws").then(|| WsOptions {
        path: config
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or("/")
            .to_string(),
        headers: WsHeaders {
            host: config
                .get("host")
                .and_then(Value::as_str)
                .unwrap_or(&server)
                .to_string(),
        },
    });
    let grpc_opts = (network == "grpc").then(|| GrpcOptions {
        service_name: config
            .get("serviceName")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
    });

    let name_base = config.get("ps").and_then(Value::as_str).unwrap_or(&server);
    let name = format!("vmess_{}_{}", sanitize_name(name_base), port);

    Ok(ProxyDescriptor {
        name,
        kind: ProxyKind::Vmess,
        server,
        port,
        params: ProxyParams::Vmess(VmessParams {
            uuid,
            alter_id: json_u32(config.get("aid"))?,
            cipher: config
                .get("scy")
                .and_then(Value::as_str)
                .unwrap_or("auto")
                .to_string(),
            tls: config.get("tls").and_then(Value::as_str) == Some("tls"),
            // 不信任链接里带的证书链
            skip_cert_verify: true,
            network,
            ws_opts,
            grpc_opts,
            udp: true,
        }),
    })
}

/// JSON 里的端口既可能是数字也可能是字符串
fn json_port(v: &Value) -> Result<u16, ConvertError> {
    match v {
        Value::String(s) => text::parse_port(s),
        Value::Number(n) => whole_u64(n)
            .and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p > 0)
            .ok_or_else(|| ConvertError::Decode(format!("invalid port: {}", n))),
        other => Err(ConvertError::Decode(format!("invalid port: {}", other))),
    }
}

/// 有些源把整数写成 443.0 这种浮点，整值照收，带小数拒绝。
fn whole_u64(n: &serde_json::Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// alterId 同样两种写法都有，缺失和空串按 0 处理。
fn json_u32(v: Option<&Value>) -> Result<u32, ConvertError> {
    match v {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => whole_u64(n)
            .and_then(|x| u32::try_from(x).ok())
            .ok_or_else(|| ConvertError::Decode(format!("invalid integer: {}", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| ConvertError::Decode(format!("invalid integer: {}", s))),
        Some(other) => Err(ConvertError::Decode(format!("invalid integer: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ConvertErrorKind;
    use base64::Engine;

    fn encode_link(json: &serde_json::Value) -> String {
        base64::engine::general_purpose::STANDARD.encode(json.to_string())
    }

    #[test]
    fn decode_basic_link() {
        let json = serde_json::json!({
            "v": "2",
            "ps": "My Node",
            "add": "example.com",
            "port": "443",
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "aid": "0",
            "scy": "auto",
            "net": "tcp",
            "tls": "tls"
        });
        let d = decode(&encode_link(&json)).unwrap();
        assert_eq!(d.name, "vmess_My_Node_443");
        assert_eq!(d.kind, ProxyKind::Vmess);
        assert_eq!(d.server, "example.com");
        assert_eq!(d.port, 443);
        match d.params {
            ProxyParams::Vmess(p) => {
                assert_eq!(p.uuid, "550e8400-e29b-41d4-a716-446655440000");
                assert_eq!(p.alter_id, 0);
                assert!(p.tls);
                assert!(p.skip_cert_verify);
                assert_eq!(p.network, "tcp");
                assert!(p.ws_opts.is_none());
            }
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn whole_float_port_accepted() {
        let json = serde_json::json!({
            "add": "example.com",
            "port": 443.0,
            "id": "uuid",
            "aid": 2.0
        });
        let d = decode(&encode_link(&json)).unwrap();
        assert_eq!(d.port, 443);
        match d.params {
            ProxyParams::Vmess(p) => assert_eq!(p.alter_id, 2),
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn fractional_port_is_decode_error() {
        let json = serde_json::json!({"add": "example.com", "port": 443.5, "id": "uuid"});
        let err = decode(&encode_link(&json)).unwrap_err();
        assert_eq!(err.kind(), ConvertErrorKind::Decode);
    }

    #[test]
    fn numeric_port_and_aid() {
        let json = serde_json::json!({
            "add": "example.com",
            "port": 8443,
            "id": "uuid",
            "aid": 4
        });
        let d = decode(&encode_link(&json)).unwrap();
        assert_eq!(d.port, 8443);
        match d.params {
            ProxyParams::Vmess(p) => assert_eq!(p.alter_id, 4),
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn ws_transport_options() {
        let json = serde_json::json!({
            "add": "example.com",
            "port": "443",
            "id": "uuid",
            "net": "ws",
            "path": "/sub",
            "host": "cdn.example.com"
        });
        let d = decode(&encode_link(&json)).unwrap();
        match d.params {
            ProxyParams::Vmess(p) => {
                let ws = p.ws_opts.unwrap();
                assert_eq!(ws.path, "/sub");
                assert_eq!(ws.headers.host, "cdn.example.com");
                assert!(p.grpc_opts.is_none());
            }
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn ws_host_defaults_to_server() {
        let json = serde_json::json!({
            "add": "example.com",
            "port": "443",
            "id": "uuid",
            "net": "ws"
        });
        let d = decode(&encode_link(&json)).unwrap();
        match d.params {
            ProxyParams::Vmess(p) => {
                let ws = p.ws_opts.unwrap();
                assert_eq!(ws.path, "/");
                assert_eq!(ws.headers.host, "example.com");
            }
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn grpc_transport_options() {
        let json = serde_json::json!({
            "add": "example.com",
            "port": "443",
            "id": "uuid",
            "net": "grpc",
            "serviceName": "TunService"
        });
        let d = decode(&encode_link(&json)).unwrap();
        match d.params {
            ProxyParams::Vmess(p) => {
                assert_eq!(p.grpc_opts.unwrap().service_name, "TunService");
                assert!(p.ws_opts.is_none());
            }
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn missing_id_is_missing_field() {
        let json = serde_json::json!({"add": "example.com", "port": "443"});
        let err = decode(&encode_link(&json)).unwrap_err();
        assert_eq!(err.kind(), ConvertErrorKind::MissingField);
    }

    #[test]
    fn missing_add_is_missing_field() {
        let json = serde_json::json!({"port": "443", "id": "uuid"});
        let err = decode(&encode_link(&json)).unwrap_err();
        assert_eq!(err.kind(), ConvertErrorKind::MissingField);
    }

    #[test]
    fn bad_base64_is_decode_error() {
        let err = decode("!!!not base64!!!").unwrap_err();
        assert_eq!(err.kind(), ConvertErrorKind::Decode);
    }

    #[test]
    fn non_json_payload_is_decode_error() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("not json at all");
        let err = decode(&encoded).unwrap_err();
        assert_eq!(err.kind(), ConvertErrorKind::Decode);
    }

    #[test]
    fn latin1_payload_still_decodes() {
        // JSON 结构完好，ps 字段混入非 UTF-8 字节
        let mut bytes = br#"{"add":"example.com","port":"443","id":"uuid","ps":""#.to_vec();
        bytes.push(0xD6); // invalid as UTF-8 start byte continuation
        bytes.extend_from_slice(br#""}"#);
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let d = decode(&encoded).unwrap();
        // Latin-1 恢复出的字符不在安全集合里，被清洗成下划线
        assert_eq!(d.name, "vmess___443");
    }

    #[test]
    fn private_address_rejected() {
        let json = serde_json::json!({"add": "192.168.1.10", "port": "443", "id": "uuid"});
        let err = decode(&encode_link(&json)).unwrap_err();
        assert_eq!(err.kind(), ConvertErrorKind::PolicyRejection);
    }

    #[test]
    fn name_falls_back_to_server() {
        let json = serde_json::json!({"add": "example.com", "port": "80", "id": "uuid"});
        let d = decode(&encode_link(&json)).unwrap();
        assert_eq!(d.name, "vmess_example.com_80");
    }
}
