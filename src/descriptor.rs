//! 统一节点描述模型
//!
//! 所有 scheme 解码后都落到 `ProxyDescriptor`，字段名与下游客户端
//! 加载配置时使用的字面量一一对应，不能漂移。

use serde::Serialize;

/// 规范化后的单个节点
///
/// 构造完成后不可变，唯一的例外是批处理阶段 `NameRegistry` 做的
/// 一次去重改名。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProxyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProxyKind,
    pub server: String,
    pub port: u16,
    #[serde(flatten)]
    pub params: ProxyParams,
}

/// 输出协议类型（SSR 折叠进 shadowsocks，下游客户端没有独立的 SSR 处理器）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    Vmess,
    Shadowsocks,
    Trojan,
    Vless,
    Hysteria2,
}

impl ProxyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyKind::Vmess => "vmess",
            ProxyKind::Shadowsocks => "shadowsocks",
            ProxyKind::Trojan => "trojan",
            ProxyKind::Vless => "vless",
            ProxyKind::Hysteria2 => "hysteria2",
        }
    }
}

/// 各 scheme 专属字段
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ProxyParams {
    Vmess(VmessParams),
    Shadowsocks(ShadowsocksParams),
    Trojan(TrojanParams),
    Vless(VlessParams),
    Hysteria2(Hysteria2Params),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VmessParams {
    pub uuid: String,
    #[serde(rename = "alterId")]
    pub alter_id: u32,
    pub cipher: String,
    pub tls: bool,
    #[serde(rename = "skip-cert-verify")]
    pub skip_cert_verify: bool,
    pub network: String,
    #[serde(rename = "ws-opts", skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOptions>,
    #[serde(rename = "grpc-opts", skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOptions>,
    pub udp: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShadowsocksParams {
    pub cipher: String,
    pub password: String,
    pub udp: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrojanParams {
    pub password: String,
    pub tls: bool,
    pub sni: String,
    pub alpn: Vec<String>,
    #[serde(rename = "skip-cert-verify")]
    pub skip_cert_verify: bool,
    pub udp: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VlessParams {
    pub uuid: String,
    pub tls: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    pub network: String,
    #[serde(rename = "ws-opts", skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOptions>,
    #[serde(rename = "grpc-opts", skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOptions>,
    pub udp: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Hysteria2Params {
    pub obfs: String,
    #[serde(rename = "obfs-password")]
    pub obfs_password: String,
    pub auth: String,
    pub up: u64,
    pub down: u64,
    #[serde(rename = "fast-open")]
    pub fast_open: bool,
    pub quic: bool,
    pub tls: bool,
    pub sni: String,
    pub alpn: Vec<String>,
    pub udp: bool,
}

/// WebSocket 传输选项（仅 `network == "ws"` 时出现）
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WsOptions {
    pub path: String,
    pub headers: WsHeaders,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WsHeaders {
    #[serde(rename = "Host")]
    pub host: String,
}

/// gRPC 传输选项（仅 `network == "grpc"` 时出现）
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GrpcOptions {
    #[serde(rename = "serviceName")]
    pub service_name: String,
}
