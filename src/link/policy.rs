//! 节点准入策略：密码套件白名单 + 服务器地址过滤
//!
//! 两条策略都是硬拒绝：不在白名单里的加密方法下游客户端根本
//! 加载不了，私网/回环地址则是爬来的订阅里常见的占位垃圾。

use std::net::IpAddr;

use crate::common::error::ConvertError;

/// 下游客户端认识的 Shadowsocks / ShadowsocksR 加密方法
const ALLOWED_CIPHERS: &[&str] = &[
    "aes-128-gcm",
    "aes-192-gcm",
    "aes-256-gcm",
    "aes-128-cfb",
    "aes-192-cfb",
    "aes-256-cfb",
    "aes-128-ctr",
    "aes-192-ctr",
    "aes-256-ctr",
    "rc4-md5",
    "chacha20-ietf",
    "xchacha20",
    "chacha20-ietf-poly1305",
    "xchacha20-ietf-poly1305",
    "2022-blake3-aes-128-gcm",
    "2022-blake3-aes-256-gcm",
    "2022-blake3-chacha20-poly1305",
];

pub fn cipher_allowed(method: &str) -> bool {
    ALLOWED_CIPHERS.contains(&method)
}

/// 白名单校验，不通过返回 `PolicyRejection`。
pub fn check_cipher(method: &str) -> Result<(), ConvertError> {
    if cipher_allowed(method) {
        Ok(())
    } else {
        Err(ConvertError::PolicyRejection(format!(
            "cipher not allowed: {}",
            method
        )))
    }
}

/// 服务器地址是否可用
///
/// IP 字面量拒绝私网、回环、链路本地和未指定地址；域名一律放行——
/// 不做 DNS 解析就没法分类，而这里刻意不做任何网络 I/O。
/// 文档测试网段（如 203.0.113.0/24）会放行，订阅样例经常用它们。
pub fn address_usable(server: &str) -> bool {
    match server.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => {
            !(ip.is_private() || ip.is_loopback() || ip.is_link_local() || ip.is_unspecified())
        }
        Ok(IpAddr::V6(ip)) => {
            let seg = ip.segments();
            let unique_local = (seg[0] & 0xfe00) == 0xfc00;
            let link_local = (seg[0] & 0xffc0) == 0xfe80;
            !(ip.is_loopback() || ip.is_unspecified() || unique_local || link_local)
        }
        Err(_) => true, // hostname
    }
}

/// 地址过滤，不通过返回 `PolicyRejection`。
pub fn check_address(server: &str) -> Result<(), ConvertError> {
    if address_usable(server) {
        Ok(())
    } else {
        Err(ConvertError::PolicyRejection(format!(
            "unusable server address: {}",
            server
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ciphers_pass() {
        assert!(cipher_allowed("aes-256-gcm"));
        assert!(cipher_allowed("chacha20-ietf-poly1305"));
        assert!(cipher_allowed("rc4-md5"));
    }

    #[test]
    fn unknown_cipher_rejected() {
        assert!(!cipher_allowed("badcipher"));
        assert!(!cipher_allowed(""));
        assert!(!cipher_allowed("AES-256-GCM")); // case-sensitive
        assert!(check_cipher("badcipher").is_err());
    }

    #[test]
    fn private_and_loopback_rejected() {
        assert!(!address_usable("192.168.1.1"));
        assert!(!address_usable("10.0.0.1"));
        assert!(!address_usable("172.16.0.1"));
        assert!(!address_usable("127.0.0.1"));
        assert!(!address_usable("169.254.1.1"));
        assert!(!address_usable("0.0.0.0"));
        assert!(!address_usable("::1"));
        assert!(!address_usable("fe80::1"));
        assert!(!address_usable("fd00::1"));
    }

    #[test]
    fn public_and_documentation_ips_pass() {
        assert!(address_usable("1.1.1.1"));
        assert!(address_usable("203.0.113.5"));
        assert!(address_usable("2001:4860:4860::8888"));
    }

    #[test]
    fn hostnames_always_pass() {
        assert!(address_usable("example.com"));
        assert!(address_usable("my-private-server.lan"));
    }
}
