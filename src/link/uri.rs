//! trojan / vless / hysteria2 共用的 URI 拆分
//!
//! 不引入完整 URL 解析器：这些链接只用到 userinfo、authority、
//! query、fragment 四段，路径一律忽略。

use crate::common::error::ConvertError;
use crate::common::text;

/// 标准 URI 形链接去掉 scheme 前缀后的各段
#[derive(Debug, Clone)]
pub(crate) struct UriLink {
    pub userinfo: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    /// 百分号解码后的 query 键值对，保持出现顺序
    query: Vec<(String, String)>,
    /// 原始 fragment（未解码）
    pub fragment: Option<String>,
}

impl UriLink {
    pub fn parse(rest: &str) -> Result<Self, ConvertError> {
        let (before_frag, fragment) = match rest.split_once('#') {
            Some((b, f)) => (b, Some(f.to_string())),
            None => (rest, None),
        };
        let (before_query, query_str) = match before_frag.split_once('?') {
            Some((b, q)) => (b, Some(q)),
            None => (before_frag, None),
        };
        // authority 到第一个 '/' 为止，路径丢弃
        let authority = before_query.split('/').next().unwrap_or("");

        let (userinfo, hostinfo) = match authority.rsplit_once('@') {
            Some((u, h)) => (Some(u.to_string()), h),
            None => (None, authority),
        };

        let (host, port) = if let Some((h, p)) = text::split_host_port(hostinfo) {
            (h, Some(p))
        } else if hostinfo.contains(':') && !hostinfo.starts_with('[') {
            // 有冒号却拆不出合法端口
            return Err(ConvertError::Decode(format!("invalid authority: {}", hostinfo)));
        } else {
            (hostinfo.trim_matches(['[', ']']).to_string(), None)
        };

        let mut query = Vec::new();
        if let Some(qs) = query_str {
            for pair in qs.split('&') {
                if let Some((k, v)) = pair.split_once('=') {
                    // 空值对丢弃，取默认值的逻辑与缺失同样处理
                    if !v.is_empty() {
                        query.push((text::percent_decode(k), text::percent_decode(v)));
                    }
                }
            }
        }

        Ok(Self {
            userinfo,
            host,
            port,
            query,
            fragment,
        })
    }

    /// 第一个同名 query 参数的值
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// query 布尔参数：大小写不敏感的 "true"，缺失取默认值。
    pub fn query_bool(&self, key: &str, default: bool) -> bool {
        self.query_get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(default)
    }

    /// fragment 作为 remark：百分号解码，空缺退回 `host:port`。
    pub fn remark(&self, port: u16) -> String {
        match self.fragment.as_deref() {
            Some(f) if !f.is_empty() => text::percent_decode(f),
            _ => format!("{}:{}", self.host, port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_link_splits() {
        let uri = UriLink::parse("pw@example.com:8443?sni=a.com&alpn=h2#My%20Node").unwrap();
        assert_eq!(uri.userinfo.as_deref(), Some("pw"));
        assert_eq!(uri.host, "example.com");
        assert_eq!(uri.port, Some(8443));
        assert_eq!(uri.query_get("sni"), Some("a.com"));
        assert_eq!(uri.query_get("alpn"), Some("h2"));
        assert_eq!(uri.remark(8443), "My Node");
    }

    #[test]
    fn defaults_when_parts_missing() {
        let uri = UriLink::parse("example.com").unwrap();
        assert_eq!(uri.userinfo, None);
        assert_eq!(uri.port, None);
        assert_eq!(uri.query_get("sni"), None);
        assert_eq!(uri.remark(443), "example.com:443");
    }

    #[test]
    fn path_is_ignored() {
        let uri = UriLink::parse("uuid@example.com:443/some/path?type=ws").unwrap();
        assert_eq!(uri.host, "example.com");
        assert_eq!(uri.query_get("type"), Some("ws"));
    }

    #[test]
    fn ipv6_authority() {
        let uri = UriLink::parse("pw@[2001:db8::1]:443#v6").unwrap();
        assert_eq!(uri.host, "2001:db8::1");
        assert_eq!(uri.port, Some(443));
    }

    #[test]
    fn empty_query_values_dropped() {
        let uri = UriLink::parse("example.com:443?sni=&flow=x").unwrap();
        assert_eq!(uri.query_get("sni"), None);
        assert_eq!(uri.query_get("flow"), Some("x"));
    }

    #[test]
    fn first_query_value_wins() {
        let uri = UriLink::parse("example.com:443?sni=a&sni=b").unwrap();
        assert_eq!(uri.query_get("sni"), Some("a"));
    }

    #[test]
    fn invalid_port_is_error() {
        assert!(UriLink::parse("example.com:notaport").is_err());
        assert!(UriLink::parse("example.com:99999").is_err());
    }
}
