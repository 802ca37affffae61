//! 节点命名：remark 清洗 + 全局去重
//!
//! 订阅里的 remark 什么字符都可能出现，输出名既要能当文件名/标识符
//! 用，又要在一次批处理内全局唯一。

use std::collections::HashSet;

/// 把任意 remark 文本替换成 `[A-Za-z0-9_.-]` 之外全为 `_` 的安全形式。
///
/// 纯函数，对空串也成立（下游拼名时总会追加 scheme/port 后缀，
/// 最终名字不会为空）。
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 一次批处理内已分配名字的注册表
///
/// 只存活一个 run，run 结束即丢弃，不跨运行持久化。
#[derive(Debug, Default)]
pub struct NameRegistry {
    assigned: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配一个未占用的名字：候选名空闲则原样返回，否则依次尝试
    /// `_1`、`_2`…直到找到空位。
    pub fn assign(&mut self, candidate: &str) -> String {
        let mut name = candidate.to_string();
        let mut counter = 1;
        while self.assigned.contains(&name) {
            name = format!("{}_{}", candidate, counter);
            counter += 1;
        }
        self.assigned.insert(name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
