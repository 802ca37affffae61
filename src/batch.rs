//! 批处理：逐行解码、去重命名、汇总计数
//!
//! 单行失败只计数不中断，整个批次永远跑完。

use tracing::{debug, warn};

use crate::descriptor::ProxyDescriptor;
use crate::link;
use crate::link::name::NameRegistry;

/// 一次批处理的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// 读到的原始行数（含空行）
    pub total: usize,
    /// 成功转换的节点数
    pub converted: usize,
    /// 解码失败的行数
    pub failed: usize,
}

/// 订阅行批处理器，持有一次 run 的命名注册表。
#[derive(Debug, Default)]
pub struct BatchProcessor {
    registry: NameRegistry,
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 逐行转换：空白行跳过（不算失败），失败行计数后继续。
    pub fn process<'a, I>(&mut self, lines: I) -> (Vec<ProxyDescriptor>, ConvertSummary)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut descriptors = Vec::new();
        let mut summary = ConvertSummary::default();

        for raw in lines {
            summary.total += 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            match link::decode_link(line) {
                Ok(mut descriptor) => {
                    descriptor.name = self.registry.assign(&descriptor.name);
                    debug!(name = %descriptor.name, kind = descriptor.kind.as_str(), "node converted");
                    summary.converted += 1;
                    descriptors.push(descriptor);
                }
                Err(e) => {
                    warn!(kind = e.kind().as_str(), error = %e, "link conversion failed");
                    summary.failed += 1;
                }
            }
        }

        (descriptors, summary)
    }
}
