//! nodeconv：把六种 scheme 的订阅链接归一成统一节点描述
//!
//! 核心只做字符串/字节层面的解码，无任何网络 I/O。各 scheme 的
//! 野外编码习惯差异很大（base64 JSON、base64 冒号元组、标准 URI、
//! 嵌套 base64 子字段），解码层对损坏输入整体宽容：单条失败只丢弃
//! 该条，批次照常。

pub mod batch;
pub mod common;
pub mod descriptor;
pub mod link;

pub use batch::{BatchProcessor, ConvertSummary};
pub use common::{ConvertError, ConvertErrorKind};
pub use descriptor::{ProxyDescriptor, ProxyKind};
