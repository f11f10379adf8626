//! # `soneki-store` - 事件存储适配器
//!
//! `SignalStore` 端口的具体实现：
//! - [`signal::SqliteSignalStore`]: 生产用 SQLite 落盘存储
//! - [`mem::MemorySignalStore`]: 测试与本地开发用内存存储

pub mod config;
pub mod mem;
pub mod signal;
