use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub strategy: EngineStrategy,
}

/// # Summary
/// PnL 引擎策略选择。两种策略可互换，由部署配置一次性决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStrategy {
    /// 卖出按全量买入加权均价实现盈亏
    Average,
    /// 卖出与最早未配对买入严格一对一 FIFO 配对
    Fifo,
}

impl FromStr for EngineStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "average" => Ok(EngineStrategy::Average),
            "fifo" => Ok(EngineStrategy::Fifo),
            _ => Err(format!("Unknown engine strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for EngineStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineStrategy::Average => write!(f, "average"),
            EngineStrategy::Fifo => write!(f, "fifo"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                data_dir: "data".to_string(),
            },
            engine: EngineConfig {
                strategy: EngineStrategy::Average,
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量覆盖默认配置。无法解析的值保留默认并告警。
    ///
    /// # Logic
    /// 1. `PORT` - 监听端口 (沿用原部署约定)。
    /// 2. `SONEKI_DATA_DIR` - SQLite 数据根目录。
    /// 3. `SONEKI_STRATEGY` - "average" 或 "fifo"。
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("PORT") {
            match raw.parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!("Ignoring unparsable PORT value: {}", raw),
            }
        }
        if let Ok(dir) = std::env::var("SONEKI_DATA_DIR") {
            config.database.data_dir = dir;
        }
        if let Ok(raw) = std::env::var("SONEKI_STRATEGY") {
            match raw.parse::<EngineStrategy>() {
                Ok(strategy) => config.engine.strategy = strategy,
                Err(e) => tracing::warn!("{}", e),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.data_dir, "data");
        assert_eq!(config.engine.strategy, EngineStrategy::Average);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("FIFO".parse::<EngineStrategy>().unwrap(), EngineStrategy::Fifo);
        assert_eq!(
            "Average".parse::<EngineStrategy>().unwrap(),
            EngineStrategy::Average
        );
        // 只认 "average"/"fifo" 两个策略名，不设别名
        assert!("avg".parse::<EngineStrategy>().is_err());
        assert!("aggregate".parse::<EngineStrategy>().is_err());
        assert!("lifo".parse::<EngineStrategy>().is_err());
    }
}
