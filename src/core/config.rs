use crate::core::{DumpError, DumpResult};
use crate::dump::filter::FilterSet;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_MAX_LENGTH: usize = 110;

#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    pub dump: DumpConfig,
    pub capture: CaptureConfig,
    pub logging: LoggingConfig,
}

/// パケットダンプの実行時設定。起動時に一度だけ構築され、以降は読み取り専用
#[derive(Debug, Clone, Serialize)]
pub struct DumpConfig {
    pub verbose: bool,
    /// 0 の場合は切り詰めない
    pub max_length: usize,
    pub full_packets: bool,
    pub filter: FilterSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptureConfig {
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            max_length: DEFAULT_MAX_LENGTH,
            full_packets: true,
            filter: FilterSet::default(),
        }
    }
}

impl Configuration {
    pub fn from_env() -> DumpResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の取得関数から設定を構築する (テストでは環境変数の代わりに使う)
    pub fn from_lookup<F>(lookup: F) -> DumpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let verbose = match non_empty("DUMP_VERBOSE") {
            Some(v) => parse_bool("DUMP_VERBOSE", &v)?,
            None => false,
        };
        let max_length = match non_empty("DUMP_MAX_LENGTH") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|e| DumpError::Config(format!("無効な最大長 DUMP_MAX_LENGTH={}: {}", v, e)))?,
            None => DEFAULT_MAX_LENGTH,
        };
        let full_packets = match non_empty("DUMP_FULL_PACKETS") {
            Some(v) => parse_bool("DUMP_FULL_PACKETS", &v)?,
            None => true,
        };

        let hide = lookup("DUMP_HIDE").unwrap_or_default();
        let show = lookup("DUMP_SHOW").unwrap_or_default();
        let filter = FilterSet::build(&hide, &show)?;

        Ok(Configuration {
            dump: DumpConfig {
                verbose,
                max_length,
                full_packets,
                filter,
            },
            capture: CaptureConfig {
                interface: non_empty("DUMP_INTERFACE").map(|v| v.trim().to_string()),
            },
            logging: LoggingConfig {
                level: non_empty("DUMP_LOG_LEVEL")
                    .map(|v| v.trim().to_string())
                    .unwrap_or_else(|| "debug".to_string()),
                file: non_empty("DUMP_LOG_FILE").map(PathBuf::from),
            },
        })
    }
}

fn parse_bool(key: &str, value: &str) -> DumpResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(DumpError::Config(format!("無効な真偽値 {}={}", key, other))),
    }
}
