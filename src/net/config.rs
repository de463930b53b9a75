//! 模拟器配置
//!
//! 可从 JSON 文件加载，缺省字段取默认值；命令行参数再覆盖文件中的值。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{name} must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[error("{name} must be a finite, non-negative number, got {value}")]
    NotNonNegative { name: &'static str, value: f64 },
    #[error("rtt must be positive, got {0}")]
    Rtt(f64),
    #[error("min_delay ({min}) must not exceed max_delay ({max})")]
    DelayRange { min: f64, max: f64 },
    #[error("lambda is too large: 2 * lambda must be finite, got {0}")]
    LambdaTooLarge(f64),
    #[error("{name} = 1 never lets a packet through; set until to bound the run")]
    Unbounded { name: &'static str },
}

/// 网络模拟器参数（时间均以“时间单位”计）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmulatorConfig {
    /// 应用层产生的消息总数
    pub messages: u64,
    /// 丢包概率
    pub loss_prob: f64,
    /// 未丢弃的包被损坏的概率
    pub corrupt_prob: f64,
    /// 消息平均到达间隔
    pub lambda: f64,
    /// 发送方重传定时器时长
    pub rtt: f64,
    /// 单程时延下限
    pub min_delay: f64,
    /// 单程时延上限
    pub max_delay: f64,
    pub seed: u64,
    /// 仿真截止时间；不填则运行到事件队列为空
    pub until: Option<f64>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            messages: 20,
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            lambda: 10.0,
            rtt: 15.0,
            min_delay: 1.0,
            max_delay: 10.0,
            seed: 1,
            until: None,
        }
    }
}

fn probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotNonNegative { name, value })
    }
}

impl EmulatorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        probability("loss_prob", self.loss_prob)?;
        probability("corrupt_prob", self.corrupt_prob)?;
        non_negative("lambda", self.lambda)?;
        if !(2.0 * self.lambda).is_finite() {
            return Err(ConfigError::LambdaTooLarge(self.lambda));
        }
        non_negative("min_delay", self.min_delay)?;
        non_negative("max_delay", self.max_delay)?;
        if let Some(until) = self.until {
            non_negative("until", until)?;
        }
        if !(self.rtt.is_finite() && self.rtt > 0.0) {
            return Err(ConfigError::Rtt(self.rtt));
        }
        if self.min_delay > self.max_delay {
            return Err(ConfigError::DelayRange {
                min: self.min_delay,
                max: self.max_delay,
            });
        }
        if self.until.is_none() && self.messages > 0 {
            if self.loss_prob >= 1.0 {
                return Err(ConfigError::Unbounded { name: "loss_prob" });
            }
            if self.corrupt_prob >= 1.0 {
                return Err(ConfigError::Unbounded { name: "corrupt_prob" });
            }
        }
        Ok(())
    }
}
