// 该文件是 Target Locator （寻的） 项目的一部分。
// src/config.rs - 启动配置
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::{path::PathBuf, time::Duration};

use thiserror::Error;
use tracing::info;

use crate::{
  frame::MountOrientation,
  model::{ClassNames, ClassNamesError},
  resolve::TargetResolver,
};

pub const DEFAULT_TARGET_LABEL: &str = "sports ball";
pub const DEFAULT_DESTINATION_LABEL: &str = "backpack";
pub const DEFAULT_RATE_HZ: f64 = 10.0;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("目标类别与终点类别相同: {0}")]
  SameLabels(String),
  #[error("{0}类别不能为空")]
  EmptyLabel(&'static str),
  #[error("发布频率必须为正数: {0}")]
  InvalidRate(f64),
  #[error("类别名称加载失败: {0}")]
  ClassNames(#[from] ClassNamesError),
  #[error("类别 {0} 不在类别名称表中")]
  UnknownLabel(String),
}

/// 启动时确定、运行期间不变的配置
#[derive(Debug, Clone)]
pub struct Config {
  pub target_label: String,
  pub destination_label: String,
  pub rate_hz: f64,
  pub mount: MountOrientation,
  /// 为空时使用内置的 COCO 类别表
  pub class_names_path: Option<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      target_label: DEFAULT_TARGET_LABEL.to_string(),
      destination_label: DEFAULT_DESTINATION_LABEL.to_string(),
      rate_hz: DEFAULT_RATE_HZ,
      mount: MountOrientation::default(),
      class_names_path: None,
    }
  }
}

impl Config {
  /// 校验配置并加载类别名称表；任何错误都应在进入发布循环之前终止进程
  pub fn validate(&self) -> Result<ClassNames, ConfigError> {
    if self.target_label.trim().is_empty() {
      return Err(ConfigError::EmptyLabel("目标"));
    }
    if self.destination_label.trim().is_empty() {
      return Err(ConfigError::EmptyLabel("终点"));
    }
    if self.target_label == self.destination_label {
      return Err(ConfigError::SameLabels(self.target_label.clone()));
    }
    if !self.rate_hz.is_finite() || self.rate_hz <= 0.0 {
      return Err(ConfigError::InvalidRate(self.rate_hz));
    }

    let class_names = match &self.class_names_path {
      Some(path) => ClassNames::from_path(path)?,
      None => ClassNames::coco(),
    };

    for label in [&self.target_label, &self.destination_label] {
      if !class_names.contains(label) {
        return Err(ConfigError::UnknownLabel(label.clone()));
      }
    }

    info!(
      "目标类别: {}, 终点类别: {}, 频率: {} Hz, 安装方向: {:?}",
      self.target_label, self.destination_label, self.rate_hz, self.mount
    );
    Ok(class_names)
  }

  pub fn period(&self) -> Duration {
    Duration::from_secs_f64(1.0 / self.rate_hz)
  }

  pub fn resolver(&self) -> TargetResolver {
    TargetResolver::new(&self.target_label, &self.destination_label)
  }
}
