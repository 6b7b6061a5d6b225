// 该文件是 Target Locator （寻的） 项目的一部分。
// src/resolve.rs - 目标与终点的选取策略
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

//! 从一帧的检测结果中为目标类别和终点类别各选出至多一个检测框。
//!
//! 两个类别使用不同的策略，分别实现，不共用排序参数：
//! - 目标：`y1` 最小者（旋转校正后即离摄像头最近的候选）
//! - 终点：置信度最高者
//!
//! 两种策略在取值相等时都保留原始顺序中先出现的检测；排序字段为 NaN 的检测不参与选取。

use tracing::debug;

use crate::model::Detection;

/// 目标策略：同类检测中 `y1` 最小的一个
pub fn select_nearest_target<'a>(detections: &'a [Detection], label: &str) -> Option<&'a Detection> {
  detections
    .iter()
    .filter(|det| det.class_label == label && !det.y1.is_nan())
    .min_by(|a, b| a.y1.total_cmp(&b.y1))
}

/// 终点策略：同类检测中置信度最高的一个
pub fn select_most_confident<'a>(detections: &'a [Detection], label: &str) -> Option<&'a Detection> {
  // `max_by` 在相等时返回最后一个，这里需要保留第一个
  detections
    .iter()
    .filter(|det| det.class_label == label && !det.confidence.is_nan())
    .reduce(|best, det| {
      if det.confidence.total_cmp(&best.confidence).is_gt() {
        det
      } else {
        best
      }
    })
}

pub fn resolve<'a>(
  detections: &'a [Detection],
  target_label: &str,
  destination_label: &str,
) -> (Option<&'a Detection>, Option<&'a Detection>) {
  (
    select_nearest_target(detections, target_label),
    select_most_confident(detections, destination_label),
  )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
  pub target: Option<&'a Detection>,
  pub destination: Option<&'a Detection>,
}

#[derive(Debug, Clone)]
pub struct TargetResolver {
  target_label: String,
  destination_label: String,
}

impl TargetResolver {
  pub fn new(target_label: impl Into<String>, destination_label: impl Into<String>) -> Self {
    Self {
      target_label: target_label.into(),
      destination_label: destination_label.into(),
    }
  }

  pub fn target_label(&self) -> &str {
    &self.target_label
  }

  pub fn destination_label(&self) -> &str {
    &self.destination_label
  }

  pub fn resolve<'a>(&self, detections: &'a [Detection]) -> Resolution<'a> {
    let (target, destination) = resolve(detections, &self.target_label, &self.destination_label);
    debug!(
      "选取结果: 目标 {:?}, 终点 {:?} (共 {} 个检测)",
      target,
      destination,
      detections.len()
    );
    Resolution {
      target,
      destination,
    }
  }
}
