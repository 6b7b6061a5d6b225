// 该文件是 Target Locator （寻的） 项目的一部分。
// src/normalize.rs - 检测框到归一化坐标的转换
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

use crate::model::Detection;

/// 缺失坐标在消息中的取值
pub const ABSENT_SENTINEL: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizedPosition {
  Present { x: f64, y: f64 },
  Absent,
}

impl NormalizedPosition {
  pub fn as_pair(&self) -> [f64; 2] {
    match *self {
      NormalizedPosition::Present { x, y } => [x, y],
      NormalizedPosition::Absent => [ABSENT_SENTINEL, ABSENT_SENTINEL],
    }
  }

  pub fn is_absent(&self) -> bool {
    matches!(self, NormalizedPosition::Absent)
  }
}

/// 横向取框中心；纵向锚点取 `y2 + 0.5·h`，偏向框的下沿，供下游估计接地点。
///
/// 结果不做截断，框超出画面时坐标可能落在 `[0, 1]` 之外。
pub fn normalize(
  detection: Option<&Detection>,
  frame_width: usize,
  frame_height: usize,
) -> NormalizedPosition {
  let Some(det) = detection else {
    return NormalizedPosition::Absent;
  };

  let x_center = f64::from(det.x1) + 0.5 * f64::from(det.w);
  let y_anchor = f64::from(det.y2()) + 0.5 * f64::from(det.h);

  NormalizedPosition::Present {
    x: x_center / frame_width as f64,
    y: y_anchor / frame_height as f64,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn boxed(x1: f32, y1: f32, w: f32, h: f32) -> Detection {
    Detection {
      class_label: "sports ball".to_string(),
      x1,
      y1,
      w,
      h,
      confidence: 0.8,
    }
  }

  #[test]
  fn absent_maps_to_sentinel_pair() {
    let pos = normalize(None, 640, 480);
    assert!(pos.is_absent());
    assert_eq!(pos.as_pair(), [-1.0, -1.0]);
  }

  #[test]
  fn anchor_uses_bottom_edge() {
    // y1 = 160, h = 40 => y2 = 200, 锚点 = 220
    let det = boxed(100.0, 160.0, 50.0, 40.0);
    let [x, y] = normalize(Some(&det), 400, 300).as_pair();
    assert_eq!(x, 0.3125);
    assert!((y - 220.0 / 300.0).abs() < 1e-12);
  }

  #[test]
  fn out_of_frame_boxes_are_not_clamped() {
    let det = boxed(380.0, 280.0, 80.0, 60.0);
    let [x, y] = normalize(Some(&det), 400, 300).as_pair();
    assert!(x > 1.0);
    assert!(y > 1.0);
  }

  #[test]
  fn normalize_is_pure() {
    let det = boxed(13.7, 41.3, 9.1, 77.7);
    let first = normalize(Some(&det), 641, 479).as_pair();
    let second = normalize(Some(&det), 641, 479).as_pair();
    assert_eq!(first[0].to_bits(), second[0].to_bits());
    assert_eq!(first[1].to_bits(), second[1].to_bits());
  }
}
