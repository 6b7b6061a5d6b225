// 该文件是 Target Locator （寻的） 项目的一部分。
// src/frame.rs - RGB 帧定义
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

use std::{borrow::Cow, str::FromStr};

use thiserror::Error;

const RGB_CHANNELS: usize = 3;
const YUYV_BYTES_PER_PAIR: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
  #[error("数据长度不匹配: 期望长度 {expected}, 实际长度 {actual}")]
  ShapeMismatch { expected: usize, actual: usize },
}

/// 交错排列（HWC）的 8 位 RGB 帧
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
  height: usize,
  width: usize,
  data: Box<[u8]>,
}

impl RgbFrame {
  pub fn with_shape(height: usize, width: usize) -> Self {
    let data = vec![0u8; RGB_CHANNELS * height * width].into_boxed_slice();
    Self {
      height,
      width,
      data,
    }
  }

  pub fn from_raw(height: usize, width: usize, data: Vec<u8>) -> Result<Self, FrameError> {
    let expected = RGB_CHANNELS * height * width;
    if data.len() != expected {
      return Err(FrameError::ShapeMismatch {
        expected,
        actual: data.len(),
      });
    }

    Ok(Self {
      height,
      width,
      data: data.into_boxed_slice(),
    })
  }

  /// 由 YUYV (YUV 4:2:2) 数据转换，每 4 字节描述两个相邻像素
  pub fn from_yuyv(height: usize, width: usize, yuyv: &[u8]) -> Result<Self, FrameError> {
    let expected = 2 * height * width;
    if width % 2 != 0 || yuyv.len() != expected {
      return Err(FrameError::ShapeMismatch {
        expected,
        actual: yuyv.len(),
      });
    }

    let mut frame = Self::with_shape(height, width);
    for (dst, src) in frame
      .data
      .chunks_exact_mut(2 * RGB_CHANNELS)
      .zip(yuyv.chunks_exact(YUYV_BYTES_PER_PAIR))
    {
      let u = f32::from(src[1]) - 128.0;
      let v = f32::from(src[3]) - 128.0;
      for (pixel, y) in dst.chunks_exact_mut(RGB_CHANNELS).zip([src[0], src[2]]) {
        let y = f32::from(y);
        pixel[0] = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
        pixel[1] = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
        pixel[2] = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
      }
    }
    Ok(frame)
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }

  pub fn is_empty(&self) -> bool {
    self.height == 0 || self.width == 0
  }

  pub fn as_hwc(&self) -> &[u8] {
    &self.data
  }

  /// 像素 `(r, c)` 移动到 `(H-1-r, W-1-c)`，通道顺序不变
  pub fn rotated_180(&self) -> Self {
    let mut rotated = Self::with_shape(self.height, self.width);
    for (dst, src) in rotated
      .data
      .chunks_exact_mut(RGB_CHANNELS)
      .zip(self.data.chunks_exact(RGB_CHANNELS).rev())
    {
      dst.copy_from_slice(src);
    }
    rotated
  }

  /// 最近邻缩放到模型输入尺寸
  pub fn resized_nearest(&self, height: usize, width: usize) -> Self {
    let mut resized = Self::with_shape(height, width);
    if self.is_empty() {
      return resized;
    }

    for r in 0..height {
      let src_r = r * self.height / height;
      for c in 0..width {
        let src_c = c * self.width / width;
        let src = (src_r * self.width + src_c) * RGB_CHANNELS;
        let dst = (r * width + c) * RGB_CHANNELS;
        resized.data[dst..dst + RGB_CHANNELS].copy_from_slice(&self.data[src..src + RGB_CHANNELS]);
      }
    }
    resized
  }
}

impl AsMut<[u8]> for RgbFrame {
  fn as_mut(&mut self) -> &mut [u8] {
    &mut self.data
  }
}

/// 摄像头安装方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountOrientation {
  Upright,
  /// 摄像头倒装，推理前需要旋转 180°
  #[default]
  Inverted,
}

impl MountOrientation {
  /// 正装时直接借用原帧，倒装时返回旋转后的副本
  pub fn correct<'a>(&self, frame: &'a RgbFrame) -> Cow<'a, RgbFrame> {
    match self {
      MountOrientation::Upright => Cow::Borrowed(frame),
      MountOrientation::Inverted => Cow::Owned(frame.rotated_180()),
    }
  }
}

impl FromStr for MountOrientation {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "upright" => Ok(MountOrientation::Upright),
      "inverted" => Ok(MountOrientation::Inverted),
      other => Err(format!("未知的安装方向: {}", other)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn numbered_frame(height: usize, width: usize) -> RgbFrame {
    let data = (0..height * width)
      .flat_map(|i| [i as u8, i as u8 + 100, 7])
      .collect();
    RgbFrame::from_raw(height, width, data).unwrap()
  }

  #[test]
  fn from_raw_rejects_wrong_length() {
    let err = RgbFrame::from_raw(2, 2, vec![0; 11]).unwrap_err();
    assert_eq!(
      err,
      FrameError::ShapeMismatch {
        expected: 12,
        actual: 11
      }
    );
  }

  #[test]
  fn rotation_flips_both_axes() {
    let frame = numbered_frame(2, 3);
    let rotated = frame.rotated_180();
    assert_eq!(rotated.height(), 2);
    assert_eq!(rotated.width(), 3);
    // 左上角像素来自原图右下角（索引 5）
    assert_eq!(&rotated.as_hwc()[0..3], &[5, 105, 7]);
    // 右下角像素来自原图左上角（索引 0）
    assert_eq!(&rotated.as_hwc()[15..18], &[0, 100, 7]);
  }

  #[test]
  fn rotating_twice_restores_frame() {
    let frame = numbered_frame(4, 5);
    assert_eq!(frame.rotated_180().rotated_180(), frame);
  }

  #[test]
  fn upright_mount_borrows_frame() {
    let frame = numbered_frame(3, 3);
    let corrected = MountOrientation::Upright.correct(&frame);
    assert!(matches!(corrected, Cow::Borrowed(_)));
    assert!(std::ptr::eq(&*corrected, &frame));

    let inverted = MountOrientation::Inverted.correct(&frame);
    assert!(matches!(inverted, Cow::Owned(_)));
    assert_eq!(*inverted, frame.rotated_180());
  }

  #[test]
  fn yuyv_converts_pixel_pairs() {
    // 灰色 (U=V=128) 只取亮度；第二对为纯红附近的色度
    let yuyv = [50, 128, 200, 128, 76, 85, 76, 255];
    let frame = RgbFrame::from_yuyv(1, 4, &yuyv).unwrap();
    assert_eq!(
      frame.as_hwc(),
      &[50, 50, 50, 200, 200, 200, 254, 0, 0, 254, 0, 0]
    );
  }

  #[test]
  fn yuyv_rejects_wrong_length_or_odd_width() {
    assert_eq!(
      RgbFrame::from_yuyv(2, 2, &[0; 7]).unwrap_err(),
      FrameError::ShapeMismatch {
        expected: 8,
        actual: 7
      }
    );
    assert!(RgbFrame::from_yuyv(1, 3, &[0; 6]).is_err());
  }

  #[test]
  fn nearest_resize_samples_source_pixels() {
    let frame = numbered_frame(2, 2);
    let resized = frame.resized_nearest(4, 4);
    assert_eq!((resized.height(), resized.width()), (4, 4));
    assert_eq!(&resized.as_hwc()[0..3], &[0, 100, 7]);
    // 第 0 行第 3 列映射到原图 (0, 1)
    assert_eq!(&resized.as_hwc()[9..12], &[1, 101, 7]);
    // 第 3 行第 3 列映射到原图 (1, 1)
    assert_eq!(&resized.as_hwc()[45..48], &[3, 103, 7]);
  }

  #[test]
  fn empty_frame_is_detected() {
    assert!(RgbFrame::with_shape(0, 10).is_empty());
    assert!(RgbFrame::with_shape(10, 0).is_empty());
    assert!(!RgbFrame::with_shape(1, 1).is_empty());
  }

  #[test]
  fn orientation_parses_case_insensitively() {
    assert_eq!(
      "Inverted".parse::<MountOrientation>(),
      Ok(MountOrientation::Inverted)
    );
    assert_eq!(
      "upright".parse::<MountOrientation>(),
      Ok(MountOrientation::Upright)
    );
    assert!("sideways".parse::<MountOrientation>().is_err());
  }
}
