// 该文件是 Target Locator （寻的） 项目的一部分。
// src/frame_buffer.rs - 最新帧缓存
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

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::frame::RgbFrame;

/// 单槽帧缓存：新帧直接覆盖旧帧，读取不消费
///
/// 槽内只会是完整的 `Arc<RgbFrame>`，读写双方不会看到半帧。
#[derive(Debug, Default)]
pub struct FrameBuffer {
  slot: Mutex<Option<Arc<RgbFrame>>>,
}

impl FrameBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&self, frame: RgbFrame) {
    let frame = Arc::new(frame);
    *self.lock() = Some(frame);
  }

  /// 返回当前帧；尚未收到任何帧时返回 `None`
  pub fn get(&self) -> Option<Arc<RgbFrame>> {
    self.lock().clone()
  }

  // 槽内容总是一次性整体替换，锁中毒后数据依然完整
  fn lock(&self) -> MutexGuard<'_, Option<Arc<RgbFrame>>> {
    self.slot.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::thread;

  #[test]
  fn empty_until_first_set() {
    let buffer = FrameBuffer::new();
    assert!(buffer.get().is_none());
    buffer.set(RgbFrame::with_shape(2, 2));
    assert!(buffer.get().is_some());
  }

  #[test]
  fn latest_write_wins() {
    let buffer = FrameBuffer::new();
    buffer.set(RgbFrame::with_shape(2, 2));
    buffer.set(RgbFrame::with_shape(4, 8));
    let frame = buffer.get().unwrap();
    assert_eq!((frame.height(), frame.width()), (4, 8));
  }

  #[test]
  fn get_does_not_consume() {
    let buffer = FrameBuffer::new();
    buffer.set(RgbFrame::with_shape(3, 3));
    assert!(buffer.get().is_some());
    assert!(buffer.get().is_some());
  }

  #[test]
  fn concurrent_writer_never_tears_frames() {
    let buffer = Arc::new(FrameBuffer::new());
    let writer = {
      let buffer = buffer.clone();
      thread::spawn(move || {
        for i in 0..200u8 {
          let frame = RgbFrame::from_raw(4, 4, vec![i; 48]).unwrap();
          buffer.set(frame);
        }
      })
    };

    for _ in 0..200 {
      if let Some(frame) = buffer.get() {
        let first = frame.as_hwc()[0];
        assert!(frame.as_hwc().iter().all(|&b| b == first));
      }
    }
    writer.join().unwrap();
  }
}
