// 该文件是 Target Locator （寻的） 项目的一部分。
// src/input.rs - 帧输入与帧到达处理
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

use std::{
  sync::Arc,
  thread::{self, JoinHandle},
};

use thiserror::Error;
use tracing::{info, warn};

use crate::{FromUrl, frame::RgbFrame, frame_buffer::FrameBuffer};

#[cfg(feature = "read_image_file")]
mod read_image_file;
#[cfg(feature = "read_image_file")]
pub use self::read_image_file::{ImageFileInput, ImageFileInputError};

#[cfg(feature = "v4l_input")]
mod v4l_input;
#[cfg(feature = "v4l_input")]
pub use self::v4l_input::{V4lInput, V4lInputError};

#[derive(Error, Debug)]
pub enum InputError {
  #[cfg(feature = "read_image_file")]
  #[error("Image file input error: {0}")]
  ImageFileInputError(#[from] ImageFileInputError),
  #[cfg(feature = "v4l_input")]
  #[error("V4L input error: {0}")]
  V4lInputError(#[from] V4lInputError),
  #[error("URI scheme mismatch: {0}")]
  SchemeMismatch(String),
}

pub enum InputWrapper {
  #[cfg(feature = "read_image_file")]
  ReadImageFile(ImageFileInput),
  #[cfg(feature = "v4l_input")]
  V4l(V4lInput),
}

impl FromUrl for InputWrapper {
  type Error = InputError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    #[cfg(feature = "read_image_file")]
    {
      use crate::FromUrlWithScheme;

      if url.scheme() == ImageFileInput::SCHEME {
        let input = ImageFileInput::from_url(url)?;
        return Ok(InputWrapper::ReadImageFile(input));
      }
    }
    #[cfg(feature = "v4l_input")]
    {
      use crate::FromUrlWithScheme;

      if url.scheme() == V4lInput::SCHEME {
        let input = V4lInput::from_url(url)?;
        return Ok(InputWrapper::V4l(input));
      }
    }
    Err(InputError::SchemeMismatch(url.scheme().to_string()))
  }
}

impl Iterator for InputWrapper {
  type Item = RgbFrame;

  fn next(&mut self) -> Option<Self::Item> {
    match *self {
      #[cfg(feature = "read_image_file")]
      InputWrapper::ReadImageFile(ref mut input) => input.next(),
      #[cfg(feature = "v4l_input")]
      InputWrapper::V4l(ref mut input) => input.next(),
    }
  }
}

/// 帧到达处理：在独立线程上把输入源的每一帧写入帧缓存
///
/// 与发布循环之间只通过 `FrameBuffer` 通信。
pub struct FrameFeeder {
  handle: JoinHandle<usize>,
}

impl FrameFeeder {
  pub fn spawn<I>(source: I, buffer: Arc<FrameBuffer>) -> std::io::Result<Self>
  where
    I: Iterator<Item = RgbFrame> + Send + 'static,
  {
    let handle = thread::Builder::new()
      .name("frame-feeder".to_string())
      .spawn(move || feed(source, &buffer))?;
    Ok(Self { handle })
  }

  pub fn is_finished(&self) -> bool {
    self.handle.is_finished()
  }

  /// 等待输入源结束，返回写入缓存的帧数
  pub fn join(self) -> thread::Result<usize> {
    self.handle.join()
  }
}

fn feed<I>(source: I, buffer: &FrameBuffer) -> usize
where
  I: Iterator<Item = RgbFrame>,
{
  info!("帧输入线程启动");
  let mut delivered = 0usize;
  for frame in source {
    if frame.is_empty() {
      warn!("丢弃空帧: {}x{}", frame.width(), frame.height());
      continue;
    }
    buffer.set(frame);
    delivered += 1;
  }
  info!("输入源结束，共接收 {} 帧，保留最后一帧", delivered);
  delivered
}
