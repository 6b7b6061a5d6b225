// 该文件是 Target Locator （寻的） 项目的一部分。
// src/input/v4l_input.rs - V4L 摄像头输入
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

use crate::{FromUrl, FromUrlWithScheme, frame::RgbFrame};

use thiserror::Error;
use tracing::{error, info};
use url::Url;
use v4l::{
  Device, FourCC,
  buffer::Type,
  io::{mmap::Stream, traits::CaptureStream},
  video::Capture,
};

#[derive(Error, Debug)]
pub enum V4lInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Invalid query parameter: {0}")]
  InvalidQuery(String),
  #[error("Unsupported pixel format: {0}")]
  UnsupportedPixelFormat(String),
}

const DEFAULT_DEVICE: &str = "/dev/video0";
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const BUFFER_COUNT: u32 = 4;

/// 驱动实际协商出的像素格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelFormat {
  Rgb3,
  Yuyv,
}

impl PixelFormat {
  fn from_fourcc(fourcc: FourCC) -> Option<Self> {
    match &fourcc.repr {
      b"RGB3" => Some(PixelFormat::Rgb3),
      b"YUYV" => Some(PixelFormat::Yuyv),
      _ => None,
    }
  }

  fn frame_bytes(&self, width: usize, height: usize) -> usize {
    match self {
      PixelFormat::Rgb3 => width * height * 3,
      PixelFormat::Yuyv => width * height * 2,
    }
  }
}

/// 摄像头输入：`v4l:///dev/video0?width=640&height=480`
///
/// 优先请求 RGB24，驱动不支持时退回 YUYV 并在取帧时转换。
pub struct V4lInput {
  stream: Stream<'static>,
  _device: Device,
  pixel_format: PixelFormat,
  width: usize,
  height: usize,
}

impl FromUrlWithScheme for V4lInput {
  const SCHEME: &'static str = "v4l";
}

impl FromUrl for V4lInput {
  type Error = V4lInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(V4lInputError::SchemaMismatch);
    }

    let device_path = if url.path().is_empty() || url.path() == "/" {
      DEFAULT_DEVICE.to_string()
    } else {
      url.path().to_string()
    };

    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    for (k, v) in url.query_pairs() {
      let value = || {
        v.parse::<u32>()
          .map_err(|_| V4lInputError::InvalidQuery(format!("{}={}", k, v)))
      };
      match k.as_ref() {
        "width" => width = value()?,
        "height" => height = value()?,
        _ => {}
      }
    }

    let device = Device::with_path(&device_path)?;
    let mut format = device.format()?;
    format.width = width;
    format.height = height;
    format.fourcc = FourCC::new(b"RGB3");
    let mut format = device.set_format(&format)?;

    if PixelFormat::from_fourcc(format.fourcc).is_none() {
      info!("设备不支持 RGB3 (协商结果 {})，尝试 YUYV", format.fourcc);
      format.fourcc = FourCC::new(b"YUYV");
      format = device.set_format(&format)?;
    }
    let pixel_format = PixelFormat::from_fourcc(format.fourcc)
      .ok_or_else(|| V4lInputError::UnsupportedPixelFormat(format.fourcc.to_string()))?;

    let stream = Stream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)?;
    info!(
      "打开摄像头 {}: {}x{} ({:?})",
      device_path, format.width, format.height, pixel_format
    );

    Ok(V4lInput {
      stream,
      _device: device,
      pixel_format,
      width: format.width as usize,
      height: format.height as usize,
    })
  }
}

impl Iterator for V4lInput {
  type Item = RgbFrame;

  fn next(&mut self) -> Option<Self::Item> {
    let buf = match self.stream.next() {
      Ok((buf, _meta)) => buf,
      Err(e) => {
        error!("Failed to capture frame: {}", e);
        return None;
      }
    };

    let expected = self.pixel_format.frame_bytes(self.width, self.height);
    if buf.len() < expected {
      error!(
        "Captured buffer size mismatch: expected {}, found {}",
        expected,
        buf.len()
      );
      return None;
    }

    let frame = match self.pixel_format {
      PixelFormat::Rgb3 => RgbFrame::from_raw(self.height, self.width, buf[..expected].to_vec()),
      PixelFormat::Yuyv => RgbFrame::from_yuyv(self.height, self.width, &buf[..expected]),
    };
    match frame {
      Ok(frame) => Some(frame),
      Err(e) => {
        error!("Failed to build frame: {}", e);
        None
      }
    }
  }
}
