// 该文件是 Target Locator （寻的） 项目的一部分。
// src/model.rs - 检测模型与适配层
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

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::frame::RgbFrame;

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 单个检测结果，坐标单位为像素
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
  pub class_label: String,
  /// 左上角横坐标
  pub x1: f32,
  /// 左上角纵坐标
  pub y1: f32,
  pub w: f32,
  pub h: f32,
  pub confidence: f32,
}

impl Detection {
  pub fn x2(&self) -> f32 {
    self.x1 + self.w
  }

  pub fn y2(&self) -> f32 {
    self.y1 + self.h
  }
}

/// 一帧内的全部检测，保持模型输出顺序，允许重复
pub type DetectionSet = Vec<Detection>;

#[derive(Error, Debug)]
pub enum DetectionFailure {
  #[error("输入帧为空: {height}x{width}")]
  EmptyFrame { height: usize, width: usize },
  #[error("模型推理失败: {0}")]
  Model(String),
}

/// 发布循环看到的检测接口
pub trait Detector {
  fn detect(&self, frame: &RgbFrame) -> Result<DetectionSet, DetectionFailure>;
}

/// 把任意 `Model` 包装成 `Detector`，统一错误类型并拒绝空帧
pub struct DetectorAdapter<M> {
  model: M,
}

impl<M> DetectorAdapter<M> {
  pub fn new(model: M) -> Self {
    Self { model }
  }

  pub fn into_inner(self) -> M {
    self.model
  }
}

impl<M> Detector for DetectorAdapter<M>
where
  M: Model<Input = RgbFrame, Output = DetectionSet>,
  M::Error: std::fmt::Display,
{
  fn detect(&self, frame: &RgbFrame) -> Result<DetectionSet, DetectionFailure> {
    if frame.is_empty() {
      return Err(DetectionFailure::EmptyFrame {
        height: frame.height(),
        width: frame.width(),
      });
    }

    let now = std::time::Instant::now();
    let detections = self
      .model
      .infer(frame)
      .map_err(|e| DetectionFailure::Model(e.to_string()))?;
    debug!(
      "推理完成，耗时: {:.2?}, 检测到 {} 个物体",
      now.elapsed(),
      detections.len()
    );
    Ok(detections)
  }
}

mod labels;
pub use self::labels::{ClassNames, ClassNamesError};

#[cfg(feature = "model_yolo26")]
mod yolo26;
#[cfg(feature = "model_yolo26")]
pub use self::yolo26::{Yolo26, Yolo26Builder, Yolo26Error};

#[derive(Error, Debug)]
pub enum ModelError {
  #[cfg(feature = "model_yolo26")]
  #[error("YOLO26 模型错误: {0}")]
  Yolo26Error(#[from] Yolo26Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum ModelWrapper {
  #[cfg(feature = "model_yolo26")]
  Yolo26(Yolo26),
}

impl ModelWrapper {
  /// 按 URL 方案加载模型，`class_names` 用于把类别编号映射为标签
  #[allow(unused_variables)]
  pub fn open(url: &Url, class_names: ClassNames) -> Result<Self, ModelError> {
    #[cfg(feature = "model_yolo26")]
    {
      use crate::{FromUrl, FromUrlWithScheme};

      if url.scheme() == Yolo26Builder::SCHEME {
        let model = Yolo26Builder::from_url(url)?
          .class_names(class_names)
          .build()?;
        return Ok(ModelWrapper::Yolo26(model));
      }
    }
    Err(ModelError::SchemeMismatch(url.scheme().to_string()))
  }
}

impl Model for ModelWrapper {
  type Input = RgbFrame;
  type Output = DetectionSet;
  type Error = ModelError;

  #[allow(unused_variables)]
  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    match *self {
      #[cfg(feature = "model_yolo26")]
      ModelWrapper::Yolo26(ref model) => model.infer(input).map_err(ModelError::from),
    }
  }
}
