// 该文件是 Target Locator （寻的） 项目的一部分。
// src/task.rs - 定频发布循环
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
  fmt::Display,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  thread,
  time::{Duration, Instant},
};

use tracing::{debug, error, info, warn};

use crate::{
  frame::MountOrientation,
  frame_buffer::FrameBuffer,
  model::Detector,
  normalize::normalize,
  publish::{PositionMessage, Publish},
  resolve::TargetResolver,
};

/// 进程退出信号，只在两次循环之间检查
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
  flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
  pub fn new() -> Self {
    Self::default()
  }

  /// 把 Ctrl-C / SIGTERM 接到退出信号上
  pub fn install_ctrlc(&self) -> Result<(), ctrlc::Error> {
    let flag = self.flag.clone();
    ctrlc::set_handler(move || {
      info!("收到中断信号，本轮发布结束后退出...");
      flag.store(true, Ordering::SeqCst);
    })
  }

  pub fn trigger(&self) {
    self.flag.store(true, Ordering::SeqCst);
  }

  pub fn is_triggered(&self) -> bool {
    self.flag.load(Ordering::SeqCst)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
  WaitingForFrame,
  Processing,
}

/// 一轮循环的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
  pub state: LoopState,
  pub message: PositionMessage,
}

pub struct PublishLoop<D, P> {
  buffer: Arc<FrameBuffer>,
  detector: D,
  resolver: TargetResolver,
  publisher: P,
  mount: MountOrientation,
  period: Duration,
}

impl<D, P> PublishLoop<D, P> {
  pub fn publisher(&self) -> &P {
    &self.publisher
  }

  pub fn into_parts(self) -> (D, P) {
    (self.detector, self.publisher)
  }
}

impl<D, P> PublishLoop<D, P>
where
  D: Detector,
  P: Publish,
  P::Error: Display,
{
  pub fn new(
    buffer: Arc<FrameBuffer>,
    detector: D,
    resolver: TargetResolver,
    publisher: P,
  ) -> Self {
    Self {
      buffer,
      detector,
      resolver,
      publisher,
      mount: MountOrientation::default(),
      period: Duration::from_millis(100),
    }
  }

  pub fn with_mount(mut self, mount: MountOrientation) -> Self {
    self.mount = mount;
    self
  }

  pub fn with_period(mut self, period: Duration) -> Self {
    self.period = period;
    self
  }

  /// 执行一轮：取帧、推理、选取、归一化、发布，并返回发布的消息
  pub fn tick(&self) -> Tick {
    let (state, message) = match self.buffer.get() {
      None => (LoopState::WaitingForFrame, PositionMessage::absent()),
      Some(frame) => (LoopState::Processing, self.process(&self.mount.correct(&frame))),
    };

    if let Err(e) = self.publisher.publish(&message) {
      error!("发布失败: {}", e);
    }

    Tick { state, message }
  }

  fn process(&self, frame: &crate::frame::RgbFrame) -> PositionMessage {
    let detections = match self.detector.detect(frame) {
      Ok(detections) => detections,
      Err(e) => {
        warn!("检测失败，本轮按无检测处理: {}", e);
        return PositionMessage::absent();
      }
    };

    let resolution = self.resolver.resolve(&detections);
    let (width, height) = (frame.width(), frame.height());
    PositionMessage::new(
      normalize(resolution.target, width, height),
      normalize(resolution.destination, width, height),
    )
  }

  /// 按固定周期循环，直到收到退出信号；返回执行的轮数
  pub fn run(&self, shutdown: &ShutdownSignal) -> u64 {
    info!(
      "开始发布循环，周期 {:.2?}，目标类别 {}，终点类别 {}",
      self.period,
      self.resolver.target_label(),
      self.resolver.destination_label()
    );
    let mut cycles = 0u64;
    let mut last_state = None;

    while !shutdown.is_triggered() {
      let started = Instant::now();
      let tick = self.tick();
      cycles += 1;

      if last_state != Some(tick.state) {
        info!("循环状态: {:?}", tick.state);
        last_state = Some(tick.state);
      }
      debug!("第 {} 轮发布: {:?}", cycles, tick.message.data);

      let elapsed = started.elapsed();
      match self.period.checked_sub(elapsed) {
        Some(remaining) => thread::sleep(remaining),
        None => warn!("第 {} 轮耗时 {:.2?}，超过周期 {:.2?}", cycles, elapsed, self.period),
      }
    }

    info!("发布循环结束，共 {} 轮", cycles);
    cycles
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    frame::RgbFrame,
    model::{Detection, DetectionFailure, DetectionSet},
  };
  use std::cell::RefCell;

  struct FixedDetector(DetectionSet);

  impl Detector for FixedDetector {
    fn detect(&self, _frame: &RgbFrame) -> Result<DetectionSet, DetectionFailure> {
      Ok(self.0.clone())
    }
  }

  #[derive(Default)]
  struct Recorder(RefCell<Vec<PositionMessage>>);

  impl Publish for Recorder {
    type Error = std::convert::Infallible;

    fn publish(&self, msg: &PositionMessage) -> Result<(), Self::Error> {
      self.0.borrow_mut().push(*msg);
      Ok(())
    }
  }

  fn det(label: &str, x1: f32, y1: f32, w: f32, h: f32, confidence: f32) -> Detection {
    Detection {
      class_label: label.to_string(),
      x1,
      y1,
      w,
      h,
      confidence,
    }
  }

  #[test]
  fn waiting_for_frame_publishes_absent() {
    let task = PublishLoop::new(
      Arc::new(FrameBuffer::new()),
      FixedDetector(vec![]),
      TargetResolver::new("sports ball", "backpack"),
      Recorder::default(),
    );
    let tick = task.tick();
    assert_eq!(tick.state, LoopState::WaitingForFrame);
    assert_eq!(tick.message.data, [-1.0; 4]);
    assert_eq!(task.publisher().0.borrow().len(), 1);
  }

  #[test]
  fn processing_normalizes_both_selections() {
    let buffer = Arc::new(FrameBuffer::new());
    buffer.set(RgbFrame::with_shape(300, 400));
    let task = PublishLoop::new(
      buffer,
      FixedDetector(vec![
        det("sports ball", 100.0, 160.0, 50.0, 40.0, 0.7),
        det("backpack", 0.0, 0.0, 40.0, 30.0, 0.3),
        det("backpack", 200.0, 60.0, 80.0, 60.0, 0.9),
      ]),
      TargetResolver::new("sports ball", "backpack"),
      Recorder::default(),
    )
    .with_mount(MountOrientation::Upright);

    let tick = task.tick();
    assert_eq!(tick.state, LoopState::Processing);
    let [tx, ty, dx, dy] = tick.message.data;
    assert_eq!(tx, 0.3125);
    assert!((ty - 220.0 / 300.0).abs() < 1e-9);
    assert_eq!(dx, 240.0 / 400.0);
    assert_eq!(dy, 150.0 / 300.0);
  }

  #[test]
  fn missing_destination_only_blanks_its_slot() {
    let buffer = Arc::new(FrameBuffer::new());
    buffer.set(RgbFrame::with_shape(100, 100));
    let task = PublishLoop::new(
      buffer,
      FixedDetector(vec![det("sports ball", 10.0, 10.0, 20.0, 20.0, 0.9)]),
      TargetResolver::new("sports ball", "backpack"),
      Recorder::default(),
    );
    let [tx, ty, dx, dy] = task.tick().message.data;
    assert_eq!((tx, ty), (0.2, 0.4));
    assert_eq!((dx, dy), (-1.0, -1.0));
  }

  #[test]
  fn run_returns_immediately_when_already_shut_down() {
    let task = PublishLoop::new(
      Arc::new(FrameBuffer::new()),
      FixedDetector(vec![]),
      TargetResolver::new("sports ball", "backpack"),
      Recorder::default(),
    );
    let shutdown = ShutdownSignal::new();
    shutdown.trigger();
    assert_eq!(task.run(&shutdown), 0);
    assert!(task.publisher().0.borrow().is_empty());
  }
}
