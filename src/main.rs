// 该文件是 Target Locator （寻的） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use target_locator::{
  FromUrl,
  config::Config,
  frame_buffer::FrameBuffer,
  input::{FrameFeeder, InputWrapper},
  model::{DetectorAdapter, ModelWrapper},
  publish::PublisherWrapper,
  task::{PublishLoop, ShutdownSignal},
};

fn main() -> Result<()> {
  // 日志走标准错误，标准输出只留给 JSON 消息
  tracing_subscriber::fmt().with_writer(std::io::stderr).init();

  let args = args::Args::parse();

  info!("输入来源: {}", args.input);
  info!("模型文件路径: {}", args.model);
  info!("发布目标: {}", args.output);

  // 配置错误在进入循环前直接退出
  let config = Config::from(&args);
  let class_names = config.validate()?;

  info!("正在加载模型...");
  let model = ModelWrapper::open(&args.model, class_names)?;
  let publisher = PublisherWrapper::from_url(&args.output)?;
  info!("发布话题: {}", publisher.topic());
  let input = InputWrapper::from_url(&args.input)?;

  let shutdown = ShutdownSignal::new();
  shutdown.install_ctrlc()?;

  let buffer = Arc::new(FrameBuffer::new());
  let feeder = FrameFeeder::spawn(input, buffer.clone())?;

  let task = PublishLoop::new(buffer, DetectorAdapter::new(model), config.resolver(), publisher)
    .with_mount(config.mount)
    .with_period(config.period());
  task.run(&shutdown);

  if feeder.is_finished() {
    info!("输入线程已结束");
  }
  info!("任务完成，退出");
  Ok(())
}
