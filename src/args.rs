// 该文件是 Target Locator （寻的） 项目的一部分。
// src/args.rs - 命令行参数
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

use std::path::PathBuf;

use clap::Parser;
use target_locator::{
  config::{Config, DEFAULT_DESTINATION_LABEL, DEFAULT_RATE_HZ, DEFAULT_TARGET_LABEL},
  frame::MountOrientation,
};
use url::Url;

/// 目标定位节点参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源
  /// - 图片: image:///path/to/frame.png
  /// - V4L2: v4l:///dev/video0?width=640&height=480
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,

  /// 模型路径，例如 yolo26:///opt/models/yolo26.rknn
  #[arg(long, value_name = "MODEL")]
  pub model: Url,

  /// 发布目标，例如 stdout:///ball_pos 或 udp://127.0.0.1:9870/ball_pos
  #[arg(long, value_name = "OUTPUT", default_value = "stdout:///ball_pos")]
  pub output: Url,

  /// 类别名称文件（每行一个），缺省使用内置 COCO 类别
  #[arg(long, value_name = "FILE")]
  pub class_names: Option<PathBuf>,

  /// 目标类别
  #[arg(long, default_value = DEFAULT_TARGET_LABEL, value_name = "LABEL")]
  pub target: String,

  /// 终点类别
  #[arg(long, default_value = DEFAULT_DESTINATION_LABEL, value_name = "LABEL")]
  pub destination: String,

  /// 发布频率 (Hz)
  #[arg(long, default_value_t = DEFAULT_RATE_HZ, value_name = "HZ")]
  pub rate: f64,

  /// 摄像头安装方向: upright 或 inverted
  #[arg(long, default_value = "inverted", value_name = "MOUNT")]
  pub mount: MountOrientation,
}

impl From<&Args> for Config {
  fn from(args: &Args) -> Self {
    Config {
      target_label: args.target.clone(),
      destination_label: args.destination.clone(),
      rate_hz: args.rate,
      mount: args.mount,
      class_names_path: args.class_names.clone(),
    }
  }
}
