// 该文件是 Target Locator （寻的） 项目的一部分。
// tests/cli.rs - 命令行输出流测试
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


use std::process::Command;

#[test]
fn logs_stay_off_the_message_stream() {
  let output = Command::new(env!("CARGO_BIN_EXE_target-locator"))
    .args([
      "--input",
      "image:///nonexistent/frame.png",
      "--model",
      "yolo26:///opt/models/yolo26.rknn",
      "--target",
      "backpack",
      "--destination",
      "backpack",
    ])
    .output()
    .unwrap();

  // 配置错误：进程失败退出，日志与错误都写在标准错误
  assert!(!output.status.success());
  assert!(output.stdout.is_empty());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("输入来源"));
}
