// 该文件是 Target Locator （寻的） 项目的一部分。
// src/publish/stdout.rs - 标准输出发布
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

use std::io::Write;

use thiserror::Error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  publish::{PositionMessage, Publish, encode, topic_from_url},
};

#[derive(Error, Debug)]
pub enum StdoutPublisherError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("序列化错误: {0}")]
  SerializeError(#[from] serde_json::Error),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 每条消息输出一行 JSON
pub struct StdoutPublisher {
  topic: String,
}

impl FromUrlWithScheme for StdoutPublisher {
  const SCHEME: &'static str = "stdout";
}

impl FromUrl for StdoutPublisher {
  type Error = StdoutPublisherError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(StdoutPublisherError::SchemeMismatch);
    }
    Ok(StdoutPublisher {
      topic: topic_from_url(url),
    })
  }
}

impl StdoutPublisher {
  pub fn topic(&self) -> &str {
    &self.topic
  }
}

impl Publish for StdoutPublisher {
  type Error = StdoutPublisherError;

  fn publish(&self, msg: &PositionMessage) -> Result<(), Self::Error> {
    let mut line = encode(&self.topic, msg)?;
    line.push(b'\n');

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&line)?;
    stdout.flush()?;
    Ok(())
  }
}
