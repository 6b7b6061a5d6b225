// 该文件是 Target Locator （寻的） 项目的一部分。
// src/publish/udp.rs - UDP 数据报发布
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

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  publish::{PositionMessage, Publish, encode, topic_from_url},
};

#[derive(Error, Debug)]
pub enum UdpPublisherError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("缺少目标地址: {0}")]
  MissingAddress(String),
  #[error("序列化错误: {0}")]
  SerializeError(#[from] serde_json::Error),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 每条消息发送一个 JSON 数据报：`udp://host:port/topic`
pub struct UdpPublisher {
  socket: UdpSocket,
  target: SocketAddr,
  topic: String,
}

impl FromUrlWithScheme for UdpPublisher {
  const SCHEME: &'static str = "udp";
}

impl FromUrl for UdpPublisher {
  type Error = UdpPublisherError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(UdpPublisherError::SchemeMismatch);
    }

    if url.host().is_none() || url.port().is_none() {
      return Err(UdpPublisherError::MissingAddress(url.to_string()));
    }
    let target = url
      .socket_addrs(|| None)?
      .into_iter()
      .next()
      .ok_or_else(|| UdpPublisherError::MissingAddress(url.to_string()))?;

    let bind_addr = if target.is_ipv4() {
      SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
      SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    };
    let socket = UdpSocket::bind(bind_addr)?;
    let topic = topic_from_url(url);
    info!("UDP 发布到 {} (话题 {})", target, topic);

    Ok(UdpPublisher {
      socket,
      target,
      topic,
    })
  }
}

impl UdpPublisher {
  pub fn topic(&self) -> &str {
    &self.topic
  }
}

impl Publish for UdpPublisher {
  type Error = UdpPublisherError;

  fn publish(&self, msg: &PositionMessage) -> Result<(), Self::Error> {
    let payload = encode(&self.topic, msg)?;
    self.socket.send_to(&payload, self.target)?;
    Ok(())
  }
}
