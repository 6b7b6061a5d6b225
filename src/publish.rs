// 该文件是 Target Locator （寻的） 项目的一部分。
// src/publish.rs - 坐标消息发布
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

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  normalize::{ABSENT_SENTINEL, NormalizedPosition},
};

pub const DEFAULT_TOPIC: &str = "ball_pos";

/// `[target_x, target_y, dest_x, dest_y]`，缺失位置为 -1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionMessage {
  pub data: [f64; 4],
}

impl PositionMessage {
  pub fn absent() -> Self {
    Self {
      data: [ABSENT_SENTINEL; 4],
    }
  }

  pub fn new(target: NormalizedPosition, destination: NormalizedPosition) -> Self {
    let [tx, ty] = target.as_pair();
    let [dx, dy] = destination.as_pair();
    Self {
      data: [tx, ty, dx, dy],
    }
  }

  pub fn is_absent(&self) -> bool {
    self.data.iter().all(|&v| v == ABSENT_SENTINEL)
  }
}

impl Default for PositionMessage {
  fn default() -> Self {
    Self::absent()
  }
}

/// 线上格式，形如 `Float64MultiArray` 加上话题与时间戳
#[derive(Debug, Serialize)]
struct Envelope<'a> {
  topic: &'a str,
  stamp: String,
  data: &'a [f64; 4],
}

pub(crate) fn encode(topic: &str, msg: &PositionMessage) -> Result<Vec<u8>, serde_json::Error> {
  let envelope = Envelope {
    topic,
    stamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    data: &msg.data,
  };
  serde_json::to_vec(&envelope)
}

/// 从 URL 路径取话题名，路径为空时使用默认话题
pub(crate) fn topic_from_url(url: &Url) -> String {
  let topic = url.path().trim_matches('/');
  if topic.is_empty() {
    DEFAULT_TOPIC.to_string()
  } else {
    topic.to_string()
  }
}

pub trait Publish {
  type Error;
  fn publish(&self, msg: &PositionMessage) -> Result<(), Self::Error>;
}

mod stdout;
pub use self::stdout::{StdoutPublisher, StdoutPublisherError};

mod udp;
pub use self::udp::{UdpPublisher, UdpPublisherError};

#[derive(Error, Debug)]
pub enum PublishError {
  #[error("标准输出发布错误: {0}")]
  StdoutPublisherError(#[from] StdoutPublisherError),
  #[error("UDP 发布错误: {0}")]
  UdpPublisherError(#[from] UdpPublisherError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum PublisherWrapper {
  Stdout(StdoutPublisher),
  Udp(UdpPublisher),
}

impl FromUrl for PublisherWrapper {
  type Error = PublishError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      StdoutPublisher::SCHEME => Ok(PublisherWrapper::Stdout(StdoutPublisher::from_url(url)?)),
      UdpPublisher::SCHEME => Ok(PublisherWrapper::Udp(UdpPublisher::from_url(url)?)),
      other => Err(PublishError::SchemeMismatch(other.to_string())),
    }
  }
}

impl PublisherWrapper {
  pub fn topic(&self) -> &str {
    match self {
      PublisherWrapper::Stdout(publisher) => publisher.topic(),
      PublisherWrapper::Udp(publisher) => publisher.topic(),
    }
  }
}

impl Publish for PublisherWrapper {
  type Error = PublishError;

  fn publish(&self, msg: &PositionMessage) -> Result<(), Self::Error> {
    match self {
      PublisherWrapper::Stdout(publisher) => publisher.publish(msg).map_err(PublishError::from),
      PublisherWrapper::Udp(publisher) => publisher.publish(msg).map_err(PublishError::from),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absent_message_is_all_sentinels() {
    let msg = PositionMessage::absent();
    assert_eq!(msg.data, [-1.0, -1.0, -1.0, -1.0]);
    assert!(msg.is_absent());
    assert_eq!(PositionMessage::default(), msg);
  }

  #[test]
  fn message_never_mixes_present_and_absent_within_a_slot() {
    let msg = PositionMessage::new(
      NormalizedPosition::Present { x: 0.25, y: 0.75 },
      NormalizedPosition::Absent,
    );
    assert_eq!(msg.data, [0.25, 0.75, -1.0, -1.0]);
    assert!(!msg.is_absent());
  }

  #[test]
  fn encoded_message_carries_topic_and_data() {
    let msg = PositionMessage::new(
      NormalizedPosition::Absent,
      NormalizedPosition::Present { x: 0.5, y: 1.25 },
    );
    let bytes = encode("ball_pos", &msg).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["topic"], "ball_pos");
    assert_eq!(value["data"], serde_json::json!([-1.0, -1.0, 0.5, 1.25]));
    assert!(value["stamp"].as_str().unwrap().ends_with('Z'));
  }

  #[test]
  fn topic_defaults_when_path_is_empty() {
    assert_eq!(topic_from_url(&Url::parse("stdout://").unwrap()), "ball_pos");
    assert_eq!(
      topic_from_url(&Url::parse("udp://127.0.0.1:9000/robot/goal").unwrap()),
      "robot/goal"
    );
  }

  #[test]
  fn wrapper_reports_topic_of_selected_publisher() {
    let stdout = PublisherWrapper::from_url(&Url::parse("stdout:///nav/ball_pos").unwrap()).unwrap();
    assert!(matches!(stdout, PublisherWrapper::Stdout(_)));
    assert_eq!(stdout.topic(), "nav/ball_pos");

    let udp = PublisherWrapper::from_url(&Url::parse("udp://127.0.0.1:9870").unwrap()).unwrap();
    assert!(matches!(udp, PublisherWrapper::Udp(_)));
    assert_eq!(udp.topic(), DEFAULT_TOPIC);
  }

  #[test]
  fn unknown_scheme_is_rejected() {
    let url = Url::parse("ros2:///ball_pos").unwrap();
    assert!(matches!(
      PublisherWrapper::from_url(&url),
      Err(PublishError::SchemeMismatch(_))
    ));
  }
}
