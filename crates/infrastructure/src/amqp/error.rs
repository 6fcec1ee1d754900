//! RabbitMQ 错误类型定义

use thiserror::Error;

/// RabbitMQ 操作错误
#[derive(Error, Debug)]
pub enum AmqpError {
    /// 连接错误
    #[error("RabbitMQ 连接错误: {message}")]
    ConnectionError { message: String },

    /// 发布错误
    #[error("RabbitMQ 发布错误: {message}")]
    PublishError { message: String },

    /// 消费错误
    #[error("RabbitMQ 消费错误: {message}")]
    ConsumeError { message: String },

    /// 队列声明错误
    #[error("队列声明错误: {message}")]
    DeclareError { message: String },
}

impl AmqpError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    pub fn publish(message: impl Into<String>) -> Self {
        Self::PublishError {
            message: message.into(),
        }
    }
}

/// RabbitMQ 结果类型
pub type AmqpResult<T> = Result<T, AmqpError>;

impl From<lapin::Error> for AmqpError {
    fn from(err: lapin::Error) -> Self {
        match err {
            lapin::Error::IOError(_) | lapin::Error::InvalidConnectionState(_) => {
                AmqpError::ConnectionError {
                    message: err.to_string(),
                }
            }
            lapin::Error::InvalidChannelState(_) => AmqpError::ConnectionError {
                message: err.to_string(),
            },
            _ => AmqpError::ConsumeError {
                message: err.to_string(),
            },
        }
    }
}

impl From<AmqpError> for application::QueueError {
    fn from(err: AmqpError) -> Self {
        application::QueueError::broker(err.to_string())
    }
}
