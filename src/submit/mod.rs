//! The submit-and-await-reply cycle.
//!
//! One controller instance governs one form's submission lifecycle:
//! `Idle → Submitting → Succeeded | Failed`, with an attempt sequence number
//! guarding against a stale completion overwriting a newer one.

mod controller;
mod transport;
#[cfg(test)]
mod tests;

pub use controller::{SubmissionController, SubmissionState};
pub use transport::{HttpTransport, Transport};

use thiserror::Error;

/// Why a submission attempt did not produce a report. Messages are the
/// user-facing strings the views surface inline.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("请填写所有必填项")]
    MissingRequired(Vec<&'static str>),
    #[error("请先上传舌苔照片")]
    MissingImage,
    #[error("提交数据失败")]
    Status(u16),
    #[error("返回数据格式错误")]
    MalformedBody,
    #[error("请求超时")]
    Timeout,
    #[error("网络连接失败")]
    Connect,
    #[error("网络错误: {0}")]
    Network(String),
    #[error("客户端配置错误: {0}")]
    Config(String),
}

pub type SubmitResult<T> = Result<T, SubmitError>;
