//! 数据处理平台 — CSV upload, processing request, result download.
//!
//! Three-step sequence against fixed endpoints: multipart file upload,
//! processing parameters (filter strength in [0,1] plus a free-text
//! comment), then the result download. Completion of the first two steps is
//! signaled by elapsed time rather than by server acknowledgment — upload
//! and processing errors are logged and otherwise ignored. That matches the
//! deployed behavior; it has the obvious gap that the client can report
//! success against a dead server.


use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio::time;
use tracing::{info, warn};

const UPLOAD_DELAY: Duration = Duration::from_secs(2);
const PROCESS_DELAY: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("请上传CSV格式的文件")]
    NotCsv,
    #[error("请先选择文件")]
    NoFile,
    #[error("请先选择并上传文件")]
    NotUploaded,
    #[error("处理尚未完成")]
    NotProcessed,
    #[error("下载失败: {0}")]
    Download(String),
    #[error("客户端配置错误: {0}")]
    Config(String),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

struct CsvFile {
    name: String,
    bytes: Vec<u8>,
}

/// One upload-process-download cycle.
pub struct DatasetFlow {
    client: Client,
    base_url: String,
    upload_delay: Duration,
    process_delay: Duration,
    file: Option<CsvFile>,
    filter_strength: f64,
    comment: String,
    uploaded: bool,
    processed: bool,
}

impl DatasetFlow {
    pub fn new(base_url: impl Into<String>) -> DatasetResult<Self> {
        Self::with_delays(base_url, UPLOAD_DELAY, PROCESS_DELAY)
    }

    /// Delays are injectable so tests do not wait out the real ones.
    pub fn with_delays(
        base_url: impl Into<String>,
        upload_delay: Duration,
        process_delay: Duration,
    ) -> DatasetResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DatasetError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            upload_delay,
            process_delay,
            file: None,
            filter_strength: 0.5,
            comment: String::new(),
            uploaded: false,
            processed: false,
        })
    }

    /// Stages a file; anything not named `*.csv` is rejected before any
    /// network traffic. The suffix check is case-sensitive, so `.CSV` is
    /// refused too.
    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> DatasetResult<()> {
        let name = name.into();
        if !name.ends_with(".csv") {
            return Err(DatasetError::NotCsv);
        }
        self.file = Some(CsvFile { name, bytes });
        self.uploaded = false;
        self.processed = false;
        Ok(())
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn filter_strength(&self) -> f64 {
        self.filter_strength
    }

    /// Clamped to [0, 1].
    pub fn set_filter_strength(&mut self, value: f64) {
        self.filter_strength = value.clamp(0.0, 1.0);
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Uploads the staged file. Reports completion after the fixed delay
    /// whether or not the server accepted it.
    pub async fn upload(&mut self) -> DatasetResult<()> {
        let file = self.file.as_ref().ok_or(DatasetError::NoFile)?;

        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str("text/csv")
            .map_err(|e| DatasetError::Config(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let result = self
            .client
            .post(format!("{}/filereceive", self.base_url))
            .multipart(form)
            .send()
            .await;
        if let Err(e) = result {
            warn!(error = %e, "file upload failed; continuing anyway");
        }

        time::sleep(self.upload_delay).await;
        self.uploaded = true;
        info!(file = %file.name, "upload marked complete");
        Ok(())
    }

    /// Submits the processing parameters. Requires a completed upload;
    /// reports completion after the fixed delay regardless of the reply.
    pub async fn process(&mut self) -> DatasetResult<()> {
        if !self.uploaded {
            return Err(DatasetError::NotUploaded);
        }

        let form = reqwest::multipart::Form::new()
            .text("filterStrength", format!("{:.2}", self.filter_strength))
            .text("comment", self.comment.clone());

        let result = self
            .client
            .post(format!("{}/submit", self.base_url))
            .multipart(form)
            .send()
            .await;
        if let Err(e) = result {
            warn!(error = %e, "processing request failed; continuing anyway");
        }

        time::sleep(self.process_delay).await;
        self.processed = true;
        info!("processing marked complete");
        Ok(())
    }

    /// Fetches the processed result. Only available once the processing
    /// delay has elapsed.
    pub async fn download(&self) -> DatasetResult<Vec<u8>> {
        if !self.processed {
            return Err(DatasetError::NotProcessed);
        }
        let response = self
            .client
            .get(format!("{}/download", self.base_url))
            .send()
            .await
            .map_err(|e| DatasetError::Download(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DatasetError::Download(format!(
                "HTTP {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DatasetError::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
