//! High-level coordinator: edit → persist → submit → present.
//!
//! One `IntakeFlow` replaces the three hand-copied per-form state machines:
//! it wires a `FormSession`, a `DraftStore`, a `Transport`, and a
//! `SubmissionController` together according to a `FormDescriptor`. The
//! tongue form differs enough (binary payload, persisted preview) to get its
//! own flow over the same controller.

use crate::forms::{FormDescriptor, FormSession, CONSTITUTION, PATIENT};
use crate::report::{Report, ReportSink};
use crate::store::DraftStore;
use crate::submit::{
    HttpTransport, SubmissionController, SubmissionState, SubmitError, SubmitResult, Transport,
};
use base64::Engine as _;
use std::sync::Arc;
use tracing::info;

/// Storage key for the last analyzed tongue image (data URL).
pub const LOCAL_IMG_KEY: &str = "localImg";
/// Storage key for the last tongue analysis report.
pub const TONGUE_RESPONSE_KEY: &str = "tongueResponseData";

/// Endpoint the deployed text forms submit to.
pub const API_ENDPOINT: &str = "http://hk.klizz.asia:7777/api";
/// Endpoint the deployed tongue form submits to.
pub const TONGUE_ENDPOINT: &str = "http://hk.klizz.asia:7777/api/tongue-analysis";

/// A text-form flow (patient questionnaire, constitution test).
pub struct IntakeFlow {
    session: FormSession,
    controller: SubmissionController,
    store: Arc<dyn DraftStore>,
    transport: Arc<dyn Transport>,
    sink: Option<Box<dyn ReportSink>>,
}

impl IntakeFlow {
    pub fn new(
        descriptor: &'static FormDescriptor,
        store: Arc<dyn DraftStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            session: FormSession::new(descriptor, store.clone()),
            controller: SubmissionController::new(descriptor.success_message),
            store,
            transport,
            sink: None,
        }
    }

    /// 中医问诊表.
    pub fn patient(store: Arc<dyn DraftStore>, transport: Arc<dyn Transport>) -> Self {
        Self::new(&PATIENT, store, transport)
    }

    /// 中医问诊表 against the deployed endpoint.
    pub fn patient_online(store: Arc<dyn DraftStore>) -> SubmitResult<Self> {
        Ok(Self::patient(store, Arc::new(HttpTransport::new(API_ENDPOINT)?)))
    }

    /// 中医体质测试.
    pub fn constitution(store: Arc<dyn DraftStore>, transport: Arc<dyn Transport>) -> Self {
        Self::new(&CONSTITUTION, store, transport)
    }

    /// 中医体质测试 against the deployed endpoint.
    pub fn constitution_online(store: Arc<dyn DraftStore>) -> SubmitResult<Self> {
        Ok(Self::constitution(
            store,
            Arc::new(HttpTransport::new(API_ENDPOINT)?),
        ))
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FormSession {
        &mut self.session
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn set_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.sink = Some(sink);
    }

    /// Validates and, if clean, enters `Submitting`: clears stale messages
    /// and the cached response entry, and returns the attempt number with
    /// the payload to send. `None` means no request must be issued — either
    /// a request is already in flight (no-op) or validation rejected the
    /// draft.
    pub fn begin_submit(&mut self) -> Option<(u64, String)> {
        if self.controller.is_submitting() {
            return None;
        }
        let missing = self.session.validate_required();
        if !missing.is_empty() {
            let message = self.session.descriptor().missing_message.to_string();
            self.controller.reject_with(message, missing);
            return None;
        }
        let attempt = self.controller.begin()?;
        self.store.remove(self.session.descriptor().response_key);
        Some((attempt, self.session.build_payload()))
    }

    /// Applies a finished attempt's outcome; stale completions are dropped.
    /// On success the report is persisted and pushed to the sink.
    pub fn complete_submit(
        &mut self,
        attempt: u64,
        outcome: Result<String, SubmitError>,
    ) -> SubmissionState {
        if self.controller.complete(attempt, outcome) {
            if let Some(text) = self.controller.response() {
                let key = self.session.descriptor().response_key;
                self.store.save(key, text);
                info!(form = self.session.descriptor().name, "report persisted");
                let report = Report::text(text);
                if let Some(sink) = self.sink.as_mut() {
                    sink.present(&report);
                }
            }
        }
        self.controller.state()
    }

    /// One full submit action: at most one outbound request, no retries.
    pub async fn submit(&mut self) -> SubmissionState {
        let Some((attempt, payload)) = self.begin_submit() else {
            return self.controller.state();
        };
        let outcome = self.transport.post_text(&payload).await;
        self.complete_submit(attempt, outcome)
    }

    /// The previously cached report, shown only while nothing newer is
    /// available: suppressed during an outstanding request and once the
    /// current attempt has produced a response.
    pub fn cached_report(&self) -> Option<Report> {
        if self.controller.is_submitting() || self.controller.response().is_some() {
            return None;
        }
        self.store
            .load(self.session.descriptor().response_key)
            .map(Report::text)
    }

    /// Clears the draft and returns the controller to `Idle`. The cached
    /// response entry survives until the next submission begins.
    pub fn reset(&mut self) {
        self.session.reset();
        self.controller.reset();
    }
}

struct TongueImage {
    bytes: Vec<u8>,
    filename: String,
    mime: String,
    preview: String,
}

/// 舌苔分析 — image upload flow. The payload is the raw image alone; the
/// local preview (a data URL) is persisted as "the last analyzed image" on
/// success, under its own key.
pub struct TongueFlow {
    controller: SubmissionController,
    store: Arc<dyn DraftStore>,
    transport: Arc<dyn Transport>,
    image: Option<TongueImage>,
    sink: Option<Box<dyn ReportSink>>,
}

impl TongueFlow {
    pub fn new(store: Arc<dyn DraftStore>, transport: Arc<dyn Transport>) -> Self {
        Self {
            controller: SubmissionController::new("舌苔分析成功！"),
            store,
            transport,
            image: None,
            sink: None,
        }
    }

    /// 舌苔分析 against the deployed endpoint.
    pub fn online(store: Arc<dyn DraftStore>) -> SubmitResult<Self> {
        Ok(Self::new(store, Arc::new(HttpTransport::new(TONGUE_ENDPOINT)?)))
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn set_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.sink = Some(sink);
    }

    /// Stages an image and derives its preview. The image itself is not
    /// durable; only the preview survives a successful analysis.
    pub fn select_image(&mut self, filename: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) {
        let mime = mime.into();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let preview = format!("data:{};base64,{}", mime, encoded);
        self.image = Some(TongueImage {
            bytes,
            filename: filename.into(),
            mime,
            preview,
        });
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn preview(&self) -> Option<&str> {
        self.image.as_ref().map(|i| i.preview.as_str())
    }

    /// One analysis attempt. No image staged is a validation error; no
    /// request is issued.
    pub async fn submit(&mut self) -> SubmissionState {
        if self.controller.is_submitting() {
            return self.controller.state();
        }
        let Some(image) = self.image.as_ref() else {
            self.controller.reject(SubmitError::MissingImage);
            return self.controller.state();
        };
        let (bytes, filename, mime, preview) = (
            image.bytes.clone(),
            image.filename.clone(),
            image.mime.clone(),
            image.preview.clone(),
        );

        let attempt = match self.controller.begin() {
            Some(a) => a,
            None => return self.controller.state(),
        };
        self.store.remove(TONGUE_RESPONSE_KEY);

        let outcome = self.transport.post_image(bytes, &filename, &mime).await;
        if self.controller.complete(attempt, outcome) {
            if let Some(text) = self.controller.response() {
                // two independent keys; they can desynchronize if only one
                // is cleared later
                self.store.save(TONGUE_RESPONSE_KEY, text);
                self.store.save(LOCAL_IMG_KEY, &preview);
                let report = Report::with_image(text, preview);
                if let Some(sink) = self.sink.as_mut() {
                    sink.present(&report);
                }
            }
        }
        self.controller.state()
    }

    /// The previous analysis, shown only when both the report and the image
    /// are still cached and nothing newer is on screen or in flight.
    pub fn cached_report(&self) -> Option<Report> {
        if self.controller.is_submitting() || self.controller.response().is_some() {
            return None;
        }
        let markdown = self.store.load(TONGUE_RESPONSE_KEY)?;
        let image = self.store.load(LOCAL_IMG_KEY)?;
        Some(Report::with_image(markdown, image))
    }

    /// Drops the staged image and both cached entries.
    pub fn clear(&mut self) {
        self.image = None;
        self.controller.reset();
        self.store.remove(LOCAL_IMG_KEY);
        self.store.remove(TONGUE_RESPONSE_KEY);
    }
}
