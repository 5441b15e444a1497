//! Session state and request orchestration

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use super::client::PredictionBackend;
use super::config::AppConfig;
use super::error::{ApiError, SubmitError};
use super::sequence::sanitize_sequence;
use super::types::{AnalysisRequest, Mode, PredictionResult, ShapReport, Tab};

pub const PREDICTION_FAILED: &str = "Prediction failed.";
pub const SHAP_FAILED: &str = "SHAP analysis failed.";

/// Result of a finished background request
enum Completion {
    Prediction(Result<PredictionResult, ApiError>),
    Shap(Result<ShapReport, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Prediction,
    Shap,
}

struct InFlight {
    kind: RequestKind,
    /// Mode the request was sent with
    mode: Mode,
    rx: Receiver<Completion>,
}

/// Everything the views read
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub active_tab: Tab,
    pub patient_id: String,
    pub sequence: String,
    pub mode: Mode,
    pub loading: bool,
    pub error_message: String,
    pub prediction: Option<PredictionResult>,
    pub shap_report: Option<ShapReport>,
}

pub struct Controller {
    backend: Arc<dyn PredictionBackend>,
    max_sequence_length: usize,
    state: SessionState,
    in_flight: Option<InFlight>,
}

impl Controller {
    pub fn new(backend: Arc<dyn PredictionBackend>, config: &AppConfig) -> Self {
        Self {
            backend,
            max_sequence_length: config.max_sequence_length,
            state: SessionState::default(),
            in_flight: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    // --- Form and navigation ---

    pub fn set_sequence(&mut self, raw: &str) {
        self.state.sequence = sanitize_sequence(raw);
    }

    pub fn set_patient_id(&mut self, patient_id: &str) {
        self.state.patient_id = patient_id.to_string();
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.state.active_tab = tab;
    }

    /// Switching classifiers invalidates anything produced by the old one
    pub fn set_mode(&mut self, mode: Mode) {
        tracing::debug!(from = %self.state.mode, to = %mode, "mode changed");
        self.state.mode = mode;
        self.state.prediction = None;
        self.state.shap_report = None;
    }

    pub fn can_submit(&self) -> bool {
        !self.state.loading && !self.state.sequence.trim().is_empty()
    }

    pub fn sequence_exceeds_limit(&self) -> bool {
        self.state.sequence.len() > self.max_sequence_length
    }

    /// SHAP is offered for any multi-label result and for positive
    /// single-label results only.
    pub fn can_offer_shap(&self) -> bool {
        match (&self.state.prediction, self.state.mode) {
            (None, _) => false,
            (Some(_), Mode::Multi) => true,
            (Some(PredictionResult::Single(single)), Mode::Single) => {
                single.is_positive()
            }
            (Some(PredictionResult::Multi(_)), Mode::Single) => false,
        }
    }

    // --- Requests ---

    pub fn submit_prediction(&mut self) -> Result<(), SubmitError> {
        if self.state.loading {
            return Err(SubmitError::Busy);
        }
        if self.state.sequence.trim().is_empty() {
            return Err(SubmitError::EmptySequence);
        }

        self.state.loading = true;
        self.state.error_message.clear();
        self.state.shap_report = None;

        let request = self.request();
        let backend = Arc::clone(&self.backend);
        self.spawn(RequestKind::Prediction, move || {
            Completion::Prediction(backend.predict(&request))
        });
        Ok(())
    }

    pub fn submit_shap_analysis(&mut self) -> Result<(), SubmitError> {
        if self.state.loading {
            return Err(SubmitError::Busy);
        }

        self.state.loading = true;
        self.state.error_message.clear();
        self.state.shap_report = None;

        let request = self.request();
        let backend = Arc::clone(&self.backend);
        self.spawn(RequestKind::Shap, move || Completion::Shap(backend.shap(&request)));
        Ok(())
    }

    /// Apply the in-flight request's outcome if it has arrived.
    /// Returns true when state changed.
    pub fn poll(&mut self) -> bool {
        let Some(in_flight) = &self.in_flight else {
            return false;
        };

        let kind = in_flight.kind;
        let sent_mode = in_flight.mode;
        let received = in_flight.rx.try_recv();
        let completion = match received {
            Ok(completion) => completion,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                tracing::error!(?kind, "request worker exited without a result");
                self.in_flight = None;
                self.state.loading = false;
                self.state.error_message = match kind {
                    RequestKind::Prediction => PREDICTION_FAILED,
                    RequestKind::Shap => SHAP_FAILED,
                }
                .to_string();
                return true;
            }
        };

        self.in_flight = None;
        self.state.loading = false;

        // Results from the classifier the user switched away from are stale
        if sent_mode != self.state.mode {
            tracing::info!(
                ?kind,
                sent = %sent_mode,
                current = %self.state.mode,
                "discarding stale result"
            );
            return true;
        }

        match completion {
            Completion::Prediction(Ok(result)) => {
                tracing::info!("prediction received");
                self.state.prediction = Some(result);
                self.state.active_tab = Tab::Predictions;
            }
            Completion::Prediction(Err(e)) => {
                tracing::warn!(error = %e, "prediction failed");
                self.state.error_message = failure_message(&e, PREDICTION_FAILED);
            }
            Completion::Shap(Ok(report)) => {
                tracing::info!(plots = report.plots.len(), "SHAP report received");
                self.state.shap_report = Some(report);
                self.state.active_tab = Tab::Analysis;
            }
            Completion::Shap(Err(e)) => {
                tracing::warn!(error = %e, "SHAP analysis failed");
                self.state.error_message = failure_message(&e, SHAP_FAILED);
            }
        }
        true
    }

    fn request(&self) -> AnalysisRequest {
        AnalysisRequest {
            sequence: self.state.sequence.clone(),
            mode: self.state.mode,
        }
    }

    fn spawn<F>(&mut self, kind: RequestKind, work: F)
    where
        F: FnOnce() -> Completion + Send + 'static,
    {
        let (tx, rx) = channel();
        self.in_flight = Some(InFlight {
            kind,
            mode: self.state.mode,
            rx,
        });

        thread::spawn(move || {
            let _ = tx.send(work());
        });
    }
}

/// Server-provided message, else the operation's generic text
fn failure_message(error: &ApiError, fallback: &str) -> String {
    error.server_message().unwrap_or(fallback).to_string()
}
