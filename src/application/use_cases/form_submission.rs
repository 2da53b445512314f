use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::use_cases::templates::{render_error, render_result};
use crate::domain::page::{RESULT_REGION, UPLOAD_ENDPOINT};
use crate::domain::submission::{RenderOrdering, SubmissionOutcome, SubmissionState, SubmitEvent};
use crate::infrastructure::dom::Renderer;
use crate::infrastructure::logging::{add_log, SharedLogs};
use crate::infrastructure::transport::Transport;

const LOG_SOURCE: &str = "FormSubmission";

#[derive(Debug, Clone)]
pub struct SubmissionSettings {
    pub endpoint: String,
    pub region: String,
    pub ordering: RenderOrdering,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            endpoint: UPLOAD_ENDPOINT.to_string(),
            region: RESULT_REGION.to_string(),
            ordering: RenderOrdering::default(),
        }
    }
}

/// Turns a form submit into one upload request and one render of the
/// output region.
///
/// Failures never reach the caller: a transport or decoding error renders
/// the fixed error message and is written to the diagnostic log.
pub struct FormSubmissionUseCase {
    transport: Arc<dyn Transport + Send + Sync>,
    renderer: Arc<dyn Renderer + Send + Sync>,
    logs: SharedLogs,
    settings: SubmissionSettings,
    next_sequence: AtomicU64,
    // Held across the render so the compare and the write happen together.
    last_rendered: Mutex<u64>,
}

impl FormSubmissionUseCase {
    pub fn new(
        transport: Arc<dyn Transport + Send + Sync>,
        renderer: Arc<dyn Renderer + Send + Sync>,
        logs: SharedLogs,
        settings: SubmissionSettings,
    ) -> Self {
        Self {
            transport,
            renderer,
            logs,
            settings,
            next_sequence: AtomicU64::new(0),
            last_rendered: Mutex::new(0),
        }
    }

    pub async fn handle_submit(&self, event: &mut SubmitEvent) -> SubmissionOutcome {
        event.prevent_default();

        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        add_log(
            &self.logs,
            "INFO",
            LOG_SOURCE,
            &format!(
                "Submission #{} -> POST {} ({})",
                sequence,
                self.settings.endpoint,
                event.request().summary()
            ),
        );

        let (state, content) = match self
            .transport
            .send_multipart(&self.settings.endpoint, event.request())
            .await
        {
            Ok(result) => {
                if !result.is_known_category() {
                    add_log(
                        &self.logs,
                        "WARN",
                        LOG_SOURCE,
                        &format!(
                            "Submission #{} returned unrecognised category '{}'",
                            sequence, result.category
                        ),
                    );
                }
                (SubmissionState::RenderedSuccess, render_result(&result))
            }
            Err(err) => {
                // Anything else was rejected locally before a request went out.
                let what = if err.is_processing_failure() {
                    "failed"
                } else {
                    "was not sent"
                };
                add_log(
                    &self.logs,
                    "ERROR",
                    LOG_SOURCE,
                    &format!("Submission #{} {}: {}", sequence, what, err),
                );
                (SubmissionState::RenderedError, render_error())
            }
        };

        self.commit(sequence, state, content)
    }

    fn commit(&self, sequence: u64, state: SubmissionState, content: String) -> SubmissionOutcome {
        let mut last_rendered = self
            .last_rendered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if self.settings.ordering == RenderOrdering::Sequenced && sequence < *last_rendered {
            add_log(
                &self.logs,
                "DEBUG",
                LOG_SOURCE,
                &format!(
                    "Discarding stale response #{} (#{} already rendered)",
                    sequence, *last_rendered
                ),
            );
            return SubmissionOutcome {
                sequence,
                state: SubmissionState::Superseded,
                rendered: None,
            };
        }

        self.renderer.render(&self.settings.region, &content);
        *last_rendered = sequence;

        SubmissionOutcome {
            sequence,
            state,
            rendered: Some(content),
        }
    }
}
