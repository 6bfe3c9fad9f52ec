use crate::audio::AudioPlayback;
use crate::capture::{
    CaptureDevice, CaptureMachine, CapturePhase, CaptureStream, CaptureTicket, CapturedTake,
    GuardOutcome, NavigationGuard, WarningChoice,
};
use crate::domain::encoding::SUBMITTED_SENTINEL;
use crate::domain::format::{AnswerFormat, SpokenResponse};
use crate::domain::{
    AnswerValue, ItemId, SpokenResponseContent, Timestamp, DEFAULT_MAX_CAPTURE_SECS,
};
use crate::error::CaptureError;
use crate::renderer::engine::{AnswerChange, NavigationRequest, RenderChanges, RendererEngine};
use crate::renderer::props::RendererProps;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

/// Mime type assumed when a stream vanished before it was finished
const FALLBACK_CAPTURE_MIME: &str = "audio/webm";

/// Spoken free response with microphone capture
///
/// Wraps the shared engine with the capture machine. While a capture runs,
/// navigation (host- or user-driven) is held behind a confirmation warning
/// instead of being applied.
pub struct SpokenResponseRenderer {
    engine: RendererEngine<SpokenResponse>,
    capture: CaptureMachine,
    stream: Option<Box<dyn CaptureStream>>,
    guard: NavigationGuard,
}

impl SpokenResponseRenderer {
    pub fn new(props: RendererProps<SpokenResponseContent>) -> Self {
        let engine = RendererEngine::new(props);
        let guard = NavigationGuard::new(engine.current_index());

        let mut renderer = Self {
            engine,
            capture: CaptureMachine::new(),
            stream: None,
            guard,
        };
        renderer.settle();
        renderer
    }

    pub fn render(&mut self, mut props: RendererProps<SpokenResponseContent>) -> RenderChanges {
        let same_items = SpokenResponse::item_ids(&props.content) == self.engine.item_ids();

        if same_items && self.capture.is_recording() {
            if let Some(requested) = props.current_index {
                self.guard.host_request(requested);
                props.current_index = Some(self.guard.confirmed());
            }
        }

        let changes = self.engine.render(props);

        if changes.items_changed {
            self.release_stream();
            self.capture.reset();
            self.guard = NavigationGuard::new(self.engine.current_index());
        }

        self.settle();
        changes
    }

    // ===== Navigation =====

    pub fn go_to(&mut self, index: usize) -> NavigationRequest {
        if self.capture.is_recording() {
            if index >= self.engine.len() || index == self.engine.current_index() {
                return NavigationRequest::Ignored;
            }
            self.guard.hold(index);
            return NavigationRequest::Held;
        }

        let request = self.engine.go_to(index);
        self.settle();
        request
    }

    pub fn next(&mut self) -> NavigationRequest {
        self.go_to(self.engine.current_index() + 1)
    }

    pub fn previous(&mut self) -> NavigationRequest {
        match self.engine.current_index().checked_sub(1) {
            Some(index) => self.go_to(index),
            None => NavigationRequest::Ignored,
        }
    }

    /// Index waiting behind the recording warning
    pub fn pending_navigation(&self) -> Option<usize> {
        self.guard.pending()
    }

    pub fn is_warning_shown(&self) -> bool {
        self.guard.is_warning()
    }

    /// Answer the recording warning
    pub fn resolve_warning(&mut self, choice: WarningChoice, now: Timestamp) -> Option<GuardOutcome> {
        let held_by_host = self.guard.is_host_request();
        let outcome = self.guard.resolve(choice)?;

        match outcome {
            GuardOutcome::Navigate(target) => {
                self.stop_recording(now);

                if !self.engine.is_controlled() {
                    self.engine.go_to(target);
                } else if held_by_host {
                    self.engine.set_external_index(Some(target));
                } else {
                    self.engine.callbacks().on_index_change.emit(target);
                }
                self.settle();
            }
            GuardOutcome::Revert(confirmed) => {
                if held_by_host {
                    tracing::info!("Asking host to return to index {}", confirmed);
                    self.engine.callbacks().on_index_change.emit(confirmed);
                }
            }
        }

        Some(outcome)
    }

    // ===== Capture =====

    pub fn phase(&self) -> CapturePhase {
        self.capture.phase()
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_recording()
    }

    pub fn capture_error(&self) -> Option<&CaptureError> {
        self.capture.error()
    }

    pub fn take(&self, item_id: &ItemId) -> Option<&CapturedTake> {
        self.capture.take(item_id)
    }

    pub fn current_take(&self) -> Option<&CapturedTake> {
        self.capture.focused().and_then(|id| self.capture.take(id))
    }

    /// Every finalized take by item id
    pub fn takes(&self) -> &BTreeMap<ItemId, CapturedTake> {
        self.capture.takes()
    }

    /// Put back a take recorded by an earlier instance of this renderer
    pub fn restore_take(&mut self, take: CapturedTake) -> bool {
        if self.engine.item(&take.item_id).is_none() {
            tracing::debug!("Not restoring take for unknown item {}", take.item_id);
            return false;
        }
        self.capture.restore(take)
    }

    pub fn elapsed_ms(&self, now: Timestamp) -> u64 {
        self.capture.capped_elapsed_ms(now)
    }

    /// Request the microphone for the current item
    pub fn begin_capture(&mut self) -> Option<CaptureTicket> {
        let max_secs = self.engine.current_item().map(|prompt| {
            if prompt.max_duration_secs > 0 {
                prompt.max_duration_secs
            } else {
                DEFAULT_MAX_CAPTURE_SECS
            }
        })?;

        self.engine.audio_mut().stop();
        self.capture.begin(max_secs)
    }

    /// Apply the outcome of a device acquisition
    ///
    /// A stream arriving for a ticket that is no longer current is released
    /// and reported as [`CaptureError::Stale`].
    pub fn complete_capture(
        &mut self,
        ticket: CaptureTicket,
        result: Result<Box<dyn CaptureStream>, CaptureError>,
        now: Timestamp,
    ) -> Result<(), CaptureError> {
        match result {
            Ok(mut stream) => match self.capture.accept(&ticket, now) {
                Ok(()) => {
                    self.stream = Some(stream);
                    Ok(())
                }
                Err(e) => {
                    tracing::debug!("Releasing stream opened for stale capture of {}", ticket.item_id());
                    stream.release();
                    Err(e)
                }
            },
            Err(e) => {
                if self.capture.fail(&ticket, e.clone()) {
                    Err(e)
                } else {
                    Err(CaptureError::Stale)
                }
            }
        }
    }

    /// Acquire a device and start recording; returns false when not allowed
    pub async fn start_recording(
        &mut self,
        device: &dyn CaptureDevice,
        now: Timestamp,
    ) -> Result<bool, CaptureError> {
        let Some(ticket) = self.begin_capture() else {
            return Ok(false);
        };
        let result = device.open().await;
        self.complete_capture(ticket, result, now).map(|()| true)
    }

    /// Finalize the running capture and store it as the item's answer
    pub fn stop_recording(&mut self, now: Timestamp) -> bool {
        if !self.capture.is_recording() {
            return false;
        }
        let Some(item_id) = self.capture.focused().cloned() else {
            return false;
        };

        let (mime_type, bytes) = match self.stream.take() {
            Some(mut stream) => {
                let bytes = stream.finish();
                let mime_type = stream.mime_type();
                stream.release();
                (mime_type, bytes)
            }
            None => (FALLBACK_CAPTURE_MIME.to_string(), Vec::new()),
        };

        let take = CapturedTake::new(
            item_id.clone(),
            mime_type,
            &bytes,
            self.capture.capped_elapsed_ms(now),
        );
        let data_url = take.data_url.clone();

        self.capture.finalize(take);
        self.engine
            .update_answer(&item_id, AnswerChange::Set(AnswerValue::Text(data_url)));
        true
    }

    /// Auto-finalize once the maximum duration is reached
    pub fn tick(&mut self, now: Timestamp) -> bool {
        if !self.capture.is_over_limit(now) {
            return false;
        }
        tracing::info!("Capture reached its maximum duration, finalizing");
        self.stop_recording(now)
    }

    /// Discard the current item's take and answer
    pub fn rerecord(&mut self) -> bool {
        let Some(item_id) = self.capture.focused().cloned() else {
            return false;
        };
        if !self.capture.rerecord() {
            return false;
        }
        self.engine.update_answer(&item_id, AnswerChange::Clear);
        true
    }

    /// Replace a recorded answer with the submitted marker
    pub fn submit(&mut self, item_id: &ItemId) -> bool {
        if self.capture.is_recording() && self.capture.focused() == Some(item_id) {
            return false;
        }
        if self.engine.answer(item_id).is_none() {
            tracing::debug!("Nothing recorded for {}", item_id);
            return false;
        }
        self.engine.update_answer(
            item_id,
            AnswerChange::Set(AnswerValue::text(SUBMITTED_SENTINEL)),
        )
    }

    pub fn is_submitted(&self, item_id: &ItemId) -> bool {
        self.engine.answer(item_id).and_then(AnswerValue::as_text) == Some(SUBMITTED_SENTINEL)
    }

    // ===== Model audio =====

    pub fn model_audio(&self) -> &AudioPlayback {
        self.engine.audio()
    }

    pub fn model_audio_mut(&mut self) -> &mut AudioPlayback {
        self.engine.audio_mut()
    }

    // ===== Internals =====

    /// Follow the displayed item and confirm the position when nothing is held
    fn settle(&mut self) {
        let current = self.engine.current_item_id().cloned();

        if current.as_ref() != self.capture.focused() {
            self.release_stream();

            let has_answer = current
                .as_ref()
                .map(|id| self.engine.answer(id).is_some())
                .unwrap_or(false);
            self.capture.focus(current, has_answer);
        }

        if !self.capture.is_recording() {
            self.guard.confirm(self.engine.current_index());
        }
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!("Releasing capture device");
            stream.release();
        }
    }
}

impl Deref for SpokenResponseRenderer {
    type Target = RendererEngine<SpokenResponse>;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

impl Drop for SpokenResponseRenderer {
    fn drop(&mut self) {
        self.release_stream();
    }
}

impl fmt::Debug for SpokenResponseRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpokenResponseRenderer")
            .field("engine", &self.engine)
            .field("capture", &self.capture)
            .field("guard", &self.guard)
            .field("stream_open", &self.stream.is_some())
            .finish()
    }
}
