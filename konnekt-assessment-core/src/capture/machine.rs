use crate::capture::CapturedTake;
use crate::domain::{ItemId, Timestamp};
use crate::error::CaptureError;
use std::collections::BTreeMap;
use std::time::Duration;

/// Capture lifecycle of the focused item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    /// Nothing recorded yet (or the take was discarded)
    Idle,
    Recording,
    /// A take exists and can be played back, submitted or re-recorded
    Reviewing,
}

/// Identifies one device acquisition
///
/// Only the most recent ticket for the focused item is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTicket {
    item_id: ItemId,
    generation: u64,
}

impl CaptureTicket {
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }
}

/// Per-renderer capture state: phase of the focused item plus every
/// finalized take by item id
#[derive(Debug)]
pub struct CaptureMachine {
    phase: CapturePhase,
    focused: Option<ItemId>,
    takes: BTreeMap<ItemId, CapturedTake>,
    error: Option<CaptureError>,
    generation: u64,
    acquiring: Option<CaptureTicket>,
    started_at: Option<Timestamp>,
    /// Zero means unlimited
    max_duration: Duration,
}

impl CaptureMachine {
    pub fn new() -> Self {
        Self {
            phase: CapturePhase::Idle,
            focused: None,
            takes: BTreeMap::new(),
            error: None,
            generation: 0,
            acquiring: None,
            started_at: None,
            max_duration: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == CapturePhase::Recording
    }

    pub fn is_acquiring(&self) -> bool {
        self.acquiring.is_some()
    }

    pub fn focused(&self) -> Option<&ItemId> {
        self.focused.as_ref()
    }

    /// Inline error from the last failed acquisition
    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }

    pub fn take(&self, item_id: &ItemId) -> Option<&CapturedTake> {
        self.takes.get(item_id)
    }

    pub fn takes(&self) -> &BTreeMap<ItemId, CapturedTake> {
        &self.takes
    }

    /// Move focus to another item
    ///
    /// Invalidates in-flight acquisitions. The new item starts in Reviewing
    /// when it has a take or a stored answer, otherwise Idle.
    pub fn focus(&mut self, item_id: Option<ItemId>, has_answer: bool) {
        self.generation += 1;
        self.acquiring = None;
        self.started_at = None;
        self.error = None;

        let restorable = item_id
            .as_ref()
            .map(|id| self.takes.contains_key(id) || has_answer)
            .unwrap_or(false);

        self.phase = if restorable {
            CapturePhase::Reviewing
        } else {
            CapturePhase::Idle
        };
        self.focused = item_id;
    }

    /// Forget every take (new item set)
    pub fn reset(&mut self) {
        self.takes.clear();
        self.focus(None, false);
    }

    /// Start acquiring a device for the focused item
    ///
    /// Only allowed from Idle with no acquisition in flight.
    pub fn begin(&mut self, max_duration_secs: u32) -> Option<CaptureTicket> {
        let item_id = self.focused.clone()?;

        if self.phase != CapturePhase::Idle || self.acquiring.is_some() {
            tracing::debug!("Ignoring capture request in phase {:?}", self.phase);
            return None;
        }

        self.generation += 1;
        self.error = None;
        self.max_duration = Duration::from_secs(u64::from(max_duration_secs));

        let ticket = CaptureTicket {
            item_id,
            generation: self.generation,
        };
        self.acquiring = Some(ticket.clone());
        Some(ticket)
    }

    fn is_current(&self, ticket: &CaptureTicket) -> bool {
        self.acquiring.as_ref() == Some(ticket)
    }

    /// The device opened; start recording if the ticket is still current
    pub fn accept(&mut self, ticket: &CaptureTicket, now: Timestamp) -> Result<(), CaptureError> {
        if !self.is_current(ticket) {
            return Err(CaptureError::Stale);
        }

        self.acquiring = None;
        self.started_at = Some(now);
        self.phase = CapturePhase::Recording;
        tracing::info!("Recording started for item {}", ticket.item_id);
        Ok(())
    }

    /// The device could not be opened; returns false for stale tickets
    pub fn fail(&mut self, ticket: &CaptureTicket, error: CaptureError) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        tracing::warn!("Capture for item {} failed: {}", ticket.item_id, error);
        self.acquiring = None;
        self.error = Some(error);
        self.phase = CapturePhase::Idle;
        true
    }

    pub fn elapsed_ms(&self, now: Timestamp) -> u64 {
        self.started_at
            .map(|started| now.millis_since(started))
            .unwrap_or(0)
    }

    /// When the running capture must be finalized
    pub fn deadline(&self) -> Option<Timestamp> {
        if self.max_duration.is_zero() || !self.is_recording() {
            return None;
        }
        self.started_at.map(|started| started + self.max_duration)
    }

    /// Whether a running capture reached its maximum duration
    pub fn is_over_limit(&self, now: Timestamp) -> bool {
        self.deadline()
            .map(|deadline| now.has_reached(deadline))
            .unwrap_or(false)
    }

    /// Elapsed time of the running capture, capped at the limit
    pub fn capped_elapsed_ms(&self, now: Timestamp) -> u64 {
        match self.deadline() {
            Some(deadline) if now.has_reached(deadline) => {
                u64::try_from(self.max_duration.as_millis()).unwrap_or(u64::MAX)
            }
            _ => self.elapsed_ms(now),
        }
    }

    /// Recording -> Reviewing with the finished take
    pub fn finalize(&mut self, take: CapturedTake) -> bool {
        if !self.is_recording() || self.focused.as_ref() != Some(&take.item_id) {
            return false;
        }

        tracing::info!(
            "Capture finalized for item {} ({} ms)",
            take.item_id,
            take.duration_ms
        );
        self.takes.insert(take.item_id.clone(), take);
        self.started_at = None;
        self.phase = CapturePhase::Reviewing;
        true
    }

    /// Put back a take kept outside this machine (an earlier mount)
    ///
    /// Refused while the item is being captured.
    pub fn restore(&mut self, take: CapturedTake) -> bool {
        let focused = self.focused.as_ref() == Some(&take.item_id);
        if focused && (self.is_recording() || self.acquiring.is_some()) {
            return false;
        }

        if focused {
            self.phase = CapturePhase::Reviewing;
        }
        self.takes.insert(take.item_id.clone(), take);
        true
    }

    /// Reviewing -> Idle, discarding the focused item's take
    pub fn rerecord(&mut self) -> bool {
        if self.phase != CapturePhase::Reviewing {
            return false;
        }

        if let Some(id) = &self.focused {
            self.takes.remove(id);
        }
        self.phase = CapturePhase::Idle;
        true
    }
}

impl Default for CaptureMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Answer to the "recording in progress" warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningChoice {
    /// Finalize the capture, then accept the pending index
    StopAndNavigate,
    /// Stay on the confirmed index
    KeepRecording,
}

/// What the owner must do after the warning was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Move to this index
    Navigate(usize),
    /// Tell the host to go back to this index
    Revert(usize),
}

/// Holds a navigation attempt while a capture is running
///
/// Remembers whether the held target came from the host (a re-render with a
/// new index) or from a local previous/next/jump, since only a host request
/// must be reverted upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationGuard {
    confirmed: usize,
    pending: Option<usize>,
    from_host: bool,
}

impl NavigationGuard {
    pub fn new(confirmed: usize) -> Self {
        Self {
            confirmed,
            pending: None,
            from_host: false,
        }
    }

    /// Last index the owner actually displayed
    pub fn confirmed(&self) -> usize {
        self.confirmed
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    pub fn is_warning(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending target was requested by the host
    pub fn is_host_request(&self) -> bool {
        self.pending.is_some() && self.from_host
    }

    /// Record a local navigation attempt; returns true when a warning is raised
    pub fn hold(&mut self, target: usize) -> bool {
        if target == self.confirmed {
            return false;
        }

        tracing::info!(
            "Navigation to {} held while recording (staying on {})",
            target,
            self.confirmed
        );
        self.pending = Some(target);
        self.from_host = false;
        true
    }

    /// Record the index a host re-render asked for; returns true when a
    /// warning is raised
    ///
    /// Asking for the confirmed index withdraws a warning the host raised and
    /// leaves a locally raised one standing.
    pub fn host_request(&mut self, requested: usize) -> bool {
        if requested == self.confirmed {
            if self.is_host_request() {
                tracing::debug!("Host withdrew navigation to {:?}", self.pending);
                self.pending = None;
                self.from_host = false;
            }
            return false;
        }

        if self.pending == Some(requested) && self.from_host {
            return false;
        }

        tracing::info!(
            "Host navigation to {} held while recording (staying on {})",
            requested,
            self.confirmed
        );
        self.pending = Some(requested);
        self.from_host = true;
        true
    }

    pub fn confirm(&mut self, index: usize) {
        self.confirmed = index;
        self.pending = None;
        self.from_host = false;
    }

    pub fn resolve(&mut self, choice: WarningChoice) -> Option<GuardOutcome> {
        let target = self.pending.take()?;
        self.from_host = false;

        match choice {
            WarningChoice::StopAndNavigate => {
                self.confirmed = target;
                Some(GuardOutcome::Navigate(target))
            }
            WarningChoice::KeepRecording => Some(GuardOutcome::Revert(self.confirmed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(item: &str) -> CapturedTake {
        CapturedTake::new(item.into(), "audio/webm".to_string(), &[1, 2, 3], 500)
    }

    #[test]
    fn test_full_lifecycle() {
        let mut machine = CaptureMachine::new();
        machine.focus(Some("s1".into()), false);
        assert_eq!(machine.phase(), CapturePhase::Idle);

        let ticket = machine.begin(60).unwrap();
        assert!(machine.is_acquiring());
        machine.accept(&ticket, Timestamp::from_millis(1_000)).unwrap();
        assert!(machine.is_recording());
        assert_eq!(machine.elapsed_ms(Timestamp::from_millis(3_500)), 2_500);

        assert!(machine.finalize(take("s1")));
        assert_eq!(machine.phase(), CapturePhase::Reviewing);

        assert!(machine.rerecord());
        assert_eq!(machine.phase(), CapturePhase::Idle);
        assert!(machine.take(&"s1".into()).is_none());
    }

    #[test]
    fn test_stale_ticket_rejected_after_focus_change() {
        let mut machine = CaptureMachine::new();
        machine.focus(Some("s1".into()), false);
        let ticket = machine.begin(60).unwrap();

        machine.focus(Some("s2".into()), false);

        assert_eq!(
            machine.accept(&ticket, Timestamp::from_millis(0)),
            Err(CaptureError::Stale)
        );
        assert!(!machine.fail(&ticket, CaptureError::PermissionDenied));
        assert_eq!(machine.phase(), CapturePhase::Idle);
        assert!(machine.error().is_none());
    }

    #[test]
    fn test_permission_denied_stays_idle() {
        let mut machine = CaptureMachine::new();
        machine.focus(Some("s1".into()), false);
        let ticket = machine.begin(60).unwrap();

        assert!(machine.fail(&ticket, CaptureError::PermissionDenied));
        assert_eq!(machine.phase(), CapturePhase::Idle);
        assert_eq!(machine.error(), Some(&CaptureError::PermissionDenied));
        assert!(!machine.is_acquiring());
    }

    #[test]
    fn test_focus_restores_review() {
        let mut machine = CaptureMachine::new();
        machine.focus(Some("s1".into()), false);
        let ticket = machine.begin(60).unwrap();
        machine.accept(&ticket, Timestamp::from_millis(0)).unwrap();
        machine.finalize(take("s1"));

        machine.focus(Some("s2".into()), false);
        assert_eq!(machine.phase(), CapturePhase::Idle);

        machine.focus(Some("s1".into()), false);
        assert_eq!(machine.phase(), CapturePhase::Reviewing);

        machine.focus(Some("s3".into()), true);
        assert_eq!(machine.phase(), CapturePhase::Reviewing);
    }

    #[test]
    fn test_restored_take_reviews_focused_item() {
        let mut machine = CaptureMachine::new();
        machine.focus(Some("s1".into()), false);

        assert!(machine.restore(take("s1")));
        assert_eq!(machine.phase(), CapturePhase::Reviewing);
        assert_eq!(machine.take(&"s1".into()).map(|t| t.duration_ms), Some(500));

        assert!(machine.rerecord());
        let ticket = machine.begin(60).unwrap();
        assert!(!machine.restore(take("s1")));
        machine.accept(&ticket, Timestamp::from_millis(0)).unwrap();
        assert!(!machine.restore(take("s1")));
        assert!(machine.is_recording());
    }

    #[test]
    fn test_limit_reached() {
        let mut machine = CaptureMachine::new();
        machine.focus(Some("s1".into()), false);
        let ticket = machine.begin(2).unwrap();
        machine.accept(&ticket, Timestamp::from_millis(0)).unwrap();

        assert_eq!(machine.deadline(), Some(Timestamp::from_millis(2_000)));
        assert!(!machine.is_over_limit(Timestamp::from_millis(1_999)));
        assert!(machine.is_over_limit(Timestamp::from_millis(2_000)));
        assert_eq!(machine.capped_elapsed_ms(Timestamp::from_millis(5_000)), 2_000);
    }

    #[test]
    fn test_begin_requires_idle() {
        let mut machine = CaptureMachine::new();
        assert!(machine.begin(60).is_none());

        machine.focus(Some("s1".into()), true);
        assert!(machine.begin(60).is_none());
    }

    #[test]
    fn test_guard_keep_recording_reverts() {
        let mut guard = NavigationGuard::new(1);
        assert!(guard.hold(2));
        assert_eq!(guard.resolve(WarningChoice::KeepRecording), Some(GuardOutcome::Revert(1)));
        assert_eq!(guard.confirmed(), 1);
        assert!(!guard.is_warning());
    }

    #[test]
    fn test_guard_stop_and_navigate() {
        let mut guard = NavigationGuard::new(0);
        assert!(!guard.hold(0));
        assert!(guard.hold(3));
        assert_eq!(
            guard.resolve(WarningChoice::StopAndNavigate),
            Some(GuardOutcome::Navigate(3))
        );
        assert_eq!(guard.confirmed(), 3);
        assert_eq!(guard.resolve(WarningChoice::StopAndNavigate), None);
    }

    #[test]
    fn test_guard_same_index_render_keeps_local_warning() {
        let mut guard = NavigationGuard::new(0);
        assert!(guard.hold(1));

        assert!(!guard.host_request(0));
        assert_eq!(guard.pending(), Some(1));
        assert!(!guard.is_host_request());
    }

    #[test]
    fn test_guard_host_withdraws_own_request() {
        let mut guard = NavigationGuard::new(0);
        assert!(guard.host_request(2));
        assert!(guard.is_host_request());
        assert!(!guard.host_request(2));

        assert!(!guard.host_request(0));
        assert!(!guard.is_warning());
    }
}
