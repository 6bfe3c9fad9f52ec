//! Spoken capture: device seam, per-item takes and the navigation guard

mod device;
mod machine;

pub use device::{CaptureDevice, CaptureStream, CapturedTake};
pub use machine::{
    CaptureMachine, CapturePhase, CaptureTicket, GuardOutcome, NavigationGuard, WarningChoice,
};
