//! Contest time and access state model.
//!
//! - `window` - Inclusive time windows and phases
//! - `clock` - Recurring tick source with owned cancellation
//! - `policy` - Pure access derivation
//! - `registration` - Register/unregister gate
//! - `view` - Per-screen state with tick ordering and liveness
//! - `format` - Countdown and timestamp rendering
//! - `model` - Contest wire model

pub mod clock;
pub mod format;
pub mod model;
pub mod policy;
pub mod registration;
pub mod view;
pub mod window;

pub use clock::{ClockError, ContestClock, Tick, TickHandle, DEFAULT_TICK_INTERVAL};
pub use format::{
    format_countdown, format_duration, format_relative_time, format_timestamp, timeline,
    Countdown, TimelineEvent, TimelineKind,
};
pub use model::{Contest, ContestWindows};
pub use policy::{
    derive, AccessInputs, AccessPolicy, ContestAccessState, CountdownTarget, Urgency,
};
pub use registration::{
    ErrorKind, GateError, GateOutcome, GateState, Notice, PendingCall, RegistrationAction,
    RegistrationApi, RegistrationGate, RegistrationStatus,
};
pub use view::{run_registration, ContestView, SharedView};
pub use window::{ContestPhase, TimeWindow, WindowError};
