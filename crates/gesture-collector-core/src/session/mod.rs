pub(crate) mod channel;
mod clock;
mod labels;
mod name;
mod recorder;
pub(crate) mod sink;
mod status;

pub use {
    channel::Channel,
    clock::{LocalClock, SessionClock},
    labels::{Force, Gesture, Hand, LabelStyle, SessionLabels},
    name::{SessionName, TIMESTAMP_FORMAT},
    recorder::SessionRecorder,
    status::{LiveReadout, RecorderStatus, SessionSummary},
};
