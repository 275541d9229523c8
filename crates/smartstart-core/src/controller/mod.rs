#[allow(clippy::module_inception)]
mod controller;
mod pending;
mod recorder;

pub(crate) use recorder::RecorderGate;

pub use {
    controller::RecordingController,
    pending::{ControllerPhase, PendingAction},
    recorder::{Recorder, RecordingStatus},
};
