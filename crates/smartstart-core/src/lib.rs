//! SmartStart Core Library
//!
//! Starts and stops a recording when configured scenes go live, optionally
//! after a per-scene delay that is canceled when the scene changes again.
//!
//! # Example
//!
//! ```no_run
//! use smartstart_core::{
//!     Automation, CoreResult, HostEvent, RecordingAction, RecordingController, RecordingRule,
//!     Recorder, SceneSource,
//! };
//!
//! use std::sync::Arc;
//!
//! async fn wire(host: Arc<impl Recorder + SceneSource + 'static>) -> CoreResult<()> {
//!     let controller = RecordingController::new(host.clone())?;
//!     let rules = vec![RecordingRule::new("Live", RecordingAction::Start, 1500)];
//!     let automation = Automation::new(controller, host, rules);
//!
//!     automation.reconcile();
//!     automation.handle_event(HostEvent::TransitionStarted {
//!         destination: "Live".to_string(),
//!     });
//!
//!     automation.shutdown().await;
//!     Ok(())
//! }
//! ```

mod automation;
mod controller;
mod error;
mod rules;
mod scene;

pub use {
    automation::Automation,
    controller::{ControllerPhase, PendingAction, Recorder, RecordingController, RecordingStatus},
    error::CoreError,
    error::Result as CoreResult,
    rules::{MAX_TRIGGER_TIME_MS, RecordingAction, RecordingRule, RuleIndex},
    scene::{Activation, HostEvent, SceneDecision, SceneSource, SceneSwitcher},
};

#[cfg(test)]
mod tests;
