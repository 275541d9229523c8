//! In-process stand-in for the live-production tool.
//!
//! Holds a scene collection, the scene on program and a recording output,
//! and exposes them through the [`Recorder`] and [`SceneSource`]
//! capabilities the automation consumes.

use crate::{AppError, AppResult};

use smartstart_core::{CoreResult, Recorder, RecordingStatus, SceneSource};

use std::{
    collections::BTreeSet,
    panic::Location,
    sync::{Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use tracing::{debug, info};

#[derive(Debug)]
struct HostState {
    scenes: Vec<String>,
    current_scene: Option<String>,
    recording: RecordingStatus,
    starts: u64,
    stops: u64,
}

/// Snapshot of the simulated host for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSnapshot {
    /// Scenes in display order.
    pub scenes: Vec<String>,
    /// Scene on program.
    pub current_scene: Option<String>,
    /// Recording output state.
    pub recording: RecordingStatus,
    /// Start commands received.
    pub starts: u64,
    /// Stop commands received.
    pub stops: u64,
}

/// Simulated host with scenes and a recorder.
#[derive(Debug)]
pub struct SimulatedHost {
    state: Mutex<HostState>,
}

impl SimulatedHost {
    /// Create a host with `scenes`; the first one is on program.
    pub fn new(scenes: Vec<String>) -> Self {
        let current_scene = scenes.first().cloned();

        info!(scene_count = scenes.len(), current_scene = ?current_scene, "Simulated host ready");

        Self {
            state: Mutex::new(HostState {
                scenes,
                current_scene,
                recording: RecordingStatus::Stopped,
                starts: 0,
                stops: 0,
            }),
        }
    }

    /// Put `scene_name` on program.
    #[track_caller]
    pub fn set_program_scene(&self, scene_name: &str) -> AppResult<()> {
        let mut state = self.lock();
        Self::require_scene(&state, scene_name)?;
        state.current_scene = Some(scene_name.to_string());
        debug!(scene = scene_name, "Program scene set");
        Ok(())
    }

    /// Fail unless `scene_name` exists.
    #[track_caller]
    pub fn check_scene(&self, scene_name: &str) -> AppResult<()> {
        Self::require_scene(&self.lock(), scene_name)
    }

    /// Append a new scene.
    #[track_caller]
    pub fn add_scene(&self, scene_name: &str) -> AppResult<()> {
        let mut state = self.lock();
        if state.scenes.iter().any(|s| s == scene_name) {
            return Err(AppError::HostError {
                reason: format!("Scene '{}' already exists", scene_name),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        state.scenes.push(scene_name.to_string());
        info!(scene = scene_name, "Scene added");
        Ok(())
    }

    /// Delete a scene. The program scene cannot be deleted.
    #[track_caller]
    pub fn remove_scene(&self, scene_name: &str) -> AppResult<()> {
        let mut state = self.lock();
        Self::require_scene(&state, scene_name)?;
        if state.current_scene.as_deref() == Some(scene_name) {
            return Err(AppError::HostError {
                reason: format!("Scene '{}' is on program", scene_name),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        state.scenes.retain(|s| s != scene_name);
        info!(scene = scene_name, "Scene removed");
        Ok(())
    }

    /// Rename a scene, keeping its position and program status.
    #[track_caller]
    pub fn rename_scene(&self, old_name: &str, new_name: &str) -> AppResult<()> {
        let mut state = self.lock();
        Self::require_scene(&state, old_name)?;
        if state.scenes.iter().any(|s| s == new_name) {
            return Err(AppError::HostError {
                reason: format!("Scene '{}' already exists", new_name),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        for scene in state.scenes.iter_mut().filter(|s| s.as_str() == old_name) {
            *scene = new_name.to_string();
        }
        if state.current_scene.as_deref() == Some(old_name) {
            state.current_scene = Some(new_name.to_string());
        }

        info!(old_name, new_name, "Scene renamed");
        Ok(())
    }

    /// Pause an active recording.
    #[track_caller]
    pub fn pause(&self) -> AppResult<()> {
        self.switch_recording(RecordingStatus::Started, RecordingStatus::Paused)
    }

    /// Resume a paused recording.
    #[track_caller]
    pub fn resume(&self) -> AppResult<()> {
        self.switch_recording(RecordingStatus::Paused, RecordingStatus::Started)
    }

    /// Current host state.
    pub fn snapshot(&self) -> HostSnapshot {
        let state = self.lock();
        HostSnapshot {
            scenes: state.scenes.clone(),
            current_scene: state.current_scene.clone(),
            recording: state.recording,
            starts: state.starts,
            stops: state.stops,
        }
    }

    #[track_caller]
    fn switch_recording(&self, from: RecordingStatus, to: RecordingStatus) -> AppResult<()> {
        let mut state = self.lock();
        if state.recording != from {
            return Err(AppError::HostError {
                reason: format!("Recording is {}, expected {}", state.recording, from),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        state.recording = to;
        info!(recording = %to, "Recording state changed");
        Ok(())
    }

    #[track_caller]
    fn require_scene(state: &HostState, scene_name: &str) -> AppResult<()> {
        if state.scenes.iter().any(|s| s == scene_name) {
            Ok(())
        } else {
            Err(AppError::HostError {
                reason: format!("No scene named '{}'", scene_name),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Recorder for SimulatedHost {
    fn status(&self) -> RecordingStatus {
        self.lock().recording
    }

    fn start_recording(&self) -> CoreResult<()> {
        let mut state = self.lock();
        state.starts += 1;

        // Like the real output, a start while active (or paused) is ignored.
        if state.recording == RecordingStatus::Stopped {
            state.recording = RecordingStatus::Started;
            info!("Recording started");
        } else {
            debug!(recording = %state.recording, "Start ignored, output active");
        }
        Ok(())
    }

    fn stop_recording(&self) -> CoreResult<()> {
        let mut state = self.lock();
        state.stops += 1;

        if state.recording != RecordingStatus::Stopped {
            state.recording = RecordingStatus::Stopped;
            info!("Recording stopped");
        } else {
            debug!("Stop ignored, output inactive");
        }
        Ok(())
    }
}

impl SceneSource for SimulatedHost {
    fn current_scene_name(&self) -> Option<String> {
        self.lock().current_scene.clone()
    }

    fn scene_names(&self) -> BTreeSet<String> {
        self.lock().scenes.iter().cloned().collect()
    }
}
