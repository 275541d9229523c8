#![allow(clippy::unwrap_used)]

mod rules;

use crate::{CoreError, CoreResult, Recorder, RecordingStatus, SceneSource};

use std::{
    collections::BTreeSet,
    panic::Location,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use error_location::ErrorLocation;

/// In-memory host: a recorder plus a scene collection.
pub(crate) struct FakeHost {
    status: Mutex<RecordingStatus>,
    scenes: Mutex<BTreeSet<String>>,
    current_scene: Mutex<Option<String>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
    refuse: AtomicBool,
}

impl FakeHost {
    pub(crate) fn new(status: RecordingStatus) -> Self {
        Self {
            status: Mutex::new(status),
            scenes: Mutex::new(BTreeSet::new()),
            current_scene: Mutex::new(None),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            refuse: AtomicBool::new(false),
        }
    }

    pub(crate) fn with_scenes(status: RecordingStatus, scenes: &[&str]) -> Self {
        let host = Self::new(status);
        *host.scenes.lock().unwrap() = scenes.iter().map(|s| s.to_string()).collect();
        host
    }

    pub(crate) fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub(crate) fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub(crate) fn set_status(&self, status: RecordingStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub(crate) fn set_current_scene(&self, scene_name: &str) {
        *self.current_scene.lock().unwrap() = Some(scene_name.to_string());
    }

    pub(crate) fn set_scenes(&self, scenes: &[&str]) {
        *self.scenes.lock().unwrap() = scenes.iter().map(|s| s.to_string()).collect();
    }

    pub(crate) fn refuse_commands(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    #[track_caller]
    fn check_refused(&self) -> CoreResult<()> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(CoreError::RecorderFailed {
                reason: "output busy".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

impl Recorder for FakeHost {
    fn status(&self) -> RecordingStatus {
        *self.status.lock().unwrap()
    }

    fn start_recording(&self) -> CoreResult<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.check_refused()?;
        self.set_status(RecordingStatus::Started);
        Ok(())
    }

    fn stop_recording(&self) -> CoreResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.check_refused()?;
        self.set_status(RecordingStatus::Stopped);
        Ok(())
    }
}

impl SceneSource for FakeHost {
    fn current_scene_name(&self) -> Option<String> {
        self.current_scene.lock().unwrap().clone()
    }

    fn scene_names(&self) -> BTreeSet<String> {
        self.scenes.lock().unwrap().clone()
    }
}
