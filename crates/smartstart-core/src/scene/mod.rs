mod host_event;
mod switcher;

pub use {
    host_event::{Activation, HostEvent, SceneSource},
    switcher::{SceneDecision, SceneSwitcher},
};
