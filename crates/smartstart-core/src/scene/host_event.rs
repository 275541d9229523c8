use std::collections::BTreeSet;

/// Scene model provided by the host application.
pub trait SceneSource: Send + Sync {
    /// Name of the scene currently on program, if any.
    fn current_scene_name(&self) -> Option<String>;

    /// Names of every scene in the current scene collection.
    fn scene_names(&self) -> BTreeSet<String>;
}

/// Notifications the host delivers, possibly from several threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The program scene changed. Fired after a transition completes, after
    /// a cut, and once at startup for the restored scene.
    SceneChanged,
    /// A visual transition towards `destination` has begun.
    TransitionStarted {
        /// Scene the transition is heading to.
        destination: String,
    },
    /// Scenes were added to or removed from the collection.
    SceneListChanged,
    /// A scene was renamed.
    SceneRenamed {
        /// Name before the rename.
        old_name: String,
        /// Name after the rename.
        new_name: String,
    },
}

/// How a scene became active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A transition has begun; rule delays are measured from now.
    Transition,
    /// The scene is simply current (cut, startup, recovery after a crash).
    Direct,
}
