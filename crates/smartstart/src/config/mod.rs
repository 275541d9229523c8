mod host_config;
mod logging_config;
#[allow(clippy::module_inception)]
mod config;
mod recording_setting_table;

pub(crate) use {
    config::Config, host_config::HostConfig, logging_config::LoggingConfig,
    recording_setting_table::RecordingSettingTable,
};

#[cfg(test)]
pub(crate) use recording_setting_table::PersistedRule;

pub(crate) const DEFAULT_LOG_FILTER: &str = "smartstart=info,smartstart_core=info";
pub(crate) const DEFAULT_TRANSITION_MS: u64 = 300;
pub(crate) const DEFAULT_SCENES: [&str; 3] = ["Starting Soon", "Live", "Ending"];

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

pub(crate) fn default_transition_ms() -> u64 {
    DEFAULT_TRANSITION_MS
}

pub(crate) fn default_scenes() -> Vec<String> {
    DEFAULT_SCENES.iter().map(|s| s.to_string()).collect()
}
