use crate::config::Config;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SetValue(i32),
    StartSweep,
    StopSweep,
    /// A changed config that already passed validation.
    ConfigReload(Box<Config>),
}
