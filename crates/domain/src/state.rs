//! Controller states.

use std::fmt;

/// The state the controller is in. Exactly one is current at any time.
///
/// `ConfigSetSocket` and `ConfigSetThreshold` are only entered through the
/// controller's configuration API; `Monitor` is declared for a periodic
/// monitoring mode and nothing enters it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Start,
    ConfigScan,
    ConfigSetSocket,
    ConfigSetThreshold,
    Monitor,
    MonitorReadSensor,
    MonitorControlSocket,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::ConfigScan => "config.scan",
            Self::ConfigSetSocket => "config.set_socket",
            Self::ConfigSetThreshold => "config.set_threshold",
            Self::Monitor => "monitor",
            Self::MonitorReadSensor => "monitor.read_sensor",
            Self::MonitorControlSocket => "monitor.control_socket",
        })
    }
}
