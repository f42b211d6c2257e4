//! Controller — the state machine driving discovery, sensing and switching.
//!
//! ```text
//!            ┌──── discover ───▶ ConfigScan ──────────────────────────┐
//!            │                                                        │
//!  ┌──▶ Start ─── check ────▶ MonitorReadSensor ──ok──▶ MonitorControlSocket
//!  │     │  ▲                        │ SensorError                    │
//!  │     │  └────────────────────────┴────────────────────────────────┘
//!  │  exit/no ──▶ (terminate)
//!  └── unknown input
//!
//!  configure_* ──▶ ConfigSetSocket / ConfigSetThreshold ──▶ Start
//! ```
//!
//! Exactly one state is current; [`Controller::step`] runs the handler of the
//! current state to completion before the next one starts. Leaf services are
//! injected as port implementations and never abort the controller: their
//! failures are reported to the operator and the machine returns to `Start`.

mod context;

pub use context::ControllerContext;

use std::net::IpAddr;
use std::time::Duration;

use pihum_domain::command::Command;
use pihum_domain::device::{MacAddress, PowerState};
use pihum_domain::state::State;
use pihum_domain::threshold::ThresholdConfig;

use crate::ports::{DeviceDiscovery, InputError, Operator, SensorReader, SocketController};
use crate::services::discovery_service::DEFAULT_TIMEOUT;

/// Shown once when the controller starts.
pub const GREETING: &str = "What can I do for you?";
/// Shown after every command.
pub const DONE: &str = "Done! Do you want anything else?";
/// Shown for input that is not a command.
pub const UNKNOWN_COMMAND: &str = "Unknown command!";

/// Consecutive failed reads of operator input tolerated before giving up.
const MAX_INPUT_FAILURES: u32 = 5;

/// Conditions that end [`Controller::run`] without an exit command.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The operator input was closed.
    #[error("operator input closed")]
    InputClosed,

    /// Reading operator input kept failing.
    #[error("operator input failed {attempts} times in a row")]
    InputUnavailable {
        attempts: u32,
        #[source]
        last: InputError,
    },
}

/// Whether the machine keeps running after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The humidity controller state machine.
pub struct Controller<D, S, C, O> {
    context: ControllerContext,
    discovery: D,
    sensor: S,
    socket: C,
    operator: O,
    discovery_timeout: Duration,
}

impl<D, S, C, O> Controller<D, S, C, O>
where
    D: DeviceDiscovery,
    S: SensorReader,
    C: SocketController,
    O: Operator,
{
    /// Create a controller in `Start` with default thresholds and no socket.
    pub fn new(discovery: D, sensor: S, socket: C, operator: O) -> Self {
        Self {
            context: ControllerContext::default(),
            discovery,
            sensor,
            socket,
            operator,
            discovery_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override how long each discovery run listens.
    #[must_use]
    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    #[must_use]
    pub fn context(&self) -> &ControllerContext {
        &self.context
    }

    /// Replace the humidity band, passing through `ConfigSetThreshold`.
    pub fn configure_thresholds(&mut self, thresholds: ThresholdConfig) {
        self.transition(State::ConfigSetThreshold);
        tracing::info!(
            low = thresholds.low(),
            high = thresholds.high(),
            "thresholds configured"
        );
        self.context.thresholds = thresholds;
        self.transition(State::Start);
    }

    /// Choose the socket to control, passing through `ConfigSetSocket`.
    ///
    /// See [`ControllerContext`] for how the device is resolved when it has
    /// not been discovered yet.
    pub fn configure_socket(&mut self, mac: MacAddress, address: Option<IpAddr>) {
        self.transition(State::ConfigSetSocket);
        self.context.select_socket(mac, address);
        match self.context.selected() {
            Some(device) => tracing::info!(%mac, address = %device.address, "socket selected"),
            None => tracing::info!(%mac, "socket selected, waiting for discovery to locate it"),
        }
        self.transition(State::Start);
    }

    /// Greet the operator and step until exit.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] when operator input ends or keeps failing.
    /// `Ok` means the operator asked to exit.
    pub async fn run(&mut self) -> Result<(), ControllerError> {
        tracing::info!("controller started");
        self.operator.say(GREETING).await;
        while self.step().await? == Flow::Continue {}
        tracing::info!("exit requested by operator");
        Ok(())
    }

    /// Run the handler of the current state.
    ///
    /// # Errors
    ///
    /// Only the `Start` state fails, when no command can be read.
    pub async fn step(&mut self) -> Result<Flow, ControllerError> {
        match self.context.state {
            State::Start => return self.on_start().await,
            State::ConfigScan => self.on_config_scan().await,
            State::MonitorReadSensor => self.on_read_sensor().await,
            State::MonitorControlSocket => self.on_control_socket().await,
            state @ (State::ConfigSetSocket | State::ConfigSetThreshold | State::Monitor) => {
                tracing::warn!(%state, "no handler for state, returning to start");
                self.transition(State::Start);
            }
        }
        Ok(Flow::Continue)
    }

    fn transition(&mut self, next: State) {
        tracing::debug!(from = %self.context.state, to = %next, "state transition");
        self.context.state = next;
    }

    /// Return to `Start` and tell the operator the command is done.
    async fn finish(&mut self) {
        self.transition(State::Start);
        self.operator.say(DONE).await;
    }

    async fn on_start(&mut self) -> Result<Flow, ControllerError> {
        let line = self.read_command().await?;
        match line.parse::<Command>() {
            Ok(Command::Discover) => self.transition(State::ConfigScan),
            Ok(Command::Check) => self.transition(State::MonitorReadSensor),
            Ok(Command::Exit) => return Ok(Flow::Exit),
            Err(err) => {
                tracing::debug!(%err, "rejected operator input");
                self.operator.say(UNKNOWN_COMMAND).await;
                self.operator.say(DONE).await;
            }
        }
        Ok(Flow::Continue)
    }

    async fn read_command(&mut self) -> Result<String, ControllerError> {
        let mut failures = 0;
        loop {
            match self.operator.next_command().await {
                Ok(line) => return Ok(line),
                Err(InputError::EndOfInput) => return Err(ControllerError::InputClosed),
                Err(err) => {
                    failures += 1;
                    if failures >= MAX_INPUT_FAILURES {
                        return Err(ControllerError::InputUnavailable {
                            attempts: failures,
                            last: err,
                        });
                    }
                    tracing::warn!(%err, failures, "failed to read command, retrying");
                }
            }
        }
    }

    async fn on_config_scan(&mut self) {
        self.operator.say("Searching...").await;
        let registry = self.discovery.discover(self.discovery_timeout).await;

        let mut devices: Vec<_> = registry.devices().collect();
        devices.sort_by_key(|device| device.mac);
        for device in &devices {
            self.operator
                .say(&format!(
                    "Found: {} (MAC {}, power {})",
                    device.address, device.mac, device.power
                ))
                .await;
        }
        if devices.is_empty() {
            self.operator.say("No sockets found.").await;
        }

        self.context.store_registry(registry);
        self.finish().await;
    }

    async fn on_read_sensor(&mut self) {
        match self.sensor.read().await {
            Ok(measurement) => {
                tracing::info!(%measurement, "measurement taken");
                self.operator.say(&format!("Measured {measurement}")).await;
                self.context.last_measurement = Some(measurement);
                self.transition(State::MonitorControlSocket);
            }
            Err(err) => {
                tracing::error!(%err, cause = ?std::error::Error::source(&err), "sensor read failed");
                self.operator.say(&format!("Sensor read failed: {err}")).await;
                self.finish().await;
            }
        }
    }

    async fn on_control_socket(&mut self) {
        let Some(measurement) = self.context.last_measurement else {
            self.finish().await;
            return;
        };

        let power = self.context.socket_power;
        let decision = self.context.thresholds.decide(measurement.humidity(), power);
        match (decision.command(), self.context.selected.clone()) {
            (None, _) => {
                tracing::debug!(humidity = measurement.humidity(), %power, "no action needed");
                self.operator
                    .say(&format!("No action needed, socket is {power}."))
                    .await;
            }
            (Some(on), None) => {
                let wanted = PowerState::from(on);
                tracing::warn!(%wanted, "socket action needed but no socket selected");
                self.operator
                    .say(&format!("Socket should be {wanted}, but no socket is selected."))
                    .await;
            }
            (Some(on), Some(device)) => {
                let wanted = PowerState::from(on);
                match self.socket.set_power(&device, on).await {
                    Ok(()) => {
                        tracing::info!(mac = %device.mac, %wanted, "socket switched");
                        self.context.socket_power = wanted;
                        self.operator
                            .say(&format!("Switched {} {wanted}.", device.label()))
                            .await;
                    }
                    Err(err) => {
                        tracing::warn!(%err, mac = %device.mac, "failed to switch socket");
                        self.operator
                            .say(&format!("Failed to switch {}: {err}", device.label()))
                            .await;
                    }
                }
            }
        }

        self.finish().await;
    }
}
