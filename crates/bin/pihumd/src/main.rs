//! # pihumd — humidity controller daemon
//!
//! Composition root that wires the adapters together and runs the controller
//! on the terminal.
//!
//! ## Responsibilities
//! - Load configuration (file, env vars)
//! - Install the tracing subscriber (stderr, so stdout stays with the operator)
//! - Construct the adapters for the configured backend
//! - Apply startup thresholds and socket selection
//! - Run the controller and map its outcome to the exit code
//!
//! ## Exit codes
//! - `3`: the operator asked to exit
//! - `1`: operator input ended or failed, or startup failed
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod console;

use std::process::ExitCode;

use pihum_adapter_iio::IioSensor;
use pihum_adapter_orvibo::{OrviboSocketController, OrviboTransport};
use pihum_adapter_virtual::VirtualBackend;
use pihum_app::controller::Controller;
use pihum_app::ports::{DeviceDiscovery, Operator, SensorReader, SocketController};
use pihum_app::services::discovery_service::DiscoveryService;
use pihum_app::services::sensor_service::RetryingSensorReader;
use tracing_subscriber::EnvFilter;

use config::{Backend, Config};
use console::Console;

const EXIT_REQUESTED: u8 = 3;
const EXIT_INPUT_FAILED: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "startup failed");
            eprintln!("pihumd: {err:#}");
            ExitCode::from(EXIT_INPUT_FAILED)
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    init_tracing(&config.logging.filter);
    tracing::info!(backend = ?config.backend, "pihumd starting");

    let operator = Console::stdio();
    match config.backend {
        Backend::Hardware => {
            let orvibo = config.orvibo.clone();
            let discovery = DiscoveryService::new(OrviboTransport::new(orvibo.clone()))
                .with_rebuild(move || OrviboTransport::new(orvibo.clone()));
            let sensor = RetryingSensorReader::new(IioSensor::new(config.iio()), config.retry_delay());
            let socket = OrviboSocketController::with_port(config.orvibo.broadcast.port());
            drive(
                Controller::new(discovery, sensor, socket, operator),
                &config,
            )
            .await
        }
        Backend::Virtual => {
            let VirtualBackend {
                transport,
                sensor,
                socket,
            } = VirtualBackend::new(&config.simulation);
            let spare = transport.fresh();
            let discovery = DiscoveryService::new(transport).with_rebuild(move || spare.fresh());
            let sensor = RetryingSensorReader::new(sensor, config.retry_delay());
            drive(
                Controller::new(discovery, sensor, socket, operator),
                &config,
            )
            .await
        }
    }
}

async fn drive<D, S, C, O>(
    controller: Controller<D, S, C, O>,
    config: &Config,
) -> anyhow::Result<ExitCode>
where
    D: DeviceDiscovery,
    S: SensorReader,
    C: SocketController,
    O: Operator,
{
    let mut controller = controller.with_discovery_timeout(config.discovery_timeout());
    controller.configure_thresholds(config.thresholds()?);
    if let Some(mac) = config.socket.mac {
        controller.configure_socket(mac, config.socket.address);
    }

    match controller.run().await {
        Ok(()) => Ok(ExitCode::from(EXIT_REQUESTED)),
        Err(err) => {
            tracing::error!(%err, "controller stopped");
            Ok(ExitCode::from(EXIT_INPUT_FAILED))
        }
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("pihumd: ignoring invalid log filter {filter:?}: {err}");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
