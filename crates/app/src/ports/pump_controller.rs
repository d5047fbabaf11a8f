//! Pump controller port: the remote device-control API.

use std::future::Future;

use irrigator_domain::error::IrrigatorError;
use irrigator_domain::pump::{CommandAck, PumpCommand};
use irrigator_domain::status::DeviceStatus;

/// Remote device that reports sensor/actuator state and accepts pump commands.
pub trait PumpController: Send + Sync {
    /// Fetch the latest status from the device.
    ///
    /// A device that answers but reports itself disconnected is **not** an
    /// error; it yields a status with `connected == false`.
    fn fetch_status(&self) -> impl Future<Output = Result<DeviceStatus, IrrigatorError>> + Send;

    /// Ask the device to switch the pump.
    ///
    /// The device may refuse, which is reported as an unsuccessful
    /// [`CommandAck`] rather than an error.
    fn send_command(
        &self,
        command: PumpCommand,
    ) -> impl Future<Output = Result<CommandAck, IrrigatorError>> + Send;
}

impl<T: PumpController> PumpController for std::sync::Arc<T> {
    fn fetch_status(&self) -> impl Future<Output = Result<DeviceStatus, IrrigatorError>> + Send {
        (**self).fetch_status()
    }

    fn send_command(
        &self,
        command: PumpCommand,
    ) -> impl Future<Output = Result<CommandAck, IrrigatorError>> + Send {
        (**self).send_command(command)
    }
}
