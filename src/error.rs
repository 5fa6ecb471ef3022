//! Our error types for the ET inverter sessions.

use thiserror::Error;

use crate::capability::Topology;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for GoodWe ET inverter communications.
///
/// Errors fall in three groups:
/// * [`Error::Rejected`] is the device explicitly refusing a request. With an
///   [`rmodbus::ErrorKind::IllegalDataAddress`] reason it means "no register here"
///   and drives capability learning.
/// * Serial, framing and timeout errors mean no usable response arrived. They
///   are never used to infer capabilities.
/// * Validation errors are raised before anything is sent to the device.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Request rejected by device: {0}")]
    Rejected(rmodbus::ErrorKind),
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Modbus protocol error: {0}")]
    ModbusError(rmodbus::ErrorKind),
    #[error("Communication timeout")]
    Timeout,
    #[error("Invalid response received")]
    InvalidResponse,
    #[error("Frame buffer too small")]
    BufferError,
    #[error("Unknown sensor \"{0}\"")]
    UnknownSensor(String),
    #[error("Unknown setting \"{0}\"")]
    UnknownSetting(String),
    #[error("Setting \"{0}\" is read only")]
    ReadOnly(String),
    #[error("Invalid value for \"{id}\": {reason}")]
    InvalidValue { id: String, reason: &'static str },
    #[error("Device has not been identified yet")]
    NotIdentified,
    #[error("Not a coordinator of a multi-unit system (topology: {0})")]
    NotCoordinator(Topology),
}

impl<I: embedded_io::Error> Error<I> {
    /// The device answered "no register exists at this address".
    pub fn is_illegal_address(&self) -> bool {
        matches!(self, Error::Rejected(rmodbus::ErrorKind::IllegalDataAddress))
    }

    /// Any protocol level negative acknowledgement.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Rejected(_))
    }

    /// No usable response arrived from the device.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Error::SerialError(_)
                | Error::ModbusError(_)
                | Error::Timeout
                | Error::InvalidResponse
                | Error::BufferError
        )
    }

    pub(crate) fn invalid_value(id: &str, reason: &'static str) -> Self {
        Error::InvalidValue {
            id: id.into(),
            reason,
        }
    }
}

impl<I: embedded_io::Error> From<rmodbus::ErrorKind> for Error<I> {
    fn from(err: rmodbus::ErrorKind) -> Self {
        use rmodbus::ErrorKind as EK;
        match err {
            EK::IllegalFunction
            | EK::IllegalDataAddress
            | EK::IllegalDataValue
            | EK::SlaveDeviceFailure
            | EK::Acknowledge
            | EK::SlaveDeviceBusy
            | EK::NegativeAcknowledge
            | EK::MemoryParityError
            | EK::GatewayPathUnavailable
            | EK::GatewayTargetFailed => Error::Rejected(err),
            _ => Error::ModbusError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_serial::MockSerialError;

    #[test]
    fn exception_codes_are_rejections() {
        let err: Error<MockSerialError> = rmodbus::ErrorKind::IllegalDataAddress.into();
        assert!(err.is_illegal_address());
        assert!(err.is_rejection());
        assert!(!err.is_transport_failure());

        let err: Error<MockSerialError> = rmodbus::ErrorKind::SlaveDeviceBusy.into();
        assert!(!err.is_illegal_address());
        assert!(err.is_rejection());
    }

    #[test]
    fn framing_errors_are_transport_failures() {
        let err: Error<MockSerialError> = rmodbus::ErrorKind::FrameCRCError.into();
        assert!(err.is_transport_failure());
        assert!(!err.is_rejection());

        let err: Error<MockSerialError> = Error::SerialError(MockSerialError::Timeout);
        assert!(err.is_transport_failure());
    }

    #[test]
    fn validation_errors_are_neither() {
        let err: Error<MockSerialError> = Error::UnknownSetting("nope".into());
        assert!(!err.is_rejection());
        assert!(!err.is_transport_failure());
    }
}
