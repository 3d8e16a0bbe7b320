//! Supported foot switch models and device selection

use anyhow::{Context, Result};
use clap::ValueEnum;
use footswitch_hid_common::{
    DeviceMatch, HidCommonError, HidDeviceInfo, HidPort, HidTransport, describe_matches, find_all,
    find_first,
};
use hid_footswitch1p_protocol::FOOTSWITCH1P_DEVICES;
use hid_pcsensor_protocol::PCSENSOR_DEVICES;
use hid_scythe_protocol::{SCYTHE_DEVICES, SCYTHE2_DEVICES};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::CliError;

/// Protocol family spoken by a connected foot switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// PCsensor FS2007 and compatible 1-3 pedal switches
    Pcsensor,
    /// Scythe USB-Foot Switch (3 pedals)
    Scythe,
    /// Scythe USB-Foot Switch II (6 pedals)
    Scythe2,
    /// Single pedal PCsensor variant
    Footswitch1p,
}

impl Model {
    pub const ALL: [Model; 4] = [
        Model::Pcsensor,
        Model::Scythe,
        Model::Scythe2,
        Model::Footswitch1p,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pcsensor => "pcsensor",
            Self::Scythe => "scythe",
            Self::Scythe2 => "scythe2",
            Self::Footswitch1p => "footswitch1p",
        }
    }

    pub fn builtin_devices(self) -> &'static [DeviceMatch] {
        match self {
            Self::Pcsensor => &PCSENSOR_DEVICES,
            Self::Scythe => &SCYTHE_DEVICES,
            Self::Scythe2 => &SCYTHE2_DEVICES,
            Self::Footswitch1p => &FOOTSWITCH1P_DEVICES,
        }
    }

    /// Whether the device only picks up new settings after a replug.
    pub fn needs_replug(self) -> bool {
        matches!(self, Self::Scythe | Self::Scythe2)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Match tables for every model, built-in entries first.
#[derive(Debug, Clone)]
pub struct DeviceTables {
    tables: Vec<(Model, Vec<DeviceMatch>)>,
}

impl DeviceTables {
    pub fn new(config: &Config) -> Self {
        let tables = Model::ALL
            .iter()
            .map(|model| {
                let mut table = model.builtin_devices().to_vec();
                table.extend(
                    config
                        .extra_devices
                        .iter()
                        .filter(|extra| extra.model == *model)
                        .map(|extra| extra.to_match()),
                );
                (*model, table)
            })
            .collect();
        Self { tables }
    }

    pub fn table(&self, model: Model) -> &[DeviceMatch] {
        self.tables
            .iter()
            .find(|(m, _)| *m == model)
            .map_or(&[], |(_, table)| table.as_slice())
    }

    /// The model whose table accepts `info`, if any.
    pub fn model_of(&self, info: &HidDeviceInfo) -> Option<Model> {
        self.tables
            .iter()
            .find(|(_, table)| table.iter().any(|entry| entry.matches(info)))
            .map(|(model, _)| *model)
    }
}

/// Finds the single supported model that is connected.
pub fn detect_model(port: &dyn HidPort, tables: &DeviceTables) -> Result<Model> {
    let mut found = Vec::new();
    for model in Model::ALL {
        let devices = find_all(port, tables.table(model))
            .with_context(|| format!("enumerating {model} devices"))?;
        if !devices.is_empty() {
            debug!(%model, count = devices.len(), "found connected devices");
            found.push(model);
        }
    }
    match found.as_slice() {
        [] => Err(CliError::DeviceNotFound("no supported foot switch is connected".into()).into()),
        [model] => {
            info!(%model, "auto-detected foot switch model");
            Ok(*model)
        }
        several => Err(CliError::ValidationError(format!(
            "several foot switch models are connected ({}), pick one with --model",
            several
                .iter()
                .map(|m| m.name())
                .collect::<Vec<_>>()
                .join(", ")
        ))
        .into()),
    }
}

/// Finds and opens the first connected device of `model`.
pub fn open_model(
    port: &dyn HidPort,
    tables: &DeviceTables,
    model: Model,
) -> Result<Box<dyn HidTransport>> {
    let table = tables.table(model);
    let info = find_first(port, table).map_err(|e| match e {
        HidCommonError::DeviceNotFound(_) => CliError::DeviceNotFound(format!(
            "no {model} foot switch connected (looked for {})",
            describe_matches(table)
        )),
        other => CliError::DeviceNotFound(other.to_string()),
    })?;
    debug!(%model, path = %info.path, "opening foot switch");
    port.open_device(&info).map_err(|e| {
        CliError::PermissionDenied(format!(
            "{e} (run as root or install a udev rule for {:04x}:{:04x})",
            info.vendor_id, info.product_id
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtraDevice;
    use footswitch_hid_common::hid_traits::mock::{MockPort, MockTransport};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn pcsensor() -> HidDeviceInfo {
        HidDeviceInfo::new(0x0c45, 0x7403, "/dev/hidraw1".into()).with_interface(1)
    }

    fn scythe2() -> HidDeviceInfo {
        HidDeviceInfo::new(0x055a, 0x0998, "/dev/hidraw4".into())
    }

    #[test]
    fn test_model_of_builtin_ids() {
        let tables = DeviceTables::new(&Config::default());
        assert_eq!(tables.model_of(&pcsensor()), Some(Model::Pcsensor));
        assert_eq!(tables.model_of(&scythe2()), Some(Model::Scythe2));
        let footswitch1p =
            HidDeviceInfo::new(0x5131, 0x2019, "/dev/hidraw7".into()).with_interface(3);
        assert_eq!(tables.model_of(&footswitch1p), Some(Model::Footswitch1p));
        let keyboard = HidDeviceInfo::new(0x046d, 0xc31c, "/dev/hidraw0".into());
        assert_eq!(tables.model_of(&keyboard), None);
    }

    #[test]
    fn test_extra_devices_extend_tables() {
        let config = Config {
            extra_devices: vec![ExtraDevice {
                model: Model::Pcsensor,
                vendor_id: 0x1234,
                product_id: 0x5678,
                interface: None,
            }],
            ..Config::default()
        };
        let tables = DeviceTables::new(&config);
        assert_eq!(tables.table(Model::Pcsensor).len(), PCSENSOR_DEVICES.len() + 1);
        let clone = HidDeviceInfo::new(0x1234, 0x5678, "/dev/hidraw9".into());
        assert_eq!(tables.model_of(&clone), Some(Model::Pcsensor));
    }

    #[test]
    fn test_detect_single_model() -> TestResult {
        let mut port = MockPort::new();
        port.add_device(MockTransport::with_info(scythe2()));
        port.add_device(MockTransport::new(0x046d, 0xc31c, "/dev/hidraw0"));
        let tables = DeviceTables::new(&Config::default());
        assert_eq!(detect_model(&port, &tables)?, Model::Scythe2);
        Ok(())
    }

    #[test]
    fn test_detect_without_devices_is_not_found() {
        let port = MockPort::new();
        let tables = DeviceTables::new(&Config::default());
        let err = detect_model(&port, &tables);
        assert!(matches!(
            err.as_ref().map_err(|e| e.downcast_ref::<CliError>()),
            Err(Some(CliError::DeviceNotFound(_)))
        ));
    }

    #[test]
    fn test_detect_with_two_models_is_ambiguous() {
        let mut port = MockPort::new();
        port.add_device(MockTransport::with_info(pcsensor()));
        port.add_device(MockTransport::with_info(scythe2()));
        let tables = DeviceTables::new(&Config::default());
        let err = detect_model(&port, &tables);
        assert!(matches!(
            err.as_ref().map_err(|e| e.downcast_ref::<CliError>()),
            Err(Some(CliError::ValidationError(msg))) if msg.contains("pcsensor, scythe2")
        ));
    }

    #[test]
    fn test_open_missing_model_is_not_found() {
        let mut port = MockPort::new();
        port.add_device(MockTransport::with_info(scythe2()));
        let tables = DeviceTables::new(&Config::default());
        let err = open_model(&port, &tables, Model::Pcsensor);
        assert!(matches!(
            err.as_ref().map_err(|e| e.downcast_ref::<CliError>()),
            Err(Some(CliError::DeviceNotFound(msg))) if msg.contains("0c45:7403")
        ));
    }
}
