//! `footswitch list`

use anyhow::{Context, Result};
use footswitch_hid_common::HidPort;
use serde::Serialize;

use crate::commands::{CommandContext, ListArgs};
use crate::devices::{DeviceTables, Model};
use crate::output;

/// One enumerated HID interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedDevice {
    pub model: Option<Model>,
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: Option<i32>,
    pub path: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial: Option<String>,
}

pub fn execute(args: &ListArgs, ctx: &CommandContext) -> Result<()> {
    let devices = collect(ctx.port()?, &ctx.tables, args.all)?;
    output::print_device_list(&devices, ctx.json, args.all);
    Ok(())
}

pub fn collect(port: &dyn HidPort, tables: &DeviceTables, all: bool) -> Result<Vec<ListedDevice>> {
    let devices = port.list_devices().context("enumerating HID devices")?;
    Ok(devices
        .into_iter()
        .map(|info| ListedDevice {
            model: tables.model_of(&info),
            vendor_id: info.vendor_id,
            product_id: info.product_id,
            interface: info.interface_number,
            path: info.path,
            manufacturer: info.manufacturer,
            product: info.product_name,
            serial: info.serial_number,
        })
        .filter(|device| all || device.model.is_some())
        .collect())
}
