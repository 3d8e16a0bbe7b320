//! Command implementations for the footswitch CLI

pub mod list;
pub mod read;
pub mod write;

use anyhow::{Context, Result};
use clap::Args;
use footswitch_hid_common::{HidPort, HidapiPort};
use std::cell::OnceCell;

use crate::config::Config;
use crate::devices::{self, DeviceTables, Model};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List every HID device, not only supported foot switches
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Foot switch model (auto-detected when omitted)
    #[arg(long, value_enum)]
    pub model: Option<Model>,
}

/// Options are applied in command line order to the pedal selected last.
#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Foot switch model (auto-detected when omitted)
    #[arg(long, value_enum)]
    pub model: Option<Model>,

    /// Select the pedal the following options apply to
    #[arg(short = 'p', long = "pedal", value_name = "N")]
    pub pedal: Vec<u8>,

    /// Key to press (scythe2: repeats while held)
    #[arg(short = 'k', long = "key", value_name = "KEY")]
    pub key: Vec<String>,

    /// Key pressed once per push (scythe2), one more key of the combo (scythe)
    #[arg(short = 'a', long = "key-once", value_name = "KEY")]
    pub key_once: Vec<String>,

    /// Modifier: ctrl, shift, alt, win, r_ctrl, r_shift, r_alt, r_win
    #[arg(short = 'm', long = "modifier", value_name = "MOD")]
    pub modifier: Vec<String>,

    /// Mouse button: mouse_left, mouse_right, mouse_middle, mouse_double
    #[arg(short = 'b', long = "button", value_name = "BUTTON")]
    pub button: Vec<String>,

    /// Text typed when the pedal is pressed
    #[arg(short = 's', long = "string", value_name = "TEXT")]
    pub string: Vec<String>,

    /// Raw key codes typed when the pedal is pressed, as hex bytes
    #[arg(short = 'S', long = "raw", value_name = "HEX")]
    pub raw: Vec<String>,

    /// Horizontal mouse movement in [-128, 127]
    #[arg(short = 'x', long = "mouse-x", value_name = "X", allow_negative_numbers = true)]
    pub mouse_x: Vec<i32>,

    /// Vertical mouse movement in [-128, 127]
    #[arg(short = 'y', long = "mouse-y", value_name = "Y", allow_negative_numbers = true)]
    pub mouse_y: Vec<i32>,

    /// Mouse wheel movement in [-128, 127]
    #[arg(short = 'w', long = "wheel", value_name = "W", allow_negative_numbers = true)]
    pub wheel: Vec<i32>,
}

/// State shared by the device commands.
///
/// hidapi is only initialized when a command actually touches the bus.
pub struct CommandContext {
    pub json: bool,
    pub config: Config,
    pub tables: DeviceTables,
    port: OnceCell<Box<dyn HidPort>>,
}

impl CommandContext {
    pub fn new(json: bool, config: Config) -> Self {
        let tables = DeviceTables::new(&config);
        Self {
            json,
            config,
            tables,
            port: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub fn with_port(self, port: Box<dyn HidPort>) -> Self {
        Self {
            port: OnceCell::from(port),
            ..self
        }
    }

    pub fn port(&self) -> Result<&dyn HidPort> {
        let port = match self.port.get() {
            Some(port) => port,
            None => {
                let created = HidapiPort::new().context("initializing hidapi")?;
                self.port.get_or_init(|| Box::new(created))
            }
        };
        Ok(port.as_ref())
    }

    /// `--model`, then the configured default, then auto-detection.
    pub fn resolve_model(&self, requested: Option<Model>) -> Result<Model> {
        match requested.or(self.config.default_model) {
            Some(model) => Ok(model),
            None => devices::detect_model(self.port()?, &self.tables),
        }
    }
}
