//! `footswitch read`

use anyhow::{Context, Result};
use footswitch_hid_common::{HidTransport, hex_dump};
use hid_footswitch1p_protocol::DeviceResponse;
use hid_scythe_protocol::scythe2::Scythe2Reading;
use serde::Serialize;
use tracing::warn;

use crate::commands::{CommandContext, ReadArgs};
use crate::devices::{Model, open_model};
use crate::output;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PedalLine {
    pub pedal: u8,
    /// Record type, for models that store one per pedal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub action: String,
    /// The line printed in human output.
    #[serde(skip)]
    pub line: String,
}

impl PedalLine {
    fn switch(pedal: u8, action: String) -> Self {
        Self {
            pedal,
            kind: None,
            line: format!("[switch {pedal}]: {action}"),
            action,
        }
    }

    fn scythe2(reading: &Scythe2Reading) -> Self {
        Self {
            pedal: reading.pedal,
            kind: Some(reading.kind_label()),
            action: reading.strokes_text(),
            line: reading.to_string(),
        }
    }
}

/// What a device reported back, normalized across models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadReport {
    pub model: Model,
    pub pedals: Vec<PedalLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_response: Option<String>,
}

impl ReadReport {
    fn pedals(model: Model, pedals: impl IntoIterator<Item = PedalLine>) -> Self {
        Self {
            model,
            pedals: pedals.into_iter().collect(),
            device_id: None,
            unknown_response: None,
        }
    }
}

pub fn execute(args: &ReadArgs, ctx: &CommandContext) -> Result<()> {
    let model = ctx.resolve_model(args.model)?;
    let mut transport = open_model(ctx.port()?, &ctx.tables, model)?;
    let path = transport.info().path.clone();
    let report = read_model(transport.as_mut(), model)
        .with_context(|| format!("reading {model} foot switch at {path}"))?;
    output::print_read_report(&report, ctx.json);
    Ok(())
}

pub fn read_model(transport: &mut dyn HidTransport, model: Model) -> Result<ReadReport> {
    let report = match model {
        Model::Pcsensor => ReadReport::pedals(
            model,
            hid_pcsensor_protocol::read_pedals(transport)?
                .into_iter()
                .map(|r| PedalLine::switch(r.pedal, r.report.to_string())),
        ),
        Model::Scythe => ReadReport::pedals(
            model,
            hid_scythe_protocol::scythe::read_pedals(transport)?
                .into_iter()
                .map(|(pedal, reading)| PedalLine::switch(pedal, reading.to_string())),
        ),
        Model::Scythe2 => ReadReport::pedals(
            model,
            hid_scythe_protocol::scythe2::read_pedals(transport)?
                .iter()
                .map(PedalLine::scythe2),
        ),
        Model::Footswitch1p => {
            let mut report = ReadReport::pedals(model, []);
            match hid_footswitch1p_protocol::read_device_id(transport)? {
                DeviceResponse::DeviceId(id) => report.device_id = Some(id),
                DeviceResponse::Unknown(raw) => {
                    warn!(len = raw.len(), "device answered with an unknown report");
                    report.unknown_response = Some(hex_dump(&raw));
                }
            }
            report
        }
    };
    Ok(report)
}
