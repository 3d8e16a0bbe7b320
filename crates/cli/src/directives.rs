//! Order-sensitive write options
//!
//! `write -p 1 -k a -p 2 -m ctrl -k c` programs two pedals: every option
//! applies to the pedal selected most recently. clap hands each option back as
//! its own list, so the command line order is rebuilt from argument indices.

use anyhow::Result;
use clap::ArgMatches;
use footswitch_hid_common::HidTransport;
use hid_footswitch1p_protocol::{Footswitch1pAction, Footswitch1pProgram};
use hid_pcsensor_protocol::{PcsensorProgram, ProgramPlan};
use hid_scythe_protocol::scythe::{ScythePlan, ScytheProgram};
use hid_scythe_protocol::scythe2::{Scythe2Plan, Scythe2Program};
use std::fmt::Display;
use tracing::debug;

use crate::commands::WriteArgs;
use crate::devices::Model;
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Pedal(u8),
    Key(String),
    KeyOnce(String),
    Modifier(String),
    Button(String),
    Text(String),
    Raw(String),
    MouseX(i32),
    MouseY(i32),
    Wheel(i32),
}

impl Directive {
    /// The command line flag that produced this directive.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Pedal(_) => "--pedal",
            Self::Key(_) => "--key",
            Self::KeyOnce(_) => "--key-once",
            Self::Modifier(_) => "--modifier",
            Self::Button(_) => "--button",
            Self::Text(_) => "--string",
            Self::Raw(_) => "--raw",
            Self::MouseX(_) => "-x",
            Self::MouseY(_) => "-y",
            Self::Wheel(_) => "-w",
        }
    }
}

fn gather<T: Clone>(
    matches: &ArgMatches,
    id: &str,
    values: &[T],
    wrap: fn(T) -> Directive,
    out: &mut Vec<(usize, Directive)>,
) {
    if let Some(indices) = matches.indices_of(id) {
        out.extend(indices.zip(values.iter().cloned().map(wrap)));
    }
}

/// Rebuilds the directives of a `write` invocation in command line order.
pub fn collect(args: &WriteArgs, matches: &ArgMatches) -> Vec<Directive> {
    let mut indexed = Vec::new();
    gather(matches, "pedal", &args.pedal, Directive::Pedal, &mut indexed);
    gather(matches, "key", &args.key, Directive::Key, &mut indexed);
    gather(matches, "key_once", &args.key_once, Directive::KeyOnce, &mut indexed);
    gather(matches, "modifier", &args.modifier, Directive::Modifier, &mut indexed);
    gather(matches, "button", &args.button, Directive::Button, &mut indexed);
    gather(matches, "string", &args.string, Directive::Text, &mut indexed);
    gather(matches, "raw", &args.raw, Directive::Raw, &mut indexed);
    gather(matches, "mouse_x", &args.mouse_x, Directive::MouseX, &mut indexed);
    gather(matches, "mouse_y", &args.mouse_y, Directive::MouseY, &mut indexed);
    gather(matches, "wheel", &args.wheel, Directive::Wheel, &mut indexed);
    indexed.sort_by_key(|(index, _)| *index);
    let directives: Vec<Directive> = indexed.into_iter().map(|(_, d)| d).collect();
    debug!(?directives, "write directives");
    directives
}

/// A validated program ready to be sent to one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WritePlan {
    /// `truncated` is set when a `--raw` value was cut to the device maximum.
    Pcsensor { plan: ProgramPlan, truncated: bool },
    Scythe(ScythePlan),
    Scythe2(Scythe2Plan),
    Footswitch1p(Footswitch1pAction),
}

fn invalid(err: impl Display) -> anyhow::Error {
    CliError::ValidationError(err.to_string()).into()
}

fn unsupported(directive: &Directive, model: Model) -> anyhow::Error {
    CliError::ValidationError(format!(
        "{} is not supported by {model} foot switches",
        directive.flag()
    ))
    .into()
}

impl WritePlan {
    pub fn build(model: Model, directives: &[Directive]) -> Result<Self> {
        ensure_not_empty(directives)?;
        match model {
            Model::Pcsensor => {
                build_pcsensor(directives).map(|(plan, truncated)| Self::Pcsensor { plan, truncated })
            }
            Model::Scythe => build_scythe(directives).map(Self::Scythe),
            Model::Scythe2 => build_scythe2(directives).map(Self::Scythe2),
            Model::Footswitch1p => build_footswitch1p(directives).map(Self::Footswitch1p),
        }
    }

    /// Rejects options that no model could store, without touching the bus.
    ///
    /// Used before auto-detection, when the target model is not known yet.
    pub fn check_any(directives: &[Directive]) -> Result<()> {
        ensure_not_empty(directives)?;
        let mut rejections = Vec::new();
        for model in Model::ALL {
            match Self::build(model, directives) {
                Ok(_) => return Ok(()),
                Err(err) => match err.downcast::<CliError>() {
                    Ok(CliError::ValidationError(reason)) => {
                        rejections.push(format!("{model}: {reason}"))
                    }
                    Ok(other) => return Err(other.into()),
                    Err(other) => return Err(other),
                },
            }
        }
        Err(CliError::ValidationError(format!(
            "no foot switch model accepts these options ({})",
            rejections.join("; ")
        ))
        .into())
    }

    pub fn model(&self) -> Model {
        match self {
            Self::Pcsensor { .. } => Model::Pcsensor,
            Self::Scythe(_) => Model::Scythe,
            Self::Scythe2(_) => Model::Scythe2,
            Self::Footswitch1p(_) => Model::Footswitch1p,
        }
    }

    pub fn send(&self, transport: &mut dyn HidTransport) -> Result<()> {
        match self {
            Self::Pcsensor { plan, .. } => hid_pcsensor_protocol::write_program(transport, plan)?,
            Self::Scythe(plan) => hid_scythe_protocol::scythe::write_program(transport, plan)?,
            Self::Scythe2(plan) => hid_scythe_protocol::scythe2::write_program(transport, plan)?,
            Self::Footswitch1p(action) => {
                hid_footswitch1p_protocol::write_action(transport, action)?
            }
        }
        Ok(())
    }

    /// Whether some input was cut to fit the device.
    pub fn truncated(&self) -> bool {
        matches!(self, Self::Pcsensor { truncated: true, .. })
    }
}

fn ensure_not_empty(directives: &[Directive]) -> Result<()> {
    if directives.is_empty() {
        return Err(CliError::ValidationError(
            "nothing to write, give at least one of -k, -m, -b, -s, -S, -x, -y, -w".into(),
        )
        .into());
    }
    Ok(())
}

fn build_pcsensor(directives: &[Directive]) -> Result<(ProgramPlan, bool)> {
    let mut program = PcsensorProgram::new();
    let mut truncated = false;
    for directive in directives {
        let applied = match directive {
            Directive::Pedal(n) => program.select_pedal(*n),
            Directive::Key(key) => program.set_key(key),
            Directive::Modifier(name) => program.add_modifier(name),
            Directive::Button(name) => program.set_button(name),
            Directive::Text(text) => program.set_text(text),
            Directive::Raw(hex) => program.set_raw(hex).map(|cut| truncated |= cut),
            Directive::MouseX(x) => program.set_mouse_x(*x),
            Directive::MouseY(y) => program.set_mouse_y(*y),
            Directive::Wheel(w) => program.set_wheel(*w),
            Directive::KeyOnce(_) => return Err(unsupported(directive, Model::Pcsensor)),
        };
        applied.map_err(invalid)?;
    }
    let plan = program.finish().map_err(invalid)?;
    Ok((plan, truncated))
}

fn build_scythe(directives: &[Directive]) -> Result<ScythePlan> {
    let mut program = ScytheProgram::new();
    for directive in directives {
        let applied = match directive {
            Directive::Pedal(n) => program.select_pedal(*n),
            // both append one more key to the pedal's combo
            Directive::Key(key) | Directive::KeyOnce(key) => program.add_key(key),
            Directive::Modifier(name) => program.add_modifier(name),
            Directive::Button(name) => program.set_button(name),
            _ => return Err(unsupported(directive, Model::Scythe)),
        };
        applied.map_err(invalid)?;
    }
    program.finish().map_err(invalid)
}

fn build_scythe2(directives: &[Directive]) -> Result<Scythe2Plan> {
    let mut program = Scythe2Program::new();
    for directive in directives {
        let applied = match directive {
            Directive::Pedal(n) => program.select_pedal(*n),
            Directive::Key(key) => program.set_key_repeat(key),
            Directive::KeyOnce(key) => program.set_key_once(key),
            Directive::Text(text) => program.set_text(text),
            Directive::Modifier(name) => program.add_modifier(name),
            Directive::Button(name) => program.set_button(name),
            _ => return Err(unsupported(directive, Model::Scythe2)),
        };
        applied.map_err(invalid)?;
    }
    program.finish().map_err(invalid)
}

fn build_footswitch1p(directives: &[Directive]) -> Result<Footswitch1pAction> {
    let mut program = Footswitch1pProgram::new();
    for directive in directives {
        let applied = match directive {
            Directive::Pedal(n) => program.select_pedal(*n),
            Directive::Key(key) => program.set_key(key),
            Directive::Modifier(name) => program.add_modifier(name),
            Directive::Button(name) => program.set_button(name),
            Directive::MouseX(x) => program.set_mouse_x(*x),
            Directive::MouseY(y) => program.set_mouse_y(*y),
            Directive::Wheel(w) => program.set_wheel(*w),
            _ => return Err(unsupported(directive, Model::Footswitch1p)),
        };
        applied.map_err(invalid)?;
    }
    program.finish().map_err(invalid)
}
