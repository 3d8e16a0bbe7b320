//! `footswitch write`

use anyhow::{Context, Result};
use tracing::info;

use crate::commands::{CommandContext, WriteArgs};
use crate::devices::open_model;
use crate::directives::{Directive, WritePlan};
use crate::output;

/// Validates the program before any device is opened, then sends it.
pub fn execute(args: &WriteArgs, directives: &[Directive], ctx: &CommandContext) -> Result<()> {
    // auto-detection needs hidapi, so reject hopeless options first
    if args.model.or(ctx.config.default_model).is_none() {
        WritePlan::check_any(directives)?;
    }
    let model = ctx.resolve_model(args.model)?;
    let plan = WritePlan::build(model, directives)?;
    let mut transport = open_model(ctx.port()?, &ctx.tables, model)?;
    let path = transport.info().path.clone();
    info!(%model, %path, "programming foot switch");
    plan.send(transport.as_mut())
        .with_context(|| format!("writing {model} foot switch at {path}"))?;
    output::print_write_done(plan.model(), plan.truncated(), ctx.json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::devices::Model;
    use crate::error::CliError;
    use footswitch_hid_common::HidDeviceInfo;
    use footswitch_hid_common::hid_traits::mock::{MockPort, MockTransport, Transfer};

    fn args(model: Option<Model>) -> WriteArgs {
        WriteArgs {
            model,
            pedal: Vec::new(),
            key: Vec::new(),
            key_once: Vec::new(),
            modifier: Vec::new(),
            button: Vec::new(),
            string: Vec::new(),
            raw: Vec::new(),
            mouse_x: Vec::new(),
            mouse_y: Vec::new(),
            wheel: Vec::new(),
        }
    }

    #[test]
    fn test_write_scythe2_over_feature_reports() -> Result<()> {
        let device = MockTransport::new(0x055a, 0x0998, "/dev/hidraw4");
        let mut port = MockPort::new();
        port.add_device(device.clone());
        let ctx = CommandContext::new(true, Config::default()).with_port(Box::new(port));

        let directives = [Directive::Pedal(2), Directive::KeyOnce("a".into())];
        execute(&args(None), &directives, &ctx)?;

        let features = device.features();
        assert!(!features.is_empty());
        assert!(features.iter().all(|report| report.len() == 0x48));
        assert!(device.history().iter().all(|t| !matches!(t, Transfer::Output(_))));
        Ok(())
    }

    #[test]
    fn test_invalid_program_never_opens_device() {
        let device = MockTransport::with_info(
            HidDeviceInfo::new(0x0c45, 0x7403, "/dev/hidraw1".into()).with_interface(1),
        );
        let mut port = MockPort::new();
        port.add_device(device.clone());
        let ctx = CommandContext::new(true, Config::default()).with_port(Box::new(port));

        let directives = [Directive::Pedal(1), Directive::MouseX(300)];
        let err = execute(&args(Some(Model::Pcsensor)), &directives, &ctx);
        assert!(matches!(
            err.as_ref().map_err(|e| e.downcast_ref::<CliError>()),
            Err(Some(CliError::ValidationError(_)))
        ));
        assert!(device.history().is_empty());
    }

    #[test]
    fn test_bad_pedal_fails_validation_before_detection() {
        let device = MockTransport::new(0x055a, 0x0998, "/dev/hidraw4");
        let mut port = MockPort::new();
        port.add_device(device.clone());
        let ctx = CommandContext::new(true, Config::default()).with_port(Box::new(port));

        let directives = [Directive::Pedal(9), Directive::Key("a".into())];
        let err = execute(&args(None), &directives, &ctx);
        assert!(matches!(
            err.as_ref().map_err(|e| e.downcast_ref::<CliError>()),
            Err(Some(CliError::ValidationError(_)))
        ));
        assert!(device.history().is_empty());
    }

    #[test]
    fn test_write_without_device_is_not_found() {
        let ctx = CommandContext::new(true, Config::default()).with_port(Box::new(MockPort::new()));
        let directives = [Directive::Key("a".into())];
        let err = execute(&args(Some(Model::Footswitch1p)), &directives, &ctx);
        assert!(matches!(
            err.as_ref().map_err(|e| e.downcast_ref::<CliError>()),
            Err(Some(CliError::DeviceNotFound(_)))
        ));
    }
}
