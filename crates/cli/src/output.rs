//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::json;

use crate::commands::list::ListedDevice;
use crate::commands::read::ReadReport;
use crate::devices::Model;

fn print_json(value: &impl Serialize, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format {what} as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "causes": chain,
        }
    });
    print_json(&error_json, "error");
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

pub fn print_device_list(devices: &[ListedDevice], json: bool, all: bool) {
    if json {
        print_json(
            &json!({
                "success": true,
                "devices": devices
            }),
            "device list",
        );
        return;
    }

    if devices.is_empty() {
        let message = if all {
            "No HID devices found"
        } else {
            "No supported foot switches found"
        };
        println!("{}", message.yellow());
        return;
    }

    let title = if all { "HID Devices:" } else { "Foot Switches:" };
    println!("{}", title.bold());
    for device in devices {
        print_device_human(device);
    }
}

fn print_device_human(device: &ListedDevice) {
    let marker = match device.model {
        Some(_) => "●".green(),
        None => "○".dimmed(),
    };
    let model = device.model.map_or("-", Model::name);
    let name = device
        .product
        .as_deref()
        .or(device.manufacturer.as_deref())
        .unwrap_or("unknown device");
    println!(
        "  {} {:04x}:{:04x} {} ({})",
        marker,
        device.vendor_id,
        device.product_id,
        name.bold(),
        model.cyan()
    );
    println!("    Path: {}", device.path.dimmed());
    if let Some(interface) = device.interface {
        println!("    Interface: {interface}");
    }
    if let Some(serial) = &device.serial {
        println!("    Serial: {serial}");
    }
}

pub fn print_read_report(report: &ReadReport, json: bool) {
    if json {
        print_json(
            &json!({
                "success": true,
                "report": report
            }),
            "pedal report",
        );
        return;
    }

    for line in &report.pedals {
        println!("{}", line.line);
    }
    if let Some(id) = report.device_id {
        println!("Device ID: {id}");
    }
    if let Some(raw) = &report.unknown_response {
        eprintln!("{}", "Unknown response:".yellow());
        eprintln!("{raw}");
    }
}

pub fn print_write_done(model: Model, truncated: bool, json: bool) {
    if json {
        print_json(
            &json!({
                "success": true,
                "model": model,
                "truncated": truncated,
                "replug_required": model.needs_replug(),
            }),
            "write result",
        );
        return;
    }

    if truncated {
        eprintln!("{} input string is truncated", "Warning:".yellow().bold());
    }
    if model.needs_replug() {
        println!(
            "{} Unplug the footswitch and then plug it back again.",
            "Done.".green()
        );
    } else {
        println!("{}", "success".green());
    }
}
