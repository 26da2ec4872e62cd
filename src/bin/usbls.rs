use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use serde::Serialize;

use usbid::{classify, describe, UsbIdTable};

/// List USB devices with human-readable identification strings.
#[derive(Parser)]
#[command(name = "usbls", version)]
struct Args {
    /// Load a replacement usb.ids database from this file before listing
    #[arg(long, value_name = "FILE")]
    ids: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also print device class and per-interface class information
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct DeviceReport {
    bus: u8,
    address: u8,
    vendor_id: u16,
    product_id: u16,
    description: String,
    class: String,
    interfaces: Vec<String>,
}

fn main() -> Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info,usbls=debug,rusb=warn");
    }

    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .filter_module("rusb", LevelFilter::Warn)
        .init();

    let args = Args::parse();

    if let Some(path) = &args.ids {
        let table = UsbIdTable::from_file(path)
            .with_context(|| format!("loading usb id database from {}", path.display()))?;
        usbid::install(table);
    }

    let devices = rusb::devices().context(
        "enumerating USB devices failed; on Linux, check permissions or udev rules",
    )?;
    info!("found {} devices", devices.iter().count());

    let mut reports = Vec::new();

    for device in devices.iter() {
        let desc = match device.device_descriptor() {
            Ok(desc) => desc,
            Err(e) => {
                warn!(
                    "skipping device on bus {:03} address {:03}: {}",
                    device.bus_number(),
                    device.address(),
                    e
                );
                continue;
            }
        };

        // Interface class strings come from the active configuration;
        // unconfigured or suspended devices simply have none
        let mut interfaces = Vec::new();
        if args.verbose || args.json {
            if let Ok(config) = device.active_config_descriptor() {
                for interface in config.interfaces() {
                    for if_desc in interface.descriptors() {
                        interfaces
                            .push(format!("{}: {}", if_desc.interface_number(), classify(&if_desc)));
                    }
                }
            }
        }

        if args.json {
            reports.push(DeviceReport {
                bus: device.bus_number(),
                address: device.address(),
                vendor_id: desc.vendor_id(),
                product_id: desc.product_id(),
                description: describe(&desc),
                class: classify(&desc),
                interfaces,
            });
        } else {
            println!(
                "Bus {:03} Device {:03}: ID {:04x}:{:04x} {}",
                device.bus_number(),
                device.address(),
                desc.vendor_id(),
                desc.product_id(),
                describe(&desc)
            );
            if args.verbose {
                println!("  Class: {}", classify(&desc));
                for line in &interfaces {
                    println!("  Interface {}", line);
                }
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
