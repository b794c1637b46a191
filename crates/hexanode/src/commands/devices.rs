//! Device command handlers.

use std::net::IpAddr;

use hexanode_core::{Device, Endpoint};
use tabled::Tabled;

use crate::cli::{DevicesArgs, DevicesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util::{self, Devices};

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Endpoints")]
    endpoints: usize,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            ip: d.ip.to_string(),
            name: d.name.clone(),
            endpoints: d.endpoints().len(),
        }
    }
}

#[derive(Tabled)]
struct EndpointRow {
    #[tabled(rename = "EID")]
    eid: u32,
    #[tabled(rename = "Function")]
    function: String,
    #[tabled(rename = "Type")]
    datatype: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl From<&Endpoint> for EndpointRow {
    fn from(ep: &Endpoint) -> Self {
        Self {
            eid: ep.eid,
            function: ep.function.to_string(),
            datatype: ep.datatype.map(|t| t.to_string()).unwrap_or_default(),
            description: ep.description.clone().unwrap_or_default(),
            unit: ep.unit.clone().unwrap_or_default(),
        }
    }
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("IP:         {}", d.ip),
        format!("Name:       {}", d.name),
        format!("Endpoints:  {}", d.endpoints().len()),
    ];
    if !d.endpoints().is_empty() {
        let rows: Vec<EndpointRow> = d.endpoints().iter().map(EndpointRow::from).collect();
        lines.push(output::render_table(&rows));
    }
    lines.join("\n")
}

fn parse_ip(raw: &str) -> Result<IpAddr, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "ip".into(),
        reason: format!("'{raw}' is not an IP address"),
    })
}

pub async fn handle(args: DevicesArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let tree = util::open_tree(ctx, Devices::Required)?;
            let devices: Vec<Device> = tree.read(|t| t.devices().cloned().collect()).await;
            let out = output::render_list(
                ctx.output,
                &devices,
                |d: &Device| DeviceRow::from(d),
                |d| d.ip.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        DevicesCommand::Show { ip } => {
            let addr = parse_ip(&ip)?;
            let tree = util::open_tree(ctx, Devices::Required)?;
            let device = tree
                .read(|t| t.device(&addr).cloned())
                .await
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "device".into(),
                    identifier: ip,
                    list_command: "devices list".into(),
                })?;
            let out = output::render_single(ctx.output, &device, detail, |d| d.ip.to_string())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hexanode_core::EndpointFunction;

    #[test]
    fn parse_ip_accepts_both_families() {
        assert!(parse_ip("10.0.0.1").unwrap().is_ipv4());
        assert!(parse_ip("fd00::1").unwrap().is_ipv6());
    }

    #[test]
    fn parse_ip_rejects_names() {
        let err = parse_ip("kitchen").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }

    #[test]
    fn detail_lists_endpoints() {
        let device = Device::with_endpoints(
            "fd00::1".parse().unwrap(),
            "plug",
            [Endpoint::new(2, EndpointFunction::Sensor).with_unit("W")],
        );
        let text = detail(&device);
        assert!(text.contains("Name:       plug"));
        assert!(text.contains("sensor"));
        assert!(text.contains('W'));
    }
}
