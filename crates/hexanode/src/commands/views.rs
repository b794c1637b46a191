//! View command handlers.

use std::collections::HashSet;
use std::net::IpAddr;

use hexanode_core::{DeviceSelection, DeviceTree, View, ViewEditor};
use serde_json::Value;
use tabled::Tabled;

use crate::cli::{OutputFormat, ViewsArgs, ViewsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util::{self, Devices};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ViewRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Endpoints")]
    endpoints: usize,
}

impl From<&View> for ViewRow {
    fn from(v: &View) -> Self {
        Self {
            id: v.id.to_string(),
            name: v.name.clone(),
            endpoints: v.devices.references().len(),
        }
    }
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "EID")]
    eid: u32,
    #[tabled(rename = "Function")]
    function: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Selected")]
    selected: &'static str,
}

fn candidate_rows(editor: &ViewEditor) -> Vec<CandidateRow> {
    let used: HashSet<(IpAddr, u32)> = editor.used_devices.references().into_iter().collect();
    editor
        .known_devices
        .values()
        .flat_map(|c| {
            c.endpoints.iter().map(|ep| CandidateRow {
                device: c.ip.to_string(),
                name: c.name.clone(),
                eid: ep.eid,
                function: ep.function.to_string(),
                description: ep.description.clone().unwrap_or_default(),
                unit: ep.unit.clone().unwrap_or_default(),
                selected: if used.contains(&(c.ip, ep.eid)) { "yes" } else { "" },
            })
        })
        .collect()
}

/// Selected references that no longer resolve to a known endpoint.
fn stale_references(tree: &DeviceTree, view: &View) -> Vec<String> {
    view.devices
        .references()
        .into_iter()
        .filter(|(ip, eid)| tree.device(ip).and_then(|d| d.endpoint(*eid)).is_none())
        .map(|(ip, eid)| format!("{ip}/{eid}"))
        .collect()
}

fn detail(view: &View, stale: &[String], color: bool) -> String {
    let selection = match view.devices.as_value() {
        Value::Object(map) if map.is_empty() => "(empty)".to_owned(),
        other => other.to_string(),
    };
    let mut lines = vec![
        format!("ID:       {}", view.id),
        format!("Name:     {}", view.name),
        format!("Devices:  {selection}"),
    ];
    if !stale.is_empty() {
        lines.push(output::warn_text(
            &format!("Stale:    {}", stale.join(", ")),
            color,
        ));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ViewsArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        ViewsCommand::List => {
            let tree = util::open_tree(ctx, Devices::Skip)?;
            let views: Vec<View> = tree.read(|t| t.views().cloned().collect()).await;
            let out = output::render_list(
                ctx.output,
                &views,
                |v: &View| ViewRow::from(v),
                |v| v.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ViewsCommand::Show { id } => {
            let tree = util::open_tree(ctx, Devices::IfConfigured)?;
            let (view, stale) = tree
                .read(|t| {
                    let view = t.get_view(&id)?.clone();
                    let stale = if t.device_count() == 0 {
                        Vec::new()
                    } else {
                        stale_references(t, &view)
                    };
                    Ok::<_, CliError>((view, stale))
                })
                .await?;
            let out = output::render_single(
                ctx.output,
                &view,
                |v| detail(v, &stale, ctx.color),
                |v| v.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ViewsCommand::New { name } => {
            let tree = util::open_tree(ctx, Devices::Skip)?;
            let name = name.unwrap_or_else(|| ctx.view_name.clone());
            let view = tree
                .write(|t| t.add_view(name, DeviceSelection::empty()).clone())
                .await;
            tree.save(&ctx.state_path).await?;

            let out = output::render_single(
                ctx.output,
                &view,
                |v| detail(v, &[], ctx.color),
                |v| v.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ViewsCommand::Edit {
            id,
            name,
            devices,
            devices_from_file,
        } => {
            let selection = util::read_selection(devices.as_deref(), devices_from_file.as_deref())?;
            if name.is_none() && selection.is_none() {
                return Err(CliError::Validation {
                    field: "edit".into(),
                    reason: "nothing to change; pass --name and/or --devices".into(),
                });
            }

            let tree = util::open_tree(ctx, Devices::Skip)?;
            let view = tree
                .write(|t| {
                    let current = t.get_view(&id)?;
                    let name = name.unwrap_or_else(|| current.name.clone());
                    let selection = selection.unwrap_or_else(|| current.devices.clone());
                    Ok::<_, CliError>(t.update_view(&id, name, selection)?.clone())
                })
                .await?;
            tree.save(&ctx.state_path).await?;

            let out = output::render_single(
                ctx.output,
                &view,
                |v| detail(v, &[], ctx.color),
                |v| v.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ViewsCommand::Rm { id } => {
            let tree = util::open_tree(ctx, Devices::Skip)?;
            let name = tree
                .read(|t| t.get_view(&id).map(|v| v.name.clone()))
                .await?;
            if !util::confirm(&format!("Delete view '{name}' ({id})?"), ctx.yes, "views rm")? {
                return Ok(());
            }

            tree.write(|t| t.remove_view(&id)).await?;
            tree.save(&ctx.state_path).await?;
            if !ctx.quiet {
                eprintln!("Removed view {id}");
            }
            Ok(())
        }

        ViewsCommand::Candidates { id } => {
            let tree = util::open_tree(ctx, Devices::IfConfigured)?;
            let editor = tree.read(|t| t.edit_view(&id)).await?;
            let out = match ctx.output {
                OutputFormat::Table => output::render_table(&candidate_rows(&editor)),
                format => output::render_single(
                    format,
                    &editor,
                    |_| String::new(),
                    |e| {
                        candidate_rows(e)
                            .iter()
                            .map(|r| format!("{}/{}", r.device, r.eid))
                            .collect::<Vec<_>>()
                            .join("\n")
                    },
                )?,
            };
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}
