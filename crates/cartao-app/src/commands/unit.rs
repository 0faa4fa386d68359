// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pick the office unit shown as the card address.

use super::open_editor;
use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

pub async fn run(
    svc: &AppServices,
    identity: LocalIdentity,
    id: Option<String>,
    list: bool,
) -> anyhow::Result<()> {
    let editor = open_editor(svc, identity).await?;

    if list {
        let current = editor.selected_unit().map(|u| u.id);
        for unit in editor.units() {
            let marker = if current.as_deref() == Some(unit.id.as_str()) { '*' } else { ' ' };
            println!("{marker} {:<12} {}", unit.id, unit.address_line());
        }
        return Ok(());
    }

    let unit = editor.select_unit(id.as_deref());
    editor.save().await?;
    match (unit, id) {
        (Some(unit), _) => println!("Address set to {}", unit.address_line()),
        (None, Some(id)) => println!("Unknown unit '{id}'; address cleared"),
        (None, None) => println!("Address cleared"),
    }
    Ok(())
}
