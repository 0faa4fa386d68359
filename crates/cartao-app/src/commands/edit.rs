// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field-by-field card edits.

use clap::Args;
use cartao_core::Profile;

use super::open_editor;
use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

/// Fields to change. Anything not given keeps its stored value; an empty
/// string clears the field.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    #[arg(long = "set-name")]
    pub name: Option<String>,
    #[arg(long = "set-email")]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub linkedin: Option<String>,
    #[arg(long)]
    pub instagram: Option<String>,
    #[arg(long)]
    pub about: Option<String>,
    /// Address line; repeat for several lines
    #[arg(long = "address")]
    pub address: Vec<String>,
    /// Remove every address line
    #[arg(long, conflicts_with = "address")]
    pub clear_address: bool,
}

impl EditArgs {
    pub fn apply(self, profile: &mut Profile) {
        let fields = [
            (self.name, &mut profile.name),
            (self.email, &mut profile.email),
            (self.phone, &mut profile.phone),
            (self.role, &mut profile.role),
            (self.website, &mut profile.website),
            (self.linkedin, &mut profile.linkedin),
            (self.instagram, &mut profile.instagram),
            (self.about, &mut profile.about),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if self.clear_address {
            profile.address.clear();
        } else if !self.address.is_empty() {
            profile.address = self.address;
        }
    }
}

pub async fn run(svc: &AppServices, identity: LocalIdentity, args: EditArgs) -> anyhow::Result<()> {
    let editor = open_editor(svc, identity).await?;
    editor.update(|profile| args.apply(profile));
    editor.save().await?;
    Ok(())
}
