// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print a card as visitors see it.

use cartao_session::PublicCard;

use super::load_card;
use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

pub async fn run(svc: &AppServices, identity: LocalIdentity, card: Option<String>) -> anyhow::Result<()> {
    let card = load_card(svc, identity, card).await?;
    print!("{}", render(&card));
    Ok(())
}

fn render(card: &PublicCard) -> String {
    let p = &card.profile;
    let mut out = String::new();

    let name = if p.name.is_empty() { "(no name)" } else { p.name.as_str() };
    out.push_str(&format!("{name}\n"));
    if !p.role.is_empty() {
        out.push_str(&format!("  {}\n", p.role));
    }
    match p.photo() {
        Some(url) => out.push_str(&format!("  Photo: {url} ({})\n", card.photo.to_css())),
        None => out.push_str(&format!("  Photo: initial '{}'\n", p.initial())),
    }
    out.push('\n');

    for link in card.links.actions.iter().chain(&card.links.links) {
        out.push_str(&format!("  {:<10} {}\n", format!("{:?}", link.kind), link.href));
    }

    let address: Vec<&str> = p.visible_address().collect();
    if !address.is_empty() {
        out.push_str("\nAddress:\n");
        for line in address {
            out.push_str(&format!("  {line}\n"));
        }
    }
    if !p.about.is_empty() {
        out.push_str(&format!("\nAbout:\n  {}\n", p.about));
    }

    out.push_str(&format!("\nShare: {}\n", card.share_url));
    out
}
