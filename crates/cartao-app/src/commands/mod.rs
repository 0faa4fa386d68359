// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CLI command implementations.

pub mod edit;
pub mod import;
pub mod pdf;
pub mod photo;
pub mod qr;
pub mod share;
pub mod show;
pub mod unit;
pub mod vcard;

use anyhow::{Context, bail};
use cartao_bridge::IdentityProvider;
use cartao_core::Uid;
use cartao_session::{ProfileEditor, PublicCard};

use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

/// Start a session and load the owner's card for editing.
pub(crate) async fn open_editor(
    svc: &AppServices,
    identity: LocalIdentity,
) -> anyhow::Result<ProfileEditor> {
    let session = svc
        .session(identity)
        .await
        .context("this command needs a signed-in user (pass --uid)")?;
    let editor = svc.editor(&session).await?;
    if !editor.is_loaded() {
        bail!("the stored card for {} could not be read; nothing was changed", editor.uid());
    }
    Ok(editor)
}

/// The stored card of `card`, or of the signed-in user when `card` is `None`.
pub(crate) async fn load_card(
    svc: &AppServices,
    identity: LocalIdentity,
    card: Option<String>,
) -> anyhow::Result<PublicCard> {
    let uid = match card {
        Some(uid) => Uid::new(uid),
        None => identity
            .current_identity()
            .await?
            .map(|id| id.uid)
            .context("name a card or pass --uid")?,
    };
    PublicCard::load(svc.store(), &uid, &svc.config().origin)
        .await?
        .with_context(|| format!("no card stored for {uid}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[tokio::test]
    async fn unreadable_card_stops_editing_commands() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let svc = AppServices::init(Some(tmp.path())).expect("init");
        let db = tmp.path().join("profiles.db");
        Connection::open(&db)
            .expect("open db")
            .execute(
                "INSERT INTO profiles (uid, document, updated_at) VALUES ('u1', '{broken', '')",
                [],
            )
            .expect("insert corrupt row");

        let identity = LocalIdentity::from_flags(Some("u1".into()), Some("Ana".into()), None);
        let err = edit::run(&svc, identity, edit::EditArgs {
            role: Some("Broker".into()),
            ..edit::EditArgs::default()
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("could not be read"), "{err}");

        let document: String = Connection::open(&db)
            .expect("reopen db")
            .query_row("SELECT document FROM profiles WHERE uid = 'u1'", [], |row| row.get(0))
            .expect("row");
        assert_eq!(document, "{broken");
    }
}
