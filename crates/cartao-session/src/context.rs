// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Explicit session lifecycle over an identity provider.

use std::sync::Arc;

use cartao_bridge::IdentityProvider;
use cartao_core::error::{CartaoError, Result};
use cartao_core::{Identity, Uid};
use tracing::{info, instrument};

/// Who is editing, from `start` until `stop`.
///
/// Editors and coordinators are built from a started context instead of
/// observing the identity provider themselves.
pub struct SessionContext {
    provider: Arc<dyn IdentityProvider>,
    current: Option<Identity>,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            current: None,
        }
    }

    /// Resolve the signed-in user. Fails with `NotSignedIn` when there is none.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<&Identity> {
        let identity = self
            .provider
            .current_identity()
            .await?
            .ok_or(CartaoError::NotSignedIn)?;
        info!(uid = %identity.uid, "session started");
        Ok(self.current.insert(identity))
    }

    /// Sign out with the provider and forget the identity.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<()> {
        self.provider.sign_out().await?;
        if let Some(identity) = self.current.take() {
            info!(uid = %identity.uid, "session stopped");
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Uid of the active session.
    pub fn uid(&self) -> Result<&Uid> {
        self.current
            .as_ref()
            .map(|identity| &identity.uid)
            .ok_or(CartaoError::NotSignedIn)
    }
}
