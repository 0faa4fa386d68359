// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Identity taken from command-line flags.

use std::sync::Mutex;

use async_trait::async_trait;
use cartao_bridge::IdentityProvider;
use cartao_core::Identity;
use cartao_core::error::Result;

/// The local user named by `--uid` (plus optional `--name`/`--email`).
/// Without `--uid` nobody is signed in.
pub struct LocalIdentity {
    current: Mutex<Option<Identity>>,
}

impl LocalIdentity {
    pub fn from_flags(uid: Option<String>, name: Option<String>, email: Option<String>) -> Self {
        let identity = uid.filter(|u| !u.trim().is_empty()).map(|uid| {
            let mut identity = Identity::new(uid.trim());
            identity.display_name = name;
            identity.email = email;
            identity
        });
        Self {
            current: Mutex::new(identity),
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        Ok(self.current.lock().expect("identity lock poisoned").clone())
    }

    async fn sign_out(&self) -> Result<()> {
        self.current.lock().expect("identity lock poisoned").take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flags_become_identity() {
        let provider = LocalIdentity::from_flags(
            Some(" u1 ".into()),
            Some("Ana Silva".into()),
            None,
        );
        let identity = provider.current_identity().await.expect("identity").expect("signed in");
        assert_eq!(identity.uid.as_str(), "u1");
        assert_eq!(identity.display_name.as_deref(), Some("Ana Silva"));
        assert_eq!(identity.email, None);
    }

    #[tokio::test]
    async fn blank_uid_is_signed_out() {
        let provider = LocalIdentity::from_flags(Some("  ".into()), None, None);
        assert!(provider.current_identity().await.expect("identity").is_none());
    }
}
