// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The contact profile: one per uid, always written as a whole document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::normalize::{as_url, mailto_href, tel_href, whatsapp_href};
use crate::types::Identity;

/// Default photo zoom factor.
pub const DEFAULT_PHOTO_ZOOM: f64 = 1.0;

/// The canonical in-memory contact record.
///
/// Plain string fields use the empty string for "absent". Links
/// (`website`, `linkedin`, `instagram`) are kept exactly as typed; see
/// [`crate::normalize::as_url`] for the export-time form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub website: String,
    pub linkedin: String,
    pub instagram: String,
    /// Address lines in display order. Replaced wholesale, never edited in place.
    pub address: Vec<String>,
    pub about: String,
    /// Durable photo URL, empty when the profile has no photo.
    pub photo_url: String,
    pub photo_zoom: f64,
    /// Horizontal photo offset in screen pixels.
    pub photo_offset_x: f64,
    /// Vertical photo offset in screen pixels.
    pub photo_offset_y: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: String::new(),
            website: String::new(),
            linkedin: String::new(),
            instagram: String::new(),
            address: Vec::new(),
            about: String::new(),
            photo_url: String::new(),
            photo_zoom: DEFAULT_PHOTO_ZOOM,
            photo_offset_x: 0.0,
            photo_offset_y: 0.0,
        }
    }
}

impl Profile {
    /// A fresh profile for a user with no stored record, seeded with the
    /// name and e-mail the identity provider knows about.
    pub fn seeded(identity: Option<&Identity>) -> Self {
        let mut profile = Self::default();
        if let Some(identity) = identity {
            profile.name = identity.display_name.clone().unwrap_or_default();
            profile.email = identity.email.clone().unwrap_or_default();
        }
        profile
    }

    /// Build a profile from a stored document, coercing malformed fields.
    ///
    /// Never fails: wrong types fall back to defaults, a scalar address becomes
    /// a one-element list, and a missing `name`/`email` is taken from the
    /// identity provider.
    pub fn from_document(doc: &Value, fallback: Option<&Identity>) -> Self {
        let text = |key: &str| match doc.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        let number = |key: &str, default: f64| doc.get(key).and_then(Value::as_f64).unwrap_or(default);
        let text_or_identity = |key: &str, from_identity: Option<&String>| match doc.get(key) {
            None | Some(Value::Null) => from_identity.cloned().unwrap_or_default(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => String::new(),
        };

        let address = match doc.get("address") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => {
                debug!("coercing scalar address into a one-element list");
                vec![s.clone()]
            }
            _ => Vec::new(),
        };

        Self {
            name: text_or_identity("name", fallback.and_then(|i| i.display_name.as_ref())),
            email: text_or_identity("email", fallback.and_then(|i| i.email.as_ref())),
            phone: text("phone"),
            role: text("role"),
            website: text("website"),
            linkedin: text("linkedin"),
            instagram: text("instagram"),
            address,
            about: text("about"),
            photo_url: text("photoUrl"),
            photo_zoom: number("photoZoom", DEFAULT_PHOTO_ZOOM),
            photo_offset_x: number("photoOffsetX", 0.0),
            photo_offset_y: number("photoOffsetY", 0.0),
        }
    }

    /// The full document written to the store on save.
    pub fn to_document(&self) -> Value {
        // A struct of strings, numbers and a string list always serializes.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Durable photo URL, if any.
    pub fn photo(&self) -> Option<&str> {
        (!self.photo_url.is_empty()).then_some(self.photo_url.as_str())
    }

    /// Address lines that are shown and exported (empty entries dropped).
    pub fn visible_address(&self) -> impl Iterator<Item = &str> {
        self.address.iter().map(String::as_str).filter(|line| !line.is_empty())
    }

    /// Clear the photo and reset its framing to defaults.
    pub fn clear_photo(&mut self) {
        self.photo_url.clear();
        self.photo_zoom = DEFAULT_PHOTO_ZOOM;
        self.photo_offset_x = 0.0;
        self.photo_offset_y = 0.0;
    }

    /// Initial shown in place of a missing photo.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }
}

/// Kind of action or link shown on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Call,
    WhatsApp,
    Email,
    Website,
    LinkedIn,
    Instagram,
}

/// A clickable target derived from a profile field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLink {
    pub kind: LinkKind,
    pub href: String,
}

/// Every clickable target of a card, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardLinks {
    /// Quick actions: call, WhatsApp, e-mail.
    pub actions: Vec<CardLink>,
    /// External links: website, LinkedIn, Instagram.
    pub links: Vec<CardLink>,
}

impl CardLinks {
    pub fn from_profile(profile: &Profile) -> Self {
        let mut actions = Vec::new();
        if !profile.phone.is_empty() {
            actions.push(CardLink {
                kind: LinkKind::Call,
                href: tel_href(&profile.phone),
            });
            actions.push(CardLink {
                kind: LinkKind::WhatsApp,
                href: whatsapp_href(&profile.phone),
            });
        }
        if !profile.email.is_empty() {
            actions.push(CardLink {
                kind: LinkKind::Email,
                href: mailto_href(&profile.email),
            });
        }

        let links = [
            (LinkKind::Website, &profile.website),
            (LinkKind::LinkedIn, &profile.linkedin),
            (LinkKind::Instagram, &profile.instagram),
        ]
        .into_iter()
        .filter(|(_, raw)| !raw.is_empty())
        .map(|(kind, raw)| CardLink {
            kind,
            href: as_url(raw),
        })
        .collect();

        Self { actions, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ana() -> Identity {
        Identity::new("u1")
            .with_display_name("Ana Silva")
            .with_email("ana@x.com")
    }

    #[test]
    fn default_profile_has_unit_zoom_and_no_offsets() {
        let p = Profile::default();
        assert_eq!(p.photo_zoom, 1.0);
        assert_eq!(p.photo_offset_x, 0.0);
        assert_eq!(p.photo_offset_y, 0.0);
        assert!(p.address.is_empty());
        assert!(p.photo().is_none());
    }

    #[test]
    fn seeded_profile_takes_name_and_email_from_identity() {
        let p = Profile::seeded(Some(&ana()));
        assert_eq!(p.name, "Ana Silva");
        assert_eq!(p.email, "ana@x.com");
        assert!(p.phone.is_empty());

        let anonymous = Profile::seeded(None);
        assert_eq!(anonymous, Profile::default());
    }

    #[test]
    fn scalar_address_is_wrapped_into_list() {
        let p = Profile::from_document(&json!({ "address": "Rua A, 10" }), None);
        assert_eq!(p.address, vec!["Rua A, 10".to_string()]);

        let empty = Profile::from_document(&json!({ "address": "" }), None);
        assert!(empty.address.is_empty());

        let wrong = Profile::from_document(&json!({ "address": 42 }), None);
        assert!(wrong.address.is_empty());
    }

    #[test]
    fn address_list_keeps_order_and_skips_non_strings() {
        let p = Profile::from_document(&json!({ "address": ["B", 1, "A", ""] }), None);
        assert_eq!(p.address, vec!["B", "A", ""]);
        assert_eq!(p.visible_address().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn missing_name_and_email_fall_back_to_identity() {
        let p = Profile::from_document(&json!({ "phone": "1" }), Some(&ana()));
        assert_eq!(p.name, "Ana Silva");
        assert_eq!(p.email, "ana@x.com");

        let stored_empty = Profile::from_document(&json!({ "name": "", "email": null }), Some(&ana()));
        assert_eq!(stored_empty.name, "");
        assert_eq!(stored_empty.email, "ana@x.com");
    }

    #[test]
    fn non_numeric_photo_fields_use_defaults() {
        let p = Profile::from_document(
            &json!({ "photoZoom": "big", "photoOffsetX": null, "photoOffsetY": 12 }),
            None,
        );
        assert_eq!(p.photo_zoom, 1.0);
        assert_eq!(p.photo_offset_x, 0.0);
        assert_eq!(p.photo_offset_y, 12.0);
    }

    #[test]
    fn out_of_range_values_are_kept_as_stored() {
        let p = Profile::from_document(&json!({ "photoZoom": 7.5, "photoOffsetX": -300 }), None);
        assert_eq!(p.photo_zoom, 7.5);
        assert_eq!(p.photo_offset_x, -300.0);
    }

    #[test]
    fn document_round_trips_with_camel_case_keys() {
        let mut p = Profile::seeded(Some(&ana()));
        p.photo_url = "https://cdn/x.jpg".into();
        p.photo_offset_x = 4.0;
        let doc = p.to_document();
        assert_eq!(doc["photoUrl"], "https://cdn/x.jpg");
        assert_eq!(doc["photoOffsetX"], 4.0);
        assert_eq!(Profile::from_document(&doc, None), p);
    }

    #[test]
    fn clear_photo_resets_framing() {
        let mut p = Profile {
            photo_url: "https://cdn/x.jpg".into(),
            photo_zoom: 2.0,
            photo_offset_x: 10.0,
            photo_offset_y: -10.0,
            ..Profile::default()
        };
        p.clear_photo();
        assert!(p.photo().is_none());
        assert_eq!(p.photo_zoom, 1.0);
        assert_eq!((p.photo_offset_x, p.photo_offset_y), (0.0, 0.0));
    }

    #[test]
    fn initial_falls_back_to_question_mark() {
        assert_eq!(Profile::default().initial(), '?');
        let p = Profile {
            name: "ana".into(),
            ..Profile::default()
        };
        assert_eq!(p.initial(), 'A');
    }

    #[test]
    fn card_links_skip_empty_fields() {
        let p = Profile {
            phone: "(11) 99999-0000".into(),
            website: "site.com".into(),
            instagram: "https://instagram.com/ana".into(),
            ..Profile::default()
        };
        let links = CardLinks::from_profile(&p);
        let actions: Vec<_> = links.actions.iter().map(|l| l.kind).collect();
        assert_eq!(actions, vec![LinkKind::Call, LinkKind::WhatsApp]);
        assert_eq!(links.actions[0].href, "tel:11999990000");
        assert_eq!(links.links.len(), 2);
        assert_eq!(links.links[0].href, "https://site.com");
        assert_eq!(links.links[1].href, "https://instagram.com/ana");
    }
}
