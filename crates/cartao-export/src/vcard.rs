// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// vCard 3.0 encoder for a single profile.
//
// Field values are written verbatim: `;`, `,` and `\` are NOT escaped, so a
// strict vCard parser may split a value that contains them. Consumers that
// need strict compliance must escape before calling this encoder.

use cartao_core::Profile;
use cartao_core::normalize::as_url;
use tracing::debug;

/// MIME type of the downloadable file.
pub const VCARD_MIME: &str = "text/vcard";

/// Serializes profiles to vCard text.
///
/// Output is deterministic: the same profile always yields byte-identical
/// text, lines joined with `\n`.
pub struct VCardEncoder;

impl VCardEncoder {
    /// Encode `profile` as a vCard 3.0 blob.
    ///
    /// `N` and `FN` are always present (possibly empty). Every other property
    /// is emitted only when its field is non-empty.
    pub fn encode(profile: &Profile) -> String {
        let mut lines: Vec<String> = vec![
            "BEGIN:VCARD".into(),
            "VERSION:3.0".into(),
            format!("N:{};;;;", profile.name),
            format!("FN:{}", profile.name),
        ];

        if !profile.role.is_empty() {
            lines.push(format!("TITLE:{}", profile.role));
        }
        if !profile.phone.is_empty() {
            lines.push(format!("TEL;TYPE=CELL:{}", profile.phone));
        }
        if !profile.email.is_empty() {
            lines.push(format!("EMAIL;TYPE=INTERNET:{}", profile.email));
        }
        lines.extend(
            profile
                .visible_address()
                .map(|line| format!("ADR;TYPE=WORK:;;{line}")),
        );
        if !profile.website.is_empty() {
            lines.push(format!("URL:{}", as_url(&profile.website)));
        }

        lines.push("END:VCARD".into());
        debug!(lines = lines.len(), "vCard encoded");
        lines.join("\n")
    }
}

/// A vCard ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VCardFile {
    pub filename: String,
    pub mime: &'static str,
    pub body: String,
}

impl VCardFile {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            filename: vcard_filename(&profile.name),
            mime: VCARD_MIME,
            body: VCardEncoder::encode(profile),
        }
    }
}

/// Download file name for a contact.
///
/// Whitespace runs become `_`, as do path separators, characters Windows
/// refuses in file names, control characters and leading dots. The result is
/// always a single path component; blank names become `contact`.
pub fn vcard_filename(name: &str) -> String {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    let mut leading = true;
    let stem: String = joined
        .chars()
        .map(|c| {
            let bad = matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
                || c.is_control()
                || (leading && c == '.');
            leading &= c == '.';
            if bad { '_' } else { c }
        })
        .collect();
    if stem.is_empty() {
        "contact.vcf".into()
    } else {
        format!("{stem}.vcf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full_profile() -> Profile {
        Profile {
            name: "Ana Silva".into(),
            phone: "11999990000".into(),
            email: "ana@x.com".into(),
            address: vec!["Rua A, 10".into()],
            website: "site.com".into(),
            ..Profile::default()
        }
    }

    #[test]
    fn full_profile_lines_in_order() {
        let vcard = VCardEncoder::encode(&full_profile());
        let lines: Vec<&str> = vcard.split('\n').collect();
        assert_eq!(
            lines,
            vec![
                "BEGIN:VCARD",
                "VERSION:3.0",
                "N:Ana Silva;;;;",
                "FN:Ana Silva",
                "TEL;TYPE=CELL:11999990000",
                "EMAIL;TYPE=INTERNET:ana@x.com",
                "ADR;TYPE=WORK:;;Rua A, 10",
                "URL:https://site.com",
                "END:VCARD",
            ]
        );
    }

    #[test]
    fn empty_profile_keeps_structural_fields() {
        let vcard = VCardEncoder::encode(&Profile::default());
        assert_eq!(vcard, "BEGIN:VCARD\nVERSION:3.0\nN:;;;;\nFN:\nEND:VCARD");
    }

    #[test]
    fn encoding_is_deterministic() {
        let profile = full_profile();
        assert_eq!(VCardEncoder::encode(&profile), VCardEncoder::encode(&profile));
    }

    #[test]
    fn title_follows_fn_when_role_present() {
        let profile = Profile {
            role: "Broker".into(),
            ..full_profile()
        };
        let vcard = VCardEncoder::encode(&profile);
        let lines: Vec<&str> = vcard.lines().collect();
        assert_eq!(lines[4], "TITLE:Broker");
        assert_eq!(lines[5], "TEL;TYPE=CELL:11999990000");
    }

    #[test]
    fn one_adr_line_per_non_empty_address_in_order() {
        let profile = Profile {
            address: vec!["First".into(), String::new(), "Second".into(), String::new()],
            ..Profile::default()
        };
        let vcard = VCardEncoder::encode(&profile);
        let adr: Vec<&str> = vcard
            .lines()
            .filter(|l| l.starts_with("ADR;TYPE=WORK:"))
            .collect();
        assert_eq!(adr, vec!["ADR;TYPE=WORK:;;First", "ADR;TYPE=WORK:;;Second"]);
    }

    #[test]
    fn phone_is_passed_through_unmodified() {
        let profile = Profile {
            phone: "(11) 99999-0000".into(),
            ..Profile::default()
        };
        assert!(VCardEncoder::encode(&profile).contains("TEL;TYPE=CELL:(11) 99999-0000"));
    }

    #[test]
    fn schemed_website_is_not_prefixed_again() {
        let profile = Profile {
            website: "http://x.com".into(),
            ..Profile::default()
        };
        assert!(VCardEncoder::encode(&profile).contains("\nURL:http://x.com\n"));
    }

    #[test]
    fn linkedin_and_instagram_are_not_exported() {
        let profile = Profile {
            linkedin: "linkedin.com/in/ana".into(),
            instagram: "instagram.com/ana".into(),
            about: "hello".into(),
            ..Profile::default()
        };
        assert_eq!(VCardEncoder::encode(&profile), VCardEncoder::encode(&Profile::default()));
    }

    #[test]
    fn special_characters_are_written_verbatim() {
        let profile = Profile {
            name: "Silva; Ana, Jr\\".into(),
            ..Profile::default()
        };
        assert!(VCardEncoder::encode(&profile).contains("\nFN:Silva; Ana, Jr\\\n"));
    }

    #[test]
    fn filename_replaces_whitespace() {
        assert_eq!(vcard_filename("Ana  Maria Silva"), "Ana_Maria_Silva.vcf");
        assert_eq!(vcard_filename("   "), "contact.vcf");
        assert_eq!(vcard_filename(""), "contact.vcf");
    }

    #[test]
    fn filename_never_leaves_the_directory() {
        assert_eq!(vcard_filename("../x"), "___x.vcf");
        assert_eq!(vcard_filename("a/b"), "a_b.vcf");
        assert_eq!(vcard_filename("..\\..\\win"), "___.._win.vcf");
        assert_eq!(vcard_filename(".hidden"), "_hidden.vcf");
        assert_eq!(vcard_filename("Dr. Ana"), "Dr._Ana.vcf");

        let hostile = vcard_filename("../../home/victim/.bashrc #");
        assert!(!hostile.contains('/'));
        assert!(!hostile.starts_with('.'));
        assert_eq!(
            std::path::Path::new(&hostile).components().count(),
            1,
            "{hostile}"
        );
    }

    proptest! {
        #[test]
        fn filename_is_one_plain_component(name in ".{0,40}") {
            let file = vcard_filename(&name);
            prop_assert!(file.ends_with(".vcf"));
            prop_assert!(!file.starts_with('.'));
            prop_assert!(!file.contains(['/', '\\']));
            prop_assert!(!file.chars().any(char::is_control));
        }

        #[test]
        fn structure_holds_for_any_profile(
            name in "[A-Za-z ,.;]{0,24}",
            role in "[A-Za-z ]{0,12}",
            phone in "[0-9 ()+-]{0,16}",
            email in "[a-z@.]{0,16}",
            website in "[a-z.:/]{0,16}",
            address in prop::collection::vec("[A-Za-z0-9 ,]{0,12}", 0..5),
        ) {
            let profile = Profile {
                name,
                role,
                phone,
                email,
                website,
                address,
                ..Profile::default()
            };
            let vcard = VCardEncoder::encode(&profile);
            prop_assert_eq!(&vcard, &VCardEncoder::encode(&profile));
            prop_assert!(!vcard.contains('\r'));

            let lines: Vec<&str> = vcard.split('\n').collect();
            prop_assert_eq!(&lines[..2], &["BEGIN:VCARD", "VERSION:3.0"]);
            prop_assert_eq!(lines[lines.len() - 1], "END:VCARD");
            prop_assert_eq!(lines[2].to_string(), format!("N:{};;;;", profile.name));
            prop_assert_eq!(lines[3].to_string(), format!("FN:{}", profile.name));

            // Optional properties appear only for non-empty fields, in a fixed order.
            let order = ["TITLE:", "TEL;", "EMAIL;", "ADR;", "URL:"];
            let rank = |line: &str| order.iter().position(|p| line.starts_with(p));
            let body = &lines[4..lines.len() - 1];
            let ranks: Vec<usize> = body.iter().filter_map(|l| rank(*l)).collect();
            prop_assert_eq!(ranks.len(), body.len());
            prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));

            let has = |prefix: &str| body.iter().any(|l| l.starts_with(prefix));
            prop_assert_eq!(has("TITLE:"), !profile.role.is_empty());
            prop_assert_eq!(has("TEL;"), !profile.phone.is_empty());
            prop_assert_eq!(has("EMAIL;"), !profile.email.is_empty());
            prop_assert_eq!(has("URL:"), !profile.website.is_empty());

            let adr: Vec<&str> = body
                .iter()
                .filter_map(|l| l.strip_prefix("ADR;TYPE=WORK:;;"))
                .collect();
            let expected: Vec<&str> = profile.visible_address().collect();
            prop_assert_eq!(adr, expected);
        }
    }

    #[test]
    fn vcard_file_carries_mime_type() {
        let file = VCardFile::from_profile(&full_profile());
        assert_eq!(file.mime, "text/vcard");
        assert_eq!(file.filename, "Ana_Silva.vcf");
        assert!(file.body.starts_with("BEGIN:VCARD\nVERSION:3.0\n"));
        assert!(file.body.ends_with("END:VCARD"));
    }
}
