//! CSV import parsing.
//!
//! Rows are split on bare commas with no quoting support. Columns are mapped
//! by position: `site, <ignored>, username, password, note...`. Everything
//! after the password column is rejoined with commas to form the note.

use crate::error::{Result, VaultError};
use crate::models::{CredentialRecord, CredentialStore};

const MIN_COLUMNS: usize = 4;

/// Parse raw import bytes, failing only if they are not valid UTF-8.
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<CredentialStore> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| VaultError::Parse(format!("input is not valid UTF-8 text: {e}")))?;
    Ok(parse_csv(text))
}

/// Parse CSV text into a credential store.
///
/// The first row is a header and is always skipped. Rows with fewer than four
/// columns, or with a blank site or password, are dropped. A later row for the
/// same site replaces an earlier one.
pub fn parse_csv(text: &str) -> CredentialStore {
    let mut result = CredentialStore::new();
    let mut skipped = 0usize;

    for line in text.trim().split('\n').skip(1) {
        match parse_row(line) {
            Some((site, record)) => {
                result.insert(site, record);
            }
            None => skipped += 1,
        }
    }

    tracing::debug!(accepted = result.len(), skipped, "Parsed CSV import");
    result
}

fn parse_row(line: &str) -> Option<(String, CredentialRecord)> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < MIN_COLUMNS {
        return None;
    }

    let site = parts[0].trim();
    let username = parts[2].trim();
    let password = parts[3].trim();
    let note = parts[4..].join(",");

    if site.is_empty() || password.is_empty() {
        return None;
    }

    Some((
        site.to_string(),
        CredentialRecord::new(username, password, note.trim()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_columns_are_rejoined_into_note() {
        let store = parse_csv("h1,h2,h3,h4\nsite1,x,user1,pass1,note1,extra");
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("site1"),
            Some(&CredentialRecord::new("user1", "pass1", "note1,extra"))
        );
    }

    #[test]
    fn short_rows_are_skipped_and_empty_username_is_accepted() {
        let store = parse_csv("name,url,username,password\nsitefoo,x,user2\nsitebar,x,,pass2");
        assert!(!store.contains("sitefoo"));
        assert_eq!(
            store.get("sitebar"),
            Some(&CredentialRecord::new("", "pass2", ""))
        );
    }

    #[test]
    fn header_row_is_never_imported() {
        let store = parse_csv("site,x,user,pass\nreal,x,u,p");
        assert!(!store.contains("site"));
        assert!(store.contains("real"));
    }

    #[test]
    fn rows_missing_site_or_password_are_dropped() {
        let store = parse_csv("h\n  ,x,u,p\nnopass,x,u,   \nok,x,u,p");
        assert_eq!(store.sites().collect::<Vec<_>>(), vec!["ok"]);
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let store = parse_csv("h\ndup,x,first,p1\ndup,x,second,p2,n");
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("dup"),
            Some(&CredentialRecord::new("second", "p2", "n"))
        );
    }

    #[test]
    fn column_one_is_ignored() {
        let store = parse_csv("h\nsite,https://ignored.example,u,p");
        assert_eq!(store.get("site"), Some(&CredentialRecord::new("u", "p", "")));
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let store = parse_csv("h1,h2,h3,h4\r\nmail,x,me,secret,hi\r\n");
        assert_eq!(
            store.get("mail"),
            Some(&CredentialRecord::new("me", "secret", "hi"))
        );
    }

    #[test]
    fn quoted_fields_are_not_special() {
        let store = parse_csv("h\n\"a,b\",x,u,p");
        // The quote is kept and the comma still splits the row.
        assert_eq!(store.get("\"a"), Some(&CredentialRecord::new("x", "u", "p")));
    }

    #[test]
    fn blank_or_header_only_input_yields_empty_store() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("   \n  ").is_empty());
        assert!(parse_csv("name,url,username,password").is_empty());
    }

    #[test]
    fn undecodable_bytes_are_a_parse_error() {
        let err = parse_csv_bytes(&[0x68, 0x0a, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, VaultError::Parse(_)));
    }
}
