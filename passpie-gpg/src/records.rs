//! Structured parsing of the backend's colon-delimited listing output
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


/// Record kinds this core understands; everything else is ignorable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `fpr` fingerprint record
    Fingerprint,
    /// `uid` user identity record
    UserId,
    /// Any other record kind
    Other,
}

/// One line of `--with-colons` output split into typed fields
#[derive(Debug)]
pub struct ColonRecord<'a> {
    /// Record kind from the first field
    pub kind: RecordKind,
    fields: Vec<&'a str>,
}

// Fingerprints and user ids both live in the tenth field of their records.
const VALUE_FIELD: usize = 9;

impl<'a> ColonRecord<'a> {
    /// Split one listing line into a record
    pub fn parse(line: &'a str) -> Self {
        let fields: Vec<&str> = line.split(':').collect();
        let kind = match fields.first().copied() {
            Some("fpr") => RecordKind::Fingerprint,
            Some("uid") => RecordKind::UserId,
            _ => RecordKind::Other,
        };
        Self { kind, fields }
    }

    /// Fingerprint of an `fpr` record
    pub fn fingerprint(&self) -> Option<&'a str> {
        if self.kind != RecordKind::Fingerprint {
            return None;
        }
        match self.fields.get(VALUE_FIELD).copied() {
            Some(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Bracketed address of a `uid` record's user-id field
    ///
    /// The address must look like an email (contain `@`); user ids
    /// without one yield nothing.
    pub fn email(&self) -> Option<&'a str> {
        if self.kind != RecordKind::UserId {
            return None;
        }
        let user_id = self.fields.get(VALUE_FIELD).copied()?;
        let start = user_id.find('<')? + 1;
        let end = user_id[start..].find('>')? + start;
        let address = &user_id[start..end];
        if address.contains('@') {
            Some(address)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fpr_line(fingerprint: &str) -> String {
        let mut fields = vec![""; 11];
        fields[0] = "fpr";
        fields[9] = fingerprint;
        fields.join(":")
    }

    fn uid_line(user_id: &str) -> String {
        let mut fields = vec![""; 11];
        fields[0] = "uid";
        fields[1] = "u";
        fields[9] = user_id;
        fields.join(":")
    }

    #[test]
    fn test_fingerprint_record() {
        let line = fpr_line("8B4B3F7C9A6E5D2F1C0B9A8E7D6C5B4A39281716");
        let record = ColonRecord::parse(&line);
        assert_eq!(record.kind, RecordKind::Fingerprint);
        assert_eq!(
            record.fingerprint(),
            Some("8B4B3F7C9A6E5D2F1C0B9A8E7D6C5B4A39281716")
        );
        assert_eq!(record.email(), None);
    }

    #[test]
    fn test_uid_record_email() {
        let line = uid_line("Passpie (Generated by Passpie) <passpie@localhost>");
        let record = ColonRecord::parse(&line);
        assert_eq!(record.kind, RecordKind::UserId);
        assert_eq!(record.email(), Some("passpie@localhost"));
        assert_eq!(record.fingerprint(), None);
    }

    #[test]
    fn test_uid_without_address_is_skipped() {
        let line = uid_line("Passpie");
        let record = ColonRecord::parse(&line);
        assert_eq!(record.email(), None);
    }

    #[test]
    fn test_bracketed_value_without_at_is_skipped() {
        let line = uid_line("Passpie <localhost>");
        let record = ColonRecord::parse(&line);
        assert_eq!(record.email(), None);
    }

    #[test]
    fn test_unknown_kinds_are_ignorable() {
        for line in ["tru::1:1584539141:0:3:1:5", "pub:u:4096:1:AA::::::::", ""] {
            let record = ColonRecord::parse(line);
            assert_eq!(record.kind, RecordKind::Other);
            assert_eq!(record.fingerprint(), None);
            assert_eq!(record.email(), None);
        }
    }

    #[test]
    fn test_empty_fingerprint_field() {
        let line = fpr_line("");
        let record = ColonRecord::parse(&line);
        assert_eq!(record.fingerprint(), None);
    }
}
