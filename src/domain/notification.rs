//! Grammar for mobile-money "payment received" notifications.
//!
//! A notification is accepted only when it matches the full envelope:
//!
//! ```text
//! *161*TxId:<digits>*R*You have received <amount> RWF from <name> (<masked phone>) on your mobile money account at <YYYY-MM-DD HH:MM:SS>.
//! ```
//!
//! Once accepted, every field is pulled out by its own sub-extractor that
//! scans the whole text. A field whose sub-extractor finds nothing is left
//! empty instead of failing the message.

use serde::{Deserialize, Serialize};

/// Reason reported when a message does not match the envelope.
pub const UNSUPPORTED_FORMAT: &str = "Message format not supported.";

const ENVELOPE_PREFIX: &str = "*161*TxId:";
const TIMESTAMP_SHAPE: &str = "0000-00-00 00:00:00";

/// Structured data extracted from an accepted notification.
///
/// Records are append-only: once stored they are never mutated.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct TransactionRecord {
    /// The notification exactly as received.
    pub raw_text: String,
    /// Transaction identifier, empty when none was found.
    pub txid: String,
    /// Amount text including the currency, e.g. `"7,000 RWF"`.
    pub amount: String,
    pub sender_name: String,
    pub timestamp: Option<String>,
}

impl TransactionRecord {
    /// Runs every field sub-extractor over `text`.
    ///
    /// This never fails; callers decide separately whether the text is a
    /// supported notification at all (see [`is_supported`]).
    pub fn extract(text: &str) -> Self {
        Self {
            raw_text: text.to_string(),
            txid: extract_txid(text).unwrap_or_default().to_string(),
            amount: extract_amount(text).unwrap_or_default().to_string(),
            sender_name: extract_sender_name(text).unwrap_or_default().to_string(),
            timestamp: extract_timestamp(text).map(str::to_string),
        }
    }
}

/// Returns `true` when `text` starts with a complete notification envelope.
///
/// Anything after the closing `.` is ignored.
pub fn is_supported(text: &str) -> bool {
    match_envelope(text).is_some()
}

fn match_envelope(text: &str) -> Option<()> {
    let mut cursor = Cursor::new(text);
    cursor.literal(ENVELOPE_PREFIX)?;
    cursor.digits()?;
    cursor.literal("*R*You have received ")?;
    cursor.grouped_number()?;
    cursor.literal(" RWF from ")?;
    cursor.name_before_paren()?;
    cursor.literal("(")?;
    cursor.masked_phone()?;
    cursor.literal(") on your mobile money account at ")?;
    cursor.timestamp()?;
    cursor.literal(".")
}

/// First digit run after `TxId`, allowing any mix of `:` and whitespace in
/// between. Falls back to the strict `*161*TxId:<digits>*R*` form.
pub fn extract_txid(text: &str) -> Option<&str> {
    occurrences(text, "TxId")
        .find_map(|rest| {
            let rest = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
            Cursor::new(rest).digits()
        })
        .or_else(|| {
            occurrences(text, ENVELOPE_PREFIX).find_map(|rest| {
                let mut cursor = Cursor::new(rest);
                let txid = cursor.digits()?;
                cursor.literal("*R*")?;
                Some(txid)
            })
        })
}

/// Leftmost `<number> RWF` substring, where the number is either plain
/// digits or 1-3 digits followed by `,ddd` groups.
pub fn extract_amount(text: &str) -> Option<&str> {
    text.char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .find_map(|(start, _)| amount_len(&text[start..]).map(|len| &text[start..start + len]))
}

fn amount_len(candidate: &str) -> Option<usize> {
    let mut cursor = Cursor::new(candidate);
    cursor.grouped_number()?;
    let spaced = cursor.rest.trim_start();
    let spaced = spaced.strip_prefix("RWF")?;
    Some(candidate.len() - spaced.len())
}

/// Letters and spaces between `from ` and ` (`, trimmed.
pub fn extract_sender_name(text: &str) -> Option<&str> {
    occurrences(text, "from ").find_map(|rest| {
        let mut cursor = Cursor::new(rest);
        let name = cursor.name_before_paren()?;
        cursor.literal("(")?;
        Some(name.trim())
    })
}

/// `YYYY-MM-DD HH:MM:SS` immediately following `at `.
pub fn extract_timestamp(text: &str) -> Option<&str> {
    occurrences(text, "at ").find_map(|rest| Cursor::new(rest).timestamp())
}

/// Yields the remainder of `text` after each occurrence of `needle`.
fn occurrences<'a>(text: &'a str, needle: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    text.match_indices(needle)
        .map(move |(at, _)| &text[at + needle.len()..])
}

/// A forward-only matcher over the unconsumed part of a message.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn literal(&mut self, expected: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(expected)?;
        Some(())
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let end = self.rest.find(|c: char| !accept(c)).unwrap_or(self.rest.len());
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        taken
    }

    fn digits(&mut self) -> Option<&'a str> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        (!digits.is_empty()).then_some(digits)
    }

    /// `7000`, `7,000` or `1,250,000`. Comma groups only follow a lead of
    /// at most three digits.
    fn grouped_number(&mut self) -> Option<&'a str> {
        let start = self.rest;
        let lead = self.digits()?;
        if lead.len() <= 3 {
            while let Some(group) = self.rest.strip_prefix(',')
                && group.len() >= 3
                && group.as_bytes()[..3].iter().all(u8::is_ascii_digit)
            {
                self.rest = &group[3..];
            }
        }
        Some(&start[..start.len() - self.rest.len()])
    }

    /// A run of ASCII letters and spaces whose last character is the space
    /// that precedes `(`. Returns the run without that space.
    fn name_before_paren(&mut self) -> Option<&'a str> {
        let checkpoint = self.rest;
        let run = self.take_while(|c| c.is_ascii_alphabetic() || c == ' ');
        match run.strip_suffix(' ') {
            Some(name) if !name.is_empty() && self.rest.starts_with('(') => Some(name),
            _ => {
                self.rest = checkpoint;
                None
            }
        }
    }

    fn masked_phone(&mut self) -> Option<&'a str> {
        let phone = self.take_while(|c| c == '*' || c.is_ascii_digit());
        (!phone.is_empty()).then_some(phone)
    }

    fn timestamp(&mut self) -> Option<&'a str> {
        let candidate = self.rest.get(..TIMESTAMP_SHAPE.len())?;
        let shaped = candidate
            .bytes()
            .zip(TIMESTAMP_SHAPE.bytes())
            .all(|(got, shape)| match shape {
                b'0' => got.is_ascii_digit(),
                literal => got == literal,
            });
        if !shaped {
            return None;
        }
        self.rest = &self.rest[TIMESTAMP_SHAPE.len()..];
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "*161*TxId:123456*R*You have received 7,000 RWF from JOHN DOE (**1234) on your mobile money account at 2024-01-15 10:30:00.";

    #[test]
    fn test_well_formed_notification() {
        assert!(is_supported(WELL_FORMED));

        let record = TransactionRecord::extract(WELL_FORMED);
        assert_eq!(record.raw_text, WELL_FORMED);
        assert_eq!(record.txid, "123456");
        assert_eq!(record.amount, "7,000 RWF");
        assert_eq!(record.sender_name, "JOHN DOE");
        assert_eq!(record.timestamp.as_deref(), Some("2024-01-15 10:30:00"));
    }

    #[test]
    fn test_plain_amount_envelope() {
        let text = "*161*TxId:99*R*You have received 100 RWF from Alice (250788***123) on your mobile money account at 2025-03-01 08:00:59.";
        assert!(is_supported(text));
        let record = TransactionRecord::extract(text);
        assert_eq!(record.amount, "100 RWF");
        assert_eq!(record.sender_name, "Alice");
    }

    #[test]
    fn test_trailing_text_is_tolerated() {
        let text = format!("{WELL_FORMED} Your new balance: 12,000 RWF.");
        assert!(is_supported(&text));
    }

    #[test]
    fn test_envelope_rejections() {
        let rejected = [
            "",
            "Hello there",
            // Missing prefix
            "TxId:123456*R*You have received 7000 RWF from JOHN DOE (**1234) on your mobile money account at 2024-01-15 10:30:00.",
            // Non-digit transaction id
            "*161*TxId:12a456*R*You have received 7000 RWF from JOHN DOE (**1234) on your mobile money account at 2024-01-15 10:30:00.",
            // Different currency
            "*161*TxId:123456*R*You have received 7000 USD from JOHN DOE (**1234) on your mobile money account at 2024-01-15 10:30:00.",
            // Digits in the sender name
            "*161*TxId:123456*R*You have received 7000 RWF from JOHN D0E (**1234) on your mobile money account at 2024-01-15 10:30:00.",
            // No space before the phone
            "*161*TxId:123456*R*You have received 7000 RWF from JOHN DOE(**1234) on your mobile money account at 2024-01-15 10:30:00.",
            // Letters in the masked phone
            "*161*TxId:123456*R*You have received 7000 RWF from JOHN DOE (**12x4) on your mobile money account at 2024-01-15 10:30:00.",
            // Short timestamp
            "*161*TxId:123456*R*You have received 7000 RWF from JOHN DOE (**1234) on your mobile money account at 2024-01-15 10:30.",
            // Missing final period
            "*161*TxId:123456*R*You have received 7000 RWF from JOHN DOE (**1234) on your mobile money account at 2024-01-15 10:30:00",
            // Broken thousands group
            "*161*TxId:123456*R*You have received 7,00 RWF from JOHN DOE (**1234) on your mobile money account at 2024-01-15 10:30:00.",
            // Outgoing transfer
            "*164*S*Y'ohereje 5,000 RWF kuri JOHN DOE (250788123456) at 2024-01-15 10:30:00.",
        ];
        for text in rejected {
            assert!(!is_supported(text), "should reject: {text}");
        }
    }

    #[test]
    fn test_txid_variants() {
        assert_eq!(extract_txid("TxId: 42 something"), Some("42"));
        assert_eq!(extract_txid("TxId:::  \t7"), Some("7"));
        assert_eq!(extract_txid("TxId none, TxId:8"), Some("8"));
        assert_eq!(extract_txid("no identifier"), None);
    }

    #[test]
    fn test_amount_variants() {
        assert_eq!(extract_amount("paid 17000 RWF today"), Some("17000 RWF"));
        assert_eq!(extract_amount("paid 1,250,000RWF"), Some("1,250,000RWF"));
        assert_eq!(extract_amount("TxId:5*R* got 300  RWF"), Some("300  RWF"));
        assert_eq!(extract_amount("300 USD"), None);
    }

    #[test]
    fn test_sender_name_variants() {
        assert_eq!(extract_sender_name("from  Jane  Roe  (**1)"), Some("Jane  Roe"));
        assert_eq!(extract_sender_name("from 0788 (x) from Bob (1)"), Some("Bob"));
        assert_eq!(extract_sender_name("from Bob"), None);
    }

    #[test]
    fn test_timestamp_variants() {
        assert_eq!(
            extract_timestamp("that was at 2024-12-31 23:59:59"),
            Some("2024-12-31 23:59:59")
        );
        assert_eq!(extract_timestamp("at 2024/12/31 23:59:59"), None);
    }

    #[test]
    fn test_sub_extractors_are_independent() {
        let record = TransactionRecord::extract("TxId:77 nothing else");
        assert_eq!(record.txid, "77");
        assert_eq!(record.amount, "");
        assert_eq!(record.sender_name, "");
        assert_eq!(record.timestamp, None);
    }
}
