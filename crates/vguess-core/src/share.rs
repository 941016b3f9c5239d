//! Share codes: a record packed into a copy-pasteable string.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::character::CharacterRecord;
use crate::error::Result;

/// Encodes a record as base64 of its JSON form.
pub fn encode_record(record: &CharacterRecord) -> Result<String> {
    let json = serde_json::to_vec(record)?;
    Ok(STANDARD.encode(json))
}

/// Decodes a share code produced by [`encode_record`].
pub fn decode_record(code: &str) -> Result<CharacterRecord> {
    let json = STANDARD.decode(code.trim())?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::model::fixtures::{record, tags};

    #[test]
    fn test_share_code_restores_record() {
        let mut original = record(4, "Hakos", "Baelz");
        original.country = tags(&["AU"]);
        original.height = Some(152);

        let code = encode_record(&original).unwrap();
        assert!(!code.contains('{'));
        assert_eq!(decode_record(&code).unwrap(), original);
    }

    #[test]
    fn test_garbage_code_is_an_error() {
        assert!(decode_record("not base64!").unwrap_err().is_serialization());
        let not_json = STANDARD.encode("hello");
        assert!(decode_record(&not_json).unwrap_err().is_serialization());
    }
}
