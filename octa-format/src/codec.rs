//! Bank file codec
//!
//! Decoding validates the whole file up front (length, header, version, every pattern and
//! part tag) and then keeps the bytes as they are: views read and write the buffer in
//! place, so every byte the object model does not map survives untouched. Encoding is a
//! copy of the buffer with a refreshed checksum.

use crate::bank::Bank;
use crate::config::CodecOptions;
use crate::error::{OctaError, Result};
use crate::layout::{bank, part, pattern};
use crate::{
    BANK_FILE_SIZE, BANK_HEADER, BANK_VERSION, PARTS_PER_BANK, PART_SIZE, PATTERNS_PER_BANK,
    PATTERN_SIZE,
};

use byteorder::{BigEndian, ByteOrder};

/// Decode a bank file with default options
///
/// # Arguments
/// * `data` - Raw bank file bytes
///
/// # Returns
/// * `Ok(Bank)` - Decoded bank owning a copy of `data`
/// * `Err(OctaError::MalformedBank)` - Structural problem; nothing is decoded
pub fn decode(data: &[u8]) -> Result<Bank> {
    decode_with(data, CodecOptions::default())
}

/// Decode a bank file
pub fn decode_with(data: &[u8], options: CodecOptions) -> Result<Bank> {
    validate(data, options)?;

    let stored = stored_checksum(data);
    let base = stored.wrapping_sub(byte_sum(data));
    log::debug!(
        "Decoded bank: {} bytes, version {}, checksum {:#06x}",
        data.len(),
        data[bank::VERSION],
        stored
    );
    Ok(Bank::from_parts(data.to_vec(), base))
}

/// Encode a bank with default options
pub fn encode(bank: &Bank) -> Vec<u8> {
    encode_with(bank, CodecOptions::default())
}

/// Encode a bank
///
/// With `update_checksum` off the stored checksum is written back unchanged, which keeps
/// an unmodified bank byte-identical either way.
pub fn encode_with(bank: &Bank, options: CodecOptions) -> Vec<u8> {
    let mut out = bank.as_bytes().to_vec();
    if options.update_checksum {
        let checksum = bank.checksum();
        BigEndian::write_u16(&mut out[bank::CHECKSUM..bank::CHECKSUM + 2], checksum);
    }
    log::debug!(
        "Encoded bank: {} bytes, checksum {:#06x}",
        out.len(),
        stored_checksum(&out)
    );
    out
}

fn validate(data: &[u8], options: CodecOptions) -> Result<()> {
    if data.len() != BANK_FILE_SIZE {
        return Err(OctaError::MalformedBank(format!(
            "expected {} bytes, got {}",
            BANK_FILE_SIZE,
            data.len()
        )));
    }

    if data[bank::HEADER..bank::VERSION] != BANK_HEADER {
        return Err(OctaError::MalformedBank("bad header".to_string()));
    }

    let version = data[bank::VERSION];
    if version != BANK_VERSION {
        if options.check_version {
            return Err(OctaError::MalformedBank(format!(
                "unsupported version {version} (expected {BANK_VERSION})"
            )));
        }
        log::warn!("Accepting bank with unexpected version {version}");
    }

    for i in 0..PATTERNS_PER_BANK {
        let at = bank::PATTERNS + i * PATTERN_SIZE;
        if &data[at..at + 4] != pattern::MAGIC {
            return Err(OctaError::MalformedBank(format!(
                "pattern {} has a bad tag",
                i + 1
            )));
        }
    }

    for (region, start) in [("unsaved", bank::PARTS_UNSAVED), ("saved", bank::PARTS_SAVED)] {
        for i in 0..PARTS_PER_BANK {
            let at = start + i * PART_SIZE;
            if &data[at..at + 4] != part::MAGIC {
                return Err(OctaError::MalformedBank(format!(
                    "{region} part {} has a bad tag",
                    i + 1
                )));
            }
        }
    }

    Ok(())
}

/// Sum of the checksummed range, wrapping at 16 bits
pub(crate) fn byte_sum(data: &[u8]) -> u16 {
    data[bank::CHECKSUM_START..bank::CHECKSUM]
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

pub(crate) fn stored_checksum(data: &[u8]) -> u16 {
    BigEndian::read_u16(&data[bank::CHECKSUM..bank::CHECKSUM + 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_bank_round_trips() {
        let bytes = encode(&Bank::new());
        assert_eq!(bytes.len(), BANK_FILE_SIZE);
        let again = encode(&decode(&bytes).unwrap());
        assert_eq!(again, bytes);
    }

    #[test]
    fn test_foreign_checksum_base_is_preserved() {
        let mut bytes = encode(&Bank::new());
        BigEndian::write_u16(&mut bytes[bank::CHECKSUM..], 0x1234);
        let bank = decode(&bytes).unwrap();
        assert_eq!(bank.stored_checksum(), 0x1234);
        assert_eq!(encode(&bank), bytes);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = decode(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, OctaError::MalformedBank(_)));
    }

    #[test]
    fn test_rejects_bad_header() {
        let mut bytes = encode(&Bank::new());
        bytes[0] = b'X';
        assert!(matches!(decode(&bytes), Err(OctaError::MalformedBank(_))));
    }

    #[test]
    fn test_rejects_bad_record_tags() {
        let mut bytes = encode(&Bank::new());
        bytes[bank::PATTERNS + 3 * PATTERN_SIZE] = 0;
        assert!(matches!(decode(&bytes), Err(OctaError::MalformedBank(_))));

        let mut bytes = encode(&Bank::new());
        bytes[bank::PARTS_SAVED + PART_SIZE] = 0;
        assert!(matches!(decode(&bytes), Err(OctaError::MalformedBank(_))));
    }

    #[test]
    fn test_version_check_is_optional() {
        let mut bytes = encode(&Bank::new());
        bytes[bank::VERSION] = 22;
        assert!(decode(&bytes).is_err());
        let lenient = CodecOptions {
            check_version: false,
            ..Default::default()
        };
        let bank = decode_with(&bytes, lenient).unwrap();
        assert_eq!(encode(&bank), bytes);
    }

    #[test]
    fn test_checksum_tracks_mutation() {
        let mut bank = decode(&encode(&Bank::new())).unwrap();
        let before = bank.checksum();
        bank.pattern_mut(1)
            .unwrap()
            .audio_track_mut(1)
            .unwrap()
            .set_active_steps(&[1])
            .unwrap();
        assert_ne!(bank.checksum(), before);

        let frozen = encode_with(
            &bank,
            CodecOptions {
                update_checksum: false,
                ..Default::default()
            },
        );
        assert_eq!(stored_checksum(&frozen), before);
    }
}
