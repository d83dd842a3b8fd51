//! Bank container
//!
//! A [`Bank`] owns the complete 636113-byte bank file in one buffer. Patterns and Parts are
//! views handed out over spans of that buffer, so every edit lands directly in the bytes
//! that [`crate::encode`] writes out.

use std::fs;
use std::path::Path;

use crate::block::Block;
use crate::codec::{self, byte_sum};
use crate::config::CodecOptions;
use crate::error::{check_range, OctaError, Result};
use crate::layout::bank;
use crate::part::{self, Part};
use crate::pattern::{self, Pattern};
use crate::{
    BANK_FILE_SIZE, BANK_HEADER, BANK_VERSION, PARTS_PER_BANK, PART_SIZE, PATTERNS_PER_BANK,
    PATTERN_SIZE,
};

use byteorder::{BigEndian, ByteOrder};

/// Factory part names
const DEFAULT_PART_NAMES: [&str; PARTS_PER_BANK] = ["ONE", "TWO", "THREE", "FOUR"];

/// Saved-state flag value for a part with a saved copy
const PART_SAVED: u8 = 1;

/// One bank of a project: 16 patterns and 4 parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    data: Vec<u8>,
    /// Offset added to the byte sum when computing the checksum
    checksum_base: u16,
}

impl Bank {
    /// Fresh bank with factory patterns and parts
    pub fn new() -> Self {
        let mut data = vec![0u8; BANK_FILE_SIZE];
        data[bank::HEADER..bank::VERSION].copy_from_slice(&BANK_HEADER);
        data[bank::VERSION] = BANK_VERSION;

        for i in 0..PATTERNS_PER_BANK {
            let at = pattern_offset(i);
            pattern::init_record(&mut data[at..at + PATTERN_SIZE]);
        }
        for i in 0..PARTS_PER_BANK {
            for start in [bank::PARTS_UNSAVED, bank::PARTS_SAVED] {
                let at = start + i * PART_SIZE;
                part::init_record(&mut data[at..at + PART_SIZE], i);
            }
        }

        let mut bank = Self {
            data,
            checksum_base: 0,
        };
        for (i, name) in DEFAULT_PART_NAMES.iter().enumerate() {
            bank.write_part_name(i, name);
        }
        bank.write_checksum();
        bank
    }

    pub(crate) fn from_parts(data: Vec<u8>, checksum_base: u16) -> Self {
        Self {
            data,
            checksum_base,
        }
    }

    /// Decode a bank file with default codec options
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        codec::decode(data)
    }

    pub fn from_bytes_with(data: &[u8], options: CodecOptions) -> Result<Self> {
        codec::decode_with(data, options)
    }

    /// Encode with default codec options
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(self)
    }

    pub fn to_bytes_with(&self, options: CodecOptions) -> Vec<u8> {
        codec::encode_with(self, options)
    }

    /// Read and decode a bank file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        log::debug!("Loading bank from {}", path.display());
        Self::from_bytes(&data)
    }

    /// Encode and write the bank to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes())?;
        log::debug!("Saved bank to {}", path.display());
        Ok(())
    }

    /// Current in-memory bytes, stored checksum included
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    /// Pattern `n` (1-16)
    pub fn pattern(&self, n: u8) -> Result<Pattern<&[u8]>> {
        let at = pattern_offset(check_pattern(n)?);
        Ok(Pattern::from_block(Block::new(
            &self.data[at..at + PATTERN_SIZE],
        )))
    }

    pub fn pattern_mut(&mut self, n: u8) -> Result<Pattern<&mut [u8]>> {
        let at = pattern_offset(check_pattern(n)?);
        Ok(Pattern::from_block(Block::new(
            &mut self.data[at..at + PATTERN_SIZE],
        )))
    }

    pub fn patterns(&self) -> impl Iterator<Item = Pattern<&[u8]>> + '_ {
        self.data[bank::PATTERNS..bank::PARTS_UNSAVED]
            .chunks_exact(PATTERN_SIZE)
            .map(|chunk| Pattern::from_block(Block::new(chunk)))
    }

    // =========================================================================
    // Parts
    // =========================================================================

    /// Working copy of Part `n` (1-4), the one the device plays
    pub fn part(&self, n: u8) -> Result<Part<&[u8]>> {
        let at = part_offset(bank::PARTS_UNSAVED, check_part(n)?);
        Ok(Part::from_block(Block::new(
            &self.data[at..at + PART_SIZE],
        )))
    }

    pub fn part_mut(&mut self, n: u8) -> Result<Part<&mut [u8]>> {
        let at = part_offset(bank::PARTS_UNSAVED, check_part(n)?);
        Ok(Part::from_block(Block::new(
            &mut self.data[at..at + PART_SIZE],
        )))
    }

    pub fn parts(&self) -> impl Iterator<Item = Part<&[u8]>> + '_ {
        self.data[bank::PARTS_UNSAVED..bank::PARTS_SAVED]
            .chunks_exact(PART_SIZE)
            .map(|chunk| Part::from_block(Block::new(chunk)))
    }

    /// Saved copy of Part `n`, restored by a part reload on the device
    pub fn saved_part(&self, n: u8) -> Result<Part<&[u8]>> {
        let at = part_offset(bank::PARTS_SAVED, check_part(n)?);
        Ok(Part::from_block(Block::new(
            &self.data[at..at + PART_SIZE],
        )))
    }

    /// Copy the working Part `n` over its saved copy and mark it saved
    pub fn save_part(&mut self, n: u8) -> Result<()> {
        let idx = check_part(n)?;
        let from = part_offset(bank::PARTS_UNSAVED, idx);
        let to = part_offset(bank::PARTS_SAVED, idx);
        self.data.copy_within(from..from + PART_SIZE, to);
        self.data[bank::PART_SAVED_STATE + idx] = PART_SAVED;
        log::trace!("Saved part {n}");
        Ok(())
    }

    /// Restore the working Part `n` from its saved copy
    pub fn reload_part(&mut self, n: u8) -> Result<()> {
        let idx = check_part(n)?;
        let from = part_offset(bank::PARTS_SAVED, idx);
        let to = part_offset(bank::PARTS_UNSAVED, idx);
        self.data.copy_within(from..from + PART_SIZE, to);
        log::trace!("Reloaded part {n}");
        Ok(())
    }

    /// True once Part `n` has been saved
    pub fn part_saved(&self, n: u8) -> Result<bool> {
        let idx = check_part(n)?;
        Ok(self.data[bank::PART_SAVED_STATE + idx] != 0)
    }

    /// Name of Part `n`, trailing NULs stripped
    pub fn part_name(&self, n: u8) -> Result<String> {
        let at = name_offset(check_part(n)?);
        let raw = &self.data[at..at + bank::PART_NAME_LEN];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Rename Part `n`; names are ASCII and at most 7 characters
    pub fn set_part_name(&mut self, n: u8, name: &str) -> Result<()> {
        let idx = check_part(n)?;
        check_range(
            "part name length",
            name.len() as i32,
            0,
            bank::PART_NAME_LEN as i32,
        )?;
        if let Some(c) = name.bytes().find(|b| !b.is_ascii() || *b == 0) {
            return Err(OctaError::range("part name character", c, 1, 127));
        }
        self.write_part_name(idx, name);
        Ok(())
    }

    fn write_part_name(&mut self, idx: usize, name: &str) {
        let at = name_offset(idx);
        let field = &mut self.data[at..at + bank::PART_NAME_LEN];
        field.fill(0);
        field[..name.len()].copy_from_slice(name.as_bytes());
    }

    // =========================================================================
    // Counters and checksum
    // =========================================================================

    /// Number of flex slots in use, as recorded in the bank
    pub fn flex_count(&self) -> u8 {
        self.data[bank::FLEX_COUNTER]
    }

    pub fn set_flex_count(&mut self, count: u8) -> Result<()> {
        check_range("flex count", count.into(), 0, crate::SAMPLE_SLOTS as i32)?;
        self.data[bank::FLEX_COUNTER] = count;
        Ok(())
    }

    /// Checksum of the current contents
    pub fn checksum(&self) -> u16 {
        self.checksum_base.wrapping_add(byte_sum(&self.data))
    }

    /// Checksum currently written in the buffer
    pub fn stored_checksum(&self) -> u16 {
        codec::stored_checksum(&self.data)
    }

    fn write_checksum(&mut self) {
        let checksum = self.checksum();
        BigEndian::write_u16(
            &mut self.data[bank::CHECKSUM..bank::CHECKSUM + 2],
            checksum,
        );
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

fn check_pattern(n: u8) -> Result<usize> {
    if !(1..=PATTERNS_PER_BANK as u8).contains(&n) {
        return Err(OctaError::InvalidPattern(n));
    }
    Ok(usize::from(n - 1))
}

fn check_part(n: u8) -> Result<usize> {
    if !(1..=PARTS_PER_BANK as u8).contains(&n) {
        return Err(OctaError::InvalidPart(n));
    }
    Ok(usize::from(n - 1))
}

fn pattern_offset(idx: usize) -> usize {
    bank::PATTERNS + idx * PATTERN_SIZE
}

fn part_offset(start: usize, idx: usize) -> usize {
    start + idx * PART_SIZE
}

fn name_offset(idx: usize) -> usize {
    bank::PART_NAMES + idx * bank::PART_NAME_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::MachineType;

    #[test]
    fn test_fresh_bank() {
        let bank = Bank::new();
        assert_eq!(bank.as_bytes().len(), BANK_FILE_SIZE);
        assert_eq!(&bank.as_bytes()[..4], b"FORM");
        assert_eq!(bank.as_bytes()[bank::VERSION], BANK_VERSION);
        assert_eq!(bank.patterns().count(), 16);
        assert_eq!(bank.parts().count(), 4);
        for (i, part) in bank.parts().enumerate() {
            assert_eq!(part.part_id(), i as u8 + 1);
        }
        assert_eq!(bank.part_name(1).unwrap(), "ONE");
        assert_eq!(bank.part_name(3).unwrap(), "THREE");
        assert_eq!(bank.flex_count(), 0);
        assert_eq!(bank.stored_checksum(), bank.checksum());
    }

    #[test]
    fn test_index_errors() {
        let mut bank = Bank::new();
        assert!(matches!(bank.pattern(0), Err(OctaError::InvalidPattern(0))));
        assert!(matches!(bank.pattern_mut(17), Err(OctaError::InvalidPattern(17))));
        assert!(matches!(bank.part(5), Err(OctaError::InvalidPart(5))));
        assert!(matches!(bank.save_part(0), Err(OctaError::InvalidPart(0))));
    }

    #[test]
    fn test_pattern_edit_lands_in_buffer() {
        let mut bank = Bank::new();
        bank.pattern_mut(2).unwrap().set_part_assignment(3).unwrap();
        let at = pattern_offset(1) + crate::layout::pattern::PART_ASSIGNMENT;
        assert_eq!(bank.as_bytes()[at], 2);
        assert_eq!(bank.pattern(2).unwrap().part_assignment(), 3);
        assert_eq!(bank.pattern(1).unwrap().part_assignment(), 1);
    }

    #[test]
    fn test_save_and_reload_part() {
        let mut bank = Bank::new();
        assert!(!bank.part_saved(2).unwrap());

        bank.part_mut(2)
            .unwrap()
            .audio_track_mut(1)
            .unwrap()
            .set_machine_type(MachineType::Flex);
        assert_eq!(
            bank.saved_part(2).unwrap().audio_track(1).unwrap().machine_type().unwrap(),
            MachineType::Static
        );

        bank.save_part(2).unwrap();
        assert!(bank.part_saved(2).unwrap());
        assert_eq!(
            bank.saved_part(2).unwrap().audio_track(1).unwrap().machine_type().unwrap(),
            MachineType::Flex
        );

        bank.part_mut(2)
            .unwrap()
            .audio_track_mut(1)
            .unwrap()
            .set_machine_type(MachineType::Thru);
        bank.reload_part(2).unwrap();
        assert_eq!(
            bank.part(2).unwrap().audio_track(1).unwrap().machine_type().unwrap(),
            MachineType::Flex
        );
    }

    #[test]
    fn test_part_names() {
        let mut bank = Bank::new();
        bank.set_part_name(4, "DRUMS").unwrap();
        assert_eq!(bank.part_name(4).unwrap(), "DRUMS");
        bank.set_part_name(4, "AB").unwrap();
        assert_eq!(bank.part_name(4).unwrap(), "AB");
        assert!(matches!(
            bank.set_part_name(1, "TOOLONGX"),
            Err(OctaError::RangeError { .. })
        ));
        assert!(bank.set_part_name(1, "é").is_err());
        assert_eq!(bank.part_name(1).unwrap(), "ONE");
    }

    #[test]
    fn test_flex_count() {
        let mut bank = Bank::new();
        bank.set_flex_count(12).unwrap();
        assert_eq!(bank.flex_count(), 12);
        assert!(bank.set_flex_count(129).is_err());
    }
}
