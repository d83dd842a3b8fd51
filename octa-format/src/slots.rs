//! Sample slot table
//!
//! A project references its samples through two pools of 128 slots, Flex and Static.
//! Slots are 1-based everywhere in the public API; the bank stores them 0-based.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::enums::SlotKind;
use crate::error::{check_range, OctaError, Result};
use crate::SAMPLE_SLOTS;

/// One assigned slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSlot {
    pub kind: SlotKind,
    /// 1-based slot number
    pub slot: u8,
    pub path: String,
}

/// Slot assignments of one pool
#[derive(Debug, Clone, Default)]
struct Pool {
    by_path: HashMap<String, u8>,
    by_slot: HashMap<u8, String>,
}

impl Pool {
    fn lowest_free(&self) -> Option<u8> {
        (1..=SAMPLE_SLOTS as u8).find(|slot| !self.by_slot.contains_key(slot))
    }

    fn insert(&mut self, path: &str, slot: u8) {
        self.by_path.insert(path.to_string(), slot);
        self.by_slot.insert(slot, path.to_string());
    }
}

/// Flex and Static slot assignments of a project
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    flex: Pool,
    statics: Pool,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn pool(&self, kind: SlotKind) -> &Pool {
        match kind {
            SlotKind::Flex => &self.flex,
            SlotKind::Static => &self.statics,
        }
    }

    fn pool_mut(&mut self, kind: SlotKind) -> &mut Pool {
        match kind {
            SlotKind::Flex => &mut self.flex,
            SlotKind::Static => &mut self.statics,
        }
    }

    /// Assign `path` to a slot of `kind`
    ///
    /// # Arguments
    /// * `path` - Sample path as the device will see it
    /// * `kind` - Flex or Static pool
    /// * `slot` - Explicit 1-based slot, or `None` for the lowest free one
    ///
    /// # Returns
    /// The 1-based slot. A path already in the pool keeps its slot, whatever `slot` asks for.
    pub fn add(&mut self, path: &str, kind: SlotKind, slot: Option<u8>) -> Result<u8> {
        let pool = self.pool_mut(kind);
        if let Some(&current) = pool.by_path.get(path) {
            return Ok(current);
        }

        let slot = match slot {
            Some(wanted) => {
                check_range("sample slot", wanted.into(), 1, SAMPLE_SLOTS as i32)?;
                if let Some(taken) = pool.by_slot.get(&wanted) {
                    return Err(OctaError::SlotInUse {
                        slot: wanted,
                        path: taken.clone(),
                    });
                }
                wanted
            }
            None => pool.lowest_free().ok_or(OctaError::SlotsExhausted(kind))?,
        };

        pool.insert(path, slot);
        log::trace!("Assigned '{path}' to {kind} slot {slot}");
        Ok(slot)
    }

    /// Slot holding `path`, if assigned
    pub fn slot(&self, path: &str, kind: SlotKind) -> Option<u8> {
        self.pool(kind).by_path.get(path).copied()
    }

    /// Path assigned to `slot`, if any
    pub fn path(&self, slot: u8, kind: SlotKind) -> Option<&str> {
        self.pool(kind).by_slot.get(&slot).map(String::as_str)
    }

    /// Release `slot`, returning the path it held
    pub fn remove(&mut self, slot: u8, kind: SlotKind) -> Option<String> {
        let pool = self.pool_mut(kind);
        let path = pool.by_slot.remove(&slot)?;
        pool.by_path.remove(&path);
        Some(path)
    }

    pub fn count(&self, kind: SlotKind) -> usize {
        self.pool(kind).by_slot.len()
    }

    /// All assignments of `kind`, in slot order
    pub fn entries(&self, kind: SlotKind) -> Vec<SampleSlot> {
        let mut entries: Vec<SampleSlot> = self
            .pool(kind)
            .by_slot
            .iter()
            .map(|(&slot, path)| SampleSlot {
                kind,
                slot,
                path: path.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.slot);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_assign_lowest_free() {
        let mut table = SlotTable::new();
        assert_eq!(table.add("kick.wav", SlotKind::Flex, None).unwrap(), 1);
        assert_eq!(table.add("snare.wav", SlotKind::Flex, None).unwrap(), 2);
        assert_eq!(table.add("hat.wav", SlotKind::Flex, Some(5)).unwrap(), 5);
        table.remove(1, SlotKind::Flex);
        assert_eq!(table.add("clap.wav", SlotKind::Flex, None).unwrap(), 1);
        assert_eq!(table.add("tom.wav", SlotKind::Flex, None).unwrap(), 3);
    }

    #[test]
    fn test_same_path_reuses_slot() {
        let mut table = SlotTable::new();
        let slot = table.add("kick.wav", SlotKind::Static, Some(7)).unwrap();
        assert_eq!(table.add("kick.wav", SlotKind::Static, None).unwrap(), slot);
        assert_eq!(table.add("kick.wav", SlotKind::Static, Some(9)).unwrap(), slot);
        assert_eq!(table.count(SlotKind::Static), 1);
    }

    #[test]
    fn test_pools_are_independent() {
        let mut table = SlotTable::new();
        table.add("kick.wav", SlotKind::Flex, None).unwrap();
        assert_eq!(table.add("kick.wav", SlotKind::Static, None).unwrap(), 1);
        assert_eq!(table.slot("kick.wav", SlotKind::Flex), Some(1));
        assert_eq!(table.path(1, SlotKind::Static), Some("kick.wav"));
        assert_eq!(table.count(SlotKind::Flex), 1);
    }

    #[test]
    fn test_explicit_slot_errors() {
        let mut table = SlotTable::new();
        table.add("kick.wav", SlotKind::Flex, Some(3)).unwrap();
        let err = table.add("snare.wav", SlotKind::Flex, Some(3)).unwrap_err();
        assert!(matches!(err, OctaError::SlotInUse { slot: 3, .. }));
        assert!(matches!(
            table.add("snare.wav", SlotKind::Flex, Some(0)),
            Err(OctaError::RangeError { .. })
        ));
        assert!(matches!(
            table.add("snare.wav", SlotKind::Flex, Some(129)),
            Err(OctaError::RangeError { .. })
        ));
    }

    #[test]
    fn test_exhaustion() {
        let mut table = SlotTable::new();
        for i in 0..SAMPLE_SLOTS {
            table.add(&format!("s{i}.wav"), SlotKind::Flex, None).unwrap();
        }
        let err = table.add("extra.wav", SlotKind::Flex, None).unwrap_err();
        assert!(matches!(err, OctaError::SlotsExhausted(SlotKind::Flex)));
    }

    #[test]
    fn test_entries_sorted() {
        let mut table = SlotTable::new();
        table.add("b.wav", SlotKind::Flex, Some(9)).unwrap();
        table.add("a.wav", SlotKind::Flex, Some(2)).unwrap();
        let slots: Vec<u8> = table.entries(SlotKind::Flex).iter().map(|e| e.slot).collect();
        assert_eq!(slots, vec![2, 9]);
    }
}
