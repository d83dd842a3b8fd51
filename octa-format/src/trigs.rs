//! Bitmask trigger sets
//!
//! A trigger mask is 8 bytes holding one bit per step. The bytes are not in step order:
//! steps 1-8 live in byte 7, 9-16 in byte 6, 17-24 in byte 4, 25-32 in byte 5, 33-40 in
//! byte 2, 41-48 in byte 3, 49-56 in byte 0 and 57-64 in byte 1.

use crate::block::Block;
use crate::error::{check_step, Result};
use crate::STEPS_PER_TRACK;

/// Size of one trigger mask in bytes
pub const MASK_SIZE: usize = 8;

/// Byte index holding each group of 8 steps
const GROUP_BYTE: [usize; 8] = [7, 6, 4, 5, 2, 3, 0, 1];

/// Byte index and bit of a 0-based step inside a mask
pub(crate) fn mask_position(step_idx: usize) -> (usize, u8) {
    (GROUP_BYTE[step_idx / 8], (step_idx % 8) as u8)
}

bitflags::bitflags! {
    /// Summary of every trigger mask at one step
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TrigFlags: u8 {
        const TRIGGER = 0b0000_0001;
        const TRIGLESS = 0b0000_0010;
        const PLOCK = 0b0000_0100;
        const ONESHOT = 0b0000_1000;
        const SWING = 0b0001_0000;
        const SLIDE = 0b0010_0000;
    }
}

impl TrigFlags {
    /// Flag matching a mask kind
    pub fn of(kind: crate::TrigKind) -> Self {
        use crate::TrigKind;
        match kind {
            TrigKind::Trigger => Self::TRIGGER,
            TrigKind::Trigless => Self::TRIGLESS,
            TrigKind::Plock => Self::PLOCK,
            TrigKind::Oneshot => Self::ONESHOT,
            TrigKind::Swing => Self::SWING,
            TrigKind::Slide => Self::SLIDE,
        }
    }
}

/// One 64-step trigger mask, writing straight into its backing bytes
#[derive(Debug)]
pub struct TrigMask<B> {
    block: Block<B>,
}

impl<B: AsRef<[u8]>> TrigMask<B> {
    /// View an 8-byte mask
    pub fn new(buf: B) -> Result<Self> {
        Ok(Self {
            block: Block::with_len(buf, "trig mask", MASK_SIZE)?,
        })
    }

    pub(crate) fn from_block(block: Block<B>) -> Self {
        Self { block }
    }

    /// Whether `step` (1-64) is set
    pub fn is_active(&self, step: u8) -> Result<bool> {
        let (byte, bit) = mask_position(check_step(step)?);
        Ok(self.block.bit(byte, bit))
    }

    /// Set steps in ascending order
    pub fn active_steps(&self) -> Vec<u8> {
        (0..STEPS_PER_TRACK)
            .filter(|&idx| {
                let (byte, bit) = mask_position(idx);
                self.block.bit(byte, bit)
            })
            .map(|idx| idx as u8 + 1)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.block.as_bytes().iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.block.as_bytes().iter().all(|&b| b == 0)
    }

    /// Mask in step order: bit `i` is step `i + 1`
    pub fn bits(&self) -> u64 {
        (0..STEPS_PER_TRACK).fold(0u64, |acc, idx| {
            let (byte, bit) = mask_position(idx);
            if self.block.bit(byte, bit) {
                acc | (1 << idx)
            } else {
                acc
            }
        })
    }

    /// Raw on-disk bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.block.as_bytes()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> TrigMask<B> {
    /// Set or clear one step
    pub fn set_active(&mut self, step: u8, active: bool) -> Result<()> {
        let (byte, bit) = mask_position(check_step(step)?);
        self.block.set_bit(byte, bit, active);
        Ok(())
    }

    /// Replace the whole mask with exactly `steps`
    ///
    /// Every step number is validated before the mask is touched.
    pub fn set_active_steps(&mut self, steps: &[u8]) -> Result<()> {
        let indices = steps
            .iter()
            .map(|&s| check_step(s))
            .collect::<Result<Vec<_>>>()?;
        self.clear();
        for idx in indices {
            let (byte, bit) = mask_position(idx);
            self.block.set_bit(byte, bit, true);
        }
        Ok(())
    }

    /// Replace the mask from step-ordered bits
    pub fn set_bits(&mut self, bits: u64) {
        for idx in 0..STEPS_PER_TRACK {
            let (byte, bit) = mask_position(idx);
            self.block.set_bit(byte, bit, bits & (1 << idx) != 0);
        }
    }

    pub fn clear(&mut self) {
        self.block.fill(0, MASK_SIZE, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OctaError;

    fn mask() -> TrigMask<Vec<u8>> {
        TrigMask::new(vec![0u8; MASK_SIZE]).unwrap()
    }

    #[test]
    fn test_byte_order() {
        let mut m = mask();
        m.set_active(1, true).unwrap();
        assert_eq!(m.as_bytes()[7], 0b0000_0001);
        m.set_active(16, true).unwrap();
        assert_eq!(m.as_bytes()[6], 0b1000_0000);
        m.set_active(17, true).unwrap();
        assert_eq!(m.as_bytes()[4], 0b0000_0001);
        m.set_active(25, true).unwrap();
        assert_eq!(m.as_bytes()[5], 0b0000_0001);
        m.set_active(49, true).unwrap();
        assert_eq!(m.as_bytes()[0], 0b0000_0001);
        m.set_active(64, true).unwrap();
        assert_eq!(m.as_bytes()[1], 0b1000_0000);
    }

    #[test]
    fn test_bulk_set_replaces_previous() {
        let mut m = mask();
        m.set_active(2, true).unwrap();
        m.set_active_steps(&[13, 1, 9, 5]).unwrap();
        assert_eq!(m.active_steps(), vec![1, 5, 9, 13]);
        assert!(!m.is_active(2).unwrap());
        assert_eq!(m.count(), 4);
    }

    #[test]
    fn test_bulk_set_validates_first() {
        let mut m = mask();
        m.set_active(3, true).unwrap();
        let err = m.set_active_steps(&[1, 65]).unwrap_err();
        assert!(matches!(err, OctaError::InvalidStep(65)));
        assert_eq!(m.active_steps(), vec![3]);
    }

    #[test]
    fn test_out_of_range_steps() {
        let mut m = mask();
        assert!(matches!(m.is_active(0), Err(OctaError::InvalidStep(0))));
        assert!(matches!(m.set_active(65, true), Err(OctaError::InvalidStep(65))));
    }

    #[test]
    fn test_bits_in_step_order() {
        let mut m = mask();
        m.set_bits(0b1011 | (1 << 63));
        assert_eq!(m.active_steps(), vec![1, 2, 4, 64]);
        assert_eq!(m.bits(), 0b1011 | (1 << 63));
        m.clear();
        assert!(m.is_empty());
    }
}
