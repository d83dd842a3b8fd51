//! Six-slot parameter pages
//!
//! Every encoder page on the device maps onto six consecutive bytes. A Part stores plain
//! values there; Scenes and step p-locks store the same layout with 255 meaning "not
//! locked". [`Cells`] abstracts over the two encodings so the typed machine and effect
//! views are written once and work over either.

use std::fmt;

use crate::block::{Block, SENTINEL};
use crate::error::{check_range, OctaError, Result};

/// Bytes per parameter page
pub const PAGE_SIZE: usize = 6;

/// Highest value a parameter byte may hold
pub const MAX_VALUE: u8 = 127;

/// Read access to the six slots of a page
pub trait Cells {
    /// `u8` for base values, `Option<u8>` for lockable values
    type Value: Copy + fmt::Debug + PartialEq;

    fn read(&self, slot: usize) -> Self::Value;
}

/// Write access to the six slots of a page
pub trait CellsMut: Cells {
    /// Validate and store `value` in `slot`
    fn write(&mut self, slot: usize, value: Self::Value) -> Result<()>;
}

/// Page of plain 0-127 values (Part base values)
#[derive(Debug)]
pub struct Values<B> {
    block: Block<B>,
}

impl<B: AsRef<[u8]>> Values<B> {
    pub fn new(buf: B) -> Self {
        Self {
            block: Block::new(buf),
        }
    }

    /// All six raw bytes
    pub fn to_array(&self) -> [u8; PAGE_SIZE] {
        self.block.array(0)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Values<B> {
    /// Overwrite all six bytes at once (used for factory defaults)
    pub fn load(&mut self, values: [u8; PAGE_SIZE]) {
        self.block.write(0, &values);
    }
}

impl<B: AsRef<[u8]>> Cells for Values<B> {
    type Value = u8;

    fn read(&self, slot: usize) -> u8 {
        self.block.u8(slot)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> CellsMut for Values<B> {
    fn write(&mut self, slot: usize, value: u8) -> Result<()> {
        check_range("parameter", value.into(), 0, MAX_VALUE.into())?;
        self.block.set_u8(slot, value);
        Ok(())
    }
}

/// Page of lockable values where 255 means "inherit"
#[derive(Debug)]
pub struct Locks<B> {
    block: Block<B>,
}

impl<B: AsRef<[u8]>> Locks<B> {
    pub fn new(buf: B) -> Self {
        Self {
            block: Block::new(buf),
        }
    }

    /// True when no slot carries a lock
    pub fn is_unlocked(&self) -> bool {
        self.block.all(0, PAGE_SIZE, SENTINEL)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Locks<B> {
    pub fn clear(&mut self) {
        self.block.fill(0, PAGE_SIZE, SENTINEL);
    }
}

impl<B: AsRef<[u8]>> Cells for Locks<B> {
    type Value = Option<u8>;

    fn read(&self, slot: usize) -> Option<u8> {
        self.block.lock(slot)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> CellsMut for Locks<B> {
    fn write(&mut self, slot: usize, value: Option<u8>) -> Result<()> {
        if let Some(v) = value {
            check_range("parameter lock", v.into(), 0, MAX_VALUE.into())?;
        }
        self.block.set_lock(slot, value);
        Ok(())
    }
}

/// Find the slot holding parameter `name`
pub(crate) fn slot_of(
    params: &[Option<&'static str>; PAGE_SIZE],
    family: &'static str,
    name: &str,
) -> Result<usize> {
    params
        .iter()
        .position(|p| *p == Some(name))
        .ok_or_else(|| OctaError::UnsupportedParameter {
            family,
            name: name.to_string(),
        })
}

/// Declare a typed view over a six-slot page
///
/// Each entry maps an encoder slot (0-5) to a getter and a setter. Slots not listed are
/// unused by the family and are reported as `None` in `PARAMS`.
macro_rules! param_page {
    (
        $(#[$meta:meta])*
        $name:ident, $family:literal {
            $( $(#[$fmeta:meta])* $slot:literal => $get:ident / $set:ident, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<P> {
            cells: P,
        }

        impl<P> $name<P> {
            /// Family name reported in errors
            pub const FAMILY: &'static str = $family;

            /// Parameter names by encoder slot A-F; `None` marks an unused slot
            pub const PARAMS: [Option<&'static str>; $crate::page::PAGE_SIZE] = {
                #[allow(unused_mut)]
                let mut names: [Option<&'static str>; $crate::page::PAGE_SIZE] =
                    [None; $crate::page::PAGE_SIZE];
                $( names[$slot] = Some(stringify!($get)); )*
                names
            };

            pub fn new(cells: P) -> Self {
                Self { cells }
            }

            pub fn into_inner(self) -> P {
                self.cells
            }
        }

        impl<P: $crate::page::Cells> $name<P> {
            $(
                $(#[$fmeta])*
                pub fn $get(&self) -> P::Value {
                    self.cells.read($slot)
                }
            )*

            /// Read a parameter by name
            pub fn get(&self, name: &str) -> $crate::error::Result<P::Value> {
                let slot = $crate::page::slot_of(&Self::PARAMS, Self::FAMILY, name)?;
                Ok(self.cells.read(slot))
            }
        }

        impl<P: $crate::page::CellsMut> $name<P> {
            $(
                pub fn $set(&mut self, value: P::Value) -> $crate::error::Result<()> {
                    self.cells.write($slot, value)
                }
            )*

            /// Write a parameter by name
            pub fn set(&mut self, name: &str, value: P::Value) -> $crate::error::Result<()> {
                let slot = $crate::page::slot_of(&Self::PARAMS, Self::FAMILY, name)?;
                self.cells.write(slot, value)
            }
        }
    };
}

pub(crate) use param_page;

param_page! {
    /// LFO page: three speeds then three depths
    Lfo, "lfo" {
        0 => speed1 / set_speed1,
        1 => speed2 / set_speed2,
        2 => speed3 / set_speed3,
        3 => depth1 / set_depth1,
        4 => depth2 / set_depth2,
        5 => depth3 / set_depth3,
    }
}

param_page! {
    /// AMP envelope page
    Amp, "amp" {
        0 => attack / set_attack,
        1 => hold / set_hold,
        2 => release / set_release,
        3 => volume / set_volume,
        4 => balance / set_balance,
    }
}

/// Factory LFO page
pub const DEFAULT_LFO: [u8; PAGE_SIZE] = [64, 64, 64, 0, 0, 0];

/// Factory AMP page
pub const DEFAULT_AMP: [u8; PAGE_SIZE] = [0, 127, 24, 108, 64, 0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_page_validates() {
        let mut page = Values::new(vec![0u8; PAGE_SIZE]);
        page.write(2, 100).unwrap();
        assert_eq!(page.read(2), 100);
        assert!(matches!(
            page.write(2, 128),
            Err(OctaError::RangeError { value: 128, .. })
        ));
        assert_eq!(page.read(2), 100);
    }

    #[test]
    fn test_locks_sentinel_symmetry() {
        let mut bytes = [SENTINEL; PAGE_SIZE];
        let mut page = Locks::new(&mut bytes[..]);
        assert!(page.is_unlocked());
        page.write(0, Some(20)).unwrap();
        assert_eq!(page.read(0), Some(20));
        page.write(0, None).unwrap();
        assert_eq!(page.read(0), None);
        assert_eq!(bytes[0], SENTINEL);
    }

    #[test]
    fn test_named_access() {
        let mut amp = Amp::new(Values::new(DEFAULT_AMP.to_vec()));
        assert_eq!(amp.volume(), 108);
        amp.set("release", 30).unwrap();
        assert_eq!(amp.release(), 30);
        assert_eq!(Amp::<()>::PARAMS[5], None);
        let err = amp.get("depth1").unwrap_err();
        assert!(matches!(err, OctaError::UnsupportedParameter { family: "amp", .. }));
    }

    #[test]
    fn test_lfo_over_locks() {
        let lfo = Lfo::new(Locks::new(vec![SENTINEL; PAGE_SIZE]));
        assert_eq!(lfo.speed1(), None);
        assert_eq!(Lfo::<()>::PARAMS[3], Some("depth1"));
    }
}
