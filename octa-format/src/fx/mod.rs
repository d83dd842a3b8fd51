//! Effect variant views
//!
//! FX1 and FX2 each own a six-byte parameter page whose meaning depends on the effect type
//! selected for that slot. [`FxView`] is a closed union with one variant per effect
//! family, built by [`FxView::new`] from the type tag read when the view is acquired.
//!
//! The type is captured at acquisition. Changing the slot's effect type afterwards does not
//! change an existing view; acquiring a new view does, and the new family then reads the
//! same six bytes under its own interpretation.
//!
//! # Usage
//!
//! ```ignore
//! use octa_format::{FxSlot, FxType, FxView};
//!
//! let mut part = bank.part_mut(1)?;
//! let mut track = part.audio_track_mut(1)?;
//! track.set_fx_type(FxSlot::Fx2, FxType::Delay)?;
//! if let FxView::Delay(mut delay) = track.fx_mut(FxSlot::Fx2)? {
//!     delay.set_feedback(90)?;
//! }
//! ```

mod delay;
mod dynamics;
mod eq;
mod filter;
mod lofi;
mod modulation;
mod reverb;
mod spatial;

pub use delay::Delay;
pub use dynamics::Compressor;
pub use eq::{DjEq, ParametricEq};
pub use filter::Filter;
pub use lofi::Lofi;
pub use modulation::{Chorus, CombFilter, Flanger, Phaser};
pub use reverb::{DarkReverb, PlateReverb, SpringReverb};
pub use spatial::Spatializer;

use crate::enums::FxType;
use crate::error::Result;
use crate::page::{param_page, Cells, CellsMut, PAGE_SIZE};

param_page! {
    /// Bypassed effect slot; defines no parameters
    Off, "off" {}
}

/// Typed view over one effect page, selected by effect type
#[derive(Debug)]
pub enum FxView<P> {
    Off(Off<P>),
    Filter(Filter<P>),
    Spatializer(Spatializer<P>),
    Delay(Delay<P>),
    Eq(ParametricEq<P>),
    DjEq(DjEq<P>),
    Phaser(Phaser<P>),
    Flanger(Flanger<P>),
    Chorus(Chorus<P>),
    CombFilter(CombFilter<P>),
    PlateReverb(PlateReverb<P>),
    SpringReverb(SpringReverb<P>),
    DarkReverb(DarkReverb<P>),
    Compressor(Compressor<P>),
    Lofi(Lofi<P>),
}

/// Run `$body` with `$v` bound to whichever family `$view` holds
macro_rules! each_family {
    ($view:expr, $v:ident => $body:expr) => {
        match $view {
            FxView::Off($v) => $body,
            FxView::Filter($v) => $body,
            FxView::Spatializer($v) => $body,
            FxView::Delay($v) => $body,
            FxView::Eq($v) => $body,
            FxView::DjEq($v) => $body,
            FxView::Phaser($v) => $body,
            FxView::Flanger($v) => $body,
            FxView::Chorus($v) => $body,
            FxView::CombFilter($v) => $body,
            FxView::PlateReverb($v) => $body,
            FxView::SpringReverb($v) => $body,
            FxView::DarkReverb($v) => $body,
            FxView::Compressor($v) => $body,
            FxView::Lofi($v) => $body,
        }
    };
}

impl<P> FxView<P> {
    /// Build the view for `fx_type` over `cells`
    pub fn new(fx_type: FxType, cells: P) -> Self {
        match fx_type {
            FxType::Off => Self::Off(Off::new(cells)),
            FxType::Filter => Self::Filter(Filter::new(cells)),
            FxType::Spatializer => Self::Spatializer(Spatializer::new(cells)),
            FxType::Delay => Self::Delay(Delay::new(cells)),
            FxType::Eq => Self::Eq(ParametricEq::new(cells)),
            FxType::DjEq => Self::DjEq(DjEq::new(cells)),
            FxType::Phaser => Self::Phaser(Phaser::new(cells)),
            FxType::Flanger => Self::Flanger(Flanger::new(cells)),
            FxType::Chorus => Self::Chorus(Chorus::new(cells)),
            FxType::CombFilter => Self::CombFilter(CombFilter::new(cells)),
            FxType::PlateReverb => Self::PlateReverb(PlateReverb::new(cells)),
            FxType::SpringReverb => Self::SpringReverb(SpringReverb::new(cells)),
            FxType::DarkReverb => Self::DarkReverb(DarkReverb::new(cells)),
            FxType::Compressor => Self::Compressor(Compressor::new(cells)),
            FxType::Lofi => Self::Lofi(Lofi::new(cells)),
        }
    }

    /// Effect type this view was built for
    pub fn fx_type(&self) -> FxType {
        match self {
            Self::Off(_) => FxType::Off,
            Self::Filter(_) => FxType::Filter,
            Self::Spatializer(_) => FxType::Spatializer,
            Self::Delay(_) => FxType::Delay,
            Self::Eq(_) => FxType::Eq,
            Self::DjEq(_) => FxType::DjEq,
            Self::Phaser(_) => FxType::Phaser,
            Self::Flanger(_) => FxType::Flanger,
            Self::Chorus(_) => FxType::Chorus,
            Self::CombFilter(_) => FxType::CombFilter,
            Self::PlateReverb(_) => FxType::PlateReverb,
            Self::SpringReverb(_) => FxType::SpringReverb,
            Self::DarkReverb(_) => FxType::DarkReverb,
            Self::Compressor(_) => FxType::Compressor,
            Self::Lofi(_) => FxType::Lofi,
        }
    }

    /// Parameter names by encoder slot; `None` marks an unused slot
    pub fn params(&self) -> [Option<&'static str>; PAGE_SIZE] {
        params_of(self.fx_type())
    }
}

impl<P: Cells> FxView<P> {
    /// Read a parameter by name, failing for names the family does not define
    pub fn get(&self, name: &str) -> Result<P::Value> {
        each_family!(self, v => v.get(name))
    }

    /// Every defined parameter with its current value
    pub fn values(&self) -> Vec<(&'static str, P::Value)> {
        self.params()
            .iter()
            .flatten()
            .filter_map(|&name| self.get(name).ok().map(|v| (name, v)))
            .collect()
    }
}

impl<P: CellsMut> FxView<P> {
    /// Write a parameter by name, failing for names the family does not define
    pub fn set(&mut self, name: &str, value: P::Value) -> Result<()> {
        each_family!(self, v => v.set(name, value))
    }
}

/// Parameter names of an effect type
pub fn params_of(fx_type: FxType) -> [Option<&'static str>; PAGE_SIZE] {
    match fx_type {
        FxType::Off => Off::<()>::PARAMS,
        FxType::Filter => Filter::<()>::PARAMS,
        FxType::Spatializer => Spatializer::<()>::PARAMS,
        FxType::Delay => Delay::<()>::PARAMS,
        FxType::Eq => ParametricEq::<()>::PARAMS,
        FxType::DjEq => DjEq::<()>::PARAMS,
        FxType::Phaser => Phaser::<()>::PARAMS,
        FxType::Flanger => Flanger::<()>::PARAMS,
        FxType::Chorus => Chorus::<()>::PARAMS,
        FxType::CombFilter => CombFilter::<()>::PARAMS,
        FxType::PlateReverb => PlateReverb::<()>::PARAMS,
        FxType::SpringReverb => SpringReverb::<()>::PARAMS,
        FxType::DarkReverb => DarkReverb::<()>::PARAMS,
        FxType::Compressor => Compressor::<()>::PARAMS,
        FxType::Lofi => Lofi::<()>::PARAMS,
    }
}

/// Factory parameter values loaded when an effect type is selected
pub fn defaults(fx_type: FxType) -> [u8; PAGE_SIZE] {
    match fx_type {
        FxType::Off => [0; PAGE_SIZE],
        FxType::Filter => filter::DEFAULTS,
        FxType::Spatializer => spatial::DEFAULTS,
        FxType::Delay => delay::DEFAULTS,
        FxType::Eq => eq::EQ_DEFAULTS,
        FxType::DjEq => eq::DJ_EQ_DEFAULTS,
        FxType::Phaser => modulation::PHASER_DEFAULTS,
        FxType::Flanger => modulation::FLANGER_DEFAULTS,
        FxType::Chorus => modulation::CHORUS_DEFAULTS,
        FxType::CombFilter => modulation::COMB_DEFAULTS,
        FxType::PlateReverb => reverb::PLATE_DEFAULTS,
        FxType::SpringReverb => reverb::SPRING_DEFAULTS,
        FxType::DarkReverb => reverb::DARK_DEFAULTS,
        FxType::Compressor => dynamics::DEFAULTS,
        FxType::Lofi => lofi::DEFAULTS,
    }
}
