//! Machine playback (SRC) page views
//!
//! A Part stores one six-byte playback page per machine type for every track, so switching
//! machines keeps each machine's settings. Step p-locks and scene locks have a single
//! playback page whose meaning follows the machine currently assigned to the track.

use crate::enums::{
    LengthMode, LoopMode, MachineType, RateMode, SliceMode, TimestretchMode,
};
use crate::error::Result;
use crate::page::{param_page, Cells, CellsMut, PAGE_SIZE};

param_page! {
    /// Flex and Static playback page
    Sampler, "sampler" {
        0 => pitch / set_pitch,
        1 => start / set_start,
        2 => length / set_length,
        3 => rate / set_rate,
        4 => retrig / set_retrig,
        5 => retrig_time / set_retrig_time,
    }
}

param_page! {
    /// Thru machine playback page
    Thru, "thru" {
        0 => in_ab / set_in_ab,
        1 => vol_ab / set_vol_ab,
        3 => in_cd / set_in_cd,
        4 => vol_cd / set_vol_cd,
    }
}

param_page! {
    /// Neighbor machine; processes the previous track and has no playback parameters
    Neighbor, "neighbor" {}
}

param_page! {
    /// Pickup looper playback page
    Pickup, "pickup" {
        0 => pitch / set_pitch,
        1 => direction / set_direction,
        2 => length / set_length,
        4 => gain / set_gain,
        5 => operation / set_operation,
    }
}

param_page! {
    /// Flex and Static setup page (FUNC + SRC)
    SamplerSetup, "sampler setup" {
        0 => loop_raw / set_loop_raw,
        1 => slice_raw / set_slice_raw,
        2 => length_mode_raw / set_length_mode_raw,
        3 => rate_mode_raw / set_rate_mode_raw,
        4 => timestretch_raw / set_timestretch_raw,
        5 => timestretch_sensitivity / set_timestretch_sensitivity,
    }
}

impl<P: Cells<Value = u8>> SamplerSetup<P> {
    pub fn loop_mode(&self) -> Result<LoopMode> {
        LoopMode::from_u8(self.loop_raw())
    }

    pub fn slice_mode(&self) -> Result<SliceMode> {
        SliceMode::from_u8(self.slice_raw())
    }

    pub fn length_mode(&self) -> Result<LengthMode> {
        LengthMode::from_u8(self.length_mode_raw())
    }

    pub fn rate_mode(&self) -> Result<RateMode> {
        RateMode::from_u8(self.rate_mode_raw())
    }

    pub fn timestretch(&self) -> Result<TimestretchMode> {
        TimestretchMode::from_u8(self.timestretch_raw())
    }
}

impl<P: CellsMut<Value = u8>> SamplerSetup<P> {
    pub fn set_loop_mode(&mut self, mode: LoopMode) -> Result<()> {
        self.set_loop_raw(mode.as_u8())
    }

    pub fn set_slice_mode(&mut self, mode: SliceMode) -> Result<()> {
        self.set_slice_raw(mode.as_u8())
    }

    pub fn set_length_mode(&mut self, mode: LengthMode) -> Result<()> {
        self.set_length_mode_raw(mode.as_u8())
    }

    pub fn set_rate_mode(&mut self, mode: RateMode) -> Result<()> {
        self.set_rate_mode_raw(mode.as_u8())
    }

    pub fn set_timestretch(&mut self, mode: TimestretchMode) -> Result<()> {
        self.set_timestretch_raw(mode.as_u8())
    }
}

/// Playback page view selected by machine type
#[derive(Debug)]
pub enum MachineView<P> {
    Static(Sampler<P>),
    Flex(Sampler<P>),
    Thru(Thru<P>),
    Neighbor(Neighbor<P>),
    Pickup(Pickup<P>),
}

impl<P> MachineView<P> {
    /// Build the view for `machine` over `cells`
    pub fn new(machine: MachineType, cells: P) -> Self {
        match machine {
            MachineType::Static => Self::Static(Sampler::new(cells)),
            MachineType::Flex => Self::Flex(Sampler::new(cells)),
            MachineType::Thru => Self::Thru(Thru::new(cells)),
            MachineType::Neighbor => Self::Neighbor(Neighbor::new(cells)),
            MachineType::Pickup => Self::Pickup(Pickup::new(cells)),
        }
    }

    pub fn machine_type(&self) -> MachineType {
        match self {
            Self::Static(_) => MachineType::Static,
            Self::Flex(_) => MachineType::Flex,
            Self::Thru(_) => MachineType::Thru,
            Self::Neighbor(_) => MachineType::Neighbor,
            Self::Pickup(_) => MachineType::Pickup,
        }
    }

    /// Parameter names by encoder slot; `None` marks an unused slot
    pub fn params(&self) -> [Option<&'static str>; PAGE_SIZE] {
        params_of(self.machine_type())
    }
}

impl<P: Cells> MachineView<P> {
    /// Read a playback parameter by name
    pub fn get(&self, name: &str) -> Result<P::Value> {
        match self {
            Self::Static(v) | Self::Flex(v) => v.get(name),
            Self::Thru(v) => v.get(name),
            Self::Neighbor(v) => v.get(name),
            Self::Pickup(v) => v.get(name),
        }
    }
}

impl<P: CellsMut> MachineView<P> {
    /// Write a playback parameter by name
    pub fn set(&mut self, name: &str, value: P::Value) -> Result<()> {
        match self {
            Self::Static(v) | Self::Flex(v) => v.set(name, value),
            Self::Thru(v) => v.set(name, value),
            Self::Neighbor(v) => v.set(name, value),
            Self::Pickup(v) => v.set(name, value),
        }
    }
}

/// Playback parameter names of a machine
pub fn params_of(machine: MachineType) -> [Option<&'static str>; PAGE_SIZE] {
    match machine {
        MachineType::Static | MachineType::Flex => Sampler::<()>::PARAMS,
        MachineType::Thru => Thru::<()>::PARAMS,
        MachineType::Neighbor => Neighbor::<()>::PARAMS,
        MachineType::Pickup => Pickup::<()>::PARAMS,
    }
}

/// Index of a machine's page within a track's 30-byte machine block
pub(crate) fn page_index(machine: MachineType) -> usize {
    usize::from(machine.as_u8()) * PAGE_SIZE
}

/// Factory playback values
pub fn default_values(machine: MachineType) -> [u8; PAGE_SIZE] {
    match machine {
        MachineType::Static | MachineType::Flex => [64, 0, 0, 127, 0, 79],
        MachineType::Thru => [0, 64, 0, 0, 64, 0],
        MachineType::Neighbor => [0; PAGE_SIZE],
        MachineType::Pickup => [64, 2, 1, 0, 64, 1],
    }
}

/// Factory setup values
pub fn default_setup(machine: MachineType) -> [u8; PAGE_SIZE] {
    match machine {
        MachineType::Static | MachineType::Flex => [
            LoopMode::Auto.as_u8(),
            SliceMode::Off.as_u8(),
            LengthMode::Off.as_u8(),
            RateMode::Pitch.as_u8(),
            TimestretchMode::Auto.as_u8(),
            64,
        ],
        _ => [0; PAGE_SIZE],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Values;
    use crate::OctaError;

    #[test]
    fn test_sampler_names() {
        let view = MachineView::new(
            MachineType::Flex,
            Values::new(default_values(MachineType::Flex).to_vec()),
        );
        assert_eq!(view.get("rate").unwrap(), 127);
        assert_eq!(view.machine_type(), MachineType::Flex);
    }

    #[test]
    fn test_neighbor_has_no_parameters() {
        let view = MachineView::new(MachineType::Neighbor, Values::new(vec![0u8; PAGE_SIZE]));
        assert!(matches!(
            view.get("pitch"),
            Err(OctaError::UnsupportedParameter { family: "neighbor", .. })
        ));
    }

    #[test]
    fn test_thru_gaps() {
        assert_eq!(params_of(MachineType::Thru)[2], None);
        assert_eq!(params_of(MachineType::Thru)[3], Some("in_cd"));
        let mut view = MachineView::new(MachineType::Thru, Values::new(vec![0u8; PAGE_SIZE]));
        assert!(view.set("start", 10).is_err());
        view.set("vol_cd", 100).unwrap();
        assert_eq!(view.get("vol_cd").unwrap(), 100);
    }

    #[test]
    fn test_setup_enums() {
        let mut setup = SamplerSetup::new(Values::new(default_setup(MachineType::Flex).to_vec()));
        assert_eq!(setup.loop_mode().unwrap(), LoopMode::Auto);
        setup.set_length_mode(LengthMode::Time).unwrap();
        assert_eq!(setup.length_mode().unwrap(), LengthMode::Time);
        assert_eq!(setup.timestretch_sensitivity(), 64);
    }

    #[test]
    fn test_page_index() {
        assert_eq!(page_index(MachineType::Static), 0);
        assert_eq!(page_index(MachineType::Flex), 6);
        assert_eq!(page_index(MachineType::Pickup), 24);
    }
}
