//! Reverbs (FX2 only)

use crate::page::param_page;

param_page! {
    /// Plate reverb
    PlateReverb, "plate reverb" {
        0 => time / set_time,
        1 => damp / set_damp,
        2 => gate / set_gate,
        3 => high_pass / set_high_pass,
        4 => low_pass / set_low_pass,
        5 => mix / set_mix,
    }
}

param_page! {
    /// Spring reverb
    SpringReverb, "spring reverb" {
        0 => time / set_time,
        3 => high_pass / set_high_pass,
        4 => low_pass / set_low_pass,
        5 => mix / set_mix,
    }
}

param_page! {
    /// Dark reverb
    DarkReverb, "dark reverb" {
        0 => time / set_time,
        1 => shelving_gain / set_shelving_gain,
        2 => shelving_freq / set_shelving_freq,
        3 => high_pass / set_high_pass,
        4 => low_pass / set_low_pass,
        5 => mix / set_mix,
    }
}

pub(crate) const PLATE_DEFAULTS: [u8; 6] = [64, 64, 0, 0, 127, 32];
pub(crate) const SPRING_DEFAULTS: [u8; 6] = [64, 0, 0, 0, 127, 32];
pub(crate) const DARK_DEFAULTS: [u8; 6] = [64, 64, 64, 0, 127, 32];
