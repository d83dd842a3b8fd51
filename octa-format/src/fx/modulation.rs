//! Modulation effects: phaser, flanger, chorus and comb filter

use crate::page::param_page;

param_page! {
    /// Phaser
    Phaser, "phaser" {
        0 => center / set_center,
        1 => depth / set_depth,
        2 => spread / set_spread,
        3 => feedback / set_feedback,
        4 => width / set_width,
        5 => mix / set_mix,
    }
}

param_page! {
    /// Flanger
    Flanger, "flanger" {
        0 => delay / set_delay,
        1 => depth / set_depth,
        2 => spread / set_spread,
        3 => feedback / set_feedback,
        4 => width / set_width,
        5 => mix / set_mix,
    }
}

param_page! {
    /// Chorus
    Chorus, "chorus" {
        0 => delay / set_delay,
        1 => depth / set_depth,
        2 => spread / set_spread,
        3 => feedback / set_feedback,
        4 => width / set_width,
        5 => mix / set_mix,
    }
}

param_page! {
    /// Tuned comb filter
    CombFilter, "comb filter" {
        0 => pitch / set_pitch,
        1 => tune / set_tune,
        2 => low_pass / set_low_pass,
        3 => feedback / set_feedback,
        5 => mix / set_mix,
    }
}

pub(crate) const PHASER_DEFAULTS: [u8; 6] = [64, 0, 32, 64, 127, 64];
pub(crate) const FLANGER_DEFAULTS: [u8; 6] = [0, 0, 32, 64, 127, 64];
pub(crate) const CHORUS_DEFAULTS: [u8; 6] = [32, 0, 32, 0, 127, 64];
pub(crate) const COMB_DEFAULTS: [u8; 6] = [64, 64, 127, 96, 0, 64];
