//! Dynamics

use crate::page::param_page;

param_page! {
    /// Compressor
    Compressor, "compressor" {
        0 => attack / set_attack,
        1 => release / set_release,
        2 => threshold / set_threshold,
        3 => ratio / set_ratio,
        4 => gain / set_gain,
        5 => mix / set_mix,
    }
}

pub(crate) const DEFAULTS: [u8; 6] = [16, 64, 96, 32, 0, 127];
