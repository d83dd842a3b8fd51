//! Lo-fi collection

use crate::page::param_page;

param_page! {
    /// Distortion, amplitude modulation, sample-rate and bit reduction
    Lofi, "lofi" {
        0 => distortion / set_distortion,
        2 => am_freq / set_am_freq,
        3 => sample_rate_reduction / set_sample_rate_reduction,
        4 => bit_reduction / set_bit_reduction,
        5 => am_depth / set_am_depth,
    }
}

pub(crate) const DEFAULTS: [u8; 6] = [0, 0, 0, 127, 127, 0];
