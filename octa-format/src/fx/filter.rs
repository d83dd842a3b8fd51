//! Multimode filter

use crate::page::param_page;

param_page! {
    /// Multimode filter with envelope
    Filter, "filter" {
        0 => base / set_base,
        1 => width / set_width,
        2 => q / set_q,
        3 => depth / set_depth,
        4 => attack / set_attack,
        5 => decay / set_decay,
    }
}

pub(crate) const DEFAULTS: [u8; 6] = [0, 127, 0, 64, 0, 64];
