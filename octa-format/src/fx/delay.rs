//! Echo freeze delay (FX2 only)

use crate::page::param_page;

param_page! {
    /// Delay line with feedback filter
    Delay, "delay" {
        0 => time / set_time,
        1 => feedback / set_feedback,
        2 => volume / set_volume,
        3 => base / set_base,
        4 => width / set_width,
        5 => send / set_send,
    }
}

pub(crate) const DEFAULTS: [u8; 6] = [24, 64, 64, 0, 127, 0];
