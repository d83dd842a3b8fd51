//! Stereo spatializer

use crate::page::param_page;

param_page! {
    /// Stereo width, filtering and send
    Spatializer, "spatializer" {
        0 => input / set_input,
        1 => depth / set_depth,
        2 => width / set_width,
        3 => high_pass / set_high_pass,
        4 => low_pass / set_low_pass,
        5 => send / set_send,
    }
}

pub(crate) const DEFAULTS: [u8; 6] = [127, 0, 127, 0, 127, 0];
