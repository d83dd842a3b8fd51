//! Equalizers

use crate::page::param_page;

param_page! {
    /// Two-band parametric EQ
    ParametricEq, "eq" {
        0 => freq1 / set_freq1,
        1 => gain1 / set_gain1,
        2 => q1 / set_q1,
        3 => freq2 / set_freq2,
        4 => gain2 / set_gain2,
        5 => q2 / set_q2,
    }
}

param_page! {
    /// DJ-style kill EQ
    DjEq, "dj eq" {
        0 => ls_freq / set_ls_freq,
        2 => hs_freq / set_hs_freq,
        3 => low_gain / set_low_gain,
        4 => mid_gain / set_mid_gain,
        5 => high_gain / set_high_gain,
    }
}

pub(crate) const EQ_DEFAULTS: [u8; 6] = [32, 64, 64, 96, 64, 64];
pub(crate) const DJ_EQ_DEFAULTS: [u8; 6] = [32, 0, 96, 64, 64, 64];
