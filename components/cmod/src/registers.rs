// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Packed register layouts. The model itself never works with these;
//! they only exist at the register boundary ([crate::Dif] and
//! [crate::Link::read_register]).

use modular_bitfield::{bitfield, specifiers::*};

#[bitfield]
#[repr(u32)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct StatusRegister {
    pub tx: bool,
    pub tx_full: bool,
    pub rx_full: bool,
    pub tx_empty: bool,
    pub tx_input_ready: bool,
    pub rx_valid: bool,
    pub tx_level: B3,
    pub rx_level: B3,
    pub rx_last: bool,
    #[skip]
    __: B19,
}

/// CTRL. The three signal bits are write-1 pulses and always read back 0.
#[bitfield]
#[repr(u32)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ControlRegister {
    pub tx_trigger: bool,
    pub tx_end: bool,
    pub rx_confirm: bool,
    pub tx_watermark: B2,
    pub rx_watermark: B2,
    #[skip]
    __: B25,
}
