// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Register offsets of one CMOD instance, relative to its base.

// Interrupts
pub const INTR_STATE: u32 = 0x00;
pub const INTR_ENABLE: u32 = 0x04;
pub const INTR_TEST: u32 = 0x08;
pub const ALERT_TEST: u32 = 0x0C;

// Control / status
pub const CTRL: u32 = 0x10;
pub const STATUS: u32 = 0x14;

// Data windows, one block each
pub const WDATA_0: u32 = 0x18;
pub const WDATA_1: u32 = 0x1C;
pub const WDATA_2: u32 = 0x20;
pub const WDATA_3: u32 = 0x24;
pub const RDATA_0: u32 = 0x28;
pub const RDATA_1: u32 = 0x2C;
pub const RDATA_2: u32 = 0x30;
pub const RDATA_3: u32 = 0x34;

/// Offsets of the block-wide data windows, in word order.
pub const WDATA: [u32; 4] = [WDATA_0, WDATA_1, WDATA_2, WDATA_3];
pub const RDATA: [u32; 4] = [RDATA_0, RDATA_1, RDATA_2, RDATA_3];
