// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Structures shared by all simulated peripherals: bus time,
//! savestate serialization and the scenario test harness.

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", feature = "zstd"))]
extern crate std;

#[cfg(feature = "serde")]
pub mod serialize;
#[cfg(feature = "std")]
pub mod testing;

/// Time on a simulated bus, in cycles.
/// A `u64` does not wrap within any realistic simulation, so unlike
/// a scheduler clock it never needs rebasing.
pub type Time = u64;
