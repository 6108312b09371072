// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::Time;

use crate::{Cmod, CmodError, StatusFlag};

/// Busy-poll the status until `flag` reads as `expected`.
///
/// `timeout` is in bus cycles. Every poll counts as at least one cycle,
/// so this also terminates on a bus whose clock does not move.
pub fn wait_for<C: Cmod + ?Sized>(
    cmod: &mut C,
    flag: StatusFlag,
    expected: bool,
    timeout: Time,
) -> Result<(), CmodError> {
    let start = cmod.now();
    let mut polls: Time = 0;
    loop {
        if cmod.status().get(flag) == expected {
            return Ok(());
        }
        polls += 1;
        let elapsed = cmod.now().saturating_sub(start).max(polls);
        if elapsed >= timeout {
            log::debug!("Timed out waiting for {flag:?} == {expected} after {elapsed} cycles");
            return Err(CmodError::Timeout);
        }
    }
}
