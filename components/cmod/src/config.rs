// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::Time;

/// Configuration used when creating a [crate::Link].
/// Watermarks can be changed at runtime afterwards; the rest cannot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_config", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde_config", serde(default))]
pub struct CmodConfig {
    /// TX watermark both instances start with.
    pub tx_watermark: usize,
    /// RX watermark both instances start with.
    pub rx_watermark: usize,
    /// Cycles a loaded block needs before it can reach the peer.
    /// 0 delivers on the same access that loaded it.
    pub link_latency: Time,
    /// Cycles charged for every register access on the link.
    pub access_cycles: Time,
    /// If save states should be compressed.
    pub compress_savestates: bool,
}

impl Default for CmodConfig {
    fn default() -> Self {
        Self {
            tx_watermark: 1,
            rx_watermark: 1,
            link_latency: 0,
            access_cycles: 1,
            compress_savestates: false,
        }
    }
}
