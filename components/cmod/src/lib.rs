// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Reference model of the CMOD block FIFO: two peripheral instances
//! exchanging fixed-size blocks over a duplex link, with message framing
//! and last-block confirmation.
//!
//! The model ([Link]) can be driven directly through [Endpoint] handles,
//! or at register level through the [Dif] driver bound to a [SimPort].
//! Both implement [Cmod], so firmware-side logic like [wait_for] is
//! written once for either.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod addr;
mod config;
mod dif;
mod error;
mod link;
mod mmio;
mod poll;
mod port;
pub mod registers;
mod state;
mod status;

pub use common::Time;
pub use config::CmodConfig;
pub use dif::Dif;
pub use error::CmodError;
pub use link::{Endpoint, Link, Side};
pub use poll::wait_for;
pub use port::{RegisterPort, SimPort};
pub use state::FlowControl;
pub use status::{Status, StatusFlag};

/// Depth of both the TX and RX FIFO, in blocks.
pub const FIFO_DEPTH: usize = 4;
/// Size of one block, in 32-bit words.
pub const BLOCK_WORDS: usize = 4;

/// One unit of payload moved through the FIFOs.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Block(pub [u32; BLOCK_WORDS]);

impl Block {
    pub fn words(&self) -> &[u32; BLOCK_WORDS] {
        &self.0
    }
}

impl From<[u32; BLOCK_WORDS]> for Block {
    fn from(words: [u32; BLOCK_WORDS]) -> Self {
        Self(words)
    }
}

/// Operations of one CMOD instance, as seen by the software driving it.
///
/// `load_data` and `read_data` never wait: they return
/// [CmodError::Unavailable] when the FIFO is not ready, and `read_data`
/// returns [CmodError::Blocked] when the next block ends a message that
/// has not been confirmed yet.
pub trait Cmod {
    /// Set the TX watermark. Valid levels are `1..FIFO_DEPTH`.
    fn set_tx_watermark(&mut self, level: usize) -> Result<(), CmodError>;
    /// Set the RX watermark. Valid levels are `1..FIFO_DEPTH`.
    fn set_rx_watermark(&mut self, level: usize) -> Result<(), CmodError>;

    /// Start a new message. Does nothing if one is already open.
    fn begin_message(&mut self);
    /// End the current message, marking the last block loaded into it
    /// as the final block on the receiving side.
    fn end_message(&mut self);
    /// Acknowledge the final block of a received message.
    /// Does nothing if no final block is pending.
    fn confirm_last_block(&mut self);

    /// Queue one block for transmission.
    fn load_data(&mut self, block: Block) -> Result<(), CmodError>;
    /// Take the oldest received block.
    fn read_data(&mut self) -> Result<Block, CmodError>;

    /// Read the current status. Never cached.
    fn status(&mut self) -> Status;
    /// Current time of the bus this instance sits on.
    fn now(&self) -> Time;
}
