// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use arrayvec::ArrayVec;
use common::Time;

use crate::{Block, CmodConfig, CmodError, FIFO_DEPTH};

/// A block sitting in one of the FIFOs, together with the framing
/// information the link carries alongside it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub(crate) struct Entry {
    pub block: Block,
    /// Final block of its message.
    pub last: bool,
    /// Earliest link time at which this entry may cross to the peer.
    pub ready_at: Time,
}

/// Flow-control state of one CMOD instance.
///
/// Holds the two FIFOs, the framing phase and the last-block marker.
/// Movement between instances is done by [crate::Link]; everything in
/// here only ever touches one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FlowControl {
    pub(crate) tx: ArrayVec<Entry, FIFO_DEPTH>,
    pub(crate) rx: ArrayVec<Entry, FIFO_DEPTH>,
    tx_watermark: usize,
    rx_watermark: usize,
    message_open: bool,
    last_block_pending: bool,
    /// A block was loaded since the current message was opened.
    message_loaded: bool,
}

impl FlowControl {
    /// Create an instance in the empty / idle / clear state.
    pub fn new(config: &CmodConfig) -> Result<Self, CmodError> {
        let mut cmod = Self {
            tx: ArrayVec::new(),
            rx: ArrayVec::new(),
            tx_watermark: 1,
            rx_watermark: 1,
            message_open: false,
            last_block_pending: false,
            message_loaded: false,
        };
        cmod.set_tx_watermark(config.tx_watermark)?;
        cmod.set_rx_watermark(config.rx_watermark)?;
        Ok(cmod)
    }

    pub fn set_tx_watermark(&mut self, level: usize) -> Result<(), CmodError> {
        self.tx_watermark = check_watermark(level)?;
        Ok(())
    }

    pub fn set_rx_watermark(&mut self, level: usize) -> Result<(), CmodError> {
        self.rx_watermark = check_watermark(level)?;
        Ok(())
    }

    pub fn begin_message(&mut self) {
        if !self.message_open {
            log::debug!("CMOD message opened");
            self.message_open = true;
            self.message_loaded = false;
        }
    }

    /// Close the current message. Returns whether a block was loaded
    /// into it, in which case the newest such block has to be tagged final.
    pub(crate) fn close_message(&mut self) -> bool {
        let had_blocks = self.message_open && self.message_loaded;
        if self.message_open {
            log::debug!("CMOD message closed");
        }
        self.message_open = false;
        self.message_loaded = false;
        had_blocks
    }

    /// Tag the newest TX entry as final. Returns false if the TX FIFO
    /// is empty, meaning the block has already left for the peer.
    pub(crate) fn tag_tx_tail(&mut self) -> bool {
        match self.tx.last_mut() {
            Some(entry) => {
                entry.last = true;
                true
            }
            None => false,
        }
    }

    /// The peer ended a message whose final block already crossed the link.
    /// If it is still waiting in the RX FIFO it is tagged; if it was
    /// already read only the pending marker remains.
    pub(crate) fn mark_boundary(&mut self) {
        if let Some(entry) = self.rx.last_mut() {
            entry.last = true;
        }
        self.last_block_pending = true;
        log::debug!("CMOD last block pending ({} in RX)", self.rx.len());
    }

    pub fn confirm_last_block(&mut self) {
        if self.last_block_pending {
            log::debug!("CMOD last block confirmed");
            self.last_block_pending = false;
        }
    }

    /// Queue a block for transmission; it may leave at `ready_at`.
    pub(crate) fn push_tx(&mut self, block: Block, ready_at: Time) -> Result<(), CmodError> {
        if !self.message_open || self.tx.is_full() {
            return Err(CmodError::Unavailable);
        }
        self.tx.push(Entry {
            block,
            last: false,
            ready_at,
        });
        self.message_loaded = true;
        Ok(())
    }

    /// The oldest received block, if it may be read right now.
    pub(crate) fn peek_rx(&self) -> Result<&Block, CmodError> {
        match self.rx.first() {
            None => Err(CmodError::Unavailable),
            Some(entry) if entry.last && self.last_block_pending => Err(CmodError::Blocked),
            Some(entry) => Ok(&entry.block),
        }
    }

    pub(crate) fn pop_rx(&mut self) -> Result<Block, CmodError> {
        self.peek_rx()?;
        let entry = self.rx.pop_at(0).ok_or(CmodError::Unavailable)?;
        if entry.last {
            self.last_block_pending = false;
        }
        Ok(entry.block)
    }

    /// Whether this instance can take another block from the link.
    /// Nothing is accepted past a message boundary that has not been
    /// both read and confirmed.
    pub(crate) fn can_accept(&self) -> bool {
        !self.rx.is_full() && !self.last_block_pending && !self.rx.iter().any(|e| e.last)
    }

    /// Take a block off the link. Caller checks [Self::can_accept].
    pub(crate) fn accept(&mut self, entry: Entry) {
        if entry.last {
            self.last_block_pending = true;
            log::debug!("CMOD final block arrived");
        }
        self.rx.push(entry);
    }

    pub fn tx_level(&self) -> usize {
        self.tx.len()
    }

    pub fn rx_level(&self) -> usize {
        self.rx.len()
    }

    pub fn tx_watermark(&self) -> usize {
        self.tx_watermark
    }

    pub fn rx_watermark(&self) -> usize {
        self.rx_watermark
    }

    pub fn message_open(&self) -> bool {
        self.message_open
    }

    pub fn last_block_pending(&self) -> bool {
        self.last_block_pending
    }
}

pub(crate) fn check_watermark(level: usize) -> Result<usize, CmodError> {
    if (1..FIFO_DEPTH).contains(&level) {
        Ok(level)
    } else {
        Err(CmodError::InvalidArgument)
    }
}
