// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

#[cfg(feature = "serde")]
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use common::serialize::{self, StateError};
use common::Time;

use crate::{Block, Cmod, CmodConfig, CmodError, FlowControl, Status, BLOCK_WORDS};

/// A device that exists once per CMOD instance on the link.
pub type CmodDevice<T> = [T; 2];

/// One of the two instances on a link.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Side {
    Cmod0,
    Cmod1,
}

impl Side {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn peer(self) -> Side {
        match self {
            Side::Cmod0 => Side::Cmod1,
            Side::Cmod1 => Side::Cmod0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CMOD{}", self.index())
    }
}

/// Two CMOD instances joined by a duplex link.
///
/// The link owns both instances and the cycle clock. Blocks cross from
/// one TX FIFO into the other RX FIFO whenever time moves or state
/// changes, in order and without loss: a block that cannot be accepted
/// stays in the sender's TX FIFO.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Link {
    cmod: CmodDevice<FlowControl>,
    /// Words staged in WDATA0..2, waiting for the WDATA3 write.
    pub(crate) wdata: CmodDevice<[u32; BLOCK_WORDS]>,
    time: Time,

    #[cfg_attr(feature = "serde", serde(skip))]
    config: CmodConfig,
}

impl Link {
    pub fn new(config: CmodConfig) -> Result<Self, CmodError> {
        let instance = FlowControl::new(&config)?;
        Ok(Self {
            cmod: [instance.clone(), instance],
            wdata: [[0; BLOCK_WORDS]; 2],
            time: 0,
            config,
        })
    }

    /// Handle to drive one instance through the [Cmod] operations.
    pub fn endpoint(&mut self, side: Side) -> Endpoint<'_> {
        Endpoint { link: self, side }
    }

    pub fn instance(&self, side: Side) -> &FlowControl {
        &self.cmod[side.index()]
    }

    /// Status of an instance. Unlike [Cmod::status], this is free.
    pub fn status(&self, side: Side) -> Status {
        Status::project(self.instance(side))
    }

    pub fn config(&self) -> &CmodConfig {
        &self.config
    }

    pub fn now(&self) -> Time {
        self.time
    }

    /// Let time pass, delivering everything that becomes ready.
    pub fn advance(&mut self, cycles: Time) {
        self.time = self.time.saturating_add(cycles);
        self.pump();
    }

    /// Charge one register access.
    pub(crate) fn access(&mut self) {
        self.advance(self.config.access_cycles);
    }

    /// Return both instances to their initial state.
    /// Configuration and time are kept.
    pub fn reset(&mut self) {
        log::info!("Resetting CMOD link");
        let Ok(instance) = FlowControl::new(&self.config) else {
            // The config was validated in `new` and cannot change since.
            return;
        };
        self.cmod = [instance.clone(), instance];
        self.wdata = [[0; BLOCK_WORDS]; 2];
    }

    pub fn log_status(&self, side: Side) {
        self.status(side).log(&alloc::format!("{side}"));
    }

    pub(crate) fn set_tx_watermark(&mut self, side: Side, level: usize) -> Result<(), CmodError> {
        self.cmod[side.index()].set_tx_watermark(level)
    }

    pub(crate) fn set_rx_watermark(&mut self, side: Side, level: usize) -> Result<(), CmodError> {
        self.cmod[side.index()].set_rx_watermark(level)
    }

    pub(crate) fn begin_message(&mut self, side: Side) {
        self.cmod[side.index()].begin_message();
    }

    pub(crate) fn end_message(&mut self, side: Side) {
        let (local, remote) = self.pair_mut(side);
        if local.close_message() && !local.tag_tx_tail() {
            // Final block already crossed the link.
            remote.mark_boundary();
        }
        self.pump();
    }

    pub(crate) fn confirm_last_block(&mut self, side: Side) {
        self.cmod[side.index()].confirm_last_block();
        self.pump();
    }

    pub(crate) fn load_data(&mut self, side: Side, block: Block) -> Result<(), CmodError> {
        let ready_at = self.time.saturating_add(self.config.link_latency);
        self.cmod[side.index()].push_tx(block, ready_at)?;
        log::trace!("{side} loaded {block:X?}");
        self.pump();
        Ok(())
    }

    pub(crate) fn peek_data(&self, side: Side) -> Result<&Block, CmodError> {
        self.cmod[side.index()].peek_rx()
    }

    pub(crate) fn read_data(&mut self, side: Side) -> Result<Block, CmodError> {
        let block = self.cmod[side.index()].pop_rx()?;
        log::trace!("{side} read {block:X?}");
        self.pump();
        Ok(block)
    }

    fn pump(&mut self) {
        self.deliver(Side::Cmod0);
        self.deliver(Side::Cmod1);
    }

    /// Move ready blocks from `from`'s TX FIFO into its peer's RX FIFO.
    fn deliver(&mut self, from: Side) {
        let now = self.time;
        let (local, remote) = self.pair_mut(from);
        while local.tx.first().is_some_and(|e| e.ready_at <= now) && remote.can_accept() {
            let Some(entry) = local.tx.pop_at(0) else {
                break;
            };
            log::trace!("{from} -> {}: {:X?}", from.peer(), entry.block);
            remote.accept(entry);
        }
    }

    fn pair_mut(&mut self, side: Side) -> (&mut FlowControl, &mut FlowControl) {
        let (a, b) = self.cmod.split_at_mut(1);
        match side {
            Side::Cmod0 => (&mut a[0], &mut b[0]),
            Side::Cmod1 => (&mut b[0], &mut a[0]),
        }
    }

    /// Create a save state that can be loaded with [Link::load_state].
    #[cfg(feature = "serde")]
    pub fn save_state(&self) -> Result<Vec<u8>, StateError> {
        serialize::serialize(self, self.config.compress_savestates)
    }

    /// Load a state produced by [Link::save_state].
    /// The current configuration is kept.
    #[cfg(feature = "serde")]
    pub fn load_state(&mut self, state: &[u8]) -> Result<(), StateError> {
        let new = serialize::deserialize(state, self.config.compress_savestates)?;
        let old = core::mem::replace(self, new);
        self.restore_from(old);
        Ok(())
    }

    #[cfg(feature = "serde")]
    fn restore_from(&mut self, old: Self) {
        self.config = old.config;
    }
}

/// One instance of a [Link], borrowed for driving it.
/// Every operation costs one register access worth of cycles.
pub struct Endpoint<'a> {
    link: &'a mut Link,
    side: Side,
}

impl Endpoint<'_> {
    pub fn side(&self) -> Side {
        self.side
    }
}

impl Cmod for Endpoint<'_> {
    fn set_tx_watermark(&mut self, level: usize) -> Result<(), CmodError> {
        self.link.access();
        self.link.set_tx_watermark(self.side, level)
    }

    fn set_rx_watermark(&mut self, level: usize) -> Result<(), CmodError> {
        self.link.access();
        self.link.set_rx_watermark(self.side, level)
    }

    fn begin_message(&mut self) {
        self.link.access();
        self.link.begin_message(self.side);
    }

    fn end_message(&mut self) {
        self.link.access();
        self.link.end_message(self.side);
    }

    fn confirm_last_block(&mut self) {
        self.link.access();
        self.link.confirm_last_block(self.side);
    }

    fn load_data(&mut self, block: Block) -> Result<(), CmodError> {
        self.link.access();
        self.link.load_data(self.side, block)
    }

    fn read_data(&mut self) -> Result<Block, CmodError> {
        self.link.access();
        self.link.read_data(self.side)
    }

    fn status(&mut self) -> Status {
        self.link.access();
        self.link.status(self.side)
    }

    fn now(&self) -> Time {
        self.link.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> Link {
        Link::new(CmodConfig::default()).unwrap()
    }

    fn block(n: u32) -> Block {
        Block([n, n + 1, n + 2, n + 3])
    }

    #[test]
    fn test_side_peer() {
        assert_eq!(Side::Cmod0.peer(), Side::Cmod1);
        assert_eq!(Side::Cmod1.peer().peer(), Side::Cmod1);
        assert_eq!(Side::Cmod1.index(), 1);
    }

    #[test]
    fn test_immediate_delivery() {
        let mut link = link();
        let mut tx = link.endpoint(Side::Cmod0);
        tx.begin_message();
        tx.load_data(block(0)).unwrap();

        assert_eq!(link.instance(Side::Cmod0).tx_level(), 0);
        assert_eq!(link.instance(Side::Cmod1).rx_level(), 1);
        assert_eq!(link.endpoint(Side::Cmod1).read_data(), Ok(block(0)));
    }

    #[test]
    fn test_latency_holds_block_in_tx() {
        let mut link = Link::new(CmodConfig {
            link_latency: 10,
            ..CmodConfig::default()
        })
        .unwrap();
        let mut tx = link.endpoint(Side::Cmod0);
        tx.begin_message();
        tx.load_data(block(0)).unwrap();
        assert_eq!(link.instance(Side::Cmod0).tx_level(), 1);

        link.advance(9);
        assert_eq!(link.instance(Side::Cmod1).rx_level(), 0);
        link.advance(1);
        assert_eq!(link.instance(Side::Cmod0).tx_level(), 0);
        assert_eq!(link.instance(Side::Cmod1).rx_level(), 1);
    }

    #[test]
    fn test_huge_latency_saturates() {
        let mut link = Link::new(CmodConfig {
            link_latency: Time::MAX,
            ..CmodConfig::default()
        })
        .unwrap();
        let mut tx = link.endpoint(Side::Cmod0);
        tx.begin_message();
        tx.load_data(block(0)).unwrap();

        link.advance(1_000_000);
        assert_eq!(link.instance(Side::Cmod0).tx_level(), 1);
        assert_eq!(link.instance(Side::Cmod1).rx_level(), 0);

        // The clock stops at the end of time, where the block is due.
        link.advance(Time::MAX);
        link.advance(Time::MAX);
        assert_eq!(link.now(), Time::MAX);
        assert_eq!(link.instance(Side::Cmod1).rx_level(), 1);
    }

    #[test]
    fn test_operations_charge_cycles() {
        let mut link = Link::new(CmodConfig {
            access_cycles: 3,
            ..CmodConfig::default()
        })
        .unwrap();
        let mut cmod = link.endpoint(Side::Cmod1);
        cmod.status();
        cmod.begin_message();
        assert_eq!(cmod.now(), 6);
        assert_eq!(link.status(Side::Cmod1).tx_level, 0);
        assert_eq!(link.now(), 6);
    }

    #[test]
    fn test_both_directions_are_independent() {
        let mut link = link();
        link.endpoint(Side::Cmod0).begin_message();
        link.endpoint(Side::Cmod1).begin_message();
        link.endpoint(Side::Cmod0).load_data(block(0)).unwrap();
        link.endpoint(Side::Cmod1).load_data(block(10)).unwrap();

        assert_eq!(link.endpoint(Side::Cmod1).read_data(), Ok(block(0)));
        assert_eq!(link.endpoint(Side::Cmod0).read_data(), Ok(block(10)));
    }

    #[test]
    fn test_end_tags_block_still_in_tx() {
        let mut link = link();
        link.endpoint(Side::Cmod0).begin_message();
        // Four fill CMOD1's RX, the rest queue up in TX.
        for n in 0..6 {
            link.endpoint(Side::Cmod0).load_data(block(n)).unwrap();
        }
        link.endpoint(Side::Cmod0).end_message();
        assert_eq!(link.instance(Side::Cmod0).tx_level(), 2);
        assert!(!link.status(Side::Cmod1).rx_last);

        let mut rx = link.endpoint(Side::Cmod1);
        for n in 0..5 {
            assert_eq!(rx.read_data(), Ok(block(n)));
        }
        assert!(rx.status().rx_last);
        assert_eq!(rx.read_data(), Err(CmodError::Blocked));
        rx.confirm_last_block();
        assert_eq!(rx.read_data(), Ok(block(5)));
        assert!(!rx.status().rx_last);
    }

    #[test]
    fn test_empty_message_has_no_boundary() {
        let mut link = link();
        let mut tx = link.endpoint(Side::Cmod0);
        tx.begin_message();
        tx.end_message();
        assert!(!tx.status().tx_active);
        assert!(!link.status(Side::Cmod1).rx_last);
    }

    #[test]
    fn test_reset_keeps_config() {
        let config = CmodConfig {
            tx_watermark: 2,
            ..CmodConfig::default()
        };
        let mut link = Link::new(config.clone()).unwrap();
        link.endpoint(Side::Cmod0).set_tx_watermark(3).unwrap();
        link.endpoint(Side::Cmod0).begin_message();
        link.endpoint(Side::Cmod0).load_data(block(0)).unwrap();

        link.reset();
        assert_eq!(link.config(), &config);
        assert_eq!(link.instance(Side::Cmod0).tx_watermark(), 2);
        assert!(!link.status(Side::Cmod0).tx_active);
        assert!(!link.status(Side::Cmod1).rx_valid);
    }

    #[test]
    fn test_invalid_config() {
        let config = CmodConfig {
            tx_watermark: 4,
            ..CmodConfig::default()
        };
        assert!(matches!(Link::new(config), Err(CmodError::InvalidArgument)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_savestate_keeps_fifo_contents() {
        let mut link = link();
        link.endpoint(Side::Cmod0).begin_message();
        link.endpoint(Side::Cmod0).load_data(block(7)).unwrap();
        link.endpoint(Side::Cmod0).end_message();
        let state = link.save_state().unwrap();

        link.reset();
        link.load_state(&state).unwrap();
        assert!(link.status(Side::Cmod1).rx_last);
        link.endpoint(Side::Cmod1).confirm_last_block();
        assert_eq!(link.endpoint(Side::Cmod1).read_data(), Ok(block(7)));
    }
}
