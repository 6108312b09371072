// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use crate::{registers::StatusRegister, FlowControl, FIFO_DEPTH};

/// A single status flag, for waiting on one condition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusFlag {
    TxFull,
    TxEmpty,
    /// A message is currently being sent.
    Tx,
    TxInputReady,
    RxFull,
    RxValid,
    RxLast,
}

/// Observable status of one instance.
/// Always computed fresh from the flow-control state; never store one
/// and expect it to stay accurate.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Status {
    pub tx_active: bool,
    pub tx_full: bool,
    pub tx_empty: bool,
    pub tx_input_ready: bool,
    pub rx_full: bool,
    pub rx_valid: bool,
    pub rx_last: bool,
    pub tx_level: usize,
    pub rx_level: usize,
}

impl Status {
    pub fn project(state: &FlowControl) -> Self {
        let tx_level = state.tx_level();
        let rx_level = state.rx_level();
        let tx_full = tx_level == FIFO_DEPTH;
        Self {
            tx_active: state.message_open(),
            tx_full,
            tx_empty: tx_level == 0,
            tx_input_ready: state.message_open() && !tx_full,
            rx_full: rx_level == FIFO_DEPTH,
            rx_valid: rx_level > 0,
            rx_last: state.last_block_pending(),
            tx_level,
            rx_level,
        }
    }

    pub fn get(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::TxFull => self.tx_full,
            StatusFlag::TxEmpty => self.tx_empty,
            StatusFlag::Tx => self.tx_active,
            StatusFlag::TxInputReady => self.tx_input_ready,
            StatusFlag::RxFull => self.rx_full,
            StatusFlag::RxValid => self.rx_valid,
            StatusFlag::RxLast => self.rx_last,
        }
    }

    /// Free slots in the TX FIFO.
    pub fn tx_blocks_available(&self) -> usize {
        FIFO_DEPTH - self.tx_level
    }

    /// Free slots in the RX FIFO.
    pub fn rx_blocks_available(&self) -> usize {
        FIFO_DEPTH - self.rx_level
    }

    /// Pack into a STATUS word. Levels are clamped to [FIFO_DEPTH].
    pub fn to_register(&self) -> u32 {
        StatusRegister::new()
            .with_tx(self.tx_active)
            .with_tx_full(self.tx_full)
            .with_rx_full(self.rx_full)
            .with_tx_empty(self.tx_empty)
            .with_tx_input_ready(self.tx_input_ready)
            .with_rx_valid(self.rx_valid)
            .with_tx_level(self.tx_level.min(FIFO_DEPTH) as u8)
            .with_rx_level(self.rx_level.min(FIFO_DEPTH) as u8)
            .with_rx_last(self.rx_last)
            .into()
    }

    /// Unpack a raw STATUS word. Levels above [FIFO_DEPTH] are clamped,
    /// since the field is wider than the FIFO is deep.
    pub fn from_register(value: u32) -> Self {
        let reg = StatusRegister::from(value);
        Self {
            tx_active: reg.tx(),
            tx_full: reg.tx_full(),
            tx_empty: reg.tx_empty(),
            tx_input_ready: reg.tx_input_ready(),
            rx_full: reg.rx_full(),
            rx_valid: reg.rx_valid(),
            rx_last: reg.rx_last(),
            tx_level: (reg.tx_level() as usize).min(FIFO_DEPTH),
            rx_level: (reg.rx_level() as usize).min(FIFO_DEPTH),
        }
    }

    /// Dump the flags to the log, TX side first.
    pub fn log(&self, label: &str) {
        log::info!(
            "{label} TX: active={} full={} empty={} input_ready={} level={}",
            self.tx_active as u8,
            self.tx_full as u8,
            self.tx_empty as u8,
            self.tx_input_ready as u8,
            self.tx_level
        );
        log::info!(
            "{label} RX: full={} valid={} last={} level={}",
            self.rx_full as u8,
            self.rx_valid as u8,
            self.rx_last as u8,
            self.rx_level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Block, CmodConfig};

    fn state() -> FlowControl {
        FlowControl::new(&CmodConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_status() {
        let status = Status::project(&state());
        assert!(status.tx_empty);
        assert!(!status.tx_active);
        assert!(!status.tx_input_ready);
        assert!(!status.rx_valid);
        assert!(!status.rx_last);
        assert_eq!(status.tx_blocks_available(), FIFO_DEPTH);
        assert_eq!(status.rx_blocks_available(), FIFO_DEPTH);
    }

    #[test]
    fn test_input_ready_follows_framing_and_fill() {
        let mut state = state();
        state.begin_message();
        assert!(Status::project(&state).tx_input_ready);
        for n in 0..4 {
            state.push_tx(Block([n; 4]), 0).unwrap();
        }
        let status = Status::project(&state);
        assert!(status.tx_full);
        assert!(status.tx_active);
        assert!(!status.tx_input_ready);
        assert!(status.get(StatusFlag::TxFull));
        assert_eq!(status.tx_level, 4);
    }

    #[test]
    fn test_register_word() {
        let mut state = state();
        state.begin_message();
        state.push_tx(Block([1; 4]), 0).unwrap();
        let status = Status::project(&state);

        let word = status.to_register();
        // TX, TXINPUT_READY, TXLVL=1
        assert_eq!(word, 0b001_000000 | 0b10000 | 0b1);
        assert_eq!(Status::from_register(word), status);
    }

    #[test]
    fn test_oversized_level_is_clamped() {
        let status = Status::from_register(0b111 << 9);
        assert_eq!(status.rx_level, FIFO_DEPTH);
        assert_eq!(status.rx_blocks_available(), 0);
    }

    #[test]
    fn test_oversized_level_packs_clamped() {
        let status = Status {
            tx_level: 8,
            rx_level: 300,
            ..Status::default()
        };
        let word = status.to_register();
        assert_eq!(word, (4 << 6) | (4 << 9));
        let back = Status::from_register(word);
        assert_eq!((back.tx_level, back.rx_level), (FIFO_DEPTH, FIFO_DEPTH));
    }
}
