// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Register window of each instance on a [Link].

use crate::{addr::*, registers::ControlRegister, Block, Link, Side};

impl Link {
    /// Read a 32-bit register of one instance.
    /// Reading RDATA3 consumes the block at the head of the RX FIFO.
    pub fn read_register(&mut self, side: Side, addr: u32) -> u32 {
        self.access();
        match addr {
            STATUS => self.status(side).to_register(),
            CTRL => self.ctrl_read(side),

            RDATA_0 | RDATA_1 | RDATA_2 => self.rdata_read(side, addr, false),
            RDATA_3 => self.rdata_read(side, addr, true),

            INTR_STATE | INTR_ENABLE | INTR_TEST | ALERT_TEST => {
                log::info!("{side} read from unmodeled interrupt register 0x{addr:02X}");
                0
            }
            WDATA_0 | WDATA_1 | WDATA_2 | WDATA_3 => {
                log::warn!("{side} read from write-only register 0x{addr:02X}");
                0
            }
            _ => {
                log::warn!("{side} read from unknown register 0x{addr:02X}");
                0
            }
        }
    }

    /// Write a 32-bit register of one instance.
    /// Writing WDATA3 loads the staged block into the TX FIFO.
    pub fn write_register(&mut self, side: Side, addr: u32, value: u32) {
        self.access();
        match addr {
            CTRL => self.ctrl_write(side, value),

            WDATA_0 | WDATA_1 | WDATA_2 => self.wdata[side.index()][word(addr, WDATA_0)] = value,
            WDATA_3 => {
                self.wdata[side.index()][3] = value;
                let block = Block(self.wdata[side.index()]);
                if let Err(err) = self.load_data(side, block) {
                    log::warn!("{side} dropped block written to WDATA: {err}");
                }
            }

            STATUS | RDATA_0 | RDATA_1 | RDATA_2 | RDATA_3 => {
                log::warn!("{side} write to read-only register 0x{addr:02X}, ignoring");
            }
            INTR_STATE | INTR_ENABLE | INTR_TEST | ALERT_TEST => {
                log::info!("{side} write to unmodeled interrupt register 0x{addr:02X}");
            }
            _ => log::warn!("{side} write to unknown register 0x{addr:02X}: 0x{value:08X}"),
        }
    }

    fn ctrl_read(&self, side: Side) -> u32 {
        let cmod = self.instance(side);
        ControlRegister::new()
            .with_tx_watermark(cmod.tx_watermark() as u8)
            .with_rx_watermark(cmod.rx_watermark() as u8)
            .into()
    }

    fn ctrl_write(&mut self, side: Side, value: u32) {
        let new = ControlRegister::from(value);
        if self.set_tx_watermark(side, new.tx_watermark() as usize).is_err() {
            log::warn!("{side} invalid TX watermark {}, ignoring", new.tx_watermark());
        }
        if self.set_rx_watermark(side, new.rx_watermark() as usize).is_err() {
            log::warn!("{side} invalid RX watermark {}, ignoring", new.rx_watermark());
        }

        if new.tx_end() {
            self.end_message(side);
        }
        if new.tx_trigger() {
            self.begin_message(side);
        }
        if new.rx_confirm() {
            self.confirm_last_block(side);
        }
    }

    fn rdata_read(&mut self, side: Side, addr: u32, pop: bool) -> u32 {
        let result = if pop {
            self.read_data(side)
        } else {
            self.peek_data(side).copied()
        };
        match result {
            Ok(block) => block.0[word(addr, RDATA_0)],
            Err(err) => {
                log::warn!("{side} read RDATA while no block is readable: {err}");
                0
            }
        }
    }
}

fn word(addr: u32, base: u32) -> usize {
    ((addr - base) >> 2) as usize
}
