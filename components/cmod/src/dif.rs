// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::Time;

use crate::{
    addr::*, registers::ControlRegister, state::check_watermark, Block, Cmod, CmodError,
    RegisterPort, Status,
};

/// Firmware-side driver for one CMOD instance.
///
/// Only ever talks to the hardware through its [RegisterPort]; every
/// decision is made from one fresh STATUS read.
#[derive(Debug, Clone)]
pub struct Dif<P> {
    port: P,
}

impl<P: RegisterPort> Dif<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    /// The raw STATUS word.
    pub fn status_register(&mut self) -> u32 {
        self.port.read32(STATUS)
    }

    fn ctrl_update(&mut self, f: impl FnOnce(ControlRegister) -> ControlRegister) {
        let ctrl = ControlRegister::from(self.port.read32(CTRL));
        self.port.write32(CTRL, f(ctrl).into());
    }
}

impl<P: RegisterPort> Cmod for Dif<P> {
    fn set_tx_watermark(&mut self, level: usize) -> Result<(), CmodError> {
        let level = check_watermark(level)? as u8;
        self.ctrl_update(|c| c.with_tx_watermark(level));
        Ok(())
    }

    fn set_rx_watermark(&mut self, level: usize) -> Result<(), CmodError> {
        let level = check_watermark(level)? as u8;
        self.ctrl_update(|c| c.with_rx_watermark(level));
        Ok(())
    }

    fn begin_message(&mut self) {
        self.ctrl_update(|c| c.with_tx_trigger(true));
    }

    fn end_message(&mut self) {
        self.ctrl_update(|c| c.with_tx_end(true));
    }

    fn confirm_last_block(&mut self) {
        self.ctrl_update(|c| c.with_rx_confirm(true));
    }

    fn load_data(&mut self, block: Block) -> Result<(), CmodError> {
        if !self.status().tx_input_ready {
            return Err(CmodError::Unavailable);
        }
        for (addr, word) in WDATA.into_iter().zip(block.0) {
            self.port.write32(addr, word);
        }
        Ok(())
    }

    fn read_data(&mut self) -> Result<Block, CmodError> {
        let status = self.status();
        if !status.rx_valid {
            return Err(CmodError::Unavailable);
        }
        // Nothing arrives behind an unconfirmed final block,
        // so it is the head exactly when it is the only one.
        if status.rx_last && status.rx_level == 1 {
            return Err(CmodError::Blocked);
        }
        Ok(Block(RDATA.map(|addr| self.port.read32(addr))))
    }

    fn status(&mut self) -> Status {
        Status::from_register(self.status_register())
    }

    fn now(&self) -> Time {
        self.port.now()
    }
}
