// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use alloc::rc::Rc;
use core::cell::RefCell;

use common::Time;

use crate::{Link, Side};

/// 32-bit register window of one CMOD instance, as seen from firmware.
/// Addresses are offsets from the instance base, see [crate::addr].
pub trait RegisterPort {
    fn read32(&mut self, addr: u32) -> u32;
    fn write32(&mut self, addr: u32, value: u32);
    /// Current bus time, for timeouts.
    fn now(&self) -> Time;
}

/// Register window of one side of a simulated [Link].
/// Both sides share the link, so one of each can be handed to two
/// independently running pieces of firmware.
#[derive(Debug, Clone)]
pub struct SimPort {
    link: Rc<RefCell<Link>>,
    side: Side,
}

impl SimPort {
    pub fn new(link: Rc<RefCell<Link>>, side: Side) -> Self {
        Self { link, side }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn link(&self) -> &Rc<RefCell<Link>> {
        &self.link
    }
}

impl RegisterPort for SimPort {
    fn read32(&mut self, addr: u32) -> u32 {
        self.link.borrow_mut().read_register(self.side, addr)
    }

    fn write32(&mut self, addr: u32, value: u32) {
        self.link.borrow_mut().write_register(self.side, addr, value);
    }

    fn now(&self) -> Time {
        self.link.borrow().now()
    }
}

impl Link {
    /// Share this link between a port for each side.
    pub fn into_ports(self) -> [SimPort; 2] {
        let link = Rc::new(RefCell::new(self));
        [
            SimPort::new(Rc::clone(&link), Side::Cmod0),
            SimPort::new(link, Side::Cmod1),
        ]
    }
}
