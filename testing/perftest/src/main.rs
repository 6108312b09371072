// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use clap::Parser;
use cmod::{
    addr::{CTRL, RDATA, STATUS, WDATA},
    registers::{ControlRegister, StatusRegister},
    CmodConfig, CmodError, Link, RegisterPort, SimPort, Side,
};

const DATA: [u32; 4] = [0x01234567, 0x89abcdef, 0xfedcab98, 0x76543210];

/// Measure what basic CMOD register sequences cost on the simulated link
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Cycles a block needs to cross the link
    #[arg(short, long, default_value_t = 0)]
    latency: u64,
    /// Cycles charged per register access
    #[arg(short, long, default_value_t = 1)]
    access_cycles: u64,
    /// How often to repeat the full send & receive measurement
    #[arg(short, long, default_value_t = 1)]
    rounds: usize,
    /// Log the status of both instances when done
    #[arg(short, long)]
    verbose: bool,
}

fn tx_full(port: &mut SimPort) -> bool {
    StatusRegister::from(port.read32(STATUS)).tx_full()
}

fn rx_valid(port: &mut SimPort) -> bool {
    StatusRegister::from(port.read32(STATUS)).rx_valid()
}

fn write_block(port: &mut SimPort, data: &[u32; 4]) {
    for (addr, word) in WDATA.into_iter().zip(data) {
        port.write32(addr, *word);
    }
}

fn read_block(port: &mut SimPort) -> [u32; 4] {
    RDATA.map(|addr| port.read32(addr))
}

/// Run `f` and return how many cycles it took on `port`'s bus.
fn measure<T>(port: &mut SimPort, f: impl FnOnce(&mut SimPort) -> T) -> (u64, T) {
    let start = port.now();
    let result = f(port);
    (port.now() - start, result)
}

fn main() -> Result<(), CmodError> {
    let args = Args::parse();
    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(log::LevelFilter::Info);
    }
    logger.init();

    let config = CmodConfig {
        link_latency: args.latency,
        access_cycles: args.access_cycles,
        ..CmodConfig::default()
    };
    let [mut cmod0, mut cmod1] = Link::new(config)?.into_ports();

    let ctrl = ControlRegister::from(cmod0.read32(CTRL)).with_tx_trigger(true);
    cmod0.write32(CTRL, ctrl.into());

    println!("Running CMOD Performance Test...");

    println!("Performance Test 1: Read TXFULL register.");
    let (total, _) = measure(&mut cmod0, tx_full);
    println!("Duration: {total} cycles");

    println!("Performance Test 2: Write 128bits to WDATA.");
    let (total, _) = measure(&mut cmod0, |p| write_block(p, &DATA));
    println!("Duration: {total} cycles");

    println!("Performance Test 3: Read RXVALID register.");
    let (total, _) = measure(&mut cmod1, rx_valid);
    println!("Duration: {total} cycles");

    while !rx_valid(&mut cmod1) {}

    println!("Performance Test 4: Read 128bits from RDATA.");
    let (total, received) = measure(&mut cmod1, read_block);
    println!("Duration: {total} cycles");
    if received != DATA {
        log::error!("Received {received:08X?} instead of {DATA:08X?}");
    }

    println!("Performance Test 5: Send & receive 128bits.");
    let mut sum = 0;
    for round in 0..args.rounds {
        let start = cmod0.now();
        while tx_full(&mut cmod0) {}
        write_block(&mut cmod0, &DATA);
        while !rx_valid(&mut cmod1) {}
        let received = read_block(&mut cmod1);
        let total = cmod0.now() - start;
        log::debug!("Round {round}: {total} cycles");
        if received != DATA {
            log::error!("Round {round} received {received:08X?}");
        }
        sum += total;
    }
    println!("Duration: {} cycles", sum / args.rounds.max(1) as u64);

    println!("Finished CMOD Performance Test");
    if args.verbose {
        let link = cmod0.link().borrow();
        link.log_status(Side::Cmod0);
        link.log_status(Side::Cmod1);
    }
    Ok(())
}
