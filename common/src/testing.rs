// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use std::string::String;

/// A simulated system that a test can drive one step at a time.
pub trait System {
    /// Run one cooperative step of every party in the system.
    fn advance(&mut self);
}

pub type TestInspector<S> = fn(&mut S) -> TestStatus;

/// Advance the system until the inspector reaches a verdict,
/// panicking on failure or when `steps` runs out first.
pub fn run_test<S: System>(system: &mut S, steps: usize, inspector: TestInspector<S>) {
    for _ in 0..steps {
        system.advance();
        let status = (inspector)(system);
        match status {
            TestStatus::Running => continue,
            TestStatus::Success => return,
            TestStatus::Failed => panic!("Test failed!"),
            TestStatus::FailedAt(msg) => panic!("Test failed: {msg}!"),
        }
    }
    panic!("Test timed out!")
}

#[derive(Debug, PartialEq)]
pub enum TestStatus {
    Running,
    Success,
    Failed,
    FailedAt(String),
}
