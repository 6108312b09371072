// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

/// Outcomes of a CMOD operation other than success.
/// None of them leave the instance in an unusable state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CmodError {
    /// The caller passed something out of range. Never worth retrying.
    #[error("invalid argument")]
    InvalidArgument,
    /// The FIFO is full (TX) or empty (RX), or no message is open.
    /// Poll the status and try again.
    #[error("FIFO not ready")]
    Unavailable,
    /// The next block is the final block of a message and must be
    /// confirmed before it can be read.
    #[error("final block of message awaits confirmation")]
    Blocked,
    /// A status flag did not reach the expected value in time.
    #[error("timed out waiting for status flag")]
    Timeout,
}

impl CmodError {
    /// Whether repeating the same call can succeed without any other
    /// action from the caller.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Unavailable | Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use super::*;

    #[test]
    fn test_blocked_is_not_retryable() {
        assert!(CmodError::Unavailable.is_retryable());
        assert!(!CmodError::Blocked.is_retryable());
        assert!(!CmodError::InvalidArgument.is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CmodError::Blocked.to_string(),
            "final block of message awaits confirmation"
        );
    }
}
