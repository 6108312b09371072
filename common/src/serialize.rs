// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use alloc::vec::Vec;

/// Errors produced while making or loading a savestate.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to encode savestate: {0}")]
    Encode(bincode::Error),
    #[error("failed to decode savestate: {0}")]
    Decode(bincode::Error),
}

/// Serialize an object that can be loaded with [deserialize].
/// It is (optionally zstd-compressed) bincode.
#[cfg(feature = "zstd")]
pub fn serialize<T: serde::Serialize>(thing: &T, with_zstd: bool) -> Result<Vec<u8>, StateError> {
    if with_zstd {
        let mut dest = Vec::new();
        let mut writer =
            zstd::stream::Encoder::new(&mut dest, 3).map_err(|e| StateError::Encode(io(e)))?;
        bincode::serialize_into(&mut writer, thing).map_err(StateError::Encode)?;
        writer.finish().map_err(|e| StateError::Encode(io(e)))?;
        Ok(dest)
    } else {
        bincode::serialize(thing).map_err(StateError::Encode)
    }
}

/// Deserialize an object that was made with [serialize].
/// It is (optionally zstd-compressed) bincode.
#[cfg(feature = "zstd")]
pub fn deserialize<T: serde::de::DeserializeOwned>(
    state: &[u8],
    with_zstd: bool,
) -> Result<T, StateError> {
    if with_zstd {
        let decoder = zstd::stream::Decoder::new(state).map_err(|e| StateError::Decode(io(e)))?;
        bincode::deserialize_from(decoder).map_err(StateError::Decode)
    } else {
        bincode::deserialize(state).map_err(StateError::Decode)
    }
}

#[cfg(feature = "zstd")]
fn io(err: std::io::Error) -> bincode::Error {
    alloc::boxed::Box::new(bincode::ErrorKind::Io(err))
}

/// Serialize an object that can be loaded with [deserialize].
/// Compression is unavailable without the `zstd` feature.
#[cfg(not(feature = "zstd"))]
pub fn serialize<T: serde::Serialize>(thing: &T, _with_zstd: bool) -> Result<Vec<u8>, StateError> {
    bincode::serialize(thing).map_err(StateError::Encode)
}

/// Deserialize an object that was made with [serialize].
#[cfg(not(feature = "zstd"))]
pub fn deserialize<T: serde::de::DeserializeOwned>(
    state: &[u8],
    _with_zstd: bool,
) -> Result<T, StateError> {
    bincode::deserialize(state).map_err(StateError::Decode)
}
