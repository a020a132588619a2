//! Snapshot encoding for the state table.
//!
//! Uses bincode with fixed-size integers, little-endian byte order and
//! trailing-byte rejection, wrapped in a small envelope carrying a magic
//! tag and a format version.

use bincode::Options;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::table::{InvincibilityState, PlayerKey, StateTable};

/// Leading bytes of every snapshot file.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"NOFR";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    magic: [u8; 4],
    version: u32,
    entries: &'a BTreeMap<PlayerKey, InvincibilityState>,
}

#[derive(Deserialize)]
struct Snapshot {
    magic: [u8; 4],
    version: u32,
    entries: BTreeMap<PlayerKey, InvincibilityState>,
}

fn config() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Encode a table into snapshot bytes.
///
/// Identical tables always produce identical bytes.
pub fn encode(table: &StateTable) -> Result<Vec<u8>, bincode::Error> {
    config().serialize(&SnapshotRef {
        magic: SNAPSHOT_MAGIC,
        version: SNAPSHOT_VERSION,
        entries: table.entries(),
    })
}

/// Decode snapshot bytes into a table.
///
/// The error string describes why the bytes do not match the schema.
pub fn decode(bytes: &[u8]) -> Result<StateTable, String> {
    // A forged length prefix can't make the decoder read past the input.
    let snapshot: Snapshot = config()
        .with_limit(bytes.len() as u64)
        .deserialize(bytes)
        .map_err(|e| e.to_string())?;

    if snapshot.magic != SNAPSHOT_MAGIC {
        return Err(format!("bad magic {:02x?}", snapshot.magic));
    }
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(format!("unsupported snapshot version {}", snapshot.version));
    }

    Ok(StateTable::from(snapshot.entries))
}
