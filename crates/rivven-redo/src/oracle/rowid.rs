//! Oracle extended row identifiers
//!
//! An 18 character base-64 string built from the row's physical address:
//!
//! ```text
//! OOOOOO FFF BBBBBB RRR
//! │      │   │      └── row slot in block      (3 symbols)
//! │      │   └───────── block number           (6 symbols)
//! │      └───────────── relative file number   (3 symbols)
//! └──────────────────── data object number     (6 symbols)
//! ```
//!
//! Every symbol carries 6 bits, most significant group first, through
//! [`MAP64`].

use crate::common::{RowAddress, TableDescriptor};
use rivven_redo_protocol::lookup::{map64_index, MAP64};
use std::fmt;
use std::str::FromStr;

const ROWID_LEN: usize = 18;
const BLOCK_BITS: u32 = 22;
const BLOCK_MASK: u32 = (1 << BLOCK_BITS) - 1;

/// Encoded row identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId([u8; ROWID_LEN]);

impl RowId {
    /// Row id of `address` inside the segment `data_obj`.
    pub fn encode(data_obj: u32, address: &RowAddress) -> Self {
        Self::from_parts(data_obj, address.dba, address.slot)
    }

    pub fn from_parts(data_obj: u32, dba: u32, slot: u16) -> Self {
        let file = dba >> BLOCK_BITS;
        let block = dba & BLOCK_MASK;

        let mut out = [0u8; ROWID_LEN];
        put_groups(&mut out[0..6], data_obj as u64);
        put_groups(&mut out[6..9], file as u64);
        put_groups(&mut out[9..15], block as u64);
        put_groups(&mut out[15..18], slot as u64);
        Self(out)
    }

    /// Inverse of [`RowId::from_parts`]: `(data_obj, dba, slot)`.
    pub fn decode(&self) -> (u32, u32, u16) {
        // Symbols are validated on construction
        let data_obj = get_groups(&self.0[0..6]).unwrap_or(0) as u32;
        let file = get_groups(&self.0[6..9]).unwrap_or(0) as u32;
        let block = get_groups(&self.0[9..15]).unwrap_or(0) as u32;
        let slot = get_groups(&self.0[15..18]).unwrap_or(0) as u16;
        (data_obj, (file << BLOCK_BITS) | block, slot)
    }

    pub fn as_str(&self) -> &str {
        // MAP64 is ASCII
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

fn put_groups(out: &mut [u8], value: u64) {
    let len = out.len();
    for (i, symbol) in out.iter_mut().enumerate() {
        let shift = 6 * (len - 1 - i);
        *symbol = MAP64[((value >> shift) & 0x3F) as usize];
    }
}

fn get_groups(symbols: &[u8]) -> Option<u64> {
    symbols
        .iter()
        .try_fold(0u64, |acc, &s| map64_index(s).map(|v| (acc << 6) | v as u64))
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RowId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; ROWID_LEN] = s
            .as_bytes()
            .try_into()
            .map_err(|_| format!("Invalid row id length: {} (expected {})", s.len(), ROWID_LEN))?;

        let field = |range: std::ops::Range<usize>, max: u64, what: &str| -> Result<u64, String> {
            let value = get_groups(&bytes[range])
                .ok_or_else(|| format!("Invalid row id symbol in {}", s))?;
            if value > max {
                return Err(format!("Row id {} out of range in {}", what, s));
            }
            Ok(value)
        };
        field(0..6, u32::MAX as u64, "data object")?;
        field(6..9, (u32::MAX >> BLOCK_BITS) as u64, "file")?;
        field(9..15, BLOCK_MASK as u64, "block")?;
        field(15..18, u16::MAX as u64, "slot")?;

        Ok(Self(bytes))
    }
}

impl TableDescriptor {
    /// Extended row identifier of a row stored in this table's segment
    pub fn row_id(&self, address: &RowAddress) -> RowId {
        RowId::encode(self.data_obj, address)
    }
}
