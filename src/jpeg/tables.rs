// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Quantization and Huffman table parsing.
//!
//! Handles DQT (Define Quantization Table) and DHT (Define Huffman Table)
//! marker segments. Both may carry several tables per segment; each table id
//! may be defined once per image.

use log::debug;

use super::bitio::ByteReader;
use super::error::{JpegError, Result};
use super::huffman::{HuffmanTree, MAX_CODE_LENGTH};
use super::marker::read_length;

/// Number of table slots per kind (ids 0–3).
pub const TABLE_SLOTS: usize = 4;

/// Quantization table: 64 values in zig-zag (stream) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTable {
    pub values: [u16; 64],
    /// 0 for 8-bit elements, 1 for 16-bit elements.
    pub precision: u8,
}

/// Parse a DQT segment (positioned at its length field) into `tables`.
pub fn parse_dqt(r: &mut ByteReader, tables: &mut [Option<QuantTable>; TABLE_SLOTS]) -> Result<()> {
    let body_len = read_length(r, "DQT")?;
    let mut consumed = 0usize;

    while consumed < body_len {
        let pq_tq = r.read_u8()?;
        let precision = pq_tq >> 4;
        let table_id = (pq_tq & 0x0F) as usize;
        if precision > 1 || table_id >= TABLE_SLOTS {
            return Err(JpegError::InvalidTableId(pq_tq));
        }
        if tables[table_id].is_some() {
            return Err(JpegError::DuplicateTableId(table_id as u8));
        }

        let element_size = precision as usize + 1;
        consumed += 1 + 64 * element_size;
        if consumed > body_len {
            return Err(JpegError::MalformedSectionLength("DQT"));
        }

        let mut values = [0u16; 64];
        for v in values.iter_mut() {
            *v = if precision == 0 {
                u16::from(r.read_u8()?)
            } else {
                r.read_u16()?
            };
        }
        debug!("DQT: table {table_id}, {}-bit entries", 8 * element_size);
        tables[table_id] = Some(QuantTable { values, precision });
    }

    Ok(())
}

/// Huffman table class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

/// Parsed Huffman table specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanSpec {
    /// Number of codes of each length (1–16).
    pub bits: [u8; MAX_CODE_LENGTH],
    /// Symbol values in order of increasing code length.
    pub values: Vec<u8>,
}

impl HuffmanSpec {
    /// A table with at least one code. Scans may only reference these.
    pub fn is_complete(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn build_tree(&self) -> Result<HuffmanTree> {
        HuffmanTree::build(&self.bits, &self.values)
    }
}

/// DC and AC Huffman specs by table id, filled in by DHT segments.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTables {
    dc: [Option<HuffmanSpec>; TABLE_SLOTS],
    ac: [Option<HuffmanSpec>; TABLE_SLOTS],
}

impl HuffmanTables {
    pub fn get(&self, class: TableClass, id: usize) -> Option<&HuffmanSpec> {
        self.slots(class).get(id)?.as_ref()
    }

    /// Complete table for a scan, or `MissingPrecondition`.
    pub fn require(&self, class: TableClass, id: usize) -> Result<&HuffmanSpec> {
        self.get(class, id)
            .filter(|spec| spec.is_complete())
            .ok_or(match class {
                TableClass::Dc => JpegError::MissingPrecondition("DC Huffman table"),
                TableClass::Ac => JpegError::MissingPrecondition("AC Huffman table"),
            })
    }

    fn slots(&self, class: TableClass) -> &[Option<HuffmanSpec>; TABLE_SLOTS] {
        match class {
            TableClass::Dc => &self.dc,
            TableClass::Ac => &self.ac,
        }
    }

    fn slot_mut(&mut self, class: TableClass, id: usize) -> &mut Option<HuffmanSpec> {
        match class {
            TableClass::Dc => &mut self.dc[id],
            TableClass::Ac => &mut self.ac[id],
        }
    }
}

/// Parse a DHT segment (positioned at its length field) into `tables`.
pub fn parse_dht(r: &mut ByteReader, tables: &mut HuffmanTables) -> Result<()> {
    let body_len = read_length(r, "DHT")?;
    let mut consumed = 0usize;

    while consumed < body_len {
        let tc_th = r.read_u8()?;
        let class = match tc_th >> 4 {
            0 => TableClass::Dc,
            1 => TableClass::Ac,
            _ => return Err(JpegError::InvalidTableId(tc_th)),
        };
        let id = (tc_th & 0x0F) as usize;
        if id >= TABLE_SLOTS {
            return Err(JpegError::InvalidTableId(tc_th));
        }

        let mut bits = [0u8; MAX_CODE_LENGTH];
        bits.copy_from_slice(r.read_bytes(MAX_CODE_LENGTH)?);
        let total: usize = bits.iter().map(|&b| b as usize).sum();

        consumed += 1 + MAX_CODE_LENGTH + total;
        if consumed > body_len {
            return Err(JpegError::MalformedSectionLength("DHT"));
        }
        let slot = tables.slot_mut(class, id);
        if slot.is_some() {
            return Err(JpegError::DuplicateTableId(id as u8));
        }

        let values = r.read_bytes(total)?.to_vec();
        debug!("DHT: {class:?} table {id}, {total} symbols");
        *slot = Some(HuffmanSpec { bits, values });
    }

    Ok(())
}
