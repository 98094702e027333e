//! State dumps
//!
//! Human-readable renderings of the page table, RAM and the swap file,
//! backing the `print table` / `print ram` / `print swap` script commands.
//! Rows show bytes in hex and as printable ASCII, with `.` standing in for
//! anything outside the printable range.

use std::io::{self, Write};

use super::page::PageState;
use super::SimMemory;

impl SimMemory {
    /// Page table rows with the V/D/P bits, location and segment.
    pub fn dump_page_table<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "=== PAGE TABLE ===")?;
        writeln!(w, "Number of pages: {}", self.config.num_pages)?;
        writeln!(w, "Page | V | D | P | Frame/Swap | Segment")?;
        writeln!(w, "-----|---|---|---|------------|--------")?;
        for page in 0..self.page_table.len() {
            let desc = self.page_table.descriptor(page);
            let (valid, location) = match desc.state {
                PageState::Resident { frame } => (1, Some(frame)),
                PageState::Swapped { slot } => (0, Some(slot)),
                PageState::Unallocated => (0, None),
            };
            write!(
                w,
                "{:>4} | {} | {} | {} |",
                page, valid, desc.dirty as u8, desc.read_only as u8
            )?;
            match location {
                Some(loc) => write!(w, "    {:>4}   |", loc)?,
                None => write!(w, "      -    |")?,
            }
            writeln!(w, " {}", self.page_table.segment_of(page).as_str())?;
        }
        writeln!(w, "==================")?;
        writeln!(
            w,
            "Legend: V=Valid, D=Dirty, P=Permission (1=Read-Only, 0=Read/Write)"
        )?;
        writeln!(
            w,
            "        Frame/Swap: Frame number if in memory (V=1), Swap page if swapped out"
        )?;
        writeln!(w)
    }

    /// RAM contents, one row per frame.
    pub fn dump_ram<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "=== MAIN MEMORY CONTENTS ===")?;
        writeln!(
            w,
            "Memory size: {} bytes, Page size: {} bytes, Number of frames: {}",
            self.config.memory_size,
            self.config.page_size,
            self.config.num_frames()
        )?;
        for frame in 0..self.config.num_frames() {
            let base = frame * self.config.page_size;
            write!(w, "Frame {}: ", frame)?;
            write_row(w, &self.ram[base..base + self.config.page_size])?;
        }
        writeln!(w, "=============================")?;
        writeln!(w)
    }

    /// Swap slots read back from the backing file, so freed slots visibly
    /// hold the uninitialized marker.
    pub fn dump_swap<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        writeln!(w, "=== SWAP FILE CONTENTS ===")?;
        writeln!(
            w,
            "Swap size: {} bytes, Page size: {} bytes, Number of swap pages: {}",
            self.config.swap_size,
            self.config.page_size,
            self.swap.num_slots()
        )?;
        let mut buf = vec![0u8; self.config.page_size];
        for slot in 0..self.swap.num_slots() {
            self.swap.read_page(slot, &mut buf)?;
            write!(w, "Swap Page {}: ", slot)?;
            write_row(w, &buf)?;
        }
        writeln!(w, "===========================")?;
        writeln!(w)
    }
}

/// Hex bytes, a separator, then the printable-ASCII rendering.
fn write_row<W: Write>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    for b in bytes {
        write!(w, "{:02X} ", b)?;
    }
    write!(w, "| ")?;
    for &b in bytes {
        if (32..=126).contains(&b) {
            write!(w, "{}", b as char)?;
        } else {
            write!(w, ".")?;
        }
    }
    writeln!(w)
}
