//! Page fault handling
//!
//! The policy core: choose the source of a faulting page's initial
//! contents, obtain a frame (evicting if necessary), and install the
//! mapping. A dirty writable victim is written back to swap before its
//! frame is reused; text and clean pages are discarded since they reload
//! from their origin.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{SimError, SimResult};

use super::frame::FrameChoice;
use super::page::PageState;
use super::SimMemory;

/// Read-only handle on the executable image
pub struct ProgramImage {
    file: File,
}

impl ProgramImage {
    pub fn open(path: &str) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }

    /// Read the page at file offset `page * page_size` into `buf`. A page
    /// past the end of the image is an error.
    pub fn read_page(&mut self, page: usize, buf: &mut [u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start((page * buf.len()) as u64))?;
        self.file.read_exact(buf)
    }
}

/// Source of a faulting page's initial contents
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FaultSource {
    Image,
    Zeros,
    Swap(usize),
}

impl SimMemory {
    /// Service a fault on a non-resident `page`; returns the frame the page
    /// was installed into.
    pub(crate) fn fault(&mut self, page: usize) -> SimResult<usize> {
        debug_assert!(!self.page_table.descriptor(page).is_resident());
        let source = self.fault_source(page);

        // The fault event precedes the I/O it describes, so a failed read
        // still leaves an informative trace.
        match source {
            FaultSource::Image => println!(
                "Page fault: Loading page {} from {}",
                page, self.config.exe_path
            ),
            FaultSource::Zeros => println!("Page fault: Loading page {} with zeros", page),
            FaultSource::Swap(_) => println!(
                "Page fault: Loading page {} from {}",
                page, self.config.swap_path
            ),
        }

        // Stage the contents first; nothing is mutated until they are in hand.
        let mut contents = vec![0u8; self.config.page_size];
        match source {
            FaultSource::Image => self.image.read_page(page, &mut contents)?,
            FaultSource::Zeros => {}
            FaultSource::Swap(slot) => self.swap.read_page(slot, &mut contents)?,
        }

        let frame = match self.frames.select() {
            FrameChoice::Free(frame) => frame,
            FrameChoice::Victim(frame) => {
                self.evict(frame)?;
                frame
            }
        };

        // Install the mapping, then retire the old swap copy.
        let base = frame * self.config.page_size;
        self.ram[base..base + self.config.page_size].copy_from_slice(&contents);
        let old_state = self.page_table.descriptor(page).state;
        let desc = self.page_table.descriptor_mut(page);
        desc.state = PageState::Resident { frame };
        desc.dirty = false;
        self.frames.assign(frame, page);
        self.tlb.insert(page, frame);
        if let PageState::Swapped { slot } = old_state {
            // The install is already committed; a failed scrub keeps the
            // slot occupied instead of failing the access.
            if let Err(e) = self.swap.release_slot(slot) {
                log::warn!("failed to release swap slot {}: {}", slot, e);
            }
        }
        log::debug!("page {} installed in frame {} ({:?})", page, frame, source);
        Ok(frame)
    }

    /// Decide where a non-resident page's bytes come from.
    fn fault_source(&self, page: usize) -> FaultSource {
        match self.page_table.descriptor(page).state {
            PageState::Swapped { slot } => FaultSource::Swap(slot),
            _ if self.page_table.backed_by_image(page) => FaultSource::Image,
            _ => FaultSource::Zeros,
        }
    }

    /// Push the resident victim out of `frame`.
    fn evict(&mut self, frame: usize) -> SimResult<()> {
        let victim = match self.frames.owner(frame) {
            Some(page) => page,
            None => return Ok(()),
        };
        let desc = *self.page_table.descriptor(victim);
        if !desc.read_only && desc.dirty {
            // Dirty writable page: write it back. The slot is claimed before
            // anything else changes, so a full store aborts the fault with
            // all state intact.
            let slot = match self.swap.allocate_slot() {
                Some(slot) => slot,
                None => return Err(SimError::SwapFull(victim)),
            };
            println!("Page replacement: Evicting page {} to swap", victim);
            let base = frame * self.config.page_size;
            let bytes = self.ram[base..base + self.config.page_size].to_vec();
            if let Err(e) = self.swap.write_page(slot, &bytes) {
                if let Err(scrub) = self.swap.release_slot(slot) {
                    log::warn!("failed to release swap slot {}: {}", slot, scrub);
                }
                return Err(e.into());
            }
            // dirty stays set: the swap copy is now the source of truth
            self.page_table.descriptor_mut(victim).state = PageState::Swapped { slot };
        } else {
            // Text and clean pages reload from their origin; just discard.
            let desc = self.page_table.descriptor_mut(victim);
            desc.state = PageState::Unallocated;
            desc.dirty = false;
        }
        self.tlb.invalidate(victim);
        log::debug!(
            "evicted page {} from frame {} (stamp {})",
            victim,
            frame,
            self.frames.timestamp(frame)
        );
        Ok(())
    }
}
