//! Page table and segment classification
//!
//! One descriptor per virtual page. A page is either resident in a frame,
//! swapped out to a slot, or unallocated; the dirty and read-only bits
//! complete the bookkeeping the fault handler relies on. Segment boundaries
//! are derived once from the static sizes.

use crate::config::SimConfig;

/// Address-space segment a page belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Text,
    Data,
    Bss,
    HeapStack,
}

impl Segment {
    /// Name used by the page table dump
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Text => "TEXT",
            Segment::Data => "DATA",
            Segment::Bss => "BSS",
            Segment::HeapStack => "H/S",
        }
    }
}

/// Where a page's contents currently live
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    /// Mapped to a physical frame
    Resident { frame: usize },
    /// Written back to a swap slot; the swap copy is authoritative
    Swapped { slot: usize },
    /// No frame and no swap copy
    Unallocated,
}

/// Per-page bookkeeping: residency, dirty bit, permission
#[derive(Clone, Copy, Debug)]
pub struct PageDescriptor {
    pub state: PageState,
    pub dirty: bool,
    pub read_only: bool,
}

impl PageDescriptor {
    fn new(read_only: bool) -> Self {
        Self {
            state: PageState::Unallocated,
            dirty: false,
            read_only,
        }
    }

    pub fn is_resident(&self) -> bool {
        matches!(self.state, PageState::Resident { .. })
    }

    /// Physical frame index, if resident
    pub fn frame(&self) -> Option<usize> {
        match self.state {
            PageState::Resident { frame } => Some(frame),
            _ => None,
        }
    }
}

/// Page descriptors plus the segment boundaries derived from static sizes
pub struct PageTable {
    entries: Vec<PageDescriptor>,
    text_pages: usize,
    data_pages: usize,
    bss_pages: usize,
}

impl PageTable {
    /// Build the table: text pages are read-only, everything starts
    /// unallocated and clean.
    pub fn new(cfg: &SimConfig) -> Self {
        let text_pages = cfg.text_pages();
        let entries = (0..cfg.num_pages)
            .map(|page| PageDescriptor::new(page < text_pages))
            .collect();
        Self {
            entries,
            text_pages,
            data_pages: cfg.data_pages(),
            bss_pages: cfg.bss_pages(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn descriptor(&self, page: usize) -> &PageDescriptor {
        &self.entries[page]
    }

    pub fn descriptor_mut(&mut self, page: usize) -> &mut PageDescriptor {
        &mut self.entries[page]
    }

    /// Segment a page index falls into
    pub fn segment_of(&self, page: usize) -> Segment {
        if page < self.text_pages {
            Segment::Text
        } else if page < self.text_pages + self.data_pages {
            Segment::Data
        } else if page < self.text_pages + self.data_pages + self.bss_pages {
            Segment::Bss
        } else {
            Segment::HeapStack
        }
    }

    /// True when the page's initial contents come from the executable image
    /// (text and data pages); the rest of the address space zero-fills.
    pub fn backed_by_image(&self, page: usize) -> bool {
        page < self.text_pages + self.data_pages
    }
}
