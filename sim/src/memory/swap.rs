//! Swap store
//!
//! A fixed-size backing file plus an in-memory slot map. Slots are handed
//! out first-fit when a dirty page is evicted and released when the page is
//! faulted back in; freed slots are scrubbed with the uninitialized marker
//! so dumps show them as empty.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

use super::UNINIT_MARKER;

pub struct SwapStore {
    file: File,
    slots: Vec<bool>,
    page_size: usize,
}

impl SwapStore {
    /// Create (or truncate) the backing file, size it to `swap_size` bytes
    /// and fill it with the uninitialized marker.
    pub fn create(path: &str, swap_size: usize, page_size: usize) -> io::Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(&vec![UNINIT_MARKER; swap_size])?;
        Ok(Self {
            file,
            slots: vec![false; swap_size / page_size],
            page_size,
        })
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// First-fit scan for a free slot. `None` means the store is full.
    pub fn allocate_slot(&mut self) -> Option<usize> {
        let slot = self.slots.iter().position(|&used| !used)?;
        self.slots[slot] = true;
        Some(slot)
    }

    /// Scrub a slot's on-disk bytes and free it. The slot stays allocated
    /// if the scrub fails, so it is never handed out with stale contents.
    pub fn release_slot(&mut self, slot: usize) -> io::Result<()> {
        self.file.seek(SeekFrom::Start((slot * self.page_size) as u64))?;
        self.file.write_all(&vec![UNINIT_MARKER; self.page_size])?;
        self.slots[slot] = false;
        Ok(())
    }

    pub fn slot_in_use(&self, slot: usize) -> bool {
        self.slots[slot]
    }

    /// Write one page of bytes into `slot`.
    pub fn write_page(&mut self, slot: usize, bytes: &[u8]) -> io::Result<()> {
        debug_assert_eq!(bytes.len(), self.page_size);
        self.file.seek(SeekFrom::Start((slot * self.page_size) as u64))?;
        self.file.write_all(bytes)
    }

    /// Read one page of bytes from `slot` into `buf`.
    pub fn read_page(&mut self, slot: usize, buf: &mut [u8]) -> io::Result<()> {
        debug_assert_eq!(buf.len(), self.page_size);
        self.file.seek(SeekFrom::Start((slot * self.page_size) as u64))?;
        self.file.read_exact(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SwapStore {
        let path = dir.path().join("swap.bin");
        SwapStore::create(path.to_str().unwrap(), 64, 16).unwrap()
    }

    #[test]
    fn test_backing_file_starts_as_markers() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let mut buf = [0u8; 16];
        for slot in 0..store.num_slots() {
            store.read_page(slot, &mut buf).unwrap();
            assert!(buf.iter().all(|&b| b == UNINIT_MARKER));
        }
    }

    #[test]
    fn test_first_fit_allocation() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert_eq!(store.allocate_slot(), Some(0));
        assert_eq!(store.allocate_slot(), Some(1));
        store.release_slot(0).unwrap();
        // freed slot is handed out again before higher ones
        assert_eq!(store.allocate_slot(), Some(0));
    }

    #[test]
    fn test_full_store_returns_none() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for expected in 0..4 {
            assert_eq!(store.allocate_slot(), Some(expected));
        }
        assert_eq!(store.allocate_slot(), None);
    }

    #[test]
    fn test_page_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let slot = store.allocate_slot().unwrap();
        let bytes: Vec<u8> = (0..16).collect();
        store.write_page(slot, &bytes).unwrap();
        let mut buf = [0u8; 16];
        store.read_page(slot, &mut buf).unwrap();
        assert_eq!(&buf[..], &bytes[..]);
    }

    #[test]
    fn test_release_scrubs_slot() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let slot = store.allocate_slot().unwrap();
        store.write_page(slot, &[b'x'; 16]).unwrap();
        store.release_slot(slot).unwrap();
        assert!(!store.slot_in_use(slot));
        let mut buf = [0u8; 16];
        store.read_page(slot, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == UNINIT_MARKER));
    }

    #[test]
    fn test_failed_scrub_keeps_slot_allocated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("swap.bin");
        std::fs::write(&path, vec![b'x'; 64]).unwrap();
        // a read-only handle makes the scrub write fail
        let mut store = SwapStore {
            file: File::open(&path).unwrap(),
            slots: vec![true; 4],
            page_size: 16,
        };
        assert!(store.release_slot(0).is_err());
        assert!(store.slot_in_use(0));
        // the stale bytes are still there, but the slot was never freed
        let mut buf = [0u8; 16];
        store.read_page(0, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == b'x'));
    }
}
