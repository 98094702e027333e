//! Paging engine
//!
//! `SimMemory` owns every structure of the simulated machine: the page
//! table, physical RAM, per-frame use stamps, the swap store and the open
//! executable image. `load` and `store` are the public interface; faults,
//! eviction and swap management happen behind them. One engine instance is
//! strictly single-threaded and both files close when it drops.

pub mod addr;
pub mod dump;
pub mod fault;
pub mod frame;
pub mod page;
pub mod swap;
pub mod tlb;

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

use self::fault::ProgramImage;
use self::frame::FrameTable;
use self::page::PageTable;
use self::swap::SwapStore;
use self::tlb::Tlb;

/// Byte value marking never-written RAM and freed swap slots
pub const UNINIT_MARKER: u8 = b'-';

/// One simulated machine: address space, RAM, swap and the open files
pub struct SimMemory {
    pub(crate) config: SimConfig,
    pub(crate) page_table: PageTable,
    pub(crate) frames: FrameTable,
    pub(crate) swap: SwapStore,
    pub(crate) image: ProgramImage,
    pub(crate) ram: Vec<u8>,
    pub(crate) tlb: Tlb,
}

impl SimMemory {
    /// Validate the configuration, open both files and build the tables.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let image = ProgramImage::open(&config.exe_path)?;
        let swap = SwapStore::create(&config.swap_path, config.swap_size, config.page_size)?;
        let page_table = PageTable::new(&config);
        let frames = FrameTable::new(config.num_frames());
        let ram = vec![UNINIT_MARKER; config.memory_size];
        log::info!(
            "loaded program {}: text={} data={} bss={} heap_stack={}",
            config.exe_path,
            config.text_size,
            config.data_size,
            config.bss_size,
            config.heap_stack_size
        );
        Ok(Self {
            config,
            page_table,
            frames,
            swap,
            image,
            ram,
            tlb: Tlb::new(),
        })
    }

    /// Read one byte from a virtual address.
    pub fn load(&mut self, addr: i64) -> SimResult<u8> {
        let (page, offset) = addr::decode(addr, &self.config)?;
        let frame = match self.resident_frame(page) {
            Some(frame) => {
                self.frames.touch(frame);
                frame
            }
            None => self.fault(page)?,
        };
        let value = self.ram[frame * self.config.page_size + offset];
        log::trace!("load addr {} -> page {} frame {} offset {}", addr, page, frame, offset);
        println!("Value at address {} = {}", addr, value as char);
        Ok(value)
    }

    /// Write one byte to a virtual address.
    pub fn store(&mut self, addr: i64, value: u8) -> SimResult<()> {
        let (page, offset) = addr::decode(addr, &self.config)?;
        if self.page_table.descriptor(page).read_only {
            return Err(SimError::ReadOnlyWrite(addr));
        }
        let frame = match self.resident_frame(page) {
            Some(frame) => {
                self.frames.touch(frame);
                frame
            }
            None => self.fault(page)?,
        };
        self.ram[frame * self.config.page_size + offset] = value;
        self.page_table.descriptor_mut(page).dirty = true;
        log::trace!("store addr {} -> page {} frame {} offset {}", addr, page, frame, offset);
        println!("Stored value '{}' at address {}", value as char, addr);
        Ok(())
    }

    /// Frame of a resident page, going through the TLB when it can answer.
    fn resident_frame(&mut self, page: usize) -> Option<usize> {
        if let Some(frame) = self.tlb.lookup(page) {
            debug_assert_eq!(self.page_table.descriptor(page).frame(), Some(frame));
            return Some(frame);
        }
        let frame = self.page_table.descriptor(page).frame()?;
        self.tlb.insert(page, frame);
        Some(frame)
    }

    /// (hits, lookups) of the translation cache, for teardown diagnostics.
    pub fn tlb_stats(&self) -> (u64, u64) {
        self.tlb.stats()
    }
}
