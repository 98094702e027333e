//! Run configuration
//!
//! Geometry and file paths from the script header, fixed for the lifetime
//! of a run. Validation rejects anything the paging engine cannot represent
//! before either backing file is touched.

use crate::error::{SimError, SimResult};

/// Immutable simulation geometry and file paths
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub exe_path: String,
    pub swap_path: String,
    pub text_size: usize,
    pub data_size: usize,
    pub bss_size: usize,
    pub heap_stack_size: usize,
    pub page_size: usize,
    pub num_pages: usize,
    pub memory_size: usize,
    pub swap_size: usize,
}

impl SimConfig {
    /// Check the geometry invariants. Any violation is fatal at init.
    pub fn validate(&self) -> SimResult<()> {
        if self.page_size == 0 || !self.page_size.is_power_of_two() {
            return Err(SimError::BadConfig(
                "Page size must be a power of two".into(),
            ));
        }
        if self.num_pages == 0 {
            return Err(SimError::BadConfig(
                "Number of pages must be nonzero".into(),
            ));
        }
        if self.memory_size == 0 || self.memory_size % self.page_size != 0 {
            return Err(SimError::BadConfig(
                "Memory size must be a nonzero multiple of page size".into(),
            ));
        }
        if self.swap_size % self.page_size != 0 {
            return Err(SimError::BadConfig(
                "Swap size must be a multiple of page size".into(),
            ));
        }
        Ok(())
    }

    /// Virtual address space size in bytes
    pub fn total_size(&self) -> usize {
        self.num_pages * self.page_size
    }

    /// log2(page_size), used by the address decoder
    pub fn page_shift(&self) -> u32 {
        self.page_size.trailing_zeros()
    }

    pub fn num_frames(&self) -> usize {
        self.memory_size / self.page_size
    }

    pub fn num_swap_slots(&self) -> usize {
        self.swap_size / self.page_size
    }

    /// Pages needed to cover `bytes`, rounded up to whole pages
    pub fn pages_for(&self, bytes: usize) -> usize {
        (bytes + self.page_size - 1) / self.page_size
    }

    pub fn text_pages(&self) -> usize {
        self.pages_for(self.text_size)
    }

    pub fn data_pages(&self) -> usize {
        self.pages_for(self.data_size)
    }

    pub fn bss_pages(&self) -> usize {
        self.pages_for(self.bss_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimConfig {
        SimConfig {
            exe_path: "program.bin".into(),
            swap_path: "swap.bin".into(),
            text_size: 16,
            data_size: 16,
            bss_size: 16,
            heap_stack_size: 80,
            page_size: 16,
            num_pages: 8,
            memory_size: 64,
            swap_size: 64,
        }
    }

    #[test]
    fn test_valid_geometry() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.total_size(), 128);
        assert_eq!(cfg.page_shift(), 4);
        assert_eq!(cfg.num_frames(), 4);
        assert_eq!(cfg.num_swap_slots(), 4);
    }

    #[test]
    fn test_page_size_must_be_power_of_two() {
        let mut cfg = base_config();
        cfg.page_size = 24;
        assert!(matches!(cfg.validate(), Err(SimError::BadConfig(_))));
        cfg.page_size = 0;
        assert!(matches!(cfg.validate(), Err(SimError::BadConfig(_))));
    }

    #[test]
    fn test_sizes_must_be_page_multiples() {
        let mut cfg = base_config();
        cfg.memory_size = 60;
        assert!(matches!(cfg.validate(), Err(SimError::BadConfig(_))));

        let mut cfg = base_config();
        cfg.swap_size = 50;
        assert!(matches!(cfg.validate(), Err(SimError::BadConfig(_))));
    }

    #[test]
    fn test_segment_page_counts_round_up() {
        let mut cfg = base_config();
        cfg.text_size = 17;
        assert_eq!(cfg.text_pages(), 2);
        cfg.data_size = 0;
        assert_eq!(cfg.data_pages(), 0);
    }
}
