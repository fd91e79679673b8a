//! File-backed devices for host-side tooling.
//!
//! [`MmapNvMem`] maps an EEPROM image file read-write so image-producing
//! tools and benches run the exact same log core that targets hardware.
//! [`MmapNvRead`] maps an image read-only for pure readout: it implements
//! only [`NvRead`], so a log built over it cannot even express an append.
//! Host-side mapped writes complete synchronously, so `is_idle` is always
//! true and every pump call makes progress.

use crate::{NvMem, NvRead};
use std::io;
use std::path::Path;
use tephra_mmap::{MmapFile, MmapFileMut};

/// Read-write [`NvMem`] over a memory-mapped image file.
pub struct MmapNvMem {
    map: MmapFileMut,
}

impl MmapNvMem {
    /// Creates a zero-filled image of `len` bytes at `path` and maps it.
    pub fn create<P: AsRef<Path>>(path: P, len: u32) -> io::Result<Self> {
        let map = MmapFileMut::create_rw(path, len as u64)?;
        Ok(Self { map })
    }

    /// Maps an existing image read-write.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let map = MmapFileMut::open_rw(path)?;
        Ok(Self { map })
    }

    /// Flushes dirty pages back to the image file.
    pub fn flush(&self) -> io::Result<()> {
        self.map.flush()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl NvRead for MmapNvMem {
    fn read_byte(&self, addr: u32) -> u8 {
        self.map.as_slice()[addr as usize]
    }
}

impl NvMem for MmapNvMem {
    fn write_byte(&mut self, addr: u32, value: u8) {
        self.map.as_mut_slice()[addr as usize] = value;
    }

    fn is_idle(&mut self) -> bool {
        true
    }
}

/// Read-only [`NvRead`] over a memory-mapped image file.
pub struct MmapNvRead {
    map: MmapFile,
}

impl MmapNvRead {
    /// Maps an existing image read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let map = MmapFile::open_ro(path)?;
        Ok(Self { map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl NvRead for MmapNvRead {
    fn read_byte(&self, addr: u32) -> u8 {
        self.map.as_slice()[addr as usize]
    }
}
