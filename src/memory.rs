use crate::error::HarnessError;
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Byte-addressable memory owned by an execution core. The harness only ever
/// writes the font and the program into it.
pub trait MemoryMap {
    /// the whole region, r/o
    fn bytes(&self) -> &[u8];

    /// the whole region, r/w
    fn bytes_mut(&mut self) -> &mut [u8];

    /// copy a chunk of bytes in at `addr`; nothing is written if it doesn't fit
    fn load(&mut self, addr: u16, data: &[u8]) -> Result<(), HarnessError> {
        let mem = self.bytes_mut();
        let start = addr as usize;
        let end = start + data.len();
        if end > mem.len() {
            return Err(HarnessError::OutOfBounds {
                offset: addr,
                len: data.len(),
                size: mem.len(),
            });
        }
        mem[start..end].copy_from_slice(data);
        Ok(())
    }

    /// read unknown len of data from somewhere and load it at `addr`
    fn load_any(&mut self, reader: &mut impl io::Read, addr: u16) -> Result<(), HarnessError>
    where
        Self: Sized,
    {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load(addr, &buf)
    }

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.bytes()[a..(a + len)]
    }
}

/// how much RAM a CHIP-8 has
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the hex digit sprites live
pub const CHIP8_FONT_ADDR: u16 = 0x050;

/// 16 glyphs, 5 bytes each
pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Write the font and then the program into a freshly created core's memory.
/// Both have to land before the core runs a single cycle.
pub fn load_images<M: MemoryMap + ?Sized>(
    memory: &mut M,
    program: &[u8],
) -> Result<(), HarnessError> {
    memory.load(CHIP8_FONT_ADDR, &CHIP8_FONT)?;
    memory.load(CHIP8_PROGRAM_ADDR, program)
}

/// Plain 4K of zeroed RAM, for cores that don't want to manage their own
pub struct Chip8Ram {
    bytes: Box<[u8]>,
}

impl Chip8Ram {
    pub fn new() -> Self {
        Chip8Ram {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
        }
    }
}

impl Default for Chip8Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMap for Chip8Ram {
    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8Ram::new();
        assert_eq!(m.bytes().len(), CHIP8_RAM_SIZE_BYTES);
        assert!(m.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_slice_ok() -> Result<(), HarnessError> {
        let mut dst = Chip8Ram::new();
        dst.load(8, &[0, 1, 2, 3, 4, 5, 6, 7])?;
        assert_eq!(
            dst.bytes()[..16],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_load_any_ok() -> Result<(), HarnessError> {
        let mut dst = Chip8Ram::new();
        let mut src: &[u8] = &[0x12, 0x00];
        dst.load_any(&mut src, CHIP8_PROGRAM_ADDR)?;
        assert_eq!(dst.get_ro_slice(0x200, 2), &[0x12, 0x00]);
        Ok(())
    }

    #[test]
    fn test_load_too_much_rejected() {
        let mut dst = Chip8Ram::new();
        let err = dst.load(4089, &[0xff; 8]).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::OutOfBounds {
                offset: 4089,
                len: 8,
                size: 4096
            }
        ));
        // and nothing was written
        assert!(dst.bytes()[4089..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_exactly_to_the_end() {
        let mut dst = Chip8Ram::new();
        assert!(dst.load(4088, &[0xff; 8]).is_ok());
    }

    #[test]
    fn test_program_round_trips() -> Result<(), HarnessError> {
        let mut m = Chip8Ram::new();
        let prog: Vec<u8> = (0..=255u8).collect();
        load_images(&mut m, &prog)?;
        assert_eq!(m.get_ro_slice(CHIP8_PROGRAM_ADDR, prog.len()), &prog[..]);
        assert_eq!(m.get_ro_slice(CHIP8_FONT_ADDR, 80), &CHIP8_FONT[..]);
        Ok(())
    }

    #[test]
    fn test_oversized_program_rejected() {
        let mut m = Chip8Ram::new();
        let prog = vec![0u8; CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize + 1];
        assert!(matches!(
            load_images(&mut m, &prog),
            Err(HarnessError::OutOfBounds { .. })
        ));
    }
}
