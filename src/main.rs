use std::error::Error;

use chip8_harness::display::TermDisplay;
use chip8_harness::error::CoreError;
use chip8_harness::input::{KEY_COUNT, NO_KEY};
use chip8_harness::memory::{Chip8Ram, MemoryMap, CHIP8_FONT_ADDR};
use chip8_harness::sound::SimpleBeep;
use chip8_harness::{terminal, ExecutionCore, Harness, HarnessConfig, HostImports};

/// test card for the harness: draws the hex font out of its own memory, then
/// shows the last key pressed and beeps while any key is held
struct FontCard {
    ram: Chip8Ram,
    drawn: bool,
    shown: Option<u8>,
}

impl FontCard {
    fn new() -> Self {
        FontCard {
            ram: Chip8Ram::new(),
            drawn: false,
            shown: None,
        }
    }

    // 4x5 glyph, xored in like a DXYN would
    fn draw_glyph(&self, host: &mut dyn HostImports, glyph: u8, x: u8, y: u8) {
        let base = CHIP8_FONT_ADDR as usize + (glyph as usize & 0x0f) * 5;
        for (row, bits) in self.ram.bytes()[base..base + 5].iter().enumerate() {
            for bit in 0..4 {
                if bits & (0x80 >> bit) != 0 {
                    host.toggle_pixel(x + bit, y + row as u8);
                }
            }
        }
    }
}

impl MemoryMap for FontCard {
    fn bytes(&self) -> &[u8] {
        self.ram.bytes()
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        self.ram.bytes_mut()
    }
}

impl ExecutionCore for FontCard {
    fn advance_timers(&mut self, _host: &mut dyn HostImports) -> Result<(), CoreError> {
        Ok(())
    }

    fn run_cycle(&mut self, host: &mut dyn HostImports) -> Result<bool, CoreError> {
        if !self.drawn {
            host.clear_screen();
            for glyph in 0..16u8 {
                self.draw_glyph(host, glyph, 2 + (glyph % 8) * 8, 4 + (glyph / 8) * 8);
            }
            self.drawn = true;
            return Ok(true);
        }

        if (0..KEY_COUNT as u8).any(|id| host.is_key_down(id)) {
            host.enable_sound();
        } else {
            host.disable_sound();
        }

        let key = host.consume_key();
        if key == NO_KEY {
            return Ok(true);
        }
        // xor the old one away before drawing the new one
        if let Some(old) = self.shown.replace(key) {
            self.draw_glyph(host, old, 30, 22);
        }
        self.draw_glyph(host, key, 30, 22);
        Ok(true)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = HarnessConfig::default();
    let mut harness = Harness::new(&config, Box::new(SimpleBeep::new()))?;
    harness.load(Box::new(FontCard::new()), &[])?;

    let mut display = TermDisplay::new()?;
    terminal::run(&mut harness, &mut display, &config)?;

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..4 {
        println!();
    }
    Ok(())
}
