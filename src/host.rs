use crate::display::FrameBuffer;
use crate::error::HarnessError;
use crate::input::KeyboardLatch;
use crate::sound::{AudioGate, Sound};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Everything an execution core may call while it runs. All of it is
/// synchronous, and none of it reports failure to the core.
pub trait HostImports {
    fn clear_screen(&mut self);
    fn get_random_byte(&mut self) -> u8;
    /// flip a pixel, returning whether it was lit before
    fn toggle_pixel(&mut self, x: u8, y: u8) -> bool;
    fn is_key_down(&mut self, id: u8) -> bool;
    /// latched key id, or `NO_KEY`
    fn consume_key(&mut self) -> u8;
    fn enable_sound(&mut self);
    fn disable_sound(&mut self);
    fn debug_byte(&mut self, value: u8);
    fn debug_word(&mut self, value: u16);
}

/// two uppercase hex digits
pub fn hex_byte(value: u8) -> String {
    format!("{:02X}", value)
}

/// four uppercase hex digits
pub fn hex_word(value: u16) -> String {
    format!("{:04X}", value)
}

/// The harness side of the core's imports: keyboard, screen and sound that
/// outlive any one session, plus a random source.
///
/// An audio failure can't be handed back to the core, so it's parked as a
/// fault for the scheduler to pick up after the call returns.
pub struct Host {
    pub keyboard: KeyboardLatch,
    pub frame: FrameBuffer,
    audio: AudioGate,
    rng: StdRng,
    diagnostics: bool,
    fault: Option<HarnessError>,
}

impl Host {
    pub fn new(keyboard: KeyboardLatch, sound: Box<dyn Sound>, diagnostics: bool) -> Self {
        Host::with_rng(keyboard, sound, diagnostics, StdRng::from_entropy())
    }

    /// same as `new` but with a known random source
    pub fn with_rng(
        keyboard: KeyboardLatch,
        sound: Box<dyn Sound>,
        diagnostics: bool,
        rng: StdRng,
    ) -> Self {
        Host {
            keyboard,
            frame: FrameBuffer::new(),
            audio: AudioGate::new(sound),
            rng,
            diagnostics,
            fault: None,
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.audio.is_active()
    }

    /// turn the tone off outside of a core call, e.g. at session end
    pub fn silence(&mut self) -> Result<(), HarnessError> {
        self.audio.disable()
    }

    /// the first fault raised since the last call, if any
    pub fn take_fault(&mut self) -> Option<HarnessError> {
        self.fault.take()
    }

    fn raise(&mut self, err: HarnessError) {
        warn!("host fault during core call: {}", err);
        if self.fault.is_none() {
            self.fault = Some(err);
        }
    }
}

impl HostImports for Host {
    fn clear_screen(&mut self) {
        self.frame.clear();
    }

    fn get_random_byte(&mut self) -> u8 {
        self.rng.gen()
    }

    fn toggle_pixel(&mut self, x: u8, y: u8) -> bool {
        self.frame.toggle_pixel(x, y)
    }

    fn is_key_down(&mut self, id: u8) -> bool {
        self.keyboard.is_down(id)
    }

    fn consume_key(&mut self) -> u8 {
        self.keyboard.consume_key()
    }

    fn enable_sound(&mut self) {
        if let Err(e) = self.audio.enable() {
            self.raise(e);
        }
    }

    fn disable_sound(&mut self) {
        if let Err(e) = self.audio.disable() {
            self.raise(e);
        }
    }

    fn debug_byte(&mut self, value: u8) {
        if self.diagnostics {
            debug!("{}", hex_byte(value));
        }
    }

    fn debug_word(&mut self, value: u16) {
        if self.diagnostics {
            debug!("{}", hex_word(value));
        }
    }
}
