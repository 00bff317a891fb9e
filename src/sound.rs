use crate::error::HarnessError;
use beep::beep;
use log::debug;

/// something that can make a constant tone
pub trait Sound {
    fn beep(&mut self) -> Result<(), HarnessError>;
    fn stop(&mut self) -> Result<(), HarnessError>;
}

/// tone pitch in Hz; a concert A
pub const TONE_PITCH: u16 = 440;

/// intended tone gain. The PC speaker has no volume control, so this only
/// matters to sinks that can do something with it
pub const TONE_GAIN: f32 = 0.1;

/// beeps the PC speaker via the beep crate
pub struct SimpleBeep {}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep {}
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), HarnessError> {
        beep(TONE_PITCH).map_err(|e| HarnessError::Audio(e.to_string()))
    }

    fn stop(&mut self) -> Result<(), HarnessError> {
        beep(0).map_err(|e| HarnessError::Audio(e.to_string()))
    }
}

pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), HarnessError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), HarnessError> {
        Ok(())
    }
}

/// On/off switch in front of a `Sound`.
///
/// Enabling while already on does nothing, so at most one tone is ever
/// playing and a single `disable` always silences it.
pub struct AudioGate {
    sound: Box<dyn Sound>,
    active: bool,
}

impl AudioGate {
    pub fn new(sound: Box<dyn Sound>) -> Self {
        AudioGate {
            sound,
            active: false,
        }
    }

    pub fn enable(&mut self) -> Result<(), HarnessError> {
        if self.active {
            return Ok(());
        }
        self.sound.beep()?;
        self.active = true;
        debug!("tone on");
        Ok(())
    }

    pub fn disable(&mut self) -> Result<(), HarnessError> {
        if !self.active {
            return Ok(());
        }
        // whatever happens the tone is considered gone
        self.active = false;
        debug!("tone off");
        self.sound.stop()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for AudioGate {
    fn drop(&mut self) {
        let _ = self.disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// counts tones that are currently sounding
    struct Counting(Rc<Cell<i32>>);

    impl Sound for Counting {
        fn beep(&mut self) -> Result<(), HarnessError> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), HarnessError> {
            self.0.set(self.0.get() - 1);
            Ok(())
        }
    }

    struct Broken;

    impl Sound for Broken {
        fn beep(&mut self) -> Result<(), HarnessError> {
            Err(HarnessError::Audio("no speaker".into()))
        }

        fn stop(&mut self) -> Result<(), HarnessError> {
            Ok(())
        }
    }

    #[test]
    fn test_double_enable_leaves_one_tone() {
        let live = Rc::new(Cell::new(0));
        let mut gate = AudioGate::new(Box::new(Counting(live.clone())));
        gate.enable().unwrap();
        gate.enable().unwrap();
        assert_eq!(live.get(), 1);
        gate.disable().unwrap();
        assert_eq!(live.get(), 0);
        assert!(!gate.is_active());
    }

    #[test]
    fn test_disable_when_off_is_noop() {
        let live = Rc::new(Cell::new(0));
        let mut gate = AudioGate::new(Box::new(Counting(live.clone())));
        gate.disable().unwrap();
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_drop_silences() {
        let live = Rc::new(Cell::new(0));
        {
            let mut gate = AudioGate::new(Box::new(Counting(live.clone())));
            gate.enable().unwrap();
        }
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_failed_enable_stays_off() {
        let mut gate = AudioGate::new(Box::new(Broken));
        assert!(gate.enable().is_err());
        assert!(!gate.is_active());
    }

    #[test]
    fn test_mute_gate() {
        let mut gate = AudioGate::new(Box::new(Mute::new()));
        gate.enable().unwrap();
        assert!(gate.is_active());
        gate.disable().unwrap();
        assert!(!gate.is_active());
    }
}
