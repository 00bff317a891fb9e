use crate::config::HarnessConfig;
use crate::display::Display;
use crate::error::HarnessError;
use crate::harness::Harness;
use crate::input::{InputAction, TermInput};
use crate::scheduler::Tick;
use crossterm::terminal;
use log::{error, info};
use std::io;
use std::time::{Duration, Instant};

/// raw mode for as long as this is alive, so keys arrive one at a time
pub struct RawMode;

impl RawMode {
    pub fn enable() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// whether the refresh loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Done,
}

/// One refresh callback: run the harness at `timestamp` ms and redraw if a
/// frame was processed. `Done` once there's no session left.
pub fn refresh(
    harness: &mut Harness,
    display: &mut dyn Display,
    timestamp: f64,
) -> Result<Flow, HarnessError> {
    match harness.on_refresh(timestamp)? {
        Tick::Frame { .. } => {
            display.draw(harness.host().frame.presented())?;
            Ok(Flow::Continue)
        }
        Tick::Started | Tick::Waiting => Ok(Flow::Continue),
        Tick::Stopped => Ok(Flow::Done),
    }
}

/// Play the loaded session in the terminal until Escape, or until the session
/// dies. Refresh callbacks come at `config.refresh_rate_hz`, stamped with ms
/// since the loop started, and the screen is redrawn after every processed
/// frame.
pub fn run(
    harness: &mut Harness,
    display: &mut dyn Display,
    config: &HarnessConfig,
) -> Result<(), HarnessError> {
    let _raw = RawMode::enable()?;
    let mut input = TermInput::new(Duration::from_millis(config.key_hold_ms));
    let period = Duration::from_secs_f64(1.0 / config.refresh_rate_hz);
    let epoch = Instant::now();

    let result = loop {
        let refresh_start = Instant::now();

        match input.dispatch(harness.keyboard_mut()) {
            Ok(InputAction::Quit) => {
                info!("quit requested");
                break Ok(());
            }
            Ok(InputAction::Continue) => {}
            Err(e) => break Err(HarnessError::from(e)),
        }

        let timestamp = epoch.elapsed().as_secs_f64() * 1000.0;
        match refresh(harness, display, timestamp) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Done) => break Ok(()),
            Err(e) => break Err(e),
        }

        // sleep off what's left of this refresh
        if let Some(rest) = period.checked_sub(refresh_start.elapsed()) {
            spin_sleep::sleep(rest);
        }
    };

    if let Err(e) = harness.stop() {
        error!("couldn't silence audio: {}", e);
    }
    result
}
