use crate::config::{CycleBudget, HarnessConfig};
use crate::error::HarnessError;
use crate::host::Host;
use crate::interpreter::ExecutionCore;
use log::trace;

/// what a refresh callback ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// first callback of a session; only the timestamp was recorded
    Started,
    /// not enough time has passed for another frame
    Waiting,
    /// timers advanced, `cycles` instructions run and the frame presented
    Frame { cycles: u64, stopped_early: bool },
    /// there's no session to run
    Stopped,
}

/// Paces the execution core against display refresh callbacks.
///
/// Idle until the first callback, which only records its timestamp. After
/// that a frame is processed whenever at least `frame_interval` ms have
/// passed: timers advance once, the core gets its cycle budget (or less, if it
/// asks to stop), and the back plane is presented.
pub struct Scheduler {
    last_frame: Option<f64>,
    frame_interval: f64,
    budget: CycleBudget,
}

impl Scheduler {
    pub fn new(config: &HarnessConfig) -> Self {
        Scheduler {
            last_frame: None,
            frame_interval: config.frame_interval_ms,
            budget: config.cycle_budget,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.last_frame.is_none()
    }

    /// forget the last frame; the next callback starts afresh
    pub fn cancel(&mut self) {
        self.last_frame = None;
    }

    /// handle one refresh callback at `timestamp` ms
    pub fn on_refresh<C>(
        &mut self,
        timestamp: f64,
        core: &mut C,
        host: &mut Host,
    ) -> Result<Tick, HarnessError>
    where
        C: ExecutionCore + ?Sized,
    {
        // a broken clock mustn't poison the pacing state
        if !timestamp.is_finite() {
            return Ok(Tick::Waiting);
        }
        let last = match self.last_frame {
            None => {
                self.last_frame = Some(timestamp);
                return Ok(Tick::Started);
            }
            Some(last) => last,
        };

        let elapsed = timestamp - last;
        if elapsed < self.frame_interval {
            return Ok(Tick::Waiting);
        }
        self.last_frame = Some(timestamp);

        core.advance_timers(host)?;
        check_fault(host)?;

        let budget = self.budget_for(elapsed);
        let mut cycles = 0;
        let mut stopped_early = false;
        while cycles < budget {
            let stop = core.run_cycle(host)?;
            cycles += 1;
            check_fault(host)?;
            if stop {
                stopped_early = true;
                break;
            }
        }

        host.frame.present();
        trace!("frame at {:.1}ms: {} cycles", timestamp, cycles);
        Ok(Tick::Frame {
            cycles,
            stopped_early,
        })
    }

    fn budget_for(&self, elapsed: f64) -> u64 {
        match self.budget {
            CycleBudget::Elapsed => elapsed.ceil() as u64,
            CycleBudget::Fixed(n) => n as u64,
        }
    }
}

fn check_fault(host: &mut Host) -> Result<(), HarnessError> {
    match host.take_fault() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
