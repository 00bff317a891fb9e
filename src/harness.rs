use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::host::Host;
use crate::input::KeyboardLatch;
use crate::interpreter::ExecutionCore;
use crate::memory::load_images;
use crate::scheduler::{Scheduler, Tick};
use crate::sound::Sound;
use log::{debug, error, info};
use std::io;

/// Owns the long-lived host pieces and the current session's core.
///
/// A session starts with `load` and lasts until the next `load`, `stop`, or a
/// failure during a refresh. The keyboard bindings, screen and speaker outlive
/// a session, but held and latched keys, the tone and the core don't.
pub struct Harness {
    host: Host,
    scheduler: Scheduler,
    core: Option<Box<dyn ExecutionCore>>,
}

impl Harness {
    /// fails if the configured keymap is unusable
    pub fn new(config: &HarnessConfig, sound: Box<dyn Sound>) -> Result<Self, HarnessError> {
        let keyboard = KeyboardLatch::new(&config.keymap)?;
        Ok(Harness::with_host(config, Host::new(keyboard, sound, config.diagnostics)))
    }

    pub fn with_host(config: &HarnessConfig, host: Host) -> Self {
        Harness {
            host,
            scheduler: Scheduler::new(config),
            core: None,
        }
    }

    /// Start a new session on a freshly created `core`. Whatever was running
    /// is stopped first; if the font or program don't fit there's no session
    /// afterwards.
    pub fn load(
        &mut self,
        mut core: Box<dyn ExecutionCore>,
        program: &[u8],
    ) -> Result<(), HarnessError> {
        self.stop()?;
        load_images(&mut *core, program)?;
        self.host.frame.reset();
        self.core = Some(core);
        info!("session started with {} byte program", program.len());
        Ok(())
    }

    /// same as `load`, reading the program from a ROM file or similar
    pub fn load_reader(
        &mut self,
        core: Box<dyn ExecutionCore>,
        reader: &mut impl io::Read,
    ) -> Result<(), HarnessError> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load(core, &program)
    }

    /// One display refresh. An error ends the session, and every call after
    /// that is `Tick::Stopped` until the next `load`.
    pub fn on_refresh(&mut self, timestamp: f64) -> Result<Tick, HarnessError> {
        let core = match self.core.as_mut() {
            Some(core) => core,
            None => return Ok(Tick::Stopped),
        };
        match self.scheduler.on_refresh(timestamp, &mut **core, &mut self.host) {
            Ok(tick) => Ok(tick),
            Err(e) => {
                error!("session terminated: {}", e);
                // report the failure that ended it, not a follow-on one
                if let Err(stop_err) = self.stop() {
                    error!("couldn't silence audio: {}", stop_err);
                }
                Err(e)
            }
        }
    }

    /// end the session: no more callbacks are processed, keys are let go and
    /// the tone stops
    pub fn stop(&mut self) -> Result<(), HarnessError> {
        self.scheduler.cancel();
        if self.core.take().is_some() {
            debug!("session stopped");
        }
        self.host.keyboard.reset();
        self.host.silence()
    }

    pub fn is_running(&self) -> bool {
        self.core.is_some()
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardLatch {
        &mut self.host.keyboard
    }

    /// the running core, e.g. for inspecting its memory
    pub fn core(&self) -> Option<&dyn ExecutionCore> {
        self.core.as_deref()
    }
}
