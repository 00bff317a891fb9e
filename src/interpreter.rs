use crate::error::CoreError;
use crate::host::HostImports;
use crate::memory::MemoryMap;

/// The CHIP-8 instruction interpreter the harness drives.
///
/// The harness never looks inside; it writes the font and program into the
/// core's memory once, then calls the two entry points below. While they run
/// the core calls back into `host` for the screen, keys, sound and randomness.
/// Neither entry point may block.
pub trait ExecutionCore: MemoryMap {
    /// count the delay and sound timers down by one 60Hz tick
    fn advance_timers(&mut self, host: &mut dyn HostImports) -> Result<(), CoreError>;

    /// execute one instruction; `Ok(true)` means nothing more should run
    /// this frame (e.g. it just drew, or it's waiting on a key)
    fn run_cycle(&mut self, host: &mut dyn HostImports) -> Result<bool, CoreError>;
}
