//! Headless host loop for the VipChip interpreter.

mod keyscript;
mod session;

use anyhow::{Context, Result};
use typed_builder::TypedBuilder;
use vipchip_common::Palette;
use vipchip_core::timing::CYCLES_PER_FRAME;
use vipchip_core::Config;

pub use keyscript::KeyScript;
pub use session::{FrameReport, HostInterpreter, Session};

#[derive(Clone, Debug, TypedBuilder)]
pub struct HostConfig {
    /// Clock budget per frame; one timer period runs the VIP at full speed.
    #[builder(default = CYCLES_PER_FRAME)]
    pub cycles_per_frame: u32,
    #[builder(default = 600)]
    pub frames: u64,
    #[builder(default)]
    pub palette: Palette,
    #[builder(default)]
    pub keys: KeyScript,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig::builder().build()
    }
}

/// Load `rom` and run up to `host.frames` frames, stopping early on a
/// fault. The session is returned either way so the caller can inspect
/// the final state.
pub fn run(rom: &[u8], config: Config, host: HostConfig) -> Result<Session> {
    let mut session = Session::new(config, &host);
    session
        .load(rom)
        .with_context(|| format!("failed to load {} byte program", rom.len()))?;

    if let Some(last) = host.keys.last_frame().filter(|&last| last >= host.frames) {
        log::warn!("key script changes keys at frame {last}, past the last frame run");
    }
    log::info!(
        "running {} frames at {} clocks per frame",
        host.frames,
        host.cycles_per_frame
    );
    let mut sound_frames = 0;
    for _ in 0..host.frames {
        let report = session.run_frame();
        if report.sound {
            sound_frames += 1;
        }
        if let Some(fault) = report.fault {
            log::warn!("stopped at frame {}: {fault}", report.frame);
            break;
        }
    }
    log::info!(
        "finished after {} frames, {} clocks, tone on for {} frames",
        session.frame(),
        session.interpreter().cycles(),
        sound_frames
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vipchip_core::Fault;

    #[test]
    fn runs_the_configured_frames() {
        let host = HostConfig::builder().frames(5).build();
        let session = run(&[0x12, 0x00], Config::default(), host).unwrap();
        assert_eq!(session.frame(), 5);
        assert!(session.interpreter().is_ok());
    }

    #[test]
    fn stops_on_fault() {
        // Recurse until the stack overflows.
        let host = HostConfig::builder().frames(100).build();
        let session = run(&[0x22, 0x00], Config::default(), host).unwrap();
        assert_eq!(session.frame(), 1);
        assert_eq!(
            session.interpreter().last_error(),
            Some(Fault::StackOverflow)
        );
    }

    #[test]
    fn rejects_unloadable_programs() {
        let err = run(&[], Config::default(), HostConfig::default()).err();
        let err = err.expect("empty program is rejected");
        let fault = err.downcast_ref::<Fault>();
        assert_eq!(fault, Some(&Fault::NoProgram));
        assert!(fault.is_some_and(|fault| fault.is_load_fault()));

        let too_large = vec![0x12; 0x1000];
        let err = run(&too_large, Config::default(), HostConfig::default()).err();
        let fault = err.as_ref().and_then(|err| err.downcast_ref::<Fault>());
        assert_eq!(fault, Some(&Fault::ProgramTooLarge));
        assert!(fault.is_some_and(|fault| fault.is_load_fault()));
    }
}
