//! Sound cues
//!
//! The simulation only names what should be heard. A platform backend
//! implements `AudioSink`; playback failures are logged and dropped so a
//! missing or broken device never stalls a frame.

use crate::error::Result;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Footstep while walking on the floor
    Step,
    /// Player struck by a guard
    Hit,
    /// Power-up collected
    PowerUp,
    /// Player died
    Death,
    /// Goal reached
    Goal,
}

impl SoundCue {
    /// Asset stem a file-based backend would load
    pub fn asset_name(self) -> &'static str {
        match self {
            SoundCue::Step => "step",
            SoundCue::Hit => "hit",
            SoundCue::PowerUp => "powerup",
            SoundCue::Death => "death",
            SoundCue::Goal => "goal",
        }
    }
}

/// Platform audio backend
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue) -> Result<()>;

    /// Background drone on/off; backends without music ignore it
    fn set_music(&mut self, _playing: bool) -> Result<()> {
        Ok(())
    }
}

/// Backend that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue) -> Result<()> {
        Ok(())
    }
}

/// Play every cue, swallowing failures
pub fn play_all(sink: &mut dyn AudioSink, cues: &[SoundCue], enabled: bool) {
    if !enabled {
        return;
    }
    for &cue in cues {
        if let Err(e) = sink.play(cue) {
            log::debug!("Ignoring audio failure for {:?}: {}", cue, e);
        }
    }
}
