//! Outbound events: ticker lines, sound cues and animation frames.
//!
//! The turn core never waits on presentation. It pushes events into an
//! [`EventSink`] and carries on; an animation driver, a sound player or a log
//! view consume them at their own pace. None of these events feed back into
//! game logic.

use strum::IntoStaticStr;

use crate::ability::AbilityKind;
use crate::geometry::Position;
use crate::state::UnitId;

/// Sound cues requested by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SoundCue {
    Hit,
    Miss,
    Death,
    LevelUp,
    Footstep,
    OpenDoor,
    /// Illegal input or a move into something immovable.
    Blocked,
    Pickup,
    Spell,
}

/// What the acting unit looks like it is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activity {
    Idle,
    Walk,
    Attack,
    Cast,
    Hurt,
}

/// Suggested time the animation driver should spend on a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pacing {
    Instant,
    Short,
    Long,
}

/// A missile travelling between two tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projectile {
    pub ability: AbilityKind,
    pub from: Position,
    pub to: Position,
}

/// One step of visual sequencing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub actor: UnitId,
    pub activity: Activity,
    pub projectile: Option<Projectile>,
    pub pacing: Pacing,
}

impl Frame {
    pub fn new(actor: UnitId, activity: Activity, pacing: Pacing) -> Self {
        Self {
            actor,
            activity,
            projectile: None,
            pacing,
        }
    }

    pub fn with_projectile(mut self, projectile: Projectile) -> Self {
        self.projectile = Some(projectile);
        self
    }
}

/// Presentation collaborators seen from the core.
pub trait EventSink {
    /// Appends one line to the in-game ticker.
    fn log(&mut self, message: &str, turn: u64);

    fn play_sound(&mut self, cue: SoundCue);

    fn frame(&mut self, frame: Frame);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn log(&mut self, _message: &str, _turn: u64) {}

    fn play_sound(&mut self, _cue: SoundCue) {}

    fn frame(&mut self, _frame: Frame) {}
}

/// A recorded event, in emission order.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Log { message: String, turn: u64 },
    Sound(SoundCue),
    Frame(Frame),
}

/// Keeps every event for later inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Vec<GameEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn logs(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            GameEvent::Log { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn sounds(&self) -> impl Iterator<Item = SoundCue> + '_ {
        self.events.iter().filter_map(|event| match event {
            GameEvent::Sound(cue) => Some(*cue),
            _ => None,
        })
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.events.iter().filter_map(|event| match event {
            GameEvent::Frame(frame) => Some(frame),
            _ => None,
        })
    }

    pub fn count_sound(&self, cue: SoundCue) -> usize {
        self.sounds().filter(|played| *played == cue).count()
    }

    /// True if some ticker line contains `needle`.
    pub fn logged(&self, needle: &str) -> bool {
        self.logs().any(|line| line.contains(needle))
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn log(&mut self, message: &str, turn: u64) {
        self.events.push(GameEvent::Log {
            message: message.to_string(),
            turn,
        });
    }

    fn play_sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    fn frame(&mut self, frame: Frame) {
        self.events.push(GameEvent::Frame(frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.play_sound(SoundCue::Hit);
        sink.log("rat hits hero for 2", 4);
        sink.frame(Frame::new(UnitId(1), Activity::Attack, Pacing::Short));

        assert_eq!(sink.events().len(), 3);
        assert_eq!(sink.events()[0], GameEvent::Sound(SoundCue::Hit));
        assert!(sink.logged("hits hero"));
        assert_eq!(sink.count_sound(SoundCue::Hit), 1);
        assert_eq!(sink.frames().count(), 1);

        assert_eq!(sink.drain().len(), 3);
        assert!(sink.events().is_empty());
    }
}
