//! Explicit context threaded through every layer of turn resolution.

use rand::RngCore;

use crate::config::GameConfig;
use crate::event::{EventSink, Frame, SoundCue};
use crate::state::{Unit, UnitId, World};

/// Everything a turn needs: the world, the random source, presentation
/// collaborators and the balance tables.
///
/// There is no global state; whoever drives the game builds a context and
/// hands it down to the scheduler, controllers and abilities.
pub struct WorldContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut dyn RngCore,
    pub sink: &'a mut dyn EventSink,
    pub config: &'a GameConfig,
}

impl<'a> WorldContext<'a> {
    pub fn new(
        world: &'a mut World,
        rng: &'a mut dyn RngCore,
        sink: &'a mut dyn EventSink,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            world,
            rng,
            sink,
            config,
        }
    }

    /// Appends a ticker line stamped with the current turn.
    pub fn log(&mut self, message: impl AsRef<str>) {
        self.sink.log(message.as_ref(), self.world.turn);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.sink.play_sound(cue);
    }

    pub fn frame(&mut self, frame: Frame) {
        self.sink.frame(frame);
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.world.unit(id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.world.unit_mut(id)
    }

    /// Display name of a unit, or a placeholder for units no longer on the map.
    pub fn name_of(&self, id: UnitId) -> String {
        self.world
            .unit(id)
            .map_or_else(|| format!("unit {id}"), |unit| unit.name.clone())
    }
}
