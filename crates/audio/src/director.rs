//! The audio state machine: looping layers, one-shot cues, and crossfades.
//!
//! Every request is an intent. Backend failures are logged and dropped so
//! that audio never affects game flow.

use crate::backend::AudioBackend;
use crate::sound::{Cue, Layer, Sound, CLICK_POOL_SIZE};
use std::collections::HashMap;

/// Movement loop playback rate while boosting.
pub const BOOST_PLAYBACK_RATE: f64 = 1.5;

/// Director-side view of a looping layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelState {
    pub is_playing: bool,
    pub volume: f64,
    pub looping: bool,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    start: f64,
    target: f64,
    elapsed: f32,
    duration: f32,
    pause_at_end: bool,
}

impl Fade {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    fn volume(&self) -> f64 {
        self.start + (self.target - self.start) * self.progress() as f64
    }
}

pub struct AudioDirector {
    backend: Box<dyn AudioBackend>,
    channels: HashMap<Layer, ChannelState>,
    fades: HashMap<Layer, Fade>,
    boosting: bool,
    next_click: u8,
    ambient_deferred: bool,
    deferral_spent: bool,
    torn_down: bool,
}

impl AudioDirector {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            channels: Self::initial_channels(),
            fades: HashMap::new(),
            boosting: false,
            next_click: 0,
            ambient_deferred: false,
            deferral_spent: false,
            torn_down: false,
        }
    }

    fn initial_channels() -> HashMap<Layer, ChannelState> {
        Layer::ALL
            .iter()
            .map(|&layer| {
                let asset = layer.sound().asset();
                (
                    layer,
                    ChannelState {
                        is_playing: false,
                        volume: asset.volume,
                        looping: asset.looping,
                    },
                )
            })
            .collect()
    }

    /// Start the ambient bed. If the backend refuses, playback is retried
    /// once on the first user input.
    pub fn start_ambient(&mut self) {
        let volume = Layer::Ambient.sound().asset().volume;
        match self.backend.play(Sound::Ambient, volume, true) {
            Ok(()) => self.mark_playing(Layer::Ambient, volume),
            Err(e) if !self.deferral_spent => {
                log::info!("Ambient playback deferred until first input: {}", e);
                self.ambient_deferred = true;
            }
            Err(e) => log::warn!("Ambient playback failed: {}", e),
        }
    }

    /// Call on any click or key press.
    pub fn notify_user_input(&mut self) {
        if !self.ambient_deferred {
            return;
        }
        self.ambient_deferred = false;
        self.deferral_spent = true;
        if self.channel(Layer::Battle).is_playing {
            return;
        }
        self.start_ambient();
    }

    pub fn is_ambient_deferred(&self) -> bool {
        self.ambient_deferred
    }

    pub fn play_movement(&mut self) {
        if self.channel(Layer::Movement).is_playing {
            return;
        }
        let volume = Layer::Movement.sound().asset().volume;
        if self.play_layer(Layer::Movement, volume) && self.boosting {
            self.backend
                .set_playback_rate(Sound::Movement, BOOST_PLAYBACK_RATE);
        }
    }

    pub fn stop_movement(&mut self) {
        if !self.channel(Layer::Movement).is_playing {
            return;
        }
        self.pause_layer(Layer::Movement);
    }

    /// Adjust the movement loop rate without restarting it.
    pub fn set_boost(&mut self, active: bool) {
        if self.boosting == active {
            return;
        }
        self.boosting = active;
        let rate = if active { BOOST_PLAYBACK_RATE } else { 1.0 };
        self.backend.set_playback_rate(Sound::Movement, rate);
    }

    pub fn play_cue(&mut self, cue: Cue) {
        let sound = match cue {
            Cue::Click => {
                let slot = self.next_click;
                self.next_click = (self.next_click + 1) % CLICK_POOL_SIZE;
                Sound::Click(slot)
            }
            Cue::QuestCompleted => Sound::QuestCompleted,
            Cue::Victory => Sound::Victory,
            Cue::Warning => Sound::Warning,
            Cue::Laser => Sound::Laser,
        };
        let asset = sound.asset();
        if let Err(e) = self.backend.play(sound, asset.volume, false) {
            log::warn!("Cue {:?} failed: {}", cue, e);
        }
    }

    /// Ramp `from` down to silence and `to` up from silence to its nominal
    /// volume over `duration` seconds, pausing `from` at the end. A new
    /// crossfade replaces any fade still running on either layer.
    pub fn crossfade(&mut self, from: Layer, to: Layer, duration: f32) {
        let from_volume = self.channel(from).volume;
        if self.channel(from).is_playing {
            self.fades.insert(
                from,
                Fade {
                    start: from_volume,
                    target: 0.0,
                    elapsed: 0.0,
                    duration,
                    pause_at_end: true,
                },
            );
        } else {
            self.fades.remove(&from);
        }

        if self.play_layer(to, 0.0) {
            self.fades.insert(
                to,
                Fade {
                    start: 0.0,
                    target: to.sound().asset().volume,
                    elapsed: 0.0,
                    duration,
                    pause_at_end: false,
                },
            );
        } else {
            self.fades.remove(&to);
        }
        log::debug!("Crossfade {:?} -> {:?} over {:.2}s", from, to, duration);

        if duration <= 0.0 {
            self.update(0.0);
        }
    }

    pub fn start_typewriter(&mut self) {
        let volume = Layer::Typewriter.sound().asset().volume;
        self.play_layer(Layer::Typewriter, volume);
    }

    pub fn stop_typewriter(&mut self) {
        if self.channel(Layer::Typewriter).is_playing {
            self.pause_layer(Layer::Typewriter);
        }
    }

    pub fn set_master_volume(&mut self, volume: f64) {
        self.backend.set_master_volume(volume.clamp(0.0, 1.0));
    }

    /// Advance running fades by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let mut finished = Vec::new();
        for (layer, fade) in self.fades.iter_mut() {
            fade.elapsed += dt;
            let volume = fade.volume();
            self.backend.set_volume(layer.sound(), volume);
            if let Some(channel) = self.channels.get_mut(layer) {
                channel.volume = volume;
            }
            if fade.progress() >= 1.0 {
                finished.push((*layer, fade.pause_at_end));
            }
        }
        for (layer, pause) in finished {
            self.fades.remove(&layer);
            if pause {
                self.pause_layer(layer);
            }
        }
    }

    pub fn channel(&self, layer: Layer) -> ChannelState {
        self.channels.get(&layer).copied().unwrap_or(ChannelState {
            is_playing: false,
            volume: 0.0,
            looping: true,
        })
    }

    pub fn is_fading(&self, layer: Layer) -> bool {
        self.fades.contains_key(&layer)
    }

    /// Return to the freshly-constructed state and restart ambient.
    pub fn reset(&mut self) {
        self.backend.stop_all();
        self.channels = Self::initial_channels();
        self.fades.clear();
        self.boosting = false;
        self.next_click = 0;
        self.ambient_deferred = false;
        self.deferral_spent = false;
        self.torn_down = false;
        self.start_ambient();
    }

    /// Stop everything. Also runs on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.fades.clear();
        for channel in self.channels.values_mut() {
            channel.is_playing = false;
        }
        self.backend.stop_all();
    }

    /// Start a looping layer. A refused layer stays marked stopped so a later
    /// stop never pauses a handle the backend does not have.
    fn play_layer(&mut self, layer: Layer, volume: f64) -> bool {
        match self.backend.play(layer.sound(), volume, true) {
            Ok(()) => {
                self.mark_playing(layer, volume);
                true
            }
            Err(e) => {
                log::warn!("Layer {:?} failed to start: {}", layer, e);
                false
            }
        }
    }

    fn mark_playing(&mut self, layer: Layer, volume: f64) {
        if let Some(channel) = self.channels.get_mut(&layer) {
            channel.is_playing = true;
            channel.volume = volume;
        }
    }

    fn pause_layer(&mut self, layer: Layer) {
        self.backend.pause(layer.sound());
        if let Some(channel) = self.channels.get_mut(&layer) {
            channel.is_playing = false;
            channel.volume = layer.sound().asset().volume;
        }
    }
}

impl Drop for AudioDirector {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AudioError;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(Sound, f64),
        Pause(Sound),
        Volume(Sound, f64),
        Rate(Sound, f64),
        StopAll,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
        refused: Rc<RefCell<HashSet<Sound>>>,
    }

    impl Recorder {
        fn plays_of(&self, sound: Sound) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| matches!(c, Call::Play(s, _) if *s == sound))
                .count()
        }

        fn count(&self, call: &Call) -> usize {
            self.calls.borrow().iter().filter(|c| *c == call).count()
        }
    }

    impl AudioBackend for Recorder {
        fn play(&mut self, sound: Sound, volume: f64, _looping: bool) -> Result<(), AudioError> {
            if self.refused.borrow().contains(&sound) {
                return Err(AudioError::Refused {
                    sound,
                    reason: "blocked".into(),
                });
            }
            self.calls.borrow_mut().push(Call::Play(sound, volume));
            Ok(())
        }

        fn pause(&mut self, sound: Sound) {
            self.calls.borrow_mut().push(Call::Pause(sound));
        }

        fn set_volume(&mut self, sound: Sound, volume: f64) {
            self.calls.borrow_mut().push(Call::Volume(sound, volume));
        }

        fn set_playback_rate(&mut self, sound: Sound, rate: f64) {
            self.calls.borrow_mut().push(Call::Rate(sound, rate));
        }

        fn stop_all(&mut self) {
            self.calls.borrow_mut().push(Call::StopAll);
        }
    }

    fn director() -> (AudioDirector, Recorder) {
        let recorder = Recorder::default();
        (AudioDirector::new(Box::new(recorder.clone())), recorder)
    }

    #[test]
    fn movement_play_and_stop_are_idempotent() {
        let (mut audio, rec) = director();
        audio.play_movement();
        audio.play_movement();
        assert_eq!(rec.plays_of(Sound::Movement), 1);
        assert!(audio.channel(Layer::Movement).is_playing);

        audio.stop_movement();
        audio.stop_movement();
        assert_eq!(rec.count(&Call::Pause(Sound::Movement)), 1);
        assert!(!audio.channel(Layer::Movement).is_playing);
    }

    #[test]
    fn boost_changes_rate_without_restarting() {
        let (mut audio, rec) = director();
        audio.play_movement();
        audio.set_boost(true);
        audio.set_boost(true);
        audio.set_boost(false);
        assert_eq!(rec.plays_of(Sound::Movement), 1);
        assert_eq!(rec.count(&Call::Rate(Sound::Movement, BOOST_PLAYBACK_RATE)), 1);
        assert_eq!(rec.count(&Call::Rate(Sound::Movement, 1.0)), 1);
    }

    #[test]
    fn clicks_rotate_through_the_pool() {
        let (mut audio, rec) = director();
        for _ in 0..4 {
            audio.play_cue(Cue::Click);
        }
        let plays: Vec<Sound> = rec
            .calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Play(s, _) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(
            plays,
            vec![Sound::Click(0), Sound::Click(1), Sound::Click(2), Sound::Click(0)]
        );
    }

    #[test]
    fn cues_restart_on_every_trigger() {
        let (mut audio, rec) = director();
        audio.play_cue(Cue::Laser);
        audio.play_cue(Cue::Laser);
        assert_eq!(rec.plays_of(Sound::Laser), 2);
    }

    #[test]
    fn crossfade_ramps_linearly_and_pauses_source() {
        let (mut audio, rec) = director();
        audio.start_ambient();
        audio.crossfade(Layer::Ambient, Layer::Battle, 0.4);
        assert!(rec.count(&Call::Play(Sound::Battle, 0.0)) == 1);

        audio.update(0.2);
        let ambient = audio.channel(Layer::Ambient).volume;
        let battle = audio.channel(Layer::Battle).volume;
        assert!((ambient - 0.125).abs() < 1e-6);
        assert!((battle - 0.175).abs() < 1e-6);

        audio.update(0.2);
        assert!(!audio.channel(Layer::Ambient).is_playing);
        assert_eq!(rec.count(&Call::Pause(Sound::Ambient)), 1);
        assert!(audio.channel(Layer::Battle).is_playing);
        assert!((audio.channel(Layer::Battle).volume - 0.35).abs() < 1e-6);
        assert!(!audio.is_fading(Layer::Battle));
    }

    #[test]
    fn ambient_and_battle_never_both_at_full_volume() {
        let (mut audio, _) = director();
        audio.start_ambient();
        audio.crossfade(Layer::Ambient, Layer::Battle, 0.4);
        for _ in 0..30 {
            audio.update(0.016);
            let a = audio.channel(Layer::Ambient);
            let b = audio.channel(Layer::Battle);
            let a_full = a.is_playing && (a.volume - 0.25).abs() < 1e-9;
            let b_full = b.is_playing && (b.volume - 0.35).abs() < 1e-9;
            assert!(!(a_full && b_full));
        }
    }

    #[test]
    fn later_crossfade_wins() {
        let (mut audio, _) = director();
        audio.start_ambient();
        audio.crossfade(Layer::Ambient, Layer::Battle, 0.4);
        audio.update(0.1);
        audio.crossfade(Layer::Battle, Layer::Ambient, 1.0);
        audio.update(0.5);
        audio.update(0.6);
        assert!(!audio.is_fading(Layer::Ambient));
        assert!(!audio.is_fading(Layer::Battle));
        assert!(audio.channel(Layer::Ambient).is_playing);
        assert!((audio.channel(Layer::Ambient).volume - 0.25).abs() < 1e-6);
        assert!(!audio.channel(Layer::Battle).is_playing);
    }

    #[test]
    fn blocked_ambient_retries_once_on_first_input() {
        let (mut audio, rec) = director();
        rec.refused.borrow_mut().insert(Sound::Ambient);
        audio.start_ambient();
        assert!(audio.is_ambient_deferred());
        assert!(!audio.channel(Layer::Ambient).is_playing);

        rec.refused.borrow_mut().clear();
        audio.notify_user_input();
        audio.notify_user_input();
        assert_eq!(rec.plays_of(Sound::Ambient), 1);
        assert!(audio.channel(Layer::Ambient).is_playing);
        assert!(!audio.is_ambient_deferred());
    }

    #[test]
    fn playback_failures_are_swallowed() {
        let (mut audio, rec) = director();
        rec.refused.borrow_mut().insert(Sound::Laser);
        rec.refused.borrow_mut().insert(Sound::Typewriter);
        audio.play_cue(Cue::Laser);
        audio.start_typewriter();
        assert!(!audio.channel(Layer::Typewriter).is_playing);
        audio.stop_typewriter();
        assert_eq!(rec.plays_of(Sound::Laser), 0);
        assert_eq!(rec.count(&Call::Pause(Sound::Typewriter)), 0);
    }

    #[test]
    fn refused_crossfade_target_is_not_faded_in() {
        let (mut audio, rec) = director();
        audio.start_ambient();
        rec.refused.borrow_mut().insert(Sound::Battle);
        audio.crossfade(Layer::Ambient, Layer::Battle, 0.4);
        assert!(!audio.channel(Layer::Battle).is_playing);
        assert!(!audio.is_fading(Layer::Battle));
        audio.update(0.5);
        assert!(!audio.channel(Layer::Ambient).is_playing);
        assert_eq!(rec.count(&Call::Pause(Sound::Battle)), 0);
    }

    #[test]
    fn typewriter_loop_follows_start_and_stop() {
        let (mut audio, rec) = director();
        audio.start_typewriter();
        assert!(audio.channel(Layer::Typewriter).is_playing);
        audio.stop_typewriter();
        audio.stop_typewriter();
        assert_eq!(rec.count(&Call::Pause(Sound::Typewriter)), 1);
    }

    #[test]
    fn drop_tears_down_once() {
        let (mut audio, rec) = director();
        audio.start_ambient();
        audio.teardown();
        drop(audio);
        assert_eq!(rec.count(&Call::StopAll), 1);
    }
}
