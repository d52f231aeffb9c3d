//! Game lifecycle facade
//!
//! Owns the simulation plus its collaborators (storage, audio, frame clock)
//! and exposes the calls a host drives: start, pause, per-frame tick, input,
//! resize and render. Every call flushes changed documents and routes the
//! events it produced to audio.

use glam::Vec2;

use crate::audio::{AudioCue, AudioSink};
use crate::consts::COMBO_CUE_THRESHOLD;
use crate::persistence::{self, KeyValueStore};
use crate::platform::{self, FrameClock};
use crate::profile::Profile;
use crate::renderer::{self, DrawSurface};
use crate::settings::Settings;
use crate::sim::{self, BubbleKind, GameEvent, GamePhase, GameState};

pub struct Game<S: KeyValueStore, A: AudioSink> {
    state: GameState,
    profile: Profile,
    settings: Settings,
    store: S,
    audio: A,
    clock: FrameClock,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore, A: AudioSink> Game<S, A> {
    /// Load persisted documents and set up a game ready to start
    pub fn new(store: S, mut audio: A, seed: u64) -> Self {
        let profile = Profile::load(&store);
        let settings: Settings = persistence::load_document(&store, Settings::STORAGE_KEY);
        audio.set_sound_enabled(settings.sound);
        audio.set_music_enabled(settings.music);

        log::info!(
            "Profile loaded: best score {}, {} games, {} secrets",
            profile.stats.best_score,
            profile.stats.total_games,
            profile.secrets_found()
        );

        Self {
            state: GameState::new(seed),
            profile,
            settings,
            store,
            audio,
            clock: FrameClock::new(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Start a new game (also used for restart)
    pub fn start(&mut self) {
        let rate = self.settings.difficulty.spawn_rate_ms();
        sim::start_game(&mut self.state, &mut self.profile, rate);
        self.clock.rebase();

        if let Err(e) = self.audio.start_music() {
            log::warn!("Music failed to start: {}", e);
        }
        self.finish_call();
    }

    pub fn toggle_pause(&mut self) -> GamePhase {
        let before = self.state.phase;
        sim::toggle_pause(&mut self.state);
        self.after_phase_change(before);
        self.finish_call();
        self.state.phase
    }

    /// Advance to the animation-frame timestamp.
    ///
    /// Returns false once the game is over and the frame loop can stop.
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        if self.state.phase == GamePhase::Running {
            let dt = self.clock.delta(timestamp_ms);
            sim::tick(&mut self.state, &mut self.profile, dt);
            self.finish_call();
        }
        self.state.phase != GamePhase::GameOver
    }

    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> bool {
        let popped = sim::pointer_down(
            &mut self.state,
            &mut self.profile,
            Vec2::new(x, y),
            platform::now_ms(),
        );
        self.finish_call();
        popped
    }

    /// Returns true when the pointer is over a bubble
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        sim::pointer_move(&mut self.state, Vec2::new(x, y))
    }

    pub fn handle_key_down(&mut self, key: &str) {
        let before = self.state.phase;
        sim::key_down(&mut self.state, &mut self.profile, key, platform::now_ms());
        self.after_phase_change(before);
        self.finish_call();
    }

    /// Track the drawing surface size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_play_area(width, height);
    }

    pub fn render<D: DrawSurface + ?Sized>(&self, surface: &mut D) {
        renderer::draw_frame(surface, &self.state);
    }

    /// Replace and persist user settings
    pub fn update_settings(&mut self, settings: Settings) {
        self.audio.set_sound_enabled(settings.sound);
        self.audio.set_music_enabled(settings.music);
        // Music only plays during a game
        if settings.music && !self.settings.music && self.state.phase == GamePhase::Running {
            if let Err(e) = self.audio.start_music() {
                log::warn!("Music failed to start: {}", e);
            }
        }
        self.settings = settings;
        persistence::save_document(&mut self.store, Settings::STORAGE_KEY, &self.settings);
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn after_phase_change(&mut self, before: GamePhase) {
        if before == GamePhase::Paused && self.state.phase == GamePhase::Running {
            // No catch-up for time spent paused
            self.clock.rebase();
        }
    }

    fn finish_call(&mut self) {
        for event in std::mem::take(&mut self.state.events) {
            self.route(&event);
            self.events.push(event);
        }
        self.profile.flush(&mut self.store);
    }

    fn route(&mut self, event: &GameEvent) {
        let cue = match event {
            GameEvent::BubblePopped { kind, combo, .. } => {
                if *combo >= COMBO_CUE_THRESHOLD {
                    self.play(AudioCue::Combo);
                }
                if *kind == BubbleKind::Special {
                    AudioCue::Special
                } else {
                    AudioCue::Pop
                }
            }
            GameEvent::LevelUp { .. } => AudioCue::LevelUp,
            GameEvent::GameOver { .. } => {
                self.audio.stop_music();
                AudioCue::GameOver
            }
            GameEvent::AchievementUnlocked { title, .. } => {
                log::info!("Achievement unlocked: {}", title);
                return;
            }
            _ => return,
        };
        self.play(cue);
    }

    fn play(&mut self, cue: AudioCue) {
        if let Err(e) = self.audio.play(cue) {
            log::warn!("Audio cue {:?} failed: {}", cue, e);
        }
    }
}
