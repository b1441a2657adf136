//! Audio manager: named music and sound effects, per-scene music, volume settings.
//!
//! Sounds are registered by name into two tables (music, sfx). Playback spawns
//! `AudioPlayer` entities:
//! - music: at most one entity, tagged `MusicTrack`, replaced on every track change
//! - sfx: fire-and-forget entities that despawn when done
//!
//! On every `SceneLoaded` the track bound to that scene plays, or the default track
//! when the scene has no binding. A track that is already playing is never restarted.
//!
//! Volumes start from the save data and are mirrored back into it on every change.
//! Unknown sound names are logged and skipped.

use std::collections::HashMap;

use bevy::audio::{AudioSinkPlayback, Volume};
use bevy::prelude::*;

use crate::plugins::game_manager::{GameManager, SaveGameRequest};
use crate::plugins::scene::{SceneAnnounce, SceneLoaded};

pub const BUTTON_CLICK: &str = "Button Click";
pub const ATTACK: &str = "Attack";
pub const DASH: &str = "Dash";

/// One registered sound. Never changes after registration.
#[derive(Debug, Clone)]
pub struct SoundEntry {
    pub name: String,
    pub clip: Handle<AudioSource>,
    /// [0, 1], multiplied with the channel volume.
    pub volume: f32,
    /// Playback speed, [0.1, 3].
    pub pitch: f32,
    pub looped: bool,
}

impl SoundEntry {
    pub fn new(name: impl Into<String>, clip: Handle<AudioSource>) -> Self {
        Self {
            name: name.into(),
            clip,
            volume: 1.0,
            pitch: 1.0,
            looped: false,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch.clamp(0.1, 3.0);
        self
    }

    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneMusicBinding {
    pub scene: String,
    pub music: String,
}

/// Marker for the single music entity.
#[derive(Component, Debug, Clone)]
pub struct MusicTrack {
    pub name: String,
}

#[derive(Resource, Debug)]
pub struct AudioManager {
    music: HashMap<String, SoundEntry>,
    sfx: HashMap<String, SoundEntry>,
    scene_music: Vec<SceneMusicBinding>,
    pub default_music: Option<String>,
    pub play_music_on_unknown_scenes: bool,
    music_volume: f32,
    sfx_volume: f32,
    current_music: Option<String>,
    music_entity: Option<Entity>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self {
            music: HashMap::new(),
            sfx: HashMap::new(),
            scene_music: Vec::new(),
            default_music: None,
            play_music_on_unknown_scenes: true,
            music_volume: 1.0,
            sfx_volume: 1.0,
            current_music: None,
            music_entity: None,
        }
    }
}

impl AudioManager {
    /// Register a music track. A second entry with the same name replaces the first.
    pub fn register_music(&mut self, entry: SoundEntry) {
        self.music.insert(entry.name.clone(), entry);
    }

    pub fn register_sfx(&mut self, entry: SoundEntry) {
        self.sfx.insert(entry.name.clone(), entry);
    }

    pub fn bind_scene_music(&mut self, scene: impl Into<String>, music: impl Into<String>) {
        let (scene, music) = (scene.into(), music.into());
        match self.scene_music.iter_mut().find(|b| b.scene == scene) {
            Some(b) => b.music = music,
            None => self.scene_music.push(SceneMusicBinding { scene, music }),
        }
    }

    /// Rebind the music of a scene that already has a binding. Unbound scenes are left alone.
    pub fn add_scene_music(&mut self, scene: &str, music: impl Into<String>) {
        if let Some(b) = self.scene_music.iter_mut().find(|b| b.scene == scene) {
            b.music = music.into();
        }
    }

    #[inline]
    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    #[inline]
    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume
    }

    #[inline]
    pub fn current_music(&self) -> Option<&str> {
        self.current_music.as_deref()
    }

    /// Clamp to [0, 1], apply, and mirror into the save data if there is any.
    pub fn set_music_volume(&mut self, volume: f32, game: Option<&mut GameManager>) -> f32 {
        let v = volume.clamp(0.0, 1.0);
        self.music_volume = v;
        if let Some(game) = game {
            game.data.music_volume = v;
        }
        v
    }

    pub fn set_sfx_volume(&mut self, volume: f32, game: Option<&mut GameManager>) -> f32 {
        let v = volume.clamp(0.0, 1.0);
        self.sfx_volume = v;
        if let Some(game) = game {
            game.data.sfx_volume = v;
        }
        v
    }

    /// Effective volume of the playing track (channel × entry).
    pub fn current_track_volume(&self) -> f32 {
        let entry_volume = self
            .current_music
            .as_ref()
            .and_then(|name| self.music.get(name))
            .map_or(1.0, |e| e.volume);
        self.music_volume * entry_volume
    }

    /// The track a scene should play: its binding, else the default track if the
    /// unknown-scene policy allows it and the track is registered.
    pub fn music_for_scene(&self, scene: &str) -> Option<&str> {
        if let Some(b) = self
            .scene_music
            .iter()
            .find(|b| b.scene == scene && !b.music.is_empty())
        {
            return Some(&b.music);
        }
        if !self.play_music_on_unknown_scenes {
            return None;
        }
        self.default_music
            .as_deref()
            .filter(|name| !name.is_empty() && self.music.contains_key(*name))
    }

    /// Replace the current track. Returns whether anything started.
    pub fn play_music(&mut self, commands: &mut Commands, name: &str) -> bool {
        let Some(entry) = self.music.get(name) else {
            warn!("Music '{name}' not found");
            return false;
        };

        let mode = if entry.looped {
            PlaybackSettings::LOOP
        } else {
            PlaybackSettings::DESPAWN
        };
        let settings = mode
            .with_volume(Volume::Linear(self.music_volume * entry.volume))
            .with_speed(entry.pitch);

        let track = commands
            .spawn((
                Name::new(format!("Music: {name}")),
                MusicTrack { name: name.to_owned() },
                AudioPlayer::new(entry.clip.clone()),
                settings,
            ))
            .id();

        if let Some(old) = self.music_entity.replace(track) {
            commands.entity(old).try_despawn();
        }
        self.current_music = Some(name.to_owned());
        debug!("Playing music '{name}'");
        true
    }

    /// One-shot effect. Returns whether anything started.
    pub fn play_sfx(&self, commands: &mut Commands, name: &str) -> bool {
        let Some(entry) = self.sfx.get(name) else {
            warn!("SFX '{name}' not found");
            return false;
        };

        commands.spawn((
            AudioPlayer::new(entry.clip.clone()),
            PlaybackSettings::DESPAWN
                .with_volume(Volume::Linear(self.sfx_volume * entry.volume))
                .with_speed(entry.pitch),
        ));
        true
    }

    pub fn play_button_click(&self, commands: &mut Commands) {
        self.play_sfx(commands, BUTTON_CLICK);
    }

    pub fn play_attack(&self, commands: &mut Commands) {
        self.play_sfx(commands, ATTACK);
    }

    pub fn play_dash(&self, commands: &mut Commands) {
        self.play_sfx(commands, DASH);
    }

    /// Volumes already live in the save data; this only asks for a write.
    pub fn save_volume_settings(&self, saves: &mut MessageWriter<SaveGameRequest>) {
        saves.write(SaveGameRequest);
    }
}

/// One sound to load at startup. `path` is relative to the asset folder.
#[derive(Debug, Clone)]
pub struct SoundSpec {
    pub name: String,
    pub path: String,
    pub volume: f32,
    pub pitch: f32,
    pub looped: bool,
}

impl SoundSpec {
    fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            volume: 1.0,
            pitch: 1.0,
            looped: false,
        }
    }

    fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    fn entry(&self, clip: Handle<AudioSource>) -> SoundEntry {
        let entry = SoundEntry::new(self.name.clone(), clip)
            .with_volume(self.volume)
            .with_pitch(self.pitch);
        if self.looped { entry.looped() } else { entry }
    }
}

/// What the audio manager registers at startup.
#[derive(Resource, Debug, Clone)]
pub struct SoundBank {
    pub music: Vec<SoundSpec>,
    pub sfx: Vec<SoundSpec>,
    pub scene_music: Vec<SceneMusicBinding>,
    pub default_music: Option<String>,
}

impl Default for SoundBank {
    fn default() -> Self {
        Self {
            music: vec![
                SoundSpec::new("Menu Background Music", "audio/music/menu.wav").looped(),
                SoundSpec::new("Level Music", "audio/music/level.wav")
                    .looped()
                    .with_volume(0.8),
            ],
            sfx: vec![
                SoundSpec::new(BUTTON_CLICK, "audio/sfx/button_click.wav"),
                SoundSpec::new(ATTACK, "audio/sfx/attack.wav").with_volume(0.7),
                SoundSpec::new(DASH, "audio/sfx/dash.wav"),
            ],
            scene_music: vec![
                SceneMusicBinding {
                    scene: "MainMenu".into(),
                    music: "Menu Background Music".into(),
                },
                SceneMusicBinding {
                    scene: "Level1".into(),
                    music: "Level Music".into(),
                },
            ],
            default_music: Some("Menu Background Music".into()),
        }
    }
}

#[derive(Default)]
pub struct AudioManagerPlugin;

impl Plugin for AudioManagerPlugin {
    fn build(&self, app: &mut App) {
        if app.world().contains_resource::<AudioManager>() {
            warn!("AudioManager already exists; ignoring duplicate registration");
            return;
        }

        app.insert_resource(AudioManager::default())
            .init_resource::<SoundBank>()
            .add_systems(Startup, (register_sound_bank, init_volumes))
            .add_systems(
                Update,
                (
                    forget_finished_music,
                    music_on_scene_loaded.after(SceneAnnounce),
                    sync_music_volume.run_if(resource_changed::<AudioManager>),
                )
                    .chain(),
            );
    }

    fn is_unique(&self) -> bool {
        false
    }
}

/// Load every clip in the bank. Without an asset server (or audio support) the entries
/// still get registered with placeholder handles, so name lookups keep working.
fn register_sound_bank(
    bank: Res<SoundBank>,
    assets: Option<Res<AssetServer>>,
    clips: Option<Res<Assets<AudioSource>>>,
    mut audio: ResMut<AudioManager>,
) {
    let loader = assets.filter(|_| clips.is_some());
    let load = |spec: &SoundSpec| -> Handle<AudioSource> {
        loader
            .as_ref()
            .map_or_else(Handle::default, |server| server.load(spec.path.clone()))
    };

    for spec in &bank.music {
        audio.register_music(spec.entry(load(spec)));
    }
    for spec in &bank.sfx {
        audio.register_sfx(spec.entry(load(spec)));
    }
    for binding in &bank.scene_music {
        audio.bind_scene_music(binding.scene.clone(), binding.music.clone());
    }
    audio.default_music = bank.default_music.clone();

    debug!(
        "Registered {} music tracks and {} sound effects",
        bank.music.len(),
        bank.sfx.len()
    );
}

/// Start from the saved volumes, or full volume without a game manager.
pub fn init_volumes(mut audio: ResMut<AudioManager>, mut game: Option<ResMut<GameManager>>) {
    let (music, sfx) = game
        .as_ref()
        .map_or((1.0, 1.0), |g| (g.data.music_volume, g.data.sfx_volume));
    audio.set_music_volume(music, game.as_deref_mut());
    audio.set_sfx_volume(sfx, game.as_deref_mut());
}

pub fn music_on_scene_loaded(
    mut loaded: MessageReader<SceneLoaded>,
    mut audio: ResMut<AudioManager>,
    mut commands: Commands,
) {
    for SceneLoaded(scene) in loaded.read() {
        let Some(track) = audio.music_for_scene(scene).map(str::to_owned) else {
            continue;
        };
        if audio.current_music() == Some(track.as_str()) {
            continue;
        }
        audio.play_music(&mut commands, &track);
    }
}

/// Non-looping music despawns itself when it ends; after that nothing is playing.
pub fn forget_finished_music(mut removed: RemovedComponents<MusicTrack>, mut audio: ResMut<AudioManager>) {
    for e in removed.read() {
        if audio.music_entity == Some(e) {
            audio.music_entity = None;
            audio.current_music = None;
        }
    }
}

/// Push the current music volume into the playing sink.
fn sync_music_volume(audio: Res<AudioManager>, mut q_sinks: Query<&mut AudioSink, With<MusicTrack>>) {
    let volume = Volume::Linear(audio.current_track_volume());
    for mut sink in &mut q_sinks {
        sink.set_volume(volume);
    }
}
