//! Sound identities and their asset table.

/// Number of click instances kept for overlapping playback.
pub const CLICK_POOL_SIZE: u8 = 3;

/// Looping layers managed by the director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Ambient,
    Movement,
    Battle,
    Typewriter,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Ambient, Layer::Movement, Layer::Battle, Layer::Typewriter];

    pub fn sound(self) -> Sound {
        match self {
            Layer::Ambient => Sound::Ambient,
            Layer::Movement => Sound::Movement,
            Layer::Battle => Sound::Battle,
            Layer::Typewriter => Sound::Typewriter,
        }
    }
}

/// One-shot cues. Each play restarts from the beginning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Click,
    QuestCompleted,
    Victory,
    Warning,
    Laser,
}

/// Every distinct sound resource the backend holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Ambient,
    Movement,
    Battle,
    Typewriter,
    /// Click pool slot, `0..CLICK_POOL_SIZE`.
    Click(u8),
    QuestCompleted,
    Victory,
    Warning,
    Laser,
}

/// Static description of a sound asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundAsset {
    /// Path relative to the asset directory.
    pub path: &'static str,
    /// Nominal playback volume (amplitude, 0..1).
    pub volume: f64,
    pub looping: bool,
}

impl Sound {
    /// Every sound, click pool included.
    pub fn all() -> Vec<Sound> {
        let mut sounds = vec![
            Sound::Ambient,
            Sound::Movement,
            Sound::Battle,
            Sound::Typewriter,
            Sound::QuestCompleted,
            Sound::Victory,
            Sound::Warning,
            Sound::Laser,
        ];
        sounds.extend((0..CLICK_POOL_SIZE).map(Sound::Click));
        sounds
    }

    pub fn asset(self) -> SoundAsset {
        let (path, volume, looping) = match self {
            Sound::Ambient => ("sounds/ambient/ambient.mp3", 0.25, true),
            Sound::Movement => ("sounds/ambient/movement.mp3", 0.6, true),
            Sound::Battle => ("sounds/ambient/battle.mp3", 0.35, true),
            Sound::Typewriter => ("sounds/ui/typewriter.wav", 0.2, true),
            Sound::Click(_) => ("sounds/ui/click.mp3", 0.3, false),
            Sound::QuestCompleted => ("sounds/ui/quest-completed.mp3", 0.4, false),
            Sound::Victory => ("sounds/ui/success.mp3", 0.4, false),
            Sound::Warning => ("sounds/ui/warning.mp3", 0.6, false),
            Sound::Laser => ("sounds/weapons/laser.mp3", 0.6, false),
        };
        SoundAsset { path, volume, looping }
    }
}
