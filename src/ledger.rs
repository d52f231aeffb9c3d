//! Unlock ledger: secret codes, modifiers and achievements
//!
//! Persisted to storage and kept across games. Flags only ever go from locked
//! to unlocked and achievements are append-only, so every unlock call is
//! idempotent.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::SECRET_INPUT_TIMEOUT_MS;

/// Typed secret codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretCode {
    Bubble,
    Pop,
    Combo,
    GodMode,
    Money,
    Speed,
    Life,
    Master,
    Immortal,
    Points,
}

impl SecretCode {
    /// Match order for buffer suffixes. First match wins.
    pub const PRIORITY: [SecretCode; 10] = [
        SecretCode::Bubble,
        SecretCode::Pop,
        SecretCode::Combo,
        SecretCode::GodMode,
        SecretCode::Money,
        SecretCode::Speed,
        SecretCode::Life,
        SecretCode::Master,
        SecretCode::Immortal,
        SecretCode::Points,
    ];

    /// The word typed to activate the code
    pub fn word(self) -> &'static str {
        match self {
            SecretCode::Bubble => "bubble",
            SecretCode::Pop => "pop",
            SecretCode::Combo => "combo",
            SecretCode::GodMode => "godmode",
            SecretCode::Money => "money",
            SecretCode::Speed => "speed",
            SecretCode::Life => "life",
            SecretCode::Master => "master",
            SecretCode::Immortal => "immortal",
            SecretCode::Points => "points",
        }
    }

    /// Code flags recorded on activation (always includes the code itself)
    pub fn granted_codes(self) -> &'static [SecretCode] {
        use SecretCode::*;
        match self {
            GodMode => &[Bubble, Pop, Combo, GodMode, Money, Speed, Life],
            Master => &[Bubble, Pop, Combo, GodMode, Money, Speed, Life, Master],
            Bubble => &[Bubble],
            Pop => &[Pop],
            Combo => &[Combo],
            Money => &[Money],
            Speed => &[Speed],
            Life => &[Life],
            Immortal => &[Immortal],
            Points => &[Points],
        }
    }

    /// Modifier flags recorded on activation
    pub fn granted_modifiers(self) -> &'static [Modifier] {
        use Modifier::*;
        match self {
            SecretCode::GodMode => &[
                RainbowMode,
                GiantBubbles,
                SuperCombo,
                GodMode,
                InfiniteScore,
                TimeWarp,
                Immortal,
            ],
            SecretCode::Master => &[
                RainbowMode,
                GiantBubbles,
                SuperCombo,
                GodMode,
                InfiniteScore,
                TimeWarp,
                Immortal,
                AllCheats,
            ],
            SecretCode::Money => &[InfiniteScore],
            SecretCode::Speed => &[TimeWarp],
            SecretCode::Life => &[Immortal],
            _ => &[],
        }
    }

    fn longest_word() -> usize {
        Self::PRIORITY.iter().map(|c| c.word().len()).max().unwrap_or(0)
    }
}

/// Permanent gameplay/cosmetic modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    RainbowMode,
    GiantBubbles,
    AntiGravity,
    SuperCombo,
    GodMode,
    InfiniteScore,
    TimeWarp,
    Immortal,
    AllCheats,
}

/// Static description of an achievement
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const SCORE_1000: AchievementDef = AchievementDef {
    id: "score1000",
    title: "Score 1000",
    description: "You scored 1000 points!",
};
pub const SCORE_5000: AchievementDef = AchievementDef {
    id: "score5000",
    title: "Score 5000",
    description: "You scored 5000 points!",
};
pub const COMBO_5: AchievementDef = AchievementDef {
    id: "combo5",
    title: "Combo x5",
    description: "You chained 5 bubbles!",
};
pub const COMBO_10: AchievementDef = AchievementDef {
    id: "combo10",
    title: "Combo x10",
    description: "You chained 10 bubbles!",
};
pub const LEVEL_5: AchievementDef = AchievementDef {
    id: "level5",
    title: "Level 5",
    description: "You reached level 5!",
};
pub const LEVEL_10: AchievementDef = AchievementDef {
    id: "level10",
    title: "Level 10",
    description: "You reached level 10!",
};
pub const GOD_MODE: AchievementDef = AchievementDef {
    id: "godmode",
    title: "God Mode",
    description: "You activated god mode!",
};
pub const IMMORTAL: AchievementDef = AchievementDef {
    id: "immortal",
    title: "Immortality",
    description: "You activated immortality!",
};

/// Everything the `master` code unlocks
pub const MASTER_CATALOG: [AchievementDef; 7] = [
    SCORE_1000, SCORE_5000, COMBO_5, COMBO_10, LEVEL_5, LEVEL_10, GOD_MODE,
];

/// An unlocked achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Unix timestamp (ms) when unlocked
    pub unlocked: f64,
}

/// Recent keystrokes, matched against code words by suffix
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretBuffer {
    text: String,
    /// Time since the last keystroke (ms)
    idle_ms: f32,
}

impl SecretBuffer {
    /// Append a typed character (lowercased)
    pub fn push(&mut self, ch: char) {
        self.text.extend(ch.to_lowercase());
        self.idle_ms = 0.0;

        // Only the tail can ever complete a code
        let keep = SecretCode::longest_word();
        let count = self.text.chars().count();
        if count > keep {
            self.text = self.text.chars().skip(count - keep).collect();
        }
    }

    /// Forget the buffer after a quiet period
    pub fn advance(&mut self, dt_ms: f32) {
        if self.text.is_empty() {
            return;
        }
        self.idle_ms += dt_ms;
        if self.idle_ms >= SECRET_INPUT_TIMEOUT_MS {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.idle_ms = 0.0;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Persistent unlock state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    codes: BTreeSet<SecretCode>,
    #[serde(default)]
    modifiers: BTreeSet<Modifier>,
    #[serde(default)]
    achievements: Vec<Achievement>,
    /// Set on every mutation, cleared when flushed to storage
    #[serde(skip)]
    dirty: bool,
}

impl Ledger {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "bubble_pop_secrets";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_code(&self, code: SecretCode) -> bool {
        self.codes.contains(&code)
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn codes(&self) -> impl Iterator<Item = SecretCode> + '_ {
        self.codes.iter().copied()
    }

    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.modifiers.iter().copied()
    }

    /// Record a code flag. Returns true if it was newly unlocked.
    pub fn unlock_code(&mut self, code: SecretCode) -> bool {
        let added = self.codes.insert(code);
        self.dirty |= added;
        added
    }

    /// Record a modifier flag. Returns true if it was newly activated.
    pub fn activate_modifier(&mut self, modifier: Modifier) -> bool {
        let added = self.modifiers.insert(modifier);
        self.dirty |= added;
        added
    }

    /// Append an achievement unless its id is already present.
    ///
    /// Returns true if it was newly unlocked.
    pub fn unlock_achievement(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
        timestamp: f64,
    ) -> bool {
        if self.has_achievement(id) {
            return false;
        }
        self.achievements.push(Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            unlocked: timestamp,
        });
        self.dirty = true;
        log::info!("Achievement unlocked: {}", title);
        true
    }

    /// Match the buffer against the code table.
    ///
    /// On a match the code's flags are recorded, the buffer is cleared and the
    /// code is returned so the caller can apply its immediate bonuses.
    pub fn check_secret_input(&mut self, buffer: &mut SecretBuffer) -> Option<SecretCode> {
        let code = SecretCode::PRIORITY
            .into_iter()
            .find(|code| buffer.as_str().ends_with(code.word()))?;

        for &granted in code.granted_codes() {
            self.unlock_code(granted);
        }
        for &modifier in code.granted_modifiers() {
            self.activate_modifier(modifier);
        }
        // Activation counts as a mutation even when every flag was already set
        self.dirty = true;
        buffer.clear();

        log::info!("Secret code \"{}\" activated", code.word());
        Some(code)
    }

    /// Whether losing a bubble is free
    pub fn blocks_life_loss(&self) -> bool {
        self.has_modifier(Modifier::Immortal)
            || self.has_modifier(Modifier::GodMode)
            || self.has_code(SecretCode::Life)
    }

    /// Take and reset the unsaved-changes flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
