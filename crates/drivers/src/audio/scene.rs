//! Amplifier scenes and their register tables
//!
//! A smart amplifier is tuned per use case ("scene"): music playback, voice
//! call, ringtone and so on. Each scene owns an ordered list of
//! (register, value) pairs that is written after the common table whenever
//! the scene is selected. Tables come from the tuning firmware file and are
//! handed to the driver already decoded.

use heapless::Vec;
use platform::DriverError;

/// Maximum number of tables in a [`SceneTables`] set.
pub const MAX_TABLES: usize = 8;
/// Maximum number of entries in one [`RegTable`].
pub const MAX_TABLE_ENTRIES: usize = 32;

/// Amplifier use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scene {
    /// Settings shared by every scene, written first.
    Common,
    /// Music playback.
    Music,
    /// Voice call through the speaker.
    Voice,
    /// VoIP call.
    Voip,
    /// Ringtone.
    Ring,
    /// Low-power playback.
    LowPower,
    /// Receiver (earpiece) mode.
    Receiver,
    /// Factory calibration.
    Factory,
}

impl Scene {
    /// Bit of this scene in a [`SceneMask`].
    #[must_use]
    pub const fn bit(self) -> u16 {
        match self {
            Self::Common => 1 << 0,
            Self::Music => 1 << 1,
            Self::Voice => 1 << 2,
            Self::Voip => 1 << 3,
            Self::Ring => 1 << 4,
            Self::LowPower => 1 << 5,
            Self::Receiver => 1 << 6,
            Self::Factory => 1 << 7,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Music => "music",
            Self::Voice => "voice",
            Self::Voip => "voip",
            Self::Ring => "ring",
            Self::LowPower => "low-power",
            Self::Receiver => "receiver",
            Self::Factory => "factory",
        }
    }
}

/// Set of scenes a table applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SceneMask(pub u16);

impl SceneMask {
    /// Mask containing only `scene`.
    #[must_use]
    pub const fn only(scene: Scene) -> Self {
        Self(scene.bit())
    }

    /// Add `scene` to the mask.
    #[must_use]
    pub const fn with(self, scene: Scene) -> Self {
        Self(self.0 | scene.bit())
    }

    /// Whether `scene` is in the mask.
    #[must_use]
    pub const fn contains(self, scene: Scene) -> bool {
        self.0 & scene.bit() != 0
    }
}

impl From<Scene> for SceneMask {
    fn from(scene: Scene) -> Self {
        Self::only(scene)
    }
}

/// One (register, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegEntry {
    /// Register address.
    pub reg: u8,
    /// Value to write.
    pub value: u16,
}

impl RegEntry {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(reg: u8, value: u16) -> Self {
        Self { reg, value }
    }
}

/// Ordered register table bound to a set of scenes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegTable {
    scenes: SceneMask,
    entries: Vec<RegEntry, MAX_TABLE_ENTRIES>,
}

impl RegTable {
    /// Build a table.
    ///
    /// # Errors
    /// [`DriverError::OutOfRange`] if `entries` exceeds [`MAX_TABLE_ENTRIES`].
    pub fn new(scenes: impl Into<SceneMask>, entries: &[RegEntry]) -> Result<Self, DriverError> {
        let entries = Vec::from_slice(entries).map_err(|_| DriverError::OutOfRange)?;
        Ok(Self {
            scenes: scenes.into(),
            entries,
        })
    }

    /// Scenes this table is written for.
    pub fn scenes(&self) -> SceneMask {
        self.scenes
    }

    /// Entries in write order.
    pub fn entries(&self) -> &[RegEntry] {
        &self.entries
    }
}

/// All register tables known to one amplifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneTables {
    tables: Vec<RegTable, MAX_TABLES>,
}

impl SceneTables {
    /// Empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Append a table.
    ///
    /// # Errors
    /// [`DriverError::OutOfRange`] if the set is full or the table too long.
    pub fn add(&mut self, scenes: impl Into<SceneMask>, entries: &[RegEntry]) -> Result<(), DriverError> {
        let table = RegTable::new(scenes, entries)?;
        self.tables
            .push(table)
            .map_err(|_| DriverError::OutOfRange)
    }

    /// Tables that apply to `scene`, in insertion order.
    pub fn tables_for(&self, scene: Scene) -> impl Iterator<Item = &RegTable> {
        self.tables.iter().filter(move |t| t.scenes().contains(scene))
    }

    /// Entries written when `scene` is selected, across all its tables.
    pub fn entries_for(&self, scene: Scene) -> impl Iterator<Item = &RegEntry> {
        self.tables_for(scene).flat_map(RegTable::entries)
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table is loaded.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
