//! Puzzle catalog: which images exist for each difficulty.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tileslide_core::Difficulty;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

const BUILTIN: [(Difficulty, &str, &str); 15] = [
    (Difficulty::Easy, "puzzles/easy/castle.rgb565", "Castle Sunset"),
    (Difficulty::Easy, "puzzles/easy/icecream.rgb565", "Ice Cream Park"),
    (Difficulty::Easy, "puzzles/easy/puppy.rgb565", "Puppy Car"),
    (Difficulty::Easy, "puzzles/easy/planet.rgb565", "Space Planet"),
    (Difficulty::Easy, "puzzles/easy/turtle_reef.rgb565", "Turtle Reef"),
    (Difficulty::Medium, "puzzles/medium/forest.rgb565", "Autumn Path"),
    (Difficulty::Medium, "puzzles/medium/market.rgb565", "Fantasy Market"),
    (Difficulty::Medium, "puzzles/medium/robot.rgb565", "Robot Workshop"),
    (Difficulty::Medium, "puzzles/medium/hangar.rgb565", "Sci-Fi Hangar"),
    (Difficulty::Medium, "puzzles/medium/beach.rgb565", "Beach Paradise"),
    (Difficulty::Hard, "puzzles/hard/nebula.rgb565", "Cosmic Nebula"),
    (Difficulty::Hard, "puzzles/hard/cyberpunk.rgb565", "Cyberpunk City"),
    (Difficulty::Hard, "puzzles/hard/gears.rgb565", "Mechanical Gears"),
    (Difficulty::Hard, "puzzles/hard/androids.rgb565", "Android Pile"),
    (Difficulty::Hard, "puzzles/hard/library.rgb565", "Wizard Library"),
];

/// Single selectable puzzle image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Path of the image relative to the asset root.
    pub path: String,
    /// Name shown on the puzzle select screen.
    pub title: String,
    /// Difficulty tier the entry is listed under.
    pub difficulty: Difficulty,
}

impl CatalogEntry {
    /// Creates a new catalog entry.
    #[must_use]
    pub fn new(difficulty: Difficulty, path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            difficulty,
        }
    }
}

/// Puzzle images grouped by difficulty, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    tiers: [Vec<CatalogEntry>; 3],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The fifteen images shipped with the game, five per difficulty.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for (difficulty, path, title) in BUILTIN {
            catalog.tiers[difficulty.index()].push(CatalogEntry::new(difficulty, path, title));
        }
        catalog
    }

    fn empty() -> Self {
        Self {
            tiers: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Parses a catalog manifest from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let manifest: CatalogManifest =
            toml::from_str(contents).context("failed to parse catalog manifest toml contents")?;
        Self::from_manifest(manifest)
    }

    /// Validates a deserialised manifest.
    pub fn from_manifest(manifest: CatalogManifest) -> Result<Self> {
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported catalog manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut catalog = Self::empty();
        let tiers = [
            (Difficulty::Easy, manifest.easy),
            (Difficulty::Medium, manifest.medium),
            (Difficulty::Hard, manifest.hard),
        ];
        for (difficulty, specs) in tiers {
            for spec in specs {
                if spec.title.trim().is_empty() {
                    bail!("catalog entry `{}` has an empty title", spec.path);
                }
                if catalog.find(&spec.path).is_some() {
                    bail!("catalog lists `{}` more than once", spec.path);
                }
                catalog.tiers[difficulty.index()].push(CatalogEntry::new(
                    difficulty,
                    spec.path,
                    spec.title,
                ));
            }
        }

        if catalog.is_empty() {
            bail!("catalog manifest lists no puzzles");
        }
        Ok(catalog)
    }

    /// Entries listed under the difficulty, in display order.
    #[must_use]
    pub fn entries(&self, difficulty: Difficulty) -> &[CatalogEntry] {
        &self.tiers[difficulty.index()]
    }

    /// Entry at `index` within the difficulty.
    #[must_use]
    pub fn entry(&self, difficulty: Difficulty, index: usize) -> Option<&CatalogEntry> {
        self.entries(difficulty).get(index)
    }

    /// Iterates every entry across all difficulties.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.tiers.iter().flatten()
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    /// Reports whether the catalog lists nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, path: &str) -> Option<&CatalogEntry> {
        self.iter().find(|entry| entry.path == path)
    }
}

/// On-disk catalog description.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogManifest {
    /// Manifest format version.
    pub version: u32,
    /// 3x3 puzzles.
    #[serde(default)]
    pub easy: Vec<EntrySpec>,
    /// 4x4 puzzles.
    #[serde(default)]
    pub medium: Vec<EntrySpec>,
    /// 5x5 puzzles.
    #[serde(default)]
    pub hard: Vec<EntrySpec>,
}

/// Manifest row describing one image.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntrySpec {
    /// Path relative to the asset root.
    pub path: String,
    /// Display title.
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_lists_five_per_tier() {
        let catalog = Catalog::builtin();

        for difficulty in Difficulty::ALL {
            assert_eq!(catalog.entries(difficulty).len(), 5);
            assert!(catalog
                .entries(difficulty)
                .iter()
                .all(|entry| entry.difficulty == difficulty));
        }
        assert_eq!(
            catalog.entry(Difficulty::Medium, 2).map(|entry| entry.title.as_str()),
            Some("Robot Workshop")
        );
        assert_eq!(
            catalog.entry(Difficulty::Hard, 0).map(|entry| entry.path.as_str()),
            Some("puzzles/hard/nebula.rgb565")
        );
        assert!(catalog.entry(Difficulty::Easy, 5).is_none());
    }

    #[test]
    fn manifest_replaces_builtin_entries() {
        let manifest = r#"
            version = 1

            [[easy]]
            path = "mine/cat.rgb565"
            title = "Cat"

            [[hard]]
            path = "mine/dog.rgb565"
            title = "Dog"
        "#;

        let catalog = Catalog::from_toml_str(manifest).expect("manifest should parse");

        assert_eq!(catalog.len(), 2);
        assert!(catalog.entries(Difficulty::Medium).is_empty());
        assert_eq!(
            catalog.entry(Difficulty::Hard, 0),
            Some(&CatalogEntry::new(Difficulty::Hard, "mine/dog.rgb565", "Dog"))
        );
    }

    #[test]
    fn manifest_rejects_wrong_version() {
        let result = Catalog::from_toml_str("version = 2\n[[easy]]\npath = \"a\"\ntitle = \"A\"\n");
        assert!(result.is_err(), "unsupported version must be rejected");
    }

    #[test]
    fn manifest_rejects_duplicate_paths() {
        let manifest = r#"
            version = 1

            [[easy]]
            path = "same.rgb565"
            title = "One"

            [[medium]]
            path = "same.rgb565"
            title = "Two"
        "#;

        assert!(Catalog::from_toml_str(manifest).is_err());
    }

    #[test]
    fn manifest_rejects_empty_catalog() {
        assert!(Catalog::from_toml_str("version = 1").is_err());
    }
}
