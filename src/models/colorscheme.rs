//! Base16 colorscheme entity and YAML parsing.
//!
//! A colorscheme is a named palette of exactly 16 colors plus author
//! metadata, parsed from the upstream YAML scheme-definition format
//! (`scheme`, `author`, `base00`..`base0F`).

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The 16 slot keys of a base16 palette, in palette order.
pub const SLOT_KEYS: [&str; 16] = [
    "00", "01", "02", "03", "04", "05", "06", "07", "08", "09", "0A", "0B", "0C", "0D", "0E", "0F",
];

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{6}$").expect("hex color regex is valid"));

/// A named base16 palette of 16 colors.
///
/// Immutable after construction; held only for the duration of one
/// rendering run. Each slot value is a validated 6-hex-digit string
/// in the casing the scheme author wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colorscheme {
    /// Scheme display name (e.g., "Default Dark")
    #[serde(rename = "scheme")]
    pub name: String,
    /// Scheme author, may be empty
    #[serde(default)]
    pub author: String,
    /// Slot 00 (typically the default background)
    pub base00: String,
    /// Slot 01
    pub base01: String,
    /// Slot 02
    pub base02: String,
    /// Slot 03
    pub base03: String,
    /// Slot 04
    pub base04: String,
    /// Slot 05 (typically the default foreground)
    pub base05: String,
    /// Slot 06
    pub base06: String,
    /// Slot 07
    pub base07: String,
    /// Slot 08
    pub base08: String,
    /// Slot 09
    pub base09: String,
    /// Slot 0A
    #[serde(rename = "base0A")]
    pub base0a: String,
    /// Slot 0B
    #[serde(rename = "base0B")]
    pub base0b: String,
    /// Slot 0C
    #[serde(rename = "base0C")]
    pub base0c: String,
    /// Slot 0D
    #[serde(rename = "base0D")]
    pub base0d: String,
    /// Slot 0E
    #[serde(rename = "base0E")]
    pub base0e: String,
    /// Slot 0F
    #[serde(rename = "base0F")]
    pub base0f: String,
}

impl Colorscheme {
    /// Parses and validates a colorscheme from a YAML scheme-definition document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML, is missing a
    /// required field, has an empty scheme name, or has a slot value that
    /// is not exactly 6 hex digits.
    pub fn parse(yaml: &str) -> Result<Self> {
        let scheme: Self =
            serde_yml::from_str(yaml).context("Failed to parse colorscheme document")?;
        scheme.validate()?;
        Ok(scheme)
    }

    /// Validates the scheme invariants: non-empty name, 16 well-formed slots.
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Colorscheme has an empty scheme name");
        }

        for (key, value) in self.slots() {
            if !HEX_COLOR_RE.is_match(value) {
                anyhow::bail!(
                    "Colorscheme '{}' slot base{key} has invalid color '{value}'. \
                     Expected 6 hex digits (RRGGBB)",
                    self.name
                );
            }
        }

        Ok(())
    }

    /// Returns the 16 slots as `(slot key, hex value)` pairs in palette order.
    #[must_use]
    pub fn slots(&self) -> [(&'static str, &str); 16] {
        [
            ("00", self.base00.as_str()),
            ("01", self.base01.as_str()),
            ("02", self.base02.as_str()),
            ("03", self.base03.as_str()),
            ("04", self.base04.as_str()),
            ("05", self.base05.as_str()),
            ("06", self.base06.as_str()),
            ("07", self.base07.as_str()),
            ("08", self.base08.as_str()),
            ("09", self.base09.as_str()),
            ("0A", self.base0a.as_str()),
            ("0B", self.base0b.as_str()),
            ("0C", self.base0c.as_str()),
            ("0D", self.base0d.as_str()),
            ("0E", self.base0e.as_str()),
            ("0F", self.base0f.as_str()),
        ]
    }

    /// Returns the scheme slug: the name lowercased with spaces replaced by hyphens.
    ///
    /// # Examples
    ///
    /// ```
    /// # use basetint::models::Colorscheme;
    /// # let yaml = "scheme: Default Dark\nauthor: someone\n".to_string()
    /// #     + &(0..16).map(|i| format!("base{:02X}: \"181818\"\n", i)).collect::<String>();
    /// let scheme = Colorscheme::parse(&yaml).unwrap();
    /// assert_eq!(scheme.slug(), "default-dark");
    /// ```
    #[must_use]
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }
}
