//! Render context construction for template substitution.
//!
//! The context is the flat key-to-scalar mapping handed to the substitution
//! engine for one render: scheme metadata plus, per palette slot, every
//! representation a template may reference (hex split, integer RGB,
//! normalized RGB, and HSV in byte and unit-interval scales).

// Allow intentional type casts for byte-scaled HSV encoding
#![allow(clippy::cast_possible_truncation)]

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Colorscheme, RgbColor};

/// A scalar value in the render context.
///
/// Kept as an explicit sum type rather than a dynamic value so the
/// converter's output stays statically checkable. Serializes untagged,
/// which is what the substitution engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// A string value (hex digits, scheme metadata)
    Str(String),
    /// An integer value (byte-scaled channels)
    Int(i64),
    /// A floating-point value (unit-interval channels)
    Float(f64),
}

/// The flat key-to-value mapping fed to the substitution engine.
pub type RenderContext = BTreeMap<String, ContextValue>;

/// Builds the render context for one colorscheme.
///
/// Produces `scheme-name`, `scheme-author`, `scheme-slug`,
/// `scheme-slug-underscored`, and nine representations per slot `NN`:
///
/// - `baseNN-hex` and `baseNN-hex-r/g/b`: the original hex digits, split
///   per channel (casing preserved, so concatenating the channels
///   reproduces the slot value exactly)
/// - `baseNN-rgb-r/g/b`: integer channels 0-255
/// - `baseNN-dec-r/g/b`: normalized channels 0-1
/// - `baseNN-rgb-h/s/v`: HSV re-encoded as bytes (hue scaled by 255/360)
/// - `baseNN-dec-h/s/v`: HSV on the unit interval (hue divided by 360)
///
/// # Errors
///
/// Returns an error if a slot value is not parseable hex. Slot values are
/// validated at scheme construction, so this only fires for schemes built
/// outside [`Colorscheme::parse`].
pub fn build_context(scheme: &Colorscheme) -> Result<RenderContext> {
    let slug = scheme.slug();

    let mut ctx = RenderContext::new();
    ctx.insert(
        "scheme-name".to_string(),
        ContextValue::Str(scheme.name.clone()),
    );
    ctx.insert(
        "scheme-author".to_string(),
        ContextValue::Str(scheme.author.clone()),
    );
    ctx.insert("scheme-slug".to_string(), ContextValue::Str(slug.clone()));
    ctx.insert(
        "scheme-slug-underscored".to_string(),
        ContextValue::Str(slug.replace('-', "_")),
    );

    for (slot, hex) in scheme.slots() {
        insert_color(&mut ctx, slot, hex)
            .context(format!("Invalid slot base{slot} in scheme '{}'", scheme.name))?;
    }

    Ok(ctx)
}

/// Inserts the nine representations of one slot into the context.
fn insert_color(ctx: &mut RenderContext, slot: &str, hex: &str) -> Result<()> {
    let key = |suffix: &str| format!("base{slot}-{suffix}");

    // The per-channel split below indexes raw bytes, so the value must be
    // exactly six ASCII characters before anything is sliced.
    if hex.len() != 6 || !hex.is_ascii() {
        anyhow::bail!("Hex color value must be exactly 6 hex digits, got '{hex}'");
    }

    // Hex split straight from the source string so casing round-trips.
    let (hex_r, hex_g, hex_b) = (&hex[0..2], &hex[2..4], &hex[4..6]);
    ctx.insert(key("hex"), ContextValue::Str(hex.to_string()));
    ctx.insert(key("hex-r"), ContextValue::Str(hex_r.to_string()));
    ctx.insert(key("hex-g"), ContextValue::Str(hex_g.to_string()));
    ctx.insert(key("hex-b"), ContextValue::Str(hex_b.to_string()));

    let color = RgbColor::from_hex(hex)?;

    ctx.insert(key("rgb-r"), ContextValue::Int(i64::from(color.r)));
    ctx.insert(key("rgb-g"), ContextValue::Int(i64::from(color.g)));
    ctx.insert(key("rgb-b"), ContextValue::Int(i64::from(color.b)));

    ctx.insert(
        key("dec-r"),
        ContextValue::Float(f64::from(color.r) / 255.0),
    );
    ctx.insert(
        key("dec-g"),
        ContextValue::Float(f64::from(color.g) / 255.0),
    );
    ctx.insert(
        key("dec-b"),
        ContextValue::Float(f64::from(color.b) / 255.0),
    );

    let (h, s, v) = color.to_hsv();

    ctx.insert(
        key("rgb-h"),
        ContextValue::Int((h * 255.0 / 360.0).round() as i64),
    );
    ctx.insert(key("rgb-s"), ContextValue::Int((s * 255.0).round() as i64));
    ctx.insert(key("rgb-v"), ContextValue::Int((v * 255.0).round() as i64));

    ctx.insert(key("dec-h"), ContextValue::Float(h / 360.0));
    ctx.insert(key("dec-s"), ContextValue::Float(s));
    ctx.insert(key("dec-v"), ContextValue::Float(v));

    Ok(())
}
