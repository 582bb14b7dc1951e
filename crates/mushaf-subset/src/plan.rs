//! Subset planning and the round-trip check

use std::collections::{BTreeMap, BTreeSet};

use mushaf_core::error::SubsetError;
use mushaf_core::glyph::{FontResource, GlyphClosure, MinimizedFont};
use mushaf_core::script::{FontDescriptor, FontId};
use mushaf_core::traits::FontProgram;

use crate::binary;

/// Glyph 0, kept in every subset
pub const NOTDEF: u32 = 0;

/// Cut `program` down to `closure`, or pass it through when the license
/// forbids modification
///
/// Either way the result is verified: every closure codepoint must resolve
/// to a real glyph, otherwise the font is refused.
pub fn plan(
    descriptor: &FontDescriptor,
    program: &dyn FontProgram,
    closure: &GlyphClosure,
) -> Result<FontResource, SubsetError> {
    if !descriptor.can_subset {
        log::info!(
            "{}: license ({}) forbids modification, embedding the full font",
            descriptor.id,
            descriptor.license
        );
        let resource = FontResource::Full {
            font: descriptor.id,
            glyph_count: program.glyph_count(),
        };
        verify(&resource, program, closure)?;
        return Ok(resource);
    }

    let mut cmap = BTreeMap::new();
    let mut glyphs = BTreeSet::from([NOTDEF]);
    for &ch in &closure.codepoints {
        if let Some(gid) = program.glyph_id(ch).filter(|gid| *gid != NOTDEF) {
            cmap.insert(ch, gid);
            glyphs.insert(gid);
        }
    }

    let data = if program.data().is_empty() {
        log::debug!("{}: no font bytes, planning the character map only", descriptor.id);
        Vec::new()
    } else {
        let source = binary::open(program, descriptor.id)?;
        glyphs = binary::reachable_glyphs(&source, descriptor.id, &glyphs)?;
        binary::write_subset(&source, descriptor.id, &cmap, &glyphs)?
    };

    let resource = FontResource::Subset(MinimizedFont {
        font: descriptor.id,
        cmap,
        glyphs,
        source_glyph_count: program.glyph_count(),
        closure_hash: closure.hash_key(),
        data,
    });
    verify(&resource, program, closure)?;

    if let FontResource::Subset(min) = &resource {
        log::debug!(
            "{}: kept {} glyphs of {} for {} codepoints ({} bytes)",
            descriptor.id,
            min.glyphs.len(),
            min.source_glyph_count
                .map_or_else(|| "?".to_string(), |n| n.to_string()),
            closure.len(),
            min.data.len()
        );
    }
    Ok(resource)
}

/// Round-trip check: every closure codepoint resolves in `resource`
///
/// A subset with bytes is parsed back and checked against the source
/// font; a map-only plan is checked against its own character map.
pub fn verify(
    resource: &FontResource,
    program: &dyn FontProgram,
    closure: &GlyphClosure,
) -> Result<(), SubsetError> {
    let missing: Vec<char> = match resource {
        FontResource::Subset(min) if min.has_data() => binary::verify(program, min, closure)?,
        FontResource::Subset(min) => closure
            .codepoints
            .iter()
            .copied()
            .filter(|ch| !min.resolves(*ch))
            .collect(),
        FontResource::Full { .. } => closure
            .codepoints
            .iter()
            .copied()
            .filter(|ch| program.glyph_id(*ch).map_or(true, |gid| gid == NOTDEF))
            .collect(),
    };

    if missing.is_empty() {
        return Ok(());
    }
    Err(violation(resource.font(), &missing))
}

fn violation(font: FontId, missing: &[char]) -> SubsetError {
    let missing = missing
        .iter()
        .map(|ch| format!("U+{:04X}", u32::from(*ch)))
        .collect::<Vec<_>>()
        .join(", ");
    log::error!("{}: closure violation, no glyph for {}", font, missing);
    SubsetError::LigatureClosureViolation { font, missing }
}
