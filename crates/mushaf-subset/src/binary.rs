// this_file: crates/mushaf-subset/src/binary.rs

//! Cutting font files: read-fonts in, write-fonts out
//!
//! Glyph ids are retained. Every glyph keeps its number and a dropped
//! glyph becomes an empty `glyf` entry, so `hmtx`, `GSUB`, `GPOS` and
//! `GDEF` stay valid and are copied as they are. `loca` is rewritten in
//! the long format. CFF outlines are kept whole; only the `cmap` is cut.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use read_fonts::collections::IntSet;
use read_fonts::tables::glyf::Glyph;
use read_fonts::types::{GlyphId as ReadGlyphId, Tag};
use read_fonts::{FontRef, TableProvider};
use write_fonts::tables::cmap::Cmap;
use write_fonts::types::{GlyphId as WriteGlyphId, Tag as WriteTag};
use write_fonts::FontBuilder;

use mushaf_core::error::SubsetError;
use mushaf_core::glyph::{GlyphClosure, MinimizedFont};
use mushaf_core::script::FontId;
use mushaf_core::traits::FontProgram;
use mushaf_core::types::GlyphId;

const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");
const HEAD: Tag = Tag::new(b"head");
const CMAP: Tag = Tag::new(b"cmap");
const GSUB: Tag = Tag::new(b"GSUB");
/// A signature over the source bytes no longer holds
const DSIG: Tag = Tag::new(b"DSIG");

/// Offset of `indexToLocFormat` in `head`
const HEAD_LOCA_FORMAT: usize = 50;
const HEAD_MIN_LEN: usize = 54;

pub(crate) fn malformed(font: FontId, reason: impl Display) -> SubsetError {
    SubsetError::Malformed {
        font,
        reason: reason.to_string(),
    }
}

/// Parse the face a program points at
pub fn open(program: &dyn FontProgram, font: FontId) -> Result<FontRef<'_>, SubsetError> {
    FontRef::from_index(program.data(), program.face_index()).map_err(|e| malformed(font, e))
}

/// Grow `seeds` by every glyph a substitution or a composite can reach
///
/// GSUB closure and composite components feed each other, so both run
/// until neither adds a glyph.
pub fn reachable_glyphs(
    source: &FontRef,
    font: FontId,
    seeds: &BTreeSet<GlyphId>,
) -> Result<BTreeSet<GlyphId>, SubsetError> {
    let mut set: IntSet<ReadGlyphId> = seeds.iter().map(|gid| ReadGlyphId::new(*gid)).collect();

    loop {
        let before = set.len();
        if source.table_data(GSUB).is_some() {
            let gsub = source.gsub().map_err(|e| malformed(font, e))?;
            gsub.closure_glyphs(&IntSet::all(), &mut set)
                .map_err(|e| malformed(font, e))?;
        }
        add_components(source, font, &mut set)?;
        if set.len() == before {
            break;
        }
    }

    Ok(set.iter().map(|gid| gid.to_u32()).collect())
}

fn add_components(
    source: &FontRef,
    font: FontId,
    set: &mut IntSet<ReadGlyphId>,
) -> Result<(), SubsetError> {
    if source.table_data(GLYF).is_none() {
        return Ok(());
    }
    let loca = source.loca(None).map_err(|e| malformed(font, e))?;
    let glyf = source.glyf().map_err(|e| malformed(font, e))?;

    let mut pending: Vec<ReadGlyphId> = set.iter().collect();
    while let Some(gid) = pending.pop() {
        if let Some(Glyph::Composite(composite)) =
            loca.get_glyf(gid, &glyf).map_err(|e| malformed(font, e))?
        {
            for (component, _) in composite.component_glyphs_and_flags() {
                let component = ReadGlyphId::from(component);
                if set.insert(component) {
                    pending.push(component);
                }
            }
        }
    }
    Ok(())
}

/// Raw outline bytes of one glyph, empty for a blank glyph
fn glyph_bytes<'a>(font: &FontRef<'a>, gid: GlyphId) -> Option<&'a [u8]> {
    let loca = font.loca(None).ok()?;
    let glyf = font.table_data(GLYF)?;
    let start = loca.get_raw(gid as usize)? as usize;
    let end = loca.get_raw(gid as usize + 1)? as usize;
    if end < start {
        return None;
    }
    glyf.as_bytes().get(start..end)
}

/// Copy the retained outlines into new `glyf`/long `loca` tables
fn cut_glyf(
    source: &FontRef,
    font: FontId,
    glyphs: &BTreeSet<GlyphId>,
) -> Result<(Vec<u8>, Vec<u8>), SubsetError> {
    let loca = source.loca(None).map_err(|e| malformed(font, e))?;
    let count = loca.len() as u32;

    let mut glyf = Vec::new();
    let mut offsets = Vec::with_capacity((count as usize + 1) * 4);
    for gid in 0..count {
        offsets.extend_from_slice(&(glyf.len() as u32).to_be_bytes());
        if glyphs.contains(&gid) {
            let bytes = glyph_bytes(source, gid)
                .ok_or_else(|| malformed(font, format!("glyph {} is out of bounds", gid)))?;
            glyf.extend_from_slice(bytes);
        }
    }
    offsets.extend_from_slice(&(glyf.len() as u32).to_be_bytes());

    Ok((glyf, offsets))
}

/// Build the subset font file for `cmap` and `glyphs`
pub fn write_subset(
    source: &FontRef,
    font: FontId,
    cmap: &BTreeMap<char, GlyphId>,
    glyphs: &BTreeSet<GlyphId>,
) -> Result<Vec<u8>, SubsetError> {
    let mut builder = FontBuilder::new();

    let table = Cmap::from_mappings(cmap.iter().map(|(ch, gid)| (*ch, WriteGlyphId::new(*gid))))
        .map_err(|e| malformed(font, e))?;
    builder.add_table(&table).map_err(|e| malformed(font, e))?;

    if source.table_data(GLYF).is_some() {
        let (glyf, loca) = cut_glyf(source, font, glyphs)?;
        let mut head = source
            .table_data(HEAD)
            .map(|data| data.as_bytes().to_vec())
            .filter(|head| head.len() >= HEAD_MIN_LEN)
            .ok_or_else(|| malformed(font, "missing or short head table"))?;
        head[HEAD_LOCA_FORMAT..HEAD_LOCA_FORMAT + 2].copy_from_slice(&1i16.to_be_bytes());

        builder.add_raw(write_tag(GLYF), glyf);
        builder.add_raw(write_tag(LOCA), loca);
        builder.add_raw(write_tag(HEAD), head);
    }

    for record in source.table_directory().table_records() {
        let tag = record.tag();
        if tag == DSIG || tag == CMAP || builder.contains(write_tag(tag)) {
            continue;
        }
        match source.table_data(tag) {
            Some(data) => {
                builder.add_raw(write_tag(tag), data.as_bytes());
            },
            None => log::warn!("{}: table '{}' is out of bounds, dropped", font, tag),
        }
    }

    Ok(builder.build())
}

fn write_tag(tag: Tag) -> WriteTag {
    WriteTag::new(&tag.to_be_bytes())
}

/// Re-read the subset bytes and compare them with the source
///
/// Returns the closure codepoints the subset cannot draw. Every retained
/// glyph must also carry its source outline unchanged.
pub fn verify(
    program: &dyn FontProgram,
    min: &MinimizedFont,
    closure: &GlyphClosure,
) -> Result<Vec<char>, SubsetError> {
    let font = min.font;
    let source = open(program, font)?;
    let output = FontRef::new(&min.data).map_err(|e| malformed(font, e))?;
    let cmap = output.cmap().map_err(|e| malformed(font, e))?;
    let glyph_count = output
        .maxp()
        .map(|maxp| u32::from(maxp.num_glyphs()))
        .map_err(|e| malformed(font, e))?;
    let outlines = source.table_data(GLYF).is_some();

    if outlines {
        for &gid in &min.glyphs {
            if glyph_bytes(&source, gid) != glyph_bytes(&output, gid) {
                return Err(malformed(font, format!("glyph {} lost its outline", gid)));
            }
        }
    }

    let mut missing = Vec::new();
    for &ch in &closure.codepoints {
        let drawn = match cmap.map_codepoint(ch).map(|gid| gid.to_u32()) {
            None | Some(0) => false,
            Some(gid) if gid >= glyph_count => false,
            Some(gid) => !outlines || min.glyphs.contains(&gid),
        };
        if !drawn {
            missing.push(ch);
        }
    }
    Ok(missing)
}
