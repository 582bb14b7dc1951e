//! Glyph closure: what a font must keep to render a set of fragments

use mushaf_core::fragment::DocumentFragment;
use mushaf_core::glyph::GlyphClosure;
use mushaf_core::script::FontDescriptor;

/// Characters a shaper consumes without drawing a glyph
fn renders_without_glyph(ch: char) -> bool {
    matches!(
        ch,
        '\u{200B}'..='\u{200F}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
    )
}

/// Codepoints `descriptor`'s font renders across `fragments`, with every
/// required ligature whose rule touches them
///
/// Expansion runs to a fixed point: pulling in one ligature's sequence can
/// trigger another (the basmala letters contain the Allah ligature's).
pub fn closure<'a, I>(descriptor: &FontDescriptor, fragments: I) -> GlyphClosure
where
    I: IntoIterator<Item = &'a DocumentFragment>,
{
    let mut closure = GlyphClosure::new(descriptor.id);
    for fragment in fragments {
        for span in fragment.spans_for_font(descriptor.id) {
            closure
                .codepoints
                .extend(span.text.chars().filter(|ch| !renders_without_glyph(*ch)));
        }
    }

    if closure.is_empty() {
        return closure;
    }

    let mut pending: Vec<_> = descriptor.required_ligatures.iter().collect();
    loop {
        let (triggered, rest): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|lig| lig.triggered_by(&closure.codepoints));
        if triggered.is_empty() {
            break;
        }
        for ligature in triggered {
            log::debug!("{}: closure pulls in ligature '{}'", descriptor.id, ligature.name);
            closure.codepoints.extend(ligature.codepoints());
            closure.ligatures.push(ligature.clone());
        }
        pending = rest;
    }

    closure
}
