// this_file: crates/mushaf-unicode/src/rasm.rs

//! Rasm reduction: Arabic text down to its consonantal skeleton
//!
//! Three passes in one walk over the text:
//!
//! 1. Harakat, Quranic annotation marks, tatweel and bare hamza are dropped.
//! 2. Dotted letters collapse to their dotless base. Yeh (plain, hamza-bearing
//!    or Farsi) is positional: alef maksura at the end of a word, dotless beh
//!    anywhere else.
//! 3. A zero-width joiner is placed after the first lam of every lam-lam-heh
//!    run, so renderers do not substitute the Allah ligature into a skeleton.
//!
//! Every codepoint has an output (itself when unmapped) and the transform is
//! idempotent.

pub const ZWJ: char = '\u{200D}';
pub const DOTLESS_BEH: char = '\u{066E}';
pub const DOTLESS_QAF: char = '\u{066F}';
pub const DOTLESS_FEH: char = '\u{06A1}';
pub const NOON_GHUNNA: char = '\u{06BA}';
pub const ALEF_MAKSURA: char = '\u{0649}';

const LAM: char = '\u{0644}';
const HEH: char = '\u{0647}';

/// Reduce `text` to rasm
pub fn reduce(text: &str) -> String {
    let kept: Vec<char> = text.chars().filter(|ch| !is_dropped(*ch)).collect();
    let mut out = String::with_capacity(text.len());

    for (idx, &ch) in kept.iter().enumerate() {
        let mapped = if is_positional_yeh(ch) {
            if is_word_end(kept.get(idx + 1).copied()) {
                ALEF_MAKSURA
            } else {
                DOTLESS_BEH
            }
        } else {
            dotless(ch)
        };

        if mapped == HEH {
            break_allah_ligature(&mut out);
        }
        out.push(mapped);
    }

    out
}

/// Marks removed outright
pub fn is_dropped(ch: char) -> bool {
    matches!(ch,
        '\u{0610}'..='\u{061A}'   // honorifics, small high marks
        | '\u{064B}'..='\u{065F}' // harakat, hamza above/below
        | '\u{0670}'              // superscript alef
        | '\u{06D6}'..='\u{06DC}' // small high pause marks
        | '\u{06DF}'..='\u{06E8}' // small high/low annotation
        | '\u{06EA}'..='\u{06ED}'
        | '\u{08D3}'..='\u{08FF}' // extended Quranic marks
        | '\u{0640}'              // tatweel
        | '\u{0621}' // hamza
    )
}

fn is_positional_yeh(ch: char) -> bool {
    matches!(ch, '\u{064A}' | '\u{0626}' | '\u{06CC}')
}

fn dotless(ch: char) -> char {
    match ch {
        '\u{0628}' | '\u{062A}' | '\u{062B}' | '\u{067E}' => DOTLESS_BEH,
        '\u{0646}' => NOON_GHUNNA,
        '\u{062C}' | '\u{062E}' => '\u{062D}',
        '\u{0630}' => '\u{062F}',
        '\u{0632}' => '\u{0631}',
        '\u{0634}' => '\u{0633}',
        '\u{0636}' => '\u{0635}',
        '\u{0638}' => '\u{0637}',
        '\u{063A}' => '\u{0639}',
        '\u{0641}' | '\u{06A4}' => DOTLESS_FEH,
        '\u{0642}' => DOTLESS_QAF,
        '\u{0629}' => HEH,
        '\u{0622}' | '\u{0623}' | '\u{0625}' | '\u{0671}' => '\u{0627}',
        '\u{0624}' => '\u{0648}',
        other => other,
    }
}

/// A yeh ends its word unless an Arabic letter or a joiner follows
///
/// Punctuation counts as a word end, so a yeh directly before a comma or
/// an ayah-end sign still takes the final form.
fn is_word_end(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(ZWJ) => false,
        Some(ch) => !is_arabic_letter(ch),
    }
}

pub fn is_arabic_letter(ch: char) -> bool {
    matches!(ch,
        '\u{0620}'..='\u{063F}'
        | '\u{0641}'..='\u{064A}'
        | '\u{066E}'..='\u{066F}'
        | '\u{0671}'..='\u{06D3}'
        | '\u{06D5}'
        | '\u{06EE}'..='\u{06EF}'
        | '\u{06FA}'..='\u{06FC}'
        | '\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{08A0}'..='\u{08C9}'
    )
}

fn break_allah_ligature(out: &mut String) {
    let mut tail = out.chars().rev();
    if tail.next() == Some(LAM) && tail.next() == Some(LAM) {
        out.pop();
        out.push(ZWJ);
        out.push(LAM);
    }
}
