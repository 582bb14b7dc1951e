// this_file: crates/mushaf-unicode/src/validate.rs

//! Structural checks on a normalized book
//!
//! These catch loader bugs and feed anomalies before any variant is
//! assembled. Each check reports every problem it finds rather than
//! stopping at the first, except ayah sequencing, which reports one
//! break per surah.

use std::fmt;

use mushaf_core::content::{AyahKey, Book, MAX_PAGE, SURAH_COUNT};

use crate::normalize::RUB_EL_HIZB;

/// Canonical ayah counts per surah in the Hafs reading
pub const AYAH_COUNTS: [u16; 114] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99, 128, 111, 110, 98, 135,
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34, 30, 73, 54, 45, 83, 182, 88, 75, 85, 54, 53,
    89, 59, 37, 35, 38, 29, 18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11, 11, 18, 12,
    12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19, 36, 25, 22, 17, 19, 26,
    30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11, 11, 8, 3, 9, 5, 4, 7, 3, 6, 3, 5, 4, 5, 6,
];

pub const TOTAL_AYAHS: usize = 6236;

/// Canonical ayah count for `surah`, if it is a real surah number
pub fn expected_ayahs(surah: u16) -> Option<u16> {
    AYAH_COUNTS.get(usize::from(surah).checked_sub(1)?).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// The feed claims to be the whole mushaf
    Complete,
    /// A selection of surahs; count checks are skipped
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    SurahCount,
    SurahOrder,
    AyahCount,
    TotalAyahs,
    AyahSequence,
    EmptyText,
    PageRange,
    PageOrder,
    BasmalaMismatch,
    StrayHizbMark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub key: Option<AyahKey>,
    pub message: String,
}

impl ValidationIssue {
    fn new(kind: IssueKind, key: Option<AyahKey>, message: String) -> Self {
        Self { kind, key, message }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            Some(key) => write!(f, "{}: {}", key, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Run every check; an empty list means the book is sound
pub fn validate_book(book: &Book, mode: ValidationMode) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if mode == ValidationMode::Complete {
        check_counts(book, &mut issues);
    }
    check_surah_order(book, &mut issues);
    check_sequencing(book, &mut issues);
    check_text(book, &mut issues);
    check_pages(book, &mut issues);
    check_basmala(book, &mut issues);

    for issue in &issues {
        log::warn!("Validation: {}", issue);
    }
    issues
}

fn check_counts(book: &Book, issues: &mut Vec<ValidationIssue>) {
    if book.surahs.len() != usize::from(SURAH_COUNT) {
        issues.push(ValidationIssue::new(
            IssueKind::SurahCount,
            None,
            format!("expected {} surahs, got {}", SURAH_COUNT, book.surahs.len()),
        ));
    }

    for surah in &book.surahs {
        if let Some(expected) = expected_ayahs(surah.number) {
            if surah.ayahs.len() != usize::from(expected) {
                issues.push(ValidationIssue::new(
                    IssueKind::AyahCount,
                    None,
                    format!(
                        "surah {} ({}) has {} ayahs, expected {}",
                        surah.number,
                        surah.name_simple,
                        surah.ayahs.len(),
                        expected
                    ),
                ));
            }
        }
    }

    let total = book.ayah_count();
    if total != TOTAL_AYAHS {
        issues.push(ValidationIssue::new(
            IssueKind::TotalAyahs,
            None,
            format!("expected {} ayahs in total, got {}", TOTAL_AYAHS, total),
        ));
    }
}

fn check_surah_order(book: &Book, issues: &mut Vec<ValidationIssue>) {
    for pair in book.surahs.windows(2) {
        if pair[1].number <= pair[0].number {
            issues.push(ValidationIssue::new(
                IssueKind::SurahOrder,
                None,
                format!(
                    "surah {} follows surah {}",
                    pair[1].number, pair[0].number
                ),
            ));
        }
    }
}

fn check_sequencing(book: &Book, issues: &mut Vec<ValidationIssue>) {
    for surah in &book.surahs {
        let gap = surah
            .ayahs
            .iter()
            .enumerate()
            .find(|(idx, ayah)| usize::from(ayah.key.ayah) != idx + 1);
        if let Some((idx, ayah)) = gap {
            issues.push(ValidationIssue::new(
                IssueKind::AyahSequence,
                Some(ayah.key),
                format!("ayah at index {} should be number {}", idx, idx + 1),
            ));
        }
    }
}

fn check_text(book: &Book, issues: &mut Vec<ValidationIssue>) {
    for ayah in book.ayahs() {
        for (encoding, script) in &ayah.scripts {
            if script.text.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    IssueKind::EmptyText,
                    Some(ayah.key),
                    format!("empty {} text", encoding),
                ));
            }
            if encoding.is_qpc() && script.text.contains(RUB_EL_HIZB) {
                issues.push(ValidationIssue::new(
                    IssueKind::StrayHizbMark,
                    Some(ayah.key),
                    format!("{} text still contains U+06DE", encoding),
                ));
            }
        }
    }
}

fn check_pages(book: &Book, issues: &mut Vec<ValidationIssue>) {
    let mut previous = 0u16;
    for ayah in book.ayahs() {
        let page = ayah.position.page;
        if !(1..=MAX_PAGE).contains(&page) {
            issues.push(ValidationIssue::new(
                IssueKind::PageRange,
                Some(ayah.key),
                format!("page {} outside 1-{}", page, MAX_PAGE),
            ));
        }
        if page < previous {
            issues.push(ValidationIssue::new(
                IssueKind::PageOrder,
                Some(ayah.key),
                format!("page decreased from {} to {}", previous, page),
            ));
        }
        previous = page;
    }
}

fn check_basmala(book: &Book, issues: &mut Vec<ValidationIssue>) {
    let Some(opening) = book.ayah(AyahKey::new(1, 1)) else {
        return;
    };
    for (encoding, script) in &opening.scripts {
        match book.basmala(*encoding) {
            Some(basmala) if basmala == script.text => {},
            _ => issues.push(ValidationIssue::new(
                IssueKind::BasmalaMismatch,
                Some(opening.key),
                format!("{} basmala does not match Al-Fatiha 1:1", encoding),
            )),
        }
    }
}
