// this_file: crates/mushaf-assemble/src/lib.rs

//! Content assembly for the Mushaf engine.
//!
//! Turns the immutable [`Book`] into the ordered document fragments one
//! variant ships, plus the navigation model that points into them.
//!
//! Three layouts share one walk over the book:
//!
//! - **inline** - scripture only, one continuous flow
//! - **paired** - each ayah followed by its translation, footnotes as
//!   non-linear notes cross-linked by anchor
//! - **interactive** - scripture body, translations as popup notes
//!
//! The assembler never looks fonts up itself. It takes a resolved
//! [`FontAssignment`] and tags every span with the role that renders it,
//! so digits and hizb marks always route through the symbol font and
//! headers and the basmala ornament never fall to the body font.

mod layout;
pub mod nav;

use std::fmt;

use mushaf_core::config::BuildConfig;
use mushaf_core::content::{AyahKey, Book, TranslatorId};
use mushaf_core::error::AssemblyError;
use mushaf_core::fragment::{DocumentFragment, FontAssignment, NavModel};

pub use nav::{BOOK_TITLE, JUZ_LABEL, PAGE_LABEL};

/// Something recovered from during assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No text for this translator at this ayah; a placeholder span stands in
    MissingTranslation {
        key: AyahKey,
        translator: TranslatorId,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTranslation { key, translator } => {
                write!(f, "translation {} missing at {}", translator, key)
            },
        }
    }
}

/// Everything one variant's assembly produced
#[derive(Debug, Clone)]
pub struct Assembly {
    pub fragments: Vec<DocumentFragment>,
    pub nav: NavModel,
    pub diagnostics: Vec<Diagnostic>,
}

impl Assembly {
    /// Number of untranslated placeholders inserted
    pub fn placeholder_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::MissingTranslation { .. }))
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct Assembler {
    title: String,
}

impl Default for Assembler {
    fn default() -> Self {
        Self {
            title: BOOK_TITLE.to_string(),
        }
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the book title used for the navigation model and the
    /// whole-book fragment
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Assemble one variant
    ///
    /// The config is checked before anything is built: an invalid layout,
    /// a script the book does not carry, or a translator the book has never
    /// heard of fails the variant. A translator that exists but lacks text
    /// for some ayah does not; those ayat get a placeholder and a
    /// [`Diagnostic`].
    pub fn assemble(
        &self,
        book: &Book,
        config: &BuildConfig,
        fonts: FontAssignment,
    ) -> Result<Assembly, AssemblyError> {
        self.check(book, config)?;

        log::debug!(
            "Assembling {}: {} layout, {:?} pagination, body font {}",
            config.id,
            config.layout,
            config.pagination(),
            fonts.body
        );

        let mut builder = layout::FragmentBuilder::new(book, config, fonts, &self.title);
        for surah in &book.surahs {
            builder.surah(surah);
        }
        let (fragments, diagnostics, landmarks) = builder.finish();
        let nav = nav::build(&self.title, config.script, book, &landmarks);

        log::info!(
            "Assembled {}: {} fragments, {} ayat, {} placeholders",
            config.id,
            fragments.len(),
            book.ayah_count(),
            diagnostics.len()
        );

        Ok(Assembly {
            fragments,
            nav,
            diagnostics,
        })
    }

    fn check(&self, book: &Book, config: &BuildConfig) -> Result<(), AssemblyError> {
        config.validate()?;

        if !book.has_script(config.script) {
            return Err(AssemblyError::MissingScript(config.script));
        }

        for translator in &config.translations {
            let known = book.translators.contains_key(translator)
                || book.ayahs().any(|a| a.translations.contains_key(translator));
            if !known {
                return Err(AssemblyError::UnknownTranslation(translator.0));
            }
        }

        Ok(())
    }
}
