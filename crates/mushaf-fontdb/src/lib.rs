//! Fonts for the Mushaf engine: which ones are safe, and how to load them
//!
//! Two halves:
//!
//! - [`CompatibilityRegistry`] decides which fonts may render which script
//!   encoding. It is built from a [`RegistrySeed`] and refuses anything the
//!   seed does not enumerate.
//! - [`FontLibrary`] holds the parsed font programs a run embeds, loaded
//!   from [`FontSources`] through `read-fonts`.

pub mod font;
pub mod library;
pub mod registry;
pub mod security;
pub mod seed;

pub use font::Font;
pub use library::{FontLibrary, FontSources};
pub use registry::CompatibilityRegistry;
pub use seed::{FontEntry, PairSeed, RegistrySeed, RoleFonts, VerifiedFont};

#[cfg(test)]
mod tests;

#[cfg(test)]
mod proptests;
