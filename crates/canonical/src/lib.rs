//! Flywheel canonical phrase layer.
//!
//! This crate turns a phrase (a reference translation from the phrase file
//! or an answer typed by the user) into a deterministic token stream that the
//! matcher can compare.
//!
//! ## What we do
//!
//! - Unicode normalization (NFKC by default, configurable)
//! - Casing and punctuation handling (lowercase, punctuation as delimiter)
//! - Whitespace normalization (any run of whitespace separates words)
//! - Tokenization with byte offsets into the *original* text, so the
//!   correction report can show the user's own spelling and casing
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence. Give us the same text
//! and config, you get the same tokens on any machine.

mod config;
mod error;
mod phrase;
mod pipeline;
mod token;
mod whitespace;

pub use crate::config::CanonicalizeConfig;
pub use crate::error::CanonicalError;
pub use crate::phrase::CanonicalPhrase;
pub use crate::pipeline::canonicalize;
pub use crate::token::{tokenize, Token};
pub use crate::whitespace::collapse_whitespace;
