//! Translate a JSON localization file into multiple target languages via the
//! DeepL API, preserving the nested key structure of the source file.
//!
//! The source tree is flattened once into parallel key-path and value
//! sequences. Each target language gets a single batch request, and the
//! translated strings are folded back into the original shape by position.

pub mod cli;
pub mod deepl;
pub mod flatten;
pub mod runner;
pub mod settings;
pub mod tree;
