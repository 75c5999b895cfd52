//! Citation grounding: references, marker grammar, narrative validation

mod markers;
mod references;
mod validator;

pub use markers::{split_sentences, CitationMarkers};
pub use references::ReferenceBuilder;
pub use validator::{NarrativeCitationValidator, ValidatedNarrative};
