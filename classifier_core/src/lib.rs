//! Classifier core - rule-based intent classification for clinical questions
//!
//! Free-text queries are normalized, scored against an ordered table of
//! keyword/phrase rules, and resolved to one intent with a confidence, a
//! fallback policy for weak matches, and a diagnostic score table.

pub mod error;
pub mod types;
pub mod normalize;
pub mod registry;
pub mod scorer;
pub mod matcher;
pub mod lookup;

pub use error::*;
pub use types::*;
pub use normalize::normalize;
pub use registry::PatternRegistry;
pub use scorer::{score, KEYWORD_WEIGHT, MAX_SCORE, PHRASE_WEIGHT};
pub use matcher::*;
pub use lookup::*;

// Python bindings
#[cfg(feature = "python")]
pub mod py;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn classifier_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyIntentClassifier>()?;
    m.add_function(wrap_pyfunction!(py_classify, m)?)?;
    m.add_function(wrap_pyfunction!(py_intent_for_suggested_id, m)?)?;
    m.add_function(wrap_pyfunction!(py_is_supported_intent, m)?)?;
    m.add_function(wrap_pyfunction!(py_display_name, m)?)?;
    Ok(())
}
