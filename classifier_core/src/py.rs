//! Python bindings for classifier core using PyO3

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString};
use crate::lookup::{display_name_for, intent_for_suggested_id, is_supported_intent};
use crate::matcher::{classify, Classifier};
use crate::registry::PatternRegistry;
use crate::types::ClassificationResult;

/// Anything other than a Python `str` is treated as invalid input
fn as_query(value: Option<&Bound<'_, PyAny>>) -> Option<String> {
    value
        .and_then(|v| v.downcast::<PyString>().ok())
        .and_then(|s| s.to_cow().ok().map(|text| text.into_owned()))
}

fn result_to_dict<'py>(py: Python<'py>, result: ClassificationResult) -> PyResult<Bound<'py, PyDict>> {
    let all_scores: Vec<Bound<'_, PyDict>> = result
        .all_scores
        .iter()
        .map(|row| -> PyResult<Bound<'_, PyDict>> {
            let row_dict = PyDict::new_bound(py);
            row_dict.set_item("type", row.intent.as_str())?;
            row_dict.set_item("score", row.score)?;
            Ok(row_dict)
        })
        .collect::<PyResult<Vec<_>>>()?;

    let dict = PyDict::new_bound(py);
    dict.set_item("type", result.intent.as_str())?;
    dict.set_item("confidence", result.confidence)?;
    dict.set_item("originalQuery", result.original_query)?;
    dict.set_item("matchedKeywords", result.matched_keywords)?;
    dict.set_item("matchedPhrases", result.matched_phrases)?;
    dict.set_item("description", result.description)?;
    dict.set_item("fallback", result.fallback)?;
    dict.set_item("allScores", all_scores)?;
    Ok(dict)
}

/// Classify with the built-in registry; accepts any object
#[pyfunction]
#[pyo3(name = "classify", signature = (query=None))]
pub fn py_classify<'py>(py: Python<'py>, query: Option<Bound<'py, PyAny>>) -> PyResult<Bound<'py, PyDict>> {
    let text = as_query(query.as_ref());
    result_to_dict(py, classify(text.as_deref()))
}

#[pyfunction]
#[pyo3(name = "intent_for_suggested_id")]
pub fn py_intent_for_suggested_id(id: &str) -> &'static str {
    intent_for_suggested_id(id).as_str()
}

#[pyfunction]
#[pyo3(name = "is_supported_intent")]
pub fn py_is_supported_intent(value: Bound<'_, PyAny>) -> bool {
    as_query(Some(&value)).is_some_and(|s| is_supported_intent(&s))
}

#[pyfunction]
#[pyo3(name = "display_name")]
pub fn py_display_name(value: Bound<'_, PyAny>) -> &'static str {
    display_name_for(as_query(Some(&value)).as_deref().unwrap_or_default())
}

/// Python wrapper for a classifier over a specific registry
#[pyclass(name = "IntentClassifier")]
pub struct PyIntentClassifier {
    classifier: Classifier,
}

#[pymethods]
impl PyIntentClassifier {
    /// Built-in registry, or an ordered JSON registry document
    #[new]
    #[pyo3(signature = (registry_json=None))]
    fn new(registry_json: Option<&str>) -> PyResult<Self> {
        let registry = match registry_json {
            Some(json) => PatternRegistry::from_json(json)
                .map_err(|e| PyValueError::new_err(format!("Invalid registry: {}", e)))?,
            None => PatternRegistry::builtin(),
        };

        Ok(Self {
            classifier: Classifier::new(registry),
        })
    }

    #[pyo3(signature = (query=None))]
    fn classify<'py>(&self, py: Python<'py>, query: Option<Bound<'py, PyAny>>) -> PyResult<Bound<'py, PyDict>> {
        let text = as_query(query.as_ref());
        result_to_dict(py, self.classifier.classify(text.as_deref()))
    }

    /// Intents in registry declaration order
    fn intents(&self) -> Vec<&'static str> {
        self.classifier.registry().intents().map(|i| i.as_str()).collect()
    }

    fn __len__(&self) -> usize {
        self.classifier.registry().len()
    }
}
