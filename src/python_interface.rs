use pyo3::{PyResult, exceptions::PyValueError, pyfunction};

use crate::{
    dst_evaluator::{self, ModelOutput},
    error::DstError,
    merge::{DataType, merge_raw_data_files},
    ontology::clean_ontology_file,
    paths::DataPaths,
};

fn to_py_err(e: DstError) -> pyo3::PyErr {
    PyValueError::new_err(e.to_string())
}

/// Takes the model output as a JSON string and returns the evaluation report as JSON.
#[pyfunction]
pub fn eval_metrics(model_output: String) -> PyResult<String> {
    let model_output: ModelOutput = serde_json::from_str(&model_output)
        .map_err(|e| PyValueError::new_err(format!("Unable to parse model output: {}", e)))?;
    let report = dst_evaluator::eval_metrics(&model_output).map_err(to_py_err)?;
    serde_json::to_string(&report)
        .map_err(|e| PyValueError::new_err(format!("Unable to serialize report: {}", e)))
}

#[pyfunction]
pub fn merge_raw_data(data_path: String, data_type: String) -> PyResult<String> {
    let data_type: DataType = data_type.parse().map_err(to_py_err)?;
    let output_path =
        merge_raw_data_files(&DataPaths::new(data_path), data_type).map_err(to_py_err)?;
    Ok(output_path.display().to_string())
}

#[pyfunction]
pub fn clean_ontology(data_path: String) -> PyResult<String> {
    let output_path = clean_ontology_file(&DataPaths::new(data_path)).map_err(to_py_err)?;
    Ok(output_path.display().to_string())
}
