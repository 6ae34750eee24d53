pub mod dst_evaluator;
pub mod error;
pub mod merge;
pub mod ontology;
pub mod paths;
#[cfg(feature = "python")]
pub mod python_interface;
pub mod triple;
pub mod utils;

pub use error::DstError;

#[cfg(feature = "python")]
#[pyo3::pymodule]
pub mod crosswoz_dst {
    #[pymodule_export]
    use super::python_interface::eval_metrics;
    #[pymodule_export]
    use super::python_interface::merge_raw_data;
    #[pymodule_export]
    use super::python_interface::clean_ontology;
}
