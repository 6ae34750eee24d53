use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use crate::merge::DataType;

pub static DEFAULT_DATA_PATH: LazyLock<PathBuf> = LazyLock::new(|| PathBuf::from("data"));

pub static TRADE_DATA_DIR: LazyLock<PathBuf> =
    LazyLock::new(|| PathBuf::from("crosswoz/dst_trade_data"));

pub static RAW_DATA_DIR: LazyLock<PathBuf> = LazyLock::new(|| PathBuf::from("crosswoz/raw"));

pub static BERT_DATA_DIR: LazyLock<PathBuf> =
    LazyLock::new(|| PathBuf::from("crosswoz/dst_bert_data"));

/// Resolves every input and output file of the tool under one data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    base: PathBuf,
}

impl DataPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        DataPaths { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn bert_output_dir(&self) -> PathBuf {
        self.base.join(&*BERT_DATA_DIR)
    }

    pub fn dials_path(&self, data_type: DataType) -> PathBuf {
        self.base
            .join(&*TRADE_DATA_DIR)
            .join(format!("{}_dials.json", data_type.as_str()))
    }

    pub fn raw_zip_path(&self, data_type: DataType) -> PathBuf {
        self.base
            .join(&*RAW_DATA_DIR)
            .join(format!("{}.json.zip", data_type.raw_filename()))
    }

    pub fn merged_path(&self, data_type: DataType) -> PathBuf {
        self.bert_output_dir()
            .join(format!("{}4bert_dst.json", data_type.as_str()))
    }

    pub fn ontology_path(&self) -> PathBuf {
        self.bert_output_dir().join("ontology.json")
    }

    pub fn cleaned_ontology_path(&self) -> PathBuf {
        self.bert_output_dir().join("cleaned_ontology.json")
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths::new(DEFAULT_DATA_PATH.clone())
    }
}
