use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::DstError;

pub fn load_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T, DstError> {
    let file_path = file_path.as_ref();
    let file = File::open(file_path).map_err(|e| DstError::io(file_path, e))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| DstError::json(file_path, e))
}

/// Parses the JSON document stored as `member_name` inside the zip archive at `zip_path`.
pub fn read_zipped_json<T: DeserializeOwned>(
    zip_path: impl AsRef<Path>,
    member_name: &str,
) -> Result<T, DstError> {
    let zip_path = zip_path.as_ref();
    let file = File::open(zip_path).map_err(|e| DstError::io(zip_path, e))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| DstError::Zip {
        path: zip_path.to_path_buf(),
        source: e,
    })?;
    let member = archive.by_name(member_name).map_err(|e| DstError::Zip {
        path: zip_path.join(member_name),
        source: e,
    })?;
    serde_json::from_reader(BufReader::new(member))
        .map_err(|e| DstError::json(zip_path.join(member_name), e))
}

/// Writes `value` as 2-space indented JSON, keeping non-ASCII text unescaped.
pub fn write_json_to_file<T: Serialize + ?Sized>(
    file_path: impl AsRef<Path>,
    value: &T,
) -> Result<(), DstError> {
    use std::fs::create_dir_all;
    let file_path = file_path.as_ref();
    if let Some(parent) = file_path.parent() {
        create_dir_all(parent).map_err(|e| DstError::io(parent, e))?;
    }

    let file = File::create(file_path).map_err(|e| DstError::io(file_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| DstError::json(file_path, e))?;
    writer.flush().map_err(|e| DstError::io(file_path, e))?;

    Ok(())
}
