use std::{fmt, path::PathBuf, str::FromStr};

use indexmap::{IndexMap, map::Entry};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::DstError,
    paths::DataPaths,
    utils::{load_json, read_zipped_json, write_json_to_file},
};

/// Role of the speaker whose messages carry belief states.
pub const USER_ROLE: &str = "usr";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, clap::ValueEnum)]
pub enum DataType {
    Train,
    Dev,
    Test,
}

impl DataType {
    pub fn all_data_types() -> impl Iterator<Item = DataType> {
        [DataType::Train, DataType::Dev, DataType::Test].into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Train => "train",
            DataType::Dev => "dev",
            DataType::Test => "test",
        }
    }

    /// The raw corpus names its dev split "val".
    pub fn raw_filename(&self) -> &'static str {
        match self {
            DataType::Dev => "val",
            _ => self.as_str(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = DstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(DataType::Train),
            "dev" => Ok(DataType::Dev),
            "test" => Ok(DataType::Test),
            other => Err(DstError::UnknownDataType(other.to_string())),
        }
    }
}

/// One entry of `{data_type}_dials.json`
#[derive(Deserialize, Clone, Debug)]
pub struct DialogueDefinition {
    pub dialogue_idx: String,
    pub dialogue: Vec<TurnDefinition>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TurnDefinition {
    pub belief_state: Value, // copied into the raw message untouched
}

/// Injects each definition turn's belief state into the user message of the
/// matching raw session. Turn `i` lands on message `2 * i`, which must be a
/// user message; anything else means the two dumps disagree and the merge stops.
pub fn merge_raw_data(
    dials: &[DialogueDefinition],
    raw: &IndexMap<String, Value>,
) -> Result<IndexMap<String, Value>, DstError> {
    let mut merge_data: IndexMap<String, Value> = IndexMap::new();

    for dial in dials {
        let dialogue_idx = &dial.dialogue_idx;
        let merged = match merge_data.entry(dialogue_idx.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let cur_raw = raw
                    .get(dialogue_idx)
                    .cloned()
                    .ok_or_else(|| DstError::MissingDialogue {
                        dialogue_idx: dialogue_idx.clone(),
                    })?;
                entry.insert(cur_raw)
            }
        };

        for (turn_id, turn) in dial.dialogue.iter().enumerate() {
            let position = 2 * turn_id;
            let message = merged
                .get_mut("messages")
                .and_then(Value::as_array_mut)
                .and_then(|messages| messages.get_mut(position))
                .ok_or_else(|| DstError::MissingMessage {
                    dialogue_idx: dialogue_idx.clone(),
                    position,
                })?;

            let role = message.get("role").and_then(Value::as_str);
            if role != Some(USER_ROLE) {
                return Err(DstError::RoleMismatch {
                    dialogue_idx: dialogue_idx.clone(),
                    turn_id,
                    position,
                    found: role.map(str::to_string),
                });
            }
            // a message with a role is always an object
            if let Some(message) = message.as_object_mut() {
                message.insert("belief_state".to_string(), turn.belief_state.clone());
            }
        }
        debug!(
            "Merged dialogue {} ({} turns)",
            dialogue_idx,
            dial.dialogue.len()
        );
    }

    Ok(merge_data)
}

/// Reads both dumps of `data_type` under `paths`, merges them and writes
/// `{data_type}4bert_dst.json`. Returns the written path.
pub fn merge_raw_data_files(paths: &DataPaths, data_type: DataType) -> Result<PathBuf, DstError> {
    let dials_path = paths.dials_path(data_type);
    let raw_path = paths.raw_zip_path(data_type);
    let raw_member = format!("{}.json", data_type.raw_filename());

    let dials: Vec<DialogueDefinition> = load_json(&dials_path)?;
    let raw: IndexMap<String, Value> = read_zipped_json(&raw_path, &raw_member)?;
    info!(
        "Merging {}: {} dialogues from {} with {}",
        data_type,
        dials.len(),
        dials_path.display(),
        raw_path.display()
    );

    let merge_data = merge_raw_data(&dials, &raw)?;

    let output_path = paths.merged_path(data_type);
    write_json_to_file(&output_path, &merge_data)?;
    info!(
        "Wrote {} merged dialogues to {}",
        merge_data.len(),
        output_path.display()
    );
    Ok(output_path)
}
