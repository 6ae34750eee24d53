use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use log::info;

use crate::{
    error::DstError,
    paths::DataPaths,
    utils::{load_json, write_json_to_file},
};

/// Delimiters of compound values, tried in this order.
pub const SEPARATORS: [&str; 7] = ["、", "，", ",", ";", "或", "；", "   "];

/// Slot that collects every hotel facility.
pub const FACILITY_KEY: &str = "酒店-酒店设施";

const FACILITY_SLOT: &str = "酒店设施";

pub type Ontology = IndexMap<String, Vec<String>>;

/// Splits `value` on the first separator of [`SEPARATORS`] it contains and
/// strips all whitespace from every piece. Later separators are left alone.
pub fn split_compound_value(value: &str) -> Vec<String> {
    let pieces: Vec<&str> = match SEPARATORS.iter().find(|sep| value.contains(**sep)) {
        Some(sep) => value.split(*sep).collect(),
        None => vec![value],
    };
    pieces
        .into_iter()
        .map(|piece| piece.chars().filter(|c| !is_separator_space(*c)).collect())
        .collect()
}

/// Unicode whitespace plus the ASCII information separators U+001C..U+001F,
/// which Python's `str.split()` also treats as blanks.
fn is_separator_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

pub fn clean_ontology(ontology: &Ontology) -> Ontology {
    let mut cleaned_ontologies = Ontology::new();
    let mut facility: Vec<String> = Vec::new();

    for (ds, values) in ontology.iter() {
        let segments: Vec<&str> = ds.split('-').collect();
        if segments.len() > 2 {
            // "酒店-酒店设施-<facility>": the facility name is the last segment
            if let Some(name) = segments.last() {
                facility.push(name.to_string());
            }
            continue;
        }
        if segments.last() == Some(&FACILITY_SLOT) {
            continue;
        }

        let mut cleaned_values: IndexSet<String> = IndexSet::new();
        for value in values {
            cleaned_values.extend(split_compound_value(value));
        }

        // FIXME: rewritten on every emitted slot, so the facility key is pinned
        // at the position of the first one. The list itself is filled in after
        // the loop, which keeps the complete facility list.
        cleaned_ontologies.insert(FACILITY_KEY.to_string(), Vec::new());
        cleaned_ontologies.insert(ds.clone(), cleaned_values.into_iter().collect());
    }

    if let Some(slot) = cleaned_ontologies.get_mut(FACILITY_KEY) {
        *slot = facility;
    }
    cleaned_ontologies
}

/// Cleans `ontology.json` under `paths` into `cleaned_ontology.json`.
pub fn clean_ontology_file(paths: &DataPaths) -> Result<PathBuf, DstError> {
    let ontology_path = paths.ontology_path();
    let ontology: Ontology = load_json(&ontology_path)?;
    info!(
        "Cleaning {} ontology slots from {}",
        ontology.len(),
        ontology_path.display()
    );

    let cleaned = clean_ontology(&ontology);

    let output_path = paths.cleaned_ontology_path();
    write_json_to_file(&output_path, &cleaned)?;
    info!(
        "Wrote {} cleaned slots to {}",
        cleaned.len(),
        output_path.display()
    );
    Ok(output_path)
}
