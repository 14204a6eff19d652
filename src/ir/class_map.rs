//! Class name → YOLO class id table.
//!
//! The table must stay identical between conversion runs and whatever trains
//! on the output; changing it invalidates previously written labels.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Voc2YoloError;

/// Street-furniture classes of the bundled dataset, in id order.
const BUILTIN_CLASSES: [(&str, u32); 11] = [
    ("jg", 0),
    ("rxd", 1),
    ("dxgx", 2),
    ("zsp", 3),
    ("xfs", 4),
    ("dzy", 5),
    ("lhd", 6),
    ("jdp", 7),
    ("jsp", 8),
    ("ld", 9),
    ("txx", 10),
];

/// A validated mapping from class name to id.
///
/// Ids are unique and contiguous from 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassMap {
    ids: BTreeMap<String, u32>,
}

impl ClassMap {
    /// Builds a class map from `(name, id)` pairs.
    ///
    /// Fails if a name is blank or repeated, or if the ids are not exactly
    /// `0..n`.
    pub fn new<I, S>(entries: I) -> Result<Self, Voc2YoloError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut ids = BTreeMap::new();
        let mut seen_ids = BTreeSet::new();

        for (name, id) in entries {
            let name: String = name.into();
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Voc2YoloError::ClassMapInvalid(format!(
                    "class id {id} has an empty name"
                )));
            }
            if !seen_ids.insert(id) {
                return Err(Voc2YoloError::ClassMapInvalid(format!(
                    "class id {id} is assigned more than once"
                )));
            }
            if let Some(previous) = ids.insert(name.clone(), id) {
                return Err(Voc2YoloError::ClassMapInvalid(format!(
                    "class '{name}' is mapped to both {previous} and {id}"
                )));
            }
        }

        // Ids are unique, so contiguity reduces to "the largest is n - 1".
        if let Some(&max_id) = seen_ids.last() {
            if max_id as usize + 1 != seen_ids.len() {
                let missing = (0..max_id).find(|id| !seen_ids.contains(id)).unwrap_or(0);
                return Err(Voc2YoloError::ClassMapInvalid(format!(
                    "class ids must be contiguous from 0; id {missing} is missing"
                )));
            }
        }

        Ok(Self { ids })
    }

    /// The 11-class table this tool ships with.
    pub fn builtin() -> Self {
        Self {
            ids: BUILTIN_CLASSES
                .iter()
                .map(|(name, id)| ((*name).to_string(), *id))
                .collect(),
        }
    }

    /// Loads the `names:` block of an Ultralytics-style `data.yaml`.
    ///
    /// Both the sequence form (`names: [a, b]`) and the mapping form
    /// (`names: {0: a, 1: b}`) are accepted. Other keys are ignored.
    pub fn from_data_yaml(path: &Path) -> Result<Self, Voc2YoloError> {
        let data = fs::read_to_string(path).map_err(Voc2YoloError::Io)?;
        Self::from_data_yaml_str(&data, path)
    }

    pub(crate) fn from_data_yaml_str(yaml: &str, path: &Path) -> Result<Self, Voc2YoloError> {
        let parsed: DataYaml =
            serde_yaml::from_str(yaml).map_err(|source| Voc2YoloError::DataYamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        match parsed.names {
            DataYamlNames::Sequence(names) => Self::new(
                names
                    .into_iter()
                    .enumerate()
                    .map(|(idx, name)| (name, idx as u32)),
            ),
            DataYamlNames::Mapping(mapping) => {
                Self::new(mapping.into_iter().map(|(id, name)| (name, id)))
            }
        }
    }

    /// Looks up the id for a class name.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Class names indexed by id.
    pub fn names_by_id(&self) -> Vec<&str> {
        let mut names = vec![""; self.ids.len()];
        for (name, &id) in &self.ids {
            names[id as usize] = name;
        }
        names
    }
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<u32, String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        let builtin = ClassMap::builtin();
        let rebuilt = ClassMap::new(BUILTIN_CLASSES).expect("builtin table validates");
        assert_eq!(builtin, rebuilt);
        assert_eq!(builtin.len(), 11);
        assert_eq!(builtin.get("jg"), Some(0));
        assert_eq!(builtin.get("txx"), Some(10));
        assert_eq!(builtin.get("cat"), None);
    }

    #[test]
    fn names_by_id_follows_ids_not_insertion_order() {
        let map = ClassMap::new([("b", 1), ("a", 2), ("c", 0)]).expect("valid map");
        assert_eq!(map.names_by_id(), vec!["c", "b", "a"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ClassMap::new([("a", 0), ("b", 0)]).unwrap_err();
        assert!(matches!(err, Voc2YoloError::ClassMapInvalid(_)));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = ClassMap::new([("a", 0), ("a", 1)]).unwrap_err();
        assert!(matches!(err, Voc2YoloError::ClassMapInvalid(_)));
    }

    #[test]
    fn rejects_gaps() {
        let err = ClassMap::new([("a", 0), ("b", 2)]).unwrap_err();
        let Voc2YoloError::ClassMapInvalid(message) = err else {
            panic!("expected ClassMapInvalid");
        };
        assert!(message.contains("id 1 is missing"));
    }

    #[test]
    fn rejects_blank_names() {
        let err = ClassMap::new([("  ", 0)]).unwrap_err();
        assert!(matches!(err, Voc2YoloError::ClassMapInvalid(_)));
    }

    #[test]
    fn data_yaml_mapping_form_with_extra_keys() {
        let yaml = "path: ../datasets/VOC  # root\ntrain: ImageSets/Main/train.txt\nnames:\n  0: jg       # manhole\n  1: rxd\n";
        let map = ClassMap::from_data_yaml_str(yaml, Path::new("data.yaml")).expect("parse");
        assert_eq!(map.get("jg"), Some(0));
        assert_eq!(map.get("rxd"), Some(1));
    }

    #[test]
    fn data_yaml_sequence_form() {
        let yaml = "names:\n  - cat\n  - dog\n";
        let map = ClassMap::from_data_yaml_str(yaml, Path::new("data.yaml")).expect("parse");
        assert_eq!(map.names_by_id(), vec!["cat", "dog"]);
    }

    #[test]
    fn data_yaml_without_names_is_a_parse_error() {
        let err = ClassMap::from_data_yaml_str("nc: 3\n", Path::new("data.yaml")).unwrap_err();
        assert!(matches!(err, Voc2YoloError::DataYamlParse { .. }));
    }
}
