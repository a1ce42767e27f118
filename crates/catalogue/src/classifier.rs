use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named inclusive range of material numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialClass {
    pub name: String,
    pub first: u32,
    pub last: u32,
}

/// Site convention mapping material numbers to classes
///
/// Empty by default, in which case nothing is classified and nothing is
/// reported.
///
/// ```rust
/// # use idate_catalogue::MaterialClassifier;
/// let classifier = MaterialClassifier::default()
///     .with_class("fuel", 1, 99)
///     .unwrap()
///     .with_class("absorber", 100, 199)
///     .unwrap();
///
/// assert_eq!(classifier.classify(150), Some("absorber"));
/// assert_eq!(classifier.classify(500), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialClassifier {
    #[serde(default)]
    pub classes: Vec<MaterialClass>,
}

impl MaterialClassifier {
    /// Add a class, rejecting ranges that hold no numbers
    pub fn with_class(mut self, name: &str, first: u32, last: u32) -> Result<Self> {
        if last < first {
            return Err(Error::EmptyClassRange {
                name: name.to_string(),
                first,
                last,
            });
        }
        self.classes.push(MaterialClass {
            name: name.to_string(),
            first,
            last,
        });
        Ok(self)
    }

    /// Read classes from a JSON file of `{"classes": [{name, first, last}]}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::io::BufReader::new(std::fs::File::open(path)?);
        let classifier: Self = serde_json::from_reader(file)?;
        if let Some(c) = classifier.classes.iter().find(|c| c.last < c.first) {
            return Err(Error::EmptyClassRange {
                name: c.name.clone(),
                first: c.first,
                last: c.last,
            });
        }
        debug!("{} material classes loaded", classifier.classes.len());
        Ok(classifier)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Name of the first class containing `id`
    pub fn classify(&self, id: u32) -> Option<&str> {
        self.classes
            .iter()
            .find(|c| (c.first..=c.last).contains(&id))
            .map(|c| c.name.as_str())
    }
}
