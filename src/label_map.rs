//! TensorFlow label map (.pbtxt) loading and lookup.

use anyhow::{anyhow, bail, ensure, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Immutable mapping from class-name string to the integer id used by the
/// training pipeline. Loaded once per run and passed explicitly to the
/// record writer.
#[derive(Debug, Clone)]
pub struct LabelMap {
    map: HashMap<String, i64>,
}

impl LabelMap {
    /// Load and validate a label map file of the form:
    ///
    /// ```text
    /// item {
    ///   id: 1
    ///   name: 'cat'
    /// }
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read label map {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse label map {}", path.display()))
    }

    /// Parse the pbtxt text form. Each item needs a `name` and an id >= 1;
    /// other item fields (`display_name`, ...) are ignored.
    pub fn parse(content: &str) -> Result<Self> {
        let mut map = HashMap::new();
        let mut item: Option<(Option<String>, Option<i64>)> = None;

        for raw_line in content.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("item") && line.ends_with('{') {
                ensure!(item.is_none(), "nested item block");
                item = Some((None, None));
            } else if line == "}" {
                let (name, id) = item
                    .take()
                    .ok_or_else(|| anyhow!("unmatched closing brace"))?;
                let name = name.ok_or_else(|| anyhow!("item is missing a name"))?;
                let id = id.ok_or_else(|| anyhow!("item '{}' is missing an id", name))?;
                ensure!(id >= 1, "label '{}' has non-positive id {}", name, id);
                ensure!(
                    map.insert(name.clone(), id).is_none(),
                    "duplicate label '{}'",
                    name
                );
            } else if let Some((name, id)) = item.as_mut() {
                if let Some(value) = line.strip_prefix("name:") {
                    *name = Some(unquote(value)?.to_string());
                } else if let Some(value) = line.strip_prefix("id:") {
                    *id = Some(
                        value
                            .trim()
                            .parse()
                            .with_context(|| format!("invalid id '{}'", value.trim()))?,
                    );
                }
            }
        }

        ensure!(item.is_none(), "unterminated item block");
        ensure!(!map.is_empty(), "label map contains no items");
        Ok(Self { map })
    }

    /// Resolve a class label to its integer id.
    pub fn resolve(&self, label: &str) -> Result<i64> {
        match self.map.get(label) {
            Some(&id) => Ok(id),
            None => bail!("label '{}' is not present in the label map", label),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// Strip one level of single or double quotes
fn unquote(value: &str) -> Result<&str> {
    let value = value.trim();
    let quoted = value.len() >= 2
        && ((value.starts_with('\'') && value.ends_with('\''))
            || (value.starts_with('"') && value.ends_with('"')));
    if quoted {
        Ok(&value[1..value.len() - 1])
    } else {
        bail!("expected quoted string, got '{}'", value)
    }
}
