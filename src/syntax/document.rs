//! A parsed document and its file boundary.

use std::fmt;
use std::fs;
use std::path::Path;

use smol_str::SmolStr;

use super::error::SyntaxError;
use super::parser::parse;
use super::tree::{Element, Generic, Specializer};
use crate::{Error, Result};

/// One parsed file: a single top-level group plus whatever whitespace
/// followed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    root: Element,
    trailing: SmolStr,
}

impl Document {
    /// Parse `text` keeping every group generic.
    pub fn parse(text: &str) -> std::result::Result<Self, SyntaxError> {
        Self::parse_with(text, &Generic)
    }

    /// Parse `text`, letting `specializer` pick the variant of each group.
    pub fn parse_with(
        text: &str,
        specializer: &impl Specializer,
    ) -> std::result::Result<Self, SyntaxError> {
        let parsed = parse(text, specializer)?;
        Ok(Self {
            root: parsed.root,
            trailing: parsed.trailing,
        })
    }

    /// Read and parse the file at `path`.
    pub fn read_file(path: impl AsRef<Path>, specializer: &impl Specializer) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!("parsing {} ({} bytes)", path.display(), text.len());
        Self::parse_with(&text, specializer).map_err(|source| Error::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Serialize the whole document to `path` in one write.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string()).map_err(|source| Error::Write {
            path: path.to_owned(),
            source,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Text after the root group's closing delimiter.
    pub fn trailing(&self) -> &str {
        &self.trailing
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.trailing)
    }
}
