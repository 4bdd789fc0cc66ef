//! Reader for the `=== LABEL ===` / `Key: Value` file produced by the form front-end.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};

use crate::ConfigError;

/// The six sections the form writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    General,
    Spacecraft,
    Time,
    Propagate,
    ImpulsiveBurn,
    ReportFile,
}

impl Section {
    /// Sections in marker-matching priority order.
    pub const ALL: [Section; 6] = [
        Section::General,
        Section::Spacecraft,
        Section::Time,
        Section::Propagate,
        Section::ImpulsiveBurn,
        Section::ReportFile,
    ];

    /// Text searched for inside a `=== ... ===` delimiter line.
    pub fn marker(self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Spacecraft => "SPACECRAFT",
            Self::Time => "TIEMPO",
            Self::Propagate => "PROPAGATE",
            Self::ImpulsiveBurn => "IMPULSIVE BURN",
            Self::ReportFile => "REPORTFILE",
        }
    }

    /// Stable lowercase identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Spacecraft => "spacecraft",
            Self::Time => "time",
            Self::Propagate => "propagate",
            Self::ImpulsiveBurn => "impulsive_burn",
            Self::ReportFile => "reportfile",
        }
    }

    /// Resolve a delimiter line to a section by substring match.
    pub fn from_delimiter(line: &str) -> Option<Section> {
        Self::ALL
            .into_iter()
            .find(|section| line.contains(section.marker()))
    }
}

fn is_delimiter(line: &str) -> bool {
    line.starts_with("=== ") && line.ends_with(" ===")
}

/// Parsed form: section → key → raw value. Every section is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionedConfig {
    sections: BTreeMap<Section, BTreeMap<String, String>>,
}

impl Default for SectionedConfig {
    fn default() -> Self {
        Self {
            sections: Section::ALL
                .into_iter()
                .map(|section| (section, BTreeMap::new()))
                .collect(),
        }
    }
}

impl SectionedConfig {
    /// Parse form text already held in memory.
    pub fn parse_str(text: &str) -> Self {
        let mut config = Self::default();
        let mut current: Option<Section> = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if is_delimiter(line) {
                current = Section::from_delimiter(line);
                if current.is_none() {
                    debug!("ignoring unrecognized section `{line}`");
                }
                continue;
            }

            let Some(section) = current else {
                continue;
            };
            if let Some((key, value)) = line.split_once(':') {
                config.insert(section, key.trim(), value.trim());
            }
        }

        config
    }

    /// Store a value, replacing any previous value for the same key.
    pub fn insert(&mut self, section: Section, key: impl Into<String>, value: impl Into<String>) {
        self.sections
            .entry(section)
            .or_default()
            .insert(key.into(), value.into());
    }

    /// All entries of a section; empty if the file never mentioned it.
    pub fn section(&self, section: Section) -> &BTreeMap<String, String> {
        // Default populates every section, and `insert` never removes one.
        &self.sections[&section]
    }

    pub fn get(&self, section: Section, key: &str) -> Option<&str> {
        self.section(section).get(key).map(String::as_str)
    }

    /// Iterate sections in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &BTreeMap<String, String>)> {
        self.sections.iter().map(|(section, entries)| (*section, entries))
    }
}

/// Load the form file at `path`.
///
/// Text is decoded as UTF-8; files saved in Latin-1 by older front-ends are
/// decoded byte-for-byte instead of being rejected.
pub fn parse<P: AsRef<Path>>(path: P) -> Result<SectionedConfig, ConfigError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ConfigError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io(err),
    })?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            debug!("{} is not UTF-8, decoding as Latin-1", path.display());
            err.into_bytes().into_iter().map(char::from).collect()
        }
    };

    let config = SectionedConfig::parse_str(&text);
    info!(
        "loaded {} form entries from {}",
        config.iter().map(|(_, entries)| entries.len()).sum::<usize>(),
        path.display()
    );
    Ok(config)
}
