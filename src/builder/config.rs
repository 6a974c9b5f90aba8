//! Configure-step arguments.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::util::process::split_args;

/// A `-D` argument that is not a `<KEY>[:<TYPE>]=<VALUE>` cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed cache entry `{argument}`: expected `-D<KEY>[:<TYPE>]=<VALUE>`")]
pub struct InvalidDefinition {
    pub argument: String,
}

/// A single `-D<KEY>[:<TYPE>]=<VALUE>` cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    pub value: String,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        CacheEntry {
            key: key.into(),
            ty: None,
            value: value.into(),
        }
    }

    /// Parse the part after `-D`, e.g. `PYTHON_EXECUTABLE:FILEPATH=/usr/bin/python3`.
    pub fn parse(definition: &str) -> Option<Self> {
        let (name, value) = definition.split_once('=')?;
        let (key, ty) = match name.split_once(':') {
            Some((key, ty)) => (key, Some(ty.to_string())),
            None => (name, None),
        };

        if key.is_empty() {
            return None;
        }

        Some(CacheEntry {
            key: key.to_string(),
            ty,
            value: value.to_string(),
        })
    }

    /// Render as a single command-line argument.
    pub fn to_arg(&self) -> String {
        match self.ty {
            Some(ref ty) => format!("-D{}:{}={}", self.key, ty, self.value),
            None => format!("-D{}={}", self.key, self.value),
        }
    }
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg())
    }
}

/// The full set of arguments handed to the configure step.
///
/// Entries keep their insertion order and keys are unique: setting a key
/// that is already present replaces its value in place. Arguments that are
/// not cache entries (`-G Ninja`, `--fresh`, ...) are kept verbatim, ahead
/// of the entries.
///
/// Mutation is crate-private; once a [`BuildPlan`](super::plan::BuildPlan)
/// is assembled its configuration is read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra_args: Vec<String>,
    entries: Vec<CacheEntry>,
}

impl BuildConfiguration {
    /// Parse a base configuration string such as `-DCMAKE_BUILD_TYPE=Release`.
    ///
    /// Every `-D` must carry a value; `-DPYTHON_EXECUTABLE` alone is
    /// rejected rather than passed through unrecognised.
    pub fn parse(base: &str) -> Result<Self, InvalidDefinition> {
        let mut config = BuildConfiguration::default();
        let mut words = split_args(base).into_iter();

        while let Some(word) = words.next() {
            let (argument, definition) = if word == "-D" {
                let definition = words.next().unwrap_or_default();
                (format!("-D {}", definition).trim_end().to_string(), definition)
            } else if let Some(definition) = word.strip_prefix("-D") {
                (word.clone(), definition.to_string())
            } else {
                config.extra_args.push(word);
                continue;
            };

            let entry = CacheEntry::parse(&definition).ok_or(InvalidDefinition { argument })?;
            config.set(entry);
        }

        Ok(config)
    }

    /// Insert an entry, replacing any entry with the same key.
    pub(crate) fn set(&mut self, entry: CacheEntry) {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Look up the value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    /// Render every argument, in order.
    pub fn to_args(&self) -> Vec<String> {
        self.extra_args
            .iter()
            .cloned()
            .chain(self.entries.iter().map(CacheEntry::to_arg))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_parse() {
        let entry = CacheEntry::parse("CMAKE_BUILD_TYPE=Release").unwrap();
        assert_eq!(entry, CacheEntry::new("CMAKE_BUILD_TYPE", "Release"));

        let typed = CacheEntry::parse("PYTHON_EXECUTABLE:FILEPATH=/usr/bin/python3").unwrap();
        assert_eq!(typed.key, "PYTHON_EXECUTABLE");
        assert_eq!(typed.ty.as_deref(), Some("FILEPATH"));
        assert_eq!(typed.to_arg(), "-DPYTHON_EXECUTABLE:FILEPATH=/usr/bin/python3");

        assert!(CacheEntry::parse("NO_VALUE").is_none());
        assert!(CacheEntry::parse("=x").is_none());
    }

    #[test]
    fn test_parse_base_configuration() {
        let config =
            BuildConfiguration::parse("-DCMAKE_BUILD_TYPE=Release -G Ninja -D FOO=bar").unwrap();

        assert_eq!(config.get("CMAKE_BUILD_TYPE"), Some("Release"));
        assert_eq!(config.get("FOO"), Some("bar"));
        assert_eq!(config.extra_args(), ["-G", "Ninja"]);
        assert_eq!(
            config.to_args(),
            vec!["-G", "Ninja", "-DCMAKE_BUILD_TYPE=Release", "-DFOO=bar"]
        );
    }

    #[test]
    fn test_later_keys_overwrite() {
        let mut config = BuildConfiguration::parse("-DA=1 -DB=2 -DA=3").unwrap();
        assert_eq!(config.entries().len(), 2);
        assert_eq!(config.get("A"), Some("3"));

        config.set(CacheEntry::new("B", "4"));
        assert_eq!(config.to_args(), vec!["-DA=3", "-DB=4"]);
    }

    #[test]
    fn test_key_lookup_is_exact() {
        let config = BuildConfiguration::parse("-DMY_PYTHON_EXECUTABLE_HINT=1").unwrap();
        assert!(!config.contains_key("PYTHON_EXECUTABLE"));
        assert!(config.contains_key("MY_PYTHON_EXECUTABLE_HINT"));
    }

    #[test]
    fn test_quoted_values() {
        let config =
            BuildConfiguration::parse(r#"-DCMAKE_CUDA_ARCHITECTURES="80;86""#).unwrap();
        assert_eq!(config.get("CMAKE_CUDA_ARCHITECTURES"), Some("80;86"));
    }

    #[test]
    fn test_definition_without_value_is_rejected() {
        for (base, argument) in [
            ("-DCMAKE_BUILD_TYPE=Release -DPYTHON_EXECUTABLE", "-DPYTHON_EXECUTABLE"),
            ("-D PYTHON_EXECUTABLE", "-D PYTHON_EXECUTABLE"),
            ("-G Ninja -D", "-D"),
            ("-D=oops", "-D=oops"),
        ] {
            assert_eq!(
                BuildConfiguration::parse(base).unwrap_err(),
                InvalidDefinition {
                    argument: argument.to_string()
                },
                "{base:?}"
            );
        }
    }
}
