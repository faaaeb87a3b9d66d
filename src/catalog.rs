//! Message catalog — TOML files mapping dotted keys to templates.
//!
//! ```toml
//! [placeholders]
//! server = "Blueflow"
//!
//! [greeting]
//! hello = "@{gold}Welcome to ${server}, ${player}!"
//! motd = ["line one", "#{link:https://example.com}line two{/#}"]
//! ```
//!
//! The `[placeholders]` table is the default context for every message.

use crate::{
    error::{self, Error},
    message::Segment,
    translate::{Flags, Translator, Vars},
};
use anyhow::{Context, Result, bail};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;
use walkdir::WalkDir;

const PLACEHOLDERS_TABLE: &str = "placeholders";

/// A raw catalog value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Text(String),
    List(Vec<String>),
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<String, Entry>,
    translator: Translator,
}

// Loading
impl Catalog {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(src).context("parse message catalog")?;
        let toml::Value::Table(root) = value else {
            bail!("message catalog must be a table");
        };

        let mut entries = BTreeMap::new();
        let mut placeholders = Vars::new();
        for (key, value) in &root {
            if key == PLACEHOLDERS_TABLE {
                flatten_vars("", value, &mut placeholders);
            } else {
                flatten(key, value, &mut entries);
            }
        }

        Ok(Self {
            entries,
            translator: Translator::with_defaults(placeholders),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        debug!(path = %path.display(), "loading catalog file");
        Self::from_toml_str(&src).with_context(|| format!("load {}", path.display()))
    }

    /// Load every `*.toml` under `dir`, in path order. Later files override
    /// earlier keys.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!("catalog directory not found: {}", dir.display());
        }

        let mut files: Vec<PathBuf> = catalogs_in(dir).collect();
        files.sort();

        let mut catalog = Catalog::default();
        for file in &files {
            catalog.merge(Self::load(file)?);
        }
        Ok(catalog)
    }

    /// A directory via [`Catalog::load_dir`], anything else via [`Catalog::load`].
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::load_dir(path)
        } else {
            Self::load(path)
        }
    }

    /// Fold `other` into `self`; its keys and placeholders win.
    pub fn merge(&mut self, other: Catalog) {
        let mut placeholders = self.translator.defaults().clone();
        placeholders.extend(other.translator.defaults().clone());
        self.translator = Translator::with_defaults(placeholders);
        self.entries.extend(other.entries);
    }
}

// Access
impl Catalog {
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// The raw template stored under `key`, if it is a single string.
    pub fn raw(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            Entry::Text(text) => Some(text.as_str()),
            Entry::List(_) => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn placeholders(&self) -> &Vars {
        self.translator.defaults()
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Parse the message under `key`, or `None` if there is none.
    pub fn message(&self, key: &str, vars: &Vars) -> Option<error::Result<Vec<Segment>>> {
        self.raw(key).map(|template| self.translator.parse_with(template, vars))
    }

    /// Parse the message under `key`, falling back to `fallback` as the template.
    pub fn message_or(&self, key: &str, vars: &Vars, fallback: &str) -> error::Result<Vec<Segment>> {
        self.translator.parse_with(self.raw(key).unwrap_or(fallback), vars)
    }

    /// Parse each entry of a list. A single string counts as a one-line list.
    pub fn message_list(&self, key: &str, vars: &Vars) -> Option<error::Result<Vec<Vec<Segment>>>> {
        let parse = |template: &String| self.translator.parse_with(template, vars);
        Some(match self.entries.get(key)? {
            Entry::Text(text) => parse(text).map(|segments| vec![segments]),
            Entry::List(lines) => lines.iter().map(parse).collect(),
        })
    }

    /// Parse the direct string children of the table at `key`.
    pub fn message_map(
        &self,
        key: &str,
        vars: &Vars,
    ) -> Option<error::Result<BTreeMap<String, Vec<Segment>>>> {
        let prefix = format!("{key}.");
        let children: Vec<(&str, &str)> = self
            .entries
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter_map(|(k, entry)| {
                let name = &k[prefix.len()..];
                match entry {
                    Entry::Text(text) if !name.contains('.') => Some((name, text.as_str())),
                    _ => None,
                }
            })
            .collect();

        if children.is_empty() {
            return None;
        }

        Some(
            children
                .into_iter()
                .map(|(name, template)| {
                    self.translator
                        .parse_with(template, vars)
                        .map(|segments| (name.to_owned(), segments))
                })
                .collect(),
        )
    }

    /// Check every template's tag structure. Placeholders are not
    /// substituted, so messages needing call-time values still pass.
    pub fn check(&self) -> Vec<(String, Error)> {
        let mut failures = Vec::new();
        for (key, entry) in &self.entries {
            match entry {
                Entry::Text(text) => {
                    if let Err(e) = self.translator.parse_raw(text, Flags::empty()) {
                        failures.push((key.clone(), e));
                    }
                }
                Entry::List(lines) => {
                    for (i, line) in lines.iter().enumerate() {
                        if let Err(e) = self.translator.parse_raw(line, Flags::empty()) {
                            failures.push((format!("{key}[{i}]"), e));
                        }
                    }
                }
            }
        }
        failures
    }
}

/// Flatten a TOML value into dotted-key entries.
fn flatten(prefix: &str, value: &toml::Value, out: &mut BTreeMap<String, Entry>) {
    match value {
        toml::Value::Table(map) => {
            for (k, v) in map {
                flatten(&format!("{prefix}.{k}"), v, out);
            }
        }
        toml::Value::Array(items) => {
            let lines: Vec<String> = items.iter().filter_map(scalar).collect();
            if lines.len() != items.len() {
                debug!(key = prefix, "skipping non-scalar list items");
            }
            out.insert(prefix.to_owned(), Entry::List(lines));
        }
        other => {
            if let Some(text) = scalar(other) {
                out.insert(prefix.to_owned(), Entry::Text(text));
            }
        }
    }
}

/// Flatten the placeholder table. Lists are not placeholder values.
fn flatten_vars(prefix: &str, value: &toml::Value, out: &mut Vars) {
    match value {
        toml::Value::Table(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_vars(&key, v, out);
            }
        }
        other => {
            if let Some(text) = scalar(other) {
                out.insert(prefix.to_owned(), text);
            }
        }
    }
}

fn scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Walk `dir` and yield paths of all `*.toml` files.
fn catalogs_in(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().and_then(|x| x.to_str()) == Some("toml")
        })
        .map(|e| e.into_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ClickAction, color};

    const SAMPLE: &str = r##"
[placeholders]
server = "Blueflow"
max = 20

[greeting]
hello = "@{gold}Welcome to ${server}, ${player}!"
bye = "Bye"
motd = ["line one", "#{link:https://example.com}line two{/#}"]

[greeting.nested]
deep = "not a direct child"

[errors]
broken = "@{red"
"##;

    fn vars(pairs: &[(&str, &str)]) -> Vars {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn flattens_tables_into_dotted_keys() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.raw("greeting.bye"), Some("Bye"));
        assert_eq!(catalog.raw("greeting.nested.deep"), Some("not a direct child"));
        assert!(catalog.raw("server").is_none());
        assert_eq!(catalog.placeholders().get("max").map(String::as_str), Some("20"));
    }

    #[test]
    fn message_uses_catalog_and_call_context() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        let hello = catalog
            .message("greeting.hello", &vars(&[("player", "Ann")]))
            .unwrap()
            .unwrap();
        assert_eq!(
            hello,
            vec![Segment::builder()
                .content("Welcome to Blueflow, Ann!")
                .color(color::GOLD)
                .build()]
        );

        let shadowed = catalog
            .message("greeting.hello", &vars(&[("player", "Ann"), ("server", "Local")]))
            .unwrap()
            .unwrap();
        assert_eq!(shadowed[0].content(), "Welcome to Local, Ann!");
    }

    #[test]
    fn missing_key_and_fallback() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert!(catalog.message("nope", &Vars::new()).is_none());
        assert_eq!(
            catalog.message_or("nope", &Vars::new(), "on ${server}").unwrap(),
            vec![Segment::text("on Blueflow")]
        );
    }

    #[test]
    fn lists_and_maps() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        let motd = catalog.message_list("greeting.motd", &Vars::new()).unwrap().unwrap();
        assert_eq!(motd.len(), 2);
        assert_eq!(
            motd[1][0].click(),
            Some(&ClickAction::OpenUrl("https://example.com".into()))
        );

        let single = catalog.message_list("greeting.bye", &Vars::new()).unwrap().unwrap();
        assert_eq!(single, vec![vec![Segment::text("Bye")]]);

        let map = catalog
            .message_map("greeting", &vars(&[("player", "Bo")]))
            .unwrap()
            .unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["bye", "hello"]);
        assert!(catalog.message_map("absent", &Vars::new()).is_none());
    }

    #[test]
    fn check_reports_broken_templates() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        let failures = catalog.check();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "errors.broken");
        assert!(failures[0].1.as_malformed().is_some());
    }

    #[test]
    fn load_dir_merges_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.toml"),
            "[placeholders]\nwho = \"a\"\n[msg]\nx = \"from a\"\ny = \"only a\"\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(
            dir.path().join("sub/b.toml"),
            "[placeholders]\nwho = \"b\"\n[msg]\nx = \"from b\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        assert_eq!(catalog.raw("msg.x"), Some("from b"));
        assert_eq!(catalog.raw("msg.y"), Some("only a"));
        assert_eq!(catalog.placeholders().get("who").map(String::as_str), Some("b"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn load_reports_path_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "not = [valid").unwrap();
        let err = Catalog::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Catalog::load_dir(&dir.path().join("absent")).is_err());
    }
}
