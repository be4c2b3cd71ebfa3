use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info, warn};
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::{Result, TriggerError};
use crate::identity::ProjectId;

/// One project as listed by `GET /api/v4/projects`. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct ProjectRecord {
    id: ProjectId,
    #[serde(default)]
    ssh_url_to_repo: Option<String>,
    #[serde(default)]
    http_url_to_repo: Option<String>,
    #[serde(default)]
    path_with_namespace: Option<String>,
}

/// Repository URL to GitLab project id table, loaded once per invocation.
///
/// Lookups are exact string matches: `git@host:g/p.git` and
/// `https://host/g/p.git` are different keys unless both are listed.
#[derive(Debug, Default, Clone)]
pub struct ProjectDirectory {
    projects: HashMap<String, ProjectId>,
}

impl ProjectDirectory {
    /// Loads the directory from a JSON file.
    ///
    /// Two layouts are accepted: an array of GitLab project objects (each
    /// `ssh_url_to_repo` and `http_url_to_repo` becomes an entry), or a flat
    /// `{"<url>": <id>}` object. When a URL appears more than once the last
    /// entry wins.
    ///
    /// # Errors
    ///
    /// - [`TriggerError::DirectoryNotFound`] if the file does not exist
    /// - [`TriggerError::DirectoryParse`] if it exists but is not well-formed
    /// - [`TriggerError::Io`] for any other read failure
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TriggerError::DirectoryNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        let directory = Self::parse(&contents).map_err(|source| TriggerError::DirectoryParse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            "Loaded {} project URLs from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    /// Like [`ProjectDirectory::load`], but an absent file yields an empty
    /// directory.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(TriggerError::DirectoryNotFound(path)) => {
                info!(
                    "Project directory {} not found, continuing without it",
                    path.display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    fn parse(contents: &str) -> std::result::Result<Self, serde_json::Error> {
        let mut directory = Self::default();

        match serde_json::from_str::<DirectoryFile>(contents)? {
            DirectoryFile::Projects(records) => {
                for record in records {
                    let urls = [record.ssh_url_to_repo, record.http_url_to_repo];
                    if urls.iter().all(Option::is_none) {
                        warn!(
                            "Project {} ({}) has no repository URL, skipping",
                            record.id,
                            record.path_with_namespace.as_deref().unwrap_or("unnamed")
                        );
                        continue;
                    }
                    for url in urls.into_iter().flatten() {
                        directory.insert(url, record.id);
                    }
                }
            }
            DirectoryFile::Urls(entries) => {
                for (url, id) in entries {
                    directory.insert(url, id);
                }
            }
        }

        Ok(directory)
    }

    fn insert(&mut self, url: String, id: ProjectId) {
        if let Some(previous) = self.projects.insert(url.clone(), id) {
            if previous != id {
                warn!("Duplicate project URL {url}: id {previous} replaced by {id}");
            }
        }
    }

    /// Returns the project id registered for `url`, if any.
    pub fn lookup(&self, url: &str) -> Option<ProjectId> {
        let found = self.projects.get(url).copied();
        debug!("Directory lookup for {url}: {found:?}");
        found
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Raw file contents in either layout, entries kept in file order.
///
/// The map layout is read entry by entry so repeated keys are all seen.
enum DirectoryFile {
    Projects(Vec<ProjectRecord>),
    Urls(Vec<(String, ProjectId)>),
}

impl<'de> Deserialize<'de> for DirectoryFile {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DirectoryFileVisitor)
    }
}

struct DirectoryFileVisitor;

impl<'de> Visitor<'de> for DirectoryFileVisitor {
    type Value = DirectoryFile;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of projects or an object of URL to id")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(record) = seq.next_element::<ProjectRecord>()? {
            records.push(record);
        }
        Ok(DirectoryFile::Projects(records))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, ProjectId>()? {
            entries.push(entry);
        }
        Ok(DirectoryFile::Urls(entries))
    }
}
