/*!
 * Role catalog: the distinct characters of a script.
 */

use std::fmt;

use serde::Serialize;

use crate::script::Script;

/// A character name the user can rehearse as
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this role speaks the given character's lines
    pub fn owns(&self, character: &str) -> bool {
        self.0 == character
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A role together with how much it speaks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleEntry {
    pub role: Role,

    /// Number of lines spoken by this role
    pub line_count: usize,

    /// Index of the role's first line
    pub first_line: usize,
}

/// Distinct roles of a script in order of first appearance
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleCatalog {
    entries: Vec<RoleEntry>,
}

impl RoleCatalog {
    pub fn from_script(script: &Script) -> Self {
        let mut entries: Vec<RoleEntry> = Vec::new();

        for line in script {
            match entries.iter_mut().find(|e| e.role.owns(&line.character)) {
                Some(entry) => entry.line_count += 1,
                None => entries.push(RoleEntry {
                    role: Role::new(line.character.as_str()),
                    line_count: 1,
                    first_line: line.index,
                }),
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[RoleEntry] {
        &self.entries
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.entries.iter().map(|e| &e.role)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.role.owns(name))
    }

    /// Number of lines for a role, 0 when the role is absent
    pub fn line_count(&self, name: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.role.owns(name))
            .map_or(0, |e| e.line_count)
    }
}
