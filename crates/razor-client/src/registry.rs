//! Operation registry: maps synthesized operation names to bindings.

use std::collections::HashMap;
use std::fmt;

/// The three shapes of operation a manifest can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    List,
    Get,
    Command,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::List => "list",
            OperationKind::Get => "get",
            OperationKind::Command => "command",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bound operation and the URL it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `GET base_url[/seg/...]`.
    List { base_url: String },
    /// `GET base_url/{item}`.
    Get { base_url: String },
    /// `POST base_url` with the transformed arguments.
    Command { base_url: String },
}

impl Binding {
    pub fn kind(&self) -> OperationKind {
        match self {
            Binding::List { .. } => OperationKind::List,
            Binding::Get { .. } => OperationKind::Get,
            Binding::Command { .. } => OperationKind::Command,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            Binding::List { base_url }
            | Binding::Get { base_url }
            | Binding::Command { base_url } => base_url,
        }
    }
}

/// Registry of bound operations, owned by one client.
///
/// Bindings are only ever added; the registry has no removal API.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    bindings: HashMap<String, Binding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the binding it replaced, if any.
    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> Option<Binding> {
        self.bindings.insert(name.into(), binding)
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bound operation names (sorted).
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(url: &str) -> Binding {
        Binding::List {
            base_url: url.into(),
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut reg = Registry::new();
        assert!(reg.insert("nodes", list("U")).is_none());
        assert_eq!(reg.get("nodes"), Some(&list("U")));
        assert!(reg.get("repos").is_none());
        assert!(reg.contains("nodes"));
    }

    #[test]
    fn insert_returns_replaced_binding() {
        let mut reg = Registry::new();
        reg.insert("nodes", list("U1"));
        let old = reg.insert("nodes", list("U2"));
        assert_eq!(old, Some(list("U1")));
        assert_eq!(reg.get("nodes").unwrap().base_url(), "U2");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn names_sorted() {
        let mut reg = Registry::new();
        reg.insert("repos", list("R"));
        reg.insert(
            "create_repo",
            Binding::Command {
                base_url: "C".into(),
            },
        );
        assert_eq!(reg.names(), vec!["create_repo", "repos"]);
    }

    #[test]
    fn binding_kind_and_display() {
        let b = Binding::Get {
            base_url: "U".into(),
        };
        assert_eq!(b.kind(), OperationKind::Get);
        assert_eq!(b.kind().to_string(), "get");
        assert_eq!(b.base_url(), "U");
    }
}
