//! Derives operation names from manifest entries and installs
//! the corresponding bindings.

use rz_domain::config::CollisionPolicy;
use rz_domain::error::{Error, Result};
use rz_domain::trace::TraceEvent;

use crate::manifest::{CollectionDescriptor, CommandDescriptor};
use crate::registry::{Binding, Registry};

/// Plural suffix → singular replacement, first match wins. Names matching
/// none of these are used unchanged.
const SINGULAR_SUFFIXES: &[(&str, &str)] = &[("ies", "y"), ("s", "")];

/// Derive the item-get name for a collection: `policies` → `policy`,
/// `nodes` → `node`, `config` → `config`.
///
/// Purely syntactic; no locale or dictionary lookup.
pub fn singularize(name: &str) -> String {
    for (plural, singular) in SINGULAR_SUFFIXES {
        if let Some(stem) = name.strip_suffix(plural) {
            return format!("{stem}{singular}");
        }
    }
    name.to_owned()
}

/// Command names may carry hyphens (`unbind-node`); operation names use
/// underscores instead.
pub fn sanitize_command_name(name: &str) -> String {
    name.replace('-', "_")
}

/// Installs bindings into a [`Registry`] under a [`CollisionPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Binder {
    policy: CollisionPolicy,
}

impl Binder {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    /// Bind the list operation (under the collection name) and the get
    /// operation (under its singular).
    ///
    /// Under [`CollisionPolicy::Reject`] both names are checked before
    /// either is installed.
    pub fn bind_collection(
        &self,
        registry: &mut Registry,
        collection: &CollectionDescriptor,
    ) -> Result<()> {
        let list = (
            collection.name.clone(),
            Binding::List {
                base_url: collection.id.clone(),
            },
        );
        let get = (
            singularize(&collection.name),
            Binding::Get {
                base_url: collection.id.clone(),
            },
        );

        // A name like "data" singularizes to itself; the get binding then
        // replaces the list binding it was derived from.
        self.check(registry, &list.0, &list.1)?;
        if get.0 != list.0 {
            self.check(registry, &get.0, &get.1)?;
        }

        self.install(registry, list.0, list.1);
        self.install(registry, get.0, get.1);
        Ok(())
    }

    /// Bind a command under its sanitized name. Returns that name.
    pub fn bind_command(
        &self,
        registry: &mut Registry,
        command: &CommandDescriptor,
    ) -> Result<String> {
        let name = sanitize_command_name(&command.name);
        let binding = Binding::Command {
            base_url: command.id.clone(),
        };
        self.check(registry, &name, &binding)?;
        self.install(registry, name.clone(), binding);
        Ok(name)
    }

    fn check(&self, registry: &Registry, name: &str, binding: &Binding) -> Result<()> {
        match registry.get(name) {
            Some(existing) if existing != binding && self.policy == CollisionPolicy::Reject => {
                Err(Error::NameCollision(name.to_owned()))
            }
            _ => Ok(()),
        }
    }

    fn install(&self, registry: &mut Registry, name: String, binding: Binding) {
        let kind = binding.kind();
        let url = binding.base_url().to_owned();
        let previous = registry.insert(name.clone(), binding);

        if let Some(previous) = &previous {
            if previous.kind() != kind || previous.base_url() != url {
                tracing::warn!(
                    operation = %name,
                    old_kind = %previous.kind(),
                    old_url = %previous.base_url(),
                    new_kind = %kind,
                    new_url = %url,
                    "operation name collision, replacing earlier binding"
                );
            }
        }

        TraceEvent::OperationBound {
            name,
            kind: kind.as_str().to_owned(),
            url,
            replaced: previous.is_some(),
        }
        .emit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OperationKind;

    fn collection(name: &str) -> CollectionDescriptor {
        CollectionDescriptor {
            name: name.into(),
            id: format!("http://h:9090/api/collections/{name}"),
        }
    }

    fn command(name: &str) -> CommandDescriptor {
        CommandDescriptor {
            name: name.into(),
            id: format!("http://h:9090/api/commands/{name}"),
        }
    }

    #[test]
    fn singular_strips_trailing_s() {
        assert_eq!(singularize("nodes"), "node");
        assert_eq!(singularize("repos"), "repo");
        assert_eq!(singularize("brokers"), "broker");
    }

    #[test]
    fn singular_of_ies_is_y() {
        assert_eq!(singularize("policies"), "policy");
        assert_eq!(singularize("ies"), "y");
    }

    #[test]
    fn singular_of_singular_is_unchanged() {
        assert_eq!(singularize("config"), "config");
        assert_eq!(singularize(""), "");
    }

    #[test]
    fn singular_is_syntactic_only() {
        assert_eq!(singularize("status"), "statu");
    }

    #[test]
    fn sanitizes_dashes() {
        assert_eq!(
            sanitize_command_name("something-with-dashes"),
            "something_with_dashes"
        );
        assert_eq!(sanitize_command_name("already_ok"), "already_ok");
    }

    #[test]
    fn binds_list_and_get_for_nodes() {
        let mut reg = Registry::new();
        Binder::default()
            .bind_collection(&mut reg, &collection("nodes"))
            .unwrap();
        assert_eq!(reg.get("nodes").unwrap().kind(), OperationKind::List);
        assert_eq!(reg.get("node").unwrap().kind(), OperationKind::Get);
        assert_eq!(
            reg.get("node").unwrap().base_url(),
            "http://h:9090/api/collections/nodes"
        );
    }

    #[test]
    fn binds_policy_for_policies() {
        let mut reg = Registry::new();
        Binder::default()
            .bind_collection(&mut reg, &collection("policies"))
            .unwrap();
        assert_eq!(reg.get("policies").unwrap().kind(), OperationKind::List);
        assert_eq!(reg.get("policy").unwrap().kind(), OperationKind::Get);
    }

    #[test]
    fn binds_command_under_sanitized_name() {
        let mut reg = Registry::new();
        let name = Binder::default()
            .bind_command(&mut reg, &command("unbind-node"))
            .unwrap();
        assert_eq!(name, "unbind_node");
        let b = reg.get("unbind_node").unwrap();
        assert_eq!(b.kind(), OperationKind::Command);
        assert_eq!(b.base_url(), "http://h:9090/api/commands/unbind-node");
        assert!(reg.get("unbind-node").is_none());
    }

    #[test]
    fn replace_policy_overwrites_later_wins() {
        let mut reg = Registry::new();
        let binder = Binder::new(CollisionPolicy::Replace);
        binder
            .bind_command(
                &mut reg,
                &CommandDescriptor {
                    name: "reboot-node".into(),
                    id: "U1".into(),
                },
            )
            .unwrap();
        binder
            .bind_command(
                &mut reg,
                &CommandDescriptor {
                    name: "reboot_node".into(),
                    id: "U2".into(),
                },
            )
            .unwrap();
        assert_eq!(reg.get("reboot_node").unwrap().base_url(), "U2");
    }

    #[test]
    fn reject_policy_fails_on_different_binding() {
        let mut reg = Registry::new();
        let binder = Binder::new(CollisionPolicy::Reject);
        binder.bind_collection(&mut reg, &collection("nodes")).unwrap();

        // A command that sanitizes onto an existing collection name.
        let err = binder
            .bind_command(
                &mut reg,
                &CommandDescriptor {
                    name: "node".into(),
                    id: "http://h:9090/api/commands/node".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::NameCollision(ref n) if n == "node"));
        assert_eq!(reg.get("node").unwrap().kind(), OperationKind::Get);
    }

    #[test]
    fn reject_policy_checks_both_names_before_installing() {
        let mut reg = Registry::new();
        let binder = Binder::new(CollisionPolicy::Reject);
        binder.bind_command(&mut reg, &command("repo")).unwrap();

        let err = binder.bind_collection(&mut reg, &collection("repos"));
        assert!(err.is_err());
        assert!(!reg.contains("repos"), "list must not be half-installed");
    }

    #[test]
    fn reject_policy_accepts_identical_rebind() {
        let mut reg = Registry::new();
        let binder = Binder::new(CollisionPolicy::Reject);
        binder.bind_collection(&mut reg, &collection("nodes")).unwrap();
        binder.bind_collection(&mut reg, &collection("nodes")).unwrap();
        assert_eq!(reg.len(), 2);
    }
}
