//! Built-in community data model.
//!
//! Users with linked GitHub and Discord accounts, subscriptions and tags.
//! Server, Post, React and Notification belong to another schema module and
//! appear here only as external edge targets.
//!
//! `User.role` and `Subscription.plan` are declared without members. They are
//! completed from configuration with [`SchemaRegistry::apply_enum_values`];
//! until then validation reports them as `unresolved_enum`.

use entwine_core::entity::EntityBuilder;
use entwine_core::{EntityDescriptor, edge, field};

use crate::error::SchemaError;
use crate::registry::SchemaRegistry;

/// Entities owned by other schema modules.
pub const EXTERNAL_ENTITIES: [&str; 4] = ["Server", "Post", "React", "Notification"];

/// Build the community registry.
///
/// # Errors
///
/// Returns a `SchemaError` only if the declarations below are inconsistent.
pub fn community_schema() -> Result<SchemaRegistry, SchemaError> {
    EXTERNAL_ENTITIES
        .into_iter()
        .fold(
            SchemaRegistry::builder()
                .entity(user())
                .entity(linked_account("GitHub", "github"))
                .entity(linked_account("Discord", "discord"))
                .entity(subscription())
                .entity(tag()),
            |builder, name| builder.external(name),
        )
        .build()
}

fn user() -> EntityBuilder {
    EntityDescriptor::builder("User")
        .comment("Root identity of a community member.")
        .field(field::string("id").unique())
        .field(field::string("email"))
        .field(field::enumeration("role"))
        .field(field::string("name"))
        .field(field::string("bio").optional())
        .field(field::boolean("admin").default(false))
        .field(field::time("createdAt"))
        .field(field::time("updatedAt"))
        .field(field::time("deletedAt").optional())
        .edge(edge::to("github", "GitHub").unique())
        .edge(edge::to("discord", "Discord").unique())
        .edge(edge::to("servers", "Server"))
        .edge(edge::to("posts", "Post"))
        .edge(edge::to("reacts", "React"))
        .edge(edge::to("subscriptions", "Subscription"))
}

/// Third-party account linked to a user. `accountId` is the provider's id.
fn linked_account(name: &str, owner_edge: &str) -> EntityBuilder {
    EntityDescriptor::builder(name)
        .comment(format!("{name} account linked to a user."))
        .field(field::string("userId"))
        .field(
            field::string("accountId")
                .unique()
                .comment("Account id issued by the provider."),
        )
        .field(field::string("username"))
        .field(field::string("email"))
        .edge(
            edge::from("user", "User")
                .reference(owner_edge)
                .unique()
                .required()
                .field("userId"),
        )
}

fn subscription() -> EntityBuilder {
    EntityDescriptor::builder("Subscription")
        .field(field::string("id").unique())
        .field(field::enumeration("plan"))
        .field(field::string("refersTo"))
        .field(field::time("createdAt"))
        .field(field::time("updatedAt"))
        .field(field::time("deletedAt").optional())
        .field(field::string("userId"))
        .edge(
            edge::from("user", "User")
                .reference("subscriptions")
                .unique()
                .required()
                .field("userId"),
        )
        .edge(edge::to("notifications", "Notification"))
}

fn tag() -> EntityBuilder {
    EntityDescriptor::builder("Tag")
        .field(field::string("id").unique())
        .field(field::string("name"))
        .edge(edge::to("posts", "Post"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn declares_model_and_externals() {
        let reg = community_schema().unwrap();
        let declared: Vec<&str> = reg.declared().map(|e| e.name.as_str()).collect();
        assert_eq!(declared, ["User", "GitHub", "Discord", "Subscription", "Tag"]);
        for name in EXTERNAL_ENTITIES {
            assert!(reg.get(name).is_some_and(|e| e.external), "{name}");
        }
    }

    #[test]
    fn user_field_order() {
        let reg = community_schema().unwrap();
        let names: Vec<&str> = reg
            .get("User")
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "id",
                "email",
                "role",
                "name",
                "bio",
                "admin",
                "createdAt",
                "updatedAt",
                "deletedAt"
            ]
        );
    }

    #[test]
    fn linked_accounts_reference_user() {
        let reg = community_schema().unwrap();
        for (entity, owner_edge) in [("GitHub", "github"), ("Discord", "discord")] {
            let owner = reg.inverse_of(entity, "user").unwrap().unwrap();
            assert_eq!(owner.name, owner_edge);
        }
    }
}
