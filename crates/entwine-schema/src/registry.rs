//! Central schema registry.
//!
//! A `SchemaRegistry` is an immutable set of entity descriptors built once and
//! passed by reference. Construction enforces the declaration contracts:
//! unique entity names, per-entity field and edge checks, and edge targets
//! that resolve inside the same registry. Softer well-formedness rules are
//! reported by [`SchemaRegistry::validate`](crate::validation).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use entwine_core::entity::EntityBuilder;
use entwine_core::{CoreError, EntityDescriptor, FieldType};

use crate::bundle::{BUNDLE_VERSION, BundleFormat, SchemaBundle};
use crate::error::SchemaError;

/// Immutable, ordered set of entity descriptors.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    entities: Vec<EntityDescriptor>,
    index: HashMap<String, usize>,
}

impl PartialEq for SchemaRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.entities == other.entities
    }
}

/// Collects entity declarations for [`SchemaRegistry::builder`].
#[derive(Debug, Default)]
#[must_use]
pub struct RegistryBuilder {
    pending: Vec<Result<EntityDescriptor, CoreError>>,
}

impl RegistryBuilder {
    /// Declare an entity from its builder.
    pub fn entity(mut self, builder: EntityBuilder) -> Self {
        self.pending.push(builder.build());
        self
    }

    /// Add an already-built descriptor (e.g. decoded from a bundle).
    pub fn descriptor(mut self, descriptor: EntityDescriptor) -> Self {
        self.pending.push(Ok(descriptor));
        self
    }

    /// Declare a name-only entity owned by another schema module.
    pub fn external(mut self, name: &str) -> Self {
        self.pending.push(EntityDescriptor::external(name));
        self
    }

    /// Run the construction checks and freeze the registry.
    ///
    /// # Errors
    ///
    /// - `SchemaError::Core` if an entity fails its declaration checks
    ///   (empty or invalid names, duplicate fields or edges)
    /// - `SchemaError::DuplicateEntity` if two entities share a name
    /// - `SchemaError::DanglingEdge` if an edge targets an undeclared entity
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut entities = Vec::with_capacity(self.pending.len());
        let mut index = HashMap::with_capacity(self.pending.len());

        for pending in self.pending {
            let entity = pending?;
            entity.check()?;
            if index.contains_key(&entity.name) {
                return Err(SchemaError::DuplicateEntity(entity.name));
            }
            index.insert(entity.name.clone(), entities.len());
            entities.push(entity);
        }

        for entity in &entities {
            for edge in &entity.edges {
                if !index.contains_key(&edge.target) {
                    return Err(SchemaError::DanglingEdge {
                        entity: entity.name.clone(),
                        edge: edge.name.clone(),
                        target: edge.target.clone(),
                    });
                }
            }
        }

        tracing::debug!(entities = entities.len(), "schema registry built");
        Ok(SchemaRegistry { entities, index })
    }
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Get an entity by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EntityDescriptor> {
        self.index.get(name).map(|&idx| &self.entities[idx])
    }

    /// Get an entity by name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the name is unknown.
    pub fn entity(&self, name: &str) -> Result<&EntityDescriptor, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))
    }

    /// All entities in declaration order, externals included.
    #[must_use]
    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    /// Entities declared by this registry (externals excluded).
    pub fn declared(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.iter().filter(|e| !e.external)
    }

    /// Entity names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Supply the members of an enum field declared without them.
    ///
    /// Entity and field names are matched ignoring ASCII case, so keys that
    /// arrive lowercased from environment variables still resolve.
    ///
    /// # Errors
    ///
    /// - `SchemaError::NotFound` if the entity is unknown
    /// - `SchemaError::UnknownField` if the entity has no such field
    /// - `SchemaError::NotAnEnum` if the field is not an enum
    pub fn resolve_enum(
        &mut self,
        entity: &str,
        field: &str,
        members: &[String],
    ) -> Result<(), SchemaError> {
        let descriptor = self
            .entities
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(entity))
            .ok_or_else(|| SchemaError::NotFound(entity.to_string()))?;
        let entity_name = descriptor.name.clone();

        let target = descriptor
            .fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(field))
            .ok_or_else(|| SchemaError::UnknownField {
                entity: entity_name.clone(),
                field: field.to_string(),
            })?;

        match &mut target.field_type {
            FieldType::Enum { values } => {
                *values = members.to_vec();
                tracing::debug!(
                    entity = %entity_name,
                    field = %target.name,
                    members = members.len(),
                    "resolved enum members"
                );
                Ok(())
            }
            _ => Err(SchemaError::NotAnEnum {
                entity: entity_name,
                field: target.name.clone(),
            }),
        }
    }

    /// Apply a batch of `(entity, field, members)` enum resolutions.
    ///
    /// # Errors
    ///
    /// Stops at the first failing entry; see [`Self::resolve_enum`].
    pub fn apply_enum_values<'a, I>(&mut self, entries: I) -> Result<usize, SchemaError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a [String])>,
    {
        let mut applied = 0usize;
        for (entity, field, members) in entries {
            self.resolve_enum(entity, field, members)?;
            applied += 1;
        }
        Ok(applied)
    }

    // --- Compiler form ---

    /// Snapshot the registry as a compiler-form bundle.
    #[must_use]
    pub fn to_bundle(&self) -> SchemaBundle {
        SchemaBundle {
            version: BUNDLE_VERSION,
            entities: self.entities.clone(),
        }
    }

    /// Rebuild a registry from a bundle, re-running every construction check.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Decode` for an unsupported bundle version, plus
    /// the errors of [`RegistryBuilder::build`].
    pub fn from_bundle(bundle: SchemaBundle) -> Result<Self, SchemaError> {
        if bundle.version > BUNDLE_VERSION {
            return Err(SchemaError::Decode(format!(
                "bundle version {} is newer than supported version {BUNDLE_VERSION}",
                bundle.version
            )));
        }
        bundle
            .entities
            .into_iter()
            .fold(Self::builder(), RegistryBuilder::descriptor)
            .build()
    }

    /// Encode the compiler form.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Encode` if serialization fails.
    pub fn encode(&self, format: BundleFormat) -> Result<String, SchemaError> {
        self.to_bundle().encode(format)
    }

    /// Decode the compiler form and rebuild the registry.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Decode` for malformed text, plus the errors of
    /// [`Self::from_bundle`].
    pub fn decode(text: &str, format: BundleFormat) -> Result<Self, SchemaError> {
        Self::from_bundle(SchemaBundle::decode(text, format)?)
    }

    /// # Errors
    ///
    /// Returns `SchemaError::Encode` if serialization fails.
    pub fn to_json(&self) -> Result<String, SchemaError> {
        self.encode(BundleFormat::Json)
    }

    /// # Errors
    ///
    /// See [`Self::decode`].
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Self::decode(text, BundleFormat::Json)
    }

    /// # Errors
    ///
    /// Returns `SchemaError::Encode` if serialization fails.
    pub fn to_toml(&self) -> Result<String, SchemaError> {
        self.encode(BundleFormat::Toml)
    }

    /// # Errors
    ///
    /// See [`Self::decode`].
    pub fn from_toml(text: &str) -> Result<Self, SchemaError> {
        Self::decode(text, BundleFormat::Toml)
    }

    /// Load a compiler-form file, choosing the encoding by extension.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnsupportedFormat`, `SchemaError::Io`, or any
    /// decode error.
    pub fn load_file(path: &Path) -> Result<Self, SchemaError> {
        let format = BundleFormat::from_path(path)?;
        let text = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), ?format, "loading schema bundle");
        Self::decode(&text, format)
    }

    /// Write the compiler form to `path`, choosing the encoding by extension.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnsupportedFormat`, `SchemaError::Encode`, or
    /// `SchemaError::Io`.
    pub fn save_file(&self, path: &Path) -> Result<(), SchemaError> {
        let format = BundleFormat::from_path(path)?;
        let text = self.encode(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        tracing::info!(path = %path.display(), "wrote schema bundle");
        Ok(())
    }
}
