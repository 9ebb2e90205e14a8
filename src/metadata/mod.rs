//! # Entity Metadata
//!
//! Static descriptor tables that tell the query layer what an entity looks
//! like: its table, its id field, every declared field with its semantic
//! type, and the optional supertype it inherits fields from.
//!
//! Descriptors are plain `static` values, so they are built at compile time
//! and can point at each other (a search-from relation names the related
//! entity's descriptor directly):
//!
//! ```rust,ignore
//! use searchcrate::metadata::{EntityDescriptor, FieldDef, FieldKind, SearchFrom};
//!
//! pub static ROLE: EntityDescriptor = EntityDescriptor {
//!     type_name: "admin::Role",
//!     table: "roles",
//!     id_field: "oid",
//!     fields: &[
//!         FieldDef::new("oid", "oid", FieldKind::String),
//!         FieldDef::new("name", "name", FieldKind::String),
//!     ],
//!     parent: None,
//! };
//!
//! static USER_ROLE: SearchFrom = SearchFrom::new(&ROLE, &["name"], "oid");
//!
//! pub static USER: EntityDescriptor = EntityDescriptor {
//!     type_name: "admin::User",
//!     table: "users",
//!     id_field: "oid",
//!     fields: &[
//!         FieldDef::new("oid", "oid", FieldKind::String),
//!         FieldDef::new("roleOid", "role_oid", FieldKind::String).search_from(&USER_ROLE),
//!     ],
//!     parent: None,
//! };
//! ```

mod cache;

use std::fmt;
use std::sync::Arc;

pub use cache::{cached_entity_count, fields};

/// One member of an enumeration, as persisted (`name`) and as displayed (`text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: &'static str,
    pub text: &'static str,
}

/// An enumeration whose values are stored by variant name.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub variants: &'static [EnumVariant],
}

impl EnumDescriptor {
    /// Exact, case-sensitive lookup by variant name.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&'static EnumVariant> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    /// Variants whose display text contains `query`, ignoring case.
    pub fn variants_matching_text<'a>(
        &self,
        query: &'a str,
    ) -> impl Iterator<Item = &'static EnumVariant> + 'a {
        let needle = query.to_lowercase();
        self.variants
            .iter()
            .filter(move |variant| variant.text.to_lowercase().contains(&needle))
    }
}

/// Declared semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Boolean,
    Integer,
    Long,
    Double,
    Decimal,
    /// Persisted timestamp; filter literals are epoch milliseconds.
    Date,
    Enum(&'static EnumDescriptor),
    /// An enum whose display text takes part in free-text search.
    SearchableEnum(&'static EnumDescriptor),
}

impl FieldKind {
    /// Human-readable type name used in error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Date => "epoch milliseconds",
            Self::Enum(_) | Self::SearchableEnum(_) => "enum constant",
        }
    }
}

/// Marks a field whose visible value lives in another entity.
///
/// The local field holds a foreign key into `entity`, matched against the
/// related `id` field. When `local_id` is set the join uses that local field
/// instead of the marked one, and several related rows may match.
pub struct SearchFrom {
    pub entity: &'static EntityDescriptor,
    pub targets: &'static [&'static str],
    pub id: &'static str,
    pub local_id: Option<&'static str>,
}

impl SearchFrom {
    #[must_use]
    pub const fn new(
        entity: &'static EntityDescriptor,
        targets: &'static [&'static str],
        id: &'static str,
    ) -> Self {
        Self {
            entity,
            targets,
            id,
            local_id: None,
        }
    }

    #[must_use]
    pub const fn local_id(mut self, local_id: &'static str) -> Self {
        self.local_id = Some(local_id);
        self
    }

    /// Output key for one projected target, e.g. `role` + `name` -> `roleName`.
    #[must_use]
    pub fn alias(field_name: &str, target: &str) -> String {
        format!("{field_name}{}", capitalize_first(target))
    }
}

// Manual impl: relations may be cyclic, so only the related type name is printed.
impl fmt::Debug for SearchFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchFrom")
            .field("entity", &self.entity.type_name)
            .field("targets", &self.targets)
            .field("id", &self.id)
            .field("local_id", &self.local_id)
            .finish()
    }
}

/// Special query behaviour attached to a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldMarker {
    None,
    SearchFrom(&'static SearchFrom),
    /// Excluded from free-text and remote matching.
    SearchIgnore,
    /// Not persisted; invisible to every query.
    Transient,
}

/// Metadata for one declared field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Name used by filters, sort tokens and projections.
    pub name: &'static str,
    /// Column in the store.
    pub column: &'static str,
    pub kind: FieldKind,
    pub marker: FieldMarker,
}

impl FieldDef {
    #[must_use]
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            kind,
            marker: FieldMarker::None,
        }
    }

    #[must_use]
    pub const fn search_from(mut self, search_from: &'static SearchFrom) -> Self {
        self.marker = FieldMarker::SearchFrom(search_from);
        self
    }

    #[must_use]
    pub const fn search_ignore(mut self) -> Self {
        self.marker = FieldMarker::SearchIgnore;
        self
    }

    #[must_use]
    pub const fn transient(mut self) -> Self {
        self.marker = FieldMarker::Transient;
        self
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.marker, FieldMarker::Transient)
    }

    #[must_use]
    pub const fn is_search_ignored(&self) -> bool {
        matches!(self.marker, FieldMarker::SearchIgnore)
    }

    /// Whether the field is stored in a column of its own. Transient fields
    /// and search-from fields joined through `local_id` are not.
    #[must_use]
    pub const fn has_column(&self) -> bool {
        match self.marker {
            FieldMarker::Transient => false,
            FieldMarker::SearchFrom(search_from) => search_from.local_id.is_none(),
            FieldMarker::None | FieldMarker::SearchIgnore => true,
        }
    }

    #[must_use]
    pub const fn search_from_relation(&self) -> Option<&'static SearchFrom> {
        match self.marker {
            FieldMarker::SearchFrom(search_from) => Some(search_from),
            _ => None,
        }
    }

    /// Column holding the local side of a search-from join.
    ///
    /// This is `local_id`'s column when set, otherwise this field's own column.
    #[must_use]
    pub fn join_column(&self, owner: &'static EntityDescriptor) -> &'static str {
        self.search_from_relation()
            .and_then(|search_from| search_from.local_id)
            .and_then(|local_id| owner.column_of(local_id))
            .unwrap_or(self.column)
    }
}

/// Static description of an entity type.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Fully-qualified type name; the field cache is keyed by it.
    pub type_name: &'static str,
    pub table: &'static str,
    pub id_field: &'static str,
    /// Fields declared on this type only, in declaration order.
    pub fields: &'static [FieldDef],
    /// Supertype whose fields are inherited.
    pub parent: Option<&'static EntityDescriptor>,
}

impl EntityDescriptor {
    /// Every field of this type and its ancestors, cached after the first call.
    #[must_use]
    pub fn all_fields(&'static self) -> Arc<[FieldDef]> {
        fields(self)
    }

    /// First field with a column and this exact name, inherited ones included.
    #[must_use]
    pub fn field(&'static self, name: &str) -> Option<FieldDef> {
        find_field(&self.all_fields(), name).copied()
    }

    #[must_use]
    pub fn column_of(&'static self, name: &str) -> Option<&'static str> {
        self.field(name).map(|field| field.column)
    }

    /// Column of the id field, falling back to the id field name itself.
    #[must_use]
    pub fn id_column(&'static self) -> &'static str {
        self.column_of(self.id_field).unwrap_or(self.id_field)
    }
}

/// Exact-name match among fields that have a column.
#[must_use]
pub fn find_field<'a>(fields: &'a [FieldDef], name: &str) -> Option<&'a FieldDef> {
    fields
        .iter()
        .find(|field| field.name == name && field.has_column())
}

#[must_use]
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[must_use]
pub fn uncapitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}
