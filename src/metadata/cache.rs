//! Process-wide field list cache.
//!
//! Populated on first use per entity type and never evicted: descriptors are
//! static, so the flattened list can never go stale. Readers share a read
//! lock. A miss computes the list outside the lock and publishes it with a
//! single insert, so a racing thread either sees nothing or the whole list.
//! Two threads may both compute the same list; the first insert wins.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::{EntityDescriptor, FieldDef};

type FieldCache = RwLock<HashMap<&'static str, Arc<[FieldDef]>>>;

static FIELD_CACHE: LazyLock<FieldCache> = LazyLock::new(|| RwLock::new(HashMap::new()));

/// All fields of `descriptor`: its own first, then each ancestor's up to the root.
pub fn fields(descriptor: &'static EntityDescriptor) -> Arc<[FieldDef]> {
    if let Some(cached) = FIELD_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(descriptor.type_name)
    {
        return Arc::clone(cached);
    }

    let collected: Arc<[FieldDef]> = collect_fields(descriptor).into();
    tracing::debug!(
        entity = descriptor.type_name,
        count = collected.len(),
        "Caching entity fields"
    );

    let mut cache = FIELD_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(cache.entry(descriptor.type_name).or_insert(collected))
}

/// Number of entity types whose fields have been cached so far.
pub fn cached_entity_count() -> usize {
    FIELD_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}

fn collect_fields(descriptor: &'static EntityDescriptor) -> Vec<FieldDef> {
    let mut collected = Vec::new();
    let mut current = Some(descriptor);
    while let Some(entity) = current {
        collected.extend_from_slice(entity.fields);
        current = entity.parent;
    }
    collected
}
