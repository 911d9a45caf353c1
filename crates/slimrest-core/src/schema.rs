//! The schema capability: serialize, deserialize and validate payloads.
//!
//! [`Schema`] is the seam to the serialization engine. The framework never
//! inspects domain types itself; it asks a schema to dump a [`Payload`] to a
//! JSON value or to load a JSON value into a fresh payload, reporting
//! field-level validation errors.
//!
//! [`JsonSchema`] is the serde-backed implementation used in practice.
//! [`SchemaMapping`] adds polymorphic dispatch: it selects a schema by the
//! *runtime* type of the value being dumped and fails hard when no entry
//! matches.
//!
//! # Permissive single-schema dump
//!
//! `JsonSchema::dump` of a value whose runtime type is not the schema's type
//! returns an empty JSON object instead of an error. This mirrors the
//! field-by-field permissiveness of the reference serializer and is
//! intentionally asymmetric with [`SchemaMapping::dispatch`], which treats
//! the same situation as a hard [`PipelineError::MappingDispatch`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult, ValidationErrors};
use crate::payload::Payload;

/// Serialization and validation capability over type-erased payloads.
pub trait Schema: Send + Sync + 'static {
    /// Serializes a single payload to a JSON value.
    fn dump(&self, value: &(dyn Any + Send)) -> PipelineResult<serde_json::Value>;

    /// Serializes a sequence of payloads to a JSON array.
    fn dump_many(&self, values: &[Payload]) -> PipelineResult<serde_json::Value> {
        let items = values
            .iter()
            .map(|value| self.dump(value.as_ref()))
            .collect::<PipelineResult<Vec<_>>>()?;
        Ok(serde_json::Value::Array(items))
    }

    /// Deserializes and validates a JSON value into a typed payload.
    ///
    /// # Errors
    ///
    /// Returns the field-level validation errors when the value does not
    /// conform to the schema.
    fn load(&self, value: serde_json::Value) -> Result<Payload, ValidationErrors>;
}

/// A serde-backed [`Schema`] for a concrete domain type.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use slimrest_core::{payload, JsonSchema, Schema};
///
/// #[derive(Serialize, Deserialize)]
/// struct Hero {
///     hero_name: String,
/// }
///
/// let schema = JsonSchema::<Hero>::new();
/// let value = payload(Hero { hero_name: "Groot".into() });
/// let json = schema.dump(value.as_ref()).unwrap();
/// assert_eq!(json["hero_name"], "Groot");
/// ```
pub struct JsonSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSchema<T> {
    /// Creates a schema for `T`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schema for JsonSchema<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    fn dump(&self, value: &(dyn Any + Send)) -> PipelineResult<serde_json::Value> {
        match value.downcast_ref::<T>() {
            Some(typed) => serde_json::to_value(typed).map_err(|e| {
                PipelineError::stage_configuration(format!("value failed to serialize: {e}"))
            }),
            // Permissive dump: a value of a foreign type has none of the
            // schema's fields, so the result is an empty object.
            None => Ok(serde_json::Value::Object(serde_json::Map::new())),
        }
    }

    fn load(&self, value: serde_json::Value) -> Result<Payload, ValidationErrors> {
        match serde_json::from_value::<T>(value) {
            Ok(typed) => Ok(Box::new(typed)),
            Err(e) => Err(ValidationErrors::schema_level(e.to_string())),
        }
    }
}

/// A runtime-type → schema dispatch table.
///
/// Used by serialize stages that can be handed values of several unrelated
/// types and must pick the matching schema per value. Lookup that finds no
/// entry is a configuration fault, never a silent fallback.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use slimrest_core::{payload, SchemaMapping, JsonSchema};
///
/// #[derive(Serialize, Deserialize)]
/// struct Hero { hero_name: String }
///
/// let mapping = SchemaMapping::new().with::<Hero>(JsonSchema::<Hero>::new());
/// let value = payload(Hero { hero_name: "Rocket".into() });
/// assert!(mapping.dispatch(value.as_ref()).is_ok());
/// ```
#[derive(Default)]
pub struct SchemaMapping {
    entries: HashMap<TypeId, Arc<dyn Schema>>,
}

impl SchemaMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema for values whose runtime type is `T`.
    ///
    /// The schema does not have to be a `JsonSchema<T>`; any schema that can
    /// dump values of type `T` works. `T` must implement `Serialize` so a
    /// mismatched registration is caught at the call site rather than at
    /// request time.
    #[must_use]
    pub fn with<T: Serialize + Send + 'static>(mut self, schema: impl Schema) -> Self {
        self.entries.insert(TypeId::of::<T>(), Arc::new(schema));
        self
    }

    /// Returns the number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selects the schema matching the value's runtime type.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MappingDispatch`] when no entry matches.
    pub fn dispatch(&self, value: &(dyn Any + Send)) -> PipelineResult<&Arc<dyn Schema>> {
        let type_id = value.type_id();
        self.entries
            .get(&type_id)
            .ok_or(PipelineError::MappingDispatch { type_id })
    }

    /// Dumps a value through the schema matching its runtime type.
    pub fn dump(&self, value: &(dyn Any + Send)) -> PipelineResult<serde_json::Value> {
        self.dispatch(value)?.dump(value)
    }
}
