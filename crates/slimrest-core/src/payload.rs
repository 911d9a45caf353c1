//! The type-erased payload flowing through a pipeline.
//!
//! Handlers return domain values of arbitrary types; post-handler stages
//! decide at runtime how to serialize them. The pipeline therefore moves
//! values around as [`Payload`] trait objects and stages downcast where
//! their contract requires a concrete type.

use std::any::Any;

/// A type-erased value produced by a deserialize stage or a raw handler.
///
/// The boxed value's [`TypeId`](std::any::TypeId) is the runtime type
/// identity used by mapping-based serializer dispatch.
pub type Payload = Box<dyn Any + Send>;

/// Boxes a value into a [`Payload`].
///
/// # Example
///
/// ```rust
/// use slimrest_core::payload;
///
/// let value = payload(vec![1_u32, 2, 3]);
/// assert!(value.downcast_ref::<Vec<u32>>().is_some());
/// ```
#[must_use]
pub fn payload<T: Send + 'static>(value: T) -> Payload {
    Box::new(value)
}

/// Boxes a sequence of values into a `Vec<Payload>` payload, the shape the
/// paginate stage expects from a handler.
///
/// # Example
///
/// ```rust
/// use slimrest_core::{payload_seq, Payload};
///
/// let value = payload_seq(vec!["a", "b"]);
/// let items = value.downcast_ref::<Vec<Payload>>().unwrap();
/// assert_eq!(items.len(), 2);
/// ```
#[must_use]
pub fn payload_seq<T, I>(items: I) -> Payload
where
    T: Send + 'static,
    I: IntoIterator<Item = T>,
{
    Box::new(items.into_iter().map(payload).collect::<Vec<Payload>>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;

    #[test]
    fn payload_preserves_runtime_type() {
        let value = payload(String::from("Hello world!"));
        assert_eq!((*value).type_id(), TypeId::of::<String>());
        assert_eq!(
            value.downcast_ref::<String>().map(String::as_str),
            Some("Hello world!")
        );
    }

    #[test]
    fn downcast_to_wrong_type_fails() {
        let value = payload(42_u64);
        assert!(value.downcast_ref::<String>().is_none());
    }
}
