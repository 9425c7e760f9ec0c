//! Registry codec for boxed trait objects
//!
//! Every concrete type that may be stored behind `Box<B>` is registered
//! under an explicit tag together with its decoder. Records carrying a tag
//! that was never registered are rejected rather than resolved by name.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::error::{FdictError, Result};

use super::{unreadable, Envelope, EnvelopeRef, ValueCodec};

/// Concrete-type identity and serialization of a value stored behind a trait object
///
/// Make it a supertrait of the stored trait (`trait Shape: TypeTagged`) so the
/// codec can reach it through `Box<dyn Shape>`.
pub trait TypeTagged {
    /// Tag of the concrete type, matching the tag it is registered under
    fn type_tag(&self) -> &'static str;

    /// Payload of the concrete value as JSON text
    ///
    /// Hand-written impls should call [`ensure_finite`](super::ensure_finite)
    /// first; serde_json would otherwise write NaN and infinity as `null`.
    fn to_json(&self) -> serde_json::Result<String>;
}

/// Implement [`TypeTagged`] for a `Serialize` type with a fixed tag
#[macro_export]
macro_rules! type_tagged {
    ($ty:ty, $tag:expr) => {
        impl $crate::codec::TypeTagged for $ty {
            fn type_tag(&self) -> &'static str {
                $tag
            }

            fn to_json(&self) -> $crate::__serde_json::Result<String> {
                $crate::codec::ensure_finite(self)?;
                $crate::__serde_json::to_string(self)
            }
        }
    };
}

type DecodeFn<B> = Box<dyn Fn(&str) -> serde_json::Result<Box<B>>>;

/// Codec for `Box<B>` resolving concrete types through registered tags
pub struct RegistryCodec<B: ?Sized> {
    decoders: HashMap<&'static str, DecodeFn<B>>,
}

impl<B: ?Sized + TypeTagged + 'static> RegistryCodec<B> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register concrete type `C` under `tag`
    ///
    /// `upcast` boxes a decoded `C` as the stored trait object.
    /// Registering a tag twice replaces the earlier decoder.
    pub fn register<C, F>(&mut self, tag: &'static str, upcast: F) -> &mut Self
    where
        C: DeserializeOwned + 'static,
        F: Fn(C) -> Box<B> + 'static,
    {
        let decode = move |payload: &str| -> serde_json::Result<Box<B>> {
            let concrete: C = serde_json::from_str(payload)?;
            Ok(upcast(concrete))
        };
        if self.decoders.insert(tag, Box::new(decode)).is_some() {
            tracing::debug!("Replaced decoder for type tag '{}'", tag);
        }
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<C, F>(mut self, tag: &'static str, upcast: F) -> Self
    where
        C: DeserializeOwned + 'static,
        F: Fn(C) -> Box<B> + 'static,
    {
        self.register(tag, upcast);
        self
    }

    /// Check whether a tag has a decoder
    pub fn is_registered(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.decoders.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

impl<B: ?Sized + TypeTagged + 'static> Default for RegistryCodec<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ?Sized> fmt::Debug for RegistryCodec<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCodec")
            .field("tags", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<B: ?Sized + TypeTagged + 'static> ValueCodec<Box<B>> for RegistryCodec<B> {
    fn encode(&self, value: &Box<B>) -> Result<String> {
        let tag = value.type_tag();

        // Refuse to write what could not be read back
        if !self.is_registered(tag) {
            return Err(FdictError::UnknownType(tag.to_string()));
        }

        let payload = RawValue::from_string(value.to_json()?)?;
        let envelope = EnvelopeRef {
            type_tag: tag,
            value: &*payload,
        };
        let text = serde_json::to_string(&envelope)?;

        self.decode(&text).map_err(unreadable)?;
        Ok(text)
    }

    fn decode(&self, text: &str) -> Result<Box<B>> {
        let envelope = Envelope::parse(text)?;
        let decode = self
            .decoders
            .get(envelope.type_tag.as_str())
            .ok_or_else(|| FdictError::UnknownType(envelope.type_tag.clone()))?;
        Ok(decode(envelope.value.get())?)
    }
}
