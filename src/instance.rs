//! Constructed objects and the pulse capability
//!
//! A registered constructor returns either a scalar or a [`BuiltObject`].
//! Objects built with [`BuiltObject::instance`] also expose [`Instance::pulse`],
//! the unit-of-work trigger an external scheduler calls later. The core never
//! pulses anything itself.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Unit-of-work capability of a built object
pub trait Instance: Send + Sync {
    /// Perform one unit of work
    fn pulse(&self) -> anyhow::Result<()>;
}

/// Failure to pulse a value
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("'{type_name}' does not support pulse")]
    NotAnInstance { type_name: String },

    #[error("pulse of '{type_name}' failed: {source}")]
    Failed {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Opaque object returned by a registered constructor
///
/// Cloning shares the underlying object.
#[derive(Clone)]
pub struct BuiltObject {
    type_name: String,
    payload: Arc<dyn Any + Send + Sync>,
    instance: Option<Arc<dyn Instance>>,
}

impl BuiltObject {
    /// Wrap a plain object with no pulse capability
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, object: T) -> Self {
        Self {
            type_name: type_name.into(),
            payload: Arc::new(object),
            instance: None,
        }
    }

    /// Wrap an object that can be pulsed
    pub fn instance<T: Instance + Any>(type_name: impl Into<String>, object: T) -> Self {
        let shared = Arc::new(object);
        Self {
            type_name: type_name.into(),
            payload: shared.clone(),
            instance: Some(shared),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the wrapped object as its concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub fn as_instance(&self) -> Option<&dyn Instance> {
        self.instance.as_deref()
    }

    pub fn is_instance(&self) -> bool {
        self.instance.is_some()
    }

    pub fn pulse(&self) -> Result<(), PulseError> {
        let instance = self
            .instance
            .as_ref()
            .ok_or_else(|| PulseError::NotAnInstance {
                type_name: self.type_name.clone(),
            })?;
        instance.pulse().map_err(|source| PulseError::Failed {
            type_name: self.type_name.clone(),
            source,
        })
    }

    /// True when both handles share one underlying object
    pub fn same_object(&self, other: &BuiltObject) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for BuiltObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltObject")
            .field("type_name", &self.type_name)
            .field("instance", &self.instance.is_some())
            .finish()
    }
}
