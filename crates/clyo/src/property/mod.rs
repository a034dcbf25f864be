//! Managed objects and the typed property bridge.
//!
//! Hosts describe each object they want the console to control as a
//! [`ManagedObject`]: a unique name, one [`PropertyBinding`] per tunable
//! property, and an optional stop hook. A binding is a capability table of
//! three host-supplied functions:
//!
//! - a conversion rule turning operator text into the native value,
//! - a getter returning the current value,
//! - a setter applying a converted value, which may refuse it.
//!
//! The [`PropertyAccessor`] resolves `(object, property)` pairs against those
//! bindings and classifies every failure so the dispatcher can report it per
//! object. Writes are all-or-nothing per object: conversion happens before the
//! setter runs, and a refusing setter must leave the previous value in place.
//!
//! The console adds no locking of its own. Bindings are `Send + Sync`; any
//! synchronisation with host threads reading the same values is the host's
//! responsibility, typically a mutex captured by the getter and setter.

pub mod convert;
mod errors;

use std::collections::HashMap;
use std::fmt;
use std::sync::Once;

use tracing::warn;

use crate::errors::ConstructionError;
use crate::table::CommandTable;

pub use errors::{AccessError, AssignmentError, ConversionError, PropertyError};

/// Tracing target for property access.
pub(crate) const PROPERTY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::property");

/// Old and new rendering of a property after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    /// Value before the write.
    pub old: String,
    /// Value read back after the write.
    pub new: String,
}

enum BindingFailure {
    Conversion(String),
    Assignment(String),
}

trait ErasedBinding: Send + Sync {
    fn read(&self) -> String;

    fn write(&self, raw: &str) -> Result<ValueChange, BindingFailure>;
}

type Converter<T> = Box<dyn Fn(&str) -> Result<T, String> + Send + Sync>;
type Getter<T> = Box<dyn Fn() -> T + Send + Sync>;
type Setter<T> = Box<dyn Fn(T) -> Result<(), String> + Send + Sync>;

struct TypedBinding<T> {
    convert: Converter<T>,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> ErasedBinding for TypedBinding<T>
where
    T: fmt::Display,
{
    fn read(&self) -> String {
        (self.get)().to_string()
    }

    fn write(&self, raw: &str) -> Result<ValueChange, BindingFailure> {
        let value = (self.convert)(raw).map_err(BindingFailure::Conversion)?;
        let old = self.read();
        (self.set)(value).map_err(BindingFailure::Assignment)?;
        Ok(ValueChange {
            old,
            new: self.read(),
        })
    }
}

/// Typed get/set capability for one property of one object.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use clyo::property::{PropertyBinding, convert};
///
/// let averaging = Arc::new(Mutex::new(10_u32));
/// let (reader, writer) = (Arc::clone(&averaging), Arc::clone(&averaging));
/// let binding = PropertyBinding::new(
///     convert::positive::<u32>,
///     move || *reader.lock().unwrap(),
///     move |value| {
///         *writer.lock().unwrap() = value;
///         Ok(())
///     },
/// );
/// # drop(binding);
/// ```
pub struct PropertyBinding {
    inner: Box<dyn ErasedBinding>,
}

impl PropertyBinding {
    /// Builds a binding from a conversion rule, a getter and a setter.
    ///
    /// The setter returns `Err(reason)` to refuse a value; it must not modify
    /// the object in that case.
    pub fn new<T, C, G, S>(convert: C, get: G, set: S) -> Self
    where
        T: fmt::Display + 'static,
        C: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(TypedBinding {
                convert: Box::new(convert),
                get: Box::new(get),
                set: Box::new(set),
            }),
        }
    }
}

impl fmt::Debug for PropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("current", &self.inner.read())
            .finish()
    }
}

struct StopHook {
    hook: Box<dyn Fn() + Send + Sync>,
    once: Once,
}

/// A named object controlled from the console.
pub struct ManagedObject {
    name: String,
    properties: HashMap<String, PropertyBinding>,
    stop_hook: Option<StopHook>,
}

impl ManagedObject {
    /// Creates an object with no properties and no stop hook.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
            stop_hook: None,
        }
    }

    /// Binds a property identifier to its capability table.
    ///
    /// Binding the same identifier twice keeps the last binding.
    #[must_use]
    pub fn with_property(mut self, identifier: impl Into<String>, binding: PropertyBinding) -> Self {
        self.properties.insert(identifier.into(), binding);
        self
    }

    /// Registers work to run when the operator stops the console.
    #[must_use]
    pub fn with_stop_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.stop_hook = Some(StopHook {
            hook: Box::new(hook),
            once: Once::new(),
        });
        self
    }

    /// Returns the object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when the object exposes `identifier`.
    #[must_use]
    pub fn has_property(&self, identifier: &str) -> bool {
        self.properties.contains_key(identifier)
    }

    /// Returns `true` when a stop hook was registered.
    #[must_use]
    pub const fn has_stop_hook(&self) -> bool {
        self.stop_hook.is_some()
    }

    /// Runs the stop hook if present and not already run.
    ///
    /// Returns `true` when the hook ran during this call.
    #[must_use = "false means the hook was absent or already ran"]
    pub fn stop(&self) -> bool {
        let Some(stop_hook) = &self.stop_hook else {
            return false;
        };
        let mut ran = false;
        stop_hook.once.call_once(|| {
            (stop_hook.hook)();
            ran = true;
        });
        ran
    }

    fn binding(&self, property: &str) -> Result<&PropertyBinding, AccessError> {
        self.properties
            .get(property)
            .ok_or_else(|| AccessError::UnknownProperty {
                object: self.name.clone(),
                property: property.to_owned(),
            })
    }
}

impl fmt::Debug for ManagedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut properties: Vec<&String> = self.properties.keys().collect();
        properties.sort();
        f.debug_struct("ManagedObject")
            .field("name", &self.name)
            .field("properties", &properties)
            .field("has_stop_hook", &self.has_stop_hook())
            .finish()
    }
}

/// Ordered set of managed objects with unique names.
///
/// Registration order drives bulk updates, inquiries and printing.
#[derive(Debug, Default)]
pub struct ManagedObjects {
    objects: Vec<ManagedObject>,
}

impl ManagedObjects {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from objects in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::DuplicateObjectName`] when two objects
    /// share a name.
    pub fn from_objects<I>(objects: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = ManagedObject>,
    {
        let mut set = Self::new();
        for object in objects {
            set.register(object)?;
        }
        Ok(set)
    }

    /// Appends an object.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::DuplicateObjectName`] when the name is
    /// already registered.
    pub fn register(&mut self, object: ManagedObject) -> Result<(), ConstructionError> {
        if self.get(object.name()).is_some() {
            return Err(ConstructionError::duplicate_object(object.name()));
        }
        self.objects.push(object);
        Ok(())
    }

    /// Looks up an object by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ManagedObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    /// Iterates objects in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ManagedObject> {
        self.objects.iter()
    }

    /// Iterates object names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(ManagedObject::name)
    }

    /// Returns the number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` when no objects are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Name-based get/set bridge over the managed objects.
#[derive(Debug)]
pub struct PropertyAccessor {
    objects: ManagedObjects,
    labels: HashMap<String, String>,
}

impl PropertyAccessor {
    /// Wraps `objects`, taking property labels from `table`.
    ///
    /// Objects lacking a binding for a declared property are logged; commands
    /// addressing them later report [`AccessError::UnknownProperty`].
    #[must_use]
    pub fn new(objects: ManagedObjects, table: &CommandTable) -> Self {
        for spec in table.properties() {
            for object in objects.iter() {
                if !object.has_property(spec.identifier()) {
                    warn!(
                        target: PROPERTY_TARGET,
                        object = object.name(),
                        property = spec.identifier(),
                        "object does not expose declared property"
                    );
                }
            }
        }
        let labels = table
            .properties()
            .iter()
            .map(|spec| (spec.identifier().to_owned(), spec.label().to_owned()))
            .collect();
        Self { objects, labels }
    }

    /// Returns the managed objects.
    #[must_use]
    pub const fn objects(&self) -> &ManagedObjects {
        &self.objects
    }

    /// Returns the display label for `property`, or the identifier itself
    /// when the property is not declared.
    #[must_use]
    pub fn label<'a>(&'a self, property: &'a str) -> &'a str {
        self.labels.get(property).map_or(property, String::as_str)
    }

    /// Reads the current value of `property` on `object`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError`] when the object or the binding is missing.
    pub fn get(&self, object: &str, property: &str) -> Result<String, AccessError> {
        let binding = self.object(object)?.binding(property)?;
        Ok(binding.inner.read())
    }

    /// Converts `raw` and assigns it to `property` on `object`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Access`] for an unknown object or property,
    /// [`PropertyError::Conversion`] when `raw` does not convert, and
    /// [`PropertyError::Assignment`] when the setter refuses the value. In
    /// every error case the object keeps its previous value.
    pub fn set(&self, object: &str, property: &str, raw: &str) -> Result<ValueChange, PropertyError> {
        let binding = self.object(object)?.binding(property)?;
        binding.inner.write(raw).map_err(|failure| match failure {
            BindingFailure::Conversion(reason) => ConversionError {
                value: raw.to_owned(),
                label: self.label(property).to_owned(),
                property: property.to_owned(),
                reason,
            }
            .into(),
            BindingFailure::Assignment(reason) => AssignmentError {
                object: object.to_owned(),
                label: self.label(property).to_owned(),
                value: raw.to_owned(),
                reason,
            }
            .into(),
        })
    }

    fn object(&self, name: &str) -> Result<&ManagedObject, AccessError> {
        self.objects
            .get(name)
            .ok_or_else(|| AccessError::UnknownObject {
                object: name.to_owned(),
            })
    }
}
