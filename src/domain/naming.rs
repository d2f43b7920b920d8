//! Identity Namer
//!
//! Gives every distinct referent a short symbolic name `Class[index]`,
//! indices counted per class in first-seen order.

use crate::domain::context::{Identity, Receiver, TraceId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Label used for receiver-less contexts unless configured otherwise.
pub const DEFAULT_PLACEHOLDER_LABEL: &str = "NoneType";

/// A referent resolved to its symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedEntity {
    pub class_label: Cow<'static, str>,
    pub index: usize,
}

impl NamedEntity {
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NamedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.class_label, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Key {
    Placeholder,
    Address(Identity),
    Surrogate(TraceId),
}

/// Indices assigned within one class.
#[derive(Debug, Default)]
struct ClassNames {
    indices: HashMap<Key, usize>,
    next_index: usize,
}

impl ClassNames {
    fn index_of(&mut self, key: Key) -> usize {
        let next = &mut self.next_index;
        *self.indices.entry(key).or_insert_with(|| {
            let index = *next;
            *next += 1;
            index
        })
    }
}

/// Maps class label -> referent identity -> index.
///
/// Grows monotonically; the owner decides when (if ever) to `clear` it.
#[derive(Debug)]
pub struct NamingRegistry {
    placeholder_label: Cow<'static, str>,
    classes: HashMap<Cow<'static, str>, ClassNames>,
}

impl Default for NamingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NamingRegistry {
    pub fn new() -> Self {
        Self::with_placeholder(DEFAULT_PLACEHOLDER_LABEL)
    }

    /// Create a registry rendering receiver-less contexts as `label[0]`.
    pub fn with_placeholder(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            placeholder_label: label.into(),
            classes: HashMap::new(),
        }
    }

    pub fn placeholder_label(&self) -> &str {
        &self.placeholder_label
    }

    /// Resolve a receiver to its name, assigning the next index of its
    /// class if the referent has not been seen yet.
    pub fn resolve(&mut self, receiver: &Receiver) -> NamedEntity {
        let (class_label, key) = match *receiver {
            Receiver::Object {
                class_label,
                identity,
            } => (Cow::Borrowed(class_label), Key::Address(identity)),
            Receiver::Surrogate { class_label, id } => {
                (Cow::Borrowed(class_label), Key::Surrogate(id))
            }
            Receiver::None => (self.placeholder_label.clone(), Key::Placeholder),
        };

        let index = self
            .classes
            .entry(class_label.clone())
            .or_default()
            .index_of(key);

        NamedEntity { class_label, index }
    }

    /// Total number of distinct referents named so far.
    pub fn len(&self) -> usize {
        self.classes.values().map(|c| c.indices.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct referents named under `class_label`.
    pub fn class_count(&self, class_label: &str) -> usize {
        self.classes
            .get(class_label)
            .map(|c| c.indices.len())
            .unwrap_or(0)
    }

    /// Forget every assignment; the next referent of each class gets 0 again.
    pub fn clear(&mut self) {
        self.classes.clear();
    }
}
