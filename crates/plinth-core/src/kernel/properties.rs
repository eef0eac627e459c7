//! Static declaration of an application's members.
//!
//! A [`PropertyTable`] lists the members of a plugin in declaration order
//! together with what their public accessor yields. Only members whose
//! accessor yields a component take part in tree initialization.
use crate::kernel::component::ComponentRef;

/// What a declared member exposes
#[derive(Debug, Clone)]
pub enum Property {
    /// Public accessor yielding a component
    Component(ComponentRef),
    /// Public accessor yielding plain data
    Value(serde_json::Value),
    /// No public accessor
    Private,
}

impl Property {
    /// The component behind the accessor, if the accessor yields one
    pub fn as_component(&self) -> Option<&ComponentRef> {
        match self {
            Property::Component(component) => Some(component),
            Property::Value(_) | Property::Private => None,
        }
    }
}

/// Ordered table of declared members
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    entries: Vec<(String, Property)>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name`. Re-declaring a name replaces it in place.
    pub fn declare(&mut self, name: impl Into<String>, property: Property) -> &mut Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = property,
            None => self.entries.push((name, property)),
        }
        self
    }

    pub fn component(&mut self, name: impl Into<String>, component: ComponentRef) -> &mut Self {
        self.declare(name, Property::Component(component))
    }

    pub fn value(&mut self, name: impl Into<String>, value: serde_json::Value) -> &mut Self {
        self.declare(name, Property::Value(value))
    }

    pub fn private(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(name, Property::Private)
    }

    /// Declared member, regardless of visibility
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, property)| property)
    }

    /// What the public accessor of `name` yields; `None` for private or undeclared members
    pub fn accessor(&self, name: &str) -> Option<&Property> {
        self.get(name).filter(|property| !matches!(property, Property::Private))
    }

    /// Members whose accessor yields a component, in declaration order
    pub fn components(&self) -> Vec<(String, ComponentRef)> {
        self.entries
            .iter()
            .filter_map(|(name, property)| {
                property.as_component().map(|component| (name.clone(), component.clone()))
            })
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
