//! Root component declarations and their observable collection.

use std::collections::HashMap;

use trellis_common::WebViewError;

/// Opaque handle naming a renderable component to the engine.
///
/// Trellis never interprets the handle; the engine maps it to whatever
/// component registry it maintains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentType(String);

impl ComponentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Describes a root component to be mounted into the hosted page.
///
/// The selector is a CSS selector identifying where in the document the
/// component is placed. It must be unique among the root components of one
/// host view; uniqueness is an engine contract requirement, not enforced
/// here. Immutable after construction.
#[derive(Debug, Clone)]
pub struct RootComponent {
    selector: String,
    component_type: ComponentType,
    parameters: Option<HashMap<String, serde_json::Value>>,
}

impl RootComponent {
    /// Construct a root component declaration. Fails with
    /// [`WebViewError::EmptySelector`] when `selector` is blank.
    pub fn new(
        selector: impl Into<String>,
        component_type: ComponentType,
        parameters: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<Self, WebViewError> {
        let selector = selector.into();
        if selector.trim().is_empty() {
            return Err(WebViewError::EmptySelector);
        }
        Ok(Self {
            selector,
            component_type,
            parameters,
        })
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn component_type(&self) -> &ComponentType {
        &self.component_type
    }

    pub fn parameters(&self) -> Option<&HashMap<String, serde_json::Value>> {
        self.parameters.as_ref()
    }
}

/// Observer invoked with `(added, removed)` deltas on every collection change.
pub type CollectionObserver = Box<dyn FnMut(&[RootComponent], &[RootComponent])>;

/// An ordered collection of [`RootComponent`] declarations.
///
/// Insertion order is significant: initialization replays the collection
/// front to back, so components declared first are mounted first. Changes
/// are reported to a single registered observer as explicit add/remove
/// deltas rather than through hidden event wiring.
#[derive(Default)]
pub struct RootComponentsCollection {
    items: Vec<RootComponent>,
    observer: Option<CollectionObserver>,
}

impl RootComponentsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: CollectionObserver) {
        self.observer = Some(observer);
    }

    /// Append a component and notify the observer.
    pub fn add(&mut self, component: RootComponent) {
        self.items.push(component.clone());
        if let Some(observer) = self.observer.as_mut() {
            observer(std::slice::from_ref(&component), &[]);
        }
    }

    /// Remove the first component whose selector matches and notify the
    /// observer. Returns the removed component, or `None` when no match
    /// exists. Never fails.
    pub fn remove(&mut self, selector: &str) -> Option<RootComponent> {
        let index = self.items.iter().position(|c| c.selector() == selector)?;
        let removed = self.items.remove(index);
        if let Some(observer) = self.observer.as_mut() {
            observer(&[], std::slice::from_ref(&removed));
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RootComponent> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_selector(&self, selector: &str) -> bool {
        self.items.iter().any(|c| c.selector() == selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn component(selector: &str) -> RootComponent {
        RootComponent::new(selector, ComponentType::new("counter"), None).unwrap()
    }

    #[test]
    fn blank_selector_is_rejected() {
        let err = RootComponent::new("  ", ComponentType::new("counter"), None).unwrap_err();
        assert!(matches!(err, WebViewError::EmptySelector));

        let err = RootComponent::new("", ComponentType::new("counter"), None).unwrap_err();
        assert!(matches!(err, WebViewError::EmptySelector));
    }

    #[test]
    fn parameters_are_preserved() {
        let mut params = HashMap::new();
        params.insert("count".to_string(), serde_json::json!(42));
        let c = RootComponent::new("#app", ComponentType::new("counter"), Some(params)).unwrap();
        assert_eq!(
            c.parameters().unwrap().get("count"),
            Some(&serde_json::json!(42))
        );
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut collection = RootComponentsCollection::new();
        collection.add(component("#a"));
        collection.add(component("#b"));
        collection.add(component("#c"));

        let selectors: Vec<&str> = collection.iter().map(|c| c.selector()).collect();
        assert_eq!(selectors, vec!["#a", "#b", "#c"]);
    }

    #[test]
    fn add_notifies_observer_with_added_delta() {
        let seen: Rc<RefCell<Vec<(Vec<String>, Vec<String>)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut collection = RootComponentsCollection::new();
        collection.set_observer(Box::new(move |added, removed| {
            sink.borrow_mut().push((
                added.iter().map(|c| c.selector().to_string()).collect(),
                removed.iter().map(|c| c.selector().to_string()).collect(),
            ));
        }));

        collection.add(component("#app"));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, vec!["#app"]);
        assert!(seen[0].1.is_empty());
    }

    #[test]
    fn remove_notifies_observer_with_removed_delta() {
        let seen: Rc<RefCell<Vec<(Vec<String>, Vec<String>)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut collection = RootComponentsCollection::new();
        collection.add(component("#app"));
        collection.set_observer(Box::new(move |added, removed| {
            sink.borrow_mut().push((
                added.iter().map(|c| c.selector().to_string()).collect(),
                removed.iter().map(|c| c.selector().to_string()).collect(),
            ));
        }));

        let removed = collection.remove("#app");
        assert!(removed.is_some());
        assert!(collection.is_empty());

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.is_empty());
        assert_eq!(seen[0].1, vec!["#app"]);
    }

    #[test]
    fn remove_unknown_selector_is_silent() {
        let mut collection = RootComponentsCollection::new();
        collection.add(component("#app"));

        assert!(collection.remove("#ghost").is_none());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn mutations_before_observer_registration_are_plain() {
        // Components declared before the observer exists (i.e. before
        // initialization) only update the collection; initialization
        // replays them.
        let mut collection = RootComponentsCollection::new();
        collection.add(component("#a"));
        collection.add(component("#b"));
        assert_eq!(collection.len(), 2);
        assert!(collection.contains_selector("#a"));
    }
}
