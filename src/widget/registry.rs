//! Widget instances keyed by element id

use crate::map::MapSurface;
use crate::widget::GeocoderWidget;
use std::collections::HashMap;
use tracing::debug;

/// One widget per form element; attaching twice returns the first instance
pub struct WidgetRegistry<M: MapSurface> {
    widgets: HashMap<String, GeocoderWidget<M>>,
}

impl<M: MapSurface> Default for WidgetRegistry<M> {
    fn default() -> Self {
        Self {
            widgets: HashMap::new(),
        }
    }
}

impl<M: MapSurface> WidgetRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the widget for `element_id`, creating it on first use
    pub fn attach<F>(&mut self, element_id: &str, create: F) -> &mut GeocoderWidget<M>
    where
        F: FnOnce() -> GeocoderWidget<M>,
    {
        self.widgets.entry(element_id.to_string()).or_insert_with(|| {
            debug!(element_id, "widget attached");
            create()
        })
    }

    pub fn get(&self, element_id: &str) -> Option<&GeocoderWidget<M>> {
        self.widgets.get(element_id)
    }

    pub fn get_mut(&mut self, element_id: &str) -> Option<&mut GeocoderWidget<M>> {
        self.widgets.get_mut(element_id)
    }

    pub fn detach(&mut self, element_id: &str) -> Option<GeocoderWidget<M>> {
        self.widgets.remove(element_id)
    }

    /// A tab or panel became visible; every widget relayouts
    pub fn notify_panel_shown(&mut self, input_height: Option<f32>) {
        for widget in self.widgets.values_mut() {
            widget.panel_shown(input_height);
        }
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::HeadlessMap;
    use crate::widget::{FormFields, WidgetOptions};

    fn create() -> GeocoderWidget<HeadlessMap> {
        GeocoderWidget::new(&FormFields::default(), WidgetOptions::default(), HeadlessMap::new())
    }

    #[test]
    fn test_attach_creates_once() {
        let mut registry = WidgetRegistry::new();
        registry.attach("field_location", create).input("Berlin");

        let mut created = false;
        let widget = registry.attach("field_location", || {
            created = true;
            create()
        });
        assert_eq!(widget.state().query, "Berlin");
        assert!(!created);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_detach() {
        let mut registry = WidgetRegistry::new();
        registry.attach("a", create);
        registry.attach("b", create);

        assert!(registry.detach("a").is_some());
        assert!(registry.detach("a").is_none());
        assert!(registry.get("a").is_none());
        assert!(registry.get_mut("b").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_notify_panel_shown_reaches_every_widget() {
        let mut registry = WidgetRegistry::new();
        registry.attach("a", create);
        registry.attach("b", create);

        registry.notify_panel_shown(Some(32.0));

        for id in ["a", "b"] {
            let widget = registry.get(id).unwrap();
            assert_eq!(widget.map().size_invalidations(), 1);
            assert_eq!(widget.ui().input_height, Some(32.0));
        }
    }
}
