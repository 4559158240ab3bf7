use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::ElementIds;
use crate::dom::{DocumentSetting, Dom};

/// What kind of control an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Banner, modal or any other box
    Container,
    Button,
    Checkbox,
    Select,
}

#[derive(Debug, Clone)]
struct Element {
    kind: ElementKind,
    visible: bool,
    checked: bool,
    value: String,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            visible: true,
            checked: false,
            value: String::new(),
        }
    }
}

/// Attributes of the root element touched by document settings.
#[derive(Debug, Clone, Default)]
struct Root {
    theme: Option<String>,
    language: Option<String>,
    font_size: Option<String>,
}

/// In-memory page made of identified elements and a root element.
///
/// Used wherever no real document exists: tests, headless rendering, server-side previews.
#[derive(Debug, Default)]
pub struct VirtualDom {
    elements: RwLock<HashMap<String, Element>>,
    root: RwLock<Root>,
}

impl VirtualDom {
    /// Creates an empty page without any elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the complete consent UI: hidden banner and modal, all buttons, unchecked
    /// toggles and a theme selector.
    pub fn consent_page(ids: &ElementIds) -> Self {
        Self::new()
            .with_container(&ids.banner, false)
            .with_container(&ids.modal, false)
            .with_button(&ids.accept_button)
            .with_button(&ids.reject_button)
            .with_button(&ids.settings_button)
            .with_button(&ids.save_button)
            .with_button(&ids.close_button)
            .with_checkbox(&ids.functional_toggle, false)
            .with_checkbox(&ids.analytics_toggle, false)
            .with_checkbox(&ids.marketing_toggle, false)
            .with_select(&ids.theme_selector, "light")
    }

    pub fn with_container(self, id: &str, visible: bool) -> Self {
        let mut el = Element::new(ElementKind::Container);
        el.visible = visible;
        self.insert(id, el)
    }

    pub fn with_button(self, id: &str) -> Self {
        self.insert(id, Element::new(ElementKind::Button))
    }

    pub fn with_checkbox(self, id: &str, checked: bool) -> Self {
        let mut el = Element::new(ElementKind::Checkbox);
        el.checked = checked;
        self.insert(id, el)
    }

    pub fn with_select(self, id: &str, value: &str) -> Self {
        let mut el = Element::new(ElementKind::Select);
        el.value = value.to_string();
        self.insert(id, el)
    }

    /// Removes an element from the page.
    pub fn remove(&self, id: &str) {
        self.elements.write().unwrap_or_else(|e| e.into_inner()).remove(id);
    }

    pub fn kind(&self, id: &str) -> Option<ElementKind> {
        self.read(id, |el| el.kind)
    }

    /// `data-theme` of the root element.
    pub fn theme(&self) -> Option<String> {
        self.root.read().unwrap_or_else(|e| e.into_inner()).theme.clone()
    }

    /// `lang` of the root element.
    pub fn language(&self) -> Option<String> {
        self.root.read().unwrap_or_else(|e| e.into_inner()).language.clone()
    }

    /// `font-size` of the root element.
    pub fn font_size(&self) -> Option<String> {
        self.root.read().unwrap_or_else(|e| e.into_inner()).font_size.clone()
    }

    fn insert(self, id: &str, el: Element) -> Self {
        self.elements
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), el);
        self
    }

    fn read<T>(&self, id: &str, f: impl FnOnce(&Element) -> T) -> Option<T> {
        self.elements.read().unwrap_or_else(|e| e.into_inner()).get(id).map(f)
    }

    fn update(&self, id: &str, f: impl FnOnce(&mut Element) -> bool) -> bool {
        self.elements
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(id)
            .map_or(false, f)
    }
}

impl Dom for VirtualDom {
    fn contains(&self, id: &str) -> bool {
        self.read(id, |_| ()).is_some()
    }

    fn set_visible(&self, id: &str, visible: bool) -> bool {
        self.update(id, |el| {
            el.visible = visible;
            true
        })
    }

    fn is_visible(&self, id: &str) -> Option<bool> {
        self.read(id, |el| el.visible)
    }

    fn is_checked(&self, id: &str) -> Option<bool> {
        self.read(id, |el| (el.kind == ElementKind::Checkbox).then_some(el.checked))
            .flatten()
    }

    fn set_checked(&self, id: &str, checked: bool) -> bool {
        self.update(id, |el| {
            if el.kind != ElementKind::Checkbox {
                return false;
            }
            el.checked = checked;
            true
        })
    }

    fn value(&self, id: &str) -> Option<String> {
        self.read(id, |el| (el.kind == ElementKind::Select).then(|| el.value.clone()))
            .flatten()
    }

    fn set_value(&self, id: &str, value: &str) -> bool {
        self.update(id, |el| {
            if el.kind != ElementKind::Select {
                return false;
            }
            el.value = value.to_string();
            true
        })
    }

    fn apply(&self, setting: DocumentSetting) {
        let mut root = self.root.write().unwrap_or_else(|e| e.into_inner());
        match setting {
            DocumentSetting::Theme(theme) => root.theme = Some(theme),
            DocumentSetting::Language(lang) => root.language = Some(lang),
            DocumentSetting::FontSize(size) => root.font_size = Some(size),
        }
    }
}
