use serde_json::{json, Value};

use crate::config::ConsentConfig;
use crate::consent::ConsentState;
use crate::cookies::{CookieOptions, CookieStoreHandle};
use crate::dom::{DocumentSetting, DomHandle};
use crate::event::{ConsentBus, ConsentEvent, Subscription};
use crate::hooks::{ConsentSignal, ConsentStatus, TagHookHandle};
use crate::preferences::{Category, PreferenceSet};
use crate::ui::UiBindings;

/// Owns the consent decision and the preference set of one page.
///
/// Construct it once at startup (see [`ConsentController::builder`]) and pass it by
/// reference to whatever needs it. No operation returns an error to the page: storage
/// failures and malformed stored state are logged and the operation degrades.
pub struct ConsentController {
    config: ConsentConfig,
    store: CookieStoreHandle,
    dom: DomHandle,
    hook: Option<TagHookHandle>,
    state: ConsentState,
    preferences: PreferenceSet,
    bus: ConsentBus,
}

impl ConsentController {
    pub fn new(
        config: ConsentConfig,
        store: CookieStoreHandle,
        dom: DomHandle,
        hook: Option<TagHookHandle>,
    ) -> Self {
        Self {
            config,
            store,
            dom,
            hook,
            state: ConsentState::NoDecision,
            preferences: PreferenceSet::default(),
            bus: ConsentBus::default(),
        }
    }

    /// Page-load entry point.
    ///
    /// With a consent marker present the stored preferences are loaded and applied,
    /// otherwise the banner is shown. The UI bindings are registered in both cases.
    pub fn init(&mut self) -> UiBindings {
        if self.store.get_cookie(&self.config.cookie_names.consent).is_some() {
            log::debug!("consent marker found, applying stored preferences");
            self.state = ConsentState::Decided;
            self.load_preferences();
            self.apply_cookie_settings();
        } else {
            log::debug!("no consent marker, showing banner");
            self.state = ConsentState::NoDecision;
            self.set_banner_visible(true);
        }

        UiBindings::register(self.dom.as_ref(), UiBindings::default_mapping(&self.config.elements))
    }

    /// Reads the preference cookie and merges it over the defaults.
    ///
    /// A missing cookie yields the defaults. A malformed one is logged and also yields the
    /// defaults.
    pub fn load_preferences(&mut self) {
        let mut recovered = false;

        self.preferences = match self.store.get_cookie(&self.config.cookie_names.preferences) {
            Some(raw) => PreferenceSet::from_json(&raw).unwrap_or_else(|e| {
                log::warn!("cannot parse stored cookie preferences, using defaults: {}", e);
                recovered = true;
                PreferenceSet::default()
            }),
            None => PreferenceSet::default(),
        };

        self.bus.publish(ConsentEvent::PreferencesLoaded {
            preferences: self.preferences,
            recovered,
        });
    }

    /// Grants every optional category.
    pub fn accept_all(&mut self) {
        self.decide(PreferenceSet::all_granted());
    }

    /// Denies every optional category.
    pub fn reject_all(&mut self) {
        self.decide(PreferenceSet::all_denied());
    }

    /// Takes the three toggles of the settings modal as the decision.
    ///
    /// A missing or non-checkbox toggle counts as unchecked.
    pub fn save_custom_preferences(&mut self) {
        let ids = &self.config.elements;
        let checked = |id: &str| self.dom.is_checked(id).unwrap_or(false);

        let preferences = PreferenceSet::with_optional(
            checked(&ids.functional_toggle),
            checked(&ids.analytics_toggle),
            checked(&ids.marketing_toggle),
        );

        self.decide(preferences);
        self.close_settings();
    }

    /// Runs the enable routine of every granted optional category.
    ///
    /// Denied categories do nothing; there is no disable routine.
    pub fn apply_cookie_settings(&self) {
        for category in Category::OPTIONAL {
            if !self.preferences.is_granted(category) {
                continue;
            }

            match category {
                Category::Functional => self.enable_functional(),
                Category::Analytics => self.enable_analytics(),
                Category::Marketing => self.enable_marketing(),
                Category::Necessary => {}
            }
            self.bus.publish(ConsentEvent::CategoryEnabled(category));
        }
    }

    /// Stores and applies the theme. Returns `false` when functional cookies are not allowed.
    pub fn save_theme(&self, theme: &str) -> bool {
        let stored = self.store_functional(&self.config.cookie_names.theme, theme);
        if stored {
            self.dom.set_value(&self.config.elements.theme_selector, theme);
            self.dom.apply(DocumentSetting::Theme(theme.to_string()));
        }
        stored
    }

    /// Stores and applies the page language. Returns `false` when functional cookies are not
    /// allowed.
    pub fn set_language(&self, lang: &str) -> bool {
        let stored = self.store_functional(&self.config.cookie_names.language, lang);
        if stored {
            self.dom.apply(DocumentSetting::Language(lang.to_string()));
        }
        stored
    }

    /// Stores and applies the root font size. Returns `false` when functional cookies are
    /// not allowed.
    pub fn set_font_size(&self, size: &str) -> bool {
        let stored = self.store_functional(&self.config.cookie_names.font_size, size);
        if stored {
            self.dom.apply(DocumentSetting::FontSize(size.to_string()));
        }
        stored
    }

    /// Stores an arbitrary user preference as its own cookie, gated by functional consent.
    ///
    /// Returns `false` when not allowed or when `key` is not a usable cookie name.
    pub fn save_user_preference(&self, key: &str, value: &str) -> bool {
        self.store_functional(key, value)
    }

    /// Forwards an event to the tag hook, gated by analytics consent.
    ///
    /// Returns `true` if the event was forwarded.
    pub fn track_event(&self, name: &str, data: Value) -> bool {
        if !self.preferences.is_granted(Category::Analytics) {
            log::trace!("analytics not allowed, dropping event {}", name);
            return false;
        }

        let Some(hook) = &self.hook else {
            log::trace!("no tag hook, dropping event {}", name);
            return false;
        };

        hook.event(name, &data);
        self.bus.publish(ConsentEvent::EventTracked {
            name: name.to_string(),
        });
        true
    }

    /// Shows the settings modal with its toggles set to the current preferences.
    pub fn open_settings(&self) {
        let ids = &self.config.elements;
        self.dom.set_checked(&ids.functional_toggle, self.preferences.is_granted(Category::Functional));
        self.dom.set_checked(&ids.analytics_toggle, self.preferences.is_granted(Category::Analytics));
        self.dom.set_checked(&ids.marketing_toggle, self.preferences.is_granted(Category::Marketing));

        if self.dom.set_visible(&ids.modal, true) {
            self.bus.publish(ConsentEvent::SettingsVisibility { open: true });
        }
    }

    pub fn close_settings(&self) {
        if self.dom.set_visible(&self.config.elements.modal, false) {
            self.bus.publish(ConsentEvent::SettingsVisibility { open: false });
        }
    }

    /// Withdraws consent.
    ///
    /// Erases the marker, the preference cookie and all functional cookies, signals
    /// `denied` for previously granted tag storage, resets to the defaults and shows the
    /// banner again.
    pub fn reset_consent(&mut self) {
        let names = &self.config.cookie_names;
        for name in [
            &names.consent,
            &names.preferences,
            &names.theme,
            &names.language,
            &names.font_size,
        ] {
            if let Err(e) = self.store.erase_cookie(name) {
                log::warn!("cannot erase cookie {}: {}", name, e);
            }
        }

        if let Some(hook) = &self.hook {
            if self.preferences.is_granted(Category::Analytics) {
                hook.update_consent(ConsentSignal::AnalyticsStorage, ConsentStatus::Denied);
            }
            if self.preferences.is_granted(Category::Marketing) {
                hook.update_consent(ConsentSignal::AdStorage, ConsentStatus::Denied);
            }
        }

        self.preferences = PreferenceSet::default();
        self.state = ConsentState::NoDecision;
        self.bus.publish(ConsentEvent::ConsentReset);
        self.set_banner_visible(true);
    }

    pub fn state(&self) -> ConsentState {
        self.state
    }

    pub fn has_consent(&self) -> bool {
        self.state == ConsentState::Decided
    }

    pub fn preferences(&self) -> PreferenceSet {
        self.preferences
    }

    pub fn is_allowed(&self, category: Category) -> bool {
        self.preferences.is_granted(category)
    }

    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    /// Subscribes to consent events published from now on.
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    fn decide(&mut self, preferences: PreferenceSet) {
        log::debug!("consent decision: {:?}", preferences.granted());
        self.preferences = preferences;
        self.state = ConsentState::Decided;
        self.save_preferences();
        self.bus.publish(ConsentEvent::DecisionMade { preferences });

        self.apply_cookie_settings();
        self.set_banner_visible(false);
    }

    /// Persists the preference set and the consent marker.
    fn save_preferences(&self) {
        let names = &self.config.cookie_names;
        let options = self.cookie_options();

        if let Err(e) = self.store.set_cookie(&names.preferences, &self.preferences.to_json(), &options) {
            log::warn!("cannot store cookie preferences: {}", e);
        }
        if let Err(e) = self.store.set_cookie(&names.consent, &self.config.consent_marker, &options) {
            log::warn!("cannot store consent marker: {}", e);
        }
    }

    /// Writes a functional cookie if functional consent is granted.
    fn store_functional(&self, name: &str, value: &str) -> bool {
        if !self.preferences.is_granted(Category::Functional) {
            log::debug!("functional cookies not allowed, not storing {}", name);
            return false;
        }

        if let Err(e) = self.store.set_cookie(name, value, &self.cookie_options()) {
            log::warn!("cannot store preference {}: {}", name, e);
            return false;
        }

        self.bus.publish(ConsentEvent::PreferenceStored {
            name: name.to_string(),
            value: value.to_string(),
        });
        true
    }

    /// Restores theme, language and font size from their cookies.
    fn enable_functional(&self) {
        let names = &self.config.cookie_names;

        if let Some(theme) = self.store.get_cookie(&names.theme) {
            self.dom.set_value(&self.config.elements.theme_selector, &theme);
            self.dom.apply(DocumentSetting::Theme(theme));
        }
        if let Some(lang) = self.store.get_cookie(&names.language) {
            self.dom.apply(DocumentSetting::Language(lang));
        }
        if let Some(size) = self.store.get_cookie(&names.font_size) {
            self.dom.apply(DocumentSetting::FontSize(size));
        }
    }

    fn enable_analytics(&self) {
        match &self.hook {
            Some(hook) => {
                hook.update_consent(ConsentSignal::AnalyticsStorage, ConsentStatus::Granted);
                hook.event("page_view", &json!({}));
            }
            None => log::debug!("no tag hook present, analytics consent not signalled"),
        }
    }

    fn enable_marketing(&self) {
        match &self.hook {
            Some(hook) => hook.update_consent(ConsentSignal::AdStorage, ConsentStatus::Granted),
            None => log::debug!("no tag hook present, marketing consent not signalled"),
        }
    }

    fn set_banner_visible(&self, visible: bool) {
        if !self.dom.set_visible(&self.config.elements.banner, visible) {
            log::trace!("no banner element on this page");
        }
        self.bus.publish(if visible {
            ConsentEvent::BannerShown
        } else {
            ConsentEvent::BannerHidden
        });
    }

    fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            days: Some(self.config.expiry_days),
            secure: self.config.secure,
            same_site: self.config.same_site,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ElementIds;
    use crate::cookies::{CookieDocument, CookieStore, DocumentCookieStore, InMemoryCookieDocument, JsonCookieDocument};
    use crate::dom::{Dom, VirtualDom};
    use crate::hooks::{RecordingTagHook, TagCall};
    use crate::ui::UiEvent;
    use std::sync::Arc;
    use time::Duration;

    struct Page {
        doc: Arc<InMemoryCookieDocument>,
        store: Arc<DocumentCookieStore>,
        dom: Arc<VirtualDom>,
        hook: Arc<RecordingTagHook>,
        ids: ElementIds,
    }

    impl Page {
        fn new() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();

            let ids = ElementIds::default();
            let doc = Arc::new(InMemoryCookieDocument::secure());
            Self {
                store: Arc::new(DocumentCookieStore::new(doc.clone())),
                doc,
                dom: Arc::new(VirtualDom::consent_page(&ids)),
                hook: Arc::new(RecordingTagHook::new()),
                ids,
            }
        }

        fn controller(&self) -> ConsentController {
            ConsentController::builder()
                .store(self.store.clone())
                .dom(self.dom.clone())
                .tag_hook(self.hook.clone())
                .build()
        }

        fn cookie(&self, name: &str) -> Option<String> {
            self.store.get_cookie(name)
        }
    }

    fn drain(rx: &mut Subscription) -> Vec<ConsentEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    fn enabled(events: &[ConsentEvent]) -> Vec<Category> {
        events
            .iter()
            .filter_map(|ev| match ev {
                ConsentEvent::CategoryEnabled(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_visit_shows_banner_with_defaults() {
        let page = Page::new();
        let mut consent = page.controller();
        let mut rx = consent.subscribe();

        let bindings = consent.init();

        assert_eq!(consent.state(), ConsentState::NoDecision);
        assert_eq!(consent.preferences(), PreferenceSet::default());
        assert_eq!(page.dom.is_visible(&page.ids.banner), Some(true));
        assert_eq!(bindings.bound().len(), 7);
        assert_eq!(drain(&mut rx), vec![ConsentEvent::BannerShown]);
        assert_eq!(page.doc.cookie_header(), "");
    }

    #[test]
    fn returning_visit_applies_stored_functional_preferences() {
        let page = Page::new();
        page.doc.write_cookie("cookie_consent=given; path=/").unwrap();
        page.doc
            .write_cookie(r#"cookie_preferences={"necessary":true,"functional":true,"analytics":false,"marketing":false}; path=/"#)
            .unwrap();
        page.doc.write_cookie("site_theme=dark; path=/").unwrap();
        page.doc.write_cookie("preferred_language=fr; path=/").unwrap();
        page.doc.write_cookie("font_size=18px; path=/").unwrap();

        let mut consent = page.controller();
        let mut rx = consent.subscribe();
        consent.init();

        assert!(consent.has_consent());
        assert!(consent.is_allowed(Category::Functional));
        assert!(!consent.is_allowed(Category::Analytics));
        assert_eq!(page.dom.is_visible(&page.ids.banner), Some(false));
        assert_eq!(page.dom.theme().as_deref(), Some("dark"));
        assert_eq!(page.dom.language().as_deref(), Some("fr"));
        assert_eq!(page.dom.font_size().as_deref(), Some("18px"));
        assert_eq!(page.dom.value(&page.ids.theme_selector).as_deref(), Some("dark"));

        let events = drain(&mut rx);
        assert_eq!(enabled(&events), vec![Category::Functional]);
        assert!(!events.contains(&ConsentEvent::BannerShown));
        assert!(page.hook.calls().is_empty());
    }

    #[test]
    fn functional_without_stored_values_leaves_document_alone() {
        let page = Page::new();
        page.doc.write_cookie("cookie_consent=given; path=/").unwrap();
        page.doc.write_cookie(r#"cookie_preferences={"functional":true}; path=/"#).unwrap();

        let mut consent = page.controller();
        consent.init();

        assert!(consent.is_allowed(Category::Functional));
        assert!(page.dom.theme().is_none());
        assert!(page.dom.language().is_none());
    }

    #[test]
    fn corrupted_preferences_fall_back_to_defaults() {
        let page = Page::new();
        page.doc.write_cookie("cookie_consent=given; path=/").unwrap();
        page.doc.write_cookie("cookie_preferences={oops; path=/").unwrap();

        let mut consent = page.controller();
        let mut rx = consent.subscribe();
        consent.init();

        assert!(consent.has_consent());
        assert_eq!(consent.preferences(), PreferenceSet::default());
        let events = drain(&mut rx);
        assert!(events.contains(&ConsentEvent::PreferencesLoaded {
            preferences: PreferenceSet::default(),
            recovered: true,
        }));
        assert!(enabled(&events).is_empty());
    }

    #[test]
    fn marker_without_preferences_uses_defaults() {
        let page = Page::new();
        page.doc.write_cookie("cookie_consent=given; path=/").unwrap();

        let mut consent = page.controller();
        consent.init();

        assert!(consent.has_consent());
        assert_eq!(consent.preferences(), PreferenceSet::default());
    }

    #[test]
    fn accept_all_persists_and_enables_everything() {
        let page = Page::new();
        let mut consent = page.controller();
        consent.init();
        let mut rx = consent.subscribe();

        consent.accept_all();

        assert_eq!(page.cookie("cookie_consent").as_deref(), Some("given"));
        assert_eq!(
            PreferenceSet::from_json(&page.cookie("cookie_preferences").unwrap()).unwrap(),
            PreferenceSet::all_granted()
        );
        assert_eq!(page.dom.is_visible(&page.ids.banner), Some(false));

        let events = drain(&mut rx);
        assert_eq!(
            enabled(&events),
            vec![Category::Functional, Category::Analytics, Category::Marketing]
        );
        assert_eq!(
            page.hook.calls(),
            vec![
                TagCall::Consent(ConsentSignal::AnalyticsStorage, ConsentStatus::Granted),
                TagCall::Event("page_view".into(), json!({})),
                TagCall::Consent(ConsentSignal::AdStorage, ConsentStatus::Granted),
            ]
        );
    }

    #[test]
    fn reject_all_enables_nothing() {
        let page = Page::new();
        let mut consent = page.controller();
        consent.init();
        let mut rx = consent.subscribe();

        consent.reject_all();
        consent.apply_cookie_settings();

        assert!(consent.has_consent());
        assert!(consent.is_allowed(Category::Necessary));
        assert_eq!(
            PreferenceSet::from_json(&page.cookie("cookie_preferences").unwrap()).unwrap(),
            PreferenceSet::all_denied()
        );
        assert!(enabled(&drain(&mut rx)).is_empty());
        assert!(page.hook.calls().is_empty());
    }

    #[test]
    fn necessary_granted_after_every_action() {
        let page = Page::new();
        let mut consent = page.controller();
        assert!(consent.is_allowed(Category::Necessary));

        consent.accept_all();
        assert!(consent.is_allowed(Category::Necessary));
        consent.reject_all();
        assert!(consent.is_allowed(Category::Necessary));
        consent.save_custom_preferences();
        assert!(consent.is_allowed(Category::Necessary));
        consent.reset_consent();
        assert!(consent.is_allowed(Category::Necessary));
    }

    #[test]
    fn custom_save_reads_toggles() {
        let page = Page::new();
        page.dom.remove(&page.ids.marketing_toggle);

        let mut consent = page.controller();
        consent.init();
        consent.open_settings();
        assert_eq!(page.dom.is_visible(&page.ids.modal), Some(true));

        page.dom.set_checked(&page.ids.functional_toggle, true);
        consent.save_custom_preferences();

        assert_eq!(
            page.cookie("cookie_preferences").as_deref(),
            Some(r#"{"necessary":true,"functional":true,"analytics":false,"marketing":false}"#)
        );
        assert_eq!(page.dom.is_visible(&page.ids.modal), Some(false));
        assert_eq!(page.dom.is_visible(&page.ids.banner), Some(false));
    }

    #[test]
    fn open_settings_syncs_toggles() {
        let page = Page::new();
        let mut consent = page.controller();
        consent.accept_all();

        consent.open_settings();
        assert_eq!(page.dom.is_checked(&page.ids.functional_toggle), Some(true));
        assert_eq!(page.dom.is_checked(&page.ids.analytics_toggle), Some(true));
        assert_eq!(page.dom.is_checked(&page.ids.marketing_toggle), Some(true));

        consent.close_settings();
        assert_eq!(page.dom.is_visible(&page.ids.modal), Some(false));
    }

    #[test]
    fn theme_is_not_saved_without_functional_consent() {
        let page = Page::new();
        let mut consent = page.controller();
        consent.init();

        assert!(!consent.save_theme("dark"));
        assert!(page.cookie("site_theme").is_none());
        assert!(page.dom.theme().is_none());

        consent.reject_all();
        assert!(!consent.save_theme("dark"));
        assert!(!consent.set_language("de"));
        assert!(!consent.set_font_size("20px"));
        assert!(page.cookie("site_theme").is_none());
        assert!(page.dom.theme().is_none());
        assert!(page.dom.language().is_none());
        assert!(page.dom.font_size().is_none());
    }

    #[test]
    fn functional_settings_are_stored_and_applied() {
        let page = Page::new();
        let mut consent = page.controller();
        consent.accept_all();

        assert!(consent.save_theme("dark"));
        assert!(consent.set_language("nl"));
        assert!(consent.set_font_size("20px"));

        assert_eq!(page.cookie("site_theme").as_deref(), Some("dark"));
        assert_eq!(page.cookie("preferred_language").as_deref(), Some("nl"));
        assert_eq!(page.cookie("font_size").as_deref(), Some("20px"));
        assert_eq!(page.dom.theme().as_deref(), Some("dark"));
        assert_eq!(page.dom.language().as_deref(), Some("nl"));
        assert_eq!(page.dom.font_size().as_deref(), Some("20px"));
    }

    #[test]
    fn user_preference_is_gated_and_validated() {
        let page = Page::new();
        let mut consent = page.controller();

        assert!(!consent.save_user_preference("layout", "grid"));
        consent.accept_all();
        assert!(consent.save_user_preference("layout", "grid"));
        assert!(!consent.save_user_preference("bad name", "x"));

        assert_eq!(page.cookie("layout").as_deref(), Some("grid"));
    }

    #[test]
    fn track_event_requires_analytics_and_a_hook() {
        let page = Page::new();
        let mut consent = page.controller();

        assert!(!consent.track_event("signup", json!({"plan": "pro"})));

        consent.accept_all();
        assert!(consent.track_event("signup", json!({"plan": "pro"})));
        assert_eq!(page.hook.event_names(), vec!["page_view", "signup"]);

        let mut without_hook = ConsentController::builder().store(page.store.clone()).build();
        without_hook.accept_all();
        assert!(!without_hook.track_event("signup", json!({})));
    }

    #[test]
    fn missing_hook_is_not_an_error() {
        let page = Page::new();
        let mut consent = ConsentController::builder()
            .store(page.store.clone())
            .dom(page.dom.clone())
            .build();
        let mut rx = consent.subscribe();

        consent.accept_all();
        assert_eq!(enabled(&drain(&mut rx)).len(), 3);
    }

    #[test]
    fn empty_page_is_tolerated() {
        let mut consent = ConsentController::builder().build();
        let bindings = consent.init();
        assert!(bindings.bound().is_empty());

        consent.open_settings();
        consent.save_custom_preferences();
        assert_eq!(consent.preferences(), PreferenceSet::all_denied());
        assert!(consent.has_consent());
    }

    #[test]
    fn reset_withdraws_consent() {
        let page = Page::new();
        let mut consent = page.controller();
        consent.accept_all();
        consent.save_theme("dark");

        consent.reset_consent();

        assert_eq!(consent.state(), ConsentState::NoDecision);
        assert_eq!(consent.preferences(), PreferenceSet::default());
        assert!(page.cookie("cookie_consent").is_none());
        assert!(page.cookie("cookie_preferences").is_none());
        assert!(page.cookie("site_theme").is_none());
        assert_eq!(page.dom.is_visible(&page.ids.banner), Some(true));
        assert!(page
            .hook
            .calls()
            .ends_with(&[
                TagCall::Consent(ConsentSignal::AnalyticsStorage, ConsentStatus::Denied),
                TagCall::Consent(ConsentSignal::AdStorage, ConsentStatus::Denied),
            ]));

        let mut next_visit = page.controller();
        next_visit.init();
        assert!(!next_visit.has_consent());
    }

    #[test]
    fn consent_marker_expires_after_a_year() {
        let page = Page::new();
        let mut consent = page.controller();
        consent.reject_all();

        page.doc.advance(Duration::days(364));
        let mut next_visit = page.controller();
        next_visit.init();
        assert!(next_visit.has_consent());

        page.doc.advance(Duration::days(2));
        let mut much_later = page.controller();
        much_later.init();
        assert!(!much_later.has_consent());
        assert_eq!(page.dom.is_visible(&page.ids.banner), Some(true));
    }

    #[test]
    fn decision_survives_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let url = url::Url::parse("https://example.com/").unwrap();

        let first_doc = Arc::new(JsonCookieDocument::new(url.clone(), path.clone()).unwrap());
        let mut first = ConsentController::builder()
            .store(Arc::new(DocumentCookieStore::new(first_doc)))
            .build();
        first.init();
        first.accept_all();
        assert!(first.save_theme("dark"));

        let dom = Arc::new(VirtualDom::consent_page(&ElementIds::default()));
        let second_doc = Arc::new(JsonCookieDocument::new(url, path).unwrap());
        let mut second = ConsentController::builder()
            .store(Arc::new(DocumentCookieStore::new(second_doc)))
            .dom(dom.clone())
            .build();
        second.init();

        assert!(second.has_consent());
        assert_eq!(second.preferences(), PreferenceSet::all_granted());
        assert_eq!(dom.theme().as_deref(), Some("dark"));
        assert_eq!(dom.is_visible("cookie-banner"), Some(false));
    }

    #[test]
    fn ui_events_drive_the_controller() {
        let page = Page::new();
        let mut consent = page.controller();
        let bindings = consent.init();

        assert!(bindings.dispatch(&mut consent, &UiEvent::click("cookie-settings-btn")));
        assert_eq!(page.dom.is_visible("cookie-settings-modal"), Some(true));

        assert!(bindings.dispatch(&mut consent, &UiEvent::click("cookie-settings-modal")));
        assert_eq!(page.dom.is_visible("cookie-settings-modal"), Some(false));

        assert!(bindings.dispatch(&mut consent, &UiEvent::click("cookie-settings-btn")));
        page.dom.set_checked("functional-cookies", true);
        page.dom.set_checked("analytics-cookies", true);
        assert!(bindings.dispatch(&mut consent, &UiEvent::click("save-cookie-preferences")));
        assert_eq!(consent.preferences(), PreferenceSet::with_optional(true, true, false));

        assert!(bindings.dispatch(&mut consent, &UiEvent::change("theme-selector", "dark")));
        assert_eq!(page.cookie("site_theme").as_deref(), Some("dark"));

        assert!(!bindings.dispatch(&mut consent, &UiEvent::change("accept-all-cookies", "x")));
        assert!(!bindings.dispatch(&mut consent, &UiEvent::click("unknown")));

        assert!(bindings.dispatch(&mut consent, &UiEvent::click("reject-all-cookies")));
        assert_eq!(consent.preferences(), PreferenceSet::all_denied());
    }

    #[test]
    fn bindings_skip_missing_controls() {
        let page = Page::new();
        page.dom.remove(&page.ids.reject_button);
        page.dom.remove(&page.ids.theme_selector);

        let mut consent = page.controller();
        let bindings = consent.init();

        assert!(!bindings.is_bound("reject-all-cookies"));
        assert!(!bindings.is_bound("theme-selector"));
        assert!(bindings.is_bound("accept-all-cookies"));
        assert!(!bindings.dispatch(&mut consent, &UiEvent::click("reject-all-cookies")));
        assert!(!consent.has_consent());

        assert!(bindings.dispatch(&mut consent, &UiEvent::click("accept-all-cookies")));
        assert!(consent.has_consent());
    }

    #[test]
    fn insecure_page_still_stores_consent() {
        let doc = Arc::new(InMemoryCookieDocument::insecure());
        let store = Arc::new(DocumentCookieStore::new(doc.clone()));
        let mut consent = ConsentController::builder().store(store.clone()).build();

        consent.accept_all();
        assert_eq!(store.get_cookie("cookie_consent").as_deref(), Some("given"));
        assert!(doc.snapshot().cookies.iter().all(|c| !c.secure));
    }

    #[test]
    fn out_of_range_expiry_degrades_without_panicking() {
        let page = Page::new();
        let config = ConsentConfig {
            expiry_days: 4_000_000,
            ..ConsentConfig::default()
        };
        let mut consent = ConsentController::builder()
            .config(config)
            .store(page.store.clone())
            .dom(page.dom.clone())
            .build();

        consent.accept_all();

        assert!(consent.has_consent());
        assert!(page.cookie("cookie_consent").is_none());
        assert!(!consent.save_theme("dark"));
        assert!(page.dom.theme().is_none());
    }
}
