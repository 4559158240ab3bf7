use crate::cookies::SameSite;

/// Cookie names written by the consent manager.
#[derive(Debug, Clone)]
pub struct CookieNames {
    /// Marker cookie whose presence means a decision was made
    pub consent: String,
    /// Serialized preference set
    pub preferences: String,
    /// Functional: selected theme
    pub theme: String,
    /// Functional: preferred language tag
    pub language: String,
    /// Functional: CSS font size
    pub font_size: String,
}

impl Default for CookieNames {
    fn default() -> Self {
        Self {
            consent: "cookie_consent".to_string(),
            preferences: "cookie_preferences".to_string(),
            theme: "site_theme".to_string(),
            language: "preferred_language".to_string(),
            font_size: "font_size".to_string(),
        }
    }
}

/// Element identifiers of the consent UI inside the page.
#[derive(Debug, Clone)]
pub struct ElementIds {
    pub banner: String,
    pub accept_button: String,
    pub reject_button: String,
    pub settings_button: String,
    pub modal: String,
    pub functional_toggle: String,
    pub analytics_toggle: String,
    pub marketing_toggle: String,
    pub save_button: String,
    pub close_button: String,
    pub theme_selector: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            banner: "cookie-banner".to_string(),
            accept_button: "accept-all-cookies".to_string(),
            reject_button: "reject-all-cookies".to_string(),
            settings_button: "cookie-settings-btn".to_string(),
            modal: "cookie-settings-modal".to_string(),
            functional_toggle: "functional-cookies".to_string(),
            analytics_toggle: "analytics-cookies".to_string(),
            marketing_toggle: "marketing-cookies".to_string(),
            save_button: "save-cookie-preferences".to_string(),
            close_button: "close-cookie-modal".to_string(),
            theme_selector: "theme-selector".to_string(),
        }
    }
}

impl ElementIds {
    /// All identifiers, in page order.
    pub fn all(&self) -> [&str; 11] {
        [
            self.banner.as_str(),
            self.accept_button.as_str(),
            self.reject_button.as_str(),
            self.settings_button.as_str(),
            self.modal.as_str(),
            self.functional_toggle.as_str(),
            self.analytics_toggle.as_str(),
            self.marketing_toggle.as_str(),
            self.save_button.as_str(),
            self.close_button.as_str(),
            self.theme_selector.as_str(),
        ]
    }
}

/// Main consent manager configuration.
#[derive(Debug, Clone)]
pub struct ConsentConfig {
    /// Names of all cookies the manager reads and writes
    pub cookie_names: CookieNames,
    /// Literal value stored in the consent marker cookie
    pub consent_marker: String,
    /// Lifetime in days of every persisted cookie
    pub expiry_days: i64,
    /// Request the `Secure` attribute (only honoured on encrypted pages)
    pub secure: bool,
    /// SameSite policy written on every cookie
    pub same_site: SameSite,
    /// DOM ids of every consent UI element
    pub elements: ElementIds,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            cookie_names: CookieNames::default(),
            consent_marker: "given".to_string(),
            expiry_days: 365,
            secure: true,
            same_site: SameSite::Strict,
            elements: ElementIds::default(),
        }
    }
}
