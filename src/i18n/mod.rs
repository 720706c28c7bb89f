//! Internationalization (i18n) support
//!
//! English and Spanish strings are embedded in the binary. A site may
//! override any key with `<i18n_dir>/<lang>.yml`.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

type Translations = HashMap<String, serde_yaml::Value>;

const EMBEDDED: [(&str, &str); 2] = [
    ("en", include_str!("locales/en.yml")),
    ("es", include_str!("locales/es.yml")),
];

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, Translations>,
}

impl I18n {
    /// Create a handler with only the embedded strings
    pub fn new(language: &str) -> Self {
        let mut translations = HashMap::new();
        for (lang, source) in EMBEDDED {
            match serde_yaml::from_str::<Translations>(source) {
                Ok(data) => {
                    translations.insert(lang.to_string(), data);
                }
                Err(e) => tracing::error!("Embedded locale {} is invalid: {}", lang, e),
            }
        }

        Self {
            language: language.to_string(),
            translations,
        }
    }

    /// Load override files from a directory
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<Translations>(&content) {
                Ok(data) => {
                    let target = self.translations.entry(lang.to_string()).or_default();
                    for (key, value) in data {
                        merge_yaml(target.entry(key).or_insert(serde_yaml::Value::Null), value);
                    }
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by dotted key, falling back to English then the key
    pub fn get(&self, key: &str) -> String {
        self.lookup(&self.language, key)
            .or_else(|| self.lookup("en", key))
            .unwrap_or_else(|| key.to_string())
    }

    /// Get a translation and fill its `{name}` placeholders
    ///
    /// # Examples
    /// ```ignore
    /// i18n.format("cta.call", &[("phone", "(555) 014-2290")]) // -> "Call (555) 014-2290"
    /// ```
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.get(key), args)
    }

    /// Check if a translation exists in the current language
    pub fn has(&self, key: &str) -> bool {
        self.lookup(&self.language, key).is_some()
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<String> {
        let data = self.translations.get(lang)?;
        get_nested_value(data, key).and_then(yaml_value_to_string)
    }

    /// Get all translations for the current language as a flat HashMap
    /// This flattens nested keys using dot notation (e.g., "nav.home")
    pub fn get_all_translations(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();

        if let Some(lang_data) = self.translations.get(&self.language) {
            flatten_translations(lang_data, "", &mut result);
        }

        // Merge with English fallback for missing keys
        if self.language != "en" {
            if let Some(en_data) = self.translations.get("en") {
                let mut en_result = HashMap::new();
                flatten_translations(en_data, "", &mut en_result);
                for (k, v) in en_result {
                    result.entry(k).or_insert(v);
                }
            }
        }

        result
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new("en")
    }
}

/// Replace `{name}` placeholders; unknown placeholders are left as is
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(data: &'a Translations, key: &str) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?)?;

    for part in parts {
        match current {
            serde_yaml::Value::Mapping(map) => {
                current = map.get(serde_yaml::Value::String(part.to_string()))?;
            }
            _ => return None,
        }
    }

    Some(current)
}

/// Convert a scalar YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Overlay `value` onto `target`, recursing into mappings
fn merge_yaml(target: &mut serde_yaml::Value, value: serde_yaml::Value) {
    match (target, value) {
        (serde_yaml::Value::Mapping(target), serde_yaml::Value::Mapping(source)) => {
            for (k, v) in source {
                match target.get_mut(&k) {
                    Some(existing) => merge_yaml(existing, v),
                    None => {
                        target.insert(k, v);
                    }
                }
            }
        }
        (target, value) => *target = value,
    }
}

/// Flatten translations into a HashMap with dot-notation keys
fn flatten_translations(data: &Translations, prefix: &str, result: &mut HashMap<String, String>) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                let nested: Translations = map
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            other => {
                if let Some(s) = yaml_value_to_string(other) {
                    result.insert(full_key, s);
                }
            }
        }
    }
}
