use std::{collections::HashMap, fs, path::Path};

use anyhow::Result;
use bird_finder_core::text::{Translations, DEFAULT_LANG};

/// Load the UI strings of `lang` from `{dir}/{lang}.json`.
///
/// Falls back to untranslated strings if the file is missing or broken.
pub fn load_translations(dir: &Path, lang: &str) -> Translations {
    if lang == DEFAULT_LANG {
        return Translations::identity(lang);
    }
    let file_path = dir.join(format!("{lang}.json"));
    match read_strings(&file_path) {
        Ok(strings) => {
            log::debug!("Loaded {} strings from {}", strings.len(), file_path.display());
            Translations::new(lang, strings)
        }
        Err(err) => {
            log::warn!(
                "Unable to load translations from {}: {err}",
                file_path.display()
            );
            Translations::identity(lang)
        }
    }
}

fn read_strings(file_path: &Path) -> Result<HashMap<String, String>> {
    let json = fs::read_to_string(file_path)?;
    let strings = serde_json::from_str(&json)?;
    Ok(strings)
}
