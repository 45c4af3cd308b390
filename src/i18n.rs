use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use yuuka::derive_struct;

// Include translation TOML at compile time
const EN_US_TOML: &str = include_str!("../res/i18n/en_us.toml");
const ZH_CHS_TOML: &str = include_str!("../res/i18n/zh_chs.toml");

derive_struct! {
    #[derive(PartialEq, Serialize, Deserialize)]
    pub Lang {
        title: String = "title".to_string(),
        // panels
        controls: String = "controls".to_string(),
        received: String = "received".to_string(),
        no_com_ports: String = "no_com_ports".to_string(),
        // labels
        label_baud: String = "label_baud".to_string(),
        label_connection: String = "label_connection".to_string(),
        label_logging: String = "label_logging".to_string(),
        port_locked: String = "port_locked".to_string(),
        // connection & logging states
        state_connected: String = "state_connected".to_string(),
        state_disconnected: String = "state_disconnected".to_string(),
        state_logging: String = "state_logging".to_string(),
        state_idle: String = "state_idle".to_string(),
        rows: String = "rows".to_string(),
        // action labels
        connect: String = "connect".to_string(),
        disconnect: String = "disconnect".to_string(),
        start_logging: String = "start_logging".to_string(),
        stop_logging: String = "stop_logging".to_string(),
        // status line
        last: String = "last".to_string(),
        last_none: String = "last_none".to_string(),
        follow: String = "follow".to_string(),
        // bottom hints
        hint_select_port: String = "hint_select_port".to_string(),
        hint_select_baud: String = "hint_select_baud".to_string(),
        hint_refresh: String = "hint_refresh".to_string(),
        hint_scroll: String = "hint_scroll".to_string(),
        press_q_quit: String = "press_q_quit".to_string(),
    }
}

static LANG_SELECTED: OnceCell<Lang> = OnceCell::new();
static LOCALE: OnceCell<String> = OnceCell::new();

fn parse_toml_to_lang(content: &str) -> Lang {
    match toml::from_str::<Lang>(content) {
        Ok(l) => l,
        Err(e) => {
            log::warn!(
                "i18n: failed to parse toml: {}\ncontent preview: {}",
                e,
                &content.chars().take(200).collect::<String>()
            );
            // Fallback: keys as values
            Lang::default()
        }
    }
}

/// Return a reference to the currently selected `Lang`.
/// Callers can access fields directly, e.g. `i18n::lang().title`.
pub fn lang() -> &'static Lang {
    // Before `init_i18n` runs (e.g. in tests) fall back to English.
    LANG_SELECTED.get_or_init(|| parse_toml_to_lang(EN_US_TOML))
}

/// Map locale preference strings (from `LANGUAGE`, `LC_ALL`, `LANG`) to a
/// bundled locale key.
pub fn choose_locale(prefs: &[String]) -> &'static str {
    for p in prefs {
        let p = p.to_lowercase();
        if p.contains("zh") {
            return "zh_chs";
        }
        if p.contains("en") {
            return "en_us";
        }
    }
    "en_us"
}

pub fn init_i18n() {
    let mut prefs: Vec<String> = Vec::new();
    if let Ok(v) = std::env::var("LANGUAGE") {
        prefs.extend(v.split(':').map(|s| s.to_string()));
    }
    if let Ok(v) = std::env::var("LC_ALL") {
        prefs.push(v);
    }
    if let Ok(v) = std::env::var("LANG") {
        prefs.push(v);
    }

    let locale = choose_locale(&prefs);
    let chosen = match locale {
        "zh_chs" => parse_toml_to_lang(ZH_CHS_TOML),
        _ => parse_toml_to_lang(EN_US_TOML),
    };
    LOCALE.set(locale.to_string()).ok();
    LANG_SELECTED.set(chosen).ok();

    let user = whoami::username();
    log::info!(
        "i18n: user={} locale={}",
        user,
        LOCALE.get().map(|s| s.as_str()).unwrap_or("-")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_translations_parse_completely() {
        let defaults = Lang::default();
        for content in [EN_US_TOML, ZH_CHS_TOML] {
            let parsed: Lang = toml::from_str(content).unwrap();
            assert_ne!(parsed, defaults);
            assert_ne!(parsed.connect, "connect");
        }
    }

    #[test]
    fn english_action_labels() {
        let en = parse_toml_to_lang(EN_US_TOML);
        assert_eq!(en.connect, "Connect");
        assert_eq!(en.disconnect, "Disconnect");
        assert_eq!(en.start_logging, "Start Logging");
        assert_eq!(en.stop_logging, "Stop Logging");
    }

    #[test]
    fn locale_preferences() {
        assert_eq!(choose_locale(&["zh_CN.UTF-8".to_string()]), "zh_chs");
        assert_eq!(choose_locale(&["en_GB.UTF-8".to_string()]), "en_us");
        assert_eq!(choose_locale(&["C".to_string()]), "en_us");
        assert_eq!(choose_locale(&[]), "en_us");
    }
}
