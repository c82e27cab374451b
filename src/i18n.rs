use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const NOT_AVAILABLE: &str = "general.not_available";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_MOISTURE: &str = "main_menu.moisture";
    pub const MAIN_MENU_IN_SITU: &str = "main_menu.in_situ";
    pub const MAIN_MENU_REAL_DENSITY: &str = "main_menu.real_density";
    pub const MAIN_MENU_MAX_MIN: &str = "main_menu.max_min";
    pub const MAIN_MENU_SCALE: &str = "main_menu.scale";
    pub const MAIN_MENU_WATER_DENSITY: &str = "main_menu.water_density";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const HEADING_DETERMINATION: &str = "heading.determination";
    pub const HEADING_MAX: &str = "heading.max";
    pub const HEADING_MIN: &str = "heading.min";

    pub const PROMPT_COUNT: &str = "prompt.count";
    pub const PROMPT_CAPSULE_ID: &str = "prompt.capsule_id";
    pub const PROMPT_WET_TARE: &str = "prompt.wet_tare";
    pub const PROMPT_DRY_TARE: &str = "prompt.dry_tare";
    pub const PROMPT_TARE: &str = "prompt.tare";
    pub const PROMPT_POSITION: &str = "prompt.position";
    pub const PROMPT_MOLD_PLUS_SOIL: &str = "prompt.mold_plus_soil";
    pub const PROMPT_MOLD: &str = "prompt.mold";
    pub const PROMPT_VOLUME: &str = "prompt.volume";
    pub const PROMPT_MOISTURE_TOP: &str = "prompt.moisture_top";
    pub const PROMPT_MOISTURE_BASE: &str = "prompt.moisture_base";
    pub const PROMPT_MOISTURE_AVERAGE: &str = "prompt.moisture_average";
    pub const PROMPT_PICNOMETER: &str = "prompt.picnometer";
    pub const PROMPT_PIC_SOIL_WATER: &str = "prompt.pic_soil_water";
    pub const PROMPT_PIC_WATER: &str = "prompt.pic_water";
    pub const PROMPT_TEMPERATURE_OPTIONAL: &str = "prompt.temperature_optional";
    pub const PROMPT_TEMPERATURE: &str = "prompt.temperature";
    pub const PROMPT_TEMPERATURE_UNIT: &str = "prompt.temperature_unit";
    pub const PROMPT_WET_SOIL: &str = "prompt.wet_soil";
    pub const PROMPT_IN_SITU_TOP: &str = "prompt.in_situ_top";
    pub const PROMPT_IN_SITU_BASE: &str = "prompt.in_situ_base";
    pub const PROMPT_GRAIN_DENSITY: &str = "prompt.grain_density";
    pub const PROMPT_ACCURACY_CLASS: &str = "prompt.accuracy_class";
    pub const PROMPT_INTERVAL: &str = "prompt.interval";
    pub const PROMPT_EVALUATION: &str = "prompt.evaluation";
    pub const PROMPT_WEIGHT_UNIT: &str = "prompt.weight_unit";
    pub const PROMPT_REFERENCE: &str = "prompt.reference";
    pub const PROMPT_MEASURED: &str = "prompt.measured";

    pub const RESULT_MOISTURE_LINE: &str = "result.moisture_line";
    pub const RESULT_MOISTURE_AVERAGE: &str = "result.moisture_average";
    pub const RESULT_MOISTURE_USED: &str = "result.moisture_used";
    pub const RESULT_CYLINDER_LINE: &str = "result.cylinder_line";
    pub const RESULT_AVERAGE_DRY_DENSITY: &str = "result.average_dry_density";
    pub const RESULT_DRY_DENSITY_TOP: &str = "result.dry_density_top";
    pub const RESULT_DRY_DENSITY_BASE: &str = "result.dry_density_base";
    pub const RESULT_PICNOMETER_LINE: &str = "result.picnometer_line";
    pub const RESULT_REAL_AVERAGE: &str = "result.real_average";
    pub const RESULT_REAL_DIFFERENCE: &str = "result.real_difference";
    pub const RESULT_EXTREMUM_LINE: &str = "result.extremum_line";
    pub const RESULT_VOID_RATIO_MAX: &str = "result.void_ratio_max";
    pub const RESULT_GRAIN_VOID_EXTREMA: &str = "result.grain_void_extrema";
    pub const RESULT_COMPACTNESS_LINE: &str = "result.compactness_line";
    pub const RESULT_COMPACTNESS_AVERAGE: &str = "result.compactness_average";
    pub const RESULT_SCALE_LINE: &str = "result.scale_line";
    pub const RESULT_WATER_DENSITY: &str = "result.water_density";
    pub const RESULT_STATUS: &str = "result.status";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Pt,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Pt
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Pt => "pt-br",
            Language::En => "en-us",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(pt-br/en-us)에 따라 번역기를 생성한다. 알 수 없는 코드는 pt-br로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    #[cfg(test)]
    fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 언어팩 → 선택 언어 → 포르투갈어 순으로 찾는다.
    pub fn t(&self, key: &str) -> &str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| pt(key)),
            Language::Pt => pt(key),
        }
    }

    /// `{name}` 자리표시자를 채운 번역 문자열.
    pub fn format(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(self.t(key), vars)
    }
}

pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "pt-br".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("pt") => Some("pt-br".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    get_locale()
        .or_else(|| std::env::var("LANG").ok())
        .or_else(|| std::env::var("LC_ALL").ok())
        .and_then(|loc| {
            let lang = loc.split(['.', '_', '-']).next().unwrap_or_default().to_string();
            normalize_lang(&lang)
        })
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Table = toml::from_str(src).ok()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in &value {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn pt(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "Erro",
        APP_EXIT => "Encerrando o programa.",
        NOT_AVAILABLE => "-",
        MAIN_MENU_TITLE => "\n=== Laboratório de Densidade de Solos ===",
        MAIN_MENU_MOISTURE => "1) Teor de umidade",
        MAIN_MENU_IN_SITU => "2) Densidade in situ",
        MAIN_MENU_REAL_DENSITY => "3) Densidade real (picnômetro)",
        MAIN_MENU_MAX_MIN => "4) Densidade máxima/mínima e compacidade",
        MAIN_MENU_SCALE => "5) Verificação de balança (INMETRO)",
        MAIN_MENU_WATER_DENSITY => "6) Densidade da água",
        MAIN_MENU_SETTINGS => "7) Configurações",
        MAIN_MENU_EXIT => "0) Sair",
        PROMPT_MENU_SELECT => "Escolha uma opção: ",
        INVALID_SELECTION_RETRY => "Opção inválida. Tente novamente.",
        ERROR_INVALID_NUMBER => "Digite um número.",
        HEADING_DETERMINATION => "-- Determinação {n} --",
        HEADING_MAX => "\n-- Densidade máxima --",
        HEADING_MIN => "\n-- Densidade mínima --",
        PROMPT_COUNT => "Número de determinações: ",
        PROMPT_CAPSULE_ID => "Cápsula nº: ",
        PROMPT_WET_TARE => "Solo úmido + tara [g]: ",
        PROMPT_DRY_TARE => "Solo seco + tara [g]: ",
        PROMPT_TARE => "Tara [g]: ",
        PROMPT_POSITION => "Posição (1=topo, 2=base): ",
        PROMPT_MOLD_PLUS_SOIL => "Molde + solo [g]: ",
        PROMPT_MOLD => "Molde [g]: ",
        PROMPT_VOLUME => "Volume [cm³]: ",
        PROMPT_MOISTURE_TOP => "Umidade média do topo [%]: ",
        PROMPT_MOISTURE_BASE => "Umidade média da base [%]: ",
        PROMPT_MOISTURE_AVERAGE => "Umidade média da amostra [%]: ",
        PROMPT_PICNOMETER => "Picnômetro [g]: ",
        PROMPT_PIC_SOIL_WATER => "Picnômetro + solo + água [g]: ",
        PROMPT_PIC_WATER => "Picnômetro + água [g]: ",
        PROMPT_TEMPERATURE_OPTIONAL => "Temperatura (vazio = não medida): ",
        PROMPT_TEMPERATURE => "Temperatura: ",
        PROMPT_TEMPERATURE_UNIT => "Unidade (C, K, F): ",
        PROMPT_WET_SOIL => "Solo úmido [g]: ",
        PROMPT_IN_SITU_TOP => "Densidade seca in situ do topo [g/cm³] (vazio = sem dado): ",
        PROMPT_IN_SITU_BASE => "Densidade seca in situ da base [g/cm³] (vazio = sem dado): ",
        PROMPT_GRAIN_DENSITY => "Densidade real dos grãos [g/cm³] (vazio = sem dado): ",
        PROMPT_ACCURACY_CLASS => "Classe de exatidão (I, II, III, IIII): ",
        PROMPT_INTERVAL => "Divisão de verificação e [g]: ",
        PROMPT_EVALUATION => "Avaliação (1=aprovação de modelo, 2=verificação): ",
        PROMPT_WEIGHT_UNIT => "Unidade das massas (kg, g): ",
        PROMPT_REFERENCE => "Peso padrão: ",
        PROMPT_MEASURED => "Indicação da balança: ",
        RESULT_MOISTURE_LINE => {
            "Cápsula {id}: solo seco {dry} g, água {water} g, umidade {moisture} %"
        }
        RESULT_MOISTURE_AVERAGE => "Umidade média: {moisture} %",
        RESULT_MOISTURE_USED => "Umidade considerada (média topo/base): {moisture} %",
        RESULT_CYLINDER_LINE => {
            "{position}: solo {soil} g, γ úmido {wet} g/cm³, γ seco {dry} g/cm³"
        }
        RESULT_AVERAGE_DRY_DENSITY => "Densidade seca média: {value} g/cm³",
        RESULT_DRY_DENSITY_TOP => "Densidade seca do topo: {value} g/cm³",
        RESULT_DRY_DENSITY_BASE => "Densidade seca da base: {value} g/cm³",
        RESULT_PICNOMETER_LINE => {
            "Determinação {n}: solo seco {dry} g, ρw {water} g/cm³, densidade real {real} g/cm³"
        }
        RESULT_REAL_AVERAGE => "Densidade real média: {value} g/cm³",
        RESULT_REAL_DIFFERENCE => "Diferença entre determinações: {value} g/cm³ (limite {limit})",
        RESULT_EXTREMUM_LINE => "{label}: {values} → média {average} g/cm³",
        RESULT_VOID_RATIO_MAX => "Índice de vazios máx (γdmax − γdmin)/(γdmin·γdmax): {value}",
        RESULT_GRAIN_VOID_EXTREMA => "Índice de vazios pela massa específica dos grãos máx/mín: {max} / {min}",
        RESULT_COMPACTNESS_LINE => {
            "{position}: γd {dry} g/cm³, CR {percent} %, índice de vazios {void} → {status}"
        }
        RESULT_COMPACTNESS_AVERAGE => "Compacidade relativa média: {value} %",
        RESULT_SCALE_LINE => {
            "Carga {load} e, erro {error} g, EMA {ema} g ({multiplier} e) → {status}"
        }
        RESULT_WATER_DENSITY => "Densidade da água: {value} g/cm³",
        RESULT_STATUS => "Situação: {status}",
        SETTINGS_HEADING => "\n-- Configurações --",
        SETTINGS_CURRENT_LANGUAGE => "Idioma atual: {lang}",
        SETTINGS_OPTIONS => "1) Automático  2) Português  3) English",
        SETTINGS_PROMPT_CHANGE => "Nova opção (Enter para cancelar): ",
        SETTINGS_INVALID => "Opção inválida; nada foi alterado.",
        SETTINGS_SAVED => "Configuração salva.",
        _ => "???",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        MAIN_MENU_TITLE => "\n=== Soil Density Laboratory ===",
        MAIN_MENU_MOISTURE => "1) Moisture content",
        MAIN_MENU_IN_SITU => "2) In-situ density",
        MAIN_MENU_REAL_DENSITY => "3) Real density (picnometer)",
        MAIN_MENU_MAX_MIN => "4) Max/min density and compactness",
        MAIN_MENU_SCALE => "5) Scale verification (INMETRO)",
        MAIN_MENU_WATER_DENSITY => "6) Water density",
        MAIN_MENU_SETTINGS => "7) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select an option: ",
        INVALID_SELECTION_RETRY => "Invalid selection. Try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        HEADING_DETERMINATION => "-- Determination {n} --",
        HEADING_MAX => "\n-- Maximum density --",
        HEADING_MIN => "\n-- Minimum density --",
        PROMPT_COUNT => "Number of determinations: ",
        PROMPT_CAPSULE_ID => "Capsule id: ",
        PROMPT_WET_TARE => "Wet soil + tare [g]: ",
        PROMPT_DRY_TARE => "Dry soil + tare [g]: ",
        PROMPT_TARE => "Tare [g]: ",
        PROMPT_POSITION => "Position (1=top, 2=base): ",
        PROMPT_MOLD_PLUS_SOIL => "Mold + soil [g]: ",
        PROMPT_MOLD => "Mold [g]: ",
        PROMPT_VOLUME => "Volume [cm³]: ",
        PROMPT_MOISTURE_TOP => "Top average moisture [%]: ",
        PROMPT_MOISTURE_BASE => "Base average moisture [%]: ",
        PROMPT_MOISTURE_AVERAGE => "Sample average moisture [%]: ",
        PROMPT_PICNOMETER => "Picnometer [g]: ",
        PROMPT_PIC_SOIL_WATER => "Picnometer + soil + water [g]: ",
        PROMPT_PIC_WATER => "Picnometer + water [g]: ",
        PROMPT_TEMPERATURE_OPTIONAL => "Temperature (empty = not measured): ",
        PROMPT_TEMPERATURE => "Temperature: ",
        PROMPT_TEMPERATURE_UNIT => "Unit (C, K, F): ",
        PROMPT_WET_SOIL => "Wet soil [g]: ",
        PROMPT_IN_SITU_TOP => "Top in-situ dry density [g/cm³] (empty = none): ",
        PROMPT_IN_SITU_BASE => "Base in-situ dry density [g/cm³] (empty = none): ",
        PROMPT_GRAIN_DENSITY => "Grain density [g/cm³] (empty = none): ",
        PROMPT_ACCURACY_CLASS => "Accuracy class (I, II, III, IIII): ",
        PROMPT_INTERVAL => "Verification scale interval e [g]: ",
        PROMPT_EVALUATION => "Evaluation (1=model approval, 2=verification): ",
        PROMPT_WEIGHT_UNIT => "Mass unit (kg, g): ",
        PROMPT_REFERENCE => "Reference weight: ",
        PROMPT_MEASURED => "Scale reading: ",
        RESULT_MOISTURE_LINE => {
            "Capsule {id}: dry soil {dry} g, water {water} g, moisture {moisture} %"
        }
        RESULT_MOISTURE_AVERAGE => "Average moisture: {moisture} %",
        RESULT_MOISTURE_USED => "Moisture applied (top/base mean): {moisture} %",
        RESULT_CYLINDER_LINE => "{position}: soil {soil} g, wet γ {wet} g/cm³, dry γ {dry} g/cm³",
        RESULT_AVERAGE_DRY_DENSITY => "Average dry density: {value} g/cm³",
        RESULT_DRY_DENSITY_TOP => "Top dry density: {value} g/cm³",
        RESULT_DRY_DENSITY_BASE => "Base dry density: {value} g/cm³",
        RESULT_PICNOMETER_LINE => {
            "Determination {n}: dry soil {dry} g, ρw {water} g/cm³, real density {real} g/cm³"
        }
        RESULT_REAL_AVERAGE => "Average real density: {value} g/cm³",
        RESULT_REAL_DIFFERENCE => "Difference between determinations: {value} g/cm³ (limit {limit})",
        RESULT_EXTREMUM_LINE => "{label}: {values} → mean {average} g/cm³",
        RESULT_VOID_RATIO_MAX => "Void ratio max (γdmax − γdmin)/(γdmin·γdmax): {value}",
        RESULT_GRAIN_VOID_EXTREMA => "Void ratio from grain density max/min: {max} / {min}",
        RESULT_COMPACTNESS_LINE => {
            "{position}: γd {dry} g/cm³, CR {percent} %, void ratio {void} → {status}"
        }
        RESULT_COMPACTNESS_AVERAGE => "Mean relative compactness: {value} %",
        RESULT_SCALE_LINE => "Load {load} e, error {error} g, MPE {ema} g ({multiplier} e) → {status}",
        RESULT_WATER_DENSITY => "Water density: {value} g/cm³",
        RESULT_STATUS => "Status: {status}",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language: {lang}",
        SETTINGS_OPTIONS => "1) Automatic  2) Português  3) English",
        SETTINGS_PROMPT_CHANGE => "New option (Enter to cancel): ",
        SETTINGS_INVALID => "Invalid option; nothing changed.",
        SETTINGS_SAVED => "Settings saved.",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_falls_back_to_portuguese() {
        let tr = Translator::new("en-us");
        assert_eq!(tr.t(keys::NOT_AVAILABLE), "-");
        assert_eq!(tr.t(keys::APP_EXIT), "Exiting.");
    }

    #[test]
    fn unknown_code_resolves_to_portuguese() {
        assert_eq!(Translator::new("xx").language(), Language::Pt);
        assert_eq!(resolve_language("EN", None), "en-us");
        assert_eq!(resolve_language("auto", Some("pt")), "pt-br");
    }

    #[test]
    fn format_fills_placeholders() {
        let tr = Translator::new("pt-br");
        let s = tr.format(keys::RESULT_STATUS, &[("status", "APROVADO".into())]);
        assert_eq!(s, "Situação: APROVADO");
    }

    #[test]
    fn pack_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en.toml"),
            "[general]\napp_exit = \"Bye\"\n",
        )
        .unwrap();
        let tr = Translator::new_with_pack("en-us", dir.path().to_str());
        assert_eq!(tr.t(keys::APP_EXIT), "Bye");
        assert_eq!(tr.t(keys::ERROR_PREFIX), "Error");
    }
}
