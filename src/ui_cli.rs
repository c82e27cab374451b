use std::io::{self, BufRead, Write};

use crate::app::{max_min_report, AppError, Session};
use crate::balance::{self, AccuracyClass, EvaluationType, ScaleVerificationInput};
use crate::conversion;
use crate::density::{
    self, CylinderDetermination, InSituInput, MassVolumeReading, MaxMinInput,
    MoistureDetermination, PicnometerDetermination, RealDensityInput, SamplePosition,
};
use crate::i18n::{self, keys, Translator};
use crate::input::MaxMinFile;
use crate::output::WaterDensityReport;
use crate::units::water_density;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Moisture,
    InSitu,
    RealDensity,
    MaxMin,
    Scale,
    WaterDensity,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    for key in [
        keys::MAIN_MENU_TITLE,
        keys::MAIN_MENU_MOISTURE,
        keys::MAIN_MENU_IN_SITU,
        keys::MAIN_MENU_REAL_DENSITY,
        keys::MAIN_MENU_MAX_MIN,
        keys::MAIN_MENU_SCALE,
        keys::MAIN_MENU_WATER_DENSITY,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Moisture),
            "2" => return Ok(MenuChoice::InSitu),
            "3" => return Ok(MenuChoice::RealDensity),
            "4" => return Ok(MenuChoice::MaxMin),
            "5" => return Ok(MenuChoice::Scale),
            "6" => return Ok(MenuChoice::WaterDensity),
            "7" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

fn heading(tr: &Translator, n: usize) {
    println!(
        "{}",
        tr.format(keys::HEADING_DETERMINATION, &[("n", n.to_string())])
    );
}

fn read_reading(tr: &Translator) -> Result<MassVolumeReading, AppError> {
    Ok(MassVolumeReading {
        mold_plus_soil_mass: read_f64(tr, keys::PROMPT_MOLD_PLUS_SOIL)?,
        mold_mass: read_f64(tr, keys::PROMPT_MOLD)?,
        volume: read_f64(tr, keys::PROMPT_VOLUME)?,
    })
}

/// 함수비 메뉴를 처리한다.
pub fn handle_moisture(session: &Session<'_>) -> Result<(), AppError> {
    let tr = &session.tr;
    let count = read_count(tr)?;
    let mut dets = Vec::with_capacity(count);
    for n in 1..=count {
        heading(tr, n);
        dets.push(MoistureDetermination {
            capsule_id: read_line(tr.t(keys::PROMPT_CAPSULE_ID))?.trim().to_string(),
            wet_soil_plus_tare_mass: read_f64(tr, keys::PROMPT_WET_TARE)?,
            dry_soil_plus_tare_mass: read_f64(tr, keys::PROMPT_DRY_TARE)?,
            tare_mass: read_f64(tr, keys::PROMPT_TARE)?,
        });
    }
    session.emit(&density::compute_moisture(&dets)?)
}

/// 현장밀도 메뉴를 처리한다.
pub fn handle_in_situ(session: &Session<'_>) -> Result<(), AppError> {
    let tr = &session.tr;
    let count = read_count(tr)?;
    let mut determinations = Vec::with_capacity(count);
    for n in 1..=count {
        heading(tr, n);
        let position = read_position(tr)?;
        determinations.push(CylinderDetermination {
            position,
            reading: read_reading(tr)?,
        });
    }
    let input = InSituInput {
        determinations,
        moisture_top_percent: read_f64(tr, keys::PROMPT_MOISTURE_TOP)?,
        moisture_base_percent: read_f64(tr, keys::PROMPT_MOISTURE_BASE)?,
    };
    session.emit(&density::compute_in_situ(&input)?)
}

/// 흙입자 밀도 메뉴를 처리한다.
pub fn handle_real_density(session: &Session<'_>) -> Result<(), AppError> {
    let tr = &session.tr;
    let unit = read_line(tr.t(keys::PROMPT_TEMPERATURE_UNIT))?;
    let unit = if unit.trim().is_empty() { "C" } else { unit.trim() };
    conversion::parse_temperature_unit(unit)?;
    let count = read_count(tr)?;
    let mut determinations = Vec::with_capacity(count);
    for n in 1..=count {
        heading(tr, n);
        determinations.push(PicnometerDetermination {
            picnometer_mass: read_f64(tr, keys::PROMPT_PICNOMETER)?,
            picnometer_plus_soil_plus_water_mass: read_f64(tr, keys::PROMPT_PIC_SOIL_WATER)?,
            picnometer_plus_water_mass: read_f64(tr, keys::PROMPT_PIC_WATER)?,
            temperature_c: read_optional_f64(tr, keys::PROMPT_TEMPERATURE_OPTIONAL)?
                .map(|t| conversion::temperature_to_celsius(t, unit))
                .transpose()?,
            wet_soil_mass: read_f64(tr, keys::PROMPT_WET_SOIL)?,
        });
    }
    let input = RealDensityInput {
        determinations,
        moisture_percent: read_f64(tr, keys::PROMPT_MOISTURE_AVERAGE)?,
    };
    session.emit(&density::compute_real_density(&input)?)
}

/// 최대/최소 밀도 메뉴를 처리한다.
pub fn handle_max_min(session: &Session<'_>) -> Result<(), AppError> {
    let tr = &session.tr;
    let read_extremum = |title: &str| -> Result<Vec<MassVolumeReading>, AppError> {
        println!("{}", tr.t(title));
        let count = read_count(tr)?;
        let mut readings = Vec::with_capacity(count);
        for n in 1..=count {
            heading(tr, n);
            readings.push(read_reading(tr)?);
        }
        Ok(readings)
    };
    let max_determinations = read_extremum(keys::HEADING_MAX)?;
    let min_determinations = read_extremum(keys::HEADING_MIN)?;
    let file = MaxMinFile {
        max_min: MaxMinInput {
            max_determinations,
            min_determinations,
        },
        dry_density_top: read_optional_f64(tr, keys::PROMPT_IN_SITU_TOP)?,
        dry_density_base: read_optional_f64(tr, keys::PROMPT_IN_SITU_BASE)?,
        grain_density: read_optional_f64(tr, keys::PROMPT_GRAIN_DENSITY)?,
    };
    session.emit(&max_min_report(&file, session.config)?)
}

/// 저울 검정 메뉴를 처리한다.
pub fn handle_scale(session: &Session<'_>) -> Result<(), AppError> {
    let tr = &session.tr;
    let accuracy_class = loop {
        let s = read_line(tr.t(keys::PROMPT_ACCURACY_CLASS))?;
        if let Some(class) = AccuracyClass::parse(&s) {
            break class;
        }
        println!("{}", tr.t(keys::INVALID_SELECTION_RETRY));
    };
    let verification_scale_interval = read_f64(tr, keys::PROMPT_INTERVAL)?;
    let evaluation_type = loop {
        match read_line(tr.t(keys::PROMPT_EVALUATION))?.trim() {
            "1" => break EvaluationType::ModelApproval,
            "2" => break EvaluationType::Verification,
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    };
    let unit = read_line(tr.t(keys::PROMPT_WEIGHT_UNIT))?;
    let unit = if unit.trim().is_empty() { "kg" } else { unit.trim() };
    let reference_weight = conversion::mass_to_kg(read_f64(tr, keys::PROMPT_REFERENCE)?, unit)?;
    let measured_result = conversion::mass_to_kg(read_f64(tr, keys::PROMPT_MEASURED)?, unit)?;
    let input = ScaleVerificationInput {
        accuracy_class,
        verification_scale_interval,
        evaluation_type,
        reference_weight,
        measured_result,
    };
    session.emit(&balance::verify_scale(&input)?)
}

/// 물의 밀도 메뉴를 처리한다.
pub fn handle_water_density(session: &Session<'_>) -> Result<(), AppError> {
    let tr = &session.tr;
    let temperature = read_f64(tr, keys::PROMPT_TEMPERATURE)?;
    let unit = read_line(tr.t(keys::PROMPT_TEMPERATURE_UNIT))?;
    let unit = if unit.trim().is_empty() { "C" } else { unit.trim() };
    let temperature_c = conversion::temperature_to_celsius(temperature, unit)?;
    session.emit(&WaterDensityReport {
        temperature_c: Some(temperature_c),
        water_density: water_density(Some(temperature_c)),
    })
}

/// 설정 메뉴를 처리한다. 언어를 바꾸면 번역기도 다시 만든다.
pub fn handle_settings(session: &mut Session<'_>) -> Result<(), AppError> {
    let tr = &session.tr;
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{}",
        tr.format(
            keys::SETTINGS_CURRENT_LANGUAGE,
            &[("lang", session.config.language.clone())]
        )
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    let language = match sel.trim() {
        "" => return Ok(()),
        "1" => "auto",
        "2" => "pt-br",
        "3" => "en-us",
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(());
        }
    };
    session.config.language = language.to_string();
    let resolved = i18n::resolve_language(language, None);
    session.tr =
        Translator::new_with_pack(&resolved, session.config.language_pack_dir.as_deref());
    Ok(())
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    read_line_from(&mut io::stdin().lock())
}

/// 한 줄을 읽는다. EOF면 `AppError::InputClosed`.
fn read_line_from<R: BufRead>(reader: &mut R) -> Result<String, AppError> {
    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Err(AppError::InputClosed);
    }
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt_key: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(tr.t(prompt_key))?;
        match s.trim().replace(',', ".").parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

/// 빈 입력은 `None`(미측정)으로 본다.
fn read_optional_f64(tr: &Translator, prompt_key: &str) -> Result<Option<f64>, AppError> {
    loop {
        let s = read_line(tr.t(prompt_key))?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        match s.replace(',', ".").parse::<f64>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_count(tr: &Translator) -> Result<usize, AppError> {
    loop {
        let s = read_line(tr.t(keys::PROMPT_COUNT))?;
        match s.trim().parse::<usize>() {
            Ok(n) => return Ok(n),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_position(tr: &Translator) -> Result<SamplePosition, AppError> {
    loop {
        match read_line(tr.t(keys::PROMPT_POSITION))?.trim() {
            "1" => return Ok(SamplePosition::Top),
            "2" => return Ok(SamplePosition::Base),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn closed_input_stops_prompting() {
        let mut reader = Cursor::new("");
        assert!(matches!(
            read_line_from(&mut reader),
            Err(AppError::InputClosed)
        ));
    }

    #[test]
    fn blank_line_is_not_end_of_input() {
        let mut reader = Cursor::new("\n2,5\n");
        assert_eq!(read_line_from(&mut reader).unwrap(), "\n");
        assert_eq!(read_line_from(&mut reader).unwrap(), "2,5\n");
        assert!(matches!(
            read_line_from(&mut reader),
            Err(AppError::InputClosed)
        ));
    }
}
