use thiserror::Error;

use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("알 수 없는 단위: {0}")]
    UnknownUnit(String),
}

/// 단위 문자열을 질량 단위로 해석한다. 예: `kg`, `g`, `mg`.
pub fn parse_mass_unit(s: &str) -> Result<MassUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "kg" | "kilogram" | "quilograma" => Ok(MassUnit::Kilogram),
        "g" | "gram" | "grama" => Ok(MassUnit::Gram),
        "mg" | "milligram" | "miligrama" => Ok(MassUnit::Milligram),
        other => Err(ConversionError::UnknownUnit(other.to_string())),
    }
}

/// 단위 문자열을 온도 단위로 해석한다. 예: `C`, `°C`, `K`, `F`.
pub fn parse_temperature_unit(s: &str) -> Result<TemperatureUnit, ConversionError> {
    match s.trim().trim_start_matches('°').to_lowercase().as_str() {
        "c" | "celsius" => Ok(TemperatureUnit::Celsius),
        "k" | "kelvin" => Ok(TemperatureUnit::Kelvin),
        "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
        other => Err(ConversionError::UnknownUnit(other.to_string())),
    }
}

/// 문자열 단위로 받은 온도를 °C로 환산한다.
pub fn temperature_to_celsius(value: f64, unit_str: &str) -> Result<f64, ConversionError> {
    let unit = parse_temperature_unit(unit_str)?;
    Ok(convert_temperature(value, unit, TemperatureUnit::Celsius))
}

/// 문자열 단위로 받은 질량을 kg으로 환산한다.
pub fn mass_to_kg(value: f64, unit_str: &str) -> Result<f64, ConversionError> {
    let unit = parse_mass_unit(unit_str)?;
    Ok(convert_mass(value, unit, MassUnit::Kilogram))
}
