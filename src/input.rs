//! CLI에서 받는 TOML 입력 파일 형식.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::balance::{ScaleSeriesInput, ScaleVerificationInput};
use crate::conversion::{self, ConversionError};
use crate::density::{MaxMinInput, MoistureDetermination, RealDensityInput};
use crate::units::{convert_temperature, TemperatureUnit};

/// 입력 파일을 읽다가 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum InputFileError {
    #[error("{path}: 파일을 읽을 수 없음: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: 입력 형식 오류: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// TOML 파일을 입력 레코드로 읽는다.
pub fn load_input<T: DeserializeOwned>(path: &Path) -> Result<T, InputFileError> {
    let content = fs::read_to_string(path).map_err(|source| InputFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_input(path, &content)
}

fn parse_input<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, InputFileError> {
    toml::from_str(content).map_err(|source| InputFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 함수비 입력 파일: `[[determinations]]` 표 배열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoistureFile {
    pub determinations: Vec<MoistureDetermination>,
}

/// 흙입자 밀도 입력 파일. 온도는 `temperature_unit`(기본 `C`) 단위로 적는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealDensityFile {
    #[serde(flatten)]
    pub real_density: RealDensityInput,
    #[serde(default = "default_temperature_unit")]
    pub temperature_unit: String,
}

fn default_temperature_unit() -> String {
    "C".to_string()
}

impl RealDensityFile {
    /// 온도를 °C로 환산한 계산 입력을 돌려준다.
    pub fn into_input(self) -> Result<RealDensityInput, ConversionError> {
        let unit = conversion::parse_temperature_unit(&self.temperature_unit)?;
        let mut input = self.real_density;
        for det in &mut input.determinations {
            det.temperature_c = det
                .temperature_c
                .map(|t| convert_temperature(t, unit, TemperatureUnit::Celsius));
        }
        Ok(input)
    }
}

/// 최대/최소 밀도 입력 파일. 현장 건조밀도가 있으면 상대다짐도까지 계산한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxMinFile {
    #[serde(flatten)]
    pub max_min: MaxMinInput,
    #[serde(default)]
    pub dry_density_top: Option<f64>,
    #[serde(default)]
    pub dry_density_base: Option<f64>,
    #[serde(default)]
    pub grain_density: Option<f64>,
}

impl MaxMinFile {
    pub fn has_in_situ(&self) -> bool {
        self.dry_density_top.is_some() || self.dry_density_base.is_some()
    }
}

/// 저울 검정 입력 파일. 하중점 목록(`[[points]]`) 또는 단일 하중.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScaleFile {
    Series(ScaleSeriesInput),
    Single(ScaleVerificationInput),
}

// `points` 키로 형식을 고른다. 잘못된 필드 이름이 오류에 그대로 드러난다.
impl<'de> Deserialize<'de> for ScaleFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = toml::Value::deserialize(deserializer)?;
        if value.get("points").is_some() {
            value
                .try_into()
                .map(ScaleFile::Series)
                .map_err(de::Error::custom)
        } else {
            value
                .try_into()
                .map(ScaleFile::Single)
                .map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::{AccuracyClass, EvaluationType};

    #[test]
    fn single_scale_file_parses() {
        let src = r#"
            accuracy_class = "III"
            verification_scale_interval = 1.0
            evaluation_type = "verification"
            reference_weight = 9.9
            measured_result = 9.905
        "#;
        let file: ScaleFile = parse_input(Path::new("scale.toml"), src).unwrap();
        match file {
            ScaleFile::Single(input) => {
                assert_eq!(input.accuracy_class, AccuracyClass::III);
                assert_eq!(input.evaluation_type, EvaluationType::Verification);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn series_scale_file_parses() {
        let src = r#"
            accuracy_class = "II"
            verification_scale_interval = 0.1
            evaluation_type = "model_approval"

            [[points]]
            reference_weight = 0.2
            measured_result = 0.2

            [[points]]
            reference_weight = 1.0
            measured_result = 1.0001
        "#;
        let file: ScaleFile = parse_input(Path::new("scale.toml"), src).unwrap();
        let ScaleFile::Series(series) = file else {
            panic!("expected series");
        };
        assert_eq!(series.points.len(), 2);
    }

    #[test]
    fn malformed_single_scale_file_names_the_field() {
        let src = r#"
            accuracy_class = "III"
            verification_scale_interval = 1.0
            evaluation_type = "verification"
            reference_weight = 9.9
        "#;
        let err = parse_input::<ScaleFile>(Path::new("scale.toml"), src).unwrap_err();
        assert!(err.to_string().contains("measured_result"), "{err}");
    }

    #[test]
    fn malformed_series_point_names_the_field() {
        let src = r#"
            accuracy_class = "II"
            verification_scale_interval = 0.1
            evaluation_type = "verification"

            [[points]]
            reference_weight = 0.2
        "#;
        let err = parse_input::<ScaleFile>(Path::new("scale.toml"), src).unwrap_err();
        assert!(err.to_string().contains("measured_result"), "{err}");
    }

    #[test]
    fn real_density_temperatures_are_read_in_the_file_unit() {
        let src = r#"
            moisture_percent = 0.0
            temperature_unit = "F"

            [[determinations]]
            picnometer_mass = 150.0
            picnometer_plus_soil_plus_water_mass = 681.13
            picnometer_plus_water_mass = 650.0
            temperature = 68.0
            wet_soil_mass = 50.0

            [[determinations]]
            picnometer_mass = 150.0
            picnometer_plus_soil_plus_water_mass = 681.13
            picnometer_plus_water_mass = 650.0
            wet_soil_mass = 50.0
        "#;
        let file: RealDensityFile = parse_input(Path::new("real.toml"), src).unwrap();
        let input = file.into_input().unwrap();
        let t = input.determinations[0].temperature_c.unwrap();
        assert!((t - 20.0).abs() < 1e-9);
        assert_eq!(input.determinations[1].temperature_c, None);
    }

    #[test]
    fn real_density_defaults_to_celsius_and_rejects_unknown_units() {
        let src = r#"
            moisture_percent = 10.0

            [[determinations]]
            picnometer_mass = 150.0
            picnometer_plus_soil_plus_water_mass = 681.13
            picnometer_plus_water_mass = 650.0
            temperature_c = 25.0
            wet_soil_mass = 55.0
        "#;
        let file: RealDensityFile = parse_input(Path::new("real.toml"), src).unwrap();
        assert_eq!(file.temperature_unit, "C");
        let input = file.clone().into_input().unwrap();
        assert_eq!(input.determinations[0].temperature_c, Some(25.0));

        let bad = RealDensityFile {
            temperature_unit: "R".into(),
            ..file
        };
        assert!(matches!(
            bad.into_input(),
            Err(ConversionError::UnknownUnit(_))
        ));
    }

    #[test]
    fn max_min_file_with_in_situ() {
        let src = r#"
            dry_density_top = 1.6

            [[max_determinations]]
            mold_plus_soil_mass = 5750.0
            mold_mass = 4000.0
            volume = 1000.0

            [[min_determinations]]
            mold_plus_soil_mass = 5450.0
            mold_mass = 4000.0
            volume = 1000.0
        "#;
        let file: MaxMinFile = parse_input(Path::new("maxmin.toml"), src).unwrap();
        assert!(file.has_in_situ());
        assert_eq!(file.max_min.max_determinations.len(), 1);
        assert_eq!(file.grain_density, None);
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse_input::<MoistureFile>(Path::new("bad.toml"), "determinations = 3")
            .unwrap_err();
        assert!(err.to_string().starts_with("bad.toml"));
    }
}
