use serde::{Deserialize, Serialize};
use std::fmt;

/// 비자동 저울의 정확도 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccuracyClass {
    I,
    II,
    III,
    IIII,
}

impl AccuracyClass {
    pub const ALL: [AccuracyClass; 4] = [
        AccuracyClass::I,
        AccuracyClass::II,
        AccuracyClass::III,
        AccuracyClass::IIII,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccuracyClass::I => "I",
            AccuracyClass::II => "II",
            AccuracyClass::III => "III",
            AccuracyClass::IIII => "IIII",
        }
    }

    /// 로마 숫자 표기를 해석한다(대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" => Some(AccuracyClass::I),
            "II" => Some(AccuracyClass::II),
            "III" => Some(AccuracyClass::III),
            "IIII" => Some(AccuracyClass::IIII),
            _ => None,
        }
    }

    /// 등급별 표 5 행.
    pub fn ranges(&self) -> &'static [AccuracyRange; 3] {
        match self {
            AccuracyClass::I => &CLASS_I,
            AccuracyClass::II => &CLASS_II,
            AccuracyClass::III => &CLASS_III,
            AccuracyClass::IIII => &CLASS_IIII,
        }
    }
}

impl fmt::Display for AccuracyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 표 5의 한 행. 하중 범위 `(min_e, max_e]`는 e의 배수로 표기한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyRange {
    pub min_e: f64,
    /// 상한. `None`이면 상한 없음.
    pub max_e: Option<f64>,
    /// 형식승인 시 EMA 배수
    pub model_approval_multiplier: f64,
    /// 검정 시 EMA 배수
    pub verification_multiplier: f64,
}

impl AccuracyRange {
    pub fn contains(&self, load_in_e: f64) -> bool {
        load_in_e > self.min_e && self.max_e.map_or(true, |max| load_in_e <= max)
    }
}

const fn row(min_e: f64, max_e: Option<f64>, model: f64, verification: f64) -> AccuracyRange {
    AccuracyRange {
        min_e,
        max_e,
        model_approval_multiplier: model,
        verification_multiplier: verification,
    }
}

// Portaria INMETRO 157/2022, 표 5
const CLASS_I: [AccuracyRange; 3] = [
    row(0.0, Some(50_000.0), 0.5, 1.0),
    row(50_000.0, Some(200_000.0), 1.0, 2.0),
    row(200_000.0, None, 1.5, 2.0),
];
const CLASS_II: [AccuracyRange; 3] = [
    row(0.0, Some(5_000.0), 0.5, 1.0),
    row(5_000.0, Some(20_000.0), 1.0, 2.0),
    row(20_000.0, Some(100_000.0), 1.5, 2.0),
];
const CLASS_III: [AccuracyRange; 3] = [
    row(0.0, Some(500.0), 0.5, 1.0),
    row(500.0, Some(2_000.0), 1.0, 2.0),
    row(2_000.0, Some(10_000.0), 1.5, 2.0),
];
const CLASS_IIII: [AccuracyRange; 3] = [
    row(0.0, Some(50.0), 0.5, 1.0),
    row(50.0, Some(200.0), 1.0, 2.0),
    row(200.0, Some(1_000.0), 1.5, 2.0),
];

/// 하중(e 배수)이 속하는 행을 찾는다. 범위가 겹치지 않으므로 결과는 최대 하나다.
pub fn find_range(class: AccuracyClass, load_in_e: f64) -> Option<&'static AccuracyRange> {
    class.ranges().iter().find(|r| r.contains(load_in_e))
}
