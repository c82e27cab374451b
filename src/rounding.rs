//! 보고서 재현성을 위한 고정 소수 자릿수 반올림.

/// 질량(g) 표기 자릿수
pub const MASS_DECIMALS: u32 = 2;
/// 밀도·단위중량(g/cm³) 표기 자릿수
pub const DENSITY_DECIMALS: u32 = 3;
/// 함수비(%) 표기 자릿수
pub const MOISTURE_DECIMALS: u32 = 1;
/// 물의 밀도 표기 자릿수
pub const WATER_DENSITY_DECIMALS: u32 = 4;
/// 상대다짐도 등 백분율 표기 자릿수
pub const PERCENT_DECIMALS: u32 = 1;

/// 값을 `decimal_places` 자리로 반올림한다(0.5는 0에서 먼 쪽).
///
/// 입력 중이던 빈 칸이 계산에 NaN으로 번지지 않도록 유한하지 않은 값은 0으로 처리한다.
pub fn round(value: f64, decimal_places: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powi(decimal_places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        0.0
    }
}

/// 누락된 값(`None`)을 0으로 보고 반올림한다.
pub fn round_or_zero(value: Option<f64>, decimal_places: u32) -> f64 {
    value.map_or(0.0, |v| round(v, decimal_places))
}

/// 산술 평균. 비어 있으면 0.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
