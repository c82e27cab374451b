use crate::rounding::{round, WATER_DENSITY_DECIMALS};

/// 온도 정보가 없을 때 쓰는 물의 밀도(g/cm³).
pub const DEFAULT_WATER_DENSITY: f64 = 0.9982;

/// 4 °C에서 벗어난 1 °C당 밀도 감소량(g/cm³).
const DENSITY_DROP_PER_DEGREE: f64 = 0.0000175;

/// 온도에 따른 물의 밀도(g/cm³)를 선형 근사로 구한다.
///
/// `1.0 - |T - 4| * 0.0000175`를 소수 4자리로 반올림한다. 실제 물의 밀도 곡선은
/// 비선형이지만 기존 성적서와 값을 맞추기 위해 이 근사를 유지한다.
/// 온도가 없거나 유한하지 않으면 [`DEFAULT_WATER_DENSITY`]를 돌려준다.
pub fn water_density(temperature_c: Option<f64>) -> f64 {
    match temperature_c {
        Some(t) if t.is_finite() => round(
            1.0 - (t - 4.0).abs() * DENSITY_DROP_PER_DEGREE,
            WATER_DENSITY_DECIMALS,
        ),
        _ => DEFAULT_WATER_DENSITY,
    }
}
