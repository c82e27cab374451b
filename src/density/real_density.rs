use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ensure_non_negative, DensityError};
use crate::rounding::{mean, round, DENSITY_DECIMALS, MASS_DECIMALS};
use crate::status::TestStatus;
use crate::units::water_density;

/// 두 회차 흙입자 밀도 차이의 허용값(g/cm³).
pub const REAL_DENSITY_TOLERANCE: f64 = 0.02;

/// 피크노미터 한 회의 측정값(g, °C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PicnometerDetermination {
    pub picnometer_mass: f64,
    /// 피크노미터+흙+물 질량
    pub picnometer_plus_soil_plus_water_mass: f64,
    /// 피크노미터+물 질량
    pub picnometer_plus_water_mass: f64,
    /// 물 온도(°C). 없으면 기본 물 밀도를 쓴다.
    #[serde(default, alias = "temperature")]
    pub temperature_c: Option<f64>,
    /// 투입한 습윤토 질량
    pub wet_soil_mass: f64,
}

/// 흙입자 밀도 계산 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealDensityInput {
    pub determinations: Vec<PicnometerDetermination>,
    /// 시료의 평균 함수비(%)
    pub moisture_percent: f64,
}

/// 피크노미터 한 회의 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PicnometerLine {
    /// 건조토 질량(g)
    pub dry_soil_mass: f64,
    /// 시험 온도의 물 밀도(g/cm³)
    pub water_density: f64,
    /// 흙입자 밀도(g/cm³)
    pub real_density: f64,
}

/// 흙입자 밀도 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealDensityResult {
    pub determinations: Vec<PicnometerLine>,
    /// 평균 흙입자 밀도(g/cm³)
    pub average: f64,
    /// 회차 간 최대 차이. 2회 미만이면 `None`.
    pub difference: Option<f64>,
    pub status: TestStatus,
}

impl PicnometerDetermination {
    fn compute(&self, index: usize, moisture_percent: f64) -> Result<PicnometerLine, DensityError> {
        ensure_non_negative("picnometer_mass", self.picnometer_mass)?;
        ensure_non_negative(
            "picnometer_plus_soil_plus_water_mass",
            self.picnometer_plus_soil_plus_water_mass,
        )?;
        ensure_non_negative("picnometer_plus_water_mass", self.picnometer_plus_water_mass)?;
        ensure_non_negative("wet_soil_mass", self.wet_soil_mass)?;

        let divisor = 1.0 + moisture_percent / 100.0;
        let dry_soil_mass = if divisor > 0.0 {
            round(self.wet_soil_mass / divisor, MASS_DECIMALS)
        } else {
            0.0
        };
        let rho_w = water_density(self.temperature_c);
        let denominator =
            self.picnometer_plus_water_mass + dry_soil_mass - self.picnometer_plus_soil_plus_water_mass;
        // 분모 0 이하는 입력 누락이 아니라 질량 수지가 맞지 않는 것이므로 0으로 덮지 않는다.
        if denominator <= 0.0 {
            warn!(determination = index, denominator, "피크노미터 질량 수지 오류");
            return Err(DensityError::NonPositivePicnometerBalance {
                determination: index,
                denominator,
            });
        }
        Ok(PicnometerLine {
            dry_soil_mass,
            water_density: rho_w,
            real_density: round(dry_soil_mass * rho_w / denominator, DENSITY_DECIMALS),
        })
    }
}

/// 피크노미터법으로 흙입자 밀도를 구하고 회차 간 차이로 합격 여부를 판정한다.
pub fn compute_real_density(input: &RealDensityInput) -> Result<RealDensityResult, DensityError> {
    ensure_non_negative("moisture_percent", input.moisture_percent)?;
    let lines = input
        .determinations
        .iter()
        .enumerate()
        .map(|(i, det)| det.compute(i + 1, input.moisture_percent))
        .collect::<Result<Vec<_>, _>>()?;

    let values: Vec<f64> = lines.iter().map(|l| l.real_density).collect();
    let average = round(mean(&values), DENSITY_DECIMALS);
    let difference = if values.len() >= 2 {
        let max = values.iter().copied().fold(f64::MIN, f64::max);
        let min = values.iter().copied().fold(f64::MAX, f64::min);
        Some(round(max - min, DENSITY_DECIMALS))
    } else {
        None
    };
    let status = TestStatus::from_outcome(difference.map(|d| d <= REAL_DENSITY_TOLERANCE));
    debug!(average, ?difference, %status, "흙입자 밀도 계산 완료");

    Ok(RealDensityResult {
        determinations: lines,
        average,
        difference,
        status,
    })
}
