use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{find_range, AccuracyClass, AccuracyRange, ScaleError};
use crate::rounding::{round, MASS_DECIMALS};
use crate::status::TestStatus;
use crate::units::kg_to_g;

/// EMA 배수를 고르는 평가 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationType {
    /// 형식승인
    ModelApproval,
    /// 검정
    Verification,
}

impl EvaluationType {
    fn multiplier(&self, range: &AccuracyRange) -> f64 {
        match self {
            EvaluationType::ModelApproval => range.model_approval_multiplier,
            EvaluationType::Verification => range.verification_multiplier,
        }
    }
}

/// 단일 하중 검정 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleVerificationInput {
    pub accuracy_class: AccuracyClass,
    /// 검정 눈금 e(g)
    pub verification_scale_interval: f64,
    pub evaluation_type: EvaluationType,
    /// 기준 분동 질량(kg)
    pub reference_weight: f64,
    /// 저울 지시값(kg)
    pub measured_result: f64,
}

/// 단일 하중 검정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleVerificationResult {
    /// 지시 오차(g)
    pub error_grams: f64,
    /// 기준 하중을 e의 배수로 표기한 값
    pub load_in_e: f64,
    pub applicable_range: AccuracyRange,
    pub ema_multiplier: f64,
    /// 최대허용오차(g)
    pub ema_grams: f64,
    pub conforms: bool,
    pub status: TestStatus,
}

/// 여러 하중점 중 하나.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadPoint {
    /// 기준 분동 질량(kg)
    pub reference_weight: f64,
    /// 저울 지시값(kg)
    pub measured_result: f64,
}

/// 하중점 여러 개로 이뤄진 검정 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSeriesInput {
    pub accuracy_class: AccuracyClass,
    pub verification_scale_interval: f64,
    pub evaluation_type: EvaluationType,
    pub points: Vec<LoadPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSeriesResult {
    pub points: Vec<ScaleVerificationResult>,
    pub status: TestStatus,
}

/// 기본은 질량 표기 자릿수(2)이지만 e가 더 작으면 e의 자릿수를 따른다.
fn grams_decimals(interval_g: f64) -> u32 {
    (MASS_DECIMALS..=6)
        .find(|&d| {
            let scaled = interval_g * 10_f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(6)
}

fn ensure_weight(field: &'static str, value: f64) -> Result<(), ScaleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScaleError::InvalidInput { field, value })
    }
}

/// 표 5 기준으로 지시 오차가 최대허용오차 이내인지 판정한다.
///
/// 기준 하중이 등급의 어느 범위에도 속하지 않으면 판정 대신 [`ScaleError::LoadOutOfRange`]를 돌려준다.
pub fn verify_scale(input: &ScaleVerificationInput) -> Result<ScaleVerificationResult, ScaleError> {
    let e = input.verification_scale_interval;
    if !(e.is_finite() && e > 0.0) {
        return Err(ScaleError::InvalidInterval(e));
    }
    ensure_weight("reference_weight", input.reference_weight)?;
    ensure_weight("measured_result", input.measured_result)?;

    let decimals = grams_decimals(e);
    let reference_g = round(kg_to_g(input.reference_weight), decimals);
    let measured_g = round(kg_to_g(input.measured_result), decimals);
    let error_grams = round(measured_g - reference_g, decimals);
    let load_in_e = round(reference_g / e, 6);

    let Some(range) = find_range(input.accuracy_class, load_in_e) else {
        warn!(class = %input.accuracy_class, load_in_e, "표 5 범위를 벗어난 하중");
        return Err(ScaleError::LoadOutOfRange {
            class: input.accuracy_class,
            load_in_e,
        });
    };
    let ema_multiplier = input.evaluation_type.multiplier(range);
    let ema_grams = round(ema_multiplier * e, decimals + 1);
    let conforms = error_grams.abs() <= ema_grams;
    debug!(
        class = %input.accuracy_class,
        load_in_e,
        error_grams,
        ema_grams,
        conforms,
        "저울 검정 판정"
    );

    Ok(ScaleVerificationResult {
        error_grams,
        load_in_e,
        applicable_range: *range,
        ema_multiplier,
        ema_grams,
        conforms,
        status: TestStatus::from_check(conforms),
    })
}

/// 하중점마다 판정한 뒤 전체 판정을 합친다. 하중점이 없으면 대기.
pub fn verify_scale_series(input: &ScaleSeriesInput) -> Result<ScaleSeriesResult, ScaleError> {
    let points = input
        .points
        .iter()
        .map(|p| {
            verify_scale(&ScaleVerificationInput {
                accuracy_class: input.accuracy_class,
                verification_scale_interval: input.verification_scale_interval,
                evaluation_type: input.evaluation_type,
                reference_weight: p.reference_weight,
                measured_result: p.measured_result,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let status = TestStatus::combine(points.iter().map(|p| p.status));
    Ok(ScaleSeriesResult { points, status })
}
