//! 저울(천칭) 검정 관련 계산 모듈.
//! Portaria INMETRO 157/2022 표 5의 정확도 등급별 최대허용오차(EMA) 판정으로 구성한다.

pub mod accuracy_class;
pub mod verification;

use thiserror::Error;

pub use accuracy_class::{find_range, AccuracyClass, AccuracyRange};
pub use verification::{
    verify_scale, verify_scale_series, EvaluationType, LoadPoint, ScaleSeriesInput,
    ScaleSeriesResult, ScaleVerificationInput, ScaleVerificationResult,
};

/// 저울 검정 중 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    /// 검정 눈금(e)이 0 이하이거나 유한하지 않음
    #[error("검정 눈금 e가 올바르지 않음: {0} g")]
    InvalidInterval(f64),
    /// 음수이거나 유한하지 않은 하중 입력
    #[error("입력값 `{field}`이(가) 올바르지 않음: {value}")]
    InvalidInput { field: &'static str, value: f64 },
    /// 표 5의 어느 범위에도 속하지 않는 하중
    #[error("하중 {load_in_e} e가 등급 {class}의 지정 범위를 벗어남")]
    LoadOutOfRange { class: AccuracyClass, load_in_e: f64 },
}
