//! 시험 결과 판정(합격/불합격/대기).

use serde::{Deserialize, Serialize};
use std::fmt;

/// 모든 계산기가 공통으로 쓰는 3단계 판정.
///
/// 성적서와 화면이 문자열을 그대로 사용하므로 표기(`APROVADO` 등)는 번역하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    /// 합격
    Aprovado,
    /// 불합격
    Reprovado,
    /// 필요한 입력이 없어 아직 판정하지 않음
    Aguardando,
}

impl TestStatus {
    /// 판정 조건의 참/거짓을 합격/불합격으로 바꾼다.
    pub fn from_check(passed: bool) -> Self {
        if passed {
            TestStatus::Aprovado
        } else {
            TestStatus::Reprovado
        }
    }

    /// 판정할 수 없는 경우(`None`)는 대기로 둔다.
    pub fn from_outcome(outcome: Option<bool>) -> Self {
        outcome.map_or(TestStatus::Aguardando, Self::from_check)
    }

    /// 여러 판정을 하나로 합친다.
    ///
    /// 하나라도 불합격이면 불합격, 그렇지 않고 대기가 있으면 대기. 비어 있으면 대기.
    pub fn combine<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = TestStatus>,
    {
        let mut any = false;
        let mut pending = false;
        for status in statuses {
            any = true;
            match status {
                TestStatus::Reprovado => return TestStatus::Reprovado,
                TestStatus::Aguardando => pending = true,
                TestStatus::Aprovado => {}
            }
        }
        if !any || pending {
            TestStatus::Aguardando
        } else {
            TestStatus::Aprovado
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Aprovado => "APROVADO",
            TestStatus::Reprovado => "REPROVADO",
            TestStatus::Aguardando => "AGUARDANDO",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
