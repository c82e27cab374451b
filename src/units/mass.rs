use serde::{Deserialize, Serialize};

/// 질량 단위. 내부 기준은 g이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassUnit {
    Kilogram,
    Gram,
    Milligram,
}

fn to_g(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kilogram => value * 1000.0,
        MassUnit::Gram => value,
        MassUnit::Milligram => value / 1000.0,
    }
}

fn from_g(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kilogram => value / 1000.0,
        MassUnit::Gram => value,
        MassUnit::Milligram => value * 1000.0,
    }
}

/// 질량을 변환한다.
pub fn convert_mass(value: f64, from: MassUnit, to: MassUnit) -> f64 {
    let base = to_g(value, from);
    from_g(base, to)
}

/// kg 값을 g으로 바꾼다. 저울 검정 입력이 kg 단위로 들어온다.
pub fn kg_to_g(value_kg: f64) -> f64 {
    convert_mass(value_kg, MassUnit::Kilogram, MassUnit::Gram)
}
