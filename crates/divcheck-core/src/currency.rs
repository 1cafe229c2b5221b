//! Currency codes as quoted by the market data provider
//!
//! Some exchanges quote in the minor unit of their currency (London in
//! pence as `GBp`, Johannesburg in cents as `ZAc`, Tel Aviv in agorot as
//! `ILA`). Rate services only know major units.

/// Minor-unit code, its major currency, and minor units per major unit
const MINOR_UNITS: [(&str, &str, f64); 5] = [
    ("GBp", "GBP", 100.0),
    ("GBX", "GBP", 100.0),
    ("ZAc", "ZAR", 100.0),
    ("ZAC", "ZAR", 100.0),
    ("ILA", "ILS", 100.0),
];

/// Major currency for a quoted code
#[derive(Debug, Clone, PartialEq)]
pub struct MajorUnit {
    pub code: String,
    /// Quoted amounts per one unit of `code`
    pub divisor: f64,
}

impl MajorUnit {
    pub fn convert(&self, quoted: f64) -> f64 {
        quoted / self.divisor
    }
}

/// Minor-unit codes are case sensitive: `GBp` is pence, `GBP` is pounds
pub fn is_minor_unit(code: &str) -> bool {
    let code = code.trim();
    MINOR_UNITS.iter().any(|(minor, _, _)| *minor == code)
}

pub fn major_unit(code: &str) -> MajorUnit {
    let code = code.trim();
    match MINOR_UNITS.iter().find(|(minor, _, _)| *minor == code) {
        Some((_, major, divisor)) => MajorUnit {
            code: (*major).to_string(),
            divisor: *divisor,
        },
        None => MajorUnit {
            code: code.to_ascii_uppercase(),
            divisor: 1.0,
        },
    }
}

/// Trimmed code, uppercased unless it names a minor unit
pub fn canonical(code: &str) -> String {
    let code = code.trim();
    if is_minor_unit(code) {
        code.to_string()
    } else {
        code.to_ascii_uppercase()
    }
}
