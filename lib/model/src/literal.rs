use oxrdf::vocab::xsd;
use oxrdf::LiteralRef;
use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, GDay, GMonth,
    GMonthDay, GYear, GYearMonth, Time, YearMonthDuration,
};
use std::cmp::Ordering;
use std::str::FromStr;

/// A literal whose lexical form is not valid for its XSD datatype.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid lexical form '{value}' for datatype <{datatype}>")]
pub struct InvalidLiteralError {
    /// The lexical form.
    pub value: String,
    /// The IRI of the datatype.
    pub datatype: String,
}

/// Checks that the lexical form of `literal` is valid for its datatype.
///
/// Only the XSD datatypes with a value space known to [oxsdatatypes] are checked. Literals with
/// any other datatype are always accepted.
pub fn validate_literal(literal: LiteralRef<'_>) -> Result<(), InvalidLiteralError> {
    let value = literal.value();
    let valid = match literal.datatype() {
        xsd::BOOLEAN => Boolean::from_str(value).is_ok(),
        xsd::DECIMAL => Decimal::from_str(value).is_ok(),
        xsd::DOUBLE => Double::from_str(value).is_ok(),
        xsd::FLOAT => Float::from_str(value).is_ok(),
        xsd::INTEGER => integer_sign(value).is_some(),
        xsd::LONG => i64::from_str(value).is_ok(),
        xsd::INT => i32::from_str(value).is_ok(),
        xsd::SHORT => i16::from_str(value).is_ok(),
        xsd::BYTE => i8::from_str(value).is_ok(),
        xsd::UNSIGNED_LONG => u64::from_str(value).is_ok(),
        xsd::UNSIGNED_INT => u32::from_str(value).is_ok(),
        xsd::UNSIGNED_SHORT => u16::from_str(value).is_ok(),
        xsd::UNSIGNED_BYTE => u8::from_str(value).is_ok(),
        xsd::NON_NEGATIVE_INTEGER => integer_sign(value).is_some_and(Ordering::is_ge),
        xsd::POSITIVE_INTEGER => integer_sign(value).is_some_and(Ordering::is_gt),
        xsd::NON_POSITIVE_INTEGER => integer_sign(value).is_some_and(Ordering::is_le),
        xsd::NEGATIVE_INTEGER => integer_sign(value).is_some_and(Ordering::is_lt),
        xsd::DATE_TIME | xsd::DATE_TIME_STAMP => DateTime::from_str(value).is_ok(),
        xsd::DATE => Date::from_str(value).is_ok(),
        xsd::TIME => Time::from_str(value).is_ok(),
        xsd::DURATION => Duration::from_str(value).is_ok(),
        xsd::DAY_TIME_DURATION => DayTimeDuration::from_str(value).is_ok(),
        xsd::YEAR_MONTH_DURATION => YearMonthDuration::from_str(value).is_ok(),
        xsd::G_YEAR => GYear::from_str(value).is_ok(),
        xsd::G_YEAR_MONTH => GYearMonth::from_str(value).is_ok(),
        xsd::G_MONTH => GMonth::from_str(value).is_ok(),
        xsd::G_MONTH_DAY => GMonthDay::from_str(value).is_ok(),
        xsd::G_DAY => GDay::from_str(value).is_ok(),
        _ => true,
    };

    if valid {
        Ok(())
    } else {
        Err(InvalidLiteralError {
            value: value.to_owned(),
            datatype: literal.datatype().as_str().to_owned(),
        })
    }
}

/// Returns the sign of an `xsd:integer` lexical form of any magnitude, or `None` if the lexical
/// form is invalid.
fn integer_sign(value: &str) -> Option<Ordering> {
    let (negative, digits) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if digits.bytes().all(|b| b == b'0') {
        Ordering::Equal
    } else if negative {
        Ordering::Less
    } else {
        Ordering::Greater
    })
}
