use crate::error::{AppError, Result};

/// Code used for departments missing from the table.
pub const FALLBACK_CODE: &str = "STU";

/// Undergraduate departments and their identifier prefixes.
pub const DEPARTMENT_CODES: &[(&str, &str)] = &[
    ("Computer Science", "CS"),
    ("Computer Application", "CA"),
    ("Maths", "MT"),
    ("Physics", "PH"),
    ("Chemistry", "CH"),
    ("Biotechnology", "BT"),
    ("Biochemistry", "BC"),
    ("Microbiology", "MB"),
    ("Tamil", "TM"),
    ("English", "EN"),
    ("BCom CA", "BCA"),
    ("BCom CS", "BCS"),
    ("BCom General", "BCG"),
    ("BBA", "BBA"),
    ("BBM", "BBM"),
    ("IT", "IT"),
    ("Data Science", "DS"),
    ("AI & ML", "AI"),
];

/// Postgraduate departments offered in the admin form. None of these have a
/// code, so their students get the fallback prefix.
pub const PG_DEPARTMENTS: &[&str] = &[
    "MSc Computer Science",
    "MCA",
    "MSc IT",
    "MSc Maths",
    "MSc Physics",
    "MSc Chemistry",
    "MA English",
    "MA Tamil",
    "MSc Microbiology",
    "MSc Biotechnology",
    "MSc Biochemistry",
    "MBA",
    "MCom CA",
    "MCom General",
];

pub fn department_code(department: &str) -> &'static str {
    DEPARTMENT_CODES
        .iter()
        .find(|(name, _)| *name == department)
        .map(|(_, code)| *code)
        .unwrap_or(FALLBACK_CODE)
}

/// Build `<code><serial>` with the serial zero-padded to three digits.
/// Serials of 1000 and above keep all their digits.
pub fn generate_student_id(department: &str, serial: &str) -> Result<String> {
    let serial: u32 = serial
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Serial number must be numeric, got '{}'.", serial.trim())))?;

    Ok(format!("{}{:03}", department_code(department), serial))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_department() {
        assert_eq!(generate_student_id("Computer Science", "007").unwrap(), "CS007");
        assert_eq!(generate_student_id("BCom General", "12").unwrap(), "BCG012");
        assert_eq!(generate_student_id("AI & ML", "1").unwrap(), "AI001");
    }

    #[test]
    fn test_unknown_department_falls_back() {
        assert_eq!(generate_student_id("MBA", "5").unwrap(), "STU005");
        assert_eq!(generate_student_id("", "42").unwrap(), "STU042");
    }

    #[test]
    fn test_wide_serial_is_not_truncated() {
        assert_eq!(generate_student_id("Physics", "1234").unwrap(), "PH1234");
    }

    #[test]
    fn test_padding_is_normalised() {
        assert_eq!(
            generate_student_id("Maths", "7").unwrap(),
            generate_student_id("Maths", "0007").unwrap()
        );
    }

    #[test]
    fn test_non_numeric_serial_rejected() {
        assert!(matches!(
            generate_student_id("Physics", "abc"),
            Err(AppError::Validation(_))
        ));
        assert!(generate_student_id("Physics", "-3").is_err());
    }

    #[test]
    fn test_every_code_is_unique() {
        let mut codes: Vec<_> = DEPARTMENT_CODES.iter().map(|(_, c)| *c).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), DEPARTMENT_CODES.len());
    }
}
