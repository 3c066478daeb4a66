use super::*;
use pretty_assertions::assert_eq;

#[test]
fn every_code_round_trips_through_from_str() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
}

#[test]
fn from_str_is_case_insensitive() {
    assert_eq!("e2003".parse::<ErrorCode>(), Ok(ErrorCode::E2003));
    assert!("E0000".parse::<ErrorCode>().is_err());
}

#[test]
fn every_code_belongs_to_exactly_one_phase() {
    for code in ErrorCode::ALL {
        let phases = [
            code.is_declaration_error(),
            code.is_synthesis_error(),
            code.is_metadata_error(),
            code.is_internal_error(),
        ];
        assert_eq!(phases.iter().filter(|p| **p).count(), 1, "{code}");
    }
}

#[test]
fn phase_digit_matches_range() {
    for code in ErrorCode::ALL {
        let digit = code.as_str().as_bytes()[1];
        match digit {
            b'1' => assert!(code.is_declaration_error()),
            b'2' => assert!(code.is_synthesis_error()),
            b'3' => assert!(code.is_metadata_error()),
            b'9' => assert!(code.is_internal_error()),
            _ => panic!("unexpected phase digit in {code}"),
        }
    }
}

#[test]
fn descriptions_are_non_empty() {
    assert!(ErrorCode::ALL.iter().all(|c| !c.description().is_empty()));
}
