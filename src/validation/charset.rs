//! Character sets for name fields and the typing filters derived from them.
//!
//! The filters apply exactly the character rules the validators check, so any
//! filtered string passes the character-set and consecutive-special checks.

use crate::utils::error::ValidationError;

/// Separators allowed inside names. Two of them may not follow each other.
pub const SPECIAL_CHARACTERS: [char; 4] = [' ', '-', '\'', '\u{2019}'];

const CLUB_NAME_EXTRAS: [char; 10] = ['.', '&', '(', ')', '!', '#', '/', ':', '+', ','];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    PersonName,
    ClubName,
}

impl CharacterSet {
    pub fn allows(&self, c: char) -> bool {
        match self {
            CharacterSet::PersonName => is_latin_letter(c) || is_special(c),
            CharacterSet::ClubName => {
                is_latin_letter(c)
                    || is_special(c)
                    || c.is_ascii_digit()
                    || CLUB_NAME_EXTRAS.contains(&c)
            }
        }
    }
}

pub fn is_special(c: char) -> bool {
    SPECIAL_CHARACTERS.contains(&c)
}

/// ASCII letters plus the letter blocks of Latin-1 Supplement, Latin Extended-A/B
/// and Latin Extended Additional.
pub fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c as u32,
            0x00C0..=0x00D6 | 0x00D8..=0x00F6 | 0x00F8..=0x024F | 0x1E00..=0x1EFF
        )
}

pub fn contains_only(value: &str, set: CharacterSet) -> bool {
    value.chars().all(|c| set.allows(c))
}

pub fn has_consecutive_specials(value: &str) -> bool {
    let mut prev_special = false;
    for c in value.chars() {
        let special = is_special(c);
        if special && prev_special {
            return true;
        }
        prev_special = special;
    }
    false
}

/// Shared name rule: blank, newline, character set, separators, then length.
pub fn check_name(
    value: &str,
    set: CharacterSet,
    min_length: usize,
    max_length: usize,
) -> Option<ValidationError> {
    if value.trim().is_empty() {
        return Some(ValidationError::Empty);
    }
    if set == CharacterSet::ClubName && value.contains(['\n', '\r']) {
        return Some(ValidationError::ContainsNewline);
    }
    if !contains_only(value, set) {
        return Some(ValidationError::InvalidCharacters);
    }
    if has_consecutive_specials(value) {
        return Some(ValidationError::ConsecutiveSpecialCharacters);
    }

    let length = value.chars().count();
    if length < min_length {
        return Some(ValidationError::TooShort { min: min_length });
    }
    if length > max_length {
        return Some(ValidationError::TooLong { max: max_length });
    }
    None
}

/// Projects typed input onto the characters `check_name` accepts, capped at `max_length`.
pub fn filter(input: &str, set: CharacterSet, max_length: usize) -> String {
    let mut filtered = String::with_capacity(input.len());
    let mut prev_special = false;
    let mut length = 0;

    for c in input.chars() {
        if length >= max_length {
            break;
        }
        if !set.allows(c) {
            continue;
        }
        let special = is_special(c);
        if special && prev_special {
            continue;
        }
        filtered.push(c);
        prev_special = special;
        length += 1;
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_variants_are_letters() {
        for c in ['a', 'Z', 'é', 'Ø', 'ß', 'ł', 'Ő', 'ș', 'ǅ', 'ẞ', 'ỳ'] {
            assert!(is_latin_letter(c), "{} should be a latin letter", c);
        }
        for c in ['×', '÷', '1', 'Ж', 'α', '中', '@'] {
            assert!(!is_latin_letter(c), "{} should not be a latin letter", c);
        }
    }

    #[test]
    fn test_club_names_allow_digits_and_punctuation() {
        assert!(contains_only("FC 1. Köln & Friends (U19)", CharacterSet::ClubName));
        assert!(!contains_only("FC 1. Köln", CharacterSet::PersonName));
        assert!(!contains_only("Club\nName", CharacterSet::ClubName));
    }

    #[test]
    fn test_consecutive_specials() {
        assert!(!has_consecutive_specials("Jean-Luc O'Neil"));
        assert!(has_consecutive_specials("Jean--Luc"));
        assert!(has_consecutive_specials("Anne  Marie"));
        assert!(has_consecutive_specials("O' Brien"));
        assert!(has_consecutive_specials("D\u{2019}-Arcy"));
    }

    #[test]
    fn test_check_name_order() {
        assert_eq!(check_name("   ", CharacterSet::PersonName, 2, 10), Some(ValidationError::Empty));
        assert_eq!(
            check_name("Ann4", CharacterSet::PersonName, 2, 10),
            Some(ValidationError::InvalidCharacters)
        );
        assert_eq!(
            check_name("Team\nA", CharacterSet::ClubName, 2, 10),
            Some(ValidationError::ContainsNewline)
        );
        assert_eq!(
            check_name("A", CharacterSet::PersonName, 2, 10),
            Some(ValidationError::TooShort { min: 2 })
        );
        assert_eq!(
            check_name("Bartholomew", CharacterSet::PersonName, 2, 10),
            Some(ValidationError::TooLong { max: 10 })
        );
        assert_eq!(check_name("Zoë", CharacterSet::PersonName, 2, 10), None);
    }

    #[test]
    fn test_filter_drops_and_truncates() {
        assert_eq!(filter("J0hn--Paul", CharacterSet::PersonName, 50), "Jhn-Paul");
        assert_eq!(filter("Anne  Marie", CharacterSet::PersonName, 50), "Anne Marie");
        assert_eq!(filter("Team\nRed", CharacterSet::ClubName, 50), "TeamRed");
        assert_eq!(filter("Maximilian", CharacterSet::PersonName, 4), "Maxi");
        assert_eq!(filter("- -", CharacterSet::PersonName, 50), "-");
    }
}
