use regex::Regex;

/// Repair spacing lost during PDF text extraction.
///
/// The passes are order-sensitive: boundary insertion first, whitespace
/// collapse last. All rules are pure and deterministic.
pub fn clean_spacing(text: &str) -> String {
    let lower_upper = Regex::new(r"([a-z])([A-Z])").expect("valid regex");
    let punct_letter = Regex::new(r"([.,;:!?])([A-Za-z])").expect("valid regex");
    let letter_digit = Regex::new(r"([a-zA-Z])(\d)").expect("valid regex");
    let digit_letter = Regex::new(r"(\d)([A-Za-z])").expect("valid regex");
    let whitespace = Regex::new(r"\s+").expect("valid regex");

    let text = lower_upper.replace_all(text, "$1 $2");
    let text = punct_letter.replace_all(&text, "$1 $2");
    let text = letter_digit.replace_all(&text, "$1 $2");
    let text = digit_letter.replace_all(&text, "$1 $2");
    let text = whitespace.replace_all(&text, " ");
    text.trim().to_string()
}
