//! Prompt template for the currency extraction request.

const TEMPLATE: &str = r#"You are a currency parsing assistant. Extract the monetary amount and its ISO 4217 currency code from the text below.

Respond with exactly one JSON object and nothing else, using one of these shapes:
{"amount": <number>, "currencyCode": "<ISO 4217 code>"}
{"error": "<why no amount could be found>"}
{"needsClarification": "<short question to ask the user>"}

Rules:
- "amount" is a plain JSON number with "." as the decimal separator and no thousands separators.
- Map symbols and names to ISO 4217 codes, e.g. "$" to "USD", "zł" or "złoty" to "PLN", "€" to "EUR", "£" to "GBP".
- Amounts written in words or with suffixes ("twenty", "1.5k") are converted to numbers.
- If the currency could be several codes ("pesos", "kr", "dollars" with no hint of the country), answer with "needsClarification" and name the likely options in the question.
- If the text contains no monetary amount, answer with "error".

Text: """{text}""""#;

/// Builds the model prompt for `text`.
///
/// Deterministic: the same text always produces the same prompt.
pub fn build_prompt(text: &str) -> String {
    TEMPLATE.replacen("{text}", text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text() {
        let prompt = build_prompt("100 złotych");
        assert!(prompt.ends_with("Text: \"\"\"100 złotych\"\"\""));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt("€5"), build_prompt("€5"));
    }

    #[test]
    fn test_prompt_lists_every_reply_shape() {
        let prompt = build_prompt("x");
        assert!(prompt.contains("\"currencyCode\""));
        assert!(prompt.contains("\"error\""));
        assert!(prompt.contains("\"needsClarification\""));
    }

    #[test]
    fn test_placeholder_in_user_text_is_left_alone() {
        let prompt = build_prompt("{text}");
        assert!(prompt.ends_with("\"\"\"{text}\"\"\""));
        assert_eq!(prompt.matches("{text}").count(), 1);
    }
}
