use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialize a piped document from stdin into `T`.
///
/// `None` when stdin is a terminal or the pipe is empty, so the caller can
/// fall back to flags. JSON is tried first; anything else is read as YAML.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document<T: DeserializeOwned>(raw: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let doc = raw.trim();
    if doc.is_empty() {
        return Ok(None);
    }

    let parsed = if doc.starts_with('{') || doc.starts_with('[') {
        serde_json::from_str(doc).map_err(|e| format!("Failed to parse stdin as JSON: {}", e))?
    } else {
        serde_yaml::from_str(doc).map_err(|e| format!("Failed to parse stdin as YAML: {}", e))?
    };
    log::debug!("read {} bytes from stdin", doc.len());
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use home_loan_core::amortization::LoanInputs;
    use rust_decimal::Decimal;

    #[test]
    fn test_blank_pipe_is_none() {
        assert!(parse_document::<LoanInputs>("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_and_yaml_documents() {
        let json: LoanInputs = parse_document(r#"{"propertyValue": "250000", "loanTerm": "15"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(json.property_value, Decimal::from(250_000));
        assert_eq!(json.term_years, Decimal::from(15));

        let yaml: LoanInputs = parse_document("property_value: '250000'\nterm_years: '15'\n")
            .unwrap()
            .unwrap();
        assert_eq!(yaml, json);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_document::<LoanInputs>("{not json").is_err());
    }
}
