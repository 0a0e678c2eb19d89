//! Validate command implementation
//!
//! This module implements the `marquee validate` command for checking a
//! movie payload file offline against the same rules the server applies.

use anyhow::{Context, Result};
use marquee_protocol::{MovieValidator, ValidationErrors};
use serde_json::Value;
use std::fs;

/// Arguments for the validate command
pub struct ValidateArgs {
    /// Path to the JSON payload
    pub payload: String,
    /// Check as an update payload instead of a create payload
    pub partial: bool,
}

/// Validate a payload file and print the outcome
pub fn execute_validate_command(args: ValidateArgs) -> Result<()> {
    let kind = if args.partial { "update" } else { "create" };
    println!("🔍 Validating {} payload: {}", kind, args.payload);

    match check_payload_file(&args.payload, args.partial)? {
        Ok(validated) => {
            println!("✅ Payload is valid");
            println!("{}", serde_json::to_string_pretty(&validated)?);
            Ok(())
        }
        Err(errors) => {
            println!("❌ Payload is invalid");
            for issue in errors.issues() {
                let path = serde_json::to_string(&issue.path)?;
                println!("   {} {:?}: {}", path, issue.code, issue.message);
            }
            anyhow::bail!("Payload validation failed with {} issue(s)", errors.issues().len());
        }
    }
}

/// Read and validate a payload file.
///
/// The outer error covers unreadable files and malformed JSON; the inner
/// result is the validation outcome.
pub fn check_payload_file(
    path: &str,
    partial: bool,
) -> Result<std::result::Result<Value, ValidationErrors>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file: {}", path))?;
    let payload: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Payload file is not valid JSON: {}", path))?;

    let validator = MovieValidator::new();
    let outcome = if partial {
        validator
            .validate_partial(&payload)
            .map(serde_json::to_value)
    } else {
        validator.validate(&payload).map(serde_json::to_value)
    };

    match outcome {
        Ok(serialized) => Ok(Ok(serialized?)),
        Err(errors) => Ok(Err(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn payload_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn path_of(file: &NamedTempFile) -> String {
        file.path().to_string_lossy().to_string()
    }

    #[test]
    fn test_valid_create_payload() {
        let file = payload_file(
            r#"{"title":"Dune","year":2021,"director":"Denis Villeneuve","duration":155,
                "poster":"http://x/d.jpg","genre":["Sci-Fi"]}"#,
        );

        let validated = check_payload_file(&path_of(&file), false).unwrap().unwrap();
        assert_eq!(validated["rate"], 0.0);
        assert!(execute_validate_command(ValidateArgs {
            payload: path_of(&file),
            partial: false,
        })
        .is_ok());
    }

    #[test]
    fn test_invalid_create_payload() {
        let file = payload_file(r#"{"title":"Dune"}"#);

        let errors = check_payload_file(&path_of(&file), false).unwrap().unwrap_err();
        assert!(errors.has_field("year"));
        assert!(execute_validate_command(ValidateArgs {
            payload: path_of(&file),
            partial: false,
        })
        .is_err());
    }

    #[test]
    fn test_partial_payload() {
        let file = payload_file(r#"{"rate":9.5}"#);

        let validated = check_payload_file(&path_of(&file), true).unwrap().unwrap();
        assert_eq!(validated, serde_json::json!({ "rate": 9.5 }));
        // the same body is not a complete movie
        assert!(check_payload_file(&path_of(&file), false).unwrap().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let file = payload_file("{not json");
        assert!(check_payload_file(&path_of(&file), false).is_err());
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let result = check_payload_file("nonexistent.json", false);
        assert!(result.is_err());
    }
}
