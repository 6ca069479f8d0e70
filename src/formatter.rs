use crate::error::Result;
use crate::models::OperationResult;

// Field order is fixed: key type, private key, public key, message, cipher
pub fn format(result: &OperationResult, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeyMode, Operation};
    use proptest::prelude::*;
    use serde_json::Value;

    fn sample() -> OperationResult {
        OperationResult {
            operation: Operation::Encrypt,
            key_mode: KeyMode::Public,
            private_key: String::new(),
            public_key: "MEgCQQDJVV0o3zSnFIJnqs2xzjfAEmA2RNM8hLGvJfI9K9jT4YIDAuFSRGsy".to_string(),
            plaintext: "secret".to_string(),
            ciphertext: "c2VjcmV0".to_string(),
        }
    }

    #[test]
    fn compact_output_has_stable_field_order() {
        let json = format(&sample(), false).unwrap();
        assert_eq!(
            json,
            r#"{"encrypt_key_type":"public","private_key":"","public_key":"MEgCQQDJVV0o3zSnFIJnqs2xzjfAEmA2RNM8hLGvJfI9K9jT4YIDAuFSRGsy","message":"secret","cipher":"c2VjcmV0"}"#
        );
    }

    #[test]
    fn pretty_output_parses_to_the_same_value() {
        let result = sample();
        let pretty = format(&result, true).unwrap();
        let compact = format(&result, false).unwrap();

        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
        assert_eq!(
            serde_json::from_str::<Value>(&pretty).unwrap(),
            serde_json::from_str::<Value>(&compact).unwrap()
        );
    }

    #[test]
    fn decrypt_results_use_decrypt_key_type() {
        let mut result = sample();
        result.operation = Operation::Decrypt;
        result.key_mode = KeyMode::Private;

        let json = format(&result, false).unwrap();
        assert!(json.starts_with(r#"{"decrypt_key_type":"private","#));
    }

    proptest! {
        #[test]
        fn message_and_keys_survive_rendering(
            private_key in ".*",
            public_key in ".*",
            plaintext in ".*",
            ciphertext in "[A-Za-z0-9+/=]*",
            pretty in any::<bool>(),
        ) {
            let result = OperationResult {
                operation: Operation::Encrypt,
                key_mode: KeyMode::Private,
                private_key,
                public_key,
                plaintext,
                ciphertext,
            };

            let value: Value = serde_json::from_str(&format(&result, pretty).unwrap()).unwrap();
            let object = value.as_object().unwrap();

            prop_assert_eq!(object.len(), 5);
            prop_assert_eq!(object["encrypt_key_type"].as_str(), Some("private"));
            prop_assert_eq!(object["private_key"].as_str(), Some(result.private_key.as_str()));
            prop_assert_eq!(object["public_key"].as_str(), Some(result.public_key.as_str()));
            prop_assert_eq!(object["message"].as_str(), Some(result.plaintext.as_str()));
            prop_assert_eq!(object["cipher"].as_str(), Some(result.ciphertext.as_str()));
        }
    }
}
