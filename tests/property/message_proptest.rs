//! Message length limit properties

use proptest::prelude::*;
use roomchat::shared::message::{body_len, validate_body};

proptest! {
    #[test]
    fn limit_counts_characters(body in "\\PC{0,300}") {
        let chars = body.chars().count();
        prop_assert_eq!(body_len(&body), chars);
        prop_assert_eq!(validate_body(&body, 255).is_ok(), chars <= 255);
    }

    #[test]
    fn multibyte_bodies_at_the_limit_are_accepted(c in any::<char>()) {
        let body: String = std::iter::repeat(c).take(255).collect();
        prop_assert!(validate_body(&body, 255).is_ok());
        let longer = format!("{}{}", body, c);
        prop_assert!(validate_body(&longer, 255).is_err());
    }
}
