pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Short hex id used for challenge/invite correlation on the wire.
pub fn new_challenge_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn new_id_is_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
    }

    #[test]
    fn challenge_id_length() {
        let cid = new_challenge_id();
        assert_eq!(cid.len(), 8);
    }

    #[test]
    fn challenge_id_is_hex() {
        let cid = new_challenge_id();
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn challenge_id_is_unique() {
        let a = new_challenge_id();
        let b = new_challenge_id();
        assert_ne!(a, b);
    }
}
