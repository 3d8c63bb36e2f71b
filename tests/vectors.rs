use bcrypt_codec::{hash_with_salt, verify, Error};

// Published OpenBSD / jBCrypt test vectors at cost 6.
const VECTORS: &[(&str, &str, &str)] = &[
    (
        "",
        "$2a$06$DCq7YPn5Rq63x1Lad4cll.",
        "$2a$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s.",
    ),
    (
        "a",
        "$2a$06$m0CrhHm10qJ3lXRY.5zDGO",
        "$2a$06$m0CrhHm10qJ3lXRY.5zDGO3rS2KdeeWLuGmsfGlMfOxih58VYVfxe",
    ),
    (
        "abc",
        "$2a$06$If6bvum7DFjUnE9p2uDeDu",
        "$2a$06$If6bvum7DFjUnE9p2uDeDu0YHzrHM6tf.iqN8.yx.jNN1ILEf7h0i",
    ),
];

#[test]
fn test_known_hashes() {
    for (password, salt, expected) in VECTORS {
        assert_eq!(&hash_with_salt(password, salt).unwrap(), expected);
    }
}

#[test]
fn test_known_hashes_verify() {
    for (password, _, hash) in VECTORS {
        assert!(verify(password, hash).unwrap());
        assert!(!verify(format!("{password}x"), hash).unwrap());
    }
}

#[test]
fn test_2y_variant() {
    let hash = hash_with_salt("abc", "$2y$06$If6bvum7DFjUnE9p2uDeDu").unwrap();
    assert_eq!(
        hash,
        "$2y$06$If6bvum7DFjUnE9p2uDeDu0YHzrHM6tf.iqN8.yx.jNN1ILEf7h0i"
    );
    assert!(verify("abc", &hash).unwrap());
}

#[test]
fn test_salt_is_reencoded() {
    let hash = hash_with_salt("abcdefghijklmnopqrstuvwxyz", "$2a$04$abcdefghijklmnopqrstuu").unwrap();
    assert_eq!(
        hash,
        "$2a$04$abcdefghijklmnopqrstuucUHlaG.p8AVcD5w/eidx9TAkwV4EXAW"
    );
}

#[test]
fn test_concrete_scenario() {
    let hash = hash_with_salt("pa$$w0rd", "$2a$10$MkkJUCZctqHDtrcWu0gfOe").unwrap();
    assert_eq!(hash.len(), 60);
    assert_eq!(
        hash,
        "$2a$10$MkkJUCZctqHDtrcWu0gfOeQJw2ow1WpfdQ0xTJuVylVKscSEetwXm"
    );
    assert!(verify("pa$$w0rd", &hash).unwrap());
    assert!(!verify("wrong", &hash).unwrap());
}

#[test]
fn test_unsupported_prefix_is_malformed() {
    let openbsd_2b = "$2b$06$If6bvum7DFjUnE9p2uDeDu0YHzrHM6tf.iqN8.yx.jNN1ILEf7h0i";
    assert!(matches!(
        verify("abc", openbsd_2b),
        Err(Error::MalformedRecord { .. })
    ));
}

#[test]
fn test_non_canonical_salt_is_rejected() {
    let hash = "$2a$10$MkkJUCZctqHDtrcWu0gfOeQJw2ow1WpfdQ0xTJuVylVKscSEetwXm";
    let tampered = hash.replacen("gfOe", "gfOf", 1);
    assert!(matches!(
        verify("pa$$w0rd", &tampered),
        Err(Error::MalformedRecord { .. })
    ));
    assert!(!bcrypt_codec::matches("pa$$w0rd", &tampered));
}
