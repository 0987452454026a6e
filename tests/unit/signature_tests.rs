//! Unit tests for Slack request signature verification.

use approval_relay::slack::signature::SignatureVerifier;
use approval_relay::AppError;

const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
const NOW: i64 = 1_531_420_618;

fn verifier() -> SignatureVerifier {
    SignatureVerifier::new(SECRET, 300)
}

/// Example request from Slack's request-signing documentation.
#[test]
fn accepts_documented_example() {
    let body = "token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
    let signature = "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503";
    verifier()
        .verify_at("1531420618", body.as_bytes(), signature, NOW)
        .expect("documented example verifies");
}

#[test]
fn sign_then_verify() {
    let v = verifier();
    let sig = v.sign("1531420618", b"payload=%7B%7D").expect("sign");
    assert!(sig.starts_with("v0="));
    v.verify_at("1531420618", b"payload=%7B%7D", &sig, NOW)
        .expect("own signature verifies");
}

#[test]
fn rejects_tampered_body() {
    let v = verifier();
    let sig = v.sign("1531420618", b"user_id=U1").expect("sign");
    let err = v
        .verify_at("1531420618", b"user_id=U2", &sig, NOW)
        .expect_err("must fail");
    assert!(matches!(err, AppError::Signature(_)));
}

#[test]
fn rejects_other_secret() {
    let sig = SignatureVerifier::new("another-secret", 300)
        .sign("1531420618", b"a=b")
        .expect("sign");
    assert!(verifier().verify_at("1531420618", b"a=b", &sig, NOW).is_err());
}

#[test]
fn rejects_stale_and_future_timestamps() {
    let v = verifier();
    let old = (NOW - 301).to_string();
    let sig = v.sign(&old, b"a=b").expect("sign");
    assert!(v.verify_at(&old, b"a=b", &sig, NOW).is_err());

    let future = (NOW + 301).to_string();
    let sig = v.sign(&future, b"a=b").expect("sign");
    assert!(v.verify_at(&future, b"a=b", &sig, NOW).is_err());

    let edge = (NOW - 300).to_string();
    let sig = v.sign(&edge, b"a=b").expect("sign");
    assert!(v.verify_at(&edge, b"a=b", &sig, NOW).is_ok());
}

#[test]
fn rejects_malformed_headers() {
    let v = verifier();
    assert!(v.verify_at("", b"a=b", "v0=00", NOW).is_err());
    assert!(v.verify_at("soon", b"a=b", "v0=00", NOW).is_err());
    assert!(v.verify_at("1531420618", b"a=b", "", NOW).is_err());
    assert!(v.verify_at("1531420618", b"a=b", "v1=abcd", NOW).is_err());
    assert!(v.verify_at("1531420618", b"a=b", "v0=not-hex", NOW).is_err());
}

#[test]
fn debug_output_hides_secret() {
    let debug = format!("{:?}", verifier());
    assert!(!debug.contains(SECRET));
}
