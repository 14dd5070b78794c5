//! Compact signed-and-compressed token codec.
//!
//! Tokens are standard three-segment compact JWTs (RFC 7519) whose
//! payload is DEFLATE-compressed, declared through the `zip: "DEF"`
//! header parameter, and signed with an HMAC over the first two
//! segments (RFC 7515). The codec verifies structure and signature;
//! expiry enforcement belongs to the manager.

use std::io::{Read, Write};
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};

use crate::domain::entities::token::{Claims, BEARER_PREFIX};
use crate::errors::{TokenError, TokenResult};

use super::algorithm::Algorithm;

/// `zip` header value declaring a DEFLATE-compressed payload.
const ZIP_DEFLATE: &str = "DEF";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    zip: Option<String>,
}

// HMAC accepts keys of any length, so construction cannot fail.
macro_rules! hmac_over {
    ($digest:ty, $secret:expr, $input:expr) => {{
        let mut mac =
            <Hmac<$digest>>::new_from_slice($secret).expect("hmac accepts keys of any length");
        mac.update($input);
        mac
    }};
}

/// Stateless encoder/decoder bound to a secret and signing algorithm.
pub struct JwtCodec {
    secret: Vec<u8>,
    algorithm: Algorithm,
}

impl JwtCodec {
    pub fn new(secret: impl Into<Vec<u8>>, algorithm: Algorithm) -> Self {
        Self {
            secret: secret.into(),
            algorithm,
        }
    }

    /// Encodes `claims` into a compact token string.
    ///
    /// The `sub` claim is overwritten with `subject` (omitted when
    /// `None`) and `exp` with `floor(expiry_millis / 1000)` (omitted for
    /// continuous tokens).
    pub fn encode(
        &self,
        mut claims: Claims,
        subject: Option<&str>,
        expiry_millis: Option<i64>,
    ) -> TokenResult<String> {
        claims.sub = subject.map(str::to_string);
        claims.exp = expiry_millis.map(|millis| millis.div_euclid(1000));

        let header = Header {
            alg: self.algorithm.name().to_string(),
            zip: Some(ZIP_DEFLATE.to_string()),
        };
        let header_json = serde_json::to_vec(&header)
            .map_err(|_| TokenError::malformed("header serialization failed"))?;
        let payload_json = serde_json::to_vec(&claims)
            .map_err(|_| TokenError::malformed("claims serialization failed"))?;

        let header_b64 = URL_SAFE_NO_PAD.encode(header_json);
        let payload_b64 = URL_SAFE_NO_PAD.encode(deflate(&payload_json)?);
        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature = self.sign(self.algorithm, signing_input.as_bytes());

        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Decodes and verifies a compact token string.
    ///
    /// Accepts a leading `"Bearer "` prefix and surrounding whitespace.
    /// The header's `alg` drives verification and must name a supported
    /// HMAC algorithm. Expiry is not checked here.
    pub fn decode(&self, token: &str) -> TokenResult<Claims> {
        let token = strip_bearer(token);

        let mut segments = token.split('.');
        let (header_b64, payload_b64, signature_b64) =
            match (segments.next(), segments.next(), segments.next(), segments.next()) {
                (Some(header), Some(payload), Some(signature), None) => {
                    (header, payload, signature)
                }
                _ => {
                    return Err(TokenError::malformed(
                        "expected three dot-separated segments",
                    ))
                }
            };

        let header_json = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| TokenError::malformed("header is not valid base64url"))?;
        let header: Header = serde_json::from_slice(&header_json)
            .map_err(|_| TokenError::malformed("header is not valid JSON"))?;
        let algorithm = Algorithm::from_str(&header.alg)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::malformed("signature is not valid base64url"))?;
        let signing_input = format!("{header_b64}.{payload_b64}");
        if !self.verify(algorithm, signing_input.as_bytes(), &signature) {
            return Err(TokenError::InvalidSignature);
        }

        let payload_raw = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::malformed("payload is not valid base64url"))?;
        let payload_json = match header.zip.as_deref() {
            Some(ZIP_DEFLATE) => inflate(&payload_raw)?,
            None => payload_raw,
            Some(other) => {
                return Err(TokenError::malformed(format!(
                    "unsupported zip parameter: {other}"
                )))
            }
        };

        serde_json::from_slice(&payload_json)
            .map_err(|_| TokenError::malformed("payload is not valid JSON"))
    }

    fn sign(&self, algorithm: Algorithm, input: &[u8]) -> Vec<u8> {
        match algorithm {
            Algorithm::HS256 => hmac_over!(Sha256, &self.secret, input)
                .finalize()
                .into_bytes()
                .to_vec(),
            Algorithm::HS384 => hmac_over!(Sha384, &self.secret, input)
                .finalize()
                .into_bytes()
                .to_vec(),
            Algorithm::HS512 => hmac_over!(Sha512, &self.secret, input)
                .finalize()
                .into_bytes()
                .to_vec(),
        }
    }

    /// Constant-time signature check via the `Mac` verifier.
    fn verify(&self, algorithm: Algorithm, input: &[u8], signature: &[u8]) -> bool {
        match algorithm {
            Algorithm::HS256 => hmac_over!(Sha256, &self.secret, input)
                .verify_slice(signature)
                .is_ok(),
            Algorithm::HS384 => hmac_over!(Sha384, &self.secret, input)
                .verify_slice(signature)
                .is_ok(),
            Algorithm::HS512 => hmac_over!(Sha512, &self.secret, input)
                .verify_slice(signature)
                .is_ok(),
        }
    }
}

/// Strips the bearer prefix when present, then trims whitespace; bare
/// tokens are trimmed as well.
fn strip_bearer(token: &str) -> &str {
    match token.strip_prefix(BEARER_PREFIX) {
        Some(rest) => rest.trim(),
        None => token.trim(),
    }
}

/// DEFLATE in a zlib wrapper, for compatibility with the token
/// producers already deployed against this wire format.
fn deflate(data: &[u8]) -> TokenResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .map_err(|_| TokenError::malformed("payload compression failed"))?;
    encoder
        .finish()
        .map_err(|_| TokenError::malformed("payload compression failed"))
}

fn inflate(data: &[u8]) -> TokenResult<Vec<u8>> {
    let mut inflated = Vec::new();
    if ZlibDecoder::new(data).read_to_end(&mut inflated).is_ok() {
        return Ok(inflated);
    }

    // Some producers emit raw DEFLATE streams (RFC 7516 reading of
    // "DEF") instead of a zlib wrapper; accept those too.
    inflated.clear();
    DeflateDecoder::new(data)
        .read_to_end(&mut inflated)
        .map_err(|_| TokenError::malformed("payload decompression failed"))?;
    Ok(inflated)
}
