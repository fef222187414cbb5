use {
    crate::oauth::OAuthError,
    base64::prelude::*,
    hmac::{digest::KeyInit, Hmac, Mac},
    serde::{Deserialize, Serialize},
    sha1::Sha1,
    sha2::Sha256,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

const HMAC_SHA1: &str = "HMAC-SHA1";
const HMAC_SHA256: &str = "HMAC-SHA256";
const PLAINTEXT: &str = "PLAINTEXT";

/// How the signature over the base string is computed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum SignatureMethod {
    /// Base64 of HMAC-SHA1 over the base string. This is what the Twitter API expects.
    #[default]
    #[serde(rename = "HMAC-SHA1")]
    HmacSha1,

    /// Base64 of HMAC-SHA256 over the base string.
    #[serde(rename = "HMAC-SHA256")]
    HmacSha256,

    /// The signing secret itself.
    #[serde(rename = "PLAINTEXT")]
    Plaintext,
}

impl SignatureMethod {
    /// Sign `base_string` with `secret`.
    pub fn sign(&self, base_string: &str, secret: &str) -> String {
        match self {
            Self::HmacSha1 => BASE64_STANDARD.encode(keyed_mac::<Hmac<Sha1>>(base_string, secret).finalize().into_bytes()),
            Self::HmacSha256 => {
                BASE64_STANDARD.encode(keyed_mac::<Hmac<Sha256>>(base_string, secret).finalize().into_bytes())
            }
            Self::Plaintext => secret.to_string(),
        }
    }

    /// Check `signature` over `base_string`. HMAC tags are compared in constant time.
    pub fn verify(&self, base_string: &str, secret: &str, signature: &str) -> bool {
        match self {
            Self::HmacSha1 => verify_mac::<Hmac<Sha1>>(base_string, secret, signature),
            Self::HmacSha256 => verify_mac::<Hmac<Sha256>>(base_string, secret, signature),
            Self::Plaintext => signature == secret,
        }
    }

    /// The `oauth_signature_method` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HmacSha1 => HMAC_SHA1,
            Self::HmacSha256 => HMAC_SHA256,
            Self::Plaintext => PLAINTEXT,
        }
    }
}

fn keyed_mac<M: Mac + KeyInit>(base_string: &str, secret: &str) -> M {
    let mut mac = <M as Mac>::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    mac
}

fn verify_mac<M: Mac + KeyInit>(base_string: &str, secret: &str, signature: &str) -> bool {
    let Ok(tag) = BASE64_STANDARD.decode(signature) else {
        return false;
    };

    keyed_mac::<M>(base_string, secret).verify_slice(&tag).is_ok()
}

impl FromStr for SignatureMethod {
    type Err = OAuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            HMAC_SHA1 => Ok(Self::HmacSha1),
            HMAC_SHA256 => Ok(Self::HmacSha256),
            PLAINTEXT => Ok(Self::Plaintext),
            _ => Err(OAuthError::UnsupportedSignatureMethod(value.to_string())),
        }
    }
}

impl Display for SignatureMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::SignatureMethod,
        crate::oauth::OAuthError,
    };

    #[test_log::test]
    fn hmac_sha1_known_vector() {
        // RFC 2202 test case 2.
        let signature = SignatureMethod::HmacSha1.sign("what do ya want for nothing?", "Jefe");
        assert_eq!(signature, "7/zfauXrL6LSdBbV8YTfnCWafHk=");
    }

    #[test_log::test]
    fn verify_checks_the_decoded_tag() {
        let base_string = "what do ya want for nothing?";
        assert!(SignatureMethod::HmacSha1.verify(base_string, "Jefe", "7/zfauXrL6LSdBbV8YTfnCWafHk="));
        assert!(!SignatureMethod::HmacSha1.verify(base_string, "Jefe", "8/zfauXrL6LSdBbV8YTfnCWafHk="));
        assert!(!SignatureMethod::HmacSha1.verify(base_string, "jefe", "7/zfauXrL6LSdBbV8YTfnCWafHk="));
        assert!(!SignatureMethod::HmacSha1.verify(base_string, "Jefe", "not base64!"));

        let signature = SignatureMethod::HmacSha256.sign(base_string, "Jefe");
        assert!(SignatureMethod::HmacSha256.verify(base_string, "Jefe", &signature));
        assert!(!SignatureMethod::HmacSha1.verify(base_string, "Jefe", &signature));

        assert!(SignatureMethod::Plaintext.verify("ignored", "cs&ts", "cs&ts"));
        assert!(!SignatureMethod::Plaintext.verify("ignored", "cs&ts", "cs&"));
    }

    #[test_log::test]
    fn plaintext_returns_secret() {
        assert_eq!(SignatureMethod::Plaintext.sign("ignored", "cs&ts"), "cs&ts");
    }

    #[test_log::test]
    fn parse_method_names() {
        assert_eq!("hmac-sha1".parse::<SignatureMethod>().unwrap(), SignatureMethod::HmacSha1);
        assert_eq!("HMAC-SHA256".parse::<SignatureMethod>().unwrap(), SignatureMethod::HmacSha256);
        assert_eq!("PLAINTEXT".parse::<SignatureMethod>().unwrap(), SignatureMethod::Plaintext);
        assert_eq!(
            "RSA-SHA1".parse::<SignatureMethod>(),
            Err(OAuthError::UnsupportedSignatureMethod("RSA-SHA1".to_string()))
        );
    }
}
