use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

/// Compute the `Authorization` header value for a signed OSS request.
///
/// `oss_headers` are the `x-oss-*` request headers; names are lowercased and
/// sorted before they enter the signature.
pub fn authorization(
    credentials: &Credentials,
    verb: &str,
    content_md5: &str,
    content_type: &str,
    date: &str,
    oss_headers: &[(String, String)],
    resource: &str,
) -> String {
    let string_to_sign =
        string_to_sign(verb, content_md5, content_type, date, oss_headers, resource);
    let signature = sign(&credentials.access_key_secret, &string_to_sign);
    format!("OSS {}:{}", credentials.access_key_id, signature)
}

fn sign(secret: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(string_to_sign.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

fn string_to_sign(
    verb: &str,
    content_md5: &str,
    content_type: &str,
    date: &str,
    oss_headers: &[(String, String)],
    resource: &str,
) -> String {
    let mut s = String::new();
    s.push_str(verb);
    s.push('\n');
    s.push_str(content_md5);
    s.push('\n');
    s.push_str(content_type);
    s.push('\n');
    s.push_str(date);
    s.push('\n');
    for (name, value) in canonicalized_oss_headers(oss_headers) {
        s.push_str(&name);
        s.push(':');
        s.push_str(&value);
        s.push('\n');
    }
    s.push_str(resource);
    s
}

fn canonicalized_oss_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    let mut canonical: Vec<(String, String)> = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim().to_string()))
        .filter(|(name, _)| name.starts_with("x-oss-"))
        .collect();
    canonical.sort();
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> Credentials {
        Credentials {
            access_key_id: "44CF9590006BF252F707".to_string(),
            access_key_secret: "OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV".to_string(),
        }
    }

    #[test]
    fn string_to_sign_layout() {
        let headers = vec![
            ("X-OSS-Meta-Author".to_string(), "foo@bar.com".to_string()),
            ("X-OSS-Magic".to_string(), "abracadabra".to_string()),
        ];
        let s = string_to_sign(
            "PUT",
            "eB5eJF1ptWaXm4bijSPyxw==",
            "text/html",
            "Thu, 17 Nov 2005 18:49:58 GMT",
            &headers,
            "/oss-example/nelson",
        );
        assert_eq!(
            s,
            "PUT\neB5eJF1ptWaXm4bijSPyxw==\ntext/html\nThu, 17 Nov 2005 18:49:58 GMT\n\
             x-oss-magic:abracadabra\nx-oss-meta-author:foo@bar.com\n/oss-example/nelson"
        );
    }

    #[test]
    fn signature_matches_known_vector() {
        let sts = "PUT\neB5eJF1ptWaXm4bijSPyxw==\ntext/html\nThu, 17 Nov 2005 18:49:58 GMT\n\
                   x-oss-magic:abracadabra\nx-oss-meta-author:foo@bar.com\n/oss-example/nelson";
        assert_eq!(
            sign("OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV", sts),
            "hD208RWMpg77svXkQRwWXS+V5KQ="
        );
    }

    #[test]
    fn get_signature_without_oss_headers() {
        let sts = "GET\n\n\nThu, 17 Nov 2005 18:49:58 GMT\n/oss-example/nelson";
        assert_eq!(
            sign("OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV", sts),
            "WtqWMKN2f1rytXpaUuo/IoRFqO4="
        );
    }

    #[test]
    fn authorization_shape() {
        let auth = authorization(
            &test_credentials(),
            "GET",
            "",
            "",
            "Thu, 17 Nov 2005 18:49:58 GMT",
            &[],
            "/oss-example/nelson",
        );
        assert_eq!(
            auth,
            "OSS 44CF9590006BF252F707:WtqWMKN2f1rytXpaUuo/IoRFqO4="
        );
    }

    #[test]
    fn non_oss_headers_are_excluded() {
        let headers = vec![
            ("Content-Encoding".to_string(), "gzip".to_string()),
            ("x-oss-object-acl".to_string(), "private".to_string()),
        ];
        let canonical = canonicalized_oss_headers(&headers);
        assert_eq!(
            canonical,
            vec![("x-oss-object-acl".to_string(), "private".to_string())]
        );
    }

    #[test]
    fn header_values_are_trimmed() {
        let headers = vec![(
            "x-oss-server-side-encryption".to_string(),
            " AES256 ".to_string(),
        )];
        let canonical = canonicalized_oss_headers(&headers);
        assert_eq!(canonical[0].1, "AES256");
    }
}
