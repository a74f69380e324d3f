use crate::errors::{Result, UtilsError};
use url::form_urlencoded;
use wechat_core::ApiFamily;

/// Escape a value for use inside a URL query (`application/x-www-form-urlencoded`)
pub fn query_escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Check that a URL template is ready to receive a credential: non-empty and
/// ending with the credential parameter's `=`.
pub fn validate_url_template(template: &str) -> Result<()> {
    if template.is_empty() {
        return Err(UtilsError::EmptyUrlTemplate);
    }
    if !template.ends_with('=') {
        return Err(UtilsError::MissingCredentialParam(template.to_string()));
    }
    Ok(())
}

/// Append the escaped credential as the value of the trailing query parameter
pub fn complete_url(template: &str, credential: &str) -> String {
    let escaped = query_escape(credential);
    let mut url = String::with_capacity(template.len() + escaped.len());
    url.push_str(template);
    url.push_str(&escaped);
    url
}

/// Turn a plain endpoint into a URL template for the given family.
///
/// An endpoint already ending with the family's `<param>=` is returned
/// unchanged. One that sets that parameter anywhere else is rejected.
pub fn credential_template(endpoint: &str, family: ApiFamily) -> Result<String> {
    let param = family.credential_param();
    let query = endpoint.split_once('?').map(|(_, query)| query).unwrap_or("");

    let mut pairs = query.split('&').filter(|pair| !pair.is_empty()).peekable();
    while let Some(pair) = pairs.next() {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != param {
            continue;
        }
        if value.is_empty() && pairs.peek().is_none() && endpoint.ends_with('=') {
            return Ok(endpoint.to_string());
        }
        return Err(UtilsError::CredentialAlreadySet(param.to_string()));
    }

    let separator = if !endpoint.contains('?') {
        "?"
    } else if endpoint.ends_with('?') || endpoint.ends_with('&') {
        ""
    } else {
        "&"
    };
    Ok(format!("{}{}{}=", endpoint, separator, param))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_escape() {
        assert_eq!(query_escape("abc_DEF-123"), "abc_DEF-123");
        assert_eq!(query_escape("a b"), "a+b");
        assert_eq!(query_escape("x/y=z&w"), "x%2Fy%3Dz%26w");
    }

    #[test]
    fn test_complete_url() {
        assert_eq!(
            complete_url("https://api.weixin.qq.com/cgi-bin/menu/get?access_token=", "T0K+EN"),
            "https://api.weixin.qq.com/cgi-bin/menu/get?access_token=T0K%2BEN"
        );
    }

    #[test]
    fn test_validate_url_template() {
        assert!(validate_url_template("https://example.com/x?access_token=").is_ok());
        assert_eq!(validate_url_template(""), Err(UtilsError::EmptyUrlTemplate));
        assert!(matches!(
            validate_url_template("https://example.com/x?access_token=abc"),
            Err(UtilsError::MissingCredentialParam(_))
        ));
    }

    #[test]
    fn test_credential_template() {
        assert_eq!(
            credential_template("https://example.com/menu/get", ApiFamily::OfficialAccount)
                .unwrap(),
            "https://example.com/menu/get?access_token="
        );
        assert_eq!(
            credential_template("https://example.com/x?type=1", ApiFamily::Suite).unwrap(),
            "https://example.com/x?type=1&suite_access_token="
        );
        assert_eq!(
            credential_template("https://example.com/x?", ApiFamily::Corp).unwrap(),
            "https://example.com/x?access_token="
        );
        assert_eq!(
            credential_template("https://example.com/x?type=1&access_token=", ApiFamily::Corp)
                .unwrap(),
            "https://example.com/x?type=1&access_token="
        );
    }

    #[test]
    fn test_credential_template_only_trusts_family_param() {
        // Another parameter left empty is not the credential slot
        assert_eq!(
            credential_template("https://example.com/x?type=", ApiFamily::OfficialAccount)
                .unwrap(),
            "https://example.com/x?type=&access_token="
        );
        // access_token is not the suite credential
        assert_eq!(
            credential_template("https://example.com/x?access_token=", ApiFamily::Suite).unwrap(),
            "https://example.com/x?access_token=&suite_access_token="
        );
    }

    #[test]
    fn test_credential_template_rejects_existing_token() {
        let expected = Err(UtilsError::CredentialAlreadySet("access_token".to_string()));
        assert_eq!(
            credential_template(
                "https://example.com/x?access_token=abc",
                ApiFamily::OfficialAccount
            ),
            expected
        );
        assert_eq!(
            credential_template(
                "https://example.com/x?access_token=abc&type=1",
                ApiFamily::OfficialAccount
            ),
            expected
        );
        assert_eq!(
            credential_template("https://example.com/x?access_token=&type=", ApiFamily::Corp),
            expected
        );
    }
}
