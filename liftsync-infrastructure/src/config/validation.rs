use reqwest::Url;

use liftsync_domain::ConfigurationError;

pub fn validate_http_url(field: &str, value: &str) -> Result<Url, ConfigurationError> {
    let url = Url::parse(value.trim())
        .map_err(|err| ConfigurationError::new(format!("invalid {field}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigurationError::new(format!(
            "{field} must use http or https, got {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ConfigurationError::new(format!("{field} has no host")));
    }
    Ok(url)
}

/// Table and column names end up inside PostgREST query strings.
pub fn validate_identifier(field: &str, value: &str) -> Result<(), ConfigurationError> {
    if value.is_empty() {
        return Err(ConfigurationError::new(format!("{field} must not be empty")));
    }
    if !value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(ConfigurationError::new(format!(
            "{field} must contain only letters, digits and underscores: {value}"
        )));
    }
    Ok(())
}

pub fn validate_endpoint_path(field: &str, value: &str) -> Result<(), ConfigurationError> {
    if !value.starts_with('/') {
        return Err(ConfigurationError::new(format!("{field} must start with '/'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(validate_http_url("store_url", "https://abc.supabase.co").is_ok());
        assert!(validate_http_url("notify_url", " http://127.0.0.1:8080/hook ").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(validate_http_url("store_url", "ftp://example.com").is_err());
        assert!(validate_http_url("store_url", "not a url").is_err());
    }

    #[test]
    fn identifiers_reject_query_syntax() {
        assert!(validate_identifier("store_table", "lifting_results").is_ok());
        assert!(validate_identifier("store_key_column", "event_id,meet").is_err());
        assert!(validate_identifier("store_table", "").is_err());
    }
}
