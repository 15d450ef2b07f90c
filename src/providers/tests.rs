//! Provider tests with HTTP mocking.

#[cfg(test)]
mod duckdns_tests {
    use crate::error::DdnsError;
    use crate::providers::DuckDnsProvider;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer, token: &str) -> DuckDnsProvider {
        DuckDnsProvider::with_base_url(
            vec!["mysubdomain".to_string()],
            token.to_string(),
            Duration::from_secs(2),
            server.uri(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_duckdns_update_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/update"))
            .and(query_param("domains", "mysubdomain"))
            .and(query_param("token", "mytoken"))
            .and(query_param("ip", "5.6.7.8"))
            .and(query_param("ipv6", "2001:db8::1"))
            .and(query_param("clear", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK\n\n\nUPDATED"))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/update"))
            .and(query_param("domains", "mysubdomain"))
            .and(query_param("token", "mytoken"))
            .and(query_param("verbose", "true"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("OK\n5.6.7.8\n2001:db8::1\nUPDATED"),
            )
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, "mytoken")
            .update(Some("5.6.7.8"), Some("2001:db8::1"))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.ipv4.as_deref(), Some("5.6.7.8"));
        assert_eq!(result.domains, vec!["mysubdomain.duckdns.org"]);
        assert!(result.response.contains("UPDATED"));
    }

    #[tokio::test]
    async fn test_duckdns_update_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(200).set_body_string("KO"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, "badtoken")
            .update(None, Some("2001:db8::1"))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("DuckDNS returned: KO"));
    }

    #[tokio::test]
    async fn test_duckdns_result_serializes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK\n5.6.7.8\n\nUPDATED"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, "mytoken")
            .update(Some("5.6.7.8"), None)
            .await
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["provider"], "duckdns");
        assert_eq!(json["success"], true);
        assert_eq!(json["ipv4"], "5.6.7.8");
        assert!(json["ipv6"].is_null());
        assert!(json["error"].is_null());
        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(timestamp.parse::<chrono::DateTime<chrono::Utc>>().is_ok());
    }

    #[tokio::test]
    async fn test_duckdns_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, "mytoken").update(None, None).await;

        assert!(matches!(result, Err(DdnsError::Network(_))));
    }

    #[tokio::test]
    async fn test_duckdns_hostnames() {
        let provider = DuckDnsProvider::new(
            vec!["a".to_string(), "b".to_string()],
            "token".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.hostnames(), vec!["a.duckdns.org", "b.duckdns.org"]);
    }
}

#[cfg(test)]
mod env_resolution_tests {
    use crate::providers::resolve_env;

    #[test]
    fn test_resolve_env_with_value() {
        assert_eq!(resolve_env("plain_value"), "plain_value");
    }

    #[test]
    fn test_resolve_env_with_existing_var() {
        std::env::set_var("TEST_DUCKDNS_UPDATER_VAR", "resolved_value");
        assert_eq!(resolve_env("$TEST_DUCKDNS_UPDATER_VAR"), "resolved_value");
        std::env::remove_var("TEST_DUCKDNS_UPDATER_VAR");
    }

    #[test]
    fn test_resolve_env_with_missing_var() {
        let result = resolve_env("$NONEXISTENT_VAR_12345");
        assert_eq!(result, "$NONEXISTENT_VAR_12345");
    }
}
