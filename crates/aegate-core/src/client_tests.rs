//! Unit tests for the Analytics Engine client

#[cfg(test)]
mod tests {
    use crate::client::{AnalyticsClient, MockSqlTransport, TransportResponse};
    use crate::config::AnalyticsConfig;
    use crate::error::AegateError;
    use crate::template::{ParamValue, Params};
    use std::sync::Arc;

    fn configured() -> AnalyticsConfig {
        AnalyticsConfig::new()
            .with_account_id("acct-1")
            .with_api_token("test-token")
    }

    fn ok_response(body: &str) -> TransportResponse {
        TransportResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn run_query_normalizes_upstream_response() {
        let mut transport = MockSqlTransport::new();
        transport
            .expect_post_sql()
            .withf(|url, token, sql| {
                url == "https://api.cloudflare.com/client/v4/accounts/acct-1/analytics_engine/sql"
                    && token == "test-token"
                    && sql == "SELECT COUNT() as total FROM t"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(ok_response(
                    r#"{"data":[{"total":5}],"meta":[{"name":"total","type":"UInt64"}],"rows":1}"#,
                ))
            });

        let client = AnalyticsClient::with_transport(configured(), Arc::new(transport));
        let result = client
            .run_query("SELECT COUNT() as total FROM t", &Params::new())
            .await
            .unwrap();

        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0]["total"], 5);
        assert_eq!(result.meta.len(), 1);
        assert_eq!(result.meta[0].name, "total");
        assert_eq!(result.meta[0].column_type, "UInt64");
        assert_eq!(result.row_count, 1);
        assert_eq!(result.total_rows, 1);
    }

    #[tokio::test]
    async fn run_query_substitutes_before_sending() {
        let mut transport = MockSqlTransport::new();
        transport
            .expect_post_sql()
            .withf(|_, _, sql| {
                sql == "SELECT * FROM events WHERE ts > NOW() - INTERVAL '7' DAY AND n = 42"
            })
            .times(1)
            .returning(|_, _, _| Ok(ok_response(r#"{"data":[],"meta":[]}"#)));

        let mut params = Params::new();
        params.insert("window".to_string(), ParamValue::from("'7' DAY"));
        params.insert("n".to_string(), ParamValue::from(42));

        let client = AnalyticsClient::with_transport(configured(), Arc::new(transport));
        client
            .run_query(
                "SELECT * FROM events WHERE ts > NOW() - INTERVAL {{window}} AND n = {{n}}",
                &params,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_network_call() {
        let mut transport = MockSqlTransport::new();
        transport.expect_post_sql().times(0);

        let client =
            AnalyticsClient::with_transport(AnalyticsConfig::new(), Arc::new(transport));
        let err = client
            .run_query("SELECT 1", &Params::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AegateError::Config(_)));
    }

    #[tokio::test]
    async fn upstream_rejection_carries_body_and_substituted_query() {
        let mut transport = MockSqlTransport::new();
        transport.expect_post_sql().times(1).returning(|_, _, _| {
            Ok(TransportResponse {
                status: 400,
                body: "unknown column 'bogus'".to_string(),
            })
        });

        let mut params = Params::new();
        params.insert("n".to_string(), ParamValue::from(7));

        let client = AnalyticsClient::with_transport(configured(), Arc::new(transport));
        let err = client
            .run_query("SELECT bogus FROM t WHERE n = {{n}}", &params)
            .await
            .unwrap_err();

        match err {
            AegateError::Upstream { message, query } => {
                assert_eq!(message, "unknown column 'bogus'");
                assert_eq!(query.as_deref(), Some("SELECT bogus FROM t WHERE n = 7"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let mut transport = MockSqlTransport::new();
        transport
            .expect_post_sql()
            .times(1)
            .returning(|_, _, _| Err(AegateError::transport("connection refused")));

        let client = AnalyticsClient::with_transport(configured(), Arc::new(transport));
        let err = client
            .run_query("SELECT 1", &Params::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AegateError::Transport(_)));
    }

    #[tokio::test]
    async fn malformed_upstream_json_is_a_transport_failure() {
        let mut transport = MockSqlTransport::new();
        transport
            .expect_post_sql()
            .times(1)
            .returning(|_, _, _| Ok(ok_response("<html>not json</html>")));

        let client = AnalyticsClient::with_transport(configured(), Arc::new(transport));
        let err = client
            .run_query("SELECT 1", &Params::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AegateError::Transport(_)));
    }

    #[tokio::test]
    async fn list_datasets_prefers_name_column() {
        let mut transport = MockSqlTransport::new();
        transport
            .expect_post_sql()
            .withf(|_, _, sql| sql == "SHOW TABLES")
            .times(1)
            .returning(|_, _, _| {
                Ok(ok_response(
                    r#"{"data":[{"name":"pageviews"},{"name":"clicks"}],"meta":[{"name":"name","type":"String"}],"rows":2}"#,
                ))
            });

        let client = AnalyticsClient::with_transport(configured(), Arc::new(transport));
        let datasets = client.list_datasets().await.unwrap();

        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].id, "pageviews");
        assert_eq!(datasets[0].name, "pageviews");
        assert_eq!(datasets[1].name, "clicks");
    }

    #[tokio::test]
    async fn list_datasets_falls_back_to_first_column() {
        let mut transport = MockSqlTransport::new();
        transport.expect_post_sql().times(1).returning(|_, _, _| {
            Ok(ok_response(
                r#"{"data":[{"table_name":"events"}],"meta":[{"name":"table_name","type":"String"}],"rows":1}"#,
            ))
        });

        let client = AnalyticsClient::with_transport(configured(), Arc::new(transport));
        let datasets = client.list_datasets().await.unwrap();

        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].id, "events");
    }

    #[tokio::test]
    async fn dataset_schema_returns_column_metadata() {
        let mut transport = MockSqlTransport::new();
        transport
            .expect_post_sql()
            .withf(|_, _, sql| sql == "SELECT * FROM pageviews LIMIT 1")
            .times(1)
            .returning(|_, _, _| {
                Ok(ok_response(
                    r#"{"data":[{"ts":"2024-01-01","path":"/"}],"meta":[{"name":"ts","type":"DateTime"},{"name":"path","type":"String"}],"rows":1}"#,
                ))
            });

        let client = AnalyticsClient::with_transport(configured(), Arc::new(transport));
        let columns = client.dataset_schema("pageviews").await.unwrap();

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "ts");
        assert_eq!(columns[0].column_type, "DateTime");
        assert_eq!(columns[1].name, "path");
    }
}
