use crate::client::PorkbunApi;
use crate::error::PorkbunError;
use crate::models::PingResult;

pub async fn ping(api: &dyn PorkbunApi) -> Result<PingResult, PorkbunError> {
    let your_ip = api
        .ping()
        .await
        .map_err(PorkbunError::upstream("ping the Porkbun API"))?;

    Ok(PingResult {
        status: "ok".to_string(),
        your_ip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mocks::MockPorkbunApi;

    #[tokio::test]
    async fn ping_returns_caller_ip() {
        let mock = MockPorkbunApi::new();

        let result = ping(&mock).await.unwrap();

        assert_eq!(result.status, "ok");
        assert_eq!(result.your_ip, "198.51.100.1");
        assert_eq!(mock.calls(), vec!["ping"]);
    }

    #[tokio::test]
    async fn ping_wraps_upstream_failure() {
        let mock = MockPorkbunApi::new();
        mock.fail_with("All API requests require authentication");

        let err = ping(&mock).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ping the Porkbun API"));
        assert!(message.contains("authentication"));
    }
}
