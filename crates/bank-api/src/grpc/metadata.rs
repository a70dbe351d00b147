//! 호출자 메타데이터 추출 (세션 기록용).

use tonic::{metadata::MetadataMap, Request};

const GATEWAY_USER_AGENT_KEY: &str = "grpcgateway-user-agent";
const USER_AGENT_KEY: &str = "user-agent";
const FORWARDED_FOR_KEY: &str = "x-forwarded-for";

/// 호출자 정보.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallMetadata {
    pub user_agent: String,
    pub client_ip: String,
}

fn first_value(metadata: &MetadataMap, key: &str) -> Option<String> {
    metadata
        .get(key)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 요청에서 호출자 정보를 추출합니다.
///
/// 게이트웨이를 거친 호출은 게이트웨이가 전달한 값을 우선합니다.
/// 클라이언트 IP는 `x-forwarded-for`의 첫 항목, 없으면 피어 주소입니다.
pub fn extract_call_metadata<T>(request: &Request<T>) -> CallMetadata {
    let metadata = request.metadata();

    let user_agent = first_value(metadata, GATEWAY_USER_AGENT_KEY)
        .or_else(|| first_value(metadata, USER_AGENT_KEY))
        .unwrap_or_default();

    let client_ip = first_value(metadata, FORWARDED_FOR_KEY)
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| request.remote_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_default();

    CallMetadata {
        user_agent,
        client_ip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(entries: &[(&'static str, &str)]) -> Request<()> {
        let mut request = Request::new(());
        for (key, value) in entries {
            request.metadata_mut().insert(*key, value.parse().unwrap());
        }
        request
    }

    #[test]
    fn test_gateway_values_preferred() {
        let md = extract_call_metadata(&request(&[
            ("user-agent", "grpc-go/1.60"),
            ("grpcgateway-user-agent", "Mozilla/5.0"),
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
        ]));

        assert_eq!(md.user_agent, "Mozilla/5.0");
        assert_eq!(md.client_ip, "203.0.113.7");
    }

    #[test]
    fn test_direct_call() {
        let md = extract_call_metadata(&request(&[("user-agent", "grpc-rust/0.12")]));

        assert_eq!(md.user_agent, "grpc-rust/0.12");
        assert_eq!(md.client_ip, "");
    }

    #[test]
    fn test_empty_metadata() {
        assert_eq!(extract_call_metadata(&Request::new(())), CallMetadata::default());
    }
}
