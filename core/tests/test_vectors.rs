//! Verify URL resolution and the login exchange against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use darshana_core::{resolve, ApiClient, ClientConfig, HttpMethod, HttpResponse, User};

const BASE_URL: &str = "http://localhost:5000";

fn client() -> ApiClient {
    ApiClient::new(ClientConfig::new(BASE_URL))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_test_vectors() {
    let raw = include_str!("../../test-vectors/resolve.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let base = case["base"].as_str().unwrap();
        let path = case["path"].as_str().unwrap();
        let expected = case["expected"].as_str().unwrap();

        assert_eq!(resolve(base, path), expected, "{name}: resolve");

        // The client must dispatch exactly what `resolve` returns.
        let c = ApiClient::new(ClientConfig::new(base));
        let req = c.build_request::<()>(HttpMethod::Get, path, None).unwrap();
        assert_eq!(req.url, expected, "{name}: request url");
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[test]
fn auth_test_vectors() {
    let raw = include_str!("../../test-vectors/auth.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let email = case["input"]["email"].as_str().unwrap();
        let password = case["input"]["password"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_login(email, password).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = c.parse_login(response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            let status = expected_error["status"].as_u64().unwrap() as u16;
            assert_eq!(err.status(), Some(status), "{name}: status");
            assert!(err.has_response(), "{name}: server answered");
        } else {
            let session = result.unwrap();
            let expected = &case["expected_result"];
            let user: User = serde_json::from_value(expected["user"].clone()).unwrap();
            assert_eq!(session.user, user, "{name}: user");
            assert_eq!(session.token, expected["token"].as_str().unwrap(), "{name}: token");
        }
    }
}
