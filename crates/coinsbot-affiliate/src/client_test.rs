use super::*;
use serde_json::json;

fn test_client() -> AliexpressClient {
    AliexpressClient::with_base_url(
        Credentials {
            app_key: "500100".to_owned(),
            app_secret: "test-secret".to_owned(),
            tracking_id: "coinsbot".to_owned(),
        },
        30,
        "https://api-sg.aliexpress.com/sync",
    )
    .expect("client construction should not fail")
}

#[test]
fn response_key_replaces_dots() {
    assert_eq!(
        response_key("aliexpress.affiliate.productdetail.get"),
        "aliexpress_affiliate_productdetail_get_response"
    );
}

#[test]
fn signed_params_include_protocol_fields_and_sign() {
    let client = test_client();
    let params = client.signed_params(
        LINK_GENERATE_METHOD,
        &[("source_values", "https://x"), ("tracking_id", "coinsbot")],
        1_700_000_000_000,
    );
    assert_eq!(params["app_key"], "500100");
    assert_eq!(params["method"], LINK_GENERATE_METHOD);
    assert_eq!(params["sign_method"], "sha256");
    assert_eq!(params["timestamp"], "1700000000000");
    assert_eq!(params["v"], "2.0");
    assert_eq!(params["format"], "json");
    assert_eq!(params["source_values"], "https://x");
    assert_eq!(params["sign"].len(), 64);
}

#[test]
fn sign_covers_every_other_param() {
    let client = test_client();
    let params = client.signed_params(PRODUCT_DETAIL_METHOD, &[("product_ids", "1")], 42);
    let mut unsigned = params.clone();
    unsigned.remove("sign");
    assert_eq!(params["sign"], sign_params("test-secret", &unsigned));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = AliexpressClient::with_base_url(
        Credentials {
            app_key: "k".to_owned(),
            app_secret: "s".to_owned(),
            tracking_id: "t".to_owned(),
        },
        30,
        "not a url",
    )
    .err()
    .expect("should fail");
    assert!(matches!(err, AffiliateError::InvalidBaseUrl { .. }));
}

#[test]
fn credentials_debug_redacts_secret() {
    let rendered = format!("{:?}", test_client().credentials);
    assert!(!rendered.contains("test-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn error_response_becomes_api_error() {
    let body = json!({
        "error_response": { "code": "IncompleteSignature", "msg": "The request signature does not conform" }
    });
    let err = parse_method_result::<LinkGenerateResult>(LINK_GENERATE_METHOD, body).unwrap_err();
    match err {
        AffiliateError::Api { code, message } => {
            assert_eq!(code, "IncompleteSignature");
            assert!(message.contains("signature"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn top_level_code_becomes_api_error() {
    let body = json!({ "code": "AppKeyNotExist", "message": "app key not exist", "type": "ISV" });
    let err = parse_method_result::<LinkGenerateResult>(LINK_GENERATE_METHOD, body).unwrap_err();
    assert!(matches!(err, AffiliateError::Api { ref code, .. } if code == "AppKeyNotExist"));
}

#[test]
fn non_success_resp_code_becomes_api_error() {
    let body = json!({
        "aliexpress_affiliate_link_generate_response": {
            "resp_result": { "resp_code": 405, "resp_msg": "Invalid tracking id" }
        }
    });
    let err = parse_method_result::<LinkGenerateResult>(LINK_GENERATE_METHOD, body).unwrap_err();
    assert!(matches!(err, AffiliateError::Api { ref code, .. } if code == "405"));
}

#[test]
fn missing_result_is_empty_payload() {
    let body = json!({
        "aliexpress_affiliate_link_generate_response": {
            "resp_result": { "resp_code": 200, "resp_msg": "Call succeeds" }
        }
    });
    let result = parse_method_result::<LinkGenerateResult>(LINK_GENERATE_METHOD, body).unwrap();
    assert!(result.promotion_links.is_none());
}

#[test]
fn missing_method_response_is_error() {
    let body = json!({ "request_id": "abc" });
    let err = parse_method_result::<ProductDetailResult>(PRODUCT_DETAIL_METHOD, body).unwrap_err();
    assert!(matches!(err, AffiliateError::Api { ref code, .. } if code == "missing_response"));
}
