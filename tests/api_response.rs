use chatkeep::api::models::StreamResponse;
use chatkeep::api::response::extract_content;
use serde_json::json;

#[test]
fn test_extract_content_with_content() {
    let response = json!({
        "choices": [{
            "message": {
                "content": "Hello, world!",
                "role": "assistant"
            }
        }]
    });

    let content = extract_content(&response).unwrap();
    assert_eq!(content, Some("Hello, world!".to_string()));
}

#[test]
fn test_extract_content_without_content() {
    let response = json!({
        "choices": [{
            "message": {
                "role": "assistant"
            }
        }]
    });

    let content = extract_content(&response).unwrap();
    assert_eq!(content, None);
}

#[test]
fn test_extract_content_empty_choices() {
    let response = json!({
        "choices": []
    });

    let result = extract_content(&response);
    assert!(result.is_err());
}

#[test]
fn test_extract_content_missing_choices() {
    let response = json!({
        "error": {"message": "model not found"}
    });

    assert!(extract_content(&response).is_err());
}

#[test]
fn test_stream_chunk_content() {
    let chunk: StreamResponse = serde_json::from_value(json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "delta": {"content": "Hi"}, "finish_reason": null}]
    }))
    .unwrap();

    assert_eq!(chunk.content(), Some("Hi".to_string()));
}

#[test]
fn test_stream_chunk_without_content() {
    let chunk: StreamResponse = serde_json::from_value(json!({
        "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}],
        "x_groq": {"usage": {"total_tokens": 12}}
    }))
    .unwrap();

    assert_eq!(chunk.content(), None);
}
