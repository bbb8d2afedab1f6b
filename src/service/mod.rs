//! Client for the external feature service
//!
//! The service answers three JSON endpoints: structure RMSD scoring, sentence
//! review and movie recommendation. Requests carry the submitted form fields
//! as a flat JSON object of strings.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;

/// One of the proxied features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Rmsd,
    Review,
    Movie,
}

impl Feature {
    /// Endpoint path on the service
    pub fn endpoint(&self) -> &'static str {
        match self {
            Feature::Rmsd => "calculate_rmsd",
            Feature::Review => "review_sentence",
            Feature::Movie => "movie_rec",
        }
    }

    /// Template rendering the form and its result
    pub fn template(&self) -> &'static str {
        match self {
            Feature::Rmsd => "rmsd.html",
            Feature::Review => "review.html",
            Feature::Movie => "movie.html",
        }
    }

    /// Form fields forwarded to the service, in payload order
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Feature::Rmsd => &["pdbID1", "pdbID2"],
            Feature::Review => &["sentences"],
            Feature::Movie => &["userid"],
        }
    }

    /// Field that must be non-empty, with the label used in the error.
    /// RMSD forwards whatever it gets.
    pub fn required_field(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Feature::Rmsd => None,
            Feature::Review => Some(("sentences", "Sentences")),
            Feature::Movie => Some(("userid", "Movies")),
        }
    }

    /// Build the JSON payload from submitted form values; absent fields are sent empty
    pub fn payload(&self, form: &HashMap<String, String>) -> Map<String, Value> {
        self.fields()
            .iter()
            .map(|field| {
                let value = form.get(*field).cloned().unwrap_or_default();
                (field.to_string(), Value::String(value))
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RmsdResponse {
    #[serde(default)]
    rmsd: f64,
}

#[derive(Debug, Default, Deserialize)]
struct TextResponse {
    #[serde(default)]
    result: ResultText,
}

/// The recommendation endpoint answers with a list, review with a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultText {
    Text(String),
    List(Vec<String>),
}

impl Default for ResultText {
    fn default() -> Self {
        ResultText::Text(String::new())
    }
}

impl ResultText {
    fn into_string(self) -> String {
        match self {
            ResultText::Text(text) => text,
            ResultText::List(items) => items.join(", "),
        }
    }
}

/// Format an RMSD score for display
pub fn format_rmsd(score: f64) -> String {
    format!("RMSD Score: {:.6}", score)
}

/// HTTP client bound to the service base URL
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// Create a client; without a timeout a hung service blocks only the caller
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of a feature endpoint
    pub fn url_for(&self, feature: Feature) -> String {
        format!("{}/{}", self.base_url, feature.endpoint())
    }

    /// POST the payload and return the display string for the result
    pub async fn call(&self, feature: Feature, payload: &Map<String, Value>) -> Result<String> {
        let url = self.url_for(feature);
        tracing::debug!("POST {} {}", url, serde_json::Value::Object(payload.clone()));

        let response = self.client.post(&url).json(payload).send().await?;

        let display = match feature {
            Feature::Rmsd => format_rmsd(response.json::<RmsdResponse>().await?.rmsd),
            Feature::Review | Feature::Movie => {
                response.json::<TextResponse>().await?.result.into_string()
            }
        };
        Ok(display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Serve `reply` on every endpoint and record the last request body
    async fn fake_service(reply: Value) -> (String, Arc<Mutex<Option<String>>>) {
        let seen = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let handler = move |body: String| {
            let recorder = recorder.clone();
            let reply = reply.clone();
            async move {
                *recorder.lock().unwrap() = Some(body);
                Json(reply)
            }
        };
        let app = Router::new()
            .route("/calculate_rmsd", post(handler.clone()))
            .route("/review_sentence", post(handler.clone()))
            .route("/movie_rec", post(handler));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    #[test]
    fn test_rmsd_payload_keeps_field_order() {
        let payload = Feature::Rmsd.payload(&form(&[("pdbID2", "B"), ("pdbID1", "A")]));
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"pdbID1":"A","pdbID2":"B"}"#
        );
    }

    #[test]
    fn test_missing_fields_are_sent_empty() {
        let payload = Feature::Movie.payload(&HashMap::new());
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"userid":""}"#);
    }

    #[test]
    fn test_format_rmsd() {
        assert_eq!(format_rmsd(1.5), "RMSD Score: 1.500000");
        assert_eq!(format_rmsd(0.0), "RMSD Score: 0.000000");
    }

    #[test]
    fn test_url_for() {
        let client = ServiceClient::new("http://127.0.0.1:5000/", None).unwrap();
        assert_eq!(
            client.url_for(Feature::Review),
            "http://127.0.0.1:5000/review_sentence"
        );
    }

    #[tokio::test]
    async fn test_call_rmsd() {
        let (base, seen) = fake_service(serde_json::json!({ "rmsd": 1.5 })).await;
        let client = ServiceClient::new(&base, None).unwrap();

        let payload = Feature::Rmsd.payload(&form(&[("pdbID1", "A"), ("pdbID2", "B")]));
        let result = client.call(Feature::Rmsd, &payload).await.unwrap();

        assert_eq!(result, "RMSD Score: 1.500000");
        assert_eq!(
            seen.lock().unwrap().as_deref(),
            Some(r#"{"pdbID1":"A","pdbID2":"B"}"#)
        );
    }

    #[tokio::test]
    async fn test_call_with_debug_logging() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (base, seen) = fake_service(serde_json::json!({ "result": "Positive" })).await;
        let client = ServiceClient::new(&base, None).unwrap();

        let payload = Feature::Review.payload(&form(&[("sentences", "Great film.")]));
        let result = client.call(Feature::Review, &payload).await.unwrap();
        assert_eq!(result, "Positive");
        assert_eq!(
            seen.lock().unwrap().as_deref(),
            Some(r#"{"sentences":"Great film."}"#)
        );
    }

    #[tokio::test]
    async fn test_call_movie_accepts_list_result() {
        let (base, _) = fake_service(serde_json::json!({ "result": ["Paddington 2", "Heat"] })).await;
        let client = ServiceClient::new(&base, None).unwrap();

        let payload = Feature::Movie.payload(&form(&[("userid", "42")]));
        let result = client.call(Feature::Movie, &payload).await.unwrap();
        assert_eq!(result, "Paddington 2, Heat");
    }

    #[tokio::test]
    async fn test_missing_key_yields_zero_value() {
        let (base, _) = fake_service(serde_json::json!({})).await;
        let client = ServiceClient::new(&base, None).unwrap();

        let review = client
            .call(Feature::Review, &Feature::Review.payload(&form(&[("sentences", "Hi.")])))
            .await
            .unwrap();
        assert_eq!(review, "");

        let rmsd = client
            .call(Feature::Rmsd, &Feature::Rmsd.payload(&HashMap::new()))
            .await
            .unwrap();
        assert_eq!(rmsd, "RMSD Score: 0.000000");
    }

    #[tokio::test]
    async fn test_non_object_response_is_an_error() {
        let (base, _) = fake_service(serde_json::json!("nope")).await;
        let client = ServiceClient::new(&base, None).unwrap();

        let err = client
            .call(Feature::Review, &Feature::Review.payload(&HashMap::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::WikiError::Upstream(_)));
    }
}
