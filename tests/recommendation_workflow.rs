//! Integration specifications for the recommendation workflow.
//!
//! Scenarios drive the public service facade and the HTTP router end to end:
//! catalog loading, feature aggregation, artifact inference, thresholding,
//! and ranking, without reaching into private modules.

mod common {
    use std::io::Cursor;
    use std::sync::Arc;

    use admission_ai::catalog::Catalog;
    use admission_ai::scoring::{
        MinMaxScaler, PassModel, RecommendationService, FEATURE_NAMES,
    };

    pub(super) const MAJORS: &str = "id_major,major_name,type,id_university,capacity\n\
900,Kedokteran,saintek,1,50\n\
100,Informatika,saintek,2,120\n\
300,Fisika,saintek,1,60\n\
400,Ilmu Hukum,soshum,1,100\n";

    pub(super) const UNIVERSITIES: &str = "id_university,university_name\n\
1,Universitas Indonesia\n\
2,Institut Teknologi Bandung\n";

    pub(super) fn scaler_json() -> String {
        serde_json::json!({
            "feature_names": FEATURE_NAMES,
            "data_min": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            "data_max": [1000.0, 10.0, 1000.0, 10.0, 1000.0, 1000.0, 1000.0, 1.0]
        })
        .to_string()
    }

    /// Logistic model over the scaled major id: p = sigmoid(5 - 10 * id/1000).
    /// Major 100 scores ~0.98, major 300 ~0.88, major 900 ~0.02.
    pub(super) fn model_json() -> String {
        serde_json::json!({
            "layers": [{
                "weights": [[-10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]],
                "bias": [5.0],
                "activation": "sigmoid"
            }]
        })
        .to_string()
    }

    pub(super) fn build_service() -> RecommendationService {
        let catalog =
            Catalog::load(Cursor::new(MAJORS), Cursor::new(UNIVERSITIES)).expect("catalog loads");
        let scaler = MinMaxScaler::from_reader(Cursor::new(scaler_json())).expect("scaler loads");
        let model = PassModel::from_reader(Cursor::new(model_json())).expect("model loads");

        RecommendationService::new(Arc::new(catalog), Arc::new(scaler), Arc::new(model))
    }

    pub(super) fn science_scores() -> serde_json::Value {
        serde_json::json!({
            "score_kpu": 750.0,
            "score_kua": 780.0,
            "score_ppu": 760.0,
            "score_kmb": 770.0,
            "score_mat_tka": 850.0,
            "score_fis": 820.0,
            "score_kim": 830.0,
            "score_bio": 840.0
        })
    }
}

mod ranking {
    use super::common::*;
    use admission_ai::catalog::Discipline;
    use admission_ai::scoring::{CandidateProfile, Subject, DEFAULT_THRESHOLD};
    use std::collections::BTreeMap;

    fn science_profile() -> CandidateProfile {
        CandidateProfile {
            discipline: Discipline::Science,
            scores: BTreeMap::from([
                (Subject::Kpu, 750.0),
                (Subject::Kua, 780.0),
                (Subject::Ppu, 760.0),
                (Subject::Kmb, 770.0),
                (Subject::Mat, 850.0),
                (Subject::Fis, 820.0),
                (Subject::Kim, 830.0),
                (Subject::Bio, 840.0),
            ]),
        }
    }

    #[test]
    fn ranks_by_probability_and_drops_low_scorers() {
        let service = build_service();
        let ranked = service
            .recommend(&science_profile(), DEFAULT_THRESHOLD)
            .expect("scoring succeeds");

        let ids: Vec<u32> = ranked.iter().map(|entry| entry.id_major).collect();
        assert_eq!(ids, vec![100, 300]);

        for pair in ranked.windows(2) {
            assert!(pair[0].prob_pass >= pair[1].prob_pass);
        }
        assert!(ranked
            .iter()
            .all(|entry| entry.prob_pass >= DEFAULT_THRESHOLD));

        // Joined fields survive into the ranked view.
        assert_eq!(
            ranked[0].university_name.as_deref(),
            Some("Institut Teknologi Bandung")
        );
        assert_eq!(ranked[0].capacity, 120);
        assert_eq!(ranked[0].utbk_capacity, 48);
    }

    #[test]
    fn repeated_requests_return_identical_rankings() {
        let service = build_service();
        let first = service
            .recommend(&science_profile(), DEFAULT_THRESHOLD)
            .expect("scoring succeeds");
        let second = service
            .recommend(&science_profile(), DEFAULT_THRESHOLD)
            .expect("scoring succeeds");
        assert_eq!(first, second);
    }

    #[test]
    fn raising_the_threshold_narrows_the_result() {
        let service = build_service();
        let strict = service
            .recommend(&science_profile(), 0.95)
            .expect("scoring succeeds");

        let ids: Vec<u32> = strict.iter().map(|entry| entry.id_major).collect();
        assert_eq!(ids, vec![100]);
    }
}

mod routing {
    use super::common::*;
    use admission_ai::scoring::recommendation_router;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        recommendation_router(Arc::new(build_service()))
    }

    fn post_request(payload: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/recommendations")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(payload).expect("serialize payload"),
            ))
            .expect("request")
    }

    #[tokio::test]
    async fn post_recommendations_returns_ranked_majors() {
        let router = build_router();
        let payload = json!({
            "test_type": "science",
            "scores": science_scores()
        });

        let response = router.oneshot(post_request(&payload)).await.expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");

        assert_eq!(payload.get("matches").and_then(Value::as_u64), Some(2));
        let recommendations = payload
            .get("recommendations")
            .and_then(Value::as_array)
            .expect("recommendations array");
        assert_eq!(recommendations.len(), 2);
        assert_eq!(
            recommendations[0].get("id_major").and_then(Value::as_u64),
            Some(100)
        );
        assert!(payload.get("message").is_none());
    }

    #[tokio::test]
    async fn limit_truncates_but_matches_reports_full_count() {
        let router = build_router();
        let payload = json!({
            "test_type": "science",
            "scores": science_scores(),
            "limit": 1
        });

        let response = router.oneshot(post_request(&payload)).await.expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");

        assert_eq!(payload.get("matches").and_then(Value::as_u64), Some(2));
        assert_eq!(
            payload
                .get("recommendations")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(1)
        );
    }

    #[tokio::test]
    async fn unreachable_threshold_yields_empty_result_with_message() {
        let router = build_router();
        let payload = json!({
            "test_type": "science",
            "scores": science_scores(),
            "threshold": 1.0
        });

        let response = router.oneshot(post_request(&payload)).await.expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");

        assert_eq!(payload.get("matches").and_then(Value::as_u64), Some(0));
        assert!(payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .contains("threshold"));
    }

    #[tokio::test]
    async fn missing_subject_is_rejected_with_validation_error() {
        let router = build_router();
        let mut scores = science_scores();
        scores
            .as_object_mut()
            .expect("object")
            .remove("score_bio");
        let payload = json!({
            "test_type": "science",
            "scores": scores
        });

        let response = router.oneshot(post_request(&payload)).await.expect("dispatch");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .contains("BIO"));
    }

    #[tokio::test]
    async fn unknown_discipline_is_rejected_before_scoring() {
        let router = build_router();
        let payload = json!({
            "test_type": "vokasi",
            "scores": science_scores()
        });

        let response = router.oneshot(post_request(&payload)).await.expect("dispatch");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
