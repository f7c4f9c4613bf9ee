use mediadb_es::HybridQuery;

fn should_clauses(body: &serde_json::Value) -> &Vec<serde_json::Value> {
    body["query"]["bool"]["should"]
        .as_array()
        .expect("should group")
}

#[test]
fn no_signals_yields_empty_should_group() {
    let body = HybridQuery {
        score_threshold: None,
        ..HybridQuery::default()
    }
    .build_request();

    assert!(should_clauses(&body).is_empty());
    assert_eq!(body["query"]["bool"]["minimum_should_match"], 0);
    assert!(body["query"]["bool"].get("filter").is_none());
    assert!(body.get("min_score").is_none());
}

#[test]
fn vector_only_query() {
    let body = HybridQuery {
        embedding: Some(vec![0.1, 0.2, 0.3]),
        ..HybridQuery::default()
    }
    .build_request();

    let should = should_clauses(&body);
    assert_eq!(should.len(), 1, "knn is the only scored clause");
    let knn = &should[0]["knn"];
    assert_eq!(knn["field"], "embedding");
    assert_eq!(knn["k"], 10);
    assert_eq!(knn["num_candidates"], 100);
    assert!((knn["boost"].as_f64().expect("boost") - 1.0).abs() < 1e-6);
    assert_eq!(body["from"], 0);
    assert_eq!(body["size"], 10);
    assert!(body["query"]["bool"].get("filter").is_none());
    assert_eq!(body["query"]["bool"]["minimum_should_match"], 1);
}

#[test]
fn knn_sizing_tracks_effective_size() {
    let body = HybridQuery {
        embedding: Some(vec![0.0; 8]),
        page_size: 40,
        ..HybridQuery::default()
    }
    .build_request();
    let knn = &should_clauses(&body)[0]["knn"];
    assert_eq!(knn["k"], 40);
    assert_eq!(knn["num_candidates"], 200, "5x size once past the 100 floor");

    let body = HybridQuery {
        embedding: Some(vec![0.0; 8]),
        limit: Some(3),
        ..HybridQuery::default()
    }
    .build_request();
    let knn = &should_clauses(&body)[0]["knn"];
    assert_eq!(knn["k"], 3, "limit overrides the window size and k");
    assert_eq!(knn["num_candidates"], 100, "floor keeps recall up for tiny windows");
}

#[test]
fn offset_is_independent_of_limit() {
    let body = HybridQuery {
        page_index: 3,
        page_size: 10,
        limit: Some(50),
        ..HybridQuery::default()
    }
    .build_request();
    assert_eq!(body["size"], 50);
    assert_eq!(
        body["from"], 20,
        "offset stays (page_index - 1) * page_size even under a limit override"
    );
}

#[test]
fn hybrid_query_with_filters() {
    let body = HybridQuery {
        embedding: Some(vec![0.1, 0.2, 0.3]),
        keywords: Some(vec!["cat".to_string()]),
        title: Some("orange cat".to_string()),
        media_type: Some(2),
        valid_data: Some(true),
        ..HybridQuery::default()
    }
    .build_request();

    let should = should_clauses(&body);
    assert_eq!(should.len(), 3, "knn + terms + match");
    assert_eq!(should[0]["match"]["description"]["query"], "orange cat");
    let match_boost = should[0]["match"]["description"]["boost"]
        .as_f64()
        .expect("match boost");
    assert!((match_boost - 0.1).abs() < 1e-6, "match boost is half the text boost");
    assert_eq!(should[1]["terms"]["keywords"][0], "cat");
    let terms_boost = should[1]["terms"]["boost"].as_f64().expect("terms boost");
    assert!((terms_boost - 0.2).abs() < 1e-6);

    let filter = body["query"]["bool"]["filter"].as_array().expect("filter");
    assert_eq!(filter.len(), 2);
    assert_eq!(filter[0]["term"]["media_type"], 2);
    assert_eq!(filter[1]["term"]["valid_data"], true);
    assert_eq!(body["query"]["bool"]["minimum_should_match"], 1);
}

#[test]
fn keywords_without_title_still_emits_match_clause() {
    // Long-standing behavior: the description match rides along with the
    // terms clause even when no title was given, with a null query value.
    let body = HybridQuery {
        keywords: Some(vec!["cat".to_string()]),
        ..HybridQuery::default()
    }
    .build_request();

    let should = should_clauses(&body);
    assert_eq!(should.len(), 2);
    assert!(should[0]["match"]["description"]["query"].is_null());
}

#[test]
fn valid_data_false_adds_no_filter() {
    let body = HybridQuery {
        valid_data: Some(false),
        ..HybridQuery::default()
    }
    .build_request();
    assert!(body["query"]["bool"].get("filter").is_none());
}

#[test]
fn filters_only_query_still_executes() {
    let body = HybridQuery {
        media_type: Some(1),
        ..HybridQuery::default()
    }
    .build_request();
    assert!(should_clauses(&body).is_empty());
    assert_eq!(body["query"]["bool"]["minimum_should_match"], 0);
    assert_eq!(
        body["query"]["bool"]["filter"].as_array().expect("filter").len(),
        1
    );
}

#[test]
fn default_threshold_and_sort() {
    let body = HybridQuery::default().build_request();
    let min_score = body["min_score"].as_f64().expect("min_score");
    assert!((min_score - 0.7).abs() < 1e-6);
    assert_eq!(body["sort"][0]["_score"]["order"], "desc");
}

#[test]
fn source_projection_excludes_embeddings() {
    let body = HybridQuery::default().build_request();
    let excludes = body["_source"]["excludes"].as_array().expect("excludes");
    assert!(excludes.contains(&serde_json::json!("embedding")));
    assert!(excludes.contains(&serde_json::json!("*.embedding")));
}

#[test]
fn extreme_window_values_saturate_instead_of_overflowing() {
    let query = HybridQuery {
        embedding: Some(vec![0.1, 0.2, 0.3]),
        page_index: u32::MAX,
        page_size: u32::MAX,
        ..HybridQuery::default()
    };
    assert_eq!(query.offset(), u32::MAX);

    let body = query.build_request();
    assert_eq!(body["from"], u32::MAX);
    let knn = &should_clauses(&body)[0]["knn"];
    assert_eq!(knn["num_candidates"], u32::MAX, "5x size clamps at the type bound");
}

#[test]
fn empty_signal_collections_are_skipped() {
    let body = HybridQuery {
        embedding: Some(Vec::new()),
        keywords: Some(Vec::new()),
        ..HybridQuery::default()
    }
    .build_request();
    assert!(should_clauses(&body).is_empty());
    assert_eq!(body["query"]["bool"]["minimum_should_match"], 0);
}
