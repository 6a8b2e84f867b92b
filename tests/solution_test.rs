mod common;

use serde_json::Value;

#[tokio::test]
async fn create_solution_with_author() {
    let app = common::spawn_app().await;
    let (user_id, token) = common::create_test_user(&app, "sol_author").await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "CF-148A",
            "title": "Insomnia cure",
            "content": "Count the numbers divisible by k, l, m or n."
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["problem_code"], "CF-148A");
    assert_eq!(body["data"]["author"]["id"], user_id);
    assert_eq!(body["data"]["is_anonymous"], false);
    assert_eq!(body["data"]["reaction_count"], 0);
}

#[tokio::test]
async fn visitor_submission_is_anonymous() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .json(&serde_json::json!({
            "problem_code": "ABC300-D",
            "title": "Drive-by solution",
            "content": "DP over prime exponents."
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["is_anonymous"], true);
    assert_eq!(body["data"]["is_public"], false);
    assert!(body["data"]["author"].is_null());
}

#[tokio::test]
async fn visitor_public_post_rejected() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .json(&serde_json::json!({
            "problem_code": "ABC301-A",
            "title": "Overwrite",
            "content": "Keep the last occurrence of each key.",
            "is_public": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn anonymous_solutions_are_forced_private() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "anon_priv").await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "71A",
            "title": "Way too long words",
            "content": "Abbreviate anything over ten characters.",
            "is_public": true,
            "is_anonymous": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["is_anonymous"], true);
    assert_eq!(body["data"]["is_public"], false);
}

#[tokio::test]
async fn solutions_default_to_private() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "default_priv").await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "50A",
            "title": "Domino piling",
            "content": "Floor of m*n over 2."
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["is_public"], false);

    let resp = app
        .client
        .get(app.url("/solutions?public=true"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn anonymous_flag_hides_author() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "anon_flag").await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "9A",
            "title": "Die roll",
            "content": "Probability is (7 - max) / 6.",
            "is_anonymous": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let id = body["data"]["id"].as_i64().unwrap();
    assert!(body["data"]["author"].is_null());

    // The detail view must hide the author too.
    let resp = app
        .client
        .get(app.url(&format!("/solutions/{}", id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["is_anonymous"], true);
    assert!(body["data"]["author"].is_null());
}

#[tokio::test]
async fn create_solution_rejects_empty_title() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "val_user").await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "10A",
            "title": "",
            "content": "Something"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn detail_renders_markdown() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "md_user").await;
    let id = common::create_test_solution(&app, &token, "CF-4A").await;

    let resp = app
        .client
        .get(app.url(&format!("/solutions/{}", id)))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let html = body["data"]["content_html"].as_str().unwrap();
    assert!(html.contains("<pre"));
    assert!(html.contains("<p>"));
}

#[tokio::test]
async fn get_missing_solution_returns_404() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/solutions/999999"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn list_groups_and_orders_problem_codes() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "order_user").await;

    for code in ["10A", "9A", "10B", "9A"] {
        common::create_test_solution(&app, &token, code).await;
    }

    let resp = app.client.get(app.url("/solutions")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    let codes: Vec<&str> = body["data"]["problem_codes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    // Numeric order, not lexicographic: 9A before 10A.
    assert_eq!(codes, vec!["9A", "10A", "10B"]);

    assert_eq!(body["data"]["groups"]["9A"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["groups"]["10A"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["total"], 4);
}

#[tokio::test]
async fn list_orders_prefixed_codes() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "prefix_user").await;

    for code in ["CF-1000A", "ABC-2B", "CF-999C", "ABC-10A"] {
        common::create_test_solution(&app, &token, code).await;
    }

    let resp = app.client.get(app.url("/solutions")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    let codes: Vec<&str> = body["data"]["problem_codes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["ABC-2B", "ABC-10A", "CF-999C", "CF-1000A"]);
}

#[tokio::test]
async fn public_filter_hides_private_solutions() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "pub_user").await;

    common::create_test_solution(&app, &token, "100A").await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "100B",
            "title": "Private notes",
            "content": "Not ready to share.",
            "is_public": false
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url("/solutions?public=true"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert!(body["data"]["groups"].get("100B").is_none());
}

#[tokio::test]
async fn draft_solutions_stay_out_of_listings() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "draft_sol").await;

    common::create_test_solution(&app, &token, "150A").await;

    let resp = app
        .client
        .post(app.url("/solutions"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "150B",
            "title": "Half-finished",
            "content": "TODO prove the bound.",
            "is_draft": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let draft_id = body["data"]["id"].as_i64().unwrap();

    let resp = app.client.get(app.url("/solutions")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert!(body["data"]["groups"].get("150B").is_none());

    // Still reachable directly.
    let resp = app
        .client
        .get(app.url(&format!("/solutions/{}", draft_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn own_solutions_require_auth() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/solutions?public=false"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn own_solutions_filter_returns_only_mine() {
    let app = common::spawn_app().await;
    let (_, token_a) = common::create_test_user(&app, "mine_a").await;
    let (_, token_b) = common::create_test_user(&app, "mine_b").await;

    common::create_test_solution(&app, &token_a, "200A").await;
    common::create_test_solution(&app, &token_b, "200B").await;

    let resp = app
        .client
        .get(app.url("/solutions?public=false"))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert!(body["data"]["groups"].get("200A").is_some());
}

#[tokio::test]
async fn search_matches_title() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "search_user").await;

    app.client
        .post(app.url("/solutions"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "300A",
            "title": "Segment tree beats",
            "content": "Lazy propagation with max."
        }))
        .send()
        .await
        .unwrap();
    common::create_test_solution(&app, &token, "300B").await;

    let resp = app
        .client
        .get(app.url("/solutions?search=segment%20TREE"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert!(body["data"]["groups"].get("300A").is_some());
}

#[tokio::test]
async fn problem_filter_is_exact() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "exact_user").await;

    common::create_test_solution(&app, &token, "400A").await;
    common::create_test_solution(&app, &token, "400AB").await;

    let resp = app
        .client
        .get(app.url("/solutions?problem=400A"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn author_can_update_solution() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "upd_user").await;
    let id = common::create_test_solution(&app, &token, "500A").await;

    let resp = app
        .client
        .put(app.url(&format!("/solutions/{}", id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "problem_code": "500A",
            "title": "Better title",
            "content": "Rewritten with a cleaner proof."
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Better title");
}

#[tokio::test]
async fn other_user_cannot_update_solution() {
    let app = common::spawn_app().await;
    let (_, token_a) = common::create_test_user(&app, "owner").await;
    let (_, token_b) = common::create_test_user(&app, "intruder").await;
    let id = common::create_test_solution(&app, &token_a, "600A").await;

    let resp = app
        .client
        .put(app.url(&format!("/solutions/{}", id)))
        .bearer_auth(&token_b)
        .json(&serde_json::json!({
            "problem_code": "600A",
            "title": "Hijacked",
            "content": "Mine now."
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn admin_can_update_any_solution() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "victim").await;
    let (_, admin_token) = common::create_admin_user(&app, "mod").await;
    let id = common::create_test_solution(&app, &token, "700A").await;

    let resp = app
        .client
        .put(app.url(&format!("/solutions/{}", id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "problem_code": "700A",
            "title": "Cleaned up by a moderator",
            "content": "Formatting fixed."
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn update_requires_auth() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "noauth_upd").await;
    let id = common::create_test_solution(&app, &token, "800A").await;

    let resp = app
        .client
        .put(app.url(&format!("/solutions/{}", id)))
        .json(&serde_json::json!({
            "problem_code": "800A",
            "title": "x",
            "content": "y"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn author_can_delete_solution() {
    let app = common::spawn_app().await;
    let (_, token) = common::create_test_user(&app, "del_user").await;
    let id = common::create_test_solution(&app, &token, "900A").await;

    let resp = app
        .client
        .delete(app.url(&format!("/solutions/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/solutions/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn other_user_cannot_delete_solution() {
    let app = common::spawn_app().await;
    let (_, token_a) = common::create_test_user(&app, "del_owner").await;
    let (_, token_b) = common::create_test_user(&app, "del_intruder").await;
    let id = common::create_test_solution(&app, &token_a, "901A").await;

    let resp = app
        .client
        .delete(app.url(&format!("/solutions/{}", id)))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
}
