mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn follow_rules_and_counters() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let (ana_id, ana) = t.signup("ana").await?;
    let (bob_id, bob) = t.signup("bob").await?;

    let own = t.post(&format!("/users/{ana_id}/follow"), &ana, json!({})).await?;
    assert_eq!(own.status, StatusCode::BAD_REQUEST);
    let ok = t.post(&format!("/users/{bob_id}/follow"), &ana, json!({})).await?;
    assert_eq!(ok.status, StatusCode::CREATED);
    let dup = t.post(&format!("/users/{bob_id}/follow"), &ana, json!({})).await?;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    let ghost = t.post(&format!("/users/{}/follow", uuid::Uuid::new_v4()), &ana, json!({})).await?;
    assert_eq!(ghost.status, StatusCode::NOT_FOUND);

    let profile = t.get(&format!("/users/{bob_id}"), &ana).await?;
    assert_eq!(profile.body["followers"], 1);
    assert_eq!(profile.body["following"], 0);
    assert!(profile.body.get("email").is_none());

    let followers = t.get(&format!("/users/{bob_id}/followers"), &bob).await?;
    assert_eq!(followers.body["items"][0]["username"], "ana");

    let notes = t.get("/notifications?unread_only=true", &bob).await?;
    assert_eq!(notes.body["total"], 1);
    assert_eq!(notes.body["items"][0]["kind"], "NewFollower");

    let gone = t.call(Method::DELETE, &format!("/users/{bob_id}/follow"), Some(&ana), None).await?;
    assert_eq!(gone.status, StatusCode::NO_CONTENT);
    let again = t.call(Method::DELETE, &format!("/users/{bob_id}/follow"), Some(&ana), None).await?;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn posts_feed_and_authorship() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let (_, ana) = t.signup("ana").await?;
    let (bob_id, bob) = t.signup("bob").await?;
    let (_, cara) = t.signup("cara").await?;

    let first = t.post("/posts", &bob, json!({"content": "golden hour"})).await?;
    assert_eq!(first.status, StatusCode::CREATED);
    t.post("/posts", &cara, json!({"content": "not followed"})).await?;
    let empty = t.post("/posts", &bob, json!({"content": "   "})).await?;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    t.post(&format!("/users/{bob_id}/follow"), &ana, json!({})).await?;
    let feed = t.get("/posts/feed", &ana).await?;
    assert_eq!(feed.body["total"], 1);
    assert_eq!(feed.body["items"][0]["content"], "golden hour");

    let by_bob = t.call(Method::GET, &format!("/posts?author_id={bob_id}"), None, None).await?;
    assert_eq!(by_bob.body["total"], 1);
    let everyone = t.call(Method::GET, "/posts?per_page=1", None, None).await?;
    assert_eq!(everyone.body["total"], 2);
    assert_eq!(everyone.body["per_page"], 1);
    assert_eq!(everyone.body["items"].as_array().map(Vec::len), Some(1));

    let path = format!("/posts/{}", first.body["id"].as_str().unwrap_or_default());
    let hijack = t.call(Method::PUT, &path, Some(&ana), Some(json!({"content": "mine now"}))).await?;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);
    let edit = t.call(Method::PUT, &path, Some(&bob), Some(json!({"content": "blue hour"}))).await?;
    assert_eq!(edit.body["content"], "blue hour");
    let del = t.call(Method::DELETE, &path, Some(&bob), None).await?;
    assert_eq!(del.status, StatusCode::NO_CONTENT);
    assert_eq!(t.call(Method::GET, &path, None, None).await?.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn notifications_are_private() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let (_, ana) = t.signup("ana").await?;
    let (bob_id, bob) = t.signup("bob").await?;
    t.post(&format!("/users/{bob_id}/follow"), &ana, json!({})).await?;

    let list = t.get("/notifications", &bob).await?;
    let id = list.body["items"][0]["id"].as_str().unwrap_or_default().to_string();
    let foreign = t.post(&format!("/notifications/{id}/read"), &ana, json!({})).await?;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    let read = t.post(&format!("/notifications/{id}/read"), &bob, json!({})).await?;
    assert_eq!(read.body["is_read"], true);
    assert_eq!(t.get("/notifications/unread-count", &bob).await?.body["unread"], 0);
    Ok(())
}

#[tokio::test]
async fn admin_flag_management() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let (root_id, root) = t.admin("root").await?;
    let (ana_id, ana) = t.signup("ana").await?;

    assert_eq!(t.get("/admin/users", &ana).await?.status, StatusCode::FORBIDDEN);
    let users = t.get("/admin/users", &root).await?;
    assert_eq!(users.body["total"], 2);

    let demote_self = t.call(Method::PUT, &format!("/admin/users/{root_id}/admin"), Some(&root), Some(json!({"is_admin": false}))).await?;
    assert_eq!(demote_self.status, StatusCode::BAD_REQUEST);
    let promote = t.call(Method::PUT, &format!("/admin/users/{ana_id}/admin"), Some(&root), Some(json!({"is_admin": true}))).await?;
    assert_eq!(promote.body["is_admin"], true);
    assert_eq!(t.get("/auth/me", &ana).await?.body["roles"], json!(["User", "Admin"]));

    let me = t.call(Method::PUT, "/users/me", Some(&ana), Some(json!({"display_name": "Ana P.", "bio": "film"}))).await?;
    assert_eq!(me.body["display_name"], "Ana P.");
    Ok(())
}

#[tokio::test]
async fn portfolios_keep_item_order() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let (_, root) = t.admin("root").await?;
    let (_, ana) = t.signup("ana").await?;
    let (_, bob) = t.signup("bob").await?;

    let denied = t.post("/portfolios", &ana, json!({"title": "Weddings"})).await?;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    t.grant(&ana, &root, "Photographer", 7000).await?;

    let folio = t.post("/portfolios", &ana, json!({"title": "Weddings", "description": "2024"})).await?;
    assert_eq!(folio.status, StatusCode::CREATED);
    let fid = folio.body["id"].as_str().unwrap_or_default().to_string();
    let pid = folio.body["photographer_id"].as_str().unwrap_or_default().to_string();

    let mut item_ids = Vec::new();
    for n in 1..=2 {
        let photo = t.post("/photos", &ana, json!({"url": format!("https://cdn.example.com/{n}.jpg")})).await?;
        let item = t
            .post(&format!("/portfolios/{fid}/items"), &ana, json!({"photo_id": photo.body["id"], "caption": format!("shot {n}")}))
            .await?;
        assert_eq!(item.status, StatusCode::CREATED);
        assert_eq!(item.body["position"], n);
        item_ids.push(item.body["id"].as_str().unwrap_or_default().to_string());
    }
    let bobs = t.post("/photos", &bob, json!({"url": "https://cdn.example.com/bob.jpg"})).await?;
    let stolen = t.post(&format!("/portfolios/{fid}/items"), &ana, json!({"photo_id": bobs.body["id"]})).await?;
    assert_eq!(stolen.status, StatusCode::FORBIDDEN);

    let listed = t.call(Method::GET, &format!("/photographers/{pid}/portfolios"), None, None).await?;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));
    let full = t.call(Method::GET, &format!("/portfolios/{fid}"), None, None).await?;
    assert_eq!(full.body["items"][0]["caption"], "shot 1");
    assert_eq!(full.body["items"][1]["caption"], "shot 2");

    let rm = t.call(Method::DELETE, &format!("/portfolios/{fid}/items/{}", item_ids[0]), Some(&bob), None).await?;
    assert_eq!(rm.status, StatusCode::FORBIDDEN);
    let rm = t.call(Method::DELETE, &format!("/portfolios/{fid}/items/{}", item_ids[0]), Some(&ana), None).await?;
    assert_eq!(rm.status, StatusCode::NO_CONTENT);
    let del = t.call(Method::DELETE, &format!("/portfolios/{fid}"), Some(&root), None).await?;
    assert_eq!(del.status, StatusCode::NO_CONTENT);
    Ok(())
}
