use actix_web::web::Data;
use actix_web::{App, test};
use scraper::{Html, Selector};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use rusty_archery::AppState;
use rusty_archery::args::CleanArgs;
use rusty_archery::controller::session::http_handlers::configure;
use rusty_archery::storage::MemoryStore;

fn state() -> AppState {
    let settings = CleanArgs {
        autosave_ms: 20,
        ..CleanArgs::default()
    };
    AppState::new(settings, Arc::new(MemoryStore::new()))
}

#[actix_web::test]
async fn test_index_lists_catalogue() {
    let app = test::init_service(App::new().app_data(Data::new(state())).configure(configure)).await;
    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = Html::parse_document(std::str::from_utf8(&body).unwrap());

    let inputs = Selector::parse("form input[name=round]").unwrap();
    let rounds: Vec<&str> = html
        .select(&inputs)
        .filter_map(|e| e.value().attr("value"))
        .collect();
    assert_eq!(rounds.len(), 7);
    assert!(rounds.contains(&"Worcester"));
}

#[actix_web::test]
async fn test_unknown_round_and_session() {
    let app = test::init_service(App::new().app_data(Data::new(state())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(json!({"round": "Nonesuch"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::post().uri("/sessions/99/undo").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(json!({"round_name": "Broken", "total_arrows": 3, "arrows_per_end": 6}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 422);
}

#[actix_web::test]
async fn test_button_grid_follows_scoring_system() {
    let app = test::init_service(App::new().app_data(Data::new(state())).configure(configure)).await;

    for (round, expected) in [("Bray I", vec!["X", "10", "9"]), ("Worcester", vec!["5", "4", "3"])] {
        let req = test::TestRequest::post()
            .uri("/sessions")
            .set_json(json!({"round": round}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_u64().unwrap();

        let req = test::TestRequest::get().uri(&format!("/sessions/{id}")).to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = Html::parse_document(std::str::from_utf8(&body).unwrap());
        let buttons = Selector::parse("div.value-buttons button").unwrap();
        let labels: Vec<String> = html
            .select(&buttons)
            .map(|b| b.text().collect::<String>().trim().to_string())
            .collect();
        assert_eq!(&labels[..3], expected.as_slice(), "{round}");
        assert_eq!(labels.last().map(String::as_str), Some("M"));
    }
}

#[actix_web::test]
async fn test_round_trip_with_autosave_and_submit() {
    let app = test::init_service(App::new().app_data(Data::new(state())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(json!({"round_name": "Club Six", "total_arrows": 6, "arrows_per_end": 3}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_u64().unwrap();

    for end in [["X", "10", "9"], ["8", "8", "M"]] {
        for value in end {
            let req = test::TestRequest::post()
                .uri(&format!("/sessions/{id}/arrows"))
                .set_json(json!({"value": value}))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }
        // the auto-save timer closes the end
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{id}?json=1"))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session["summary"]["complete"], json!(true));
    assert_eq!(session["summary"]["total_score"], json!(45));
    assert_eq!(session["running_totals"], json!([29, 45]));

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{id}/scoresheet?json=1"))
        .to_request();
    let sheet: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(sheet["rows"].as_array().unwrap().len(), 1);
    assert_eq!(sheet["totals"]["hits"], json!(5));

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{id}/scoresheet.png"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "image/png"
    );

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{id}/submit"))
        .set_json(json!({"formality": "formal"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 422);

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{id}/submit"))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get().uri("/submissions").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["total_score"], json!(45));
    assert_eq!(listed[0]["formality"], json!("informal"));

    let req = test::TestRequest::get().uri(&format!("/sessions/{id}")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_partial_save_is_rejected_and_htmx_gets_html() {
    let app = test::init_service(App::new().app_data(Data::new(state())).configure(configure)).await;
    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(json!({"round": "Portsmouth"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_u64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{id}/arrows"))
        .insert_header(("HX-Request", "true"))
        .set_json(json!({"x": 50.0, "y": 50.0}))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = Html::parse_fragment(std::str::from_utf8(&body).unwrap());
    let chips = Selector::parse("div.open-end span.arrow-chip").unwrap();
    let recorded: Vec<String> = html.select(&chips).map(|c| c.text().collect()).collect();
    assert_eq!(recorded, vec!["X".to_string()]);

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{id}/save"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
    let err: Value = test::read_body_json(resp).await;
    assert!(err["error"].as_str().unwrap().contains("1 of 3"));
}

#[actix_web::test]
async fn test_gesture_tap_records_and_signature_upload() {
    let app = test::init_service(App::new().app_data(Data::new(state())).configure(configure)).await;
    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(json!({"round": "WA 18m Triple"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_u64().unwrap();

    let gesture = |body: Value| {
        test::TestRequest::post()
            .uri(&format!("/sessions/{id}/gesture"))
            .set_json(body)
            .to_request()
    };
    let _: Value = test::call_and_read_body_json(
        &app,
        gesture(json!({"kind": "down", "x": 50.0, "y": 50.0, "at_ms": 0})),
    )
    .await;
    let up: Value = test::call_and_read_body_json(
        &app,
        gesture(json!({"kind": "up", "x": 50.0, "y": 50.0, "at_ms": 10})),
    )
    .await;
    assert_eq!(up["committed"]["value"], json!("X"));
    assert_eq!(up["committed"]["placement"]["face"], json!(1));
    let click: Value = test::call_and_read_body_json(
        &app,
        gesture(json!({"kind": "click", "x": 50.0, "y": 50.0, "at_ms": 11})),
    )
    .await;
    assert!(click["committed"].is_null());

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{id}/loupe.png"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::new(8, 4))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let req = test::TestRequest::put()
        .uri(&format!("/sessions/{id}/signatures/archer"))
        .set_payload(png)
        .to_request();
    let signed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(signed["missing"], json!(["witness"]));

    let req = test::TestRequest::put()
        .uri(&format!("/sessions/{id}/signatures/coach"))
        .set_payload(vec![0u8; 4])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{id}/target.png"))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
}

/// Auto-save slow enough that a test decides when ends close.
fn manual_save_state() -> AppState {
    let settings = CleanArgs {
        autosave_ms: 60_000,
        ..CleanArgs::default()
    };
    AppState::new(settings, Arc::new(MemoryStore::new()))
}

#[actix_web::test]
async fn test_edit_offered_while_open_end_has_arrows() {
    let app = test::init_service(
        App::new()
            .app_data(Data::new(manual_save_state()))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(json!({"round": "Bray I"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_u64().unwrap();

    let record = |value: &str| {
        test::TestRequest::post()
            .uri(&format!("/sessions/{id}/arrows"))
            .set_json(json!({"value": value}))
            .to_request()
    };
    for value in ["10", "9", "9", "8", "8", "7"] {
        assert!(test::call_service(&app, record(value)).await.status().is_success());
    }
    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{id}/save"))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
    assert!(test::call_service(&app, record("X")).await.status().is_success());

    let req = test::TestRequest::get().uri(&format!("/sessions/{id}")).to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = Html::parse_document(std::str::from_utf8(&body).unwrap());
    let edit = Selector::parse("table.ends button").unwrap();
    let buttons: Vec<_> = html.select(&edit).collect();
    assert_eq!(buttons.len(), 1);
    assert!(buttons[0].value().attr("disabled").is_none());

    // editing wins over the unsaved arrow
    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{id}/ends/0/edit"))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session["open_end"]["arrows"].as_array().unwrap().len(), 6);
    assert_eq!(session["summary"]["total_score"], json!(0));

    let req = test::TestRequest::get().uri(&format!("/sessions/{id}")).to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = Html::parse_document(std::str::from_utf8(&body).unwrap());
    let buttons: Vec<_> = html.select(&edit).collect();
    assert!(buttons[0].value().attr("disabled").is_some());
}

#[actix_web::test]
async fn test_gesture_lens_and_dropped_commits() {
    let app = test::init_service(
        App::new()
            .app_data(Data::new(manual_save_state()))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/sessions")
        .set_json(json!({"round": "WA 18m Triple"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_u64().unwrap();

    let gesture = |body: Value| {
        test::TestRequest::post()
            .uri(&format!("/sessions/{id}/gesture"))
            .set_json(body)
            .to_request()
    };
    for n in 0..3u64 {
        let at = n * 100;
        let _: Value = test::call_and_read_body_json(
            &app,
            gesture(json!({"kind": "down", "x": 50.0, "y": 50.0, "at_ms": at})),
        )
        .await;
        let up: Value = test::call_and_read_body_json(
            &app,
            gesture(json!({"kind": "up", "x": 50.0, "y": 50.0, "at_ms": at + 10})),
        )
        .await;
        assert_eq!(up["committed"]["value"], json!("X"));
        assert!(up["lens"].is_null());
    }

    // a held press opens the lens above the pointer
    let _: Value = test::call_and_read_body_json(
        &app,
        gesture(json!({"kind": "down", "x": 50.0, "y": 50.0, "at_ms": 1000})),
    )
    .await;
    let held: Value = test::call_and_read_body_json(
        &app,
        gesture(json!({"kind": "tick", "at_ms": 1100})),
    )
    .await;
    assert_eq!(held["phase"]["phase"], json!("magnified"));
    assert!((held["lens"]["x"].as_f64().unwrap() - 50.0).abs() < 1e-3);
    assert!(held["lens"]["y"].as_f64().unwrap() < 50.0);

    // the open end is already full, so this release records nothing
    let up: Value = test::call_and_read_body_json(
        &app,
        gesture(json!({"kind": "up", "x": 50.0, "y": 50.0, "at_ms": 1150})),
    )
    .await;
    assert!(up["committed"].is_null());
    assert_eq!(up["summary"]["state"]["state"], json!("ready"));

    let req = test::TestRequest::get()
        .uri(&format!("/sessions/{id}?json=1"))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session["open_end"]["arrows"].as_array().unwrap().len(), 3);
}
