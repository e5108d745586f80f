mod common;

use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{id_of, TestApp};

async fn save(
    app: &TestApp,
    table: &str,
    pangkalan_id: Uuid,
    tanggal: &str,
    jumlah: i32,
    kondisi: &str,
) -> Value {
    let (status, body) = app
        .as_admin(
            Method::POST,
            &format!("/api/v1/{table}"),
            Some(json!({
                "pangkalan_id": pangkalan_id,
                "tanggal": tanggal,
                "jumlah": jumlah,
                "kondisi": kondisi
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn saving_the_same_day_replaces_the_row() {
    let app = TestApp::new().await;
    let depot = app.depot.id;

    let first = save(&app, "penyaluran", depot, "2024-02-01", 100, "NORMAL").await;
    let second = save(&app, "penyaluran", depot, "2024-02-01", 120, "FAKULTATIF").await;

    assert_eq!(second["data"]["id"], first["data"]["id"]);
    assert_eq!(second["data"]["jumlah"], 120);
    assert_eq!(second["data"]["kondisi"], "FAKULTATIF");
    assert_eq!(second["data"]["lpg_type"], "KG3");

    let (status, body) = app
        .as_admin(Method::GET, "/api/v1/penyaluran?month=2024-02", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn rekapitulasi_totals_and_remaining_allocation() {
    let app = TestApp::new().await;
    let depot = app.depot.id;
    let other = app.create_pangkalan("PKL-002", 100).await;

    save(&app, "penyaluran", depot, "2024-02-01", 120, "NORMAL").await;
    save(&app, "penyaluran", depot, "2024-02-15", 50, "FAKULTATIF").await;
    save(&app, "penyaluran", other.id, "2024-02-10", 150, "NORMAL").await;
    // Outside the month
    save(&app, "penyaluran", depot, "2024-03-01", 999, "NORMAL").await;

    let (status, body) = app
        .as_admin(
            Method::GET,
            "/api/v1/penyaluran/rekapitulasi?month=2024-02",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let rekap = &body["data"];
    assert_eq!(rekap["month"], "2024-02");
    assert_eq!(rekap["lpg_type"], "KG3");
    assert_eq!(rekap["days_in_month"], 29);

    let rows = rekap["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["code"], "PKL-001");
    assert_eq!(rows[0]["harian"].as_array().unwrap().len(), 29);
    assert_eq!(rows[0]["harian"][0], 120);
    assert_eq!(rows[0]["harian"][14], 50);
    assert_eq!(rows[0]["total_normal"], 120);
    assert_eq!(rows[0]["total_fakultatif"], 50);
    assert_eq!(rows[0]["total"], 170);
    assert_eq!(rows[0]["sisa_alokasi"], 130);

    // Over-distribution leaves a negative remainder
    assert_eq!(rows[1]["code"], "PKL-002");
    assert_eq!(rows[1]["sisa_alokasi"], -50);

    let footer = &rekap["footer"];
    assert_eq!(footer["harian"][9], 150);
    assert_eq!(footer["kumulatif"][0], 120);
    assert_eq!(footer["kumulatif"][9], 270);
    assert_eq!(footer["kumulatif"][28], 320);
    assert_eq!(footer["total_alokasi"], 400);
    assert_eq!(footer["grand_total"], 320);
    assert_eq!(footer["total_sisa_alokasi"], 80);
}

#[tokio::test]
async fn pangkalan_user_sees_only_its_own_row() {
    let app = TestApp::new().await;
    let other = app.create_pangkalan("PKL-002", 100).await;
    save(&app, "penyaluran", app.depot.id, "2024-02-01", 30, "NORMAL").await;
    save(&app, "penyaluran", other.id, "2024-02-01", 40, "NORMAL").await;

    let (status, body) = app
        .as_depot(
            Method::GET,
            "/api/v1/penyaluran/rekapitulasi?month=2024-02",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["total"], 30);

    let (status, body) = app.as_depot(Method::GET, "/api/v1/penyaluran", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (status, _) = app
        .as_depot(
            Method::GET,
            &format!("/api/v1/penyaluran?pangkalan_id={}", other.id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[case("2024-13")]
#[case("2024-1")]
#[case("Februari")]
#[tokio::test]
async fn malformed_month_is_a_bad_request(#[case] month: &str) {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_admin(
            Method::GET,
            &format!("/api/v1/penyaluran/rekapitulasi?month={month}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .as_admin(Method::GET, &format!("/api/v1/perencanaan?month={month}"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_admin(
            Method::POST,
            "/api/v1/penyaluran",
            Some(json!({
                "pangkalan_id": app.depot.id,
                "tanggal": "2024-02-01",
                "jumlah": -1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_plan_and_realisasi() {
    let app = TestApp::new().await;
    let depot = app.depot.id;
    let other = app.create_pangkalan("PKL-002", 100).await;

    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/perencanaan/bulk",
            Some(json!({
                "rows": [
                    { "pangkalan_id": depot, "tanggal": "2024-02-01", "jumlah": 100 },
                    { "pangkalan_id": depot, "tanggal": "2024-02-02", "jumlah": 100 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    save(&app, "penyaluran", depot, "2024-02-01", 90, "NORMAL").await;
    save(&app, "penyaluran", depot, "2024-02-02", 80, "FAKULTATIF").await;
    save(&app, "penyaluran", other.id, "2024-02-05", 10, "NORMAL").await;

    let (status, body) = app
        .as_admin(
            Method::GET,
            "/api/v1/perencanaan/realisasi?month=2024-02",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let realisasi = &body["data"];
    assert_eq!(realisasi["rows"][0]["rencana"], 200);
    assert_eq!(realisasi["rows"][0]["realisasi"], 170);
    assert_eq!(realisasi["rows"][0]["selisih"], -30);
    assert_eq!(realisasi["rows"][0]["persentase"], 85.0);
    assert_eq!(realisasi["rows"][1]["rencana"], 0);
    assert_eq!(realisasi["rows"][1]["persentase"], 0.0);
    assert_eq!(realisasi["total_rencana"], 200);
    assert_eq!(realisasi["total_realisasi"], 180);
    assert_eq!(realisasi["total_selisih"], -20);
}

#[tokio::test]
async fn bulk_with_unknown_pangkalan_saves_nothing() {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_admin(
            Method::POST,
            "/api/v1/penyaluran/bulk",
            Some(json!({
                "rows": [
                    { "pangkalan_id": app.depot.id, "tanggal": "2024-02-01", "jumlah": 10 },
                    { "pangkalan_id": Uuid::new_v4(), "tanggal": "2024-02-01", "jumlah": 10 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.as_admin(Method::GET, "/api/v1/penyaluran", None).await;
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn rows_can_be_deleted_once() {
    let app = TestApp::new().await;
    let saved = save(&app, "perencanaan", app.depot.id, "2024-02-03", 25, "NORMAL").await;
    let id = id_of(&saved);

    let (status, body) = app
        .as_admin(Method::DELETE, &format!("/api/v1/perencanaan/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);

    let (status, _) = app
        .as_admin(Method::DELETE, &format!("/api/v1/perencanaan/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pangkalan_users_cannot_write_distribution() {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_depot(
            Method::POST,
            "/api/v1/penyaluran",
            Some(json!({ "tanggal": "2024-02-01", "jumlah": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
