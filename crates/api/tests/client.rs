use eo_maxar::{Bbox, ErrorKind, Period, filter::Expr};
use eo_maxar_api::{Client, Config, Error, TileRequest};
use mockito::{Matcher, Mock, Server, ServerGuard};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const COLLECTION_ID: &str = "Kahramanmaras-turkey-earthquake-23";

#[fixture]
fn server() -> ServerGuard {
    Server::new()
}

fn client(server: &ServerGuard) -> Client {
    let config = Config::default()
        .with_stac_api_url(&server.url())
        .unwrap()
        .with_raster_api_url(&server.url())
        .unwrap();
    Client::new(config).unwrap()
}

fn json_mock(server: &mut ServerGuard, method: &str, path: &str, body: Value) -> Mock {
    server
        .mock(method, path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create()
}

fn collections_page(ids: &[&str], next: Option<String>) -> Value {
    let mut links = vec![json!({"rel": "self", "href": "http://ignored.test/collections"})];
    if let Some(next) = next {
        links.push(json!({"rel": "next", "href": next}));
    }
    json!({
        "collections": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
        "links": links,
    })
}

fn item(id: &str, datetime: &str) -> Value {
    json!({
        "type": "Feature",
        "stac_version": "1.0.0",
        "id": id,
        "bbox": [36.0, 36.9, 37.5, 37.8],
        "geometry": null,
        "properties": {"datetime": datetime},
        "assets": {"visual": {"href": format!("https://maxar.test/{id}-visual.tif")}},
        "links": [],
        "collection": COLLECTION_ID,
    })
}

fn items_page(ids: &[&str], next: Option<String>) -> Value {
    let mut links = Vec::new();
    if let Some(next) = next {
        links.push(json!({"rel": "next", "href": next}));
    }
    json!({
        "type": "FeatureCollection",
        "features": ids.iter().map(|id| item(id, "2023-02-07T08:20:52Z")).collect::<Vec<_>>(),
        "links": links,
    })
}

fn tilejson(server: &ServerGuard, minzoom: u8, maxzoom: u8) -> Value {
    json!({
        "tilejson": "2.2.0",
        "tiles": [format!("{}/searches/abc/tiles/WebMercatorQuad/{{z}}/{{x}}/{{y}}@1x?assets=visual", server.url())],
        "minzoom": minzoom,
        "maxzoom": maxzoom,
        "bounds": [36.0, 36.9, 37.5, 37.8],
    })
}

fn tile_query(asset: &str, minzoom: u8, maxzoom: u8) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("assets".into(), asset.into()),
        Matcher::UrlEncoded("minzoom".into(), minzoom.to_string()),
        Matcher::UrlEncoded("maxzoom".into(), maxzoom.to_string()),
    ])
}

#[rstest]
fn collection_ids_follow_next_links(mut server: ServerGuard) {
    let url = server.url();
    let pages = [
        json_mock(
            &mut server,
            "GET",
            "/collections",
            collections_page(&["a", "b"], Some(format!("{url}/collections?page=2"))),
        ),
        json_mock(
            &mut server,
            "GET",
            "/collections?page=2",
            collections_page(&[], Some(format!("{url}/collections?page=3"))),
        ),
        json_mock(
            &mut server,
            "GET",
            "/collections?page=3",
            collections_page(&["c", "d", "e"], None),
        ),
    ];
    let client = client(&server);
    assert_eq!(
        client.collection_ids().unwrap(),
        vec!["a", "b", "c", "d", "e"]
    );
    for page in pages {
        page.assert();
    }
    client.close();
}

#[rstest]
fn collection_ids_single_empty_page(mut server: ServerGuard) {
    let mock = json_mock(&mut server, "GET", "/collections", json!({"collections": [], "links": []}));
    let client = client(&server);
    assert!(client.collection_ids().unwrap().is_empty());
    mock.assert();
}

#[rstest]
fn collection_ids_propagate_errors_mid_pagination(mut server: ServerGuard) {
    let url = server.url();
    let first = json_mock(
        &mut server,
        "GET",
        "/collections",
        collections_page(&["a"], Some(format!("{url}/collections?page=2"))),
    );
    let second = server
        .mock("GET", "/collections?page=2")
        .with_status(503)
        .expect(1)
        .create();
    let error = client(&server).collection_ids().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Remote);
    assert_eq!(error.status().unwrap().as_u16(), 503);
    assert!(matches!(&error, Error::Remote { url: u, .. } if u.ends_with("/collections?page=2")));
    first.assert();
    second.assert();
}

#[rstest]
fn collection_ids_unreachable_server_is_an_error() {
    let config = Config::default()
        .with_stac_api_url("http://127.0.0.1:1")
        .unwrap();
    let error = Client::new(config).unwrap().collection_ids().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Transport);
}

#[rstest]
fn collection(mut server: ServerGuard) {
    let body: Value =
        serde_json::from_slice(&std::fs::read("data/collection.json").unwrap()).unwrap();
    let mock = json_mock(
        &mut server,
        "GET",
        &format!("/collections/{COLLECTION_ID}"),
        body,
    );
    let collection = client(&server).collection(COLLECTION_ID).unwrap();
    assert_eq!(collection.id, COLLECTION_ID);
    assert_eq!(collection.extent.spatial.bbox.len(), 3);
    mock.assert();
}

#[rstest]
fn collection_without_id_is_a_validation_error(mut server: ServerGuard) {
    let mut body: Value =
        serde_json::from_slice(&std::fs::read("data/collection.json").unwrap()).unwrap();
    let _ = body.as_object_mut().unwrap().remove("id");
    let mock = json_mock(
        &mut server,
        "GET",
        &format!("/collections/{COLLECTION_ID}"),
        body,
    );
    let error = client(&server).collection(COLLECTION_ID).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(matches!(&error, Error::Validation { url, .. } if url.ends_with(COLLECTION_ID)));
    mock.assert();
}

#[rstest]
fn missing_collection_is_a_remote_error(mut server: ServerGuard) {
    let mock = server
        .mock("GET", "/collections/nope")
        .with_status(404)
        .expect(1)
        .create();
    let error = client(&server).collection("nope").unwrap_err();
    assert!(matches!(
        &error,
        Error::Remote { status, url } if status.as_u16() == 404 && *url == format!("{}/collections/nope", server.url())
    ));
    mock.assert();
}

#[rstest]
fn items_send_limit_only_on_the_first_page(mut server: ServerGuard) {
    let url = server.url();
    let path = format!("/collections/{COLLECTION_ID}/items");
    let pages = [
        json_mock(
            &mut server,
            "GET",
            &format!("{path}?limit=100"),
            items_page(
                &["a", "b", "c"],
                Some(format!("{url}{path}?limit=100&token=next:2")),
            ),
        ),
        json_mock(
            &mut server,
            "GET",
            &format!("{path}?limit=100&token=next:2"),
            items_page(&["d"], None),
        ),
    ];
    let items = client(&server).items(COLLECTION_ID).unwrap();
    let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert!(items.iter().all(|item| item.assets.contains_key("visual")));
    for page in pages {
        page.assert();
    }
}

#[rstest]
fn items_with_limit(mut server: ServerGuard) {
    let path = format!("/collections/{COLLECTION_ID}/items");
    let mock = json_mock(
        &mut server,
        "GET",
        &format!("{path}?limit=2"),
        items_page(&["a", "b"], None),
    );
    let items = client(&server).items_with_limit(COLLECTION_ID, 2).unwrap();
    assert_eq!(items.len(), 2);
    mock.assert();
}

#[rstest]
fn empty_collection_has_no_items(mut server: ServerGuard) {
    let mock = json_mock(
        &mut server,
        "GET",
        "/collections/empty/items?limit=100",
        json!({"type": "FeatureCollection", "features": [], "links": []}),
    );
    assert!(client(&server).items("empty").unwrap().is_empty());
    mock.assert();
}

#[rstest]
fn items_propagate_errors_mid_pagination(mut server: ServerGuard) {
    let url = server.url();
    let path = format!("/collections/{COLLECTION_ID}/items");
    let first = json_mock(
        &mut server,
        "GET",
        &format!("{path}?limit=100"),
        items_page(&["a"], Some(format!("{url}{path}?limit=100&token=next:2"))),
    );
    let second = server
        .mock("GET", format!("{path}?limit=100&token=next:2").as_str())
        .with_status(404)
        .expect(1)
        .create();
    let error = client(&server).items(COLLECTION_ID).unwrap_err();
    assert_eq!(error.status().unwrap().as_u16(), 404);
    first.assert();
    second.assert();
}

#[rstest]
fn malformed_item_is_a_validation_error(mut server: ServerGuard) {
    let mut page = items_page(&["a"], None);
    page["features"][0]["bbox"] = json!([1.0]);
    let _mock = json_mock(
        &mut server,
        "GET",
        &format!("/collections/{COLLECTION_ID}/items?limit=100"),
        page,
    );
    let error = client(&server).items(COLLECTION_ID).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[rstest]
fn register_mosaic(mut server: ServerGuard) {
    let event_date = "2023-02-06T00:00:00Z".parse().unwrap();
    let mock = server
        .mock("POST", "/searches/register")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "filter-lang": "cql2-json",
            "filter": {
                "op": "and",
                "args": [
                    {"op": "in", "args": [{"property": "collection"}, [COLLECTION_ID]]},
                    {"op": "ge", "args": [{"property": "datetime"}, "2023-02-06T00:00:00Z"]}
                ]
            },
            "sortby": [{"field": "tile:clouds_percent", "direction": "asc"}],
            "metadata": {"name": "Post-event", "bounds": [36.0, 36.9, 37.5, 37.8]}
        })))
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "abc", "links": []}"#)
        .expect(1)
        .create();
    let search_id = client(&server)
        .register_mosaic(
            COLLECTION_ID,
            Bbox::new(36.0, 36.9, 37.5, 37.8),
            Period::Post.filter(event_date),
            Period::Post.name(),
        )
        .unwrap();
    assert_eq!(search_id, "abc");
    mock.assert();
}

#[rstest]
#[case(json!({"links": []}))]
#[case(json!({"id": ""}))]
#[case(json!({"id": 42}))]
fn register_mosaic_without_an_id(mut server: ServerGuard, #[case] body: Value) {
    let _mock = json_mock(&mut server, "POST", "/searches/register", body);
    let error = client(&server)
        .register_mosaic(
            COLLECTION_ID,
            Bbox::new(36.0, 36.9, 37.5, 37.8),
            Expr::lt(Expr::property("datetime"), "2023-02-06T00:00:00Z"),
            "Pre-event",
        )
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[rstest]
fn search_tilejson_default_zoom(mut server: ServerGuard) {
    let body = tilejson(&server, 12, 22);
    let mock = server
        .mock("GET", "/searches/abc/WebMercatorQuad/tilejson.json")
        .match_query(tile_query("visual", 12, 22))
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create();
    let client = client(&server);
    let tilejson = client
        .search_tilejson("abc", &client.tile_request("visual"))
        .unwrap();
    assert!(!tilejson.tiles.is_empty());
    assert_eq!((tilejson.minzoom, tilejson.maxzoom), (12, 22));
    mock.assert();
}

#[rstest]
fn search_tilejson_zoom_override(mut server: ServerGuard) {
    let body = tilejson(&server, 10, 18);
    let mock = server
        .mock("GET", "/searches/abc/WebMercatorQuad/tilejson.json")
        .match_query(tile_query("ms_analytic", 10, 18))
        .with_body(body.to_string())
        .expect(1)
        .create();
    let request = TileRequest::new("ms_analytic", 10, 18).unwrap();
    let tilejson = client(&server).search_tilejson("abc", &request).unwrap();
    assert_eq!((tilejson.minzoom, tilejson.maxzoom), (10, 18));
    mock.assert();
}

#[rstest]
fn item_tilejson_skips_registration(mut server: ServerGuard) {
    let body = tilejson(&server, 12, 22);
    let register = server
        .mock("POST", "/searches/register")
        .expect(0)
        .create();
    let mock = server
        .mock(
            "GET",
            format!("/collections/{COLLECTION_ID}/items/10300100E1F0C000/WebMercatorQuad/tilejson.json")
                .as_str(),
        )
        .match_query(tile_query("visual", 12, 22))
        .with_body(body.to_string())
        .expect(1)
        .create();
    let client = client(&server);
    let tilejson = client
        .item_tilejson(
            COLLECTION_ID,
            "10300100E1F0C000",
            &client.tile_request("visual"),
        )
        .unwrap();
    assert_eq!(tilejson.bounds, Bbox::new(36.0, 36.9, 37.5, 37.8));
    mock.assert();
    register.assert();
}

#[rstest]
fn configured_tilejson_path(mut server: ServerGuard) {
    let body = tilejson(&server, 12, 22);
    let mock = server
        .mock("GET", "/searches/abc/WorldCRS84Quad/tilejson.json")
        .match_query(tile_query("visual", 12, 22))
        .with_body(body.to_string())
        .expect(1)
        .create();
    let config = Config::default()
        .with_raster_api_url(&server.url())
        .unwrap()
        .with_tilejson_path("WorldCRS84Quad/tilejson.json");
    let client = Client::new(config).unwrap();
    let _ = client
        .search_tilejson("abc", &client.tile_request("visual"))
        .unwrap();
    mock.assert();
}

#[rstest]
fn tilejson_without_tiles_is_a_validation_error(mut server: ServerGuard) {
    let mut body = tilejson(&server, 12, 22);
    body["tiles"] = json!([]);
    let _mock = server
        .mock("GET", "/searches/abc/WebMercatorQuad/tilejson.json")
        .match_query(Matcher::Any)
        .with_body(body.to_string())
        .create();
    let client = client(&server);
    let error = client
        .search_tilejson("abc", &client.tile_request("visual"))
        .unwrap_err();
    assert!(matches!(
        error,
        Error::Validation {
            source: eo_maxar::Error::NoTiles,
            ..
        }
    ));
}

#[rstest]
fn ids_are_percent_encoded(mut server: ServerGuard) {
    let mock = server
        .mock("GET", "/collections/a%2Fb%3Fc%23d")
        .with_status(404)
        .expect(1)
        .create();
    let error = client(&server).collection("a/b?c#d").unwrap_err();
    assert!(matches!(
        &error,
        Error::Remote { url, .. } if url.ends_with("/collections/a%2Fb%3Fc%23d")
    ));
    mock.assert();
}

#[rstest]
fn next_link_to_the_same_page_ends_the_walk(mut server: ServerGuard) {
    let url = server.url();
    let mock = json_mock(
        &mut server,
        "GET",
        "/collections",
        collections_page(&["a"], Some(format!("{url}/collections"))),
    );
    assert_eq!(client(&server).collection_ids().unwrap(), vec!["a"]);
    mock.assert();
}

#[rstest]
fn next_link_back_to_the_first_page_ends_the_walk(mut server: ServerGuard) {
    let url = server.url();
    let path = format!("/collections/{COLLECTION_ID}/items");
    let pages = [
        json_mock(
            &mut server,
            "GET",
            &format!("{path}?limit=100"),
            items_page(&["a"], Some(format!("{url}{path}?limit=100&token=next:2"))),
        ),
        json_mock(
            &mut server,
            "GET",
            &format!("{path}?limit=100&token=next:2"),
            items_page(&["b"], Some(format!("{url}{path}?limit=100"))),
        ),
    ];
    let items = client(&server).items(COLLECTION_ID).unwrap();
    let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    for page in pages {
        page.assert();
    }
}
