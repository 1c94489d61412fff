//! Whole-catalog runs: output tree layout, product filter, CSV rows

use catalog_scrape::catalog::{Catalog, parse_rows, run_catalog, run_rows};
use catalog_scrape::fetcher::HttpFetcher;
use catalog_scrape::utils::CHROME_USER_AGENT;
use std::collections::HashSet;
use std::time::Duration;
use tempfile::TempDir;

mod common;
use common::{
    StubRenderer, create_image_mock, distinct_images, file_names, setup_mock_server, test_config,
    test_url, white_image,
};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(CHROME_USER_AGENT, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn nested_catalog_fills_the_output_tree() {
    let mut server = setup_mock_server().await;
    let images = distinct_images(3);
    let _a = create_image_mock(&mut server, "/a.png", &images[0], 1).await;
    let _b = create_image_mock(&mut server, "/b.png", &images[1], 1).await;
    let skipped = create_image_mock(&mut server, "/c.png", &images[2], 0).await;

    let json = format!(
        r#"{{"categories": {{
            "Home & Kitchen": {{"category_id": "cat_001", "category_name": "Home & Kitchen",
              "subcategories": {{
                "Lamps/Lighting": {{"subcategory_id": "subcat_001", "subcategory_name": "Lamps",
                  "products": [
                    {{"product_id": "prod_0001", "product_name": "Lamp",
                      "image_urls": ["{a}", "{b}"]}},
                    {{"product_id": "prod_0002", "product_name": "Shade",
                      "image_urls": ["{c}"]}}
                  ]}}
              }}}}
        }}}}"#,
        a = test_url(&server, "/a.png"),
        b = test_url(&server, "/b.png"),
        c = test_url(&server, "/c.png"),
    );
    let catalog = Catalog::from_json(&json).unwrap();

    let root = TempDir::new().unwrap();
    let config = test_config(root.path(), 25);
    let renderer = StubRenderer::new();
    let only: HashSet<String> = ["prod_0001".to_string()].into_iter().collect();

    let summary = run_catalog(&catalog, &config, &fetcher(), &renderer, Some(&only)).await;

    assert_eq!(summary.products, 1);
    assert_eq!(summary.images_saved, 2);
    assert!(summary.products_without_images.is_empty());

    let product_dir = root
        .path()
        .join("Home__Kitchen")
        .join("LampsLighting")
        .join("prod_0001");
    assert_eq!(
        file_names(&product_dir),
        vec!["prod_0001_img1.jpg", "prod_0001_img2.jpg"]
    );
    skipped.assert_async().await;
}

#[tokio::test]
async fn csv_rows_use_their_product_key() {
    let mut server = setup_mock_server().await;
    let images = distinct_images(2);
    let _a = create_image_mock(&mut server, "/row/a.png", &images[0], 1).await;
    let _b = create_image_mock(&mut server, "/row/b.png", &images[1], 1).await;

    let csv = format!(
        "product_name,product_title,product_image1,product_image2,product_image3,product_image4\n\
         Desk Fan,,{a},nan,,{b}\n\
         ,,,,,\n",
        a = test_url(&server, "/row/a.png"),
        b = test_url(&server, "/row/b.png"),
    );
    let rows = parse_rows(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);

    let root = TempDir::new().unwrap();
    let config = test_config(root.path(), 15);
    let renderer = StubRenderer::new();

    let summary = run_rows(&rows, &config, &fetcher(), &renderer).await;

    assert_eq!(summary.products, 2);
    assert_eq!(summary.images_saved, 2);
    assert_eq!(summary.products_without_images, vec!["Unknown_Product"]);
    assert_eq!(
        file_names(&root.path().join("Desk_Fan")),
        vec!["Desk_Fan_img1.jpg", "Desk_Fan_img2.jpg"]
    );
    // a row without sources has nothing to fall back on
    assert!(renderer.calls().is_empty());
}

#[tokio::test]
async fn csv_generic_pages_resolve_to_their_og_image() {
    let mut server = setup_mock_server().await;
    let images = distinct_images(1);
    let og = create_image_mock(&mut server, "/og/lamp.png", &images[0], 1).await;
    let placeholder = create_image_mock(&mut server, "/assets/white.png", &white_image(), 0).await;
    let page = server
        .mock("GET", "/products/desk-lamp")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html></html>")
        .expect(0)
        .create_async()
        .await;

    let page_url = test_url(&server, "/products/desk-lamp");
    let renderer = StubRenderer::new().with_page(
        page_url.clone(),
        format!(
            r#"<html><head><meta property="og:image" content="{}/og/lamp.png"></head>
               <body><img src="/assets/white.png"></body></html>"#,
            server.url()
        ),
    );

    let csv = format!("product_name,product_image1\nDesk Lamp,{page_url}\n");
    let rows = parse_rows(csv.as_bytes()).unwrap();

    let root = TempDir::new().unwrap();
    // the shared config leaves generic-page resolution off
    let config = test_config(root.path(), 15);
    assert!(!config.resolve_generic_pages());

    let summary = run_rows(&rows, &config, &fetcher(), &renderer).await;

    assert_eq!(summary.images_saved, 1);
    assert_eq!(summary.fallbacks, 0);
    assert_eq!(
        file_names(&root.path().join("Desk_Lamp")),
        vec!["Desk_Lamp_img1.jpg"]
    );
    assert_eq!(renderer.calls(), vec![page_url]);
    og.assert_async().await;
    placeholder.assert_async().await;
    page.assert_async().await;
}
