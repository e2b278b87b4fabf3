

/// Address of a running catalog, overridable with `BOOKSERVICE_CATALOG_URL`
#[cfg(all(test, any(feature = "system_tests", feature = "load_tests")))]
fn catalog_url() -> String {
    std::env::var("BOOKSERVICE_CATALOG_URL").unwrap_or("http://127.0.0.1:8080".to_string())
}
